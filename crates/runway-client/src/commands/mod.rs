pub mod accounts;
pub mod common;
pub mod exclusions;
pub mod forecast;
pub mod import;
pub mod recurring;
