pub mod cluster;
pub mod config;
pub mod date;
pub mod exclusions;
pub mod frequency;
pub mod intervals;
pub mod normalize;
pub mod policy;
pub mod predict;
pub mod projection;
pub mod query;
pub mod recurring;
pub mod refresh;
pub mod similarity;
pub mod types;
