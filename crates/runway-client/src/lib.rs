pub mod commands;
pub mod contracts;
pub mod error;
pub mod forecast;
mod import;
pub mod migrations;
pub mod setup;
pub mod state;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use forecast::config::{ForecastConfig, Horizon};
pub use forecast::policy::{DASHBOARD_POLICY, DetectionPolicy, SUGGESTIONS_POLICY};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
