pub mod app_config;
pub mod config;
pub mod records;

pub use app_config::{AppConfig, Environment, TimeFormat};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{ActivityRecord, LatLng, LocationRecord, RecordKind, VisitRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
