//! Application configuration.

pub mod app_config;
pub mod args;
pub mod config_file;

pub use app_config::{
    ApiConfig, AppConfig, DEFAULT_API_BASE_URL, LogLevel, NotificationsConfig, SchedulerConfig,
};
pub use args::CliArgs;
pub use config_file::{ConfigError, ConfigFile};
