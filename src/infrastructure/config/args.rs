use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "jobsync",
    version,
    about = "Synchronizes job board collections for the signed-in user",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend API origin.
    #[arg(long, env = "JOBSYNC_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Bearer token, used when none is stored.
    #[arg(long, env = "JOBSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Persist a token given on the command line.
    #[arg(long)]
    pub save_token: bool,

    /// Signed-in user id; user collections are only fetched when set.
    #[arg(long, env = "JOBSYNC_USER_ID", value_name = "ID")]
    pub user_id: Option<String>,

    /// Bypass intermediary caches.
    #[arg(long)]
    pub no_cache: bool,

    /// Seconds to wait for all collections to settle.
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub wait_secs: u64,

    /// Forward notifications to the desktop.
    #[arg(long)]
    pub desktop_notifications: Option<bool>,
}
