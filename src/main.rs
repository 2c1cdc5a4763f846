use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use jobsync::application::{NotificationManager, ResolveTokenUseCase, SyncSession};
use jobsync::domain::{CollectionSpec, Identity, NotificationPort, SharedStorePort};
use jobsync::infrastructure::{
    AppConfig, AuthenticatedClient, CliArgs, ConfigFile, DesktopNotificationService,
    InMemoryStore, KeyringTokenStorage, SeededTokenStorage,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = ConfigFile::locate(args.config.as_deref())
        .wrap_err("locating configuration file")?
        .load()
        .wrap_err("loading configuration")?;
    config.merge_with_args(args);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = jobsync::VERSION, api = %config.api.base_url, "Starting jobsync");

    let keyring = Arc::new(KeyringTokenStorage::new());
    let credentials = Arc::new(SeededTokenStorage::new(keyring.clone()));
    let resolver = ResolveTokenUseCase::new(keyring);
    match resolver.execute(args.token.clone()).await? {
        Some(resolved) => {
            info!(source = %resolved.source, "Bearer token resolved");
            if args.save_token {
                if let Err(e) = resolver.persist(&resolved.token).await {
                    warn!(error = %e, "Continuing without a persisted token");
                }
            }
            credentials.seed(resolved.token);
        }
        None => info!("No bearer token available, relying on cookies"),
    }

    let client = AuthenticatedClient::new(&config.api, credentials)?;
    let store = Arc::new(InMemoryStore::new());
    let toasts = Arc::new(NotificationManager::default());
    let sink: Arc<dyn NotificationPort> = if config.notifications.desktop {
        Arc::new(DesktopNotificationService::new(config.notifications.enabled))
    } else {
        toasts.clone()
    };

    let session = SyncSession::new(
        Arc::new(client),
        store.clone(),
        sink,
        config.scheduler.policy(),
    );

    let identity = args
        .user_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .map_or(Identity::Absent, Identity::present);

    let wait = Duration::from_secs(args.wait_secs);
    session.mount(identity).await;
    session.settle(wait).await;

    if args.no_cache {
        tokio::time::sleep(config.scheduler.policy().min_interval).await;
        session.refresh_all(true).await;
        session.settle(wait).await;
    }

    session.teardown();

    for spec in CollectionSpec::ALL {
        info!(
            collection = spec.name,
            count = store.snapshot(spec.slice).len(),
            "Collection loaded"
        );
    }

    if config.notifications.enabled {
        for toast in toasts.drain() {
            warn!(title = %toast.title, session_expired = toast.session_expired, "{}", toast.message);
        }
    }

    println!("{}", serde_json::to_string_pretty(&store.to_json())?);

    Ok(())
}
