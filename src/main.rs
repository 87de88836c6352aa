//! Attendance Reconciliation Engine
//!
//! Badge scan processing service handling:
//! - Check-in / check-out / verification scans from scanning stations
//! - Append-only scan ledger with replay-derived attendance state
//! - Scan session tracking for organizer dashboards
//! - Event-level attendance statistics

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use api::{router, AppState};
use attendance_core::{limits, ReconcilePolicy};
use attendance_store::{
    AttendeeDirectory, HttpDirectory, MemoryDirectory, MemoryLedger, MemorySessionStore,
};
use reconciler::ProcessorConfig;
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Attendee directory URL, or "mock" for the in-memory directory
    #[serde(default = "default_directory_url")]
    directory_url: String,

    #[serde(default)]
    policy: ReconcilePolicy,

    #[serde(default = "default_lookup_timeout_secs")]
    lookup_timeout_secs: u64,
    #[serde(default = "default_append_timeout_secs")]
    append_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_directory_url() -> String {
    "mock".to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    limits::DEFAULT_LOOKUP_TIMEOUT_SECS
}

fn default_append_timeout_secs() -> u64 {
    limits::DEFAULT_APPEND_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            directory_url: default_directory_url(),
            policy: ReconcilePolicy::default(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            append_timeout_secs: default_append_timeout_secs(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!(
        "Starting Attendance Reconciliation Engine v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = load_config()?;

    info!(
        directory_url = %config.directory_url,
        allow_raw_checkout = config.policy.allow_raw_checkout,
        "Loaded configuration"
    );

    // Wire up the attendee directory
    let directory: Arc<dyn AttendeeDirectory> =
        if config.directory_url.is_empty() || config.directory_url == "mock" {
            info!("Using in-memory attendee directory");
            Arc::new(MemoryDirectory::new())
        } else {
            Arc::new(
                HttpDirectory::new(
                    &config.directory_url,
                    Duration::from_secs(config.lookup_timeout_secs),
                )
                .context("Failed to create directory client")?,
            )
        };

    // In-memory ledger and session store; per-key atomic, always writable
    let ledger = Arc::new(MemoryLedger::new());
    let session_store = Arc::new(MemorySessionStore::new());

    check_health(directory.as_ref()).await;

    let processor_config = ProcessorConfig {
        policy: config.policy,
        lookup_timeout: Duration::from_secs(config.lookup_timeout_secs),
        append_timeout: Duration::from_secs(config.append_timeout_secs),
    };

    // Create application state
    let state = AppState::new(directory, ledger, session_store, processor_config);

    // Start pair-lock cleanup background task
    let _lock_cleanup = state.start_lock_cleanup();
    info!("Started pair-lock cleanup task (every 5 minutes)");

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind server address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from file and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults from optional config file
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("ATTENDANCE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for underscored field names the config crate's
    // nested parsing does not handle reliably
    if let Ok(url) = std::env::var("ATTENDANCE_DIRECTORY_URL") {
        config.directory_url = url;
    }
    if let Ok(raw) = std::env::var("ATTENDANCE_ALLOW_RAW_CHECKOUT") {
        config.policy.allow_raw_checkout = raw == "1" || raw.eq_ignore_ascii_case("true");
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(directory: &dyn AttendeeDirectory) {
    if directory.is_healthy() {
        health().directory.set_healthy();
        info!("Attendee directory: healthy");
    } else {
        health().directory.set_unhealthy("Connection failed");
        tracing::error!("Attendee directory: unhealthy");
    }

    // The in-memory stores cannot fail to start
    health().store.set_healthy();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
