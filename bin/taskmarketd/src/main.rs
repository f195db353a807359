//! `taskmarketd` — the taskmarket server binary.
//!
//! Usage:
//!   taskmarketd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/taskmarket/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod notify;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use identity::IdentityModule;
use identity::service::IdentityConfig;
use taskmarket_core::Module;

use config::ServerConfig;

/// taskmarket server.
#[derive(Parser, Debug)]
#[command(name = "taskmarketd", about = "taskmarket server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid — an operator error stops the
    // server before it accepts requests.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let sql: Arc<dyn taskmarket_sql::SQLStore> = Arc::new(
        taskmarket_sql::SqliteStore::open(&data_dir.join("data.sqlite"))
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    // Chat-bot notifier (fire-and-forget collaborator).
    let notifier = Arc::new(notify::BotNotifier::new(server_config.bot.enabled));

    // Identity module.
    let identity_config = IdentityConfig {
        login_secret: server_config.login.widget_secret.clone(),
        jwt_secret: server_config.jwt.secret.clone(),
        max_assertion_age_secs: server_config.login.max_assertion_age_secs,
        session_ttl_secs: server_config.jwt.session_ttl_secs,
    };
    let identity_module = IdentityModule::new(Arc::clone(&sql), identity_config, notifier)
        .map_err(|e| anyhow::anyhow!("failed to initialize identity module: {}", e))?;
    info!("Identity module initialized");

    let module_routes = vec![(identity_module.name(), identity_module.routes())];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("taskmarket server listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
