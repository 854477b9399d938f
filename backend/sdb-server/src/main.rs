use sdb_server::{AppState, build_router, logger};

use sdb_auth::{AuthSettings, Authenticator};
use sdb_config::Config;
use sdb_db::{SqliteDatastore, open_catalog};

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let log_dir = Config::config_dir()?.join(&config.logging.dir);
        std::fs::create_dir_all(&log_dir)?;
        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting sdb-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Open the definition catalog
    let database_path = config.database_path()?;
    info!("Opening catalog: {}", database_path.display());
    let pool = open_catalog(&database_path).await?;

    let datastore = Arc::new(SqliteDatastore::new(pool));

    let settings = AuthSettings::from_config(&config.auth)?;
    if settings.root.is_none() {
        warn!("No root user configured, root logins are disabled");
    }
    info!(
        "Root logins accepted from {} network(s)",
        settings.allowed_networks.len()
    );

    let authenticator = Authenticator::new(settings, datastore.clone(), datastore);
    let app = build_router(AppState::new(authenticator));

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    })
    .await?;

    info!("Graceful shutdown complete");
    Ok(())
}
