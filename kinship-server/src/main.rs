use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use kinship::config::{ConfigBuilder, ConfigLoader, KinshipConfig};
use kinship_server::{AppState, cli::CliArgs, config::ServerConfig, create_router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let filter = match cli_args.log_level {
        Some(ref level) => EnvFilter::new(level),
        None => EnvFilter::from_default_env(),
    }
    .add_directive("surrealdb_core=warn".parse()?)
    .add_directive("surrealdb=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Kinship server v{}", kinship::VERSION);

    let server_config = ServerConfig::from_cli_and_env(cli_args)?;
    info!("Server configuration loaded");

    let kinship_config = load_kinship_config(&server_config)?;
    let kinship = kinship::init(kinship_config).await?;
    info!("Kinship services initialized");

    let state = Arc::new(AppState::new(kinship, server_config.clone()));

    let app = create_router(state)
        .layer(RequestBodyLimitLayer::new(server_config.max_request_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Library configuration from the given file merged with the environment,
/// or production defaults when no file is given
fn load_kinship_config(server_config: &ServerConfig) -> Result<KinshipConfig> {
    match &server_config.config_file_path {
        Some(config_file) => {
            info!("Loading Kinship configuration from: {}", config_file.display());
            let mut loader = ConfigLoader::new();
            loader.load_file(config_file)?;
            loader.load_env();
            Ok(loader.extract()?)
        }
        None => {
            info!("No config file provided, searching default locations");
            let mut loader = ConfigLoader::with_defaults(ConfigBuilder::defaults().build()?);
            loader.load_default_files().load_env();
            Ok(loader.extract()?)
        }
    }
}
