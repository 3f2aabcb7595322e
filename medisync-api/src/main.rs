use medisync_api::{build_router, ApiConfig, ApiError, AppState, HospitalStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ApiConfig::from_env()?;
    let store = HospitalStore::open(&config.db_path)?;
    info!(db = %config.db_path.display(), "hospital registry opened");

    let app = build_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "medisync-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
