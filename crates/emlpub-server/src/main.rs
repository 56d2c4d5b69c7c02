use emlpub_core::logging_facility::{init, Profile};
use emlpub_server::{build_router, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    let profile: Profile = config
        .logging
        .profile
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    init(profile);

    tracing::info!(
        storage_root = %config.storage.root.display(),
        database = %config.database.path.display(),
        "configuration loaded"
    );

    let addr = config.listen_addr();
    let app = build_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("emlpub server listening on {}", addr);
    tracing::info!("  - GET|POST /api/publishPackage");
    tracing::info!("  - GET      /api/listPackages");
    tracing::info!("  - GET      /health");

    axum::serve(listener, app).await?;

    Ok(())
}
