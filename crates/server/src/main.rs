use labelpress::{LabelPipeline, Settings};
use labelpress_server::{AppState, build_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting labelpress server...");

    let settings = Settings::load()?;
    let addr = settings.bind_address();
    tracing::info!("Configuration loaded");

    let pipeline = LabelPipeline::from_settings(settings)?;
    let app = build_router(AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("labelpress listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  /api/v1/labels/:id");
    tracing::info!("  - POST /api/v1/labels/batch");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,labelpress=debug,labelpress_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
