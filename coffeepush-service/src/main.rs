use coffeepush_service::config::CoffeepushConfig;
use coffeepush_service::services::init_metrics;
use coffeepush_service::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = CoffeepushConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "coffeepush-service",
        "info",
        config.observability.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
