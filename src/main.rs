use anyhow::Context;
use catalog_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    catalog_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        db = %settings.database.name,
        "catalog-service bootstrap starting"
    );

    if let Err(err) = catalog_service::run(settings).await {
        tracing::error!(error = ?err, "catalog-service terminated");
        return Err(err);
    }

    Ok(())
}
