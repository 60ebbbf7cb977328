use anyhow::Context;

use venuehub_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load venuehub settings")?;

    venuehub_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        host = %settings.server.host,
        port = settings.server.port,
        "venuehub bootstrap starting"
    );

    venuehub_app::run(settings).await
}
