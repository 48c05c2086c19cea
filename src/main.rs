use run_export::frontend::start_all;
use run_export::logging;
use run_export::shared::config::CONFIG;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(&CONFIG.logging)?;

    info!(http_addr = %CONFIG.server.http_addr, "run_export is starting...");
    start_all(&CONFIG).await?;

    Ok(())
}
