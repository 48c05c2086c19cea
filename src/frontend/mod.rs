pub mod context;
pub mod http;
pub mod server_state;

use context::FrontendContext;
use std::sync::Arc;
use tracing::{info, warn};

use crate::shared::config::Settings;

pub async fn start_all(settings: &Settings) -> anyhow::Result<()> {
    let ctx = FrontendContext::from_config(settings)?;

    let state = Arc::clone(&ctx.server_state);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                state.signal_shutdown();
            }
            Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
        }
    });

    http::listener::run_http_server(ctx, &settings.server).await
}

#[cfg(test)]
mod server_state_test;
