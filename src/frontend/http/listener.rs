use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::frontend::context::FrontendContext;
use crate::shared::config::ServerConfig;

use super::handler::handle_request;

pub async fn run_http_server(ctx: Arc<FrontendContext>, cfg: &ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = cfg.http_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("HTTP server running at http://{addr}/runs/search/arrow");
    serve(listener, ctx, cfg.keep_alive).await
}

/// Accept loop; returns once the shutdown flag is raised.
pub async fn serve(
    listener: TcpListener,
    ctx: Arc<FrontendContext>,
    keep_alive: bool,
) -> anyhow::Result<()> {
    loop {
        if ctx.server_state.is_shutting_down() {
            info!("HTTP server shutting down, not accepting new connections");
            break;
        }

        // Use select to make accept cancellable on shutdown
        let accept_result = tokio::select! {
            result = listener.accept() => result,
            _ = async {
                loop {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    if ctx.server_state.is_shutting_down() {
                        break;
                    }
                }
            } => {
                info!("HTTP server shutting down, stopping accept loop");
                break;
            }
        };

        let (stream, peer_addr) = match accept_result {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to accept HTTP connection: {}", e);
                continue;
            }
        };
        debug!(target: "run_export::http", %peer_addr, "Accepted connection");
        let io = TokioIo::new(stream);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let mut builder = hyper::server::conn::http1::Builder::new();
            builder.keep_alive(keep_alive);

            if let Err(err) = builder
                .serve_connection(
                    io,
                    service_fn(move |req| handle_request(req, Arc::clone(&ctx))),
                )
                .await
            {
                // Clients hanging up mid-stream are routine
                let text = err.to_string();
                if !text.contains("connection closed")
                    && !text.contains("broken pipe")
                    && !text.contains("Connection reset")
                {
                    warn!("Error serving connection: {:?}", err);
                }
            }
        });
    }

    info!("HTTP server shutdown complete");
    Ok(())
}
