use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, Response, header};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use crate::engine::types::{DEFAULT_NAMESPACE_CODE, Namespace};
use crate::frontend::context::FrontendContext;
use crate::shared::response::{JsonRenderer, Renderer, Response as ResponseType, StatusCode};

use super::HttpBody;
use super::search_runs::search_runs_arrow;

const SEARCH_RUNS_ARROW_PATH: &str = "/runs/search/arrow";

static NAMESPACE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/ns/([^/]+)(/.*)$").expect("valid namespace regex"));

/// Splits `/ns/<code>/rest` into `(Some(code), "/rest")`.
pub fn split_namespace(path: &str) -> (Option<&str>, &str) {
    match NAMESPACE_PREFIX.captures(path) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(code), Some(rest)) => (Some(code.as_str()), rest.as_str()),
            _ => (None, path),
        },
        None => (None, path),
    }
}

pub fn full_body(bytes: impl Into<Bytes>) -> HttpBody {
    Full::new(bytes.into())
        .map_err(|never: Infallible| match never {})
        .boxed()
}

/// JSON error envelope with the matching HTTP status.
pub fn render_error(message: &str, status: StatusCode) -> Response<HttpBody> {
    let renderer = JsonRenderer;
    let body = renderer.render(&ResponseType::error(status, message));
    Response::builder()
        .status(hyper::StatusCode::from(status))
        .header(header::CONTENT_TYPE, renderer.content_type())
        .body(full_body(body))
        .unwrap_or_else(|_| Response::new(full_body(Bytes::new())))
}

struct HttpHandler {
    ctx: Arc<FrontendContext>,
}

impl HttpHandler {
    fn new(ctx: Arc<FrontendContext>) -> Self {
        Self { ctx }
    }

    async fn handle<B>(&self, req: Request<B>) -> Result<Response<HttpBody>, Infallible> {
        let path = req.uri().path().to_string();

        if self.ctx.server_state.is_shutting_down() {
            return Ok(render_error(
                "Server is shutting down",
                StatusCode::ServiceUnavailable,
            ));
        }

        if path == "/health" {
            return Ok(Response::builder()
                .status(hyper::StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/plain")
                .body(full_body("OK"))
                .unwrap_or_else(|_| Response::new(full_body("OK"))));
        }

        let (code, route) = split_namespace(&path);
        match route {
            SEARCH_RUNS_ARROW_PATH => {
                if req.method() != Method::GET {
                    return Ok(render_error("Method Not Allowed", StatusCode::MethodNotAllowed));
                }
                let namespace = match self.resolve_namespace(code).await {
                    Ok(ns) => ns,
                    Err(resp) => return Ok(resp),
                };
                Ok(search_runs_arrow(Arc::clone(&self.ctx), namespace, req).await)
            }
            _ => Ok(render_error("Not Found", StatusCode::NotFound)),
        }
    }

    async fn resolve_namespace(
        &self,
        code: Option<&str>,
    ) -> Result<Namespace, Response<HttpBody>> {
        let code = code.unwrap_or(DEFAULT_NAMESPACE_CODE);
        match self.ctx.namespaces.get_by_code(code).await {
            Ok(Some(ns)) => {
                debug!(target: "run_export::http", code, id = ns.id, "Resolved namespace");
                Ok(ns)
            }
            Ok(None) => Err(render_error(
                &format!("namespace '{code}' not found"),
                StatusCode::NotFound,
            )),
            Err(e) => {
                error!("Failed to resolve namespace {}: {}", code, e);
                Err(render_error(
                    "error getting namespace from context",
                    StatusCode::InternalError,
                ))
            }
        }
    }
}

pub async fn handle_request<B>(
    req: Request<B>,
    ctx: Arc<FrontendContext>,
) -> Result<Response<HttpBody>, Infallible> {
    let handler = HttpHandler::new(ctx);
    handler.handle(req).await
}
