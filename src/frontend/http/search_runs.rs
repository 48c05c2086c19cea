use std::sync::Arc;
use std::time::Instant;

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::{Request, Response, header};
use tokio_util::io::ReaderStream;
use tracing::{error, info};

use crate::command::predicate::PredicateResolver;
use crate::command::request::{SearchRunsRequest, TIMEZONE_OFFSET_HEADER};
use crate::engine::export::{ExportRequest, Include, RunExportWriter, prepare_export};
use crate::engine::types::Namespace;
use crate::frontend::context::FrontendContext;
use crate::shared::response::{ARROW_STREAM_CONTENT_TYPE, StatusCode};

use super::HttpBody;
use super::handler::render_error;

/// `GET [/ns/<code>]/runs/search/arrow`
///
/// Every store read happens before the response is built, so failures up to
/// that point are JSON errors. The stream itself is produced by a spawned
/// task writing into a bounded pipe that backs the response body.
pub async fn search_runs_arrow<B>(
    ctx: Arc<FrontendContext>,
    namespace: Namespace,
    req: Request<B>,
) -> Response<HttpBody> {
    let (parts, _) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();

    let tz_header = match parts.headers.get(TIMEZONE_OFFSET_HEADER) {
        Some(value) => match value.to_str() {
            Ok(raw) => Some(raw),
            Err(_) => {
                return render_error(
                    "x-timezone-offset header is not a valid integer",
                    StatusCode::UnprocessableEntity,
                );
            }
        },
        None => None,
    };

    let params = match SearchRunsRequest::parse(parts.uri.query(), tz_header) {
        Ok(params) => params,
        Err(e) => return render_error(&e.to_string(), StatusCode::UnprocessableEntity),
    };

    let resolver = PredicateResolver::for_run_search(params.tz_offset, ctx.runs.dialect());
    let predicate = match resolver.resolve(&params.query) {
        Ok(predicate) => predicate,
        Err(e) => return render_error(&e.to_string(), StatusCode::BadRequest),
    };

    let request = ExportRequest {
        namespace_id: namespace.id,
        predicate,
        limit: params.limit,
        offset: params.offset,
        report_progress: params.report_progress,
        include: Include {
            params: !params.exclude_params,
            traces: !params.exclude_traces,
        },
    };

    let prepared = match prepare_export(ctx.runs.as_ref(), ctx.attributes.as_ref(), request).await {
        Ok(prepared) => prepared,
        Err(e) => {
            e.log_error();
            return render_error(&e.to_string(), StatusCode::InternalError);
        }
    };

    let (mut pipe, reader) = tokio::io::duplex(ctx.export.stream_buffer_bytes.max(1));
    let batch_size = ctx.export.effective_batch_size();

    tokio::spawn(async move {
        let start = Instant::now();
        match RunExportWriter::new(&mut pipe, batch_size)
            .write(&prepared)
            .await
        {
            Ok(summary) => {
                info!(
                    target: "run_export::http",
                    rows = summary.rows,
                    batches = summary.batches,
                    "Streamed runs"
                );
            }
            Err(e) => {
                error!(
                    "Error encountered in {} {}: error streaming runs: {}",
                    method, path, e
                );
            }
        }
        info!("body - {:?} {} {}", start.elapsed(), method, path);
    });

    let stream = ReaderStream::new(reader).map_ok(Frame::data);
    let body: HttpBody = StreamBody::new(stream).boxed();

    Response::builder()
        .status(hyper::StatusCode::OK)
        .header(header::CONTENT_TYPE, ARROW_STREAM_CONTENT_TYPE)
        .body(body)
        .unwrap_or_else(|_| render_error("failed to build response", StatusCode::InternalError))
}
