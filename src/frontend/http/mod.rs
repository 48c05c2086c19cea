pub mod handler;
pub mod listener;
pub mod search_runs;

use bytes::Bytes;
use http_body_util::combinators::BoxBody;

/// Response body shared by buffered and streamed responses.
pub type HttpBody = BoxBody<Bytes, std::io::Error>;
