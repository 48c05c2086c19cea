use serde::Serialize;
use serde_json::Value;

use crate::shared::response::render::Renderer;
use crate::shared::response::types::{Response, ResponseBody};

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonResponse<'a> {
    status: u16,
    message: &'a str,
    count: usize,
    results: Vec<Value>,
}

impl Renderer for JsonRenderer {
    fn render(&self, response: &Response) -> Vec<u8> {
        let results = match &response.body {
            ResponseBody::Lines(lines) => lines.iter().map(|s| Value::from(s.as_str())).collect(),
            ResponseBody::JsonArray(values) => values.clone(),
        };

        let payload = JsonResponse {
            status: response.status.code(),
            message: &response.message,
            count: response.count,
            results,
        };

        let mut buf = serde_json::to_vec(&payload).unwrap_or_else(|_| {
            b"{\"status\":500,\"message\":\"Failed to serialize JSON\",\"count\":0,\"results\":[]}"
                .to_vec()
        });
        buf.push(b'\n');
        buf
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
