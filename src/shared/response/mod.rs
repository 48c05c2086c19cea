pub mod arrow;
pub mod json;
pub mod render;
pub mod types;

pub use types::{Response, StatusCode};

pub use arrow::{ARROW_STREAM_CONTENT_TYPE, ArrowStreamEncoder};
pub use json::JsonRenderer;
pub use render::Renderer;
