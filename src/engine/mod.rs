pub mod errors;
pub mod export;
pub mod store;
pub mod types;

pub use errors::*;
