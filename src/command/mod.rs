pub mod parser;
pub mod predicate;
pub mod request;
pub mod types;

pub use types::{CompareOp, Expr};

#[cfg(test)]
mod request_tests;
