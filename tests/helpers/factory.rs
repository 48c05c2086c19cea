pub use super::factories::{RunFactory, StoreFactory};

pub struct Factory;

impl Factory {
    pub fn run() -> RunFactory {
        RunFactory::new()
    }

    pub fn store() -> StoreFactory {
        StoreFactory::new()
    }
}
