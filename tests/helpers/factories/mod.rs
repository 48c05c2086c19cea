pub mod run_factory;
pub mod store_factory;

pub use run_factory::RunFactory;
pub use store_factory::StoreFactory;

#[cfg(test)]
mod run_factory_test;
#[cfg(test)]
mod store_factory_test;
