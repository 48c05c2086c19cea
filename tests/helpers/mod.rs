pub mod factories;
pub mod factory;
pub mod faulty_store;
