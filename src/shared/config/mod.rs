pub mod global;
pub mod model;

pub use global::CONFIG;
pub use model::{
    ExportConfig, LoggingConfig, ServerConfig, Settings, StoreConfig, load_settings,
    load_settings_from,
};
