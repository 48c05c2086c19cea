use serde::Deserialize;

use crate::engine::export::MAX_BATCH_SIZE;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub http_addr: String,
    #[serde(default = "default_keep_alive")]
    pub keep_alive: bool,
}

fn default_keep_alive() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON document loaded into the in-memory store at startup.
    pub seed_path: Option<String>,
    #[serde(default = "default_dialect")]
    pub dialect: String,
}

fn default_dialect() -> String {
    "memory".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            dialect: default_dialect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Rows per record batch, clamped to 1..=1000.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Capacity of the pipe between the stream writer and the HTTP body.
    #[serde(default = "default_stream_buffer_bytes")]
    pub stream_buffer_bytes: usize,
}

fn default_batch_size() -> usize {
    MAX_BATCH_SIZE
}

fn default_stream_buffer_bytes() -> usize {
    65536
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            stream_buffer_bytes: default_stream_buffer_bytes(),
        }
    }
}

impl ExportConfig {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_BATCH_SIZE)
    }
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("RUN_EXPORT_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(config_path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
