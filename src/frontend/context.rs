use std::sync::Arc;

use anyhow::bail;
use tracing::{info, warn};

use crate::engine::store::{AttributeStore, MemoryStore, NamespaceStore, RunStore};
use crate::frontend::server_state::ServerState;
use crate::shared::config::{ExportConfig, Settings};

#[derive(Clone)]
pub struct FrontendContext {
    pub runs: Arc<dyn RunStore>,
    pub attributes: Arc<dyn AttributeStore>,
    pub namespaces: Arc<dyn NamespaceStore>,
    pub export: ExportConfig,
    pub server_state: Arc<ServerState>,
}

impl FrontendContext {
    /// Context backed by a single in-memory store.
    pub fn with_memory_store(store: Arc<MemoryStore>, export: ExportConfig) -> Arc<Self> {
        Arc::new(Self {
            runs: Arc::clone(&store) as Arc<dyn RunStore>,
            attributes: Arc::clone(&store) as Arc<dyn AttributeStore>,
            namespaces: store as Arc<dyn NamespaceStore>,
            export,
            server_state: Arc::new(ServerState::new()),
        })
    }

    pub fn from_config(settings: &Settings) -> anyhow::Result<Arc<Self>> {
        let store = match settings.store.seed_path.as_deref() {
            Some(path) => MemoryStore::from_seed_file(path)?,
            None => {
                warn!("No store.seed_path configured, starting with an empty store");
                let store = MemoryStore::new();
                store.ensure_default_namespace();
                store
            }
        };

        if store.dialect() != settings.store.dialect {
            bail!(
                "store dialect '{}' is not supported, expected '{}'",
                settings.store.dialect,
                store.dialect()
            );
        }
        info!(dialect = %settings.store.dialect, "Run store ready");

        Ok(Self::with_memory_store(Arc::new(store), settings.export.clone()))
    }
}
