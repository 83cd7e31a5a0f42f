//! # Estado Compartido
//! src/state.rs
//!
//! Todo lo que los handlers necesitan, construido una sola vez al
//! arrancar y compartido entre threads con `Arc<AppState>`.

use crate::config::Config;
use crate::metrics::MetricsCollector;
use crate::students::RecordStore;

pub struct AppState {
    pub store: RecordStore,
    pub metrics: MetricsCollector,

    /// Habilita `DELETE /students/{code}?purge=true`
    pub allow_hard_delete: bool,
}

impl AppState {
    pub fn new(allow_hard_delete: bool) -> Self {
        Self {
            store: RecordStore::new(),
            metrics: MetricsCollector::new(),
            allow_hard_delete,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.allow_hard_delete)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(false)
    }
}
