use std::sync::Arc;

use crate::config::VetoConfig;
use crate::realtime::RoomHub;
use crate::repos::rooms::RoomStore;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Committed veto state per room
    pub store: Arc<dyn RoomStore>,
    /// Per-room notification channels
    pub hub: Arc<RoomHub>,
    pub config: VetoConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn RoomStore>, hub: Arc<RoomHub>, config: VetoConfig) -> Self {
        Self { store, hub, config }
    }

    pub fn store(&self) -> &dyn RoomStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
