use std::sync::Arc;

use crate::adapters::InMemoryRoomStore;
use crate::config::VetoConfig;
use crate::error::AppError;
use crate::realtime::RoomHub;
use crate::repos::rooms::RoomStore;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and binaries)
pub struct StateBuilder {
    config: Option<VetoConfig>,
    store: Option<Arc<dyn RoomStore>>,
}

impl std::fmt::Debug for StateBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateBuilder")
            .field("config", &self.config)
            .field("store", &self.store.as_ref().map(|_| "dyn RoomStore"))
            .finish()
    }
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
        }
    }

    pub fn with_config(mut self, config: VetoConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Read configuration from `VETO_*` environment variables.
    pub fn with_env_config(self) -> Result<Self, AppError> {
        Ok(self.with_config(VetoConfig::from_env()?))
    }

    pub fn with_store(mut self, store: Arc<dyn RoomStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryRoomStore::new()));
        let hub = Arc::new(RoomHub::new(config.event_channel_capacity));
        Ok(AppState::new(store, hub, config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
