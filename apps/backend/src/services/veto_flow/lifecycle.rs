use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{error, info};

use super::{RoomSnapshot, VetoFlowService};
use crate::config::VetoConfig;
use crate::domain::rules::{MapId, RoundFormat};
use crate::domain::snapshot::VetoSnapshot;
use crate::domain::state::VetoState;
use crate::domain::transition::replay;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};
use crate::realtime::VetoEvent;
use crate::repos::rooms::{require_room, RoomId};
use crate::state::AppState;

/// Emitted once by room lifecycle logic when both teams are ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomReady {
    pub room_id: RoomId,
    pub round_format: RoundFormat,
    pub map_pool: Vec<MapId>,
}

/// Setup checks on a pool before any sequence is generated.
pub fn validate_pool(config: &VetoConfig, pool: &[MapId]) -> Result<(), DomainError> {
    if pool.len() < config.min_pool_size || pool.len() > config.max_pool_size {
        return Err(DomainError::validation(
            ValidationKind::InvalidPool,
            format!(
                "Map pool must hold {}..={} maps, got {}",
                config.min_pool_size,
                config.max_pool_size,
                pool.len()
            ),
        ));
    }
    let mut seen = HashSet::with_capacity(pool.len());
    for map in pool {
        if map.trim().is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidPool,
                "Map ids must not be blank",
            ));
        }
        if !seen.insert(map.as_str()) {
            return Err(DomainError::validation(
                ValidationKind::InvalidPool,
                format!("Map '{map}' appears more than once in the pool"),
            ));
        }
    }
    Ok(())
}

impl VetoFlowService {
    /// Build and persist the initial veto state for a ready room.
    pub async fn room_ready(&self, app: &AppState, ready: RoomReady) -> Result<RoomSnapshot, AppError> {
        let RoomReady {
            room_id,
            round_format,
            map_pool,
        } = ready;

        validate_pool(&app.config, &map_pool)?;
        let state = VetoState::new(round_format, map_pool)?;
        let room = app.store.create(room_id, state).await?;

        info!(
            room_id = %room_id,
            format = %round_format,
            maps = room.state.map_pool.len(),
            steps = room.state.sequence.len(),
            "Veto initialized"
        );

        let snapshot = RoomSnapshot::from_room(&room)?;
        app.hub.publish(VetoEvent::VetoState {
            room_id,
            version: room.version,
            snapshot: snapshot.veto.clone(),
        });
        Ok(snapshot)
    }

    /// Complete snapshot for polling clients and late-joining spectators.
    pub async fn get_state(&self, app: &AppState, room_id: RoomId) -> Result<RoomSnapshot, AppError> {
        let room = require_room(app.store(), room_id).await?;
        Ok(RoomSnapshot::from_room(&room)?)
    }

    /// Subscribe to a room's event stream. The room must exist.
    ///
    /// Events older than the version read here are never delivered.
    pub async fn subscribe(
        &self,
        app: &AppState,
        room_id: RoomId,
    ) -> Result<broadcast::Receiver<VetoEvent>, AppError> {
        let room = require_room(app.store(), room_id).await?;
        Ok(app.hub.subscribe(room_id, room.version))
    }

    /// Rebuild the room from its action log and compare with the stored state.
    pub async fn audit_room(&self, app: &AppState, room_id: RoomId) -> Result<VetoSnapshot, AppError> {
        let room = require_room(app.store(), room_id).await?;
        let stored = &room.state;
        let rebuilt = replay(stored.round_format, stored.map_pool.clone(), &stored.actions_log)?;

        if &rebuilt != stored {
            error!(room_id = %room_id, version = room.version, "Stored veto diverges from its action log");
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Room {room_id} state does not match its action log"),
            )
            .into());
        }
        stored.check_invariants()?;
        Ok(VetoSnapshot::from_state(stored)?)
    }
}
