//! Veto flow service - bridges the pure veto machine with the room store and
//! the notification hub.

mod lifecycle;
mod mutation;
mod player_actions;

use serde::{Deserialize, Serialize};

use crate::domain::errors::VetoError;
use crate::domain::snapshot::VetoSnapshot;
use crate::repos::rooms::{Room, RoomId};

pub use lifecycle::{validate_pool, RoomReady};
pub use mutation::VetoMutationResult;

/// Veto flow service. Stateless; shared resources come from `AppState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct VetoFlowService;

impl VetoFlowService {
    pub fn new() -> Self {
        Self
    }
}

/// Snapshot of one room as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub version: i32,
    pub veto: VetoSnapshot,
}

impl RoomSnapshot {
    pub fn from_room(room: &Room) -> Result<Self, VetoError> {
        Ok(Self {
            room_id: room.id,
            version: room.version,
            veto: VetoSnapshot::from_state(&room.state)?,
        })
    }
}
