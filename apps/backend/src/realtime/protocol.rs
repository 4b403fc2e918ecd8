use serde::{Deserialize, Serialize};

use crate::domain::completion::FinalMap;
use crate::domain::rules::{MapId, Team};
use crate::domain::snapshot::VetoSnapshot;
use crate::repos::rooms::RoomId;

/// Events fanned out to a room's subscribers after each commit.
///
/// Every commit emits a `VetoState` with the full snapshot; edge events follow.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VetoEvent {
    VetoState {
        room_id: RoomId,
        version: i32,
        snapshot: VetoSnapshot,
    },
    TurnBecame {
        room_id: RoomId,
        version: i32,
        team: Team,
    },
    SidePending {
        room_id: RoomId,
        version: i32,
        map_id: MapId,
        team: Team,
    },
    VetoCompleted {
        room_id: RoomId,
        version: i32,
        final_maps: Vec<FinalMap>,
    },
}

impl VetoEvent {
    pub fn room_id(&self) -> RoomId {
        match self {
            VetoEvent::VetoState { room_id, .. }
            | VetoEvent::TurnBecame { room_id, .. }
            | VetoEvent::SidePending { room_id, .. }
            | VetoEvent::VetoCompleted { room_id, .. } => *room_id,
        }
    }

    pub fn version(&self) -> i32 {
        match self {
            VetoEvent::VetoState { version, .. }
            | VetoEvent::TurnBecame { version, .. }
            | VetoEvent::SidePending { version, .. }
            | VetoEvent::VetoCompleted { version, .. } => *version,
        }
    }
}
