//! In-process room store: one lock per room, compare-and-swap commits.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::state::{TurnStamp, VetoState};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::repos::rooms::{Room, RoomId, RoomStore};

#[derive(Default)]
pub struct InMemoryRoomStore {
    rooms: DashMap<RoomId, Arc<RwLock<Room>>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    fn slot(&self, id: RoomId) -> Option<Arc<RwLock<Room>>> {
        self.rooms.get(&id).map(|entry| entry.value().clone())
    }
}

/// The next state must extend the stored log by exactly one entry.
fn ensure_append_only(current: &VetoState, next: &VetoState) -> Result<(), DomainError> {
    let extends = next.actions_log.len() == current.actions_log.len() + 1
        && next.actions_log.starts_with(&current.actions_log)
        && next.round_format == current.round_format
        && next.map_pool == current.map_pool;
    if extends {
        Ok(())
    } else {
        Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            "commit does not append exactly one action to the stored log",
        ))
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create(&self, id: RoomId, state: VetoState) -> Result<Room, DomainError> {
        match self.rooms.entry(id) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::RoomExists,
                format!("Veto for room {id} already initialized"),
            )),
            Entry::Vacant(slot) => {
                let now = time::OffsetDateTime::now_utc();
                let room = Room {
                    id,
                    version: 1,
                    state,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(Arc::new(RwLock::new(room.clone())));
                Ok(room)
            }
        }
    }

    async fn find(&self, id: RoomId) -> Result<Option<Room>, DomainError> {
        Ok(self.slot(id).map(|room| room.read().clone()))
    }

    async fn commit(
        &self,
        id: RoomId,
        expected: TurnStamp,
        next: VetoState,
    ) -> Result<Room, DomainError> {
        let slot = self.slot(id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("Room {id} not found"))
        })?;

        let mut room = slot.write();
        let actual = room.state.turn_stamp();
        if actual != expected {
            debug!(room_id = %id, ?expected, ?actual, "Room moved since read");
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "Room {id} was modified concurrently (expected step {} / {} actions, found step {} / {} actions). Please refresh and retry.",
                    expected.current_step,
                    expected.actions_logged,
                    actual.current_step,
                    actual.actions_logged
                ),
            ));
        }
        ensure_append_only(&room.state, &next)?;

        room.state = next;
        room.version += 1;
        room.updated_at = time::OffsetDateTime::now_utc();
        Ok(room.clone())
    }
}
