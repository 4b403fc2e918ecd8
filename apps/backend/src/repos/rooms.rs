//! Room repository contract: committed veto state per room.

use async_trait::async_trait;
use ulid::Ulid;

use crate::domain::state::{TurnStamp, VetoState};
use crate::errors::domain::DomainError;

pub type RoomId = Ulid;

/// Room domain model as held by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    /// Bumped on every successful commit; starts at 1.
    pub version: i32,
    pub state: VetoState,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// Single-writer discipline per room.
///
/// `commit` is a compare-and-swap: it succeeds only when the stored state's
/// `TurnStamp` still equals `expected`, otherwise it fails with
/// `ConflictKind::OptimisticLock` and leaves the stored room untouched.
/// Readers only ever observe fully committed rooms.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist the initial state. Fails with `ConflictKind::RoomExists` on reuse.
    async fn create(&self, id: RoomId, state: VetoState) -> Result<Room, DomainError>;

    async fn find(&self, id: RoomId) -> Result<Option<Room>, DomainError>;

    async fn commit(
        &self,
        id: RoomId,
        expected: TurnStamp,
        next: VetoState,
    ) -> Result<Room, DomainError>;
}

/// Load a room or fail with `NotFoundKind::Room`.
pub async fn require_room(store: &dyn RoomStore, id: RoomId) -> Result<Room, DomainError> {
    store.find(id).await?.ok_or_else(|| {
        DomainError::not_found(
            crate::errors::domain::NotFoundKind::Room,
            format!("Room {id} not found"),
        )
    })
}
