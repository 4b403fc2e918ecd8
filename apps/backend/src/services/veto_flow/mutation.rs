use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::domain::errors::VetoError;
use crate::domain::rules::Team;
use crate::domain::snapshot::VetoSnapshot;
use crate::domain::state::VetoState;
use crate::domain::transition::VetoOutcome;
use crate::domain::veto_transition::{derive_veto_transitions, VetoLifecycleView, VetoTransition};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::realtime::VetoEvent;
use crate::repos::rooms::{require_room, Room, RoomId};
use crate::services::veto_flow::VetoFlowService;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct VetoMutationResult {
    pub room: Room,
    pub old_version: i32,
    pub next_turn: Option<Team>,
    pub completed: bool,
    pub transitions: Vec<VetoTransition>,
}

impl VetoMutationResult {
    pub fn final_version(&self) -> i32 {
        self.room.version
    }

    pub fn state(&self) -> &VetoState {
        &self.room.state
    }
}

impl VetoFlowService {
    /// Read-validate-commit cycle with compare-and-swap on the room's turn stamp.
    ///
    /// A lost race re-reads and re-validates against the winner's state, so the
    /// loser gets a deterministic rule rejection rather than a merge. Only when
    /// every attempt loses a race does this report `OPTIMISTIC_LOCK`.
    pub(super) async fn run_mutation<F>(
        &self,
        app: &AppState,
        room_id: RoomId,
        mutation: F,
    ) -> Result<VetoMutationResult, AppError>
    where
        F: Fn(&VetoState, OffsetDateTime) -> Result<VetoOutcome, VetoError> + Send + Sync,
    {
        let attempts = app.config.cas_max_attempts.max(1);

        for attempt in 1..=attempts {
            let before = require_room(app.store(), room_id).await?;
            let expected = before.state.turn_stamp();

            let outcome = match mutation(&before.state, OffsetDateTime::now_utc()) {
                Ok(outcome) => outcome,
                Err(err) => {
                    if err.is_client_recoverable() {
                        debug!(room_id = %room_id, step = before.state.current_step, error = %err, "Veto action rejected");
                    }
                    return Err(err.into());
                }
            };

            // A state that cannot produce a snapshot is never committed.
            let snapshot = VetoSnapshot::from_state(&outcome.state)?;

            match app
                .store
                .commit(room_id, expected, outcome.state.clone())
                .await
            {
                Ok(after) => {
                    let transitions = derive_veto_transitions(
                        &VetoLifecycleView::of(before.version, &before.state),
                        &VetoLifecycleView::of(after.version, &after.state),
                    );
                    publish_committed(app, &after, snapshot, &transitions);

                    return Ok(VetoMutationResult {
                        old_version: before.version,
                        next_turn: outcome.next_turn,
                        completed: outcome.completed,
                        room: after,
                        transitions,
                    });
                }
                Err(err) if err.is_optimistic_lock() => {
                    warn!(room_id = %room_id, attempt, attempts, "Veto commit lost a race; retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::conflict(
            ErrorCode::OptimisticLock,
            format!("Room {room_id} kept changing during {attempts} attempt(s). Please refresh and retry."),
        ))
    }
}

/// Full snapshot first, then one event per edge.
///
/// Racing commits may reach this out of order; the hub drops events older
/// than the newest version it has sent for the room.
fn publish_committed(
    app: &AppState,
    room: &Room,
    snapshot: VetoSnapshot,
    transitions: &[VetoTransition],
) {
    let room_id = room.id;
    let version = room.version;
    let final_maps = snapshot.final_maps.clone();

    app.hub.publish(VetoEvent::VetoState {
        room_id,
        version,
        snapshot,
    });

    for transition in transitions {
        let event = match transition {
            VetoTransition::TurnBecame { team } => VetoEvent::TurnBecame {
                room_id,
                version,
                team: *team,
            },
            VetoTransition::SidePending { map_id, team } => VetoEvent::SidePending {
                room_id,
                version,
                map_id: map_id.clone(),
                team: *team,
            },
            VetoTransition::VetoCompleted => {
                let Some(maps) = final_maps.clone() else {
                    error!(room_id = %room_id, version, "Completed veto has no final maps");
                    continue;
                };
                info!(room_id = %room_id, version, maps = maps.len(), "Veto completed");
                VetoEvent::VetoCompleted {
                    room_id,
                    version,
                    final_maps: maps,
                }
            }
        };
        app.hub.publish(event);
    }
}
