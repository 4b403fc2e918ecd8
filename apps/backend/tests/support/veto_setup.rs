//! Room setup and drivers shared by the service suites.

use backend_test_support::unique_helpers::numbered_pool;
use ulid::Ulid;
use veto_backend::domain::{expected_move, ActionKind, ExpectedMove, RoundFormat, Side, Team};
use veto_backend::repos::rooms::RoomId;
use veto_backend::{AppError, AppState, RoomReady, RoomSnapshot, VetoFlowService, VetoMutationResult};

pub struct ReadyRoom {
    pub room_id: RoomId,
    pub snapshot: RoomSnapshot,
}

/// Create a room over `m1..=mN` and initialize its veto.
pub async fn ready_room(
    app: &AppState,
    format: RoundFormat,
    map_count: usize,
) -> Result<ReadyRoom, AppError> {
    let room_id = Ulid::new();
    let snapshot = VetoFlowService
        .room_ready(
            app,
            RoomReady {
                room_id,
                round_format: format,
                map_pool: numbered_pool(map_count),
            },
        )
        .await?;
    Ok(ReadyRoom { room_id, snapshot })
}

pub async fn ban(
    app: &AppState,
    room_id: RoomId,
    team: Team,
    map: &str,
) -> Result<VetoMutationResult, AppError> {
    VetoFlowService
        .submit_action(app, room_id, team, ActionKind::Ban, map, None)
        .await
}

pub async fn pick(
    app: &AppState,
    room_id: RoomId,
    team: Team,
    map: &str,
    side: Option<Side>,
) -> Result<VetoMutationResult, AppError> {
    VetoFlowService
        .submit_action(app, room_id, team, ActionKind::Pick, map, side)
        .await
}

pub async fn choose_side(
    app: &AppState,
    room_id: RoomId,
    team: Team,
    map: &str,
    side: Side,
) -> Result<VetoMutationResult, AppError> {
    VetoFlowService
        .select_side(app, room_id, team, map, side)
        .await
}

/// Play whatever the room expects next, always taking the first open map.
///
/// Returns `None` once nothing is expected.
pub async fn play_expected(
    app: &AppState,
    room_id: RoomId,
) -> Result<Option<VetoMutationResult>, AppError> {
    let snapshot = VetoFlowService.get_state(app, room_id).await?;
    let Some(expected) = expected_move(&snapshot.veto.state) else {
        return Ok(None);
    };

    let result = match expected {
        ExpectedMove::SelectSide { team, map_id } => {
            choose_side(app, room_id, team, &map_id, Side::Defense).await?
        }
        ExpectedMove::Sequence {
            team,
            action,
            side_required,
            map_choices,
            ..
        } => {
            let map = map_choices
                .first()
                .cloned()
                .expect("an expected step always has an open map");
            let side = side_required.then_some(Side::Attack);
            VetoFlowService
                .submit_action(app, room_id, team, action, &map, side)
                .await?
        }
    };
    Ok(Some(result))
}

/// Drive the room to completion; returns every accepted mutation in order.
pub async fn drive_to_completion(
    app: &AppState,
    room_id: RoomId,
) -> Result<Vec<VetoMutationResult>, AppError> {
    let mut results = Vec::new();
    while let Some(result) = play_expected(app, room_id).await? {
        results.push(result);
    }
    Ok(results)
}
