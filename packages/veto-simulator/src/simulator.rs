//! Drives complete vetoes through the real service with random legal moves.
//!
//! With a non-zero `mistake_rate` the simulator also throws in moves the
//! machine must reject (wrong team, banned map, missing side) and checks that
//! each rejection leaves the room untouched.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, trace};
use ulid::Ulid;
use veto_backend::domain::state::LoggedActionKind;
use veto_backend::domain::{expected_move, ExpectedMove, FinalMap, MapId, RoundFormat, Side, Team};
use veto_backend::repos::rooms::RoomId;
use veto_backend::{AppError, AppState, ErrorCode, RoomReady, VetoFlowService};

/// Outcome of one simulated veto.
#[derive(Debug, Clone)]
pub struct VetoResult {
    pub room_id: RoomId,
    pub format: RoundFormat,
    pub pool: Vec<MapId>,
    pub final_maps: Vec<FinalMap>,
    pub bans: Vec<(Team, MapId)>,
    pub accepted: usize,
    pub rejected: usize,
    pub final_version: i32,
}

pub struct Simulator {
    app: AppState,
    service: VetoFlowService,
    rng: StdRng,
    mistake_rate: f64,
}

impl Simulator {
    pub fn new(app: AppState, rng: StdRng, mistake_rate: f64) -> Self {
        Self {
            app,
            service: VetoFlowService::new(),
            rng,
            mistake_rate: mistake_rate.clamp(0.0, 1.0),
        }
    }

    pub async fn simulate_veto(
        &mut self,
        format: RoundFormat,
        pool: Vec<MapId>,
    ) -> Result<VetoResult, AppError> {
        let room_id = Ulid::new();
        let ready = self
            .service
            .room_ready(
                &self.app,
                RoomReady {
                    room_id,
                    round_format: format,
                    map_pool: pool.clone(),
                },
            )
            .await?;

        let mut accepted = 0;
        let mut rejected = 0;
        let mut version = ready.version;

        loop {
            let snapshot = self.service.get_state(&self.app, room_id).await?;
            let Some(expected) = expected_move(&snapshot.veto.state) else {
                break;
            };

            if self.rng.random_bool(self.mistake_rate) {
                self.play_mistake(room_id, &expected, &snapshot.veto.state.banned_maps)
                    .await?;
                rejected += 1;
                continue;
            }

            let result = match expected {
                ExpectedMove::SelectSide { team, map_id } => {
                    let side = self.random_side();
                    trace!(room_id = %room_id, team = %team, map_id = %map_id, ?side, "Simulated side selection");
                    self.service
                        .select_side(&self.app, room_id, team, &map_id, side)
                        .await?
                }
                ExpectedMove::Sequence {
                    team,
                    action,
                    side_required,
                    map_choices,
                    ..
                } => {
                    let map = map_choices[self.rng.random_range(0..map_choices.len())].clone();
                    let side = side_required.then(|| self.random_side());
                    trace!(room_id = %room_id, team = %team, action = %action, map = %map, "Simulated sequence step");
                    self.service
                        .submit_action(&self.app, room_id, team, action, &map, side)
                        .await?
                }
            };
            accepted += 1;
            version = result.final_version();
        }

        let done = self.service.audit_room(&self.app, room_id).await?;
        let bans = done
            .state
            .actions_log
            .iter()
            .filter(|a| a.kind == LoggedActionKind::Ban)
            .map(|a| (a.team, a.map_id.clone()))
            .collect();

        debug!(room_id = %room_id, format = %format, accepted, rejected, "Simulated veto finished");

        Ok(VetoResult {
            room_id,
            format,
            pool,
            final_maps: done.final_maps.unwrap_or_default(),
            bans,
            accepted,
            rejected,
            final_version: version,
        })
    }

    fn random_side(&mut self) -> Side {
        if self.rng.random_bool(0.5) {
            Side::Attack
        } else {
            Side::Defense
        }
    }

    /// Submit something the machine must refuse and verify nothing changed.
    async fn play_mistake(
        &mut self,
        room_id: RoomId,
        expected: &ExpectedMove,
        banned: &[MapId],
    ) -> Result<(), AppError> {
        let before = self.service.get_state(&self.app, room_id).await?;
        let wrong_team = expected.team().opponent();

        let outcome = match (expected, banned.first()) {
            (ExpectedMove::Sequence { action, team, .. }, Some(gone))
                if self.rng.random_bool(0.5) =>
            {
                self.service
                    .submit_action(&self.app, room_id, *team, *action, gone, None)
                    .await
            }
            (ExpectedMove::Sequence { action, map_choices, .. }, _) => {
                self.service
                    .submit_action(&self.app, room_id, wrong_team, *action, &map_choices[0], None)
                    .await
            }
            (ExpectedMove::SelectSide { map_id, .. }, _) => {
                self.service
                    .select_side(&self.app, room_id, wrong_team, map_id, Side::Attack)
                    .await
            }
        };

        match outcome {
            Ok(_) => Err(AppError::internal(
                ErrorCode::Internal,
                format!("Room {room_id} accepted an illegal move"),
            )),
            Err(err) if err.is_retryable() => {
                let after = self.service.get_state(&self.app, room_id).await?;
                if after != before {
                    return Err(AppError::internal(
                        ErrorCode::DataCorruption,
                        format!("Room {room_id} changed on a rejected move"),
                    ));
                }
                trace!(room_id = %room_id, code = %err.code(), "Illegal move rejected");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Plain pool of `count` maps named `map1..=mapN`.
pub fn default_pool(count: usize) -> Vec<MapId> {
    (1..=count).map(|i| format!("map{i}")).collect()
}

/// Pool size used when none is given: the format's picks plus four bans.
pub fn default_pool_size(format: RoundFormat) -> usize {
    format.required_picks() + 4
}
