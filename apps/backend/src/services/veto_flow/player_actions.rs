use tracing::{debug, info};

use super::mutation::VetoMutationResult;
use super::VetoFlowService;
use crate::domain::rules::{ActionKind, Side, Team};
use crate::domain::transition;
use crate::error::AppError;
use crate::repos::rooms::RoomId;
use crate::state::AppState;

impl VetoFlowService {
    /// Submit the ban or pick for the current sequence step.
    ///
    /// `side` is required only for an inline-side final pick (BO1/BO3) and
    /// forbidden everywhere else.
    pub async fn submit_action(
        &self,
        app: &AppState,
        room_id: RoomId,
        actor: Team,
        kind: ActionKind,
        map_id: &str,
        side: Option<Side>,
    ) -> Result<VetoMutationResult, AppError> {
        debug!(room_id = %room_id, team = %actor, action = %kind, map_id, ?side, "Submitting veto action");

        let result = self
            .run_mutation(app, room_id, |state, at| {
                transition::submit_action(state, actor, kind, map_id, side, at)
            })
            .await?;

        info!(
            room_id = %room_id,
            team = %actor,
            action = %kind,
            map_id,
            step = result.state().current_step,
            version = result.final_version(),
            completed = result.completed,
            "Veto action accepted"
        );
        Ok(result)
    }

    /// Choose the starting side for the pick awaiting this team's decision.
    pub async fn select_side(
        &self,
        app: &AppState,
        room_id: RoomId,
        actor: Team,
        map_id: &str,
        side: Side,
    ) -> Result<VetoMutationResult, AppError> {
        debug!(room_id = %room_id, team = %actor, map_id, ?side, "Selecting side");

        let result = self
            .run_mutation(app, room_id, |state, at| {
                transition::select_side(state, actor, map_id, side, at)
            })
            .await?;

        info!(
            room_id = %room_id,
            team = %actor,
            map_id,
            ?side,
            version = result.final_version(),
            completed = result.completed,
            "Side selected"
        );
        Ok(result)
    }
}
