//! Veto state machine: validate one action, apply it to a copy, report the
//! next turn. Inputs are never modified; a rejection leaves nothing behind.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::completion::is_complete;
use crate::domain::errors::VetoError;
use crate::domain::rules::{ActionKind, MapId, RoundFormat, Side, Team};
use crate::domain::side_policy::{side_rule, SideRule};
use crate::domain::state::{LoggedActionKind, PickedMap, VetoAction, VetoPhase, VetoState};

/// Result of an accepted action.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct VetoOutcome {
    pub state: VetoState,
    pub next_turn: Option<Team>,
    pub completed: bool,
}

impl VetoOutcome {
    fn from_state(state: VetoState) -> Self {
        Self {
            next_turn: state.current_turn(),
            completed: is_complete(&state),
            state,
        }
    }
}

/// Validate and apply a formal sequence action (ban or pick).
///
/// Checks run in a fixed order: turn, action kind, map availability, side rule.
pub fn submit_action(
    state: &VetoState,
    actor: Team,
    kind: ActionKind,
    map_id: &str,
    side: Option<Side>,
    at: OffsetDateTime,
) -> Result<VetoOutcome, VetoError> {
    state.ensure_well_formed()?;

    if let VetoPhase::PendingSide {
        map_id: pending,
        resolving_team,
    } = &state.phase
    {
        if actor != *resolving_team {
            return Err(VetoError::WrongTurn(format!(
                "team {actor} cannot act while team {resolving_team} chooses a side for '{pending}'"
            )));
        }
        return Err(VetoError::WrongAction(format!(
            "side selection for '{pending}' must happen before the next {kind}"
        )));
    }

    let index = state.current_step;
    let Some(step) = state.sequence.get(index) else {
        return Err(VetoError::WrongTurn("veto is already complete".into()));
    };

    if actor != step.team {
        return Err(VetoError::WrongTurn(format!(
            "step {index} belongs to team {}, not team {actor}",
            step.team
        )));
    }
    if kind != step.action {
        return Err(VetoError::WrongAction(format!(
            "step {index} expects a {}, got a {kind}",
            step.action
        )));
    }
    if !state.is_available(map_id) {
        return Err(VetoError::MapUnavailable(format!(
            "map '{map_id}' is not available"
        )));
    }

    let rule = side_rule(
        state.round_format,
        step,
        index + 1 == state.sequence.len(),
    );
    match (rule, side) {
        (SideRule::PickerInline, None) => {
            return Err(VetoError::SideRuleViolation(format!(
                "final {} pick must carry the opponent's side",
                state.round_format
            )));
        }
        (SideRule::NoSide, Some(_)) => {
            return Err(VetoError::SideRuleViolation(
                "bans do not carry a side".into(),
            ));
        }
        (SideRule::OpponentSelectsAfter, Some(_)) => {
            return Err(VetoError::SideRuleViolation(format!(
                "team {} chooses the side for this pick",
                actor.opponent()
            )));
        }
        _ => {}
    }

    let mut next = state.clone();
    take_available(&mut next, map_id)?;

    match kind {
        ActionKind::Ban => next.banned_maps.push(map_id.to_string()),
        ActionKind::Pick => {
            let mut picked = PickedMap::unresolved(map_id.to_string(), actor);
            match (rule, side) {
                // The picker submits the call; the side belongs to the opponent.
                (SideRule::PickerInline, Some(chosen)) => {
                    picked.resolve_side(actor.opponent(), chosen)
                }
                (SideRule::OpponentSelectsAfter, _) => {
                    next.phase = VetoPhase::PendingSide {
                        map_id: map_id.to_string(),
                        resolving_team: actor.opponent(),
                    };
                }
                _ => {}
            }
            next.picked_maps.push(picked);
        }
    }

    next.actions_log.push(VetoAction {
        kind: kind.into(),
        map_id: map_id.to_string(),
        side,
        team: actor,
        step: index,
        timestamp: at,
    });
    next.sequence[index].completed = true;
    next.current_step = index + 1;

    Ok(VetoOutcome::from_state(next))
}

/// Resolve the side of the pick awaiting the opponent's choice.
pub fn select_side(
    state: &VetoState,
    actor: Team,
    map_id: &str,
    side: Side,
    at: OffsetDateTime,
) -> Result<VetoOutcome, VetoError> {
    state.ensure_well_formed()?;

    let (pending, resolving_team) = match &state.phase {
        VetoPhase::PendingSide {
            map_id,
            resolving_team,
        } => (map_id.clone(), *resolving_team),
        VetoPhase::Normal => {
            return match state.current_turn() {
                Some(team) if team == actor => Err(VetoError::WrongAction(format!(
                    "no side selection pending; team {actor} must submit step {}",
                    state.current_step
                ))),
                Some(team) => Err(VetoError::WrongTurn(format!(
                    "no side selection pending and the turn belongs to team {team}"
                ))),
                None => Err(VetoError::WrongTurn("veto is already complete".into())),
            };
        }
    };

    if actor != resolving_team {
        return Err(VetoError::WrongTurn(format!(
            "team {resolving_team} chooses the side for '{pending}'"
        )));
    }
    if map_id != pending {
        return Err(VetoError::MapUnavailable(format!(
            "map '{map_id}' has no pending side selection (pending: '{pending}')"
        )));
    }

    let mut next = state.clone();
    let picked = next
        .picked_maps
        .iter_mut()
        .find(|p| p.map_id == pending && !p.is_resolved())
        .ok_or_else(|| {
            VetoError::invalid_state(format!(
                "pending side for '{pending}' has no unresolved picked map"
            ))
        })?;
    picked.resolve_side(actor, side);

    next.phase = VetoPhase::Normal;
    next.actions_log.push(VetoAction {
        kind: LoggedActionKind::SideSelect,
        map_id: pending,
        side: Some(side),
        team: actor,
        step: state.current_step.saturating_sub(1),
        timestamp: at,
    });

    Ok(VetoOutcome::from_state(next))
}

fn take_available(state: &mut VetoState, map_id: &str) -> Result<(), VetoError> {
    let pos = state
        .available_maps
        .iter()
        .position(|m| m == map_id)
        .ok_or_else(|| VetoError::MapUnavailable(format!("map '{map_id}' is not available")))?;
    state.available_maps.remove(pos);
    Ok(())
}

/// Re-apply one logged entry through the same validation as live traffic.
pub fn apply_logged(state: &VetoState, action: &VetoAction) -> Result<VetoState, VetoError> {
    let outcome = match action.kind {
        LoggedActionKind::Ban => submit_action(
            state,
            action.team,
            ActionKind::Ban,
            &action.map_id,
            action.side,
            action.timestamp,
        ),
        LoggedActionKind::Pick => submit_action(
            state,
            action.team,
            ActionKind::Pick,
            &action.map_id,
            action.side,
            action.timestamp,
        ),
        LoggedActionKind::SideSelect => {
            let side = action.side.ok_or_else(|| {
                VetoError::invalid_state(format!(
                    "logged side selection for '{}' has no side",
                    action.map_id
                ))
            })?;
            select_side(state, action.team, &action.map_id, side, action.timestamp)
        }
    }?;
    Ok(outcome.state)
}

/// Fold an action log over the initial state for `(format, pool)`.
///
/// Any entry that no longer applies means the log is corrupt.
pub fn replay(
    format: RoundFormat,
    pool: Vec<MapId>,
    actions: &[VetoAction],
) -> Result<VetoState, VetoError> {
    let initial = VetoState::new(format, pool)?;
    actions
        .iter()
        .enumerate()
        .try_fold(initial, |state, (i, action)| {
            apply_logged(&state, action).map_err(|err| match err {
                VetoError::InvalidState(_) => err,
                other => VetoError::invalid_state(format!("log entry {i} does not apply: {other}")),
            })
        })
}
