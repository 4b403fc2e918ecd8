// apps/backend/src/domain/veto_transition.rs

use crate::domain::completion::is_complete;
use crate::domain::rules::{MapId, Team};
use crate::domain::state::VetoState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VetoLifecycleView {
    pub version: i32,
    pub turn: Option<Team>,
    pub pending_side: Option<(MapId, Team)>,
    pub completed: bool,
}

impl VetoLifecycleView {
    pub fn of(version: i32, state: &VetoState) -> Self {
        Self {
            version,
            turn: state.current_turn(),
            pending_side: state
                .pending_side()
                .map(|(map, team)| (map.to_string(), team)),
            completed: is_complete(state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VetoTransition {
    /// Edge-triggered: the turn became a specific team.
    TurnBecame { team: Team },

    /// Edge-triggered: a pick now waits on the opponent's side choice.
    SidePending { map_id: MapId, team: Team },

    /// Edge-triggered: veto moved from in-progress to complete.
    VetoCompleted,
}

/// Derive transitions from before/after lifecycle views.
pub fn derive_veto_transitions(
    before: &VetoLifecycleView,
    after: &VetoLifecycleView,
) -> Vec<VetoTransition> {
    let mut transitions = Vec::new();

    // A pending side always changes who acts, so report it first.
    if let Some((map_id, team)) = &after.pending_side {
        if before.pending_side.as_ref() != Some(&(map_id.clone(), *team)) {
            transitions.push(VetoTransition::SidePending {
                map_id: map_id.clone(),
                team: *team,
            });
        }
    }

    if let Some(team) = after.turn {
        if before.turn != Some(team) {
            transitions.push(VetoTransition::TurnBecame { team });
        }
    }

    if !before.completed && after.completed {
        transitions.push(VetoTransition::VetoCompleted);
    }

    transitions
}
