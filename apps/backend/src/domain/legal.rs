//! What the machine will accept next, for clients and automated drivers.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{ActionKind, MapId, Team};
use crate::domain::side_policy::{side_rule, SideRule};
use crate::domain::state::{VetoPhase, VetoState};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpectedMove {
    /// A formal sequence step. `side_required` is true for an inline-side pick.
    Sequence {
        team: Team,
        action: ActionKind,
        step: usize,
        side_required: bool,
        map_choices: Vec<MapId>,
    },
    /// The synthetic side-selection step after a pick.
    SelectSide { team: Team, map_id: MapId },
}

impl ExpectedMove {
    pub fn team(&self) -> Team {
        match self {
            ExpectedMove::Sequence { team, .. } | ExpectedMove::SelectSide { team, .. } => *team,
        }
    }
}

/// `None` once the sequence is exhausted and no side is pending.
pub fn expected_move(state: &VetoState) -> Option<ExpectedMove> {
    if let VetoPhase::PendingSide {
        map_id,
        resolving_team,
    } = &state.phase
    {
        return Some(ExpectedMove::SelectSide {
            team: *resolving_team,
            map_id: map_id.clone(),
        });
    }

    let step = state.current_sequence_step()?;
    let is_last = state.current_step + 1 == state.sequence.len();
    Some(ExpectedMove::Sequence {
        team: step.team,
        action: step.action,
        step: state.current_step,
        side_required: side_rule(state.round_format, step, is_last) == SideRule::PickerInline,
        map_choices: state.available_maps.clone(),
    })
}
