//! Public snapshot API: a complete, self-sufficient view of one veto.
//!
//! Snapshots are never deltas; any client can rebuild its view from one.

use serde::{Deserialize, Serialize};

use crate::domain::completion::{final_maps, is_complete, FinalMap};
use crate::domain::errors::VetoError;
use crate::domain::legal::{expected_move, ExpectedMove};
use crate::domain::rules::Team;
use crate::domain::state::VetoState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetoSnapshot {
    #[serde(flatten)]
    pub state: VetoState,
    pub current_turn: Option<Team>,
    pub expected: Option<ExpectedMove>,
    pub completed: bool,
    /// Present only once the veto is complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_maps: Option<Vec<FinalMap>>,
}

impl VetoSnapshot {
    /// Fails when a state reporting itself complete cannot list its maps.
    pub fn from_state(state: &VetoState) -> Result<Self, VetoError> {
        let completed = is_complete(state);
        let final_maps = if completed {
            Some(final_maps(state)?)
        } else {
            None
        };
        Ok(Self {
            current_turn: state.current_turn(),
            expected: expected_move(state),
            completed,
            final_maps,
            state: state.clone(),
        })
    }
}
