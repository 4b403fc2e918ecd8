//! Terminal detection and final map extraction.

use serde::{Deserialize, Serialize};

use crate::domain::errors::VetoError;
use crate::domain::rules::{MapId, Side, Team};
use crate::domain::state::VetoState;

/// A picked map with its sides fully decided.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinalMap {
    /// 1-based play order.
    pub order: usize,
    pub map_id: MapId,
    pub picked_by: Team,
    pub side_chosen_by: Team,
    pub side: Side,
    pub attacking_team: Team,
    pub defending_team: Team,
}

/// Sequence exhausted and no pick is waiting on a side.
pub fn is_complete(state: &VetoState) -> bool {
    state.current_step == state.sequence.len()
        && !state.sequence.is_empty()
        && state.picked_maps.iter().all(|p| p.is_resolved())
}

/// Picked maps in pick order. Refuses to run on a non-terminal state.
pub fn final_maps(state: &VetoState) -> Result<Vec<FinalMap>, VetoError> {
    if state.current_step != state.sequence.len() {
        return Err(VetoError::invalid_state(format!(
            "veto not finished: step {} of {}",
            state.current_step,
            state.sequence.len()
        )));
    }

    state
        .picked_maps
        .iter()
        .enumerate()
        .map(|(i, p)| {
            match (
                p.side,
                p.side_chosen_by,
                p.attacking_team,
                p.defending_team,
            ) {
                (Some(side), Some(chooser), Some(attacking), Some(defending)) => Ok(FinalMap {
                    order: i + 1,
                    map_id: p.map_id.clone(),
                    picked_by: p.picked_by,
                    side_chosen_by: chooser,
                    side,
                    attacking_team: attacking,
                    defending_team: defending,
                }),
                _ => Err(VetoError::invalid_state(format!(
                    "picked map '{}' has no resolved side",
                    p.map_id
                ))),
            }
        })
        .collect()
}
