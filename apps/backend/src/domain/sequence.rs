//! Canonical ban/pick order for a round format and pool size.

use serde::{Deserialize, Serialize};

use crate::domain::errors::VetoError;
use crate::domain::rules::{ActionKind, RoundFormat, Team};

/// One formal slot in the veto order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub team: Team,
    pub action: ActionKind,
    pub completed: bool,
}

impl SequenceStep {
    const fn pending(team: Team, action: ActionKind) -> Self {
        Self {
            team,
            action,
            completed: false,
        }
    }
}

/// Team that takes the first pick.
///
/// BO3/BO5 always hand the pick phase to A. BO1's lone pick continues the ban
/// alternation, so it lands on A after an even number of bans and on B otherwise.
pub fn pick_phase_starter(format: RoundFormat, bans_needed: usize) -> Team {
    match format {
        RoundFormat::Bo1 => Team::alternate(Team::A, bans_needed),
        RoundFormat::Bo3 | RoundFormat::Bo5 => Team::A,
    }
}

/// Build the ordered list of required actions.
///
/// All bans come first (alternating from A), followed by the picks. Identical
/// inputs always produce an identical sequence.
pub fn generate_sequence(
    format: RoundFormat,
    map_count: usize,
) -> Result<Vec<SequenceStep>, VetoError> {
    let required_picks = format.required_picks();
    if map_count < required_picks {
        return Err(VetoError::InsufficientMaps(format!(
            "{format} needs at least {required_picks} maps, pool has {map_count}"
        )));
    }

    let bans_needed = map_count - required_picks;
    let pick_starter = pick_phase_starter(format, bans_needed);

    let bans = (0..bans_needed)
        .map(|n| SequenceStep::pending(Team::alternate(Team::A, n), ActionKind::Ban));
    let picks = (0..required_picks)
        .map(|n| SequenceStep::pending(Team::alternate(pick_starter, n), ActionKind::Pick));

    Ok(bans.chain(picks).collect())
}
