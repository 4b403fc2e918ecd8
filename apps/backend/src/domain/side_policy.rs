//! Who chooses the starting side of each picked map, and when.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{ActionKind, RoundFormat};
use crate::domain::sequence::SequenceStep;

/// Side requirement attached to one sequence step.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum SideRule {
    /// Bans never carry a side.
    NoSide,
    /// The picker submits the side with the pick; the side is the opponent's.
    PickerInline,
    /// The opponent chooses via a separate side selection right after the pick.
    OpponentSelectsAfter,
}

impl SideRule {
    /// Whether a `submit_action` for this step must carry a side.
    pub const fn requires_inline_side(self) -> bool {
        matches!(self, SideRule::PickerInline)
    }
}

/// Rule table, evaluated per step.
///
/// | step                 | BO1 / BO3              | BO5                    |
/// |----------------------|------------------------|------------------------|
/// | ban                  | no side                | no side                |
/// | non-final pick       | opponent selects after | opponent selects after |
/// | final pick           | picker inline          | opponent selects after |
pub fn side_rule(format: RoundFormat, step: &SequenceStep, is_last_step: bool) -> SideRule {
    match step.action {
        ActionKind::Ban => SideRule::NoSide,
        ActionKind::Pick if !is_last_step => SideRule::OpponentSelectsAfter,
        ActionKind::Pick => match format {
            RoundFormat::Bo1 | RoundFormat::Bo3 => SideRule::PickerInline,
            RoundFormat::Bo5 => SideRule::OpponentSelectsAfter,
        },
    }
}

/// Convenience lookup by index into a sequence.
pub fn side_rule_at(format: RoundFormat, sequence: &[SequenceStep], index: usize) -> Option<SideRule> {
    let step = sequence.get(index)?;
    Some(side_rule(format, step, index + 1 == sequence.len()))
}
