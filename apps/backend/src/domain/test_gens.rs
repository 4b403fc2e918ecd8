// Proptest generators for veto domain types.
// Pools are always valid for their format, so no generated case is rejected.

use proptest::prelude::*;

use crate::domain::rules::{ActionKind, RoundFormat, Side, Team};

pub fn round_format() -> impl Strategy<Value = RoundFormat> {
    prop_oneof![
        Just(RoundFormat::Bo1),
        Just(RoundFormat::Bo3),
        Just(RoundFormat::Bo5),
    ]
}

pub fn team() -> impl Strategy<Value = Team> {
    prop_oneof![Just(Team::A), Just(Team::B)]
}

pub fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Attack), Just(Side::Defense)]
}

pub fn action_kind() -> impl Strategy<Value = ActionKind> {
    prop_oneof![Just(ActionKind::Ban), Just(ActionKind::Pick)]
}

/// A format together with a pool size that satisfies it (up to 8 extra maps).
pub fn format_and_count() -> impl Strategy<Value = (RoundFormat, usize)> {
    round_format().prop_flat_map(|format| {
        let min = format.required_picks();
        (Just(format), min..=min + 8)
    })
}

/// Per-step choices for a random legal walk: (map index, take attack side).
pub fn walk_choices() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..16, any::<bool>()), 32)
}

/// An arbitrary (possibly illegal) submission.
pub fn arbitrary_submission(
    pool_size: usize,
) -> impl Strategy<Value = (Team, ActionKind, usize, Option<Side>)> {
    (
        team(),
        action_kind(),
        0..pool_size + 2,
        prop::option::of(side()),
    )
}
