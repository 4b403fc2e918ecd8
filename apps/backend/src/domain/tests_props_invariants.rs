//! Property-based tests for veto invariants across every reachable transition.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::domain::completion::{final_maps, is_complete};
use crate::domain::errors::VetoError;
use crate::domain::rules::ActionKind;
use crate::domain::sequence::generate_sequence;
use crate::domain::state::VetoState;
use crate::domain::test_state_helpers::{auto_move, fresh_state, pool, T0};
use crate::domain::transition::{select_side, submit_action};
use crate::domain::{test_gens, test_prelude};

fn partition_holds(state: &VetoState) -> bool {
    let mut all: Vec<&str> = state
        .available_maps
        .iter()
        .chain(state.banned_maps.iter())
        .chain(state.picked_maps.iter().map(|p| &p.map_id))
        .map(String::as_str)
        .collect();
    let len = all.len();
    all.sort_unstable();
    all.dedup();
    let pool: HashSet<&str> = state.map_pool.iter().map(String::as_str).collect();
    all.len() == len && all.len() == pool.len() && all.iter().all(|m| pool.contains(m))
}

/// Walk a random legal path and return every visited state.
fn walk(state: VetoState, choices: &[(usize, bool)]) -> Vec<VetoState> {
    let mut visited = vec![state];
    for &(map_choice, attack) in choices {
        let Some(outcome) = auto_move(visited.last().unwrap(), map_choice, attack) else {
            break;
        };
        visited.push(outcome.state);
    }
    visited
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: sequence shape
    /// Exactly `required_picks` picks and `map_count - required_picks` bans.
    #[test]
    fn prop_sequence_counts((format, count) in test_gens::format_and_count()) {
        let seq = generate_sequence(format, count).unwrap();
        let picks = seq.iter().filter(|s| s.action == ActionKind::Pick).count();
        let bans = seq.iter().filter(|s| s.action == ActionKind::Ban).count();
        prop_assert_eq!(seq.len(), count);
        prop_assert_eq!(picks, format.required_picks());
        prop_assert_eq!(bans, count - format.required_picks());
        // All bans precede all picks.
        let first_pick = seq.iter().position(|s| s.action == ActionKind::Pick).unwrap();
        prop_assert!(seq[first_pick..].iter().all(|s| s.action == ActionKind::Pick));
    }

    /// Property: determinism
    #[test]
    fn prop_sequence_is_reproducible((format, count) in test_gens::format_and_count()) {
        prop_assert_eq!(
            generate_sequence(format, count).unwrap(),
            generate_sequence(format, count).unwrap()
        );
    }

    /// Property: invariants hold after every reachable transition, the step
    /// pointer never moves backward, and a full walk always terminates complete.
    #[test]
    fn prop_random_walk_preserves_invariants(
        (format, count) in test_gens::format_and_count(),
        choices in test_gens::walk_choices(),
    ) {
        let visited = walk(fresh_state(format, count), &choices);

        for pair in visited.windows(2) {
            prop_assert!(pair[1].current_step >= pair[0].current_step);
            prop_assert_eq!(pair[1].actions_log.len(), pair[0].actions_log.len() + 1);
            prop_assert!(pair[1].actions_log.starts_with(&pair[0].actions_log));
        }

        for state in &visited {
            prop_assert!(partition_holds(state));
            if let Err(e) = state.check_invariants() {
                prop_assert!(false, "invariant broken: {e}");
            }
            let unresolved = state.picked_maps.iter().filter(|p| p.side.is_none()).count();
            prop_assert!(unresolved <= 1);

            let expect_complete =
                state.current_step == state.sequence.len() && unresolved == 0;
            prop_assert_eq!(is_complete(state), expect_complete);
        }

        let last = visited.last().unwrap();
        prop_assert!(is_complete(last));
        let maps = final_maps(last).unwrap();
        prop_assert_eq!(maps.len(), format.required_picks());
    }

    /// Property: any rejected submission leaves the state identical, and any
    /// accepted one keeps the invariants.
    #[test]
    fn prop_rejections_never_mutate(
        (format, count) in test_gens::format_and_count(),
        choices in test_gens::walk_choices(),
        prefix in 0usize..20,
        (team, kind, map_idx, side) in test_gens::arbitrary_submission(13),
    ) {
        let visited = walk(fresh_state(format, count), &choices);
        let state = &visited[prefix.min(visited.len() - 1)];
        let before = state.clone();

        let map = pool(count + 2)
            .get(map_idx)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        match submit_action(state, team, kind, &map, side, T0) {
            Ok(outcome) => {
                prop_assert!(outcome.state.check_invariants().is_ok());
                prop_assert_eq!(outcome.state.actions_log.len(), before.actions_log.len() + 1);
            }
            Err(err) => {
                prop_assert!(err.is_client_recoverable(), "unexpected {err:?}");
            }
        }
        if let Some(side) = side {
            match select_side(state, team, &map, side, T0) {
                Ok(outcome) => prop_assert!(outcome.state.check_invariants().is_ok()),
                Err(err) => prop_assert!(!matches!(err, VetoError::InvalidState(_))),
            }
        }
        prop_assert_eq!(state, &before);
    }
}
