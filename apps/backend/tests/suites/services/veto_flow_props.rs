// Property: arbitrary submissions through the service never corrupt a room.
//
// Accepted actions bump the version by one; rejected ones leave the stored
// room byte-for-byte identical. The action log always replays to the stored
// state.

use proptest::prelude::*;
use veto_backend::domain::{ActionKind, RoundFormat, Side, Team};
use veto_backend::{ErrorCode, VetoFlowService};

use crate::common::proptest_prelude::proptest_prelude_config;
use crate::support::test_state::build_test_state;
use crate::support::veto_setup::ready_room;

#[derive(Debug, Clone)]
enum Move {
    Submit {
        team: Team,
        kind: ActionKind,
        map: usize,
        side: Option<Side>,
    },
    SelectSide {
        team: Team,
        map: usize,
        side: Side,
    },
}

fn team() -> impl Strategy<Value = Team> {
    prop_oneof![Just(Team::A), Just(Team::B)]
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Attack), Just(Side::Defense)]
}

fn a_move(pool: usize) -> impl Strategy<Value = Move> {
    prop_oneof![
        3 => (team(), prop_oneof![Just(ActionKind::Ban), Just(ActionKind::Pick)], 0..pool + 1, proptest::option::of(side()))
            .prop_map(|(team, kind, map, side)| Move::Submit { team, kind, map, side }),
        1 => (team(), 0..pool + 1, side())
            .prop_map(|(team, map, side)| Move::SelectSide { team, map, side }),
    ]
}

fn scenario() -> impl Strategy<Value = (RoundFormat, usize, Vec<Move>)> {
    prop_oneof![Just(RoundFormat::Bo1), Just(RoundFormat::Bo3), Just(RoundFormat::Bo5)]
        .prop_flat_map(|format| {
            let min = format.required_picks();
            (Just(format), min..=min + 4)
        })
        .prop_flat_map(|(format, pool)| {
            (Just(format), Just(pool), prop::collection::vec(a_move(pool), 1..40))
        })
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn prop_service_keeps_rooms_consistent((format, pool, moves) in scenario()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");

        rt.block_on(async {
            let app = build_test_state().expect("state");
            let room = ready_room(&app, format, pool).await.expect("room");
            let id = room.room_id;

            for mv in moves {
                let before = VetoFlowService.get_state(&app, id).await.expect("snapshot");
                // Index `pool` names a map outside the pool.
                let result = match mv {
                    Move::Submit { team, kind, map, side } => {
                        VetoFlowService
                            .submit_action(&app, id, team, kind, &format!("m{}", map + 1), side)
                            .await
                    }
                    Move::SelectSide { team, map, side } => {
                        VetoFlowService
                            .select_side(&app, id, team, &format!("m{}", map + 1), side)
                            .await
                    }
                };
                let after = VetoFlowService.get_state(&app, id).await.expect("snapshot");

                match result {
                    Ok(accepted) => {
                        prop_assert_eq!(after.version, before.version + 1);
                        prop_assert_eq!(accepted.final_version(), after.version);
                        prop_assert_eq!(
                            after.veto.state.actions_log.len(),
                            before.veto.state.actions_log.len() + 1
                        );
                    }
                    Err(err) => {
                        prop_assert_ne!(err.code(), ErrorCode::DataCorruption);
                        prop_assert_eq!(&after, &before);
                    }
                }

                prop_assert!(VetoFlowService.audit_room(&app, id).await.is_ok());
                let picked = after.veto.state.picked_maps.len();
                prop_assert!(picked <= format.required_picks());
                prop_assert_eq!(
                    after.veto.state.available_maps.len()
                        + after.veto.state.banned_maps.len()
                        + picked,
                    pool
                );
            }
            Ok(())
        })?;
    }
}
