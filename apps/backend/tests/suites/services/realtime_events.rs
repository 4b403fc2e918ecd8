// Per-room notifications published after each commit.

use tokio::sync::broadcast::error::TryRecvError;
use veto_backend::domain::{ActionKind, RoundFormat, Side, Team};
use veto_backend::{AppError, ErrorCode, VetoConfig, VetoEvent, VetoFlowService};

use crate::support::test_state::{build_test_state, build_test_state_with};
use crate::support::veto_setup::{ban, choose_side, drive_to_completion, pick, ready_room};

fn drain(rx: &mut tokio::sync::broadcast::Receiver<VetoEvent>) -> Vec<VetoEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            Err(TryRecvError::Lagged(n)) => panic!("subscriber lagged by {n}"),
        }
    }
}

#[tokio::test]
async fn test_ban_publishes_snapshot_then_turn() -> Result<(), AppError> {
    let app = build_test_state()?;
    let room = ready_room(&app, RoundFormat::Bo1, 5).await?;
    let mut rx = VetoFlowService.subscribe(&app, room.room_id).await?;

    ban(&app, room.room_id, Team::A, "m1").await?;

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2, "{events:?}");
    match &events[0] {
        VetoEvent::VetoState { version, snapshot, .. } => {
            assert_eq!(*version, 2);
            assert_eq!(snapshot.state.banned_maps, vec!["m1".to_string()]);
        }
        other => panic!("expected a snapshot first, got {other:?}"),
    }
    assert!(matches!(events[1], VetoEvent::TurnBecame { team: Team::B, version: 2, .. }));
    assert!(events.iter().all(|e| e.room_id() == room.room_id));
    Ok(())
}

#[tokio::test]
async fn test_pick_publishes_side_pending() -> Result<(), AppError> {
    let app = build_test_state()?;
    let room = ready_room(&app, RoundFormat::Bo5, 5).await?;
    let mut rx = VetoFlowService.subscribe(&app, room.room_id).await?;

    pick(&app, room.room_id, Team::A, "m1", None).await?;
    let events = drain(&mut rx);
    assert_eq!(events.len(), 3, "{events:?}");
    assert!(matches!(
        &events[1],
        VetoEvent::SidePending { map_id, team: Team::B, .. } if map_id == "m1"
    ));
    assert!(matches!(events[2], VetoEvent::TurnBecame { team: Team::B, .. }));

    // B resolves and then holds the next pick, so the turn does not change hands.
    choose_side(&app, room.room_id, Team::B, "m1", Side::Attack).await?;
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1, "{events:?}");
    assert!(matches!(events[0], VetoEvent::VetoState { version: 3, .. }));
    Ok(())
}

#[tokio::test]
async fn test_completion_publishes_final_maps() -> Result<(), AppError> {
    let app = build_test_state()?;
    let room = ready_room(&app, RoundFormat::Bo3, 3).await?;
    let mut rx = VetoFlowService.subscribe(&app, room.room_id).await?;

    drive_to_completion(&app, room.room_id).await?;

    let events = drain(&mut rx);
    let completed: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            VetoEvent::VetoCompleted { final_maps, .. } => Some(final_maps),
            _ => None,
        })
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].len(), 3);
    assert!(matches!(events.last(), Some(VetoEvent::VetoCompleted { .. })));

    let versions: Vec<i32> = events.iter().map(VetoEvent::version).collect();
    assert!(versions.windows(2).all(|w| w[0] <= w[1]), "{versions:?}");
    Ok(())
}

#[tokio::test]
async fn test_rejections_publish_nothing() -> Result<(), AppError> {
    let app = build_test_state()?;
    let room = ready_room(&app, RoundFormat::Bo1, 3).await?;
    let mut rx = VetoFlowService.subscribe(&app, room.room_id).await?;

    assert!(ban(&app, room.room_id, Team::B, "m1").await.is_err());
    assert!(drain(&mut rx).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rooms_are_isolated() -> Result<(), AppError> {
    let app = build_test_state()?;
    let first = ready_room(&app, RoundFormat::Bo1, 3).await?;
    let second = ready_room(&app, RoundFormat::Bo1, 3).await?;
    let mut rx_second = VetoFlowService.subscribe(&app, second.room_id).await?;

    ban(&app, first.room_id, Team::A, "m1").await?;
    assert!(drain(&mut rx_second).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_slow_subscriber_lags_instead_of_blocking() -> Result<(), AppError> {
    let app = build_test_state_with(VetoConfig {
        event_channel_capacity: 1,
        ..VetoConfig::default()
    })?;
    let room = ready_room(&app, RoundFormat::Bo1, 5).await?;
    let mut rx = VetoFlowService.subscribe(&app, room.room_id).await?;

    ban(&app, room.room_id, Team::A, "m1").await?;
    ban(&app, room.room_id, Team::B, "m2").await?;

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(_))));
    // After skipping ahead, the newest event is still delivered.
    assert!(matches!(rx.try_recv(), Ok(VetoEvent::TurnBecame { team: Team::A, .. })));
    Ok(())
}

#[tokio::test]
async fn test_event_from_older_commit_is_not_delivered() -> Result<(), AppError> {
    let app = build_test_state()?;
    let room = ready_room(&app, RoundFormat::Bo1, 5).await?;
    let mut rx = VetoFlowService.subscribe(&app, room.room_id).await?;

    ban(&app, room.room_id, Team::A, "m1").await?;
    // A publisher from the ready commit arriving late.
    let stale = VetoEvent::VetoState {
        room_id: room.room_id,
        version: room.snapshot.version,
        snapshot: room.snapshot.veto.clone(),
    };
    assert_eq!(app.hub.publish(stale), 0);

    let events = drain(&mut rx);
    assert!(events.iter().all(|e| e.version() == 2), "{events:?}");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_commits_reach_subscribers_in_version_order() -> Result<(), AppError> {
    let app = build_test_state()?;
    let room = ready_room(&app, RoundFormat::Bo1, 7).await?;
    let mut rx = VetoFlowService.subscribe(&app, room.room_id).await?;

    let bans = [Team::A, Team::B, Team::A, Team::B, Team::A, Team::B];
    let handles: Vec<_> = bans
        .into_iter()
        .enumerate()
        .map(|(i, team)| {
            let app = app.clone();
            let room_id = room.room_id;
            tokio::spawn(async move {
                let map = format!("m{}", i + 1);
                loop {
                    match VetoFlowService
                        .submit_action(&app, room_id, team, ActionKind::Ban, &map, None)
                        .await
                    {
                        Ok(_) => return,
                        Err(err)
                            if matches!(
                                err.code(),
                                ErrorCode::WrongTurn | ErrorCode::OptimisticLock
                            ) =>
                        {
                            tokio::task::yield_now().await
                        }
                        Err(err) => panic!("ban {map} by {team} failed: {err:?}"),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task panicked");
    }

    let events = drain(&mut rx);
    let versions: Vec<i32> = events.iter().map(VetoEvent::version).collect();
    assert!(versions.windows(2).all(|w| w[0] <= w[1]), "{versions:?}");

    let final_version = VetoFlowService.get_state(&app, room.room_id).await?.version;
    assert_eq!(final_version, 7);
    let last_snapshot = events.iter().rev().find_map(|e| match e {
        VetoEvent::VetoState { version, .. } => Some(*version),
        _ => None,
    });
    assert_eq!(last_snapshot, Some(final_version));
    Ok(())
}
