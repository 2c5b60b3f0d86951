//! Integration tests driving a whole session through the controller,
//! backed by the on-disk config and database.

use std::path::Path;
use std::time::Duration;

use simplehiit_core::{
    Config, Database, SessionController, SessionDialog, SessionPresenter, SessionViewState,
    StoreSettingsProvider,
};

/// Work 4 s, rest 2 s, 2 periods, 1 cycle, no prepare step: R W R W, 12 s.
fn write_short_config(dir: &Path) {
    let path = Config::path_in(dir);
    let mut cfg = Config::default();
    cfg.set("session.periods_start_count_down_length_ms", "1000").unwrap();
    cfg.set("session.work_period_length_ms", "4000").unwrap();
    cfg.set("session.rest_period_length_ms", "2000").unwrap();
    cfg.set("session.number_of_work_periods", "2").unwrap();
    cfg.set("session.number_cumulated_cycles", "1").unwrap();
    cfg.set("session.session_start_count_down_length_ms", "0").unwrap();
    cfg.save_to(&path).unwrap();
}

fn presenter_in(dir: &Path) -> SessionPresenter<StoreSettingsProvider, Database> {
    SessionPresenter::new(
        StoreSettingsProvider::open_in(dir).unwrap(),
        Database::open_in(dir).unwrap(),
    )
    .with_seed(7)
}

#[tokio::test(start_paused = true)]
async fn test_full_session_is_recorded_for_selected_users() {
    let dir = tempfile::tempdir().unwrap();
    write_short_config(dir.path());
    let db = Database::open_in(dir.path()).unwrap();
    let ann = db.insert_user("Ann").unwrap();
    let bob = db.insert_user("Bob").unwrap();
    db.set_user_selected(bob.id, false).unwrap();

    let handle = SessionController::spawn(presenter_in(dir.path()));
    handle.sound_loaded().await.unwrap();

    match handle.finished().await {
        SessionViewState::Finished {
            session_duration_formatted,
            working_steps_done,
        } => {
            assert_eq!(session_duration_formatted, "12s");
            assert_eq!(working_steps_done.len(), 2);
        }
        other => panic!("unexpected final state {other:?}"),
    }
    handle.shutdown().await;

    let records = db.sessions().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].duration_ms, 12_000);
    assert_eq!(records[0].users_ids, vec![ann.id]);
    assert!(db.sessions_for_user(bob.id).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_progress_until_resume() {
    let dir = tempfile::tempdir().unwrap();
    write_short_config(dir.path());
    Database::open_in(dir.path()).unwrap().insert_user("Ann").unwrap();

    let handle = SessionController::spawn(presenter_in(dir.path()));
    let mut dialog = handle.dialog();
    handle.sound_loaded().await.unwrap();

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    handle.pause().await.unwrap();
    dialog.wait_for(|d| *d == SessionDialog::Pause).await.unwrap();
    let frozen = handle.view_state().borrow().clone();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(*handle.view_state().borrow(), frozen);

    handle.resume().await.unwrap();
    dialog.wait_for(|d| *d == SessionDialog::None).await.unwrap();
    assert!(matches!(handle.finished().await, SessionViewState::Finished { .. }));
    handle.shutdown().await;

    let records = Database::open_in(dir.path()).unwrap().sessions().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].duration_ms, 12_000);
}

#[tokio::test(start_paused = true)]
async fn test_abort_keeps_completed_steps() {
    let dir = tempfile::tempdir().unwrap();
    write_short_config(dir.path());
    Database::open_in(dir.path()).unwrap().insert_user("Ann").unwrap();

    let handle = SessionController::spawn(presenter_in(dir.path()));
    handle.sound_loaded().await.unwrap();

    // 7.5 s in: second rest step, which is dropped.
    tokio::time::sleep(Duration::from_millis(7_500)).await;
    handle.abort().await.unwrap();

    match handle.finished().await {
        SessionViewState::Finished {
            session_duration_formatted,
            working_steps_done,
        } => {
            assert_eq!(session_duration_formatted, "6s");
            assert_eq!(working_steps_done.len(), 1);
        }
        other => panic!("unexpected final state {other:?}"),
    }
    handle.shutdown().await;

    let records = Database::open_in(dir.path()).unwrap().sessions().unwrap();
    assert_eq!(records[0].duration_ms, 6_000);
}

#[tokio::test(start_paused = true)]
async fn test_missing_users_surface_as_error_state() {
    let dir = tempfile::tempdir().unwrap();
    write_short_config(dir.path());

    let handle = SessionController::spawn(presenter_in(dir.path()));
    handle.sound_loaded().await.unwrap();

    assert_eq!(
        handle.finished().await,
        SessionViewState::Error {
            error_code: "NO_USERS_SELECTED".into()
        }
    );
    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_reset_and_start_runs_a_second_session() {
    let dir = tempfile::tempdir().unwrap();
    write_short_config(dir.path());
    Database::open_in(dir.path()).unwrap().insert_user("Ann").unwrap();

    let handle = SessionController::spawn(presenter_in(dir.path()));
    handle.sound_loaded().await.unwrap();
    assert!(matches!(handle.finished().await, SessionViewState::Finished { .. }));

    handle.reset_and_start().await.unwrap();
    let mut view = handle.view_state();
    view.wait_for(|v| matches!(v, SessionViewState::RunningNominal(_)))
        .await
        .unwrap();
    assert!(matches!(handle.finished().await, SessionViewState::Finished { .. }));
    handle.shutdown().await;

    assert_eq!(Database::open_in(dir.path()).unwrap().sessions().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_beeps_reach_subscribers() {
    let dir = tempfile::tempdir().unwrap();
    write_short_config(dir.path());
    Database::open_in(dir.path()).unwrap().insert_user("Ann").unwrap();

    let handle = SessionController::spawn(presenter_in(dir.path()));
    let mut beeps = handle.beeps();
    handle.sound_loaded().await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), beeps.recv())
        .await
        .expect("a beep within the first rest step")
        .unwrap();
    handle.shutdown().await;
}
