//! Dropped timer values must not change where a session ends up.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use simplehiit_core::{
    Clock, ExerciseType, ExerciseTypeSelected, SessionPresenter, SessionRecord,
    SessionRepository, SessionSettings, SettingsProvider, StepTimerState, User,
};

struct Settings(SessionSettings);

impl SettingsProvider for Settings {
    fn session_settings(&self) -> simplehiit_core::error::Result<SessionSettings> {
        Ok(self.0.clone())
    }
}

#[derive(Clone, Default)]
struct Records(Arc<Mutex<Vec<SessionRecord>>>);

impl SessionRepository for Records {
    fn insert_session(&self, record: &SessionRecord) -> simplehiit_core::error::Result<i64> {
        let mut records = self.0.lock().unwrap();
        records.push(record.clone());
        Ok(records.len() as i64)
    }
}

struct Epoch;

impl Clock for Epoch {
    fn now_ms(&self) -> i64 {
        0
    }
}

/// Prepare 5 s, then 3 periods of work 4 s and rest 2 s: 23 s.
fn settings() -> SessionSettings {
    SessionSettings {
        number_cumulated_cycles: 1,
        work_period_length_ms: 4_000,
        rest_period_length_ms: 2_000,
        number_of_work_periods: 3,
        cycle_length_ms: 18_000,
        beep_sound_count_down_active: false,
        session_start_count_down_length_ms: 5_000,
        periods_start_count_down_length_ms: 1_000,
        users: vec![User {
            id: 3,
            name: "Sam".into(),
            selected: true,
        }],
        exercise_types: vec![ExerciseTypeSelected {
            exercise_type: ExerciseType::Lunge,
            selected: true,
        }],
    }
}

const TOTAL_SECONDS: u64 = 23;

/// Feed `remaining` values (seconds) in order, then abort unless the
/// session already finished. Returns the final step index and the records.
fn drive(remaining: &[u64]) -> (Option<usize>, Vec<SessionRecord>) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();
    rt.block_on(async {
        let records = Records::default();
        let mut p = SessionPresenter::with_clock(Settings(settings()), records.clone(), Epoch)
            .with_seed(11);
        p.on_sound_loaded();
        let run = p.timer().current().unwrap().run;
        for &seconds in remaining {
            p.on_tick(StepTimerState {
                milli_seconds_remaining: seconds * 1000,
                total_milli_seconds: TOTAL_SECONDS * 1000,
                run,
            });
        }
        let index = p.current_index();
        if index.is_some() {
            p.abort_session();
        }
        let stored = records.0.lock().unwrap().clone();
        (index, stored)
    })
}

proptest! {
    #[test]
    fn any_subset_of_ticks_ends_like_the_full_sequence(
        cutoff in 0..=TOTAL_SECONDS,
        keep in proptest::collection::vec(any::<bool>(), (TOTAL_SECONDS + 1) as usize),
    ) {
        let full: Vec<u64> = (cutoff..=TOTAL_SECONDS).rev().collect();
        let sparse: Vec<u64> = full
            .iter()
            .copied()
            .filter(|&s| s == cutoff || keep[s as usize])
            .collect();

        let (full_index, full_records) = drive(&full);
        let (sparse_index, sparse_records) = drive(&sparse);

        prop_assert_eq!(full_index, sparse_index);
        prop_assert_eq!(
            full_records.iter().map(|r| r.duration_ms).collect::<Vec<_>>(),
            sparse_records.iter().map(|r| r.duration_ms).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_reaching_zero_records_the_whole_session() {
    let (index, records) = drive(&[TOTAL_SECONDS, 0]);
    assert_eq!(index, None);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].duration_ms, 18_000);
    assert_eq!(records[0].users_ids, vec![3]);
}
