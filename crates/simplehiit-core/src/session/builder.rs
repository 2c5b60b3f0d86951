//! Session builder: exercise list + settings -> ordered steps.
//!
//! Step order is fixed: `[Prepare?] Rest Work Rest Work ...`, one rest/work
//! pair per composed exercise. Each step carries the exact session time
//! left after it.

use rand::Rng;

use super::types::{ExerciseStep, Session, SessionSettings, SessionStep, Side};
use crate::error::{Result, SessionError};
use crate::exercise::{compose, Exercise};
use crate::format::DurationFormatter;

#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    formatter: DurationFormatter,
}

impl SessionBuilder {
    pub fn new(formatter: DurationFormatter) -> Self {
        Self { formatter }
    }

    /// Compose an exercise list for `settings` and build the session from it.
    ///
    /// # Errors
    /// Returns [`SessionError::NoExerciseTypesSelected`] when every type is
    /// disabled, or the composer's error if the slots cannot be filled.
    pub fn build_random<R: Rng + ?Sized>(
        &self,
        settings: &SessionSettings,
        rng: &mut R,
    ) -> Result<Session> {
        let types = settings.selected_types();
        if types.is_empty() {
            return Err(SessionError::NoExerciseTypesSelected.into());
        }
        let exercises = compose(
            settings.number_of_work_periods,
            settings.number_cumulated_cycles,
            &types,
            rng,
        )?;
        Ok(self.build(settings, &exercises))
    }

    /// Build the step list for an already composed exercise list.
    pub fn build(&self, settings: &SessionSettings, exercises: &[Exercise]) -> Session {
        let work_ms = settings.work_period_length_ms;
        let rest_ms = settings.rest_period_length_ms;
        let pair_ms = work_ms + rest_ms;
        let count = exercises.len() as u64;
        let prepare_ms = settings.session_start_count_down_length_ms;

        let mut steps = Vec::with_capacity(exercises.len() * 2 + 1);
        if prepare_ms > 0 {
            steps.push(SessionStep::Prepare {
                duration_ms: prepare_ms,
                count_down_length_ms: prepare_ms,
                remaining_session_duration_ms_after_me: count * pair_ms,
            });
        }

        let sides = pair_sides(exercises);
        for (i, (&exercise, side)) in exercises.iter().zip(sides).enumerate() {
            let pairs_after = count - i as u64 - 1;
            steps.push(SessionStep::Rest(ExerciseStep {
                exercise,
                side,
                duration_ms: rest_ms,
                duration_formatted: self.formatter.format(rest_ms),
                count_down_length_ms: settings.periods_start_count_down_length_ms,
                remaining_session_duration_ms_after_me: pairs_after * pair_ms + work_ms,
            }));
            steps.push(SessionStep::Work(ExerciseStep {
                exercise,
                side,
                duration_ms: work_ms,
                duration_formatted: self.formatter.format(work_ms),
                count_down_length_ms: settings.periods_start_count_down_length_ms,
                remaining_session_duration_ms_after_me: pairs_after * pair_ms,
            }));
        }

        let duration_ms =
            settings.cycle_length_ms * settings.number_cumulated_cycles as u64 + prepare_ms;

        tracing::debug!(steps = steps.len(), duration_ms, "built session");
        Session {
            steps,
            duration_ms,
            beep_sound_count_down_active: settings.beep_sound_count_down_active,
            users: settings.users.clone(),
        }
    }
}

/// Left/right assignment for each entry.
///
/// An asymmetrical exercise must be immediately followed by its twin; the
/// pair becomes Left then Right. An entry breaking that rule is logged and
/// gets [`Side::None`].
fn pair_sides(exercises: &[Exercise]) -> Vec<Side> {
    let mut sides = vec![Side::None; exercises.len()];
    let mut i = 0;
    while i < exercises.len() {
        let exercise = exercises[i];
        if exercise.is_asymmetrical() {
            if exercises.get(i + 1) == Some(&exercise) {
                sides[i] = Side::Left;
                sides[i + 1] = Side::Right;
                i += 2;
                continue;
            }
            tracing::warn!(index = i, ?exercise, "asymmetrical exercise without its second side");
        }
        i += 1;
    }
    sides
}
