//! Exercise-list composer.
//!
//! Produces the ordered exercise list for a session: round-robin over the
//! selected types, random pick inside a type from a depletable pool, pool
//! refilled when exhausted. Asymmetrical exercises are emitted twice in a
//! row (left then right side) and never placed in the very last slot.

use rand::seq::SliceRandom;
use rand::Rng;

use super::catalog::{exercises_of_types, Exercise, ExerciseType};
use crate::error::{Result, ValidationError};

/// Compose `number_of_work_periods_per_cycle * number_of_cycles` exercises.
///
/// # Errors
/// Returns a validation error if `selected_types` is empty, or if the
/// catalog cannot fill the requested slots at all.
pub fn compose<R: Rng + ?Sized>(
    number_of_work_periods_per_cycle: usize,
    number_of_cycles: usize,
    selected_types: &[ExerciseType],
    rng: &mut R,
) -> Result<Vec<Exercise>> {
    if selected_types.is_empty() {
        return Err(ValidationError::EmptyCollection("selected exercise types".into()).into());
    }
    let wanted = number_of_work_periods_per_cycle * number_of_cycles;
    let full_pool = exercises_of_types(selected_types);
    let mut composer = Composer {
        wanted,
        full_pool: &full_pool,
        pool: full_pool.clone(),
        out: Vec::with_capacity(wanted),
    };

    // 1: pool refilled, 2: immediate repeats allowed, 3: give up.
    let mut stalled = 0u8;
    while composer.out.len() < wanted {
        if composer.round(selected_types, stalled >= 2, rng) {
            stalled = 0;
            continue;
        }
        stalled += 1;
        match stalled {
            1 | 2 => composer.refill(),
            _ => {
                return Err(ValidationError::invalid(
                    "selected exercise types",
                    format!("cannot fill {wanted} exercise slots"),
                )
                .into())
            }
        }
    }

    tracing::debug!(count = composer.out.len(), "composed exercise list");
    Ok(composer.out)
}

struct Composer<'a> {
    wanted: usize,
    full_pool: &'a [Exercise],
    pool: Vec<Exercise>,
    out: Vec<Exercise>,
}

impl Composer<'_> {
    /// One pass over the selected types. Returns whether anything was appended.
    fn round<R: Rng + ?Sized>(
        &mut self,
        types: &[ExerciseType],
        allow_repeat: bool,
        rng: &mut R,
    ) -> bool {
        let mut appended = false;
        for &exercise_type in types {
            let remaining = self.wanted - self.out.len();
            if remaining == 0 {
                break;
            }
            let last = self.out.last().copied();
            let candidates: Vec<usize> = self
                .pool
                .iter()
                .enumerate()
                .filter(|(_, e)| e.exercise_type() == exercise_type)
                .filter(|(_, e)| remaining > 1 || !e.is_asymmetrical())
                .filter(|(_, e)| allow_repeat || Some(**e) != last)
                .map(|(i, _)| i)
                .collect();
            let Some(&index) = candidates.choose(rng) else {
                continue;
            };
            let exercise = self.pool.remove(index);
            self.out.push(exercise);
            if exercise.is_asymmetrical() {
                self.out.push(exercise);
            }
            appended = true;
        }
        appended
    }

    fn refill(&mut self) {
        tracing::debug!(composed = self.out.len(), "refilling exercise pool");
        self.pool = self.full_pool.to_vec();
    }
}
