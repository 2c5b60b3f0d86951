//! Static exercise catalog.
//!
//! Exercises are grouped by [`ExerciseType`]. Asymmetrical exercises are
//! performed once per side and the composer always emits them in pairs.
//! Every type carries at least one symmetrical exercise so that an odd
//! number of slots can always be filled.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Cat,
    Crab,
    Crunch,
    Dog,
    LeaningSidePlank,
    Lunge,
    Lying,
    Plank,
    Sitting,
    Squat,
}

impl ExerciseType {
    /// All types, in enumeration order. The composer iterates in this order.
    pub const ALL: [ExerciseType; 10] = [
        ExerciseType::Cat,
        ExerciseType::Crab,
        ExerciseType::Crunch,
        ExerciseType::Dog,
        ExerciseType::LeaningSidePlank,
        ExerciseType::Lunge,
        ExerciseType::Lying,
        ExerciseType::Plank,
        ExerciseType::Sitting,
        ExerciseType::Squat,
    ];

    pub fn exercises(self) -> impl Iterator<Item = Exercise> {
        Exercise::ALL
            .iter()
            .copied()
            .filter(move |e| e.exercise_type() == self)
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&split_camel_case(&format!("{self:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    CatBackLegLift,
    CatDonkeyKickTwist,
    CatKneePushUp,
    CatPushUpV,
    CrabAdvancedBridge,
    CrabBridge,
    CrabKicks,
    CrabTableTop,
    CrunchBicycle,
    CrunchMountainClimber,
    CrunchOblique,
    CrunchReach,
    DogBirdDog,
    DogDownwardShoulderTap,
    DogMountainClimber,
    DogPushUp,
    LeaningSidePlankHipDips,
    LeaningSidePlankLegLift,
    LeaningSidePlankUpAndDown,
    LungeBulgarianSquat,
    LungeCurtsy,
    LungeFront,
    LungeSide,
    LyingDeadBug,
    LyingHipBridge,
    LyingSideLegLift,
    LyingSuperman,
    PlankKneeToElbow,
    PlankShoulderTap,
    PlankSpiderman,
    PlankUpDown,
    SittingBoatTwist,
    SittingKneeHug,
    SittingTuckIn,
    SquatBasic,
    SquatJump,
    SquatLateralLift,
    SquatPlie,
    SquatSumo,
}

impl Exercise {
    pub const ALL: [Exercise; 39] = [
        Exercise::CatBackLegLift,
        Exercise::CatDonkeyKickTwist,
        Exercise::CatKneePushUp,
        Exercise::CatPushUpV,
        Exercise::CrabAdvancedBridge,
        Exercise::CrabBridge,
        Exercise::CrabKicks,
        Exercise::CrabTableTop,
        Exercise::CrunchBicycle,
        Exercise::CrunchMountainClimber,
        Exercise::CrunchOblique,
        Exercise::CrunchReach,
        Exercise::DogBirdDog,
        Exercise::DogDownwardShoulderTap,
        Exercise::DogMountainClimber,
        Exercise::DogPushUp,
        Exercise::LeaningSidePlankHipDips,
        Exercise::LeaningSidePlankLegLift,
        Exercise::LeaningSidePlankUpAndDown,
        Exercise::LungeBulgarianSquat,
        Exercise::LungeCurtsy,
        Exercise::LungeFront,
        Exercise::LungeSide,
        Exercise::LyingDeadBug,
        Exercise::LyingHipBridge,
        Exercise::LyingSideLegLift,
        Exercise::LyingSuperman,
        Exercise::PlankKneeToElbow,
        Exercise::PlankShoulderTap,
        Exercise::PlankSpiderman,
        Exercise::PlankUpDown,
        Exercise::SittingBoatTwist,
        Exercise::SittingKneeHug,
        Exercise::SittingTuckIn,
        Exercise::SquatBasic,
        Exercise::SquatJump,
        Exercise::SquatLateralLift,
        Exercise::SquatPlie,
        Exercise::SquatSumo,
    ];

    pub fn exercise_type(self) -> ExerciseType {
        use Exercise::*;
        match self {
            CatBackLegLift | CatDonkeyKickTwist | CatKneePushUp | CatPushUpV => ExerciseType::Cat,
            CrabAdvancedBridge | CrabBridge | CrabKicks | CrabTableTop => ExerciseType::Crab,
            CrunchBicycle | CrunchMountainClimber | CrunchOblique | CrunchReach => {
                ExerciseType::Crunch
            }
            DogBirdDog | DogDownwardShoulderTap | DogMountainClimber | DogPushUp => {
                ExerciseType::Dog
            }
            LeaningSidePlankHipDips | LeaningSidePlankLegLift | LeaningSidePlankUpAndDown => {
                ExerciseType::LeaningSidePlank
            }
            LungeBulgarianSquat | LungeCurtsy | LungeFront | LungeSide => ExerciseType::Lunge,
            LyingDeadBug | LyingHipBridge | LyingSideLegLift | LyingSuperman => {
                ExerciseType::Lying
            }
            PlankKneeToElbow | PlankShoulderTap | PlankSpiderman | PlankUpDown => {
                ExerciseType::Plank
            }
            SittingBoatTwist | SittingKneeHug | SittingTuckIn => ExerciseType::Sitting,
            SquatBasic | SquatJump | SquatLateralLift | SquatPlie | SquatSumo => {
                ExerciseType::Squat
            }
        }
    }

    /// Whether the exercise has to be done once per side.
    pub fn is_asymmetrical(self) -> bool {
        use Exercise::*;
        matches!(
            self,
            CatBackLegLift
                | CatDonkeyKickTwist
                | CrunchOblique
                | DogBirdDog
                | LeaningSidePlankHipDips
                | LeaningSidePlankLegLift
                | LungeBulgarianSquat
                | LyingSideLegLift
                | SquatLateralLift
        )
    }

    pub fn display_name(self) -> String {
        split_camel_case(&format!("{self:?}"))
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// A user preference: whether exercises of `exercise_type` may be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTypeSelected {
    pub exercise_type: ExerciseType,
    pub selected: bool,
}

impl ExerciseTypeSelected {
    /// Every type, all selected.
    pub fn all_selected() -> Vec<ExerciseTypeSelected> {
        ExerciseType::ALL
            .iter()
            .map(|&exercise_type| ExerciseTypeSelected {
                exercise_type,
                selected: true,
            })
            .collect()
    }
}

/// Selected types in enumeration order, whatever the order of `preferences`.
pub fn selected_types(preferences: &[ExerciseTypeSelected]) -> Vec<ExerciseType> {
    ExerciseType::ALL
        .iter()
        .copied()
        .filter(|t| {
            preferences
                .iter()
                .any(|p| p.exercise_type == *t && p.selected)
        })
        .collect()
}

/// Every catalog exercise belonging to one of `types`.
pub fn exercises_of_types(types: &[ExerciseType]) -> Vec<Exercise> {
    Exercise::ALL
        .iter()
        .copied()
        .filter(|e| types.contains(&e.exercise_type()))
        .collect()
}

fn split_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_symmetrical_exercise() {
        for t in ExerciseType::ALL {
            assert!(
                t.exercises().any(|e| !e.is_asymmetrical()),
                "{t:?} has no symmetrical exercise"
            );
        }
    }

    #[test]
    fn all_lists_every_exercise_once() {
        let mut seen = std::collections::HashSet::new();
        for e in Exercise::ALL {
            assert!(seen.insert(e));
        }
        let by_type: usize = ExerciseType::ALL.iter().map(|t| t.exercises().count()).sum();
        assert_eq!(by_type, Exercise::ALL.len());
    }

    #[test]
    fn selected_types_keeps_enumeration_order() {
        let prefs = vec![
            ExerciseTypeSelected { exercise_type: ExerciseType::Squat, selected: true },
            ExerciseTypeSelected { exercise_type: ExerciseType::Cat, selected: true },
            ExerciseTypeSelected { exercise_type: ExerciseType::Dog, selected: false },
        ];
        assert_eq!(
            selected_types(&prefs),
            vec![ExerciseType::Cat, ExerciseType::Squat]
        );
    }

    #[test]
    fn exercises_of_types_filters_by_type() {
        let list = exercises_of_types(&[ExerciseType::Sitting]);
        assert_eq!(list.len(), 3);
        assert!(list.iter().all(|e| e.exercise_type() == ExerciseType::Sitting));
    }

    #[test]
    fn display_names_are_split() {
        assert_eq!(Exercise::LungeBulgarianSquat.display_name(), "Lunge Bulgarian Squat");
        assert_eq!(ExerciseType::LeaningSidePlank.to_string(), "Leaning Side Plank");
    }
}
