//! Score report for a lesson.

use serde::{Deserialize, Serialize};

use crate::model::{ExerciseKind, Lesson};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    /// Percentage of items counted correct, 0 for an empty lesson
    pub accuracy: f64,
    /// The learner's wrong guesses, as submitted
    pub scheduled_for_repractice: Vec<String>,
}

/// Reduce a lesson's items and recorded answers into a score.
///
/// Arrange items are graded on the client and never stored, so every one
/// of them counts as correct whether or not it was attempted.
#[must_use]
pub fn summarize(lesson: &Lesson) -> LessonSummary {
    let total = lesson.items.len();

    let mut fill_correct = 0;
    let mut scheduled_for_repractice = Vec::new();
    for answer in lesson
        .answers
        .iter()
        .filter(|a| a.kind == ExerciseKind::FillBlank)
    {
        if answer.correct {
            fill_correct += 1;
        } else {
            scheduled_for_repractice.push(answer.user_input.clone());
        }
    }

    let arrange_count = lesson
        .items
        .iter()
        .filter(|item| item.kind() == ExerciseKind::Arrange)
        .count();

    let correct = fill_correct + arrange_count;
    let wrong = scheduled_for_repractice.len();

    LessonSummary {
        total,
        correct,
        wrong,
        accuracy: accuracy(correct, total),
        scheduled_for_repractice,
    }
}

#[allow(clippy::cast_precision_loss)] // item counts are single digits
fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}
