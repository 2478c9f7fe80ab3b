//! Grading of a single submission against a lesson snapshot.
//!
//! Each item moves from unanswered to answered at most once. The check
//! here rejects submissions already visible in the snapshot; the store's
//! conditional append settles races between concurrent submissions.

use crate::error::{CoreError, Result};
use crate::model::{ExerciseKind, Lesson, LessonAnswer, Submission};

/// Outcome of grading a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgement {
    /// A fill-in-the-blank answer that must be appended to the lesson
    Record(LessonAnswer),
    /// A non-fill declaration, accepted as correct and never stored
    Unrecorded,
}

impl Judgement {
    #[must_use]
    pub const fn correct(&self) -> bool {
        match self {
            Self::Record(answer) => answer.correct,
            Self::Unrecorded => true,
        }
    }
}

/// Grade `submission` against `lesson`.
///
/// # Errors
///
/// Returns `DuplicateAnswer` if the item already has an answer,
/// `ItemIndexOutOfRange` for an index past the lesson's items, and
/// `NotFillBlank` when a fill answer targets an arrange item.
pub fn judge(lesson: &Lesson, submission: &Submission) -> Result<Judgement> {
    let item_index = submission.item_index;

    if lesson.answer_for(item_index).is_some() {
        return Err(CoreError::DuplicateAnswer {
            lesson_id: lesson.id.clone(),
            item_index,
        });
    }

    let Some(item) = lesson.items.get(item_index) else {
        return Err(CoreError::ItemIndexOutOfRange {
            item_index,
            item_count: lesson.items.len(),
        });
    };

    if submission.kind != ExerciseKind::FillBlank {
        return Ok(Judgement::Unrecorded);
    }

    let fill = item
        .as_fill_blank()
        .ok_or(CoreError::NotFillBlank { item_index })?;

    Ok(Judgement::Record(LessonAnswer {
        item_index,
        kind: ExerciseKind::FillBlank,
        user_input: submission.user_input.clone(),
        correct: words_match(&submission.user_input, &fill.correct_word),
    }))
}

/// Case-insensitive comparison of a guess with the hidden word.
#[must_use]
pub fn words_match(input: &str, correct: &str) -> bool {
    input.to_lowercase() == correct.to_lowercase()
}
