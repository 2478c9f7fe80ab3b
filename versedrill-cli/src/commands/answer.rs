//! The `versedrill answer` command.

use versedrill_core::{ExerciseKind, LessonService, Submission};

use super::print_json;
use crate::error::CliError;

pub async fn execute(
    service: &LessonService,
    lesson_id: &str,
    item_index: usize,
    kind: &str,
    input: String,
) -> Result<(), CliError> {
    let submission = Submission {
        item_index,
        kind: ExerciseKind::from_declared(kind),
        user_input: input,
    };

    let outcome = service.submit_answer(lesson_id, submission).await?;
    print_json(&outcome)
}
