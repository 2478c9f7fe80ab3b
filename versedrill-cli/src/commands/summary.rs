//! The `versedrill summary` command.

use versedrill_core::LessonService;

use super::print_json;
use crate::error::CliError;

pub async fn execute(service: &LessonService, lesson_id: &str) -> Result<(), CliError> {
    let summary = service.summary(lesson_id).await?;
    print_json(&summary)
}
