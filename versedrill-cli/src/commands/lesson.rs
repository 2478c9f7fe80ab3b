//! The `versedrill lesson` command.

use versedrill_core::LessonService;

use super::print_json;
use crate::error::CliError;

pub async fn execute(service: &LessonService, user_id: &str) -> Result<(), CliError> {
    let lesson = service.create_lesson(user_id).await?;
    print_json(&lesson)
}
