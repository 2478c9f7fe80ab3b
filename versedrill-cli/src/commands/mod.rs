pub mod answer;
pub mod import;
pub mod lesson;
pub mod songs;
pub mod summary;

use serde::Serialize;

use crate::error::CliError;

/// Write `value` to stdout as pretty JSON
fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
