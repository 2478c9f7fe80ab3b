//! The `versedrill import` command.

use std::path::Path;

use versedrill_core::LessonService;

use crate::error::CliError;

pub async fn execute(
    service: &LessonService,
    title: &str,
    artist: &str,
    lyrics_path: &Path,
) -> Result<(), CliError> {
    let text = std::fs::read_to_string(lyrics_path).map_err(|source| CliError::ReadLyrics {
        path: lyrics_path.to_path_buf(),
        source,
    })?;

    let imported = service.import_song(title, artist, &text).await?;
    println!(
        "Imported song {} ({} lines)",
        imported.song_id, imported.line_count
    );
    Ok(())
}
