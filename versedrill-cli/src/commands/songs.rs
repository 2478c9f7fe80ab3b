//! The `versedrill songs` command.

use versedrill_core::LessonService;

use crate::error::CliError;

pub async fn execute(service: &LessonService) -> Result<(), CliError> {
    let songs = service.list_songs().await?;
    if songs.is_empty() {
        println!("No songs imported yet.");
        return Ok(());
    }

    for song in &songs {
        println!("{}\t{}", song.id, song.title);
    }
    println!("\n{} song(s).", songs.len());
    Ok(())
}
