use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Lesson, LessonAnswer, LessonDraft, NewSong, Song};

/// Result of a conditional answer append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The answer was stored; the item is now answered
    Appended,
    /// The item already had an answer; nothing was written
    Conflict,
    /// No lesson with that id exists
    NotFound,
}

/// Source of songs to build lessons from
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Every stored song
    async fn all_songs(&self) -> Result<Vec<Song>, StoreError>;

    /// Store a song under a fresh id
    async fn insert_song(&self, song: NewSong) -> Result<Song, StoreError>;
}

/// Persistence for lessons and their answers
#[async_trait]
pub trait LessonStore: Send + Sync {
    /// Persist a new lesson, assigning an id and creation time when absent.
    /// The stored lesson starts with no answers.
    async fn create_lesson(&self, draft: LessonDraft) -> Result<Lesson, StoreError>;

    /// Snapshot of a lesson with its answers in submission order
    async fn lesson_by_id(&self, lesson_id: &str) -> Result<Option<Lesson>, StoreError>;

    /// Append an answer unless one already exists for the same item.
    ///
    /// Implementations must make the existence check and the insert a
    /// single atomic step so concurrent callers for one item cannot both
    /// get [`AppendOutcome::Appended`].
    async fn append_answer(
        &self,
        lesson_id: &str,
        answer: LessonAnswer,
    ) -> Result<AppendOutcome, StoreError>;
}
