//! Lesson service that ties song storage, item generation and grading together.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::builder::build_items;
use crate::contracts::{AnswerOutcome, CreatedLesson, ImportedSong, SongListing};
use crate::error::{CoreError, Result, StoreError};
use crate::model::{Lesson, LessonDraft, Lyrics, NewSong, Submission};
use crate::random::{ClockSeeded, RngProvider};
use crate::store::{AppendOutcome, LessonStore, SongStore};
use crate::summary::{summarize, LessonSummary};
use crate::validator::{judge, Judgement};

/// Default bound on a single storage call
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates lessons, records answers and reports scores
pub struct LessonService {
    songs: Arc<dyn SongStore>,
    lessons: Arc<dyn LessonStore>,
    rng: Arc<dyn RngProvider>,
    storage_timeout: Duration,
}

impl LessonService {
    /// Create a new lesson service
    ///
    /// # Arguments
    /// * `songs` - Song source lessons are drawn from
    /// * `lessons` - Lesson and answer persistence
    /// * `rng` - Random source for song choice and item generation
    #[must_use]
    pub fn new(
        songs: Arc<dyn SongStore>,
        lessons: Arc<dyn LessonStore>,
        rng: Arc<dyn RngProvider>,
    ) -> Self {
        Self {
            songs,
            lessons,
            rng,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    /// Use one backend for both songs and lessons, seeded from the clock
    #[must_use]
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: SongStore + LessonStore + 'static,
    {
        Self::new(store.clone(), store, Arc::new(ClockSeeded))
    }

    /// Replace the random source
    #[must_use]
    pub fn with_rng(mut self, rng: Arc<dyn RngProvider>) -> Self {
        self.rng = rng;
        self
    }

    /// Bound every storage call by `timeout`
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn storage_timeout(&self) -> Duration {
        self.storage_timeout
    }

    /// Generate and persist a lesson for `user_id` from a random song.
    ///
    /// # Errors
    ///
    /// Returns `MissingUserId` for a blank user, `NoSongs` when the catalog
    /// is empty, `EmptySong` when the chosen song has no lines, or a storage
    /// error.
    pub async fn create_lesson(&self, user_id: &str) -> Result<CreatedLesson> {
        if user_id.trim().is_empty() {
            return Err(CoreError::MissingUserId);
        }

        let mut songs = self
            .bounded("all_songs", self.songs.all_songs())
            .await?;
        if songs.is_empty() {
            return Err(CoreError::NoSongs);
        }

        let mut rng = self.rng.rng();
        let song = songs.swap_remove(rng.gen_range(0..songs.len()));
        if song.lyrics.is_empty() {
            return Err(CoreError::EmptySong { song_id: song.id });
        }
        debug!(
            "Building lesson from {} - {} ({} lines)",
            song.artist,
            song.title,
            song.lyrics.line_count()
        );

        let items = build_items(&song.lyrics, &mut rng);
        let draft = LessonDraft::new(user_id, song.id, items);
        let lesson = self
            .bounded("create_lesson", self.lessons.create_lesson(draft))
            .await?;

        info!(
            "Created lesson {} for user {} ({} items, song {})",
            lesson.id,
            lesson.user_id,
            lesson.items.len(),
            lesson.song_id
        );
        Ok(CreatedLesson::from(&lesson))
    }

    /// Grade and record one answer.
    ///
    /// Fill answers are appended to the lesson; any other declared type is
    /// acknowledged as correct without being stored.
    ///
    /// # Errors
    ///
    /// Returns `LessonNotFound`, `DuplicateAnswer` when the item was already
    /// answered, a validation error for a bad index or type, or a storage
    /// error.
    pub async fn submit_answer(
        &self,
        lesson_id: &str,
        submission: Submission,
    ) -> Result<AnswerOutcome> {
        let lesson = self.load_lesson(lesson_id).await?;

        let judgement = match judge(&lesson, &submission) {
            Ok(judgement) => judgement,
            Err(err) => {
                warn!(
                    "Rejected answer for item {} of lesson {}: {}",
                    submission.item_index, lesson_id, err
                );
                return Err(err);
            }
        };

        let correct = judgement.correct();
        let Judgement::Record(answer) = judgement else {
            debug!(
                "Accepted unrecorded {} answer for item {} of lesson {}",
                submission.kind.as_str(),
                submission.item_index,
                lesson_id
            );
            return Ok(AnswerOutcome { ok: true, correct });
        };

        let item_index = answer.item_index;
        let outcome = self
            .bounded("append_answer", self.lessons.append_answer(lesson_id, answer))
            .await?;

        match outcome {
            AppendOutcome::Appended => {
                info!(
                    "Recorded answer for item {} of lesson {} (correct: {})",
                    item_index, lesson_id, correct
                );
                Ok(AnswerOutcome { ok: true, correct })
            }
            AppendOutcome::Conflict => {
                warn!(
                    "Lost race answering item {} of lesson {}",
                    item_index, lesson_id
                );
                Err(CoreError::DuplicateAnswer {
                    lesson_id: lesson_id.to_string(),
                    item_index,
                })
            }
            AppendOutcome::NotFound => Err(CoreError::LessonNotFound {
                lesson_id: lesson_id.to_string(),
            }),
        }
    }

    /// Score a lesson from its items and recorded answers.
    ///
    /// # Errors
    ///
    /// Returns `LessonNotFound` or a storage error.
    pub async fn summary(&self, lesson_id: &str) -> Result<LessonSummary> {
        let lesson = self.load_lesson(lesson_id).await?;
        Ok(summarize(&lesson))
    }

    /// Parse lyrics text and store it as a new song.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the song cannot be saved.
    pub async fn import_song(
        &self,
        title: &str,
        artist: &str,
        lyrics_text: &str,
    ) -> Result<ImportedSong> {
        let lyrics = Lyrics::parse(lyrics_text);
        let line_count = lyrics.line_count();
        let song = self
            .bounded(
                "insert_song",
                self.songs.insert_song(NewSong {
                    title: title.to_string(),
                    artist: artist.to_string(),
                    lyrics,
                }),
            )
            .await?;

        info!(
            "Imported song {} - {} as {} ({} lines)",
            song.artist, song.title, song.id, line_count
        );
        Ok(ImportedSong {
            song_id: song.id,
            line_count,
        })
    }

    /// Id and title of every stored song.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the catalog cannot be read.
    pub async fn list_songs(&self) -> Result<Vec<SongListing>> {
        let songs = self
            .bounded("all_songs", self.songs.all_songs())
            .await?;
        Ok(songs.iter().map(SongListing::from).collect())
    }

    async fn load_lesson(&self, lesson_id: &str) -> Result<Lesson> {
        self.bounded("lesson_by_id", self.lessons.lesson_by_id(lesson_id))
            .await?
            .ok_or_else(|| CoreError::LessonNotFound {
                lesson_id: lesson_id.to_string(),
            })
    }

    /// Run a storage call under the configured timeout
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.storage_timeout, call).await {
            Ok(result) => result.map_err(|source| CoreError::storage(operation, source)),
            Err(_) => {
                let timeout_ms =
                    u64::try_from(self.storage_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!("Storage operation {} timed out after {}ms", operation, timeout_ms);
                Err(CoreError::StorageTimeout {
                    operation,
                    timeout_ms,
                })
            }
        }
    }
}
