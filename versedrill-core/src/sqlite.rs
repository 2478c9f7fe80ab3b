use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, TransactionBehavior};
use std::path::Path;
use tokio_rusqlite::Connection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{ExerciseKind, Lesson, LessonAnswer, LessonDraft, LessonItem, Lyrics, NewSong, Song};
use crate::store::{AppendOutcome, LessonStore, SongStore};

const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS songs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    artist TEXT NOT NULL,
    lyrics TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- Items are written once as JSON and never updated
CREATE TABLE IF NOT EXISTS lessons (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    song_id TEXT NOT NULL,
    items TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- One answer per item; the unique key makes appends conditional
CREATE TABLE IF NOT EXISTS lesson_answers (
    id INTEGER PRIMARY KEY,
    lesson_id TEXT NOT NULL,
    item_index INTEGER NOT NULL,
    answer_type TEXT NOT NULL,
    user_input TEXT NOT NULL,
    correct INTEGER NOT NULL,
    answered_at INTEGER NOT NULL,
    FOREIGN KEY (lesson_id) REFERENCES lessons(id) ON DELETE CASCADE,
    UNIQUE(lesson_id, item_index)
);

CREATE INDEX IF NOT EXISTS idx_lessons_user ON lessons(user_id);
CREATE INDEX IF NOT EXISTS idx_answers_lesson ON lesson_answers(lesson_id);
";

/// Raw `lessons` row before JSON decoding
struct LessonRow {
    id: String,
    user_id: String,
    song_id: String,
    items: String,
    created_at: i64,
}

/// Raw `lesson_answers` row
struct AnswerRow {
    item_index: i64,
    answer_type: String,
    user_input: String,
    correct: bool,
}

/// SQLite-backed song and lesson store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at the default location
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or opened.
    pub async fn new() -> Result<Self, StoreError> {
        let db_path = crate::paths::database_path();
        Self::open(&db_path).await
    }

    /// Open a database at a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Opening lesson database at {:?}", path);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).await?;
        Self::init(conn).await
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA_SQL)?;
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await?;

        info!("Lesson database initialized");
        Ok(Self { conn })
    }

    /// Checkpoint WAL for clean shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the WAL checkpoint fails.
    pub async fn checkpoint(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE)")?;
                Ok(())
            })
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl SongStore for SqliteStore {
    async fn all_songs(&self) -> Result<Vec<Song>, StoreError> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare_cached(
                    r"
                    SELECT id, title, artist, lyrics
                    FROM songs
                    ORDER BY created_at, rowid
                ",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        debug!("Loaded {} songs", rows.len());

        rows.into_iter()
            .map(|(id, title, artist, lyrics)| {
                Ok(Song {
                    id,
                    title,
                    artist,
                    lyrics: serde_json::from_str::<Lyrics>(&lyrics)?,
                })
            })
            .collect()
    }

    async fn insert_song(&self, song: NewSong) -> Result<Song, StoreError> {
        let id = Uuid::new_v4().to_string();
        let lyrics = serde_json::to_string(&song.lyrics)?;
        let now = Utc::now().timestamp_millis();

        info!(
            "Storing song: {} - {} ({} lines, id: {})",
            song.artist,
            song.title,
            song.lyrics.line_count(),
            id
        );

        let (row_id, title, artist) = (id.clone(), song.title.clone(), song.artist.clone());
        self.conn
            .call(move |conn| {
                conn.execute(
                    r"
                    INSERT INTO songs (id, title, artist, lyrics, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                ",
                    rusqlite::params![row_id, title, artist, lyrics, now],
                )?;
                Ok(())
            })
            .await?;

        Ok(Song {
            id,
            title: song.title,
            artist: song.artist,
            lyrics: song.lyrics,
        })
    }
}

#[async_trait]
impl LessonStore for SqliteStore {
    async fn create_lesson(&self, draft: LessonDraft) -> Result<Lesson, StoreError> {
        let id = draft.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let created_at = truncate_to_millis(draft.created_at.unwrap_or_else(Utc::now));
        let items = serde_json::to_string(&draft.items)?;

        let values = (
            id.clone(),
            draft.user_id.clone(),
            draft.song_id.clone(),
            items,
            created_at.timestamp_millis(),
        );
        self.conn
            .call(move |conn| {
                conn.execute(
                    r"
                    INSERT INTO lessons (id, user_id, song_id, items, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                ",
                    rusqlite::params![values.0, values.1, values.2, values.3, values.4],
                )?;
                Ok(())
            })
            .await?;

        info!(
            "Stored lesson {} for user {} ({} items, song {})",
            id,
            draft.user_id,
            draft.items.len(),
            draft.song_id
        );

        Ok(Lesson {
            id,
            user_id: draft.user_id,
            song_id: draft.song_id,
            items: draft.items,
            answers: Vec::new(),
            created_at,
        })
    }

    async fn lesson_by_id(&self, lesson_id: &str) -> Result<Option<Lesson>, StoreError> {
        debug!("Looking up lesson {}", lesson_id);
        let lesson_id = lesson_id.to_string();

        let found = self
            .conn
            .call(move |conn| {
                let lesson = conn
                    .prepare_cached(
                        r"
                        SELECT id, user_id, song_id, items, created_at
                        FROM lessons
                        WHERE id = ?1
                    ",
                    )?
                    .query_row(rusqlite::params![lesson_id], |row| {
                        Ok(LessonRow {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            song_id: row.get(2)?,
                            items: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    })
                    .optional()?;

                let Some(lesson) = lesson else {
                    return Ok(None);
                };

                let mut stmt = conn.prepare_cached(
                    r"
                    SELECT item_index, answer_type, user_input, correct
                    FROM lesson_answers
                    WHERE lesson_id = ?1
                    ORDER BY id
                ",
                )?;
                let answers = stmt
                    .query_map(rusqlite::params![lesson.id], |row| {
                        Ok(AnswerRow {
                            item_index: row.get(0)?,
                            answer_type: row.get(1)?,
                            user_input: row.get(2)?,
                            correct: row.get(3)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(Some((lesson, answers)))
            })
            .await?;

        found
            .map(|(lesson, answers)| decode_lesson(lesson, answers))
            .transpose()
    }

    async fn append_answer(
        &self,
        lesson_id: &str,
        answer: LessonAnswer,
    ) -> Result<AppendOutcome, StoreError> {
        let lesson_id = lesson_id.to_string();
        let item_index = i64::try_from(answer.item_index).map_err(|_| StoreError::Corrupt {
            reason: format!("item index {} does not fit in a database integer", answer.item_index),
        })?;
        let answer_type = answer.kind.as_str();
        let now = Utc::now().timestamp_millis();

        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

                let exists = tx
                    .query_row(
                        "SELECT 1 FROM lessons WHERE id = ?1",
                        rusqlite::params![lesson_id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some();
                if !exists {
                    return Ok(AppendOutcome::NotFound);
                }

                let inserted = tx.execute(
                    r"
                    INSERT INTO lesson_answers
                        (lesson_id, item_index, answer_type, user_input, correct, answered_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(lesson_id, item_index) DO NOTHING
                ",
                    rusqlite::params![
                        lesson_id,
                        item_index,
                        answer_type,
                        answer.user_input,
                        answer.correct,
                        now
                    ],
                )?;
                tx.commit()?;

                Ok(if inserted == 0 {
                    AppendOutcome::Conflict
                } else {
                    AppendOutcome::Appended
                })
            })
            .await?;

        debug!("Answer append for item {}: {:?}", item_index, outcome);
        Ok(outcome)
    }
}

fn decode_lesson(row: LessonRow, answers: Vec<AnswerRow>) -> Result<Lesson, StoreError> {
    let items: Vec<LessonItem> = serde_json::from_str(&row.items)?;

    let answers = answers
        .into_iter()
        .map(|a| {
            let item_index = usize::try_from(a.item_index).map_err(|_| StoreError::Corrupt {
                reason: format!("negative item index {} in lesson {}", a.item_index, row.id),
            })?;
            let kind = ExerciseKind::from_wire(&a.answer_type).ok_or_else(|| StoreError::Corrupt {
                reason: format!("unknown answer type {:?} in lesson {}", a.answer_type, row.id),
            })?;
            Ok(LessonAnswer {
                item_index,
                kind,
                user_input: a.user_input,
                correct: a.correct,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(Lesson {
        id: row.id,
        user_id: row.user_id,
        song_id: row.song_id,
        items,
        answers,
        created_at: DateTime::from_timestamp_millis(row.created_at).unwrap_or_else(Utc::now),
    })
}

/// Stored timestamps have millisecond precision
fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}
