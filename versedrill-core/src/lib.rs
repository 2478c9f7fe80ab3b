pub mod builder;
pub mod classifier;
pub mod config;
pub mod contracts;
pub mod distractor;
pub mod error;
pub mod lyrics;
pub mod model;
pub mod paths;
pub mod random;
pub mod service;
pub mod sqlite;
pub mod store;
pub mod summary;
pub mod validator;

pub use builder::{build_items, render_blank, BLANK_MARKER, FILL_TARGET, LESSON_SIZE};
pub use config::{DrillConfig, LoggingConfig, StorageConfig};
pub use contracts::{AnswerOutcome, CreatedLesson, ImportedSong, ItemView, SongListing};
pub use distractor::{Vocabulary, OPTION_COUNT};
pub use error::{CoreError, ErrorKind, StoreError};
pub use model::{
    ArrangeItem, ExerciseKind, FillBlankItem, Lesson, LessonAnswer, LessonDraft, LessonItem,
    Lyrics, NewSong, Song, Submission,
};
pub use paths::{
    config_dir, config_path, database_path, log_file_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
    DATABASE_FILE_NAME, LOG_FILE_NAME,
};
pub use random::{ClockSeeded, FixedSeed, RngProvider};
pub use service::{LessonService, DEFAULT_STORAGE_TIMEOUT};
pub use sqlite::SqliteStore;
pub use store::{AppendOutcome, LessonStore, SongStore};
pub use summary::{summarize, LessonSummary};
