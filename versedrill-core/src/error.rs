use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to encode or decode stored JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored record is corrupt: {reason}")]
    Corrupt { reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    // Validation errors
    #[error("userId is required")]
    MissingUserId,

    #[error("No songs available")]
    NoSongs,

    #[error("Song {song_id} has no lines")]
    EmptySong { song_id: String },

    #[error("Item index {item_index} is out of range for a lesson with {item_count} items")]
    ItemIndexOutOfRange { item_index: usize, item_count: usize },

    #[error("Item {item_index} is not a fill-in-the-blank exercise")]
    NotFillBlank { item_index: usize },

    // Conflict
    #[error("Duplicate answer for item {item_index} of lesson {lesson_id}")]
    DuplicateAnswer { lesson_id: String, item_index: usize },

    // Not found
    #[error("Lesson not found: {lesson_id}")]
    LessonNotFound { lesson_id: String },

    // Storage errors
    #[error("Storage operation {operation} failed: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Storage operation {operation} timed out after {timeout_ms}ms")]
    StorageTimeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    // Configuration errors
    #[error("Config file not found at {path}. A template has been created.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification callers use to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Storage,
    Config,
}

impl CoreError {
    /// Wrap a store failure with the name of the operation that produced it.
    #[must_use]
    pub const fn storage(operation: &'static str, source: StoreError) -> Self {
        Self::Storage { operation, source }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingUserId
            | Self::NoSongs
            | Self::EmptySong { .. }
            | Self::ItemIndexOutOfRange { .. }
            | Self::NotFillBlank { .. } => ErrorKind::Validation,
            Self::DuplicateAnswer { .. } => ErrorKind::Conflict,
            Self::LessonNotFound { .. } => ErrorKind::NotFound,
            Self::Storage { .. } | Self::StorageTimeout { .. } => ErrorKind::Storage,
            Self::ConfigNotFound { .. }
            | Self::ConfigInvalid { .. }
            | Self::ConfigParseError(_)
            | Self::IoError(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_conflict_not_validation() {
        let err = CoreError::DuplicateAnswer {
            lesson_id: "abc".to_string(),
            item_index: 0,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_ne!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_validation_kinds() {
        assert_eq!(CoreError::MissingUserId.kind(), ErrorKind::Validation);
        assert_eq!(CoreError::NoSongs.kind(), ErrorKind::Validation);
        assert_eq!(
            CoreError::ItemIndexOutOfRange {
                item_index: 9,
                item_count: 6
            }
            .kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_storage_error_keeps_operation_context() {
        let err = CoreError::storage(
            "append_answer",
            StoreError::Corrupt {
                reason: "bad row".to_string(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::Storage);
        let message = err.to_string();
        assert!(message.contains("append_answer"));
        assert!(message.contains("bad row"));
    }

    #[test]
    fn test_not_found_kind() {
        let err = CoreError::LessonNotFound {
            lesson_id: "missing".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Lesson not found: missing");
    }
}
