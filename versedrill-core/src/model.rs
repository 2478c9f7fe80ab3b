//! Songs, lessons and the exercises inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Song lyrics as ordered lines of ordered words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lyrics {
    lines: Vec<Vec<String>>,
}

impl Lyrics {
    #[must_use]
    pub const fn from_lines(lines: Vec<Vec<String>>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[Vec<String>] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&[String]> {
        self.lines.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every word of every line, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flatten().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<Vec<S>> for Lyrics {
    fn from_iter<I: IntoIterator<Item = Vec<S>>>(iter: I) -> Self {
        Self {
            lines: iter
                .into_iter()
                .map(|line| line.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

/// A stored song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub lyrics: Lyrics,
}

/// A song that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub lyrics: Lyrics,
}

/// Exercise type, as named on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseKind {
    #[serde(rename = "fillblanks")]
    FillBlank,
    #[serde(rename = "arrange")]
    Arrange,
}

impl ExerciseKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FillBlank => "fillblanks",
            Self::Arrange => "arrange",
        }
    }

    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "fillblanks" => Some(Self::FillBlank),
            "arrange" => Some(Self::Arrange),
            _ => None,
        }
    }

    /// Interpret a client-declared type. Anything other than `fillblanks`
    /// is a non-fill declaration and is never graded server-side.
    #[must_use]
    pub fn from_declared(s: &str) -> Self {
        match Self::from_wire(s) {
            Some(Self::FillBlank) => Self::FillBlank,
            _ => Self::Arrange,
        }
    }
}

/// One word of a line hidden behind a blank, with four options to pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankItem {
    pub line_index: usize,
    pub rendered_line: String,
    pub options: Vec<String>,
    pub correct_word: String,
}

/// A line whose words the learner puts back in order. `words` holds the
/// correct order; shuffling and checking happen client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangeItem {
    pub line_index: usize,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LessonItem {
    #[serde(rename = "fillblanks")]
    FillBlank(FillBlankItem),
    #[serde(rename = "arrange")]
    Arrange(ArrangeItem),
}

impl LessonItem {
    #[must_use]
    pub const fn kind(&self) -> ExerciseKind {
        match self {
            Self::FillBlank(_) => ExerciseKind::FillBlank,
            Self::Arrange(_) => ExerciseKind::Arrange,
        }
    }

    #[must_use]
    pub const fn line_index(&self) -> usize {
        match self {
            Self::FillBlank(item) => item.line_index,
            Self::Arrange(item) => item.line_index,
        }
    }

    /// Dedup key: rendered text for fill items, line index for arrange items.
    #[must_use]
    pub fn signature(&self) -> String {
        match self {
            Self::FillBlank(item) => format!("F:{}", item.rendered_line),
            Self::Arrange(item) => format!("A:{}", item.line_index),
        }
    }

    #[must_use]
    pub const fn as_fill_blank(&self) -> Option<&FillBlankItem> {
        match self {
            Self::FillBlank(item) => Some(item),
            Self::Arrange(_) => None,
        }
    }
}

/// A recorded answer. Only fill-in-the-blank answers are ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonAnswer {
    pub item_index: usize,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub user_input: String,
    pub correct: bool,
}

/// A persisted lesson. `items` never change after creation; `answers` only grow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: String,
    pub user_id: String,
    pub song_id: String,
    pub items: Vec<LessonItem>,
    pub answers: Vec<LessonAnswer>,
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    /// The recorded answer for an item, if any
    #[must_use]
    pub fn answer_for(&self, item_index: usize) -> Option<&LessonAnswer> {
        self.answers.iter().find(|a| a.item_index == item_index)
    }
}

/// A generated lesson awaiting persistence. The store fills in `id` and
/// `created_at` when they are absent.
#[derive(Debug, Clone)]
pub struct LessonDraft {
    pub id: Option<String>,
    pub user_id: String,
    pub song_id: String,
    pub items: Vec<LessonItem>,
    pub created_at: Option<DateTime<Utc>>,
}

impl LessonDraft {
    #[must_use]
    pub fn new(user_id: impl Into<String>, song_id: impl Into<String>, items: Vec<LessonItem>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            song_id: song_id.into(),
            items,
            created_at: None,
        }
    }
}

/// A learner's answer to one lesson item.
#[derive(Debug, Clone)]
pub struct Submission {
    pub item_index: usize,
    pub kind: ExerciseKind,
    pub user_input: String,
}
