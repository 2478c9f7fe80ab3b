//! Transport-agnostic request results, shaped for JSON clients.

use serde::{Deserialize, Serialize};

use crate::model::{Lesson, LessonItem, Song};

/// A freshly generated lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLesson {
    pub lesson_id: String,
    pub items: Vec<ItemView>,
}

impl From<&Lesson> for CreatedLesson {
    fn from(lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.id.clone(),
            items: lesson.items.iter().map(ItemView::from).collect(),
        }
    }
}

/// One exercise as clients see it. For fill items `words` holds the four
/// options and `correctWord` the answer key; for arrange items `words` is
/// the line in correct order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ItemView {
    #[serde(rename = "fillblanks", rename_all = "camelCase")]
    FillBlank {
        line_index: usize,
        rendered_line: String,
        words: Vec<String>,
        correct_word: String,
    },
    #[serde(rename = "arrange", rename_all = "camelCase")]
    Arrange { line_index: usize, words: Vec<String> },
}

impl From<&LessonItem> for ItemView {
    fn from(item: &LessonItem) -> Self {
        match item {
            LessonItem::FillBlank(fill) => Self::FillBlank {
                line_index: fill.line_index,
                rendered_line: fill.rendered_line.clone(),
                words: fill.options.clone(),
                correct_word: fill.correct_word.clone(),
            },
            LessonItem::Arrange(arrange) => Self::Arrange {
                line_index: arrange.line_index,
                words: arrange.words.clone(),
            },
        }
    }
}

/// Reply to an answer submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub ok: bool,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedSong {
    pub song_id: String,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongListing {
    pub id: String,
    pub title: String,
}

impl From<&Song> for SongListing {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id.clone(),
            title: song.title.clone(),
        }
    }
}
