//! Splits a song's lines into shuffled candidate pools per exercise type.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

use crate::model::Lyrics;

/// Minimum words a line needs to host a blank (one hidden, one shown).
pub const MIN_FILL_WORDS: usize = 2;

/// Minimum words a line needs to be arranged.
pub const MIN_ARRANGE_WORDS: usize = 1;

/// Pre-shuffled line indices, consumed front to back.
#[derive(Debug, Clone, Default)]
pub struct CandidateQueue {
    queue: VecDeque<usize>,
}

impl CandidateQueue {
    fn shuffled<R: Rng + ?Sized>(mut indices: Vec<usize>, rng: &mut R) -> Self {
        indices.shuffle(rng);
        Self {
            queue: indices.into(),
        }
    }

    /// Pop indices until one not yet in `used` turns up, then mark it used.
    pub fn take_unused(&mut self, used: &mut HashSet<usize>) -> Option<usize> {
        while let Some(index) = self.queue.pop_front() {
            if used.insert(index) {
                return Some(index);
            }
        }
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandidatePools {
    pub fill: CandidateQueue,
    pub arrange: CandidateQueue,
}

/// Build both pools from the song's lines, each shuffled independently.
pub fn classify_lines<R: Rng + ?Sized>(lyrics: &Lyrics, rng: &mut R) -> CandidatePools {
    let mut fill = Vec::with_capacity(lyrics.line_count());
    let mut arrange = Vec::with_capacity(lyrics.line_count());

    for (index, line) in lyrics.lines().iter().enumerate() {
        if line.len() >= MIN_FILL_WORDS {
            fill.push(index);
        }
        if line.len() >= MIN_ARRANGE_WORDS {
            arrange.push(index);
        }
    }

    CandidatePools {
        fill: CandidateQueue::shuffled(fill, rng),
        arrange: CandidateQueue::shuffled(arrange, rng),
    }
}
