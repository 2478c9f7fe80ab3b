//! Answer options for fill-in-the-blank exercises.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::model::Lyrics;

/// Options offered per blank, the correct word included.
pub const OPTION_COUNT: usize = 4;

/// The deduplicated, lower-cased word set of a song.
///
/// Words keep first-seen order so a seeded generator picks the same
/// distractors every time.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    #[must_use]
    pub fn from_lyrics(lyrics: &Lyrics) -> Self {
        let mut seen = HashSet::new();
        let words = lyrics
            .words()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .filter(|w| seen.insert(w.clone()))
            .collect();

        Self { words }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Build the shuffled option list for `correct`.
    ///
    /// The correct word keeps its original casing; distractors come from the
    /// lower-cased vocabulary. When fewer than three distractors exist the
    /// list is padded with copies of the correct word.
    pub fn options_for<R: Rng + ?Sized>(&self, correct: &str, rng: &mut R) -> Vec<String> {
        let correct_lower = correct.to_lowercase();

        let mut candidates: Vec<&str> = self
            .words
            .iter()
            .map(String::as_str)
            .filter(|w| *w != correct_lower)
            .collect();
        candidates.shuffle(rng);

        let mut options = Vec::with_capacity(OPTION_COUNT);
        options.push(correct.to_string());
        options.extend(
            candidates
                .into_iter()
                .take(OPTION_COUNT - 1)
                .map(ToString::to_string),
        );
        while options.len() < OPTION_COUNT {
            options.push(correct.to_string());
        }

        // So the correct answer is not always first
        options.shuffle(rng);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn lyrics(lines: Vec<Vec<&str>>) -> Lyrics {
        lines.into_iter().collect()
    }

    #[test]
    fn test_vocabulary_is_unique_lowercase_and_trimmed() {
        let vocab = Vocabulary::from_lyrics(&lyrics(vec![
            vec!["I", "Love", "you"],
            vec!["you", "LOVE", " me ", ""],
        ]));
        assert_eq!(vocab.len(), 4);
        assert!(vocab.contains("i"));
        assert!(vocab.contains("love"));
        assert!(vocab.contains("me"));
        assert!(!vocab.contains("Love"));
        assert!(!vocab.contains(""));
    }

    #[test]
    fn test_options_have_four_entries_with_correct_word() {
        let vocab = Vocabulary::from_lyrics(&lyrics(vec![
            vec!["sun", "is", "bright"],
            vec!["moon", "is", "dark"],
        ]));
        let mut rng = SmallRng::seed_from_u64(3);
        let options = vocab.options_for("Moon", &mut rng);
        assert_eq!(options.len(), OPTION_COUNT);
        assert_eq!(options.iter().filter(|o| *o == "Moon").count(), 1);
        assert!(!options.iter().any(|o| o == "moon"));

        let distinct: HashSet<_> = options.iter().collect();
        assert_eq!(distinct.len(), OPTION_COUNT);
    }

    #[test]
    fn test_short_vocabulary_pads_with_correct_word() {
        let vocab = Vocabulary::from_lyrics(&lyrics(vec![vec!["hey", "you"]]));
        let mut rng = SmallRng::seed_from_u64(11);
        let options = vocab.options_for("hey", &mut rng);
        assert_eq!(options.len(), OPTION_COUNT);
        assert_eq!(options.iter().filter(|o| *o == "hey").count(), 3);
        assert_eq!(options.iter().filter(|o| *o == "you").count(), 1);
    }

    #[test]
    fn test_single_word_vocabulary_is_all_correct() {
        let vocab = Vocabulary::from_lyrics(&lyrics(vec![vec!["la", "la"]]));
        let mut rng = SmallRng::seed_from_u64(5);
        let options = vocab.options_for("la", &mut rng);
        assert_eq!(options, vec!["la"; OPTION_COUNT]);
    }

    #[test]
    fn test_correct_position_is_roughly_uniform() {
        let vocab = Vocabulary::from_lyrics(&lyrics(vec![
            vec!["run", "fast", "now"],
            vec!["stop", "right", "there"],
            vec!["sun", "is", "bright"],
        ]));
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut slots = [0_u32; OPTION_COUNT];
        let trials = 8000;

        for _ in 0..trials {
            let options = vocab.options_for("run", &mut rng);
            let position = options.iter().position(|o| o == "run").unwrap();
            slots[position] += 1;
        }

        // Expected 2000 per slot
        for count in slots {
            assert!((1700..=2300).contains(&count), "skewed slots: {slots:?}");
        }
    }
}
