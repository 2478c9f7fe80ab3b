//! Assembles the exercises of one lesson from a song's lines.
//!
//! The primary pass takes fill-in-the-blank lines first, then arrange lines,
//! never using a line twice. When the song is too short to fill the lesson
//! that way, a fallback pass walks every line in random order and accepts
//! any item whose signature is new, so one line may appear once as a blank
//! and once as an arrangement.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

use crate::classifier::{classify_lines, MIN_ARRANGE_WORDS, MIN_FILL_WORDS};
use crate::distractor::Vocabulary;
use crate::model::{ArrangeItem, FillBlankItem, LessonItem, Lyrics};

/// Items in a complete lesson.
pub const LESSON_SIZE: usize = 6;

/// Fill-in-the-blank items the primary pass aims for.
pub const FILL_TARGET: usize = 3;

/// Replaces the hidden word in a rendered line.
pub const BLANK_MARKER: &str = "___";

/// Build up to [`LESSON_SIZE`] items for a song.
///
/// Fewer items come back only when the song lacks enough distinct material.
pub fn build_items<R: Rng + ?Sized>(lyrics: &Lyrics, rng: &mut R) -> Vec<LessonItem> {
    let vocabulary = Vocabulary::from_lyrics(lyrics);
    let mut pools = classify_lines(lyrics, rng);
    debug!(
        "Candidate pools: {} fill, {} arrange, vocabulary of {} words",
        pools.fill.len(),
        pools.arrange.len(),
        vocabulary.len()
    );

    let mut used = HashSet::new();
    let mut items = Vec::with_capacity(LESSON_SIZE);

    while items.len() < FILL_TARGET {
        let Some(index) = pools.fill.take_unused(&mut used) else {
            break;
        };
        if let Some(words) = lyrics.line(index) {
            items.push(LessonItem::FillBlank(fill_item(
                index,
                words,
                &vocabulary,
                rng,
            )));
        }
    }

    while items.len() < LESSON_SIZE {
        let Some(index) = pools.arrange.take_unused(&mut used) else {
            break;
        };
        if let Some(words) = lyrics.line(index) {
            items.push(LessonItem::Arrange(arrange_item(index, words)));
        }
    }

    if items.len() < LESSON_SIZE {
        debug!(
            "Primary pass built {} of {} items, running fallback pass",
            items.len(),
            LESSON_SIZE
        );
        fill_with_fallback(lyrics, &vocabulary, &mut items, rng);
    }

    items
}

/// Walk a random permutation of every line, alternating item types by the
/// current item count, and keep candidates with an unseen signature.
fn fill_with_fallback<R: Rng + ?Sized>(
    lyrics: &Lyrics,
    vocabulary: &Vocabulary,
    items: &mut Vec<LessonItem>,
    rng: &mut R,
) {
    let mut seen: HashSet<String> = items.iter().map(LessonItem::signature).collect();

    let mut order: Vec<usize> = (0..lyrics.line_count()).collect();
    order.shuffle(rng);

    for index in order {
        if items.len() >= LESSON_SIZE {
            break;
        }
        let Some(words) = lyrics.line(index) else {
            continue;
        };
        if words.len() < MIN_ARRANGE_WORDS {
            continue;
        }

        let candidate = if items.len() % 2 == 0 && words.len() >= MIN_FILL_WORDS {
            LessonItem::FillBlank(fill_item(index, words, vocabulary, rng))
        } else {
            LessonItem::Arrange(arrange_item(index, words))
        };

        if seen.insert(candidate.signature()) {
            items.push(candidate);
        }
    }
}

fn fill_item<R: Rng + ?Sized>(
    line_index: usize,
    words: &[String],
    vocabulary: &Vocabulary,
    rng: &mut R,
) -> FillBlankItem {
    let hidden = rng.gen_range(0..words.len());
    let correct_word = words[hidden].clone();
    let options = vocabulary.options_for(&correct_word, rng);

    FillBlankItem {
        line_index,
        rendered_line: render_blank(words, hidden),
        options,
        correct_word,
    }
}

fn arrange_item(line_index: usize, words: &[String]) -> ArrangeItem {
    ArrangeItem {
        line_index,
        words: words.to_vec(),
    }
}

/// Join the words with single spaces, the hidden one replaced by the marker.
#[must_use]
pub fn render_blank(words: &[String], hidden: usize) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| if i == hidden { BLANK_MARKER } else { w.as_str() })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distractor::OPTION_COUNT;
    use crate::model::ExerciseKind;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn lyrics(lines: Vec<Vec<&str>>) -> Lyrics {
        lines.into_iter().collect()
    }

    fn six_line_song() -> Lyrics {
        lyrics(vec![
            vec!["I", "love", "you"],
            vec!["you", "love", "me"],
            vec!["sun", "is", "bright"],
            vec!["moon", "is", "dark"],
            vec!["run", "fast", "now"],
            vec!["stop", "right", "there"],
        ])
    }

    fn count(items: &[LessonItem], kind: ExerciseKind) -> usize {
        items.iter().filter(|i| i.kind() == kind).count()
    }

    fn assert_unique_signatures(items: &[LessonItem]) {
        let signatures: HashSet<String> = items.iter().map(LessonItem::signature).collect();
        assert_eq!(signatures.len(), items.len(), "duplicate signature in {items:?}");
    }

    #[test]
    fn test_render_blank() {
        let words: Vec<String> = ["I", "love", "you"].iter().map(ToString::to_string).collect();
        assert_eq!(render_blank(&words, 0), "___ love you");
        assert_eq!(render_blank(&words, 1), "I ___ you");
        assert_eq!(render_blank(&words, 2), "I love ___");
    }

    #[test]
    fn test_six_distinct_lines_give_three_and_three() {
        let song = six_line_song();
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let items = build_items(&song, &mut rng);

            assert_eq!(items.len(), LESSON_SIZE);
            assert_eq!(count(&items, ExerciseKind::FillBlank), 3);
            assert_eq!(count(&items, ExerciseKind::Arrange), 3);

            let lines: HashSet<usize> = items.iter().map(LessonItem::line_index).collect();
            assert_eq!(lines.len(), LESSON_SIZE, "line reused with seed {seed}");
        }
    }

    #[test]
    fn test_fill_items_are_consistent_with_their_line() {
        let song = six_line_song();
        let mut rng = SmallRng::seed_from_u64(99);
        let items = build_items(&song, &mut rng);

        for item in &items {
            match item {
                LessonItem::FillBlank(fill) => {
                    let words = song.line(fill.line_index).unwrap();
                    assert_eq!(fill.options.len(), OPTION_COUNT);
                    assert!(fill.options.contains(&fill.correct_word));
                    assert!(words.contains(&fill.correct_word));
                    assert_eq!(fill.rendered_line.matches(BLANK_MARKER).count(), 1);
                    assert_eq!(
                        fill.rendered_line.replacen(BLANK_MARKER, &fill.correct_word, 1),
                        words.join(" ")
                    );
                }
                LessonItem::Arrange(arrange) => {
                    assert_eq!(arrange.words, song.line(arrange.line_index).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_lesson() {
        let song = six_line_song();
        let first = build_items(&song, &mut SmallRng::seed_from_u64(17));
        let second = build_items(&song, &mut SmallRng::seed_from_u64(17));
        assert_eq!(first, second);
    }

    #[test]
    fn test_arrange_pass_tops_up_when_fill_lines_are_scarce() {
        let song = lyrics(vec![
            vec!["hold", "on"],
            vec!["one"],
            vec!["two"],
            vec!["three"],
            vec!["four"],
            vec!["five"],
            vec!["six"],
            vec!["seven"],
        ]);
        let mut rng = SmallRng::seed_from_u64(4);
        let items = build_items(&song, &mut rng);

        assert_eq!(items.len(), LESSON_SIZE);
        assert_eq!(count(&items, ExerciseKind::FillBlank), 1);
        assert_eq!(count(&items, ExerciseKind::Arrange), 5);
        let lines: HashSet<usize> = items.iter().map(LessonItem::line_index).collect();
        assert_eq!(lines.len(), LESSON_SIZE);
    }

    #[test]
    fn test_fallback_never_duplicates_signatures() {
        let song = lyrics(vec![
            vec!["only", "this", "line"],
            vec!["oh"],
            vec!["yeah"],
            vec![],
        ]);
        for seed in 0..100 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let items = build_items(&song, &mut rng);
            assert!(items.len() <= LESSON_SIZE);
            assert_unique_signatures(&items);
            assert!(items.iter().all(|i| i.line_index() != 3), "empty line used");
        }
    }

    #[test]
    fn test_fallback_reuses_a_line_under_the_other_type() {
        let song = lyrics(vec![vec!["a", "b", "c"]]);
        let mut rng = SmallRng::seed_from_u64(8);
        let items = build_items(&song, &mut rng);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind(), ExerciseKind::FillBlank);
        assert_eq!(items[1].kind(), ExerciseKind::Arrange);
        assert!(items.iter().all(|i| i.line_index() == 0));
    }

    #[test]
    fn test_single_word_lines_only_make_arrange_items() {
        let song = lyrics(vec![vec!["hey"], vec!["ho"]]);
        let mut rng = SmallRng::seed_from_u64(21);
        let items = build_items(&song, &mut rng);

        assert_eq!(items.len(), 2);
        assert_eq!(count(&items, ExerciseKind::Arrange), 2);
        assert_unique_signatures(&items);
    }

    #[test]
    fn test_song_without_words_gives_no_items() {
        let song = lyrics(vec![vec![], vec![]]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(build_items(&song, &mut rng).is_empty());
    }
}
