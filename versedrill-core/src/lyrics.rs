//! Turning lyrics text into lines of words.
//!
//! Accepts plain text (one lyric line per text line) as well as LRC files:
//! line timestamps such as `[00:12.34]` and enhanced word stamps such as
//! `<00:12.34>` are stripped, and ID tags such as `[ti:Title]` are dropped.

use crate::model::Lyrics;

impl Lyrics {
    /// Parse lyrics text into lines of whitespace-separated words.
    ///
    /// Blank lines between lyric lines are kept as empty lines so line
    /// indices match the source text.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::default();
        }

        let lines = input
            .lines()
            .filter(|line| !is_id_tag(line.trim()))
            .map(|line| {
                let text = strip_line_timestamps(line.trim());
                strip_word_stamps(text)
                    .split_whitespace()
                    .map(ToString::to_string)
                    .collect()
            })
            .collect();

        Self::from_lines(lines)
    }
}

/// Check for an ID tag like [ti:Title] or [ar:Artist]
fn is_id_tag(line: &str) -> bool {
    if !line.starts_with('[') || !line.ends_with(']') {
        return false;
    }

    let content = &line[1..line.len() - 1];
    let Some(first_colon) = content.find(':') else {
        return false;
    };
    let tag = &content[..first_colon];

    // A numeric tag is a timestamp, not an ID tag
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphabetic())
}

/// Strip leading timestamps like [00:12.34] or [00:12.34][00:15.67]
fn strip_line_timestamps(line: &str) -> &str {
    let mut remaining = line;

    while remaining.starts_with('[') {
        let Some(end) = remaining.find(']') else {
            break;
        };
        if !is_timestamp(&remaining[1..end]) {
            break;
        }
        remaining = &remaining[end + 1..];
    }

    remaining
}

/// Remove enhanced LRC word timing: <mm:ss.xx> word1 <mm:ss.xx> word2 ...
fn strip_word_stamps(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut remaining = text;

    while let Some(start) = remaining.find('<') {
        output.push_str(&remaining[..start]);
        let after = &remaining[start + 1..];
        match after.find('>') {
            Some(end) if is_timestamp(&after[..end]) => {
                output.push(' ');
                remaining = &after[end + 1..];
            }
            _ => {
                output.push('<');
                remaining = after;
            }
        }
    }
    output.push_str(remaining);

    output
}

/// Check for a timestamp like "00:12.34", "00:12:34" or "00:12"
fn is_timestamp(s: &str) -> bool {
    let parts: Vec<&str> = s.trim().split(':').collect();

    match parts.len() {
        2 => parts[0].parse::<u64>().is_ok() && parts[1].parse::<f64>().is_ok(),
        3 => parts.iter().all(|p| p.parse::<u64>().is_ok()),
        _ => false,
    }
}
