use crate::similarity::edit_distance;
use crate::text::{
    collapse_whitespace, has_letter, is_capitalized_word, is_initial, is_only_symbols,
    longest_char_run, strip_punctuation,
};
use lazy_static::lazy_static;
use regex::Regex;

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 100;
const MAX_NAME_PARTS: usize = 6;
// Parts shorter than this are compared by edit distance as well as equality.
const NEAR_DUPLICATE_CHARS: usize = 10;

lazy_static! {
    static ref USERNAME: Regex = Regex::new(r"^[a-z]+\d+$").unwrap();
    static ref DOTTED_INITIALS: Regex = Regex::new(r"^(?:[A-ZА-ЯЁ]\.)+[A-ZА-ЯЁ]?\.?$").unwrap();
}

/// Decides whether `text` could plausibly be a person's name (or a short
/// list of names). Garbage, usernames and repeated fragments are rejected.
pub fn is_valid_author_name(text: &str) -> bool {
    let text = text.trim();
    let stripped = collapse_whitespace(&strip_punctuation(text));

    // Encoding artifacts like "aaaa" or "ÃÃÃ"
    if longest_char_run(&stripped) >= 3 {
        return false;
    }

    if !has_letter(&stripped) || is_only_symbols(text) {
        return false;
    }

    let len = stripped.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len) {
        return false;
    }

    let parts = name_parts(text);
    if parts.is_empty() || parts.len() > MAX_NAME_PARTS {
        return false;
    }

    if parts.iter().any(|part| USERNAME.is_match(part)) {
        return false;
    }

    if !parts.iter().any(|part| has_name_shaped_word(part)) {
        return false;
    }

    !has_repeated_parts(&parts)
}

/// A valid name that also carries the marks of a person's name:
/// initials, or a short punctuated form such as `Smith, J.`.
pub fn is_likely_author(text: &str) -> bool {
    if !is_valid_author_name(text) {
        return false;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let has_initial = words.iter().any(|w| is_initial(w));
    let punctuated_short = (text.contains(',') || text.contains('.'))
        && words.len() <= 3
        && words.iter().any(|w| w.chars().count() <= 2);

    has_initial || punctuated_short || (words.len() <= 3 && has_initial)
}

fn name_parts(text: &str) -> Vec<&str> {
    text.split(['-', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn has_name_shaped_word(part: &str) -> bool {
    part.split_whitespace()
        .any(|w| is_capitalized_word(w) || is_initial(w) || DOTTED_INITIALS.is_match(w))
}

fn has_repeated_parts(parts: &[&str]) -> bool {
    let lowered: Vec<String> = parts.iter().map(|p| p.to_lowercase()).collect();

    for (i, a) in lowered.iter().enumerate() {
        for b in &lowered[i + 1..] {
            if a == b {
                return true;
            }
            let short = a.chars().count() < NEAR_DUPLICATE_CHARS
                && b.chars().count() < NEAR_DUPLICATE_CHARS;
            if short && edit_distance(a, b) <= 1 {
                return true;
            }
        }
    }

    false
}
