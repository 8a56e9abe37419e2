use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEPARATOR_RUN: Regex = Regex::new(r"[_.]+").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref INITIAL: Regex = Regex::new(r"^[A-ZА-ЯЁ]\.?$").unwrap();
    static ref CAPITALIZED_WORD: Regex = Regex::new(r"^[A-ZА-ЯЁ][a-zа-яё]+").unwrap();
}

/// Turns `_`/`.` runs into spaces, collapses whitespace and trims.
pub fn cleanup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let spaced = SEPARATOR_RUN.replace_all(text, " ");
    collapse_whitespace(&spaced)
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// True for Latin or Cyrillic letters only.
pub fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(c, '\u{00C0}'..='\u{024F}')
        || matches!(c, '\u{0400}'..='\u{04FF}')
}

pub fn has_letter(text: &str) -> bool {
    text.chars().any(is_name_letter)
}

pub fn is_only_symbols(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

/// `X` or `X.`
pub fn is_initial(word: &str) -> bool {
    INITIAL.is_match(word)
}

pub fn is_capitalized_word(word: &str) -> bool {
    CAPITALIZED_WORD.is_match(word)
}

/// Drops everything except letters, digits and whitespace.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Length of the longest run of one repeated character.
pub fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_collapses_separators() {
        assert_eq!(
            cleanup("Programming_Basics_-_John_R_Smith"),
            "Programming Basics - John R Smith"
        );
        assert_eq!(cleanup("a..b__c   d"), "a b c d");
        assert_eq!(cleanup("  padded  "), "padded");
        assert_eq!(cleanup(""), "");
    }

    #[test]
    fn test_character_classes() {
        assert!(has_letter("Иванов"));
        assert!(has_letter("x1"));
        assert!(!has_letter("123 456"));
        assert!(is_only_symbols("!!!@@@"));
        assert!(!is_only_symbols("!a"));
        assert!(!is_only_symbols(""));
    }

    #[test]
    fn test_initial_and_capitalized() {
        assert!(is_initial("J"));
        assert!(is_initial("J."));
        assert!(is_initial("Б."));
        assert!(!is_initial("j"));
        assert!(!is_initial("Jo"));

        assert!(is_capitalized_word("Rowling"));
        assert!(is_capitalized_word("Иванов"));
        assert!(!is_capitalized_word("rowling"));
        assert!(!is_capitalized_word("R"));
    }

    #[test]
    fn test_longest_char_run() {
        assert_eq!(longest_char_run(""), 0);
        assert_eq!(longest_char_run("abc"), 1);
        assert_eq!(longest_char_run("aaaab"), 4);
        assert_eq!(longest_char_run("Illinois"), 2);
    }
}
