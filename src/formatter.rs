use crate::author::is_valid_author_name;
use crate::metadata::DocumentMetadata;
use crate::text::{collapse_whitespace, is_capitalized_word, is_initial, longest_char_run};

/// Characters most filesystems refuse or treat specially.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
/// Substrings left behind by broken metadata producers.
const GARBAGE_MARKERS: &[&str] = &["[object Object]", "\u{FFFD}"];
const GARBAGE_WORDS: &[&str] = &["undefined", "null", "NaN"];
const MAX_CHAR_RUN: usize = 3;

/// Builds `Title - Author [Year]<extension>`. Returns `None` when there is no title.
///
/// `extension` includes its leading dot. An author that fails validation is
/// dropped, and a result that still looks corrupted after sanitizing is
/// rebuilt from title and year alone.
pub fn format_filename(metadata: &DocumentMetadata, extension: &str) -> Option<String> {
    let title = trim_dashes(metadata.title.as_deref()?);
    if title.is_empty() {
        return None;
    }

    let author = metadata
        .author
        .as_deref()
        .filter(|a| is_valid_author_name(a))
        .map(format_author)
        .filter(|a| !a.is_empty());

    let mut stem = sanitize(&compose(title, author.as_deref(), metadata.year));
    if is_anomalous(&stem) {
        stem = sanitize(&compose(title, None, metadata.year));
    }

    if stem.is_empty() {
        return None;
    }
    Some(format!("{}{}", stem, extension))
}

/// Normalizes the spacing and punctuation of an author string.
pub fn format_author(author: &str) -> String {
    let tokens: Vec<&str> = trim_dashes(author).split_whitespace().collect();
    if tokens.is_empty() {
        return String::new();
    }

    let formatted = if tokens.len() >= 2 && tokens[..tokens.len() - 1].iter().all(|t| is_initial(t)) {
        // "J K Rowling" -> "J. K. Rowling"
        let mut words: Vec<String> = tokens[..tokens.len() - 1]
            .iter()
            .map(|t| format!("{}.", t.trim_end_matches('.')))
            .collect();
        words.push(tokens[tokens.len() - 1].to_string());
        words.join(" ")
    } else {
        group_authors(&tokens).join(", ")
    };

    trim_dashes(&formatted).to_string()
}

/// Splits a run of name tokens into one entry per author. A group ends at the
/// end of input, or after a full word once the group holds at least two
/// tokens and the next token starts a new name.
fn group_authors(tokens: &[&str]) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        current.push(with_initial_dot(token));

        let bare = token.trim_end_matches(',');
        let closes = match tokens.get(i + 1) {
            None => true,
            Some(next) => current.len() >= 2 && !is_initial(bare) && starts_new_name(next),
        };

        if closes {
            groups.push(current.join(" ").trim_end_matches(',').to_string());
            current.clear();
        }
    }

    groups
}

fn starts_new_name(token: &str) -> bool {
    is_capitalized_word(token) || is_initial(token.trim_end_matches(','))
}

fn with_initial_dot(token: &str) -> String {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => format!("{}.", c),
        _ => token.to_string(),
    }
}

fn compose(title: &str, author: Option<&str>, year: Option<u16>) -> String {
    let mut name = title.to_string();

    if let Some(author) = author {
        if !title.is_empty()
            && !author.is_empty()
            && !title.ends_with('-')
            && !author.starts_with('-')
        {
            name.push_str(" - ");
            name.push_str(author);
        }
    }

    if let Some(year) = year {
        name.push_str(&format!(" [{}]", year));
    }

    name
}

fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();
    collapse_whitespace(&replaced.replace(" - - ", " - "))
}

fn is_anomalous(name: &str) -> bool {
    name.contains(" - - ")
        || GARBAGE_MARKERS.iter().any(|m| name.contains(m))
        || name.split_whitespace().any(|w| GARBAGE_WORDS.contains(&w))
        || longest_char_run(name) > MAX_CHAR_RUN
}

fn trim_dashes(s: &str) -> &str {
    s.trim_matches(|c: char| c == '-' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str, author: Option<&str>, year: Option<u16>) -> DocumentMetadata {
        DocumentMetadata {
            title: Some(title.to_string()),
            author: author.map(String::from),
            year,
        }
    }

    #[test]
    fn test_generate_new_filename_with_all_fields() {
        let name = format_filename(&meta("Programming Basics", Some("John R Smith"), Some(2019)), ".pdf");
        assert_eq!(name.as_deref(), Some("Programming Basics - John R. Smith [2019].pdf"));
    }

    #[test]
    fn test_generate_new_filename_without_year() {
        let name = format_filename(&meta("Another Book", Some("Jane Doe"), None), ".pdf");
        assert_eq!(name.as_deref(), Some("Another Book - Jane Doe.pdf"));
    }

    #[test]
    fn test_no_title_gives_nothing() {
        let metadata = DocumentMetadata {
            title: None,
            author: Some("J. Doe".to_string()),
            year: Some(2000),
        };
        assert_eq!(format_filename(&metadata, ".pdf"), None);
        assert_eq!(format_filename(&meta(" - ", None, None), ".pdf"), None);
    }

    #[test]
    fn test_invalid_author_dropped() {
        let name = format_filename(&meta("Notes", Some("jross1"), Some(2011)), ".pdf");
        assert_eq!(name.as_deref(), Some("Notes [2011].pdf"));
    }

    #[test]
    fn test_format_author_initials() {
        assert_eq!(format_author("J K Rowling"), "J. K. Rowling");
        assert_eq!(format_author("А Б Иванов"), "А. Б. Иванов");
        assert_eq!(format_author("J. K. Rowling"), "J. K. Rowling");
        assert_eq!(format_author("J.K. Rowling"), "J.K. Rowling");
    }

    #[test]
    fn test_format_author_groups() {
        assert_eq!(format_author("John Smith Jane Doe"), "John Smith, Jane Doe");
        assert_eq!(
            format_author("Ernst Kunz, Richard G Belshoff"),
            "Ernst Kunz, Richard G. Belshoff"
        );
        assert_eq!(format_author("Smith, J"), "Smith, J.");
        assert_eq!(format_author("Rowling"), "Rowling");
        assert_eq!(format_author("- Jane Doe -"), "Jane Doe");
    }

    #[test]
    fn test_dash_edges_suppress_author_separator() {
        assert_eq!(compose("Title-", Some("J. Doe"), None), "Title-");
        assert_eq!(compose("Title", Some("-J. Doe"), None), "Title");
        assert_eq!(compose("Title", Some("J. Doe"), Some(1999)), "Title - J. Doe [1999]");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        let name = format_filename(&meta("What Is C/C++", None, Some(2020)), ".pdf");
        assert_eq!(name.as_deref(), Some("What Is C-C++ [2020].pdf"));
        assert_eq!(sanitize("A - - B"), "A - B");
        assert_eq!(sanitize("  Q|A   x "), "Q-A x");
    }

    #[test]
    fn test_anomaly_fallback_drops_author() {
        let name = format_filename(&meta("Intro to undefined", Some("J. Doe"), Some(2001)), ".pdf");
        assert_eq!(name.as_deref(), Some("Intro to undefined [2001].pdf"));

        let name = format_filename(&meta("Buzzzz Sleep", Some("J. Doe"), None), ".pdf");
        assert_eq!(name.as_deref(), Some("Buzzzz Sleep.pdf"));
    }
}
