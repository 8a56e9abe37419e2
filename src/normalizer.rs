use crate::author::{is_likely_author, is_valid_author_name};
use crate::metadata::DocumentMetadata;
use crate::text::cleanup;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// Imprints that often lead a scanned or downloaded filename.
/// Longer names come first so "Packt Publishing" wins over "Packt".
const PUBLISHER_PREFIXES: &[&str] = &[
    "Dorling Kindersley",
    "Packt Publishing",
    "No Starch Press",
    "Addison-Wesley",
    "McGraw-Hill",
    "O'Reilly",
    "O’Reilly",
    "Springer",
    "Manning",
    "Apress",
    "Packt",
    "Wiley",
    "DK",
];

const MIN_YEAR: u16 = 1500;
const MAX_YEAR: u16 = 2099;

lazy_static! {
    static ref TRAILING_YEAR: Regex = Regex::new(
        r"^(?P<rest>.*?)[\s,\-]*(?:[\[(](?P<bracketed>\d{4})[\])]|\b(?P<bare>\d{4}))$"
    )
    .unwrap();
    static ref BY_SEPARATOR: Regex = Regex::new(r"(?i)^(?P<title>.+)\s+by\s+(?P<author>.+)$").unwrap();
    static ref PAREN_SUFFIX: Regex = Regex::new(r"^(?P<title>.+?)\s*\((?P<author>[^()]+)\)$").unwrap();
}

/// Ways a cleaned filename can carry an author next to the title.
/// Tried in declaration order; the first one that matches decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitPattern {
    AuthorDashTitle,
    TitleDashAuthor,
    TitleByAuthor,
    TitleParenAuthor,
}

const SPLIT_PATTERNS: [SplitPattern; 4] = [
    SplitPattern::AuthorDashTitle,
    SplitPattern::TitleDashAuthor,
    SplitPattern::TitleByAuthor,
    SplitPattern::TitleParenAuthor,
];

/// A `(title, author)` guess produced by one pattern before the sides are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedCandidate<'a> {
    title_part: &'a str,
    author_part: &'a str,
}

impl SplitPattern {
    fn candidate(self, s: &str) -> Option<ParsedCandidate<'_>> {
        let (title_part, author_part) = match self {
            SplitPattern::AuthorDashTitle => {
                let (left, right) = s.split_once(" - ")?;
                if !is_likely_author(left.trim()) {
                    return None;
                }
                (right, left)
            }
            SplitPattern::TitleDashAuthor => {
                let (left, right) = s.rsplit_once(" - ")?;
                if !is_likely_author(right.trim()) {
                    return None;
                }
                (left, right)
            }
            SplitPattern::TitleByAuthor => {
                let caps = BY_SEPARATOR.captures(s)?;
                let title = caps.name("title")?.as_str();
                let author = caps.name("author")?.as_str();
                if !plausible_author_side(author) {
                    return None;
                }
                (title, author)
            }
            SplitPattern::TitleParenAuthor => {
                let caps = PAREN_SUFFIX.captures(s)?;
                let title = caps.name("title")?.as_str();
                let author = caps.name("author")?.as_str();
                if !plausible_author_side(author) {
                    return None;
                }
                (title, author)
            }
        };

        let title_part = title_part.trim();
        let author_part = author_part.trim();
        if title_part.is_empty() || author_part.is_empty() {
            return None;
        }

        Some(ParsedCandidate {
            title_part,
            author_part,
        })
    }
}

impl ParsedCandidate<'_> {
    /// Picks which side is the author. When both or neither side looks like a
    /// person's name, the shorter side is taken as the author.
    fn resolve(&self) -> (String, String) {
        let title_is_author = is_likely_author(self.title_part);
        let author_is_author = is_likely_author(self.author_part);

        let swap = match (author_is_author, title_is_author) {
            (true, false) => false,
            (false, true) => true,
            _ => self.title_part.chars().count() < self.author_part.chars().count(),
        };

        if swap {
            (self.author_part.to_string(), self.title_part.to_string())
        } else {
            (self.title_part.to_string(), self.author_part.to_string())
        }
    }
}

/// Author side of a `by` or parenthesized suffix. A lone word ("Stand by Me")
/// is only taken when it is shaped like a name.
fn plausible_author_side(s: &str) -> bool {
    let s = s.trim();
    if !is_valid_author_name(s) || s.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    s.split_whitespace().count() >= 2 || is_likely_author(s)
}

/// Splits a filename (extension already removed) into title, author and year.
pub fn parse_filename(stem: &str) -> DocumentMetadata {
    let cleaned = cleanup(stem);
    let without_publisher = strip_publisher_prefix(&cleaned);
    let (working, year) = extract_trailing_year(without_publisher);

    let mut title = working.to_string();
    let mut author = None;

    for pattern in SPLIT_PATTERNS {
        if let Some(candidate) = pattern.candidate(working) {
            let (t, a) = candidate.resolve();
            debug!("Pattern {:?} matched {:?}: title={:?} author={:?}", pattern, working, t, a);
            title = t;
            author = Some(a);
            break;
        }
    }

    DocumentMetadata {
        title: Some(title).filter(|t| !t.is_empty()),
        author,
        year,
    }
}

fn strip_publisher_prefix(s: &str) -> &str {
    for prefix in PUBLISHER_PREFIXES {
        let Some(head) = s.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }

        let rest = &s[prefix.len()..];
        if rest.chars().next().is_some_and(|c| c.is_alphanumeric()) {
            continue;
        }

        let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '-' || c == ',');
        if !rest.is_empty() {
            return rest;
        }
    }

    s
}

fn extract_trailing_year(s: &str) -> (&str, Option<u16>) {
    let Some(caps) = TRAILING_YEAR.captures(s) else {
        return (s, None);
    };

    let year = caps
        .name("bracketed")
        .or_else(|| caps.name("bare"))
        .and_then(|m| m.as_str().parse::<u16>().ok())
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y));

    let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();
    match year {
        Some(year) if !rest.is_empty() => (rest, Some(year)),
        _ => (s, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publisher_year_and_author_suffix() {
        let metadata = parse_filename("McGraw-Hill.Programming_Basics_-_John_R_Smith_(2019)");
        assert_eq!(metadata.title.as_deref(), Some("Programming Basics"));
        assert_eq!(metadata.author.as_deref(), Some("John R Smith"));
        assert_eq!(metadata.year, Some(2019));
    }

    #[test]
    fn test_parse_author_before_title() {
        let metadata = parse_filename("J K Rowling - Harry Potter and the Goblet of Fire");
        assert_eq!(metadata.author.as_deref(), Some("J K Rowling"));
        assert_eq!(
            metadata.title.as_deref(),
            Some("Harry Potter and the Goblet of Fire")
        );
        assert_eq!(metadata.year, None);
    }

    #[test]
    fn test_parse_title_by_author() {
        let metadata = parse_filename("Programming Rust by Jim Blandy [2017]");
        assert_eq!(metadata.title.as_deref(), Some("Programming Rust"));
        assert_eq!(metadata.author.as_deref(), Some("Jim Blandy"));
        assert_eq!(metadata.year, Some(2017));
    }

    #[test]
    fn test_single_word_after_by_stays_in_title() {
        for stem in ["Stand_by_Me", "Learning_by_Doing"] {
            let metadata = parse_filename(stem);
            assert_eq!(metadata.author, None, "{}", stem);
            assert_eq!(metadata.title.as_deref(), Some(stem.replace('_', " ").as_str()));
        }

        let metadata = parse_filename("Algebra (Lang)");
        assert_eq!(metadata.title.as_deref(), Some("Algebra (Lang)"));
        assert_eq!(metadata.author, None);
    }

    #[test]
    fn test_parse_parenthesized_author() {
        let metadata = parse_filename("Sheaf Theory (B R Tennison)");
        assert_eq!(metadata.title.as_deref(), Some("Sheaf Theory"));
        assert_eq!(metadata.author.as_deref(), Some("B R Tennison"));
    }

    #[test]
    fn test_parse_plain_title() {
        let metadata = parse_filename("random_document");
        assert_eq!(metadata.title.as_deref(), Some("random document"));
        assert_eq!(metadata.author, None);
        assert_eq!(metadata.year, None);
    }

    #[test]
    fn test_dash_without_author_shape_stays_in_title() {
        let metadata = parse_filename("Go - John Smith");
        assert_eq!(metadata.title.as_deref(), Some("Go - John Smith"));
        assert_eq!(metadata.author, None);
    }

    #[test]
    fn test_title_with_inner_dash_keeps_last_split() {
        let metadata = parse_filename("Rust - The Book - J Doe");
        assert_eq!(metadata.title.as_deref(), Some("Rust - The Book"));
        assert_eq!(metadata.author.as_deref(), Some("J Doe"));
    }

    #[test]
    fn test_both_sides_author_shaped_picks_shorter() {
        let candidate = ParsedCandidate {
            title_part: "A. B. Longername",
            author_part: "C. Doe",
        };
        let (title, author) = candidate.resolve();
        assert_eq!(author, "C. Doe");
        assert_eq!(title, "A. B. Longername");

        let candidate = ParsedCandidate {
            title_part: "C. Doe",
            author_part: "A. B. Longername",
        };
        let (title, author) = candidate.resolve();
        assert_eq!(author, "C. Doe");
        assert_eq!(title, "A. B. Longername");
    }

    #[test]
    fn test_strip_publisher_prefix() {
        assert_eq!(strip_publisher_prefix("Packt Mastering Rust"), "Mastering Rust");
        assert_eq!(strip_publisher_prefix("packt - Mastering Rust"), "Mastering Rust");
        assert_eq!(strip_publisher_prefix("DK Eyewitness Guide"), "Eyewitness Guide");
        assert_eq!(strip_publisher_prefix("DKNY Catalogue"), "DKNY Catalogue");
        assert_eq!(strip_publisher_prefix("Manning"), "Manning");
    }

    #[test]
    fn test_extract_trailing_year() {
        assert_eq!(extract_trailing_year("Title [2001]"), ("Title", Some(2001)));
        assert_eq!(extract_trailing_year("Title (1999)"), ("Title", Some(1999)));
        assert_eq!(extract_trailing_year("Title 2020"), ("Title", Some(2020)));
        assert_eq!(extract_trailing_year("Title 12019"), ("Title 12019", None));
        assert_eq!(extract_trailing_year("Room 1234"), ("Room 1234", None));
        assert_eq!(extract_trailing_year("2019"), ("2019", None));
    }
}
