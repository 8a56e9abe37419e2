use crate::formatter::format_author;
use crate::metadata::DocumentMetadata;

/// Embedded metadata is only worth reading when the filename gave no author.
pub fn needs_embedded(parsed: &DocumentMetadata) -> bool {
    parsed.author.is_none()
}

/// Merges filename-derived and embedded metadata. The filename wins for title
/// and year, embedded metadata wins for the author. Returns `None` when no
/// title survives, which drops the file from further processing.
pub fn resolve(
    parsed: DocumentMetadata,
    embedded: Option<DocumentMetadata>,
) -> Option<DocumentMetadata> {
    let embedded = embedded.unwrap_or_default();

    let title = non_blank(parsed.title).or_else(|| non_blank(embedded.title))?;
    let year = parsed.year.or(embedded.year);

    let (title, author) = match non_blank(embedded.author) {
        Some(author) => (strip_author_suffix(title, &author), Some(author)),
        None => (title, non_blank(parsed.author)),
    };

    Some(DocumentMetadata {
        title: Some(title),
        author,
        year,
    })
}

/// Removes trailing ` - <author>` segments naming `author`, as left behind in the
/// title by an earlier rename that took the author from embedded metadata.
fn strip_author_suffix(title: String, author: &str) -> String {
    let wanted = format_author(author).to_lowercase();
    if wanted.is_empty() {
        return title;
    }

    let mut current = title.as_str();
    while let Some((head, tail)) = current.rsplit_once(" - ") {
        let head = head.trim_end();
        if head.is_empty() || format_author(tail).to_lowercase() != wanted {
            break;
        }
        current = head;
    }
    current.to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
