//! Document parser: raw note text → [`ParsedNote`]
//!
//! Reads one exported markdown note and produces the typed intermediate
//! representation the block serializer and publisher work from. Every
//! extraction step degrades to a default rather than failing: a missing
//! front-matter fence, a malformed timestamp or an absent title pattern
//! never abort the parse.

use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants as C;
use crate::icon;

static FRONT_MATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*\n").unwrap());
static CREATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"created:\s*([\d-]+\s[\d:]+)").unwrap());
static UPDATED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"date:\s*([\d-]+\s[\d:]+)").unwrap());
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C::IMAGE_PATTERN).unwrap());
static RULE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\\?-{2,}$").unwrap());
static COUNTER_PHRASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(C::COUNTER_PHRASE_PATTERN).unwrap());

/// One exported note, parsed and normalized. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNote {
    /// Derived from the counter phrase in the body, or the file stem
    pub title: String,
    /// ISO-8601 UTC; defaults to now when the export carries no field
    pub created: String,
    /// ISO-8601 UTC; defaults to `created`
    pub updated: String,
    /// Normalized body lines; may contain the sentinel markers
    pub paragraphs: Vec<String>,
    /// Image filenames in order of appearance, duplicates preserved
    pub images: Vec<String>,
    /// First discovered image, used for the page cover
    pub cover_image: Option<String>,
    /// Inferred page icon, `None` when inference is disabled
    pub icon: Option<&'static str>,
}

/// Parse one note's raw text into a [`ParsedNote`].
///
/// `path` is only used for the filename-based title fallback.
pub fn parse_note(raw: &str, path: &Path, infer_icon: bool) -> ParsedNote {
    let (body, front_matter) = split_front_matter(raw);

    // The fence is removed from the body but stays searchable for metadata.
    let searchable = format!("{}\n{}", body, front_matter);
    let created = CREATED_RE
        .captures(&searchable)
        .and_then(|caps| format_date(&caps[1]))
        .unwrap_or_else(now_utc);
    let updated = UPDATED_RE
        .captures(&searchable)
        .and_then(|caps| format_date(&caps[1]))
        .unwrap_or_else(|| created.clone());

    let images: Vec<String> = IMAGE_RE
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect();
    let cover_image = images.first().cloned();

    let paragraphs = normalize_body(body);
    let title = derive_title(body, path);
    let icon = if infer_icon {
        Some(icon::predict_icon(body, &title))
    } else {
        None
    };

    ParsedNote {
        title,
        created,
        updated,
        paragraphs,
        images,
        cover_image,
        icon,
    }
}

/// Split a leading `---`-fenced front-matter block off the body.
///
/// Returns `(body, front_matter_text)`; both are empty-string tolerant and
/// the fence's absence is not an error.
fn split_front_matter(raw: &str) -> (&str, &str) {
    match FRONT_MATTER_RE.captures(raw) {
        Some(caps) => {
            let whole = caps.get(0).unwrap();
            let front = caps.get(1).unwrap().as_str();
            (raw[whole.end()..].trim(), front)
        }
        None => (raw.trim(), ""),
    }
}

/// Convert `YYYY-MM-DD HH:MM:SS` to ISO-8601 UTC.
///
/// A field that is present but malformed is logged and treated as absent.
fn format_date(raw: &str) -> Option<String> {
    match NaiveDateTime::parse_from_str(raw, C::SOURCE_DATE_FORMAT) {
        Ok(dt) => Some(dt.format(C::NOTION_DATE_FORMAT).to_string()),
        Err(err) => {
            warn!("malformed timestamp '{}': {}", raw, err);
            None
        }
    }
}

fn now_utc() -> String {
    Utc::now().format(C::NOTION_DATE_FORMAT).to_string()
}

/// Normalize the body into the paragraph sequence.
///
/// Images are removed (handled out-of-band), horizontal rules and `<br>`
/// tags become sentinel markers, blank lines become spacers, and runs of
/// consecutive spacers collapse to one.
fn normalize_body(body: &str) -> Vec<String> {
    let without_images = IMAGE_RE.replace_all(body, "");
    let text = RULE_LINE_RE.replace_all(without_images.trim(), C::HORIZONTAL_LINE);
    let text = text.replace("<br>", C::EMPTY_BLOCK);

    let mut paragraphs = Vec::new();
    let mut prev_empty = false;
    for line in text.split('\n') {
        let entry = if line.trim().is_empty() {
            C::EMPTY_BLOCK
        } else {
            line
        };
        if entry == C::EMPTY_BLOCK {
            if !prev_empty {
                paragraphs.push(entry.to_string());
            }
            prev_empty = true;
        } else {
            paragraphs.push(entry.to_string());
            prev_empty = false;
        }
    }
    paragraphs
}

/// Derive the page title from the counter phrase, falling back to the
/// file stem truncated to [`C::MAX_TITLE_LENGTH`] characters.
fn derive_title(body: &str, path: &Path) -> String {
    if let Some(m) = COUNTER_PHRASE_RE.find(body) {
        return m.as_str().trim_end_matches('。').to_string();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string());

    let title = if stem.chars().count() > C::MAX_TITLE_LENGTH {
        let truncated: String = stem.chars().take(C::MAX_TITLE_LENGTH - 3).collect();
        format!("{}...", truncated)
    } else {
        stem
    };

    title.trim_end_matches('。').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(raw: &str) -> ParsedNote {
        parse_note(raw, &PathBuf::from("/notes/test-note.md"), false)
    }

    #[test]
    fn test_front_matter_stripped_but_searchable() {
        let raw = "---\ncreated: 2024-03-01 07:30:00\n---\nHello world\n";
        let note = parse(raw);
        assert_eq!(note.created, "2024-03-01T07:30:00Z");
        assert_eq!(note.paragraphs, vec!["Hello world".to_string()]);
    }

    #[test]
    fn test_front_matter_absent_is_not_an_error() {
        let note = parse("Just a body\n");
        assert_eq!(note.paragraphs, vec!["Just a body".to_string()]);
    }

    #[test]
    fn test_front_matter_strip_is_idempotent() {
        let raw = "---\nkey: value\n---\nBody line\n";
        let (body, front) = split_front_matter(raw);
        assert_eq!(front, "key: value");
        // A second pass over the extracted body changes nothing.
        let (body_again, front_again) = split_front_matter(body);
        assert_eq!(body_again, body);
        assert_eq!(front_again, "");
    }

    #[test]
    fn test_date_field_sets_updated() {
        let raw = "created: 2024-03-01 07:30:00\ndate: 2024-03-02 08:00:00\nbody";
        let note = parse(raw);
        assert_eq!(note.created, "2024-03-01T07:30:00Z");
        assert_eq!(note.updated, "2024-03-02T08:00:00Z");
    }

    #[test]
    fn test_updated_defaults_to_created() {
        let raw = "created: 2024-03-01 07:30:00\nbody";
        let note = parse(raw);
        assert_eq!(note.updated, note.created);
    }

    #[test]
    fn test_malformed_timestamp_falls_back() {
        assert_eq!(format_date("2024-13-99 99:99:99"), None);
        assert_eq!(
            format_date("2024-03-01 07:30:00"),
            Some("2024-03-01T07:30:00Z".to_string())
        );
    }

    #[test]
    fn test_images_in_order_with_prefix_stripped() {
        let raw = "![a](Files/IMG_1.png)\ntext\n![b](IMG_2.jpg)\n![c](Files/IMG_1.png)\n";
        let note = parse(raw);
        assert_eq!(note.images, vec!["IMG_1.png", "IMG_2.jpg", "IMG_1.png"]);
        assert_eq!(note.cover_image.as_deref(), Some("IMG_1.png"));
    }

    #[test]
    fn test_image_tags_removed_from_body() {
        let note = parse("before ![x](Files/pic.png) after\n");
        assert_eq!(note.paragraphs, vec!["before  after".to_string()]);
    }

    #[test]
    fn test_spacer_runs_collapse() {
        assert_eq!(
            normalize_body("a\n\n\n\nb"),
            vec!["a", C::EMPTY_BLOCK, "b"]
        );
    }

    #[test]
    fn test_br_tag_becomes_spacer() {
        assert_eq!(
            normalize_body("a\n<br>\nb"),
            vec!["a", C::EMPTY_BLOCK, "b"]
        );
    }

    #[test]
    fn test_br_then_blank_collapses_to_one_spacer() {
        assert_eq!(
            normalize_body("a\n<br>\n\nb"),
            vec!["a", C::EMPTY_BLOCK, "b"]
        );
    }

    #[test]
    fn test_horizontal_rules_become_sentinel() {
        assert_eq!(normalize_body("a\n---\nb"), vec!["a", C::HORIZONTAL_LINE, "b"]);
        assert_eq!(
            normalize_body("a\n\\--\nb"),
            vec!["a", C::HORIZONTAL_LINE, "b"]
        );
    }

    #[test]
    fn test_title_from_counter_phrase_strips_punctuation() {
        let note = parse("今日もやった。朝勉勤続123日目。いい感じ\n");
        assert_eq!(note.title, "朝勉勤続123日目");
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let note = parse_note("no pattern here", &PathBuf::from("/x/My Diary Entry.md"), false);
        assert_eq!(note.title, "My Diary Entry");
    }

    #[test]
    fn test_long_filename_title_truncated() {
        let long = "x".repeat(120);
        let path = PathBuf::from(format!("/x/{}.md", long));
        let note = parse_note("body", &path, false);
        assert_eq!(note.title.chars().count(), C::MAX_TITLE_LENGTH);
        assert!(note.title.ends_with("..."));
    }

    #[test]
    fn test_icon_disabled_yields_none() {
        let note = parse("朝勉がんばった\n");
        assert_eq!(note.icon, None);
    }

    #[test]
    fn test_icon_enabled_yields_some() {
        let note = parse_note("朝勉がんばった\n", &PathBuf::from("/x/a.md"), true);
        assert!(note.icon.is_some());
    }
}
