//! Constants for upnote2notion
//!
//! This module contains the fixed values shared across the pipeline:
//! sentinel markers, regex patterns, Notion API endpoints and property
//! names, and the retry/pacing policy defaults.

// === Notion API ===

/// Page-creation endpoint
pub const NOTION_PAGES_ENDPOINT: &str = "https://api.notion.com/v1/pages";

/// Notion-Version header value
pub const NOTION_VERSION: &str = "2022-06-28";

/// Request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// === Notion database properties ===

/// Title property name
pub const TITLE_PROPERTY: &str = "タイトル";

/// Created-date property name
pub const CREATED_PROPERTY: &str = "作成日";

/// Updated-date property name
pub const UPDATED_PROPERTY: &str = "更新日";

/// Default name of the files property that receives the images
pub const DEFAULT_IMAGE_PROPERTY: &str = "画像";

// === Images ===

/// Base URL of the server the exported images were uploaded to
pub const BASE_IMAGE_URL: &str = "https://www.soratomo.com/img_UpNote_diary/";

/// Subdirectory (next to the notes) holding the local copies of the images
pub const IMAGE_SUBDIR: &str = "Files";

// === File enumeration ===

/// Extension of the note files (matched case-insensitively)
pub const MARKDOWN_EXTENSION: &str = "md";

// === Sentinel markers ===

/// Placeholder a horizontal rule is normalized to before serialization
pub const HORIZONTAL_LINE: &str = "<HORIZONTAL_LINE>";

/// Placeholder a blank line or `<br>` tag is normalized to
pub const EMPTY_BLOCK: &str = "<EMPTY_BLOCK>";

// === Regex patterns ===

/// Markdown image syntax; capture group 1 is the filename without the
/// optional `Files/` export subdirectory prefix
pub const IMAGE_PATTERN: &str = r"!\[[^\]]*\]\((?:Files/)?([^)]+)\)";

/// The recurring "morning study, day N" counter phrase used as the title
pub const COUNTER_PHRASE_PATTERN: &str = "朝勉勤続\\d+日目。?";

/// Day counter inside a title, e.g. "123日目"
pub const DAY_COUNT_PATTERN: &str = "(\\d+)日目";

/// Hashtag token, removed from the icon-inference excerpt
pub const HASHTAG_PATTERN: &str = r"#\S+";

// === Date formats ===

/// Timestamp format used by the `created:`/`date:` fields in the export
pub const SOURCE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO-8601 UTC format expected by the Notion date properties
pub const NOTION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// === Limits and policies ===

/// Maximum title length before truncation with an ellipsis
pub const MAX_TITLE_LENGTH: usize = 100;

/// Number of leading characters of the body used for icon inference
pub const ICON_EXCERPT_LENGTH: usize = 160;

/// Upload attempts consumed by non-auth errors before a note is marked failed
pub const MAX_RETRIES: u32 = 3;

/// Fixed delay between retry attempts, and the fallback when a 429 response
/// carries no Retry-After header (seconds)
pub const RETRY_DELAY_SECS: u64 = 2;

/// Pacing sleep after every note, dry-run included (milliseconds)
pub const PACING_DELAY_MILLIS: u64 = 1000;

/// Icon used when neither the keyword table nor the day counter matches
pub const DEFAULT_ICON: &str = "📝";
