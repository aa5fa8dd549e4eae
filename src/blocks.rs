//! Block serializer: normalized paragraphs → Notion content blocks
//!
//! Total and order-preserving: every paragraph entry maps to exactly one
//! [`ContentBlock`], in input order. Classification is first-match-wins in
//! the priority order divider, spacer, heading, bullet, numbered, quote,
//! code, styled paragraph.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::constants as C;

static RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\\?-{2,}$").unwrap());
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,3})\s+(.+)$").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+(.+)$").unwrap());
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.+)$").unwrap());
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s+(.+)$").unwrap());
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

/// One styled run of text inside a paragraph block.
#[derive(Debug, Clone, PartialEq)]
pub struct RichSpan {
    pub text: String,
    pub bold: bool,
}

impl RichSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// One structured unit of page content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    BulletItem { text: String },
    NumberedItem { text: String },
    Quote { text: String },
    CodeBlock { text: String },
    Divider,
    Spacer,
    Paragraph { spans: Vec<RichSpan> },
}

/// Map every paragraph entry to exactly one block, preserving order.
pub fn serialize_paragraphs(paragraphs: &[String]) -> Vec<ContentBlock> {
    paragraphs.iter().map(|p| classify(p)).collect()
}

fn classify(paragraph: &str) -> ContentBlock {
    if paragraph == C::HORIZONTAL_LINE || RULE_RE.is_match(paragraph.trim()) {
        return ContentBlock::Divider;
    }
    if paragraph == C::EMPTY_BLOCK {
        return ContentBlock::Spacer;
    }
    if let Some(caps) = HEADING_RE.captures(paragraph) {
        return ContentBlock::Heading {
            level: caps[1].len() as u8,
            text: caps[2].to_string(),
        };
    }
    if let Some(caps) = BULLET_RE.captures(paragraph) {
        return ContentBlock::BulletItem {
            text: caps[1].to_string(),
        };
    }
    if let Some(caps) = NUMBERED_RE.captures(paragraph) {
        return ContentBlock::NumberedItem {
            text: caps[1].to_string(),
        };
    }
    if let Some(caps) = QUOTE_RE.captures(paragraph) {
        return ContentBlock::Quote {
            text: caps[1].to_string(),
        };
    }
    if CODE_RE.is_match(paragraph) {
        // Single-line handling only: a fenced multi-line code block is not
        // reconstructed across entries, each line is classified on its own.
        return ContentBlock::CodeBlock {
            text: paragraph.replace("```", ""),
        };
    }
    ContentBlock::Paragraph {
        spans: split_bold_spans(paragraph),
    }
}

/// Split `**bold**`-delimited runs into styled spans.
///
/// Text before/after/between matches becomes plain spans; with no delimiters
/// the whole entry is one plain span.
pub fn split_bold_spans(text: &str) -> Vec<RichSpan> {
    let mut spans = Vec::new();
    let mut last_end = 0;
    for caps in BOLD_RE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > last_end {
            spans.push(RichSpan::plain(&text[last_end..whole.start()]));
        }
        spans.push(RichSpan::bold(&caps[1]));
        last_end = whole.end();
    }

    if spans.is_empty() {
        return vec![RichSpan::plain(text)];
    }
    if last_end < text.len() {
        spans.push(RichSpan::plain(&text[last_end..]));
    }
    spans
}

impl ContentBlock {
    /// Render this block as a Notion API block object.
    pub fn to_json(&self) -> Value {
        match self {
            ContentBlock::Divider => {
                json!({"object": "block", "type": "divider", "divider": {}})
            }
            ContentBlock::Spacer => {
                json!({"object": "block", "type": "paragraph", "paragraph": {"rich_text": []}})
            }
            ContentBlock::Heading { level, text } => {
                let rich = json!({"rich_text": [{"text": {"content": text}}]});
                match level {
                    1 => json!({"object": "block", "type": "heading_1", "heading_1": rich}),
                    2 => json!({"object": "block", "type": "heading_2", "heading_2": rich}),
                    _ => json!({"object": "block", "type": "heading_3", "heading_3": rich}),
                }
            }
            ContentBlock::BulletItem { text } => json!({
                "object": "block",
                "type": "bulleted_list_item",
                "bulleted_list_item": {"rich_text": [{"text": {"content": text}}]}
            }),
            ContentBlock::NumberedItem { text } => json!({
                "object": "block",
                "type": "numbered_list_item",
                "numbered_list_item": {"rich_text": [{"text": {"content": text}}]}
            }),
            ContentBlock::Quote { text } => json!({
                "object": "block",
                "type": "quote",
                "quote": {"rich_text": [{"text": {"content": text}}]}
            }),
            ContentBlock::CodeBlock { text } => json!({
                "object": "block",
                "type": "code",
                "code": {
                    "rich_text": [{"text": {"content": text}}],
                    "language": "plain_text"
                }
            }),
            ContentBlock::Paragraph { spans } => {
                let rich: Vec<Value> = spans
                    .iter()
                    .map(|span| {
                        if span.bold {
                            json!({
                                "text": {"content": span.text},
                                "annotations": {"bold": true}
                            })
                        } else {
                            json!({"text": {"content": span.text}})
                        }
                    })
                    .collect();
                json!({"object": "block", "type": "paragraph", "paragraph": {"rich_text": rich}})
            }
        }
    }
}
