//! Remote publisher: page payload building and upload with bounded retry
//!
//! The wire payload is assembled from a [`ParsedNote`] plus its serialized
//! blocks; the upload itself goes through the [`PageTransport`] seam so the
//! retry policy can be exercised without a network.

use std::thread;
use std::time::Duration;

use log::warn;
use serde_json::{json, Value};

use crate::blocks::ContentBlock;
use crate::config::Settings;
use crate::constants as C;
use crate::error::{Error, Result};
use crate::note::ParsedNote;

/// Result of one page upload after the retry loop has run its course.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Page created.
    Success,
    /// Retries exhausted; the note is marked failed and the batch continues.
    RetryableFailure(String),
    /// Credentials rejected (401/403); the caller must abort the batch.
    FatalFailure(String),
}

/// Minimal view of the HTTP response the retry loop needs.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    /// Parsed Retry-After header, seconds
    pub retry_after: Option<u64>,
    pub body: String,
}

/// Transport seam for the page-creation call.
pub trait PageTransport {
    /// POST the payload to the pages endpoint. `Err` is a network-transport
    /// failure (no response at all).
    fn create_page(&mut self, payload: &Value) -> std::result::Result<PageResponse, String>;

    /// Backoff and pacing sleep.
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Live transport over the Notion REST API.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(C::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(Error::Http)?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }
}

impl PageTransport for HttpTransport {
    fn create_page(&mut self, payload: &Value) -> std::result::Result<PageResponse, String> {
        let response = self
            .client
            .post(C::NOTION_PAGES_ENDPOINT)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", C::NOTION_VERSION)
            .json(payload)
            .send()
            .map_err(|err| err.to_string())?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let body = response.text().unwrap_or_default();

        Ok(PageResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Transport that refuses every call. Used for dry runs, where no request
/// may be issued.
pub struct OfflineTransport;

impl PageTransport for OfflineTransport {
    fn create_page(&mut self, _payload: &Value) -> std::result::Result<PageResponse, String> {
        Err("offline transport: no network calls allowed".to_string())
    }
}

/// Compose the hosted URL for an exported image, lower-casing the extension.
pub fn image_url(filename: &str) -> String {
    let normalized = match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{}.{}", stem, ext.to_lowercase()),
        None => filename.to_string(),
    };
    format!("{}{}", C::BASE_IMAGE_URL, normalized)
}

/// Build the page-creation payload: properties, optional icon/cover/files
/// property, and the block children followed by one image block per
/// discovered image.
pub fn build_page_payload(
    settings: &Settings,
    note: &ParsedNote,
    blocks: &[ContentBlock],
) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        C::TITLE_PROPERTY.to_string(),
        json!({"title": [{"text": {"content": note.title}}]}),
    );
    properties.insert(
        C::CREATED_PROPERTY.to_string(),
        json!({"date": {"start": note.created}}),
    );
    properties.insert(
        C::UPDATED_PROPERTY.to_string(),
        json!({"date": {"start": note.updated}}),
    );

    if settings.use_image_property && !note.images.is_empty() {
        let files: Vec<Value> = note
            .images
            .iter()
            .map(|img| json!({"name": img, "external": {"url": image_url(img)}}))
            .collect();
        properties.insert(settings.image_property.clone(), json!({"files": files}));
    }

    let mut children: Vec<Value> = blocks.iter().map(ContentBlock::to_json).collect();
    for img in &note.images {
        children.push(json!({
            "object": "block",
            "type": "image",
            "image": {"external": {"url": image_url(img)}}
        }));
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "parent".to_string(),
        json!({"database_id": settings.database_id}),
    );
    payload.insert("properties".to_string(), Value::Object(properties));
    payload.insert("children".to_string(), Value::Array(children));

    if let Some(icon) = note.icon {
        payload.insert("icon".to_string(), json!({"type": "emoji", "emoji": icon}));
    }
    if settings.use_cover_image {
        if let Some(cover) = &note.cover_image {
            payload.insert(
                "cover".to_string(),
                json!({"type": "external", "external": {"url": image_url(cover)}}),
            );
        }
    }

    Value::Object(payload)
}

/// Upload one page payload through the bounded-retry loop.
///
/// A 429 response sleeps for the server-specified interval and retries
/// without consuming the budget. 401/403 are fatal. Any other non-success
/// status and every transport failure consume one of [`C::MAX_RETRIES`]
/// attempts with a fixed delay.
pub fn upload_page<T: PageTransport>(transport: &mut T, payload: &Value) -> UploadOutcome {
    let mut retries = 0;
    loop {
        match transport.create_page(payload) {
            Ok(response) => match response.status {
                200..=299 => return UploadOutcome::Success,
                429 => {
                    let wait = response.retry_after.unwrap_or(C::RETRY_DELAY_SECS);
                    warn!("rate limited; retrying in {}s", wait);
                    transport.sleep(Duration::from_secs(wait));
                }
                401 | 403 => {
                    return UploadOutcome::FatalFailure(format!(
                        "HTTP {}: {}",
                        response.status, response.body
                    ));
                }
                status => {
                    retries += 1;
                    if retries > C::MAX_RETRIES {
                        return UploadOutcome::RetryableFailure(format!(
                            "HTTP {} after {} retries: {}",
                            status,
                            C::MAX_RETRIES,
                            response.body
                        ));
                    }
                    warn!(
                        "HTTP {}; retry {}/{} in {}s",
                        status,
                        retries,
                        C::MAX_RETRIES,
                        C::RETRY_DELAY_SECS
                    );
                    transport.sleep(Duration::from_secs(C::RETRY_DELAY_SECS));
                }
            },
            Err(err) => {
                retries += 1;
                if retries > C::MAX_RETRIES {
                    return UploadOutcome::RetryableFailure(format!(
                        "network error after {} retries: {}",
                        C::MAX_RETRIES,
                        err
                    ));
                }
                warn!(
                    "network error: {}; retry {}/{} in {}s",
                    err,
                    retries,
                    C::MAX_RETRIES,
                    C::RETRY_DELAY_SECS
                );
                transport.sleep(Duration::from_secs(C::RETRY_DELAY_SECS));
            }
        }
    }
}
