//! upnote2notion — convert UpNote markdown exports into Notion database pages.
//!
//! Pipeline per note: [`note::parse_note`] → [`blocks::serialize_paragraphs`]
//! → [`notion::upload_page`], driven sequentially by [`batch::run`].

pub mod batch;
pub mod blocks;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod icon;
pub mod note;
pub mod notion;

pub use batch::BatchSummary;
pub use blocks::{ContentBlock, RichSpan};
pub use cli::Cli;
pub use config::Settings;
pub use error::{Error, Result};
pub use note::ParsedNote;
pub use notion::UploadOutcome;
