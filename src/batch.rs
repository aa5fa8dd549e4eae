//! Sequential batch runner
//!
//! Drives the parse → serialize → publish pipeline over a directory of
//! exported notes, one at a time in name order, with a pacing sleep after
//! every note. A note that fails stays in the summary; only credential
//! rejection aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::blocks;
use crate::config::Settings;
use crate::constants as C;
use crate::error::{Error, Result};
use crate::note;
use crate::notion::{self, PageTransport, UploadOutcome};

/// Aggregated result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    /// File names of the notes that could not be read or uploaded
    pub failed: Vec<String>,
}

/// List the markdown files directly under `dir`, sorted by name for a
/// reproducible batch order.
pub fn list_note_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::NotesDirMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_markdown = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case(C::MARKDOWN_EXTENSION));
        if path.is_file() && is_markdown {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::EmptyBatch(dir.to_path_buf()));
    }
    Ok(files)
}

/// Run the whole batch: parse, serialize and publish each note in order.
///
/// Returns the summary, or an error for the fatal conditions (missing/empty
/// directory, credential rejection mid-batch).
pub fn run<T: PageTransport>(settings: &Settings, transport: &mut T) -> Result<BatchSummary> {
    let files = list_note_files(&settings.notes_dir)?;
    let total = files.len();
    println!(
        "Processing {} markdown files from {}",
        total,
        settings.notes_dir.display()
    );

    let mut summary = BatchSummary {
        total,
        ..Default::default()
    };

    for (index, path) in files.iter().enumerate() {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        println!("[{}/{}] {}", index + 1, total, display_name);

        // An unreadable note is skipped, not fatal to the batch.
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("skipping {}: {}", display_name, err);
                summary.failed.push(display_name);
                transport.sleep(settings.pacing);
                continue;
            }
        };

        let parsed = note::parse_note(&raw, path, settings.use_icon);
        let content_blocks = blocks::serialize_paragraphs(&parsed.paragraphs);
        check_local_images(&settings.notes_dir, &parsed.images);

        if settings.dry_run {
            println!(
                "  dry-run: would upload \"{}\" ({} blocks, {} images)",
                parsed.title,
                content_blocks.len(),
                parsed.images.len()
            );
            summary.succeeded += 1;
        } else {
            let payload = notion::build_page_payload(settings, &parsed, &content_blocks);
            match notion::upload_page(transport, &payload) {
                UploadOutcome::Success => {
                    println!("  uploaded \"{}\"", parsed.title);
                    summary.succeeded += 1;
                }
                UploadOutcome::RetryableFailure(reason) => {
                    eprintln!("  failed: {}", reason);
                    summary.failed.push(display_name);
                }
                UploadOutcome::FatalFailure(reason) => {
                    // Credentials are unusable for every remaining note.
                    print_summary(&summary);
                    return Err(Error::AuthRejected(reason));
                }
            }
        }

        // Pacing sleep between notes to respect the API rate limit
        // (dry-run included).
        transport.sleep(settings.pacing);
    }

    print_summary(&summary);
    Ok(summary)
}

/// Final success/failure report for the batch.
pub fn print_summary(summary: &BatchSummary) {
    println!("Done.");
    println!("  total:     {}", summary.total);
    println!("  succeeded: {}", summary.succeeded);
    println!("  failed:    {}", summary.failed.len());
    for name in &summary.failed {
        println!("    - {}", name);
    }
}

/// Warn when a referenced image has no local copy. The URL is generated
/// regardless; the file may exist on the server only.
fn check_local_images(notes_dir: &Path, images: &[String]) {
    for filename in images {
        let local = notes_dir.join(C::IMAGE_SUBDIR).join(filename);
        if !local.exists() {
            warn!(
                "image {} not found under {}/{}; URL generated anyway",
                filename,
                notes_dir.display(),
                C::IMAGE_SUBDIR
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::PageResponse;
    use serde_json::Value;
    use std::time::Duration;

    struct FakeTransport {
        script: Vec<std::result::Result<PageResponse, String>>,
        calls: usize,
    }

    impl FakeTransport {
        fn new(script: Vec<std::result::Result<PageResponse, String>>) -> Self {
            Self { script, calls: 0 }
        }
    }

    impl PageTransport for FakeTransport {
        fn create_page(
            &mut self,
            _payload: &Value,
        ) -> std::result::Result<PageResponse, String> {
            self.calls += 1;
            self.script.remove(0)
        }

        fn sleep(&mut self, _duration: Duration) {}
    }

    fn response(status: u16) -> std::result::Result<PageResponse, String> {
        Ok(PageResponse {
            status,
            retry_after: None,
            body: String::new(),
        })
    }

    fn settings(notes_dir: &Path) -> Settings {
        Settings {
            api_key: "k".to_string(),
            database_id: "d".to_string(),
            notes_dir: notes_dir.to_path_buf(),
            image_property: C::DEFAULT_IMAGE_PROPERTY.to_string(),
            use_cover_image: true,
            use_image_property: true,
            use_icon: true,
            dry_run: false,
            pacing: Duration::ZERO,
        }
    }

    fn write_note(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_list_note_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "b.md", "b");
        write_note(dir.path(), "a.MD", "a");
        write_note(dir.path(), "ignored.txt", "x");
        fs::create_dir(dir.path().join("Files")).unwrap();

        let files = list_note_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.MD", "b.md"]);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent");
        assert!(matches!(
            list_note_files(&absent),
            Err(Error::NotesDirMissing(_))
        ));
    }

    #[test]
    fn test_empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "notes.txt", "not markdown");
        assert!(matches!(
            list_note_files(dir.path()),
            Err(Error::EmptyBatch(_))
        ));
    }

    #[test]
    fn test_auth_rejection_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "a.md", "first note");
        write_note(dir.path(), "b.md", "second note");

        let mut transport = FakeTransport::new(vec![response(401)]);
        let result = run(&settings(dir.path()), &mut transport);

        assert!(matches!(result, Err(Error::AuthRejected(_))));
        // the second note is never attempted
        assert_eq!(transport.calls, 1);
    }

    #[test]
    fn test_per_note_failure_continues_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "a.md", "first note");
        write_note(dir.path(), "b.md", "second note");

        // a.md exhausts its retries on 500s, b.md succeeds
        let mut transport = FakeTransport::new(vec![
            response(500),
            response(500),
            response(500),
            response(500),
            response(200),
        ]);
        let summary = run(&settings(dir.path()), &mut transport).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, vec!["a.md".to_string()]);
    }

    #[test]
    fn test_successful_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_note(dir.path(), "a.md", "created: 2024-03-01 07:30:00\nhello");
        write_note(dir.path(), "b.md", "朝勉勤続10日目。\n- item");

        let mut transport = FakeTransport::new(vec![response(200), response(200)]);
        let summary = run(&settings(dir.path()), &mut transport).unwrap();

        assert_eq!(summary.succeeded, 2);
        assert!(summary.failed.is_empty());
    }
}
