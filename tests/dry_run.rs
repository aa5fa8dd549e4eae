//! End-to-end dry-run scenario: a directory with two notes is parsed and
//! converted with no network call, and both count as succeeded.

use std::fs;
use std::time::Duration;

use upnote2notion::batch;
use upnote2notion::config::Settings;
use upnote2notion::notion::OfflineTransport;

fn settings(notes_dir: &std::path::Path) -> Settings {
    Settings {
        api_key: "test-key".to_string(),
        database_id: "test-db".to_string(),
        notes_dir: notes_dir.to_path_buf(),
        image_property: "画像".to_string(),
        use_cover_image: true,
        use_image_property: true,
        use_icon: true,
        dry_run: true,
        pacing: Duration::ZERO,
    }
}

#[test]
fn dry_run_succeeds_without_network() {
    let dir = tempfile::tempdir().unwrap();

    // one note with the counter-phrase title and an image reference
    fs::write(
        dir.path().join("diary.md"),
        "---\ncreated: 2024-03-01 07:30:00\n---\n朝勉勤続123日目。\n\n![pic](Files/IMG_1.png)\n今日もがんばった\n",
    )
    .unwrap();
    // one note with neither
    fs::write(dir.path().join("plain.md"), "Just some plain text\n").unwrap();

    // OfflineTransport errors on any request, so a clean 2/2 summary proves
    // no network call was attempted.
    let summary = batch::run(&settings(dir.path()), &mut OfflineTransport).unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 2);
    assert!(summary.failed.is_empty());
}

#[test]
fn dry_run_on_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(batch::run(&settings(dir.path()), &mut OfflineTransport).is_err());
}
