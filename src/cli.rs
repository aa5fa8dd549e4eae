use std::path::PathBuf;

use clap::Parser;

/// upnote2notion - bulk-upload UpNote markdown exports into a Notion database
///
/// # Quick Reference
///
/// ```bash
/// # Credentials on the command line
/// upnote2notion --api-key "ntn_..." --database-id "1aa2ab4c..."
///
/// # Reuse the saved config, check the conversion without uploading
/// upnote2notion --use-config --dry-run
///
/// # Save the resolved credentials and options for next time
/// upnote2notion --api-key "ntn_..." --database-id "..." --save-config
///
/// # Custom export directory and image property name
/// upnote2notion --notes-dir ~/exported_notes --image-property "サムネイル"
///
/// # Skip the cover image and the inferred page icon
/// upnote2notion --use-config --no-cover-image --no-icon
/// ```
///
/// ## Input layout
///
/// `--notes-dir` holds the `.md` files exported from UpNote; an optional
/// `Files/` subdirectory next to them holds local copies of the referenced
/// images. Images must already be uploaded to the image host, the tool only
/// composes their URLs.
///
/// ## Supported markdown constructs
///
/// Headings (`#` `##` `###`), lists (`-` `*` `1.`), quotes (`>`),
/// single-line code (```` ``` ````), bold (`**text**`), rules (`---`),
/// and `<br>` tags (converted to empty blocks).
///
/// ## Environment
///
/// - `RUST_LOG`: log filter for warnings/diagnostics (e.g. `RUST_LOG=debug`)
#[derive(Parser, Debug)]
#[command(name = "upnote2notion")]
#[command(version)]
#[command(about = "Bulk-upload UpNote markdown exports into a Notion database")]
pub struct Cli {
    /// Notion API key (integration token)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Target Notion database id
    #[arg(long, value_name = "ID")]
    pub database_id: Option<String>,

    /// Directory holding the exported .md files
    #[arg(long, value_name = "DIR", default_value = "exported_notes")]
    pub notes_dir: PathBuf,

    /// Use credentials and options from the saved config file
    #[arg(long)]
    pub use_config: bool,

    /// Save the resolved credentials and options to the config file
    #[arg(long)]
    pub save_config: bool,

    /// Parse and convert without calling the Notion API
    #[arg(long)]
    pub dry_run: bool,

    /// Name of the database files property that receives the images
    #[arg(long, value_name = "NAME")]
    pub image_property: Option<String>,

    /// Do not set the page cover from the first image
    #[arg(long)]
    pub no_cover_image: bool,

    /// Do not fill the image files property
    #[arg(long)]
    pub no_image_property: bool,

    /// Do not infer a page icon from the content
    #[arg(long)]
    pub no_icon: bool,
}
