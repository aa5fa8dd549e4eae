//! Runtime settings and saved-configuration handling
//!
//! [`Settings`] is the immutable configuration value threaded through the
//! whole pipeline; nothing in the crate reads ambient global state. The
//! saved config file mirrors the command-line surface so a run can be
//! repeated with `--use-config`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::constants as C;
use crate::error::{Error, Result};

/// Immutable runtime configuration, established once before the batch.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub database_id: String,
    pub notes_dir: PathBuf,
    /// Name of the files property that receives the images
    pub image_property: String,
    pub use_cover_image: bool,
    pub use_image_property: bool,
    pub use_icon: bool,
    pub dry_run: bool,
    /// Inter-note delay; zeroed in tests
    pub pacing: Duration,
}

/// Feature toggles persisted alongside the credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cover_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_image_property: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_icon: Option<bool>,
}

/// On-disk config file contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConfig {
    pub api_key: String,
    pub database_id: String,
    #[serde(default)]
    pub options: SavedOptions,
}

/// Default location of the saved config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("upnote2notion").join("config.yaml"))
}

/// Load a saved config from `path`.
pub fn load_saved(path: &Path) -> Result<SavedConfig> {
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)?;
    serde_yaml::from_str(&raw).map_err(|source| Error::ConfigFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a config to `path`, restricting it to owner read/write on unix
/// (the file carries the API key).
pub fn save(path: &Path, config: &SavedConfig) -> Result<()> {
    let raw = serde_yaml::to_string(config).map_err(|source| Error::ConfigFormat {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, raw)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

impl Settings {
    /// Resolve the effective settings from the CLI, loading the saved config
    /// when `--use-config` is given.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let saved = if cli.use_config {
            let path = config_path().ok_or(Error::ConfigDirUnavailable)?;
            Some(load_saved(&path)?)
        } else {
            None
        };
        Self::resolve_with(cli, saved)
    }

    /// Merge CLI flags over an optionally loaded saved config. Explicit
    /// flags always win; saved options fill the gaps; defaults come last.
    pub fn resolve_with(cli: &Cli, saved: Option<SavedConfig>) -> Result<Self> {
        let api_key = cli
            .api_key
            .clone()
            .or_else(|| saved.as_ref().map(|s| s.api_key.clone()))
            .ok_or(Error::MissingCredentials)?;
        let database_id = cli
            .database_id
            .clone()
            .or_else(|| saved.as_ref().map(|s| s.database_id.clone()))
            .ok_or(Error::MissingCredentials)?;
        if api_key.trim().is_empty() || database_id.trim().is_empty() {
            return Err(Error::MissingCredentials);
        }

        let options = saved.map(|s| s.options).unwrap_or_default();
        let image_property = cli
            .image_property
            .clone()
            .or(options.image_property)
            .unwrap_or_else(|| C::DEFAULT_IMAGE_PROPERTY.to_string());
        let use_cover_image = if cli.no_cover_image {
            false
        } else {
            options.use_cover_image.unwrap_or(true)
        };
        let use_image_property = if cli.no_image_property {
            false
        } else {
            options.use_image_property.unwrap_or(true)
        };
        let use_icon = if cli.no_icon {
            false
        } else {
            options.use_icon.unwrap_or(true)
        };

        Ok(Settings {
            api_key,
            database_id,
            notes_dir: cli.notes_dir.clone(),
            image_property,
            use_cover_image,
            use_image_property,
            use_icon,
            dry_run: cli.dry_run,
            pacing: Duration::from_millis(C::PACING_DELAY_MILLIS),
        })
    }

    /// Saved-config view of these settings, for `--save-config`.
    pub fn to_saved(&self) -> SavedConfig {
        SavedConfig {
            api_key: self.api_key.clone(),
            database_id: self.database_id.clone(),
            options: SavedOptions {
                image_property: Some(self.image_property.clone()),
                use_cover_image: Some(self.use_cover_image),
                use_image_property: Some(self.use_image_property),
                use_icon: Some(self.use_icon),
            },
        }
    }
}
