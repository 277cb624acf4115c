//! Application configuration, optionally read from a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the directory under the platform config dir.
const APP_DIR: &str = "youloader";
const CONFIG_FILE: &str = "config.toml";

/// Settings for display and downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of cells in the progress bar.
    pub progress_bar_width: usize,
    /// Titles longer than this many characters are cut.
    pub max_title_length: usize,
    /// Program used to resolve and download videos.
    pub ytdlp_path: PathBuf,
    /// Root for `videos/` and `playlists/`; the working directory when unset.
    pub output_root: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            progress_bar_width: 50,
            max_title_length: 50,
            ytdlp_path: PathBuf::from("yt-dlp"),
            output_root: None,
        }
    }
}

impl AppConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the progress bar width.
    #[must_use]
    pub const fn with_progress_bar_width(mut self, width: usize) -> Self {
        self.progress_bar_width = width;
        self
    }

    /// Sets the maximum displayed title length.
    #[must_use]
    pub const fn with_max_title_length(mut self, len: usize) -> Self {
        self.max_title_length = len;
        self
    }

    /// Sets the yt-dlp executable.
    #[must_use]
    pub fn with_ytdlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ytdlp_path = path.into();
        self
    }

    /// Sets the output root.
    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(root.into());
        self
    }

    /// Location of the user config file, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the user config file, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&contents).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Resolves the output root against the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the working directory cannot be determined.
    pub fn output_root(&self) -> Result<PathBuf> {
        match &self.output_root {
            Some(root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}
