//! youloader - download YouTube videos and playlists from the terminal.
//!
//! Resolution and transfer are delegated to a [`VideoSource`] (by default
//! [`YtDlp`], which drives the `yt-dlp` executable). This crate validates
//! and routes URLs, picks the stream, lays out the output directories and
//! reports progress through [`DownloadProgress`].
//!
//! # Example
//!
//! ```no_run
//! use youloader::{AppConfig, Downloader, NoProgress, Target, YtDlp, validate_url};
//!
//! # async fn example() -> youloader::Result<()> {
//! let config = AppConfig::load()?;
//! let url = validate_url("https://youtube.com/watch?v=dQw4w9WgXcQ")?;
//!
//! let downloader = Downloader::new(YtDlp::new(config.ytdlp_path.clone()), config);
//! downloader.run(&Target::classify(url), &NoProgress).await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod fs;
pub mod info;
pub mod paths;
pub mod progress;
pub mod source;
pub mod stats;
pub mod url;
pub mod ytdlp;

// Re-export main types for convenience
pub use config::AppConfig;
pub use download::{DownloadProgress, DownloadTarget, Downloader, NoProgress, RunOutcome};
pub use error::{Error, ErrorKind, Result};
pub use format::{format_bytes, format_date, format_duration, format_elapsed, format_views, truncate_title};
pub use fs::{FileSystem, TokioFileSystem};
pub use info::{PlaylistSummary, VideoSummary};
pub use paths::resolve_path;
pub use progress::{ProgressFrame, Tier};
pub use source::{
    PlaylistInfo, SavedVideo, StreamVariant, VideoInfo, VideoSource, select_highest_resolution,
};
pub use stats::{SessionStats, SessionStatsBuilder};
pub use self::url::{Target, validate_url};
pub use ytdlp::YtDlp;
