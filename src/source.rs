//! The video source seam: metadata and transfer for videos and playlists.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{Error, Result};

/// One downloadable encoding of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    /// Identifier the source uses to select this stream.
    pub format_id: String,
    /// Vertical resolution in pixels, if the stream has video.
    pub height: Option<u32>,
    /// Size of the stream in bytes, 0 when the source does not know it.
    pub filesize: u64,
    /// Container extension (`mp4`, `webm`, ...).
    pub ext: String,
    /// Whether audio and video are muxed into this single stream.
    pub progressive: bool,
}

/// Metadata for a single resolved video.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    /// Canonical page URL of the video.
    pub url: String,
    /// Full, untruncated title.
    pub title: String,
    /// Uploader or channel name.
    pub author: String,
    /// Length in seconds.
    pub length: i64,
    /// Upload date, when the source knows it.
    pub publish_date: Option<NaiveDate>,
    /// View count.
    pub views: u64,
    /// Every stream the source offers, in source order.
    pub streams: Vec<StreamVariant>,
}

/// Metadata and ordered entries of a resolved playlist.
#[derive(Debug, Clone)]
pub struct PlaylistInfo {
    /// Playlist title, used as its folder name.
    pub title: String,
    /// Owner or channel name.
    pub owner: String,
    /// Number of videos reported by the source.
    pub length: usize,
    /// View count.
    pub views: u64,
    /// Page URLs of the entries, in playlist order.
    pub video_urls: Vec<String>,
}

/// A video that was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedVideo {
    /// Where the file ended up.
    pub path: PathBuf,
    /// Size on disk, or the stream's advertised size when unmeasured.
    pub bytes: u64,
}

/// Resolves YouTube URLs and transfers streams to disk.
///
/// Implementations own all network and extraction work.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Resolves a video page URL into its metadata and streams.
    async fn resolve_video(&self, url: &str) -> Result<VideoInfo>;

    /// Resolves a playlist URL into its metadata and video URLs.
    async fn resolve_playlist(&self, url: &str) -> Result<PlaylistInfo>;

    /// Downloads `stream` of `video` into `output_dir`, creating it if missing.
    ///
    /// `on_progress` is called with the number of bytes still to transfer.
    async fn download(
        &self,
        video: &VideoInfo,
        stream: &StreamVariant,
        output_dir: &Path,
        on_progress: &mut (dyn FnMut(u64) + Send),
    ) -> Result<SavedVideo>;
}

/// Picks the progressive stream with the highest resolution.
///
/// Ties on height go to the larger file, then to the stream listed first.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no progressive stream exists.
pub fn select_highest_resolution(streams: &[StreamVariant]) -> Result<&StreamVariant> {
    streams
        .iter()
        .rev()
        .filter(|s| s.progressive)
        .max_by_key(|s| (s.height.unwrap_or(0), s.filesize))
        .ok_or_else(|| Error::NotFound("Video not found".to_string()))
}


#[cfg(test)]
mod tests {
    use super::stub::stream;
    use super::*;

    #[test]
    fn picks_tallest_progressive_stream() {
        let streams = vec![
            stream("18", 360, 10, true),
            stream("137", 1080, 900, false),
            stream("22", 720, 50, true),
        ];
        assert_eq!(select_highest_resolution(&streams).unwrap().format_id, "22");
    }

    #[test]
    fn height_tie_prefers_larger_file() {
        let streams = vec![stream("a", 720, 10, true), stream("b", 720, 20, true)];
        assert_eq!(select_highest_resolution(&streams).unwrap().format_id, "b");
    }

    #[test]
    fn full_tie_prefers_first_listed() {
        let streams = vec![
            stream("first", 720, 10, true),
            stream("second", 720, 10, true),
        ];
        assert_eq!(
            select_highest_resolution(&streams).unwrap().format_id,
            "first"
        );
    }

    #[test]
    fn no_progressive_stream_is_not_found() {
        let streams = vec![stream("137", 1080, 900, false)];
        assert!(matches!(
            select_highest_resolution(&streams),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            select_highest_resolution(&[]),
            Err(Error::NotFound(_))
        ));
    }
}
