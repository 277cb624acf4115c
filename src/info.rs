//! Pre-formatted video and playlist details for display.

use crate::error::Result;
use crate::format::{format_date, format_duration, format_views, truncate_title};
use crate::source::{PlaylistInfo, VideoInfo};

/// Display-ready fields of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSummary {
    /// Title, truncated with `...` past the configured length.
    pub title: String,
    /// Uploader or channel name.
    pub author: String,
    /// `MM:SS` or `HH:MM:SS`.
    pub duration: String,
    /// `DD/MM/YYYY`, when the upload date is known.
    pub published: Option<String>,
    /// View count grouped with dots.
    pub views: String,
}

impl VideoSummary {
    /// Formats `video`, cutting its title to `max_title_len` characters.
    ///
    /// # Errors
    ///
    /// Fails when the video length is not a positive number of seconds.
    pub fn from_video(video: &VideoInfo, max_title_len: usize) -> Result<Self> {
        Ok(Self {
            title: truncate_title(&video.title, max_title_len),
            author: video.author.clone(),
            duration: format_duration(video.length)?,
            published: video.publish_date.map(format_date),
            views: format_views(video.views),
        })
    }

    /// The lines to print, ending with a blank line.
    ///
    /// Playlist items keep title and author on one line to stay compact.
    #[must_use]
    pub fn lines(&self, is_playlist: bool) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);
        if is_playlist {
            lines.push(format!("{} | {}", self.title, self.author));
        } else {
            lines.push(self.title.clone());
            lines.push(self.author.clone());
        }
        match &self.published {
            Some(date) => lines.push(format!("{} | {date}", self.duration)),
            None => lines.push(self.duration.clone()),
        }
        lines.push(format!("{} Views", self.views));
        lines.push(String::new());
        lines
    }
}

/// Display-ready fields of a playlist header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    /// Playlist title.
    pub title: String,
    /// Owner or channel name.
    pub owner: String,
    /// Number of videos.
    pub length: usize,
    /// View count grouped with dots.
    pub views: String,
}

impl PlaylistSummary {
    /// Formats the header fields of `playlist`.
    #[must_use]
    pub fn from_playlist(playlist: &PlaylistInfo) -> Self {
        Self {
            title: playlist.title.clone(),
            owner: playlist.owner.clone(),
            length: playlist.length,
            views: format_views(playlist.views),
        }
    }

    /// `<title> | <owner>`, `<n> videos | <views> Views`, then a blank line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("{} | {}", self.title, self.owner),
            format!("{} videos | {} Views", self.length, self.views),
            String::new(),
        ]
    }
}
