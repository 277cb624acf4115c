//! URL validation and routing between single-video and playlist downloads.

use ::url::Url;

use crate::error::{Error, Result};

/// Host fragment every accepted URL must carry.
const YOUTUBE_HOST: &str = "youtube.com";

/// Checks that `candidate` is a well-formed YouTube URL.
///
/// The input is returned unchanged on success; nothing is normalized.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for blank input, unparsable or non-HTTP
/// URLs, and URLs whose host is not on `youtube.com`.
pub fn validate_url(candidate: &str) -> Result<&str> {
    if candidate.trim().is_empty() {
        return Err(Error::InvalidInput("The url must be a string".to_string()));
    }

    let parsed = Url::parse(candidate)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .ok_or_else(|| Error::InvalidInput("Invalid URL".to_string()))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| Error::InvalidInput("Invalid URL".to_string()))?;

    if !host.to_ascii_lowercase().contains(YOUTUBE_HOST) {
        return Err(Error::InvalidInput(
            "The URL must be from YouTube".to_string(),
        ));
    }

    Ok(candidate)
}

/// What a validated URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single video page, saved under `videos/`.
    SingleVideo(String),
    /// A playlist page, saved under `playlists/<title>/`.
    Playlist(String),
}

impl Target {
    /// Routes URLs mentioning `playlist` to the playlist flow.
    #[must_use]
    pub fn classify(url: &str) -> Self {
        if url.contains("playlist") {
            Self::Playlist(url.to_string())
        } else {
            Self::SingleVideo(url.to_string())
        }
    }

    /// The URL as the user entered it.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::SingleVideo(url) | Self::Playlist(url) => url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<&str>) -> String {
        match result {
            Err(Error::InvalidInput(msg)) => msg,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn accepts_watch_url_unchanged() {
        let url = "https://youtube.com/watch?v=dQw4w9WgXcQ";
        assert_eq!(validate_url(url).unwrap(), url);
    }

    #[test]
    fn accepts_subdomains() {
        assert!(validate_url("https://www.youtube.com/watch?v=abc").is_ok());
        assert!(validate_url("https://m.youtube.com/watch?v=abc").is_ok());
        assert!(validate_url("http://music.youtube.com/playlist?list=XYZ").is_ok());
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(message(validate_url("")), "The url must be a string");
        assert_eq!(message(validate_url("   ")), "The url must be a string");
    }

    #[test]
    fn rejects_malformed_urls() {
        assert_eq!(message(validate_url("not a url")), "Invalid URL");
        assert_eq!(message(validate_url("youtube.com/watch?v=abc")), "Invalid URL");
        assert_eq!(message(validate_url("ftp://youtube.com/file")), "Invalid URL");
        assert_eq!(message(validate_url("https://")), "Invalid URL");
    }

    #[test]
    fn rejects_other_hosts() {
        assert_eq!(
            message(validate_url("https://vimeo.com/12345")),
            "The URL must be from YouTube"
        );
        assert_eq!(
            message(validate_url("https://example.com/?next=youtube.com")),
            "The URL must be from YouTube"
        );
    }

    #[test]
    fn classifies_playlists() {
        assert_eq!(
            Target::classify("https://youtube.com/playlist?list=XYZ"),
            Target::Playlist("https://youtube.com/playlist?list=XYZ".to_string())
        );
    }

    #[test]
    fn classifies_single_videos() {
        let target = Target::classify("https://youtube.com/watch?v=abc");
        assert_eq!(
            target,
            Target::SingleVideo("https://youtube.com/watch?v=abc".to_string())
        );
        assert_eq!(target.url(), "https://youtube.com/watch?v=abc");
    }
}
