//! Core download flows and the progress event seam.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::info::{PlaylistSummary, VideoSummary};
use crate::paths::resolve_path;
use crate::source::{SavedVideo, VideoSource, select_highest_resolution};
use crate::stats::{SessionStats, SessionStatsBuilder};
use crate::url::Target;

/// Trait for receiving download progress updates.
///
/// Implement this trait to render download events. All methods have
/// default no-op implementations for convenience.
pub trait DownloadProgress: Send + Sync {
    /// Called once a video has been resolved, before its transfer starts.
    fn on_video_info(&self, _summary: &VideoSummary, _is_playlist: bool) {}

    /// Called right before the transfer of a stream of `total` bytes.
    fn on_transfer_start(&self, _total: u64) {}

    /// Called repeatedly during a transfer with the bytes still to go.
    fn on_progress(&self, _total: u64, _remaining: u64) {}

    /// Called when a video has been written to `path`.
    fn on_video_saved(&self, _path: &Path, _bytes: u64) {}

    /// Called when a video download fails.
    fn on_error(&self, _error: &Error) {}

    /// Called once a playlist has been resolved.
    fn on_playlist_start(&self, _summary: &PlaylistSummary) {}

    /// Called before each playlist entry, `index` counting from 1.
    fn on_playlist_item(&self, _index: usize, _count: usize, _url: &str) {}

    /// Called after every playlist entry has been attempted.
    fn on_playlist_complete(&self, _stats: &SessionStats) {}
}

/// A null progress implementation that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl DownloadProgress for NoProgress {}

/// A single download request: which URL goes into which directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Page URL of the video.
    pub url: String,
    /// Directory the file is written to.
    pub output_dir: PathBuf,
    /// Whether the video is a playlist entry.
    pub is_playlist: bool,
}

/// Outcome of [`Downloader::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The single video that was saved.
    Video(SavedVideo),
    /// Totals of the playlist run.
    Playlist(SessionStats),
}

/// Runs single-video and playlist downloads against a [`VideoSource`].
pub struct Downloader<S: VideoSource> {
    source: S,
    config: AppConfig,
}

impl<S: VideoSource> Downloader<S> {
    /// Creates a new downloader.
    #[must_use]
    pub const fn new(source: S, config: AppConfig) -> Self {
        Self { source, config }
    }

    /// Returns a reference to the underlying video source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Downloads whatever `target` points at into the configured output root.
    ///
    /// # Errors
    ///
    /// Single videos fail with the video's error; playlists fail only when
    /// the playlist itself cannot be resolved or is empty.
    pub async fn run(&self, target: &Target, progress: &dyn DownloadProgress) -> Result<RunOutcome> {
        match target {
            Target::SingleVideo(url) => {
                let target = DownloadTarget {
                    url: url.clone(),
                    output_dir: resolve_path(&self.config.output_root()?, None),
                    is_playlist: false,
                };
                self.download_video(&target, progress)
                    .await
                    .map(RunOutcome::Video)
            }
            Target::Playlist(url) => self
                .download_playlist(url, progress)
                .await
                .map(RunOutcome::Playlist),
        }
    }

    /// Resolves, selects the highest-resolution stream and transfers one video.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no suitable stream exists, or the
    /// source's error when resolution or transfer fails.
    pub async fn download_video(
        &self,
        target: &DownloadTarget,
        progress: &dyn DownloadProgress,
    ) -> Result<SavedVideo> {
        let video = self.source.resolve_video(&target.url).await?;

        let summary = VideoSummary::from_video(&video, self.config.max_title_length)?;
        progress.on_video_info(&summary, target.is_playlist);

        let stream = select_highest_resolution(&video.streams)?;
        let total = stream.filesize;
        log::info!(
            "selected format {} ({}p, {total} bytes) for {}",
            stream.format_id,
            stream.height.unwrap_or(0),
            video.url
        );

        progress.on_transfer_start(total);
        let mut on_progress = |remaining: u64| progress.on_progress(total, remaining);
        let saved = self
            .source
            .download(&video, stream, &target.output_dir, &mut on_progress)
            .await?;

        progress.on_video_saved(&saved.path, saved.bytes);
        Ok(saved)
    }

    /// Downloads every video of a playlist, one after the other.
    ///
    /// A failing video is reported through [`DownloadProgress::on_error`]
    /// and does not stop the remaining ones.
    ///
    /// # Errors
    ///
    /// Returns an error only if the playlist cannot be resolved or holds no
    /// videos.
    pub async fn download_playlist(
        &self,
        url: &str,
        progress: &dyn DownloadProgress,
    ) -> Result<SessionStats> {
        let playlist = self.source.resolve_playlist(url).await?;
        if playlist.video_urls.is_empty() {
            return Err(Error::NotFound("Playlist not found".to_string()));
        }

        let output_dir = resolve_path(&self.config.output_root()?, Some(&playlist.title));
        progress.on_playlist_start(&PlaylistSummary::from_playlist(&playlist));

        let count = playlist.video_urls.len();
        let mut builder = SessionStatsBuilder::new();

        for (i, video_url) in playlist.video_urls.iter().enumerate() {
            progress.on_playlist_item(i + 1, count, video_url);
            let target = DownloadTarget {
                url: video_url.clone(),
                output_dir: output_dir.clone(),
                is_playlist: true,
            };
            match self.download_video(&target, progress).await {
                Ok(saved) => builder.add_download(saved.bytes),
                Err(e) => {
                    log::warn!("skipping {video_url}: {e}");
                    progress.on_error(&e);
                    builder.add_failure();
                }
            }
        }

        let stats = builder.build();
        log::info!(
            "playlist {} done: {}/{} saved",
            playlist.title,
            stats.videos_downloaded,
            stats.videos_attempted
        );
        progress.on_playlist_complete(&stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::stub::{StubSource, stream};
    use std::sync::Mutex;

    /// Records every event as a string for assertions.
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl DownloadProgress for Recorder {
        fn on_video_info(&self, summary: &VideoSummary, is_playlist: bool) {
            self.push(format!("info {} playlist={is_playlist}", summary.title));
        }

        fn on_transfer_start(&self, total: u64) {
            self.push(format!("start {total}"));
        }

        fn on_progress(&self, total: u64, remaining: u64) {
            self.push(format!("progress {remaining}/{total}"));
        }

        fn on_error(&self, error: &Error) {
            self.push(format!("error {error}"));
        }

        fn on_playlist_start(&self, summary: &PlaylistSummary) {
            self.push(format!("playlist {}", summary.title));
        }

        fn on_playlist_complete(&self, stats: &SessionStats) {
            self.push(format!(
                "summary {}/{}",
                stats.videos_downloaded, stats.videos_attempted
            ));
        }
    }

    fn config(root: &Path) -> AppConfig {
        AppConfig::default().with_output_root(root)
    }

    #[tokio::test]
    async fn single_video_goes_to_videos_dir() {
        let downloader = Downloader::new(StubSource::default(), config(Path::new("/work")));
        let target = Target::classify("https://youtube.com/watch?v=abc");

        let outcome = downloader.run(&target, &NoProgress).await.unwrap();

        assert!(matches!(outcome, RunOutcome::Video(_)));
        assert_eq!(
            downloader.source().downloads(),
            vec![(
                "https://youtube.com/watch?v=abc".to_string(),
                PathBuf::from("/work/videos")
            )]
        );
    }

    #[tokio::test]
    async fn playlist_goes_to_titled_dir() {
        let source = StubSource::with_playlist("Road Trip", &["u1", "u2"]);
        let downloader = Downloader::new(source, config(Path::new("/work")));
        let target = Target::classify("https://youtube.com/playlist?list=XYZ");

        let outcome = downloader.run(&target, &NoProgress).await.unwrap();

        let RunOutcome::Playlist(stats) = outcome else {
            panic!("expected playlist outcome");
        };
        assert_eq!(stats.videos_downloaded, 2);
        assert!(
            downloader
                .source()
                .downloads()
                .iter()
                .all(|(_, dir)| dir == Path::new("/work/playlists/Road Trip"))
        );
    }

    #[tokio::test]
    async fn progress_is_bound_to_selected_stream_size() {
        let source = StubSource {
            streams: vec![stream("18", 360, 100, true), stream("22", 720, 200, true)],
            ..StubSource::default()
        };
        let downloader = Downloader::new(source, config(Path::new("/work")));
        let recorder = Recorder::default();
        let target = DownloadTarget {
            url: "https://youtube.com/watch?v=abc".to_string(),
            output_dir: PathBuf::from("/work/videos"),
            is_playlist: false,
        };

        let saved = downloader.download_video(&target, &recorder).await.unwrap();

        assert_eq!(saved.bytes, 200);
        assert_eq!(
            recorder.events(),
            vec![
                "info Title of https://youtube.com/watch?v=abc playlist=false",
                "start 200",
                "progress 200/200",
                "progress 100/200",
                "progress 0/200",
            ]
        );
    }

    #[tokio::test]
    async fn missing_stream_is_not_found() {
        let source = StubSource {
            streams: vec![stream("137", 1080, 500, false)],
            ..StubSource::default()
        };
        let downloader = Downloader::new(source, config(Path::new("/work")));
        let target = Target::classify("https://youtube.com/watch?v=abc");

        let err = downloader.run(&target, &NoProgress).await.unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert!(downloader.source().downloads().is_empty());
    }

    #[tokio::test]
    async fn failing_item_does_not_stop_playlist() {
        let urls = ["u1", "u2", "u3", "u4"];
        let source = StubSource::with_playlist("Mix", &urls).failing_on("u2");
        let downloader = Downloader::new(source, config(Path::new("/work")));
        let recorder = Recorder::default();

        let stats = downloader
            .download_playlist("https://youtube.com/playlist?list=XYZ", &recorder)
            .await
            .unwrap();

        assert_eq!(downloader.source().resolved(), urls);
        let downloaded: Vec<_> = downloader
            .source()
            .downloads()
            .into_iter()
            .map(|(url, _)| url)
            .collect();
        assert_eq!(downloaded, vec!["u1", "u3", "u4"]);

        assert_eq!(stats.videos_attempted, 4);
        assert_eq!(stats.videos_downloaded, 3);
        assert_eq!(stats.videos_failed, 1);

        let events = recorder.events();
        assert!(events.iter().any(|e| e.starts_with("error ")));
        assert_eq!(events.last().map(String::as_str), Some("summary 3/4"));
    }

    #[tokio::test]
    async fn every_item_failing_still_prints_summary() {
        let source = StubSource::with_playlist("Mix", &["u1", "u2"])
            .failing_on("u1")
            .failing_on("u2");
        let downloader = Downloader::new(source, config(Path::new("/work")));
        let recorder = Recorder::default();

        let stats = downloader
            .download_playlist("https://youtube.com/playlist?list=XYZ", &recorder)
            .await
            .unwrap();

        assert_eq!(stats.videos_failed, 2);
        assert_eq!(
            recorder.events().last().map(String::as_str),
            Some("summary 0/2")
        );
    }

    #[tokio::test]
    async fn playlist_items_use_compact_info() {
        let source = StubSource::with_playlist("Mix", &["u1"]);
        let downloader = Downloader::new(source, config(Path::new("/work")));
        let recorder = Recorder::default();

        downloader
            .download_playlist("https://youtube.com/playlist?list=XYZ", &recorder)
            .await
            .unwrap();

        assert!(
            recorder
                .events()
                .contains(&"info Title of u1 playlist=true".to_string())
        );
    }

    #[tokio::test]
    async fn empty_playlist_is_not_found() {
        let source = StubSource::with_playlist("Empty", &[]);
        let downloader = Downloader::new(source, config(Path::new("/work")));

        let err = downloader
            .download_playlist("https://youtube.com/playlist?list=XYZ", &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn unresolvable_playlist_fails() {
        let downloader = Downloader::new(StubSource::default(), config(Path::new("/work")));

        let err = downloader
            .download_playlist("https://youtube.com/playlist?list=XYZ", &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transfer(_)));
    }
}
