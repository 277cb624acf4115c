//! Playlist run statistics.

use std::time::{Duration, Instant};

/// Totals for a playlist run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of videos a download was attempted for.
    pub videos_attempted: usize,
    /// Number of videos saved successfully.
    pub videos_downloaded: usize,
    /// Number of videos that failed.
    pub videos_failed: usize,
    /// Total bytes saved.
    pub total_bytes: u64,
    /// Wall-clock time for the run.
    pub elapsed: Duration,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    /// Creates a new empty session stats.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            videos_attempted: 0,
            videos_downloaded: 0,
            videos_failed: 0,
            total_bytes: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the average download speed in bytes per second.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn average_speed(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.total_bytes as f64 / secs) as u64
        } else {
            0
        }
    }

    /// True when every attempted video was saved.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.videos_failed == 0
    }
}

/// Builder for accumulating session statistics during a playlist run.
pub struct SessionStatsBuilder {
    videos_downloaded: usize,
    videos_failed: usize,
    total_bytes: u64,
    start_time: Instant,
}

impl Default for SessionStatsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStatsBuilder {
    /// Creates a new session stats builder; the clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            videos_downloaded: 0,
            videos_failed: 0,
            total_bytes: 0,
            start_time: Instant::now(),
        }
    }

    /// Records a saved video of `bytes` size.
    pub const fn add_download(&mut self, bytes: u64) {
        self.videos_downloaded += 1;
        self.total_bytes += bytes;
    }

    /// Records a failed video.
    pub const fn add_failure(&mut self) {
        self.videos_failed += 1;
    }

    /// Builds the final session statistics.
    #[must_use]
    pub fn build(self) -> SessionStats {
        SessionStats {
            videos_attempted: self.videos_downloaded + self.videos_failed,
            videos_downloaded: self.videos_downloaded,
            videos_failed: self.videos_failed,
            total_bytes: self.total_bytes,
            elapsed: self.start_time.elapsed(),
        }
    }
}
