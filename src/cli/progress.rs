//! Terminal rendering of download events.

use std::path::Path;
use std::sync::Mutex;

use console::{Color, Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::download::DownloadProgress;
use crate::error::Error;
use crate::format::{format_bytes, format_elapsed};
use crate::info::{PlaylistSummary, VideoSummary};
use crate::progress::{ProgressFrame, Tier};
use crate::stats::SessionStats;

const SEPARATOR: &str = "────────────────────────────────────────────────────────────";

/// Colour used for the percentage in each tier.
#[must_use]
pub const fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Low => Color::Red,
        Tier::Mid => Color::Yellow,
        Tier::High => Color::Green,
    }
}

/// Renders a frame as `|████------| 40%` with a coloured percentage.
#[must_use]
pub fn render_frame(frame: &ProgressFrame) -> String {
    let percent = style(format!("{}%", frame.percent)).fg(tier_color(frame.tier()));
    format!("{} {percent}", frame.bar())
}

/// Creates the single-line bar that redraws in place on stdout.
fn make_progress_line() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
    bar.set_style(ProgressStyle::with_template("{msg}").expect("progress template is valid"));
    bar
}

/// [`DownloadProgress`] that prints to the terminal.
pub struct TerminalProgress {
    term: Term,
    width: usize,
    line: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    /// Creates a reporter drawing on `term` with a bar `width` cells wide.
    #[must_use]
    pub const fn new(term: Term, width: usize) -> Self {
        Self {
            term,
            width,
            line: Mutex::new(None),
        }
    }

    fn take_line(&self) -> Option<ProgressBar> {
        self.line.lock().ok().and_then(|mut line| line.take())
    }

    fn print(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl DownloadProgress for TerminalProgress {
    fn on_video_info(&self, summary: &VideoSummary, is_playlist: bool) {
        if !is_playlist {
            let _ = self.term.clear_screen();
        }
        for line in summary.lines(is_playlist) {
            self.print(&line);
        }
    }

    fn on_transfer_start(&self, total: u64) {
        if total == 0 {
            log::warn!("stream size unknown, progress will not be shown");
            return;
        }
        if let Ok(mut line) = self.line.lock() {
            *line = Some(make_progress_line());
        }
    }

    fn on_progress(&self, total: u64, remaining: u64) {
        let Some(frame) = ProgressFrame::new(total, remaining, self.width) else {
            return;
        };
        if let Ok(line) = self.line.lock()
            && let Some(bar) = line.as_ref()
        {
            bar.set_message(render_frame(&frame));
        }
    }

    fn on_video_saved(&self, path: &Path, bytes: u64) {
        if let Some(bar) = self.take_line() {
            bar.finish();
        }
        let size = if bytes > 0 {
            format!(" ({})", format_bytes(bytes))
        } else {
            String::new()
        };
        self.print(&format!(
            "{}{size}\n",
            style(format!("Saved to {}", path.display())).bold().green()
        ));
    }

    fn on_error(&self, error: &Error) {
        if let Some(bar) = self.take_line() {
            bar.abandon();
        }
        let _ = Term::stderr().write_line(&format!("{}\n", style(error).bold().red()));
    }

    fn on_playlist_start(&self, summary: &PlaylistSummary) {
        let _ = self.term.clear_screen();
        let mut lines = summary.lines().into_iter();
        if let Some(header) = lines.next() {
            self.print(&style(header).bold().to_string());
        }
        for line in lines {
            self.print(&line);
        }
    }

    fn on_playlist_item(&self, index: usize, count: usize, url: &str) {
        self.print(&style(format!("[{index}/{count}] {url}")).dim().to_string());
    }

    fn on_playlist_complete(&self, stats: &SessionStats) {
        print_summary(&self.term, stats);
    }
}

fn summary_heading(stats: &SessionStats) -> String {
    if stats.all_succeeded() {
        style("Playlist downloaded").bold().green().to_string()
    } else {
        style(format!(
            "Playlist downloaded, {} of {} videos failed",
            stats.videos_failed, stats.videos_attempted
        ))
        .bold()
        .yellow()
        .to_string()
    }
}

/// Prints the final tally of a playlist run.
pub fn print_summary(term: &Term, stats: &SessionStats) {
    let lines = [
        SEPARATOR.to_string(),
        summary_heading(stats),
        SEPARATOR.to_string(),
        format!("  Videos saved:      {}", stats.videos_downloaded),
        format!("  Videos failed:     {}", stats.videos_failed),
        format!("  Total size:        {}", format_bytes(stats.total_bytes)),
        format!("  Total time:        {}", format_elapsed(stats.elapsed)),
        format!(
            "  Average speed:     {}/s",
            format_bytes(stats.average_speed())
        ),
        SEPARATOR.to_string(),
    ];
    for line in lines {
        let _ = term.write_line(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_map_to_traffic_light_colours() {
        assert_eq!(tier_color(Tier::Low), Color::Red);
        assert_eq!(tier_color(Tier::Mid), Color::Yellow);
        assert_eq!(tier_color(Tier::High), Color::Green);
    }

    #[test]
    fn rendered_frame_contains_bar_and_percent() {
        let frame = ProgressFrame::new(200, 100, 10).unwrap();
        let line = console::strip_ansi_codes(&render_frame(&frame)).to_string();
        assert_eq!(line, "|█████-----| 50%");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn summary_heading_mentions_failures() {
        let clean = SessionStats {
            videos_attempted: 2,
            videos_downloaded: 2,
            ..SessionStats::new()
        };
        assert_eq!(
            console::strip_ansi_codes(&summary_heading(&clean)),
            "Playlist downloaded"
        );

        let partial = SessionStats {
            videos_attempted: 4,
            videos_downloaded: 3,
            videos_failed: 1,
            ..SessionStats::new()
        };
        assert_eq!(
            console::strip_ansi_codes(&summary_heading(&partial)),
            "Playlist downloaded, 1 of 4 videos failed"
        );
    }

    #[test]
    fn progress_before_transfer_start_is_ignored() {
        let progress = TerminalProgress::new(Term::stdout(), 10);
        progress.on_progress(200, 100);
        assert!(progress.take_line().is_none());
    }

    #[test]
    fn unknown_size_shows_no_bar() {
        let progress = TerminalProgress::new(Term::stdout(), 10);
        progress.on_transfer_start(0);
        assert!(progress.take_line().is_none());
    }

    #[test]
    fn saved_video_finishes_the_bar() {
        let progress = TerminalProgress::new(Term::stdout(), 10);
        progress.on_transfer_start(100);
        progress.on_progress(100, 0);
        progress.on_video_saved(Path::new("/tmp/videos/clip.mp4"), 100);
        assert!(progress.take_line().is_none());
    }
}
