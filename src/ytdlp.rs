//! [`VideoSource`] backed by the `yt-dlp` executable.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::fs::{FileSystem, TokioFileSystem};
use crate::source::{PlaylistInfo, SavedVideo, StreamVariant, VideoInfo, VideoSource};

const PROGRESS_PREFIX: &str = "youloader-progress ";
const SAVED_PREFIX: &str = "youloader-saved ";
const PROGRESS_TEMPLATE: &str = "download:youloader-progress %(progress.downloaded_bytes)s";
const SAVED_TEMPLATE: &str = "after_move:youloader-saved %(filepath)s";
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Drives a `yt-dlp` process for every resolution and transfer.
pub struct YtDlp<F: FileSystem = TokioFileSystem> {
    program: PathBuf,
    fs: F,
}

impl YtDlp<TokioFileSystem> {
    /// Creates a source running `program` with the default file system.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            fs: TokioFileSystem,
        }
    }
}

impl<F: FileSystem> YtDlp<F> {
    /// Creates a source with a custom file system implementation.
    #[must_use]
    pub fn with_fs(program: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            program: program.into(),
            fs,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> Error {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::DependencyNotFound(self.program.display().to_string())
        } else {
            Error::Io(e)
        }
    }

    /// Runs yt-dlp to completion and returns its stdout.
    async fn run_json(&self, args: &[&str], url: &str) -> Result<Vec<u8>> {
        log::debug!("running {} {} {url}", self.program.display(), args.join(" "));
        let output = self
            .command()
            .args(args)
            .arg(url)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(Error::Transfer(failure_reason(
                &String::from_utf8_lossy(&output.stderr),
                output.status,
            )));
        }
        Ok(output.stdout)
    }
}

fn parse_metadata<'de, T: Deserialize<'de>>(stdout: &'de [u8]) -> Result<T> {
    serde_json::from_slice(stdout)
        .map_err(|e| Error::Transfer(format!("unreadable yt-dlp metadata: {e}")))
}

#[async_trait]
impl<F: FileSystem> VideoSource for YtDlp<F> {
    async fn resolve_video(&self, url: &str) -> Result<VideoInfo> {
        let stdout = self
            .run_json(&["--dump-single-json", "--no-playlist", "--no-warnings"], url)
            .await?;
        let raw: RawVideo = parse_metadata(&stdout)?;
        Ok(raw.into_video(url))
    }

    async fn resolve_playlist(&self, url: &str) -> Result<PlaylistInfo> {
        let stdout = self
            .run_json(&["--dump-single-json", "--flat-playlist", "--no-warnings"], url)
            .await?;
        let raw: RawPlaylist = parse_metadata(&stdout)?;
        Ok(raw.into_playlist())
    }

    async fn download(
        &self,
        video: &VideoInfo,
        stream: &StreamVariant,
        output_dir: &Path,
        on_progress: &mut (dyn FnMut(u64) + Send),
    ) -> Result<SavedVideo> {
        self.fs.create_dir_all(output_dir).await?;

        log::debug!(
            "downloading format {} of {} into {}",
            stream.format_id,
            video.url,
            output_dir.display()
        );
        let mut child = self
            .command()
            .arg("-f")
            .arg(&stream.format_id)
            .args(["--no-playlist", "--newline", "--progress", "--no-warnings"])
            .args(["--progress-template", PROGRESS_TEMPLATE])
            .args(["--print", SAVED_TEMPLATE])
            .arg("-o")
            .arg(output_dir.join(OUTPUT_TEMPLATE))
            .arg(&video.url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Transfer("yt-dlp stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Transfer("yt-dlp stderr was not captured".to_string()))?;

        let total = stream.filesize;
        let read_stdout = async {
            let mut lines = BufReader::new(stdout).lines();
            let mut saved = None;
            while let Some(line) = lines.next_line().await? {
                match parse_output_line(&line) {
                    Some(OutputLine::Progress(done)) => on_progress(total.saturating_sub(done)),
                    Some(OutputLine::Saved(path)) => saved = Some(path),
                    None => log::debug!("yt-dlp: {line}"),
                }
            }
            Ok::<_, std::io::Error>(saved)
        };
        let read_stderr = async {
            let mut buf = String::new();
            BufReader::new(stderr).read_to_string(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };

        let (saved, stderr_text) = tokio::join!(read_stdout, read_stderr);
        let status = child.wait().await?;
        let saved = saved?;
        let stderr_text = stderr_text?;

        if !status.success() {
            return Err(Error::Transfer(failure_reason(&stderr_text, status)));
        }

        let Some(path) = saved else {
            log::warn!("yt-dlp did not report a saved path for {}", video.url);
            return Ok(SavedVideo {
                path: output_dir.to_path_buf(),
                bytes: total,
            });
        };
        let bytes = self.fs.file_size(&path).await.unwrap_or(total);
        Ok(SavedVideo { path, bytes })
    }
}

/// Last non-empty stderr line, or the exit status when stderr was silent.
fn failure_reason(stderr: &str, status: std::process::ExitStatus) -> String {
    stderr
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .map_or_else(|| format!("yt-dlp exited with {status}"), ToString::to_string)
}

#[derive(Debug, PartialEq, Eq)]
enum OutputLine {
    /// Bytes transferred so far.
    Progress(u64),
    Saved(PathBuf),
}

fn parse_output_line(line: &str) -> Option<OutputLine> {
    if let Some(rest) = line.strip_prefix(PROGRESS_PREFIX) {
        return rest.trim().parse().ok().map(OutputLine::Progress);
    }
    line.strip_prefix(SAVED_PREFIX)
        .map(|path| OutputLine::Saved(PathBuf::from(path.trim_end())))
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    webpage_url: Option<String>,
    title: String,
    uploader: Option<String>,
    channel: Option<String>,
    duration: Option<f64>,
    upload_date: Option<String>,
    view_count: Option<u64>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    height: Option<u32>,
    filesize: Option<u64>,
    filesize_approx: Option<f64>,
    ext: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlaylist {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    channel: Option<String>,
    playlist_count: Option<usize>,
    view_count: Option<u64>,
    #[serde(default)]
    entries: Vec<Option<RawEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<String>,
    url: Option<String>,
}

fn has_codec(codec: Option<&str>) -> bool {
    codec.is_some_and(|c| c != "none")
}

impl RawFormat {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_stream(self) -> StreamVariant {
        let progressive = has_codec(self.vcodec.as_deref()) && has_codec(self.acodec.as_deref());
        let filesize = self
            .filesize
            .or_else(|| self.filesize_approx.map(|s| s.max(0.0) as u64))
            .unwrap_or(0);
        StreamVariant {
            format_id: self.format_id,
            height: self.height,
            filesize,
            ext: self.ext.unwrap_or_else(|| "mp4".to_string()),
            progressive,
        }
    }
}

impl RawVideo {
    #[allow(clippy::cast_possible_truncation)]
    fn into_video(self, requested_url: &str) -> VideoInfo {
        VideoInfo {
            url: self
                .webpage_url
                .unwrap_or_else(|| requested_url.to_string()),
            title: self.title,
            author: self.uploader.or(self.channel).unwrap_or_default(),
            length: self.duration.map_or(0, |d| d.round() as i64),
            publish_date: self
                .upload_date
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y%m%d").ok()),
            views: self.view_count.unwrap_or(0),
            streams: self.formats.into_iter().map(RawFormat::into_stream).collect(),
        }
    }
}

impl RawPlaylist {
    fn into_playlist(self) -> PlaylistInfo {
        let video_urls: Vec<String> = self
            .entries
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                entry
                    .url
                    .or_else(|| entry.id.map(|id| format!("{WATCH_URL}{id}")))
            })
            .collect();

        PlaylistInfo {
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .or(self.id)
                .unwrap_or_default(),
            owner: self.uploader.or(self.channel).unwrap_or_default(),
            length: self.playlist_count.unwrap_or(video_urls.len()),
            views: self.view_count.unwrap_or(0),
            video_urls,
        }
    }
}
