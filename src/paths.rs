//! Output directory layout.

use std::path::{Path, PathBuf};

/// Directory under the root that single videos are saved to.
pub const VIDEOS_DIR: &str = "videos";

/// Directory under the root that holds one subfolder per playlist.
pub const PLAYLISTS_DIR: &str = "playlists";

/// Folder name for a playlist whose title leaves nothing usable.
pub const UNTITLED_PLAYLIST: &str = "Untitled playlist";

/// Returns the directory a download should be written to.
///
/// Single videos go to `<root>/videos`; playlist items go to
/// `<root>/playlists/<playlist title>`. A title that sanitizes to nothing
/// falls back to [`UNTITLED_PLAYLIST`]. Nothing is created on disk.
#[must_use]
pub fn resolve_path(root: &Path, playlist_title: Option<&str>) -> PathBuf {
    match playlist_title {
        None => root.join(VIDEOS_DIR),
        Some(title) => root.join(PLAYLISTS_DIR).join(playlist_dir_name(title)),
    }
}

fn playlist_dir_name(title: &str) -> String {
    let name = sanitize_filename::sanitize(title);
    if name.trim().is_empty() {
        UNTITLED_PLAYLIST.to_string()
    } else {
        name
    }
}
