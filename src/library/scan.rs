use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;
use crate::error::{PlayerError, Result};

use super::Catalog;
use super::art::looks_like_art;
use super::display::display_from_fields;
use super::model::Track;

/// Filesystem-backed catalog. Lists one folder level at a time.
#[derive(Debug, Clone)]
pub struct FsCatalog {
    settings: LibrarySettings,
    extensions: Vec<String>,
}

impl FsCatalog {
    pub fn new(settings: LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            settings,
            extensions,
        }
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }

    /// Direct children of `dir`, sorted by file name.
    fn entries(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        if !dir.is_dir() {
            return Err(PlayerError::NotFound(dir.to_path_buf()));
        }

        let include_hidden = self.settings.include_hidden;
        Ok(WalkDir::new(dir)
            .follow_links(self.settings.follow_links)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| {
                a.file_name()
                    .to_ascii_lowercase()
                    .cmp(&b.file_name().to_ascii_lowercase())
            })
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || include_hidden || !is_hidden(e.path()))
            .filter_map(|e| e.ok())
            .collect())
    }

    fn read_track(&self, path: &Path, index: usize) -> Track {
        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist: Option<String> = None;
        let mut album: Option<String> = None;
        let mut duration: Option<Duration> = None;

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                let length = tagged.properties().duration();
                if !length.is_zero() {
                    duration = Some(length);
                }

                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title() {
                        if !v.trim().is_empty() {
                            title = v.to_string();
                        }
                    }
                    artist = tag
                        .artist()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty());
                    album = tag
                        .album()
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty());
                }
            }
            Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
        }

        let display = display_from_fields(
            path,
            &title,
            artist.as_deref(),
            album.as_deref(),
            &self.settings.display_fields,
            &self.settings.display_separator,
        );

        Track {
            path: path.to_path_buf(),
            title,
            artist,
            album,
            duration,
            index,
            display,
        }
    }
}

impl Catalog for FsCatalog {
    fn list_folders(&self, path: &Path) -> Result<Vec<String>> {
        Ok(self
            .entries(path)?
            .into_iter()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect())
    }

    fn list_tracks(&self, path: &Path) -> Result<Vec<Track>> {
        let files: Vec<PathBuf> = self
            .entries(path)?
            .into_iter()
            .map(DirEntry::into_path)
            .filter(|p| p.is_file() && self.is_audio_file(p))
            .collect();

        Ok(files
            .iter()
            .enumerate()
            .map(|(index, p)| self.read_track(p, index))
            .collect())
    }

    fn album_art(&self, path: &Path) -> Option<PathBuf> {
        self.entries(path)
            .ok()?
            .into_iter()
            .map(DirEntry::into_path)
            .find(|p| p.is_file() && looks_like_art(p))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
