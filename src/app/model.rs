//! Application model: the folder browser the user navigates.
//!
//! The browser lists one folder at a time and numbers its entries the way
//! they are shown: `..` first (below the root only), then sub-folders, then
//! the current page of tracks.

use std::path::{Path, PathBuf};

use crate::error::{PlayerError, Result};
use crate::library::{Catalog, Track};

/// What a listing number points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Parent,
    Folder(PathBuf),
    /// Index into `App::tracks`.
    Track(usize),
}

/// The main application model.
pub struct App {
    pub root: PathBuf,
    pub current_dir: PathBuf,
    pub folders: Vec<String>,
    pub tracks: Vec<Track>,
    pub album_art: Option<PathBuf>,

    pub page: usize,
    pub page_size: usize,

    /// Folder whose tracks currently back the play order.
    pub order_dir: Option<PathBuf>,

    pub input: String,
    pub message: Option<String>,
}

impl App {
    /// Create a browser rooted at `root`. Call `refresh` to list it.
    pub fn new(root: PathBuf, page_size: usize) -> Self {
        Self {
            current_dir: root.clone(),
            root,
            folders: Vec::new(),
            tracks: Vec::new(),
            album_art: None,
            page: 0,
            page_size: page_size.max(1),
            order_dir: None,
            input: String::new(),
            message: None,
        }
    }

    /// Re-list the current folder.
    pub fn refresh(&mut self, catalog: &impl Catalog) -> Result<()> {
        let folders = catalog.list_folders(&self.current_dir)?;
        let tracks = catalog.list_tracks(&self.current_dir)?;
        self.folders = folders;
        self.tracks = tracks;
        self.album_art = catalog.album_art(&self.current_dir);
        if self.page_start() >= self.tracks.len() {
            self.page = 0;
        }
        Ok(())
    }

    /// Open `dir`. On failure the browser stays where it was.
    pub fn enter(&mut self, dir: PathBuf, catalog: &impl Catalog) -> Result<()> {
        let previous = std::mem::replace(&mut self.current_dir, dir);
        if let Err(e) = self.refresh(catalog) {
            self.current_dir = previous;
            return Err(e);
        }
        self.page = 0;
        Ok(())
    }

    /// Go one level up, never above the root.
    pub fn go_parent(&mut self, catalog: &impl Catalog) -> Result<()> {
        if self.at_root() {
            return Ok(());
        }
        match self.current_dir.parent() {
            Some(parent) => self.enter(parent.to_path_buf(), catalog),
            None => Ok(()),
        }
    }

    pub fn at_root(&self) -> bool {
        self.current_dir == self.root
    }

    /// Entries in listing order; entry `i` has number `i + 1`.
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries = Vec::new();
        if !self.at_root() {
            entries.push(Entry::Parent);
        }
        entries.extend(
            self.folders
                .iter()
                .map(|name| Entry::Folder(self.current_dir.join(name))),
        );
        let start = self.page_start();
        entries.extend((start..start + self.page_tracks().len()).map(Entry::Track));
        entries
    }

    /// Resolve a 1-based listing number.
    pub fn select_by_number(&self, number: usize) -> Result<Entry> {
        number
            .checked_sub(1)
            .and_then(|i| self.entries().into_iter().nth(i))
            .ok_or_else(|| PlayerError::InvalidInput(format!("no item numbered {number}")))
    }

    /// Resolve a listing number that must name a track.
    pub fn resolve_track(&self, number: usize) -> Result<&Track> {
        match self.select_by_number(number)? {
            Entry::Track(i) => Ok(&self.tracks[i]),
            _ => Err(PlayerError::InvalidInput(format!("item {number} is not a song"))),
        }
    }

    /// True when the play order was built from the folder being shown.
    pub fn order_is_current_dir(&self) -> bool {
        self.order_dir.as_deref() == Some(self.current_dir.as_path())
    }

    pub fn page_tracks(&self) -> &[Track] {
        let start = self.page_start().min(self.tracks.len());
        let end = (start + self.page_size).min(self.tracks.len());
        &self.tracks[start..end]
    }

    pub fn page_count(&self) -> usize {
        self.tracks.len().div_ceil(self.page_size).max(1)
    }

    pub fn has_pages(&self) -> bool {
        self.tracks.len() > self.page_size
    }

    /// Advance a page, wrapping to the first after the last.
    pub fn next_page(&mut self) {
        if self.page_start() + self.page_size < self.tracks.len() {
            self.page += 1;
        } else {
            self.page = 0;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// Path shown in the header, relative to the root when possible.
    pub fn location(&self) -> String {
        display_relative(&self.root, &self.current_dir)
    }

    fn page_start(&self) -> usize {
        self.page * self.page_size
    }
}

fn display_relative(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => root.display().to_string(),
        Ok(rel) => format!("{}/{}", root.display(), rel.display()),
        Err(_) => dir.display().to_string(),
    }
}
