//! Track catalog: folder listing, tag lookup and album-art discovery.
//!
//! The player core only sees the `Catalog` trait; `FsCatalog` is the
//! filesystem implementation backed by `walkdir` and `lofty`.

mod art;
mod display;
mod model;
mod scan;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use model::Track;
pub use scan::FsCatalog;

/// Lists what can be browsed and played under a folder.
pub trait Catalog {
    /// Names of the sub-folders of `path`, in display order.
    fn list_folders(&self, path: &Path) -> Result<Vec<String>>;

    /// Playable tracks directly inside `path`, in catalog order.
    fn list_tracks(&self, path: &Path) -> Result<Vec<Track>>;

    /// Album art image inside `path`, if any.
    fn album_art(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}
