use std::path::Path;

const ART_NAMES: [&str; 3] = ["folder", "cover", "front"];
const ART_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

/// Image names that read as album art: `cover.jpg`, `Folder.png`, ...
pub(super) fn looks_like_art(path: &Path) -> bool {
    let ext_ok = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| ART_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    let name_ok = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| {
            let stem = stem.to_ascii_lowercase();
            ART_NAMES.iter().any(|n| stem.contains(n))
        })
        .unwrap_or(false);
    ext_ok && name_ok
}
