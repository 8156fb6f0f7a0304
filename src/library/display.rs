use std::path::Path;

use crate::config::TrackDisplayField;

/// Join the configured fields into a track's list label. Blank fields are
/// skipped; when nothing is left the title is used on its own.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str());

    let parts: Vec<String> = fields
        .iter()
        .filter_map(|field| {
            let value = match field {
                TrackDisplayField::Title => Some(title),
                TrackDisplayField::Artist => artist,
                TrackDisplayField::Album => album,
                TrackDisplayField::Filename => stem,
                TrackDisplayField::Path => return Some(path.display().to_string()),
            };
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
