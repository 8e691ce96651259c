use std::path::Path;
use walkdir::WalkDir;

use crate::error::{GalleryError, Result};
use crate::state::catalog::SEPARATOR;
use crate::state::data::ImageRef;

/// Formats the loader handles; svg is rasterized, the rest decoded
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"];

/// Scan `root` recursively for images
///
/// Returns `(key, reference)` pairs where the key is the slash-separated path
/// relative to `root`. Entries are sorted by file name within each directory
/// so the catalog order is stable across runs.
pub fn scan(root: &Path) -> Result<Vec<(String, ImageRef)>> {
    tracing::info!("🔍 Scanning textures under {}", root.display());

    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| GalleryError::Scan {
            root: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(extension) = path.extension() else {
            continue;
        };
        let ext = extension.to_string_lossy().to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        // strip_prefix cannot fail for entries yielded under root
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let key = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string());

        let image = ImageRef::new(key.clone(), path);
        entries.push((key, image));
    }

    tracing::info!("📁 Found {} images", entries.len());

    Ok(entries)
}
