/// Error types for the gallery
///
/// Every fallible step (catalog building, manifest scanning, image decoding,
/// configuration) reports through `GalleryError` so the host can turn any
/// failure into a status line instead of panicking.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// Empty path or empty path segment in the asset manifest
    #[error("malformed catalog path {path:?}: {reason}")]
    MalformedPath { path: String, reason: &'static str },

    /// A path that would turn a leaf into a folder (or the other way round)
    #[error("catalog path {path:?} collides with an existing {existing}")]
    PathConflict { path: String, existing: &'static str },

    #[error("failed to scan textures under {root}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to load image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to render SVG {path}: {reason}")]
    Svg { path: PathBuf, reason: String },

    #[error("image loading task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, GalleryError>;
