/// Texture asset module
///
/// This module handles:
/// - Discovering image files under the textures root (manifest.rs)
/// - Decoding every image before the first layout (loader.rs)

pub mod manifest;
pub mod loader;

pub use loader::{ImageStore, LoadedImage};
