/// Image loader
///
/// Decodes every texture of the catalog into a GPU-ready handle before the
/// first layout runs; SVGs are rasterized at their natural size. Loading is all-or-nothing: one unreadable image fails
/// the whole batch instead of leaving the gallery waiting forever.

use iced::widget::image::Handle;
use iced::Size;
use std::collections::HashMap;
use std::path::Path;
use tokio::task;

use crate::error::{GalleryError, Result};
use crate::layout::ImageSizes;
use crate::state::data::ImageRef;

/// A decoded image with its natural pixel size
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub handle: Handle,
    pub size: Size,
}

/// Every loaded image, keyed by reference
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: HashMap<ImageRef, LoadedImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: ImageRef, loaded: LoadedImage) {
        self.images.insert(image, loaded);
    }

    pub fn get(&self, image: &ImageRef) -> Option<&LoadedImage> {
        self.images.get(image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}

impl ImageSizes for ImageStore {
    fn image_size(&self, image: &ImageRef) -> Option<Size> {
        self.get(image).map(|loaded| loaded.size)
    }
}

/// Decode every image
///
/// Each decode runs on the blocking pool; the batch resolves once all of them
/// have finished, or with the first error encountered.
pub async fn load_all(images: Vec<ImageRef>) -> Result<ImageStore> {
    tracing::info!("⏳ Loading {} images", images.len());

    let pending: Vec<_> = images
        .into_iter()
        .map(|image| {
            task::spawn_blocking(move || {
                let loaded = decode(image.file())?;
                Ok::<_, GalleryError>((image, loaded))
            })
        })
        .collect();

    let mut store = ImageStore::new();
    for handle in pending {
        let (image, loaded) = handle.await??;
        store.insert(image, loaded);
    }

    tracing::info!("✅ Loaded {} images", store.len());
    Ok(store)
}

/// Blocking decode of a single file into RGBA pixels
fn decode(path: &Path) -> Result<LoadedImage> {
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        return rasterize(path);
    }

    let decoded = image::open(path).map_err(|source| GalleryError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!("decoded {} ({}x{})", path.display(), width, height);

    Ok(LoadedImage {
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
        size: Size::new(width as f32, height as f32),
    })
}

/// Render an SVG at its natural size
fn rasterize(path: &Path) -> Result<LoadedImage> {
    let fail = |reason: String| GalleryError::Svg {
        path: path.to_path_buf(),
        reason,
    };

    let data = std::fs::read_to_string(path).map_err(|err| fail(err.to_string()))?;
    let options = resvg::usvg::Options::default();
    let fontdb = resvg::usvg::fontdb::Database::new();
    let tree = resvg::usvg::Tree::from_str(&data, &options, &fontdb).map_err(|err| fail(err.to_string()))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| fail(format!("cannot allocate a {width}x{height} canvas")))?;
    resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    tracing::debug!("rasterized {} ({}x{})", path.display(), width, height);

    Ok(LoadedImage {
        handle: Handle::from_rgba(width, height, rgba),
        size: Size::new(width as f32, height as f32),
    })
}
