/// Shared data structures for the gallery
///
/// These structs represent the data model that flows between
/// the catalog, the layout engine and the canvas.

use iced::{Color, Rectangle};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle to a loadable bitmap, identified by its path relative to the textures root
///
/// Clones share the same source; the image data itself lives in the
/// `ImageStore` and is never owned by a drawn object.
#[derive(Clone)]
pub struct ImageRef {
    source: Arc<ImageSource>,
}

struct ImageSource {
    /// Slash-separated key (e.g. "eote/items/sword.png")
    key: String,
    /// Full path to the file on disk
    file: PathBuf,
}

impl ImageRef {
    pub fn new(key: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            source: Arc::new(ImageSource {
                key: key.into(),
                file: file.into(),
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.source.key
    }

    pub fn file(&self) -> &Path {
        &self.source.file
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ImageRef {}

impl Hash for ImageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageRef").field(&self.key()).finish()
    }
}

/// Font size and fill of a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub size: f32,
    pub color: Color,
}

impl LabelStyle {
    /// Folder titles and plain labels
    pub const fn label() -> Self {
        Self { size: 40.0, color: Color::WHITE }
    }

    /// The welcome header at the top of every view
    pub const fn header() -> Self {
        Self { size: 50.0, color: Color::WHITE }
    }

    /// Height-bucket captions in the height-sorted view (before scaling)
    pub const fn caption() -> Self {
        Self { size: 24.0, color: Color::WHITE }
    }
}

/// A positioned piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Top-left corner and rendered size in world units
    pub bounds: Rectangle,
    pub style: LabelStyle,
}

/// A positioned image at its natural pixel size
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub image: ImageRef,
    pub bounds: Rectangle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawnObject {
    Label(Label),
    Sprite(Sprite),
}

impl DrawnObject {
    /// Destroy this object
    ///
    /// Sprites give up their own reference only; the shared image stays
    /// loaded for the next layout pass.
    fn destroy(self) {
        match self {
            DrawnObject::Label(label) => drop(label),
            DrawnObject::Sprite(Sprite { image, .. }) => drop(image),
        }
    }
}

/// Everything drawn by one layout pass, in drawing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    objects: Vec<DrawnObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: DrawnObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[DrawnObject] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.objects.iter().filter_map(|object| match object {
            DrawnObject::Label(label) => Some(label),
            DrawnObject::Sprite(_) => None,
        })
    }

    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.objects.iter().filter_map(|object| match object {
            DrawnObject::Sprite(sprite) => Some(sprite),
            DrawnObject::Label(_) => None,
        })
    }

    /// Destroy every drawn object, returning how many were destroyed
    pub fn destroy_all(&mut self) -> usize {
        let count = self.objects.len();
        for object in self.objects.drain(..) {
            object.destroy();
        }
        count
    }
}
