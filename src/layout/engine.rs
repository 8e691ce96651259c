use iced::{Point, Rectangle, Size};

use super::ImageSizes;
use crate::state::catalog::Folder;
use crate::state::config::LayoutSettings;
use crate::state::data::{DrawnObject, ImageRef, Label, LabelStyle, Scene, Sprite};

/// Transient positioning state of one layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
    pub depth: u32,
    /// Tallest sprite in the row currently being drawn
    pub pending_row_height: f32,
}

/// One layout pass: a cursor plus the scene it is filling
pub struct LayoutPass<'a, S: ImageSizes + ?Sized> {
    pub cursor: Cursor,
    settings: &'a LayoutSettings,
    sizes: &'a S,
    scene: Scene,
}

impl<'a, S: ImageSizes + ?Sized> LayoutPass<'a, S> {
    pub fn new(settings: &'a LayoutSettings, sizes: &'a S) -> Self {
        Self {
            cursor: Cursor::default(),
            settings,
            sizes,
            scene: Scene::new(),
        }
    }

    pub fn settings(&self) -> &'a LayoutSettings {
        self.settings
    }

    pub fn image_size(&self, image: &ImageRef) -> Option<Size> {
        self.sizes.image_size(image)
    }

    fn indent(&self) -> f32 {
        self.cursor.depth as f32 * self.settings.depth_size
    }

    /// Place text at the indented left edge and move below it
    pub fn draw_label(&mut self, text: &str, style: LabelStyle) -> Rectangle {
        let (width, height) = self.settings.text.measure(text, style.size);
        let bounds = Rectangle::new(
            Point::new(self.indent(), self.cursor.y),
            Size::new(width, height),
        );
        self.cursor.y += height;

        self.push_label(text.to_string(), bounds, style);
        bounds
    }

    /// Add a label at an explicit position without moving the cursor
    pub fn push_label(&mut self, text: String, bounds: Rectangle, style: LabelStyle) {
        self.scene.push(DrawnObject::Label(Label { text, bounds, style }));
    }

    /// Place an image at the cursor and move right past it
    ///
    /// Returns `None` (and draws nothing) for images with no known size.
    pub fn draw_sprite(&mut self, image: &ImageRef) -> Option<Rectangle> {
        let Some(size) = self.sizes.image_size(image) else {
            tracing::warn!("no size for {}, skipping", image.key());
            return None;
        };

        let bounds = Rectangle::new(Point::new(self.cursor.x + self.indent(), self.cursor.y), size);
        self.cursor.x += size.width + self.settings.icon_pad;
        self.cursor.pending_row_height = self.cursor.pending_row_height.max(size.height);

        self.push_sprite(image, bounds);
        Some(bounds)
    }

    /// Add a sprite at an explicit position without moving the cursor
    pub fn push_sprite(&mut self, image: &ImageRef, bounds: Rectangle) {
        self.scene.push(DrawnObject::Sprite(Sprite {
            image: image.clone(),
            bounds,
        }));
    }

    /// The welcome header, with its gaps above and below
    pub fn draw_header(&mut self) -> Rectangle {
        self.cursor.y += self.settings.header_top;
        let header = self.settings.header.clone();
        let bounds = self.draw_label(&header, LabelStyle::header());
        self.cursor.y += self.settings.header_gap;
        bounds
    }

    /// Grouped traversal of one folder
    ///
    /// All images of the folder come first as one row, then every subfolder
    /// under its title, one nesting level deeper.
    pub fn draw_folder(&mut self, folder: &Folder<ImageRef>) {
        self.cursor.x = 0.0;
        self.cursor.depth += 1;
        let mut drawn = false;

        for (_, image) in folder.images() {
            if self.draw_sprite(image).is_some() {
                drawn = true;
            }
        }

        // close the image row
        self.cursor.y += self.cursor.pending_row_height;
        self.cursor.pending_row_height = 0.0;

        for (key, subfolder) in folder.subfolders() {
            let title = self.settings.title(key).to_string();
            self.draw_label(&title, LabelStyle::label());
            self.draw_folder(subfolder);
        }

        self.cursor.depth -= 1;

        if drawn {
            self.cursor.y += self.settings.folder_gap;
        }
    }

    pub fn finish(self) -> Scene {
        self.scene
    }
}
