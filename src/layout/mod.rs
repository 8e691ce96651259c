/// Layout engine
///
/// This module turns the catalog into a `Scene` of positioned labels and sprites:
/// - `engine.rs` - the layout cursor and the drawing primitives
/// - `policy.rs` - the grouped and height-sorted layout policies

pub mod engine;
pub mod policy;

pub use engine::LayoutPass;
pub use policy::LayoutPolicy;

use iced::Size;

use crate::state::data::ImageRef;

/// Natural pixel size of loaded images
pub trait ImageSizes {
    fn image_size(&self, image: &ImageRef) -> Option<Size>;
}
