use iced::{Point, Rectangle, Size};

use super::{ImageSizes, LayoutPass};
use crate::state::catalog::{Catalog, Folder};
use crate::state::config::LayoutSettings;
use crate::state::data::{ImageRef, LabelStyle, Scene};

/// How the catalog is arranged on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPolicy {
    /// Folder order, one row of images per folder, indented by nesting depth
    Grouped,
    /// Every image on one row, ascending by height, with a caption per height tier
    HeightSorted,
}

impl LayoutPolicy {
    pub fn run<S: ImageSizes + ?Sized>(
        self,
        catalog: &Catalog<ImageRef>,
        sizes: &S,
        settings: &LayoutSettings,
    ) -> Scene {
        let mut pass = LayoutPass::new(settings, sizes);
        match self {
            LayoutPolicy::Grouped => {
                pass.draw_header();
                pass.draw_folder(catalog.root());
            }
            LayoutPolicy::HeightSorted => draw_height_sorted(&mut pass, catalog),
        }
        pass.finish()
    }
}

/// Scene shown for a route no policy handles
pub fn placeholder<S: ImageSizes + ?Sized>(route: &str, sizes: &S, settings: &LayoutSettings) -> Scene {
    let mut pass = LayoutPass::new(settings, sizes);
    pass.draw_header();
    pass.draw_label(&format!("Nothing to show at /{route}"), LabelStyle::label());
    pass.finish()
}

/// Images in grouped drawing order: per folder its own images, then its subfolders
fn collect_images<'c>(folder: &'c Folder<ImageRef>, out: &mut Vec<&'c ImageRef>) {
    out.extend(folder.images().map(|(_, image)| image));
    for (_, subfolder) in folder.subfolders() {
        collect_images(subfolder, out);
    }
}

fn draw_height_sorted<S: ImageSizes + ?Sized>(pass: &mut LayoutPass<'_, S>, catalog: &Catalog<ImageRef>) {
    let settings = pass.settings();

    let mut images = Vec::new();
    collect_images(catalog.root(), &mut images);
    let mut sized: Vec<(&ImageRef, Size)> = images
        .into_iter()
        .filter_map(|image| pass.image_size(image).map(|size| (image, size)))
        .collect();

    // stable: equal heights keep grouped order
    sized.sort_by(|a, b| a.1.height.total_cmp(&b.1.height));

    pass.draw_header();
    pass.draw_label(&settings.sorted_title, LabelStyle::label());
    pass.cursor.y += settings.sorted_gap;

    let y = pass.cursor.y;
    let mut x = 0.0;
    let mut last_height = 0.0;

    for (image, size) in sized {
        pass.push_sprite(image, Rectangle::new(Point::new(x, y), size));

        if size.height > last_height {
            last_height = size.height;
            let text = last_height.to_string();
            let bounds = caption_bounds(settings, &text, x, y, size.width);
            let scale = bounds.width / settings.text.measure(&text, LabelStyle::caption().size).0;
            let style = LabelStyle {
                size: LabelStyle::caption().size * scale,
                ..LabelStyle::caption()
            };
            pass.push_label(text, bounds, style);
        }

        x += size.width + settings.icon_pad;
    }
    pass.cursor.x = x;
}

/// Caption scaled to `width`, bottom-left corner at `(x, y - icon_pad)`
fn caption_bounds(settings: &LayoutSettings, text: &str, x: f32, y: f32, width: f32) -> Rectangle {
    let (natural_width, natural_height) = settings.text.measure(text, LabelStyle::caption().size);
    let ratio = natural_width / natural_height;
    let height = width / ratio;
    Rectangle::new(
        Point::new(x, y - settings.icon_pad - height),
        Size::new(width, height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::config::TextMetrics;
    use crate::state::data::DrawnObject;
    use std::collections::HashMap;

    struct Sizes(HashMap<String, Size>);

    impl ImageSizes for Sizes {
        fn image_size(&self, image: &ImageRef) -> Option<Size> {
            self.0.get(image.key()).copied()
        }
    }

    fn settings() -> LayoutSettings {
        LayoutSettings {
            text: TextMetrics { line_height: 1.0, advance: 0.5 },
            ..LayoutSettings::default()
        }
    }

    fn fixture(entries: &[(&str, f32, f32)]) -> (Catalog<ImageRef>, Sizes) {
        let catalog = Catalog::build(
            entries
                .iter()
                .map(|(key, _, _)| (key.to_string(), ImageRef::new(*key, *key))),
        )
        .unwrap();
        let sizes = Sizes(
            entries
                .iter()
                .map(|(key, w, h)| (key.to_string(), Size::new(*w, *h)))
                .collect(),
        );
        (catalog, sizes)
    }

    fn sprite_of(scene: &Scene, key: &str) -> Rectangle {
        scene
            .sprites()
            .find(|sprite| sprite.image.key() == key)
            .map(|sprite| sprite.bounds)
            .unwrap_or_else(|| panic!("no sprite for {key}"))
    }

    fn label_of(scene: &Scene, text: &str) -> Rectangle {
        scene
            .labels()
            .find(|label| label.text == text)
            .map(|label| label.bounds)
            .unwrap_or_else(|| panic!("no label {text:?}"))
    }

    #[test]
    fn test_grouped_example() {
        let (catalog, sizes) = fixture(&[("a/1.png", 8.0, 10.0), ("a/2.png", 8.0, 30.0), ("b/3.png", 8.0, 20.0)]);
        let settings = settings();
        let scene = LayoutPolicy::Grouped.run(&catalog, &sizes, &settings);

        // header, title "a", 1, 2, title "b", 3
        let order: Vec<String> = scene
            .objects()
            .iter()
            .map(|object| match object {
                DrawnObject::Label(label) => label.text.clone(),
                DrawnObject::Sprite(sprite) => sprite.image.key().to_string(),
            })
            .collect();
        assert_eq!(order, vec![settings.header.clone(), "a".into(), "a/1.png".into(), "a/2.png".into(), "b".into(), "b/3.png".into()]);

        // header: 40 top + 2 lines * 50 + 80 gap = 220; root has no images
        let title_a = label_of(&scene, "a");
        assert_eq!(title_a.position(), Point::new(40.0, 220.0));

        // images of "a" are one level deeper
        let one = sprite_of(&scene, "a/1.png");
        let two = sprite_of(&scene, "a/2.png");
        assert_eq!(one.position(), Point::new(80.0, 260.0));
        assert_eq!(two.position(), Point::new(80.0 + 8.0 + 2.0, 260.0));

        // row closed by the tallest image (30), then the folder gap (40)
        let title_b = label_of(&scene, "b");
        assert_eq!(title_b.y, 260.0 + 30.0 + 40.0);
    }

    #[test]
    fn test_grouped_draws_images_before_subfolders() {
        let (catalog, sizes) = fixture(&[
            ("f/sub/deep.png", 4.0, 4.0),
            ("f/a.png", 4.0, 12.0),
            ("f/b.png", 4.0, 6.0),
        ]);
        let settings = settings();
        let scene = LayoutPolicy::Grouped.run(&catalog, &sizes, &settings);

        let a = sprite_of(&scene, "f/a.png");
        let b = sprite_of(&scene, "f/b.png");
        let sub_title = label_of(&scene, "sub");
        let deep = sprite_of(&scene, "f/sub/deep.png");

        for leaf in [a, b] {
            assert!(leaf.y <= sub_title.y);
            assert!(leaf.y <= deep.y);
        }
        // the row advance is the tallest leaf, not the sum
        assert_eq!(sub_title.y, a.y + 12.0);
        assert_eq!(deep.x, 3.0 * 40.0);
    }

    #[test]
    fn test_grouped_uses_display_names() {
        let (catalog, sizes) = fixture(&[("eote/x.png", 4.0, 4.0)]);
        let settings = settings();
        let scene = LayoutPolicy::Grouped.run(&catalog, &sizes, &settings);

        assert!(scene.labels().any(|label| label.text == "Echoes of the Elders (EOTE) textures"));
        assert!(!scene.labels().any(|label| label.text == "eote"));
    }

    #[test]
    fn test_height_sorted_example() {
        let (catalog, sizes) = fixture(&[("a/1.png", 8.0, 10.0), ("a/2.png", 8.0, 30.0), ("b/3.png", 8.0, 20.0)]);
        let settings = settings();
        let scene = LayoutPolicy::HeightSorted.run(&catalog, &sizes, &settings);

        let order: Vec<&str> = scene.sprites().map(|sprite| sprite.image.key()).collect();
        assert_eq!(order, vec!["a/1.png", "b/3.png", "a/2.png"]);

        let captions: Vec<&str> = scene
            .labels()
            .map(|label| label.text.as_str())
            .filter(|text| text.parse::<f32>().is_ok())
            .collect();
        assert_eq!(captions, vec!["10", "20", "30"]);

        // no folder titles in this view
        assert!(!scene.labels().any(|label| label.text == "a" || label.text == "b"));
        assert_eq!(scene.labels().filter(|label| label.text == settings.header).count(), 1);
    }

    #[test]
    fn test_height_sorted_row_placement() {
        let (catalog, sizes) = fixture(&[("x.png", 16.0, 20.0), ("y.png", 8.0, 10.0), ("z.png", 4.0, 10.0)]);
        let settings = settings();
        let scene = LayoutPolicy::HeightSorted.run(&catalog, &sizes, &settings);

        let sprites: Vec<Rectangle> = scene.sprites().map(|sprite| sprite.bounds).collect();
        // header 220, title 40, gap 50
        let row_y = 220.0 + 40.0 + 50.0;
        assert!(sprites.iter().all(|bounds| bounds.y == row_y));
        assert_eq!(sprites[0].x, 0.0);
        assert_eq!(sprites[1].x, 8.0 + 2.0);
        assert_eq!(sprites[2].x, 8.0 + 2.0 + 4.0 + 2.0);

        // stable order for the tie at height 10
        let order: Vec<&str> = scene.sprites().map(|sprite| sprite.image.key()).collect();
        assert_eq!(order, vec!["y.png", "z.png", "x.png"]);
    }

    #[test]
    fn test_caption_is_scaled_to_sprite_width_above_the_row() {
        let (catalog, sizes) = fixture(&[("x.png", 48.0, 20.0)]);
        let settings = settings();
        let scene = LayoutPolicy::HeightSorted.run(&catalog, &sizes, &settings);

        let sprite = sprite_of(&scene, "x.png");
        let caption = scene.labels().find(|label| label.text == "20").unwrap();

        // "20" at size 24 measures 24 x 24; scaled to width 48 it is 48 x 48
        assert_eq!(caption.bounds.width, 48.0);
        assert_eq!(caption.bounds.height, 48.0);
        assert_eq!(caption.bounds.x, sprite.x);
        assert_eq!(caption.bounds.y + caption.bounds.height, sprite.y - 2.0);
        assert_eq!(caption.style.size, 48.0);
    }

    #[test]
    fn test_height_sorted_is_monotonic_with_one_caption_per_tier() {
        let heights = [7.0, 3.0, 7.0, 12.0, 1.0, 3.0, 12.0, 5.0];
        let keys: Vec<String> = (0..heights.len()).map(|i| format!("d{}/i{i}.png", i % 3)).collect();
        let entries: Vec<(&str, f32, f32)> = keys
            .iter()
            .zip(heights)
            .map(|(key, height)| (key.as_str(), 4.0, height))
            .collect();
        let (catalog, sizes) = fixture(&entries);
        let settings = settings();
        let scene = LayoutPolicy::HeightSorted.run(&catalog, &sizes, &settings);

        let placed: Vec<f32> = scene.sprites().map(|sprite| sprite.bounds.height).collect();
        assert!(placed.windows(2).all(|pair| pair[0] <= pair[1]));

        let mut tiers = 0;
        let mut last = 0.0;
        for height in &placed {
            if *height > last {
                tiers += 1;
                last = *height;
            }
        }
        let captions = scene
            .labels()
            .filter(|label| label.text.parse::<f32>().is_ok())
            .count();
        assert_eq!(tiers, 5);
        assert_eq!(captions, tiers);
    }

    #[test]
    fn test_placeholder_names_the_route() {
        let sizes = Sizes(HashMap::new());
        let settings = settings();
        let scene = placeholder("gallery", &sizes, &settings);

        assert_eq!(scene.sprites().count(), 0);
        assert!(scene.labels().any(|label| label.text.contains("/gallery")));
    }
}
