use std::fmt;
use std::sync::Arc;

use crate::assets::ImageStore;
use crate::layout::policy::{self, LayoutPolicy};
use crate::state::catalog::Catalog;
use crate::state::config::LayoutSettings;
use crate::state::data::{ImageRef, Scene};

/// Route fragment naming the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route(String);

impl Route {
    pub const HOME: &'static str = "home";
    pub const BY_HEIGHT: &'static str = "byHeight";

    /// Normalize a fragment: surrounding slashes are dropped and the empty route is home
    pub fn parse(fragment: &str) -> Self {
        let segment = fragment.trim_matches('/');
        if segment.is_empty() {
            Self(Self::HOME.to_string())
        } else {
            Self(segment.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn selection(&self) -> ViewSelection {
        match self.as_str() {
            Self::HOME => ViewSelection::Grouped,
            Self::BY_HEIGHT => ViewSelection::HeightSorted,
            other => ViewSelection::Unknown(other.to_string()),
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::parse("")
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// Which view a route resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSelection {
    Grouped,
    HeightSorted,
    Unknown(String),
}

/// Owns the catalog, the loaded images and whatever is currently drawn
///
/// Every transition destroys the whole scene before laying out again; there
/// is no incremental update.
#[derive(Debug)]
pub struct ViewController {
    catalog: Catalog<ImageRef>,
    settings: LayoutSettings,
    route: Route,
    images: Option<Arc<ImageStore>>,
    scene: Scene,
}

impl ViewController {
    pub fn new(catalog: Catalog<ImageRef>, settings: LayoutSettings, route: Route) -> Self {
        Self {
            catalog,
            settings,
            route,
            images: None,
            scene: Scene::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog<ImageRef> {
        &self.catalog
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn images(&self) -> Option<&ImageStore> {
        self.images.as_deref()
    }

    /// Switch to another route and rebuild
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!("navigating {} -> {}", self.route, route);
        self.route = route;
        self.rebuild();
    }

    /// Every image has been decoded: run the first layout
    pub fn assets_loaded(&mut self, images: Arc<ImageStore>) {
        self.images = Some(images);
        self.rebuild();
    }

    /// Destroy everything drawn, without laying out again
    pub fn teardown(&mut self) -> usize {
        let destroyed = self.scene.destroy_all();
        tracing::info!("🧹 Tore down view {} ({} objects)", self.route, destroyed);
        destroyed
    }

    /// Destroy the current scene and lay out the selected view from scratch
    ///
    /// Before the images are loaded the scene just stays empty.
    pub fn rebuild(&mut self) {
        let destroyed = self.scene.destroy_all();

        let Some(images) = self.images.as_deref() else {
            tracing::debug!("images not loaded yet, nothing to lay out");
            return;
        };

        let selection = self.route.selection();
        self.scene = match &selection {
            ViewSelection::Grouped => LayoutPolicy::Grouped.run(&self.catalog, images, &self.settings),
            ViewSelection::HeightSorted => LayoutPolicy::HeightSorted.run(&self.catalog, images, &self.settings),
            ViewSelection::Unknown(route) => {
                tracing::warn!("⚠️  No view for route /{}", route);
                policy::placeholder(route, images, &self.settings)
            }
        };

        tracing::info!(
            "🎨 Laid out {:?}: destroyed {}, drew {}",
            selection,
            destroyed,
            self.scene.len()
        );
    }
}
