/// Gallery configuration
///
/// Every value has a built-in default, so the gallery runs without a config
/// file. When `<config dir>/asset-gallery/config.json` exists, any field it
/// sets overrides the default; fields it omits keep their defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{GalleryError, Result};

/// Top-level configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory scanned recursively for textures
    pub textures_root: PathBuf,

    /// Route shown at startup ("home" or "byHeight")
    pub start_route: String,

    /// Initial camera hint; drawn content may exceed it
    pub world_size: WorldSize,

    /// Fixed line in the bottom-right corner
    pub footer: String,

    pub layout: LayoutSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

/// Constants of the layout engine
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    // ========== Spacing ==========

    /// Horizontal indent per folder nesting level
    pub depth_size: f32,

    /// Horizontal gap after every sprite
    pub icon_pad: f32,

    /// Vertical gap after a folder that drew at least one image
    pub folder_gap: f32,

    /// Vertical gap above the welcome header
    pub header_top: f32,

    /// Vertical gap below the welcome header
    pub header_gap: f32,

    /// Vertical gap between the "sorted by height" title and the sprite row
    pub sorted_gap: f32,

    // ========== Text ==========

    pub header: String,
    pub sorted_title: String,

    /// Display names for folder keys; folders without an entry show their key
    pub titles: BTreeMap<String, String>,

    pub text: TextMetrics,
}

/// Approximate text measurement used by the layout engine
///
/// The canvas renders labels with the same line height, so measured and
/// drawn heights agree.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TextMetrics {
    /// Line height as a multiple of the font size
    pub line_height: f32,
    /// Average glyph advance as a multiple of the font size
    pub advance: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            textures_root: PathBuf::from("assets/textures"),
            start_route: "home".to_string(),
            world_size: WorldSize {
                width: 1000.0,
                height: 1000.0,
            },
            footer: "All rights reserved ©".to_string(),
            layout: LayoutSettings::default(),
        }
    }
}

impl Default for WorldSize {
    fn default() -> Self {
        Config::default().world_size
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let titles = [
            ("eote", "Echoes of the Elders (EOTE) textures"),
            ("pitbound", "Pitbound"),
        ]
        .into_iter()
        .map(|(key, title)| (key.to_string(), title.to_string()))
        .collect();

        Self {
            depth_size: 40.0,
            icon_pad: 2.0,
            folder_gap: 40.0,
            header_top: 40.0,
            header_gap: 80.0,
            sorted_gap: 50.0,
            header: "Welcome to the asset gallery!\nAll rights reserved".to_string(),
            sorted_title: "Sorted by height".to_string(),
            titles,
            text: TextMetrics::default(),
        }
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            line_height: 1.2,
            advance: 0.55,
        }
    }
}

impl LayoutSettings {
    /// Display name of a folder
    pub fn title<'a>(&'a self, key: &'a str) -> &'a str {
        self.titles.get(key).map(String::as_str).unwrap_or(key)
    }
}

impl TextMetrics {
    /// Rendered (width, height) of `text` at font `size`
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let lines = text.split('\n');
        let (count, longest) = lines.fold((0usize, 0usize), |(count, longest), line| {
            (count + 1, longest.max(line.chars().count()))
        });
        (
            longest as f32 * size * self.advance,
            count as f32 * size * self.line_height,
        )
    }
}

impl Config {
    /// Location of the optional config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("asset-gallery");
            path.push("config.json");
            path
        })
    }

    /// Load the config file at the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load `path`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("⚙️  No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(GalleryError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_json(&json).map_err(|source| GalleryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("⚙️  Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
