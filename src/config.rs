//! Stage configuration loaded at startup
//!
//! Holds the design constants of the stage (surface sizes, ruler metrics,
//! zoom behaviour). The file is read once and never written back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Anchor point about which the whole-view zoom is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformOrigin {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl TransformOrigin {
    pub const ALL: [TransformOrigin; 5] = [
        TransformOrigin::TopLeft,
        TransformOrigin::TopRight,
        TransformOrigin::BottomLeft,
        TransformOrigin::BottomRight,
        TransformOrigin::Center,
    ];

    /// Anchor as fractions of the view size (x, y)
    pub fn anchor(self) -> (f64, f64) {
        match self {
            TransformOrigin::TopLeft => (0.0, 0.0),
            TransformOrigin::TopRight => (1.0, 0.0),
            TransformOrigin::BottomLeft => (0.0, 1.0),
            TransformOrigin::BottomRight => (1.0, 1.0),
            TransformOrigin::Center => (0.5, 0.5),
        }
    }

    /// Name shown by the origin selector
    pub fn name(self) -> &'static str {
        match self {
            TransformOrigin::TopLeft => "top-left",
            TransformOrigin::TopRight => "top-right",
            TransformOrigin::BottomLeft => "bottom-left",
            TransformOrigin::BottomRight => "bottom-right",
            TransformOrigin::Center => "center",
        }
    }

    /// Look up an origin by selector name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|origin| origin.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Base sizes of the ruler strip before ruler scaling, with their floors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerStyle {
    /// Ruler strip width at 100% ruler scale
    pub base_width: u32,
    pub font_base: f32,
    pub font_floor: f32,
    pub major_tick_base: f32,
    pub major_tick_floor: f32,
    pub minor_tick_base: f32,
    pub minor_tick_floor: f32,
    /// Distance of label text from the left edge of the strip
    pub label_inset: f32,
}

impl Default for RulerStyle {
    fn default() -> Self {
        Self {
            base_width: 80,
            font_base: 16.0,
            font_floor: 10.0,
            major_tick_base: 12.0,
            major_tick_floor: 6.0,
            minor_tick_base: 6.0,
            minor_tick_floor: 3.0,
            label_inset: 6.0,
        }
    }
}

/// Application configuration read at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Width of the vector surface in pixels
    #[serde(default = "default_stage_size")]
    pub stage_width: u32,
    /// Height shared by the ruler strip and the vector surface
    #[serde(default = "default_stage_size")]
    pub stage_height: u32,
    #[serde(default)]
    pub ruler: RulerStyle,
    /// Label interval used when the interval input is unusable
    #[serde(default = "default_label_interval")]
    pub default_interval: i64,
    /// Horizontal inset of freshly attached overlays
    #[serde(default = "default_overlay_inset")]
    pub overlay_inset: f32,
    /// Number of empty upload slots present at startup
    #[serde(default = "default_initial_slots")]
    pub initial_slots: usize,
    /// Multiplier applied by a single zoom in/out step
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f64,
    /// Pointer travel (px) that doubles the scale during a drag zoom
    #[serde(default = "default_drag_sensitivity")]
    pub drag_sensitivity: f64,
    #[serde(default)]
    pub initial_min: i64,
    #[serde(default = "default_initial_max")]
    pub initial_max: i64,
    #[serde(default)]
    pub initial_origin: TransformOrigin,
    /// Render scale used when rasterizing a document page
    #[serde(default = "default_document_scale")]
    pub document_scale: f32,
    /// Visible height of the scrolling viewport
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

fn default_stage_size() -> u32 {
    5000
}

fn default_label_interval() -> i64 {
    10
}

fn default_overlay_inset() -> f32 {
    10.0
}

fn default_initial_slots() -> usize {
    2
}

fn default_zoom_step() -> f64 {
    1.1
}

fn default_drag_sensitivity() -> f64 {
    600.0
}

fn default_initial_max() -> i64 {
    100
}

fn default_document_scale() -> f32 {
    2.0
}

fn default_viewport_height() -> f64 {
    900.0
}

impl StageConfig {
    /// Directory name under the user config dir
    pub const APP_DIR: &'static str = "rulerstage";

    /// Location of the config file, if the platform has a config dir
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Parse a config file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: StageConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Replace values that would make the stage unusable with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.stage_width == 0 || self.stage_height == 0 {
            log::warn!("Stage dimensions must be non-zero, using defaults");
            self.stage_width = defaults.stage_width;
            self.stage_height = defaults.stage_height;
        }
        if self.default_interval < 1 {
            self.default_interval = defaults.default_interval;
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            self.zoom_step = defaults.zoom_step;
        }
        if !(self.drag_sensitivity.is_finite() && self.drag_sensitivity > 0.0) {
            self.drag_sensitivity = defaults.drag_sensitivity;
        }
        self
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            stage_width: default_stage_size(),
            stage_height: default_stage_size(),
            ruler: RulerStyle::default(),
            default_interval: default_label_interval(),
            overlay_inset: default_overlay_inset(),
            initial_slots: default_initial_slots(),
            zoom_step: default_zoom_step(),
            drag_sensitivity: default_drag_sensitivity(),
            initial_min: 0,
            initial_max: default_initial_max(),
            initial_origin: TransformOrigin::TopLeft,
            document_scale: default_document_scale(),
            viewport_height: default_viewport_height(),
        }
    }
}
