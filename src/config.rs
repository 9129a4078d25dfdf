use crate::theme::Theme;
use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_GRID: f32 = 20.0;

static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

/// The shared default configuration table.
pub fn default_config() -> &'static Config {
    &DEFAULT_CONFIG
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    pub offset_x: f32,
    pub offset_y: f32,
    pub font_size: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    pub bar_offset_x: f32,
    pub bar_offset_y: f32,
    pub bar_max_width: f32,
    pub bar_height: f32,
    pub label: TextConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipPathConfig {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Geometry of a layer rectangle and everything drawn relative to it.
///
/// The statistics bar, bounding box and comment sizes are not used by the
/// resolver or the SVG preview; they are carried as the constants table the
/// front-end reads for its own overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    pub grid: f32,
    pub rect_width: f32,
    pub rect_height: f32,
    pub rect_border_width: f32,
    pub dropcap: TextConfig,
    pub name_label: TextConfig,
    pub property_label: TextConfig,
    pub statistics: StatisticsConfig,
    pub bounding_box_width: f32,
    pub bounding_box_height: f32,
    pub frame_stroke_width: f32,
    pub destination_frame_stroke_width: f32,
    pub clip_path: ClipPathConfig,
    pub comment_font_size: f32,
    /// Free space kept around the layers when sizing the canvas, in grid cells.
    pub canvas_margin_cells: f32,
    /// Horizontal reach of a backward link's detour, in half-grid steps.
    /// Never shorter than half a layer plus one grid cell, see [`Self::loop_reach`].
    pub loop_reach_steps: f32,
}

impl LayerConfig {
    /// Derive every size and offset from a grid unit.
    pub fn with_grid(grid: f32) -> Self {
        let rect_width = grid * 10.0;
        let rect_height = grid * 2.0;
        Self {
            grid,
            rect_width,
            rect_height,
            rect_border_width: 1.0,
            dropcap: TextConfig {
                offset_x: grid,
                offset_y: 32.0,
                font_size: 32.0,
                opacity: 0.5,
            },
            name_label: TextConfig {
                offset_x: 0.0,
                offset_y: 12.0,
                font_size: 14.0,
                opacity: 1.0,
            },
            property_label: TextConfig {
                offset_x: 0.0,
                offset_y: grid + 8.0,
                font_size: 12.0,
                opacity: 0.6,
            },
            statistics: StatisticsConfig {
                bar_offset_x: rect_width + 4.0,
                bar_offset_y: grid * 2.0 - 4.0,
                bar_max_width: grid * 3.0,
                bar_height: 4.0,
                label: TextConfig {
                    offset_x: rect_width + 4.0,
                    offset_y: grid * 2.0 - 8.0,
                    font_size: 12.0,
                    opacity: 1.0,
                },
            },
            bounding_box_width: rect_width + grid * 4.0,
            bounding_box_height: rect_height,
            frame_stroke_width: 1.0,
            destination_frame_stroke_width: 2.0,
            clip_path: ClipPathConfig {
                id: "nnc-layer-text-clipper".to_string(),
                width: grid * 8.0,
                height: (grid - 4.0) * 2.0,
                offset_x: grid * 2.0,
                offset_y: 4.0,
            },
            comment_font_size: 14.0,
            canvas_margin_cells: 4.0,
            loop_reach_steps: 18.0,
        }
    }

    /// Distance between a link anchor and its curve control points.
    pub fn link_offset(&self) -> f32 {
        self.grid / 2.0
    }

    /// Horizontal distance from the source anchor to the vertical leg of a
    /// backward link. Clears the right edge of the layer by at least a grid cell.
    pub fn loop_reach(&self) -> f32 {
        (self.link_offset() * self.loop_reach_steps).max(self.rect_width / 2.0 + self.grid)
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::with_grid(DEFAULT_GRID)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 928.0,
            height: 522.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layer: LayerConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::editor_default();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layer: LayerConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layer: Option<LayerOverrides>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    default_layer_color: Option<String>,
    layer_colors: Option<BTreeMap<String, String>>,
    label_color: Option<String>,
    link_color: Option<String>,
    link_width: Option<f32>,
    focus_color: Option<String>,
    ghost_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayerOverrides {
    grid: Option<f32>,
    rect_width: Option<f32>,
    rect_height: Option<f32>,
    canvas_margin_cells: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config {}", path.display()))
}

/// Apply a JSON5 config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "dark" => config.theme = Theme::dark(),
            "default" | "light" => config.theme = Theme::editor_default(),
            other => anyhow::bail!("unknown theme '{other}'"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.default_layer_color {
            config.theme.default_layer_color = v;
        }
        if let Some(v) = vars.layer_colors {
            config.theme.layer_colors.extend(v);
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.link_color {
            config.theme.link_color = v;
        }
        if let Some(v) = vars.link_width {
            config.theme.link_width = v;
        }
        if let Some(v) = vars.focus_color {
            config.theme.focus_color = v;
        }
        if let Some(v) = vars.ghost_color {
            config.theme.ghost_color = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layer) = parsed.layer {
        if let Some(grid) = layer.grid {
            anyhow::ensure!(grid > 0.0, "grid must be positive, got {grid}");
            config.layer = LayerConfig::with_grid(grid);
        }
        if let Some(v) = layer.rect_width {
            config.layer.rect_width = v;
        }
        if let Some(v) = layer.rect_height {
            config.layer.rect_height = v;
        }
        if let Some(v) = layer.canvas_margin_cells {
            config.layer.canvas_margin_cells = v;
        }
    }

    Ok(config)
}
