use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub default_layer_color: String,
    pub layer_colors: BTreeMap<String, String>,
    pub label_color: String,
    pub link_color: String,
    pub link_width: f32,
    pub focus_color: String,
    pub focus_fill_opacity: f32,
    pub focus_stroke_opacity: f32,
    pub frame_focus_color: String,
    pub destination_frame_color: String,
    pub ghost_color: String,
    pub ghost_dasharray: String,
    pub ghost_opacity: f32,
    pub hover_fill_opacity: f32,
    /// Front-end overlay colours, not drawn by the SVG preview.
    pub statistics_color: String,
    pub comment_color: String,
}

impl Theme {
    pub fn editor_default() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            default_layer_color: "#fff".to_string(),
            layer_colors: BTreeMap::new(),
            label_color: "white".to_string(),
            link_color: "#262626".to_string(),
            link_width: 1.5,
            focus_color: "black".to_string(),
            focus_fill_opacity: 0.5,
            focus_stroke_opacity: 0.5,
            frame_focus_color: rgb_color("#00FFFF"),
            destination_frame_color: rgb_color("#f2f2f2"),
            ghost_color: rgb_color("#00FFFF"),
            ghost_dasharray: "3".to_string(),
            ghost_opacity: 0.4,
            hover_fill_opacity: 0.5,
            statistics_color: rgb_color("#8C8C8C"),
            comment_color: rgb_color("#ffffff"),
        }
    }

    /// Same geometry with a dark canvas; links and frames stay readable.
    pub fn dark() -> Self {
        Self {
            background: "#1E1E1E".to_string(),
            default_layer_color: "#3C3C3C".to_string(),
            link_color: rgb_color("#f2f2f2"),
            focus_color: "white".to_string(),
            ..Self::editor_default()
        }
    }

    /// Fill and stroke for a layer of the given type.
    pub fn layer_color(&self, kind: &str) -> &str {
        self.layer_colors
            .get(kind)
            .map(String::as_str)
            .unwrap_or(&self.default_layer_color)
    }
}

/// `#rrggbb` to `rgb(r, g, b)`. Anything else yields an empty string.
pub fn rgb_color(hex: &str) -> String {
    let Some(digits) = hex.strip_prefix('#') else {
        return String::new();
    };
    if digits.len() < 6 || !digits.is_char_boundary(6) {
        return String::new();
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => format!("rgb({r}, {g}, {b})"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_hex_to_rgb() {
        assert_eq!(rgb_color("#00FFFF"), "rgb(0, 255, 255)");
        assert_eq!(rgb_color("#262626"), "rgb(38, 38, 38)");
        assert_eq!(rgb_color("262626"), "");
        assert_eq!(rgb_color("#zz0000"), "");
    }

    #[test]
    fn unknown_layer_types_fall_back_to_default() {
        let mut theme = Theme::editor_default();
        theme
            .layer_colors
            .insert("Convolution".to_string(), "#4C7FBF".to_string());
        assert_eq!(theme.layer_color("Convolution"), "#4C7FBF");
        assert_eq!(theme.layer_color("ReLU"), "#fff");
    }
}
