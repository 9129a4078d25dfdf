use crate::config::{Config, RenderConfig};
use crate::drag::{CanvasSize, FocusState};
use crate::ir::GraphStore;
use crate::layout::{Rect, link_anchors, link_path};
use anyhow::Result;
use std::path::Path;

/// Everything besides the graph that changes how the canvas looks.
#[derive(Debug, Clone, Default)]
pub struct SceneState<'a> {
    pub focus: Option<&'a FocusState>,
    pub ghost: Option<Rect>,
}

pub fn render_svg<S: GraphStore + ?Sized>(
    store: &S,
    scene: &SceneState<'_>,
    canvas: CanvasSize,
    config: &Config,
) -> String {
    let theme = &config.theme;
    let layer = &config.layer;
    let width = canvas.width.max(1.0);
    let height = canvas.height.max(1.0);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"network-editor\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    let clip = &layer.clip_path;
    svg.push_str(&format!(
        "<defs><clipPath id=\"{}\"><rect width=\"{}\" height=\"{}\"/></clipPath></defs>",
        clip.id, clip.width, clip.height
    ));

    svg.push_str("<g id=\"svg-links\">");
    let nodes = store.nodes();
    for (idx, link) in store.links().iter().enumerate() {
        let (src, dest) = link_anchors(nodes, link, layer);
        let d = link_path(src, dest, layer);
        svg.push_str(&format!(
            "<path id=\"link-{idx}\" d=\"{d}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>",
            theme.link_color, theme.link_width
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g id=\"svg-layers\">");
    if let Some(ghost) = scene.ghost {
        svg.push_str(&format!(
            "<rect id=\"auxiliary-layer\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-dasharray=\"{}\" stroke-opacity=\"{}\"/>",
            ghost.x, ghost.y, ghost.width, ghost.height, theme.ghost_color, theme.ghost_dasharray, theme.ghost_opacity
        ));
    }

    let focused = scene.focus.and_then(FocusState::focused);
    let hovered = scene.focus.and_then(FocusState::hovered);
    for (idx, node) in nodes.iter().enumerate() {
        let color = theme.layer_color(&node.kind);
        let fill_opacity = if hovered == Some(idx) {
            theme.hover_fill_opacity
        } else {
            1.0
        };
        svg.push_str(&format!(
            "<g class=\"layer\" id=\"layer-{idx}\" transform=\"translate({}, {})\">",
            node.position.x, node.position.y
        ));
        svg.push_str(&format!(
            "<rect width=\"{}\" height=\"{}\" fill=\"{color}\" stroke=\"{color}\" stroke-width=\"{}\" fill-opacity=\"{fill_opacity}\"/>",
            layer.rect_width, layer.rect_height, layer.rect_border_width
        ));
        if focused == Some(idx) {
            svg.push_str(&format!(
                "<rect width=\"{}\" height=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"{}\" stroke-opacity=\"{}\"/>",
                layer.rect_width,
                layer.rect_height,
                theme.focus_color,
                theme.focus_fill_opacity,
                theme.focus_color,
                theme.focus_stroke_opacity
            ));
            svg.push_str(&format!(
                "<rect width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                layer.rect_width, layer.rect_height, theme.frame_focus_color, layer.frame_stroke_width
            ));
        }
        if hovered == Some(idx) {
            svg.push_str(&format!(
                "<rect class=\"destination-frame\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                layer.rect_width,
                layer.rect_height,
                theme.destination_frame_color,
                layer.destination_frame_stroke_width
            ));
        }
        let dropcap: String = node.kind.chars().take(1).collect();
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}px\" fill-opacity=\"{}\" text-anchor=\"middle\" font-family=\"{}\" pointer-events=\"none\">{}</text>",
            layer.dropcap.offset_x,
            layer.dropcap.offset_y,
            theme.label_color,
            layer.dropcap.font_size,
            layer.dropcap.opacity,
            theme.font_family,
            escape_xml(&dropcap)
        ));
        svg.push_str(&format!(
            "<g clip-path=\"url(#{})\" transform=\"translate({},{})\">",
            clip.id, clip.offset_x, clip.offset_y
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}px\" font-family=\"{}\" pointer-events=\"none\">{}</text>",
            layer.name_label.offset_x,
            layer.name_label.offset_y,
            theme.label_color,
            layer.name_label.font_size,
            theme.font_family,
            escape_xml(&node.name)
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}px\" fill-opacity=\"{}\" font-family=\"{}\" pointer-events=\"none\">{}</text>",
            layer.property_label.offset_x,
            layer.property_label.offset_y,
            theme.label_color,
            layer.property_label.font_size,
            layer.property_label.opacity,
            theme.font_family,
            escape_xml(&node.kind)
        ));
        svg.push_str("</g></g>");
    }
    svg.push_str("</g></svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
