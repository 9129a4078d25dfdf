pub mod routing;
pub(crate) mod types;

pub use routing::{LinkPath, LinkRoute, PathCommand, link_path};
pub use types::*;

use crate::config::LayerConfig;
use crate::ir::{Link, Node, Point};

impl LayerConfig {
    pub fn layer_size(&self) -> Size {
        Size {
            width: self.rect_width,
            height: self.rect_height,
        }
    }
}

/// Round each axis to the nearest non-negative multiple of `grid`.
pub fn snap(point: Point, grid: f32) -> Point {
    let axis = |v: f32| {
        let cells = (v / grid).round();
        if cells > 0.0 { cells * grid } else { 0.0 }
    };
    Point::new(axis(point.x), axis(point.y))
}

/// Overlap test for two layers of the same size.
pub fn layers_overlap(a: Point, b: Point, size: Size) -> bool {
    Rect::at(a, size).overlaps(&Rect::at(b, size))
}

/// Position of the first node, in index order, that overlaps a layer placed
/// at `position`. `moving` is skipped.
pub fn find_overlap(
    nodes: &[Node],
    position: Point,
    moving: Option<usize>,
    size: Size,
) -> Option<Point> {
    nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != moving)
        .map(|(_, node)| node.position)
        .find(|other| layers_overlap(position, *other, size))
}

/// Snap a dropped layer to the grid and push it down-right past every layer
/// it lands on until it sits in free space.
///
/// Each displacement moves the layer strictly below the bottom edge of the
/// layer it collided with, and y never decreases, so no layer is collided
/// with twice. That bounds the loop at one displacement per other node.
pub fn resolve_drop(
    nodes: &[Node],
    moving: Option<usize>,
    raw: Point,
    layer: &LayerConfig,
) -> Point {
    let size = layer.layer_size();
    let grid = layer.grid;
    let mut position = snap(raw, grid);

    for _ in 0..nodes.len() {
        let Some(hit) = find_overlap(nodes, position, moving, size) else {
            return position;
        };
        let next = Point::new(hit.x + size.width + grid, hit.y + size.height + grid);
        position = snap(next, grid);
        log::debug!(
            "layer overlaps ({}, {}), displaced to ({}, {})",
            hit.x,
            hit.y,
            position.x,
            position.y
        );
    }

    if find_overlap(nodes, position, moving, size).is_some() {
        log::warn!(
            "overlap resolution gave up after {} displacements at ({}, {})",
            nodes.len(),
            position.x,
            position.y
        );
    }
    position
}

/// Bottom-centre anchor where outgoing links start.
pub fn source_anchor(position: Point, layer: &LayerConfig) -> Point {
    position.offset(layer.rect_width / 2.0, layer.rect_height)
}

/// Top-centre anchor where incoming links end.
pub fn destination_anchor(position: Point, layer: &LayerConfig) -> Point {
    position.offset(layer.rect_width / 2.0, 0.0)
}

pub fn link_anchors(nodes: &[Node], link: &Link, layer: &LayerConfig) -> (Point, Point) {
    (
        source_anchor(nodes[link.src_node_id].position, layer),
        destination_anchor(nodes[link.dest_node_id].position, layer),
    )
}

/// Bounding box of all layer rectangles.
pub fn layers_extent(nodes: &[Node], layer: &LayerConfig) -> Option<Rect> {
    let size = layer.layer_size();
    nodes
        .iter()
        .map(|node| Rect::at(node.position, size))
        .reduce(|acc, rect| acc.union(&rect))
}
