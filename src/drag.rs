use serde::Serialize;

use crate::config::{Config, LayerConfig, default_config};
use crate::ir::{GraphStore, Point};
use crate::layout::{
    LinkEnd, LinkPath, Rect, destination_anchor, layers_extent, link_anchors, link_path,
    resolve_drop, snap, source_anchor,
};

/// A link attached to the layer being dragged. The anchor of the far end is
/// captured when the gesture starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedLink {
    pub index: usize,
    pub moving: LinkEnd,
    pub src: Point,
    pub dest: Point,
}

impl ConnectedLink {
    fn follow(&mut self, position: Point, layer: &LayerConfig) {
        match self.moving {
            LinkEnd::Source => self.src = source_anchor(position, layer),
            LinkEnd::Destination => self.dest = destination_anchor(position, layer),
            LinkEnd::Both => {
                self.src = source_anchor(position, layer);
                self.dest = destination_anchor(position, layer);
            }
        }
    }

    fn path(&self, layer: &LayerConfig) -> RoutedLink {
        RoutedLink {
            index: self.index,
            path: link_path(self.src, self.dest, layer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedLink {
    pub index: usize,
    pub path: LinkPath,
}

/// What to draw after one pointer move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragFrame {
    pub position: Point,
    /// Where the layer would land if dropped now, before overlap resolution.
    pub ghost: Rect,
    pub links: Vec<RoutedLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropOutcome {
    pub index: usize,
    pub position: Point,
    pub links: Vec<RoutedLink>,
}

/// State of one drag gesture, from pointer down to pointer up.
#[derive(Debug, Clone)]
pub struct DragGesture {
    index: usize,
    position: Point,
    links: Vec<ConnectedLink>,
    layer: LayerConfig,
}

impl DragGesture {
    pub fn start<S: GraphStore + ?Sized>(store: &mut S, index: usize, layer: &LayerConfig) -> Self {
        store.set_dragging(true);
        let nodes = store.nodes();
        let position = nodes[index].position;

        let links: Vec<ConnectedLink> = store
            .links()
            .iter()
            .enumerate()
            .filter(|(_, link)| link.touches(index))
            .map(|(i, link)| {
                let (src, dest) = link_anchors(nodes, link, layer);
                let moving = match (link.src_node_id == index, link.dest_node_id == index) {
                    (true, true) => LinkEnd::Both,
                    (true, false) => LinkEnd::Source,
                    _ => LinkEnd::Destination,
                };
                ConnectedLink {
                    index: i,
                    moving,
                    src,
                    dest,
                }
            })
            .collect();

        log::debug!(
            "drag start on layer {index} at ({}, {}) with {} connected links",
            position.x,
            position.y,
            links.len()
        );
        Self {
            index,
            position,
            links,
            layer: layer.clone(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn connected_links(&self) -> &[ConnectedLink] {
        &self.links
    }

    /// Apply a raw pointer delta. No snapping happens until the drop.
    pub fn drag_move(&mut self, dx: f32, dy: f32) -> DragFrame {
        self.position = self.position.offset(dx, dy);
        let layer = &self.layer;
        let links = self
            .links
            .iter_mut()
            .map(|link| {
                link.follow(self.position, layer);
                link.path(layer)
            })
            .collect();
        let ghost = Rect::at(snap(self.position, layer.grid), layer.layer_size());
        log::trace!(
            "drag move layer {} to ({}, {})",
            self.index,
            self.position.x,
            self.position.y
        );
        DragFrame {
            position: self.position,
            ghost,
            links,
        }
    }

    /// Resolve the drop position, commit it to the store and release the
    /// dragging flag.
    pub fn finish<S: GraphStore + ?Sized>(mut self, store: &mut S) -> DropOutcome {
        let position = resolve_drop(store.nodes(), Some(self.index), self.position, &self.layer);
        let layer = &self.layer;
        let links = self
            .links
            .iter_mut()
            .map(|link| {
                link.follow(position, layer);
                link.path(layer)
            })
            .collect();
        store.set_node_position(self.index, position);
        store.set_dragging(false);
        log::debug!(
            "drag end on layer {} committed at ({}, {})",
            self.index,
            position.x,
            position.y
        );
        DropOutcome {
            index: self.index,
            position,
            links,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum FocusChange {
    Unchanged,
    Moved { from: Option<usize>, to: usize },
}

/// Focused layer (highlight frame) and hovered layer (link-drawing target).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    focused: Option<usize>,
    hovered: Option<usize>,
}

impl FocusState {
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn click(&mut self, index: usize) -> FocusChange {
        if self.focused == Some(index) {
            return FocusChange::Unchanged;
        }
        let from = self.focused.replace(index);
        FocusChange::Moved { from, to: index }
    }

    pub fn mouse_over(&mut self, index: usize) {
        self.hovered = Some(index);
    }

    pub fn mouse_out(&mut self) {
        self.hovered = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

/// Handler set for the layer elements of an editor canvas.
///
/// Drag state lives in the [`DragGesture`] returned by [`Editor::drag_start`],
/// so independent gestures never share state.
#[derive(Debug, Clone)]
pub struct Editor {
    config: Config,
    focus: FocusState,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(default_config().clone())
    }
}

impl Editor {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            focus: FocusState::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn drag_start<S: GraphStore + ?Sized>(&mut self, store: &mut S, index: usize) -> DragGesture {
        self.focus.click(index);
        DragGesture::start(store, index, &self.config.layer)
    }

    pub fn drag_move(&self, gesture: &mut DragGesture, dx: f32, dy: f32) -> DragFrame {
        gesture.drag_move(dx, dy)
    }

    pub fn drag_end<S: GraphStore + ?Sized>(&self, gesture: DragGesture, store: &mut S) -> DropOutcome {
        gesture.finish(store)
    }

    pub fn click(&mut self, index: usize) -> FocusChange {
        self.focus.click(index)
    }

    pub fn mouse_over(&mut self, index: usize) {
        self.focus.mouse_over(index);
    }

    pub fn mouse_out(&mut self) {
        self.focus.mouse_out();
    }

    /// Regenerate the paths of the given links from the store's positions.
    pub fn link_paths<S: GraphStore + ?Sized>(&self, store: &S, link_indices: &[usize]) -> Vec<RoutedLink> {
        let layer = &self.config.layer;
        let nodes = store.nodes();
        let links = store.links();
        link_indices
            .iter()
            .map(|&index| {
                let (src, dest) = link_anchors(nodes, &links[index], layer);
                RoutedLink {
                    index,
                    path: link_path(src, dest, layer),
                }
            })
            .collect()
    }

    pub fn all_link_paths<S: GraphStore + ?Sized>(&self, store: &S) -> Vec<RoutedLink> {
        let indices: Vec<usize> = (0..store.links().len()).collect();
        self.link_paths(store, &indices)
    }

    /// Canvas large enough for the viewport and every layer plus a margin.
    pub fn canvas_size<S: GraphStore + ?Sized>(&self, store: &S, viewport: CanvasSize) -> CanvasSize {
        let layer = &self.config.layer;
        let margin = layer.grid * layer.canvas_margin_cells;
        match layers_extent(store.nodes(), layer) {
            Some(extent) => CanvasSize {
                width: viewport.width.max(extent.width + margin),
                height: viewport.height.max(extent.height + margin),
            },
            None => viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Graph;

    fn chain() -> Graph {
        let mut graph = Graph::new();
        graph.push_node("in", "InputX", 0.0, 0.0);
        graph.push_node("affine", "Affine", 0.0, 80.0);
        graph.push_node("relu", "ReLU", 0.0, 160.0);
        graph.push_link(0, 1);
        graph.push_link(1, 2);
        graph
    }

    #[test]
    fn start_collects_connected_links_and_sets_flag() {
        let mut graph = chain();
        let mut editor = Editor::default();
        let gesture = editor.drag_start(&mut graph, 1);
        assert!(graph.dragging);
        assert_eq!(editor.focus().focused(), Some(1));
        let links = gesture.connected_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].moving, LinkEnd::Destination);
        assert_eq!(links[0].src, Point::new(100.0, 40.0));
        assert_eq!(links[1].moving, LinkEnd::Source);
        assert_eq!(links[1].dest, Point::new(100.0, 160.0));
    }

    #[test]
    fn move_tracks_raw_delta_and_ghost_snaps() {
        let mut graph = chain();
        let mut editor = Editor::default();
        let mut gesture = editor.drag_start(&mut graph, 2);
        editor.drag_move(&mut gesture, 7.0, 3.0);
        let frame = editor.drag_move(&mut gesture, 5.0, 9.0);
        assert_eq!(frame.position, Point::new(12.0, 172.0));
        assert_eq!(frame.ghost.origin(), Point::new(20.0, 180.0));
        assert_eq!(frame.ghost.width, 200.0);
        assert_eq!(frame.links.len(), 1);
        assert_eq!(frame.links[0].index, 1);
        assert_eq!(frame.links[0].path.end(), Some(Point::new(112.0, 172.0)));
        // Nothing is committed while dragging.
        assert_eq!(graph.nodes[2].position, Point::new(0.0, 160.0));
        assert!(graph.dragging);
    }

    #[test]
    fn end_resolves_overlap_and_commits() {
        let mut graph = chain();
        let mut editor = Editor::default();
        let mut gesture = editor.drag_start(&mut graph, 2);
        editor.drag_move(&mut gesture, 4.0, -75.0);
        let outcome = editor.drag_end(gesture, &mut graph);
        // Lands on "affine" at (0, 80) and is pushed past it.
        assert_eq!(outcome.position, Point::new(220.0, 140.0));
        assert_eq!(graph.nodes[2].position, Point::new(220.0, 140.0));
        assert!(!graph.dragging);
        // The 20px drop between anchors is not enough for a bend.
        assert_eq!(outcome.links[0].path.to_svg(), "M100,120L320,140");
    }

    #[test]
    fn self_loop_moves_both_ends() {
        let mut graph = Graph::new();
        graph.push_node("rnn", "RNN", 0.0, 0.0);
        graph.push_link(0, 0);
        let mut gesture = DragGesture::start(&mut graph, 0, &LayerConfig::default());
        assert_eq!(gesture.connected_links()[0].moving, LinkEnd::Both);
        let frame = gesture.drag_move(40.0, 0.0);
        assert_eq!(
            frame.links[0].path,
            link_path(Point::new(140.0, 40.0), Point::new(140.0, 0.0), &LayerConfig::default())
        );
    }

    #[test]
    fn independent_gestures_do_not_share_state() {
        let mut graph = chain();
        let layer = LayerConfig::default();
        let mut first = DragGesture::start(&mut graph, 0, &layer);
        let second = DragGesture::start(&mut graph, 2, &layer);
        first.drag_move(100.0, 0.0);
        assert_eq!(second.position(), Point::new(0.0, 160.0));
        assert_eq!(first.connected_links().len(), 1);
        assert_eq!(second.connected_links().len(), 1);
    }

    #[test]
    fn focus_click_and_hover() {
        let mut editor = Editor::default();
        assert_eq!(editor.click(3), FocusChange::Moved { from: None, to: 3 });
        assert_eq!(editor.click(3), FocusChange::Unchanged);
        assert_eq!(editor.click(1), FocusChange::Moved { from: Some(3), to: 1 });
        editor.mouse_over(4);
        assert_eq!(editor.focus().hovered(), Some(4));
        editor.mouse_out();
        assert_eq!(editor.focus().hovered(), None);
        assert_eq!(editor.focus().focused(), Some(1));
    }

    #[test]
    fn link_paths_follow_store_positions() {
        let mut graph = chain();
        let editor = Editor::default();
        graph.nodes[2].position = Point::new(400.0, 240.0);
        let paths = editor.link_paths(&graph, &[1]);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].index, 1);
        assert_eq!(
            paths[0].path.to_svg(),
            "M100,120L100,170Q100,180,110,180L490,180Q500,180,500,190L500,240"
        );
        assert_eq!(editor.all_link_paths(&graph).len(), 2);
    }

    #[test]
    fn canvas_grows_past_viewport() {
        let mut graph = chain();
        let editor = Editor::default();
        let viewport = CanvasSize {
            width: 800.0,
            height: 150.0,
        };
        let size = editor.canvas_size(&graph, viewport);
        assert_eq!(size, CanvasSize { width: 800.0, height: 280.0 });
        graph.nodes[0].position = Point::new(900.0, 0.0);
        assert_eq!(editor.canvas_size(&graph, viewport).width, 1180.0);
        assert_eq!(editor.canvas_size(&Graph::new(), viewport), viewport);
    }
}
