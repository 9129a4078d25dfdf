use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One layer of the network, drawn as a fixed-size rectangle whose top-left
/// corner sits at `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub src_node_id: usize,
    pub dest_node_id: usize,
}

impl Link {
    pub fn touches(&self, index: usize) -> bool {
        self.src_node_id == index || self.dest_node_id == index
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(skip)]
    pub dragging: bool,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_node(&mut self, name: &str, kind: &str, x: f32, y: f32) -> usize {
        self.nodes.push(Node {
            name: name.to_string(),
            kind: kind.to_string(),
            position: Point::new(x, y),
        });
        self.nodes.len() - 1
    }

    pub fn push_link(&mut self, src: usize, dest: usize) -> usize {
        self.links.push(Link {
            src_node_id: src,
            dest_node_id: dest,
        });
        self.links.len() - 1
    }
}

/// The graph store the editor reads from and commits into.
///
/// Positions are only written once per gesture, when a drag ends.
pub trait GraphStore {
    fn nodes(&self) -> &[Node];
    fn links(&self) -> &[Link];
    fn set_node_position(&mut self, index: usize, position: Point);
    fn set_dragging(&mut self, dragging: bool);
}

impl GraphStore for Graph {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn links(&self) -> &[Link] {
        &self.links
    }

    fn set_node_position(&mut self, index: usize, position: Point) {
        self.nodes[index].position = position;
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }
}
