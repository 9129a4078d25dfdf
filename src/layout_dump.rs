use crate::config::LayerConfig;
use crate::drag::{CanvasSize, RoutedLink};
use crate::ir::GraphStore;
use crate::layout::{LinkRoute, link_anchors, link_path};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub grid: f32,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDump {
    pub index: usize,
    pub src_node_id: usize,
    pub dest_node_id: usize,
    pub route: LinkRoute,
    pub d: String,
}

/// One replayed drop: where it was released and where it settled.
#[derive(Debug, Serialize)]
pub struct DropDump {
    pub index: usize,
    pub released: [f32; 2],
    pub resolved: [f32; 2],
    pub links: Vec<RoutedLink>,
}

impl LayoutDump {
    pub fn from_store<S: GraphStore + ?Sized>(
        store: &S,
        layer: &LayerConfig,
        canvas: CanvasSize,
        drops: Vec<DropDump>,
    ) -> Self {
        let nodes = store
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| NodeDump {
                index,
                name: node.name.clone(),
                kind: node.kind.clone(),
                x: node.position.x,
                y: node.position.y,
                width: layer.rect_width,
                height: layer.rect_height,
            })
            .collect();

        let links = store
            .links()
            .iter()
            .enumerate()
            .map(|(index, link)| {
                let (src, dest) = link_anchors(store.nodes(), link, layer);
                let path = link_path(src, dest, layer);
                LinkDump {
                    index,
                    src_node_id: link.src_node_id,
                    dest_node_id: link.dest_node_id,
                    route: path.route,
                    d: path.to_svg(),
                }
            })
            .collect();

        LayoutDump {
            grid: layer.grid,
            width: canvas.width,
            height: canvas.height,
            nodes,
            links,
            drops,
        }
    }
}

pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => println!("{}", serde_json::to_string_pretty(dump)?),
    }
    Ok(())
}
