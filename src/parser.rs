use thiserror::Error;

use crate::ir::Graph;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid graph json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("link {link} references missing node {node} (graph has {count} nodes)")]
    DanglingLink {
        link: usize,
        node: usize,
        count: usize,
    },
    #[error("node {index} ({name}) has a non-finite position")]
    NonFinitePosition { index: usize, name: String },
}

/// Parse a graph from the store's JSON form and check that every link
/// endpoint names an existing node.
pub fn parse_graph(input: &str) -> Result<Graph, GraphError> {
    let graph: Graph = serde_json::from_str(input)?;
    validate_graph(&graph)?;
    log::debug!(
        "parsed graph with {} nodes and {} links",
        graph.nodes.len(),
        graph.links.len()
    );
    Ok(graph)
}

pub fn validate_graph(graph: &Graph) -> Result<(), GraphError> {
    let count = graph.nodes.len();
    for (index, node) in graph.nodes.iter().enumerate() {
        if !node.position.x.is_finite() || !node.position.y.is_finite() {
            return Err(GraphError::NonFinitePosition {
                index,
                name: node.name.clone(),
            });
        }
    }
    for (link, edge) in graph.links.iter().enumerate() {
        for node in [edge.src_node_id, edge.dest_node_id] {
            if node >= count {
                return Err(GraphError::DanglingLink { link, node, count });
            }
        }
    }
    Ok(())
}
