use std::path::{Path, PathBuf};

use layer_grid::layout::{find_overlap, link_anchors};
use layer_grid::{
    Editor, Graph, GraphStore, LayerConfig, LinkRoute, Point, link_path, parse_graph, resolve_drop,
    snap,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> Graph {
    let input = std::fs::read_to_string(fixture(name)).expect("fixture read failed");
    parse_graph(&input).expect("parse failed")
}

#[test]
fn worked_example_settles_below_first_hit() {
    let mut graph = Graph::new();
    graph.push_node("A", "Affine", 0.0, 0.0);
    graph.push_node("B", "Affine", 200.0, 0.0);
    let moving = graph.push_node("C", "ReLU", 0.0, 400.0);
    let layer = LayerConfig::default();
    assert_eq!(snap(Point::new(5.0, 5.0), layer.grid), Point::new(0.0, 0.0));
    let resolved = resolve_drop(&graph.nodes, Some(moving), Point::new(5.0, 5.0), &layer);
    assert_eq!(resolved, Point::new(220.0, 60.0));
}

#[test]
fn every_drop_on_every_fixture_lands_in_free_space() {
    let layer = LayerConfig::default();
    let size = layer.layer_size();
    for name in ["mlp.json", "residual.json"] {
        let base = load(name);
        for moving in 0..base.nodes.len() {
            for x in (-40..700).step_by(29) {
                for y in (-40..500).step_by(31) {
                    let mut graph = base.clone();
                    let mut editor = Editor::default();
                    let mut gesture = editor.drag_start(&mut graph, moving);
                    let from = gesture.position();
                    editor.drag_move(&mut gesture, x as f32 - from.x, y as f32 - from.y);
                    let outcome = editor.drag_end(gesture, &mut graph);

                    let position = graph.nodes[moving].position;
                    assert_eq!(position, outcome.position);
                    assert!(
                        find_overlap(graph.nodes(), position, Some(moving), size).is_none(),
                        "{name}: layer {moving} dropped at ({x}, {y}) overlaps at {position:?}"
                    );
                    assert!(position.x >= 0.0 && position.y >= 0.0);
                    assert!(!graph.dragging);
                }
            }
        }
    }
}

#[test]
fn drop_outcome_links_match_regenerated_paths() {
    let mut graph = load("residual.json");
    let mut editor = Editor::default();
    let mut gesture = editor.drag_start(&mut graph, 1);
    editor.drag_move(&mut gesture, 333.0, 41.0);
    let outcome = editor.drag_end(gesture, &mut graph);

    let indices: Vec<usize> = outcome.links.iter().map(|link| link.index).collect();
    assert_eq!(indices, vec![0, 1, 5]);
    let regenerated = editor.link_paths(&graph, &indices);
    assert_eq!(outcome.links, regenerated);
}

#[test]
fn residual_fixture_uses_all_route_shapes() {
    let graph = load("residual.json");
    let layer = LayerConfig::default();
    let routes: Vec<LinkRoute> = graph
        .links()
        .iter()
        .map(|link| {
            let (src, dest) = link_anchors(graph.nodes(), link, &layer);
            link_path(src, dest, &layer).route
        })
        .collect();
    assert_eq!(routes[0], LinkRoute::Direct);
    assert_eq!(routes[3], LinkRoute::SCurve);
    assert_eq!(routes[5], LinkRoute::LoopAround);
}

#[test]
fn dangling_links_are_rejected() {
    let input = std::fs::read_to_string(fixture("dangling.json")).unwrap();
    let err = parse_graph(&input).unwrap_err();
    assert!(err.to_string().contains("missing node 7"));
}
