use layer_grid::drag::RoutedLink;
use layer_grid::{
    CanvasSize, Config, DragGesture, Editor, Graph, GraphStore, default_config, parse_config,
    parse_graph,
};
use log::Level;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Install the console logger and panic hook. Safe to call more than once.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
}

fn build_config(config_json: Option<String>) -> Result<Config, String> {
    match config_json {
        Some(raw) => parse_config(&raw).map_err(|error| format!("{error:#}")),
        None => Ok(default_config().clone()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|error| error.to_string())
}

/// Editor state for one canvas. The graph is owned here and mutated only when
/// a drag ends.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
    graph: Graph,
}

/// An in-progress drag. Hand it back to [`WasmEditor::drag_end`] on pointer up.
#[wasm_bindgen]
pub struct WasmDragGesture {
    inner: DragGesture,
}

impl WasmEditor {
    fn create(graph_json: &str, config_json: Option<String>) -> Result<Self, String> {
        let graph = parse_graph(graph_json).map_err(|error| error.to_string())?;
        let config = build_config(config_json)?;
        Ok(Self {
            editor: Editor::new(config),
            graph,
        })
    }

    fn check_layer(&self, index: usize) -> Result<(), String> {
        let count = self.graph.nodes().len();
        if index < count {
            Ok(())
        } else {
            Err(format!("layer {index} does not exist (graph has {count} layers)"))
        }
    }

    fn routed_links(&self, link_indices: &[usize]) -> Result<Vec<RoutedLink>, String> {
        let count = self.graph.links().len();
        if let Some(bad) = link_indices.iter().find(|&&i| i >= count) {
            return Err(format!("link {bad} does not exist (graph has {count} links)"));
        }
        Ok(self.editor.link_paths(&self.graph, link_indices))
    }
}

#[wasm_bindgen]
impl WasmEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(graph_json: &str, config_json: Option<String>) -> Result<WasmEditor, JsValue> {
        Self::create(graph_json, config_json).map_err(|error| JsValue::from_str(&error))
    }

    pub fn drag_start(&mut self, index: usize) -> Result<WasmDragGesture, JsValue> {
        self.check_layer(index).map_err(|error| JsValue::from_str(&error))?;
        Ok(WasmDragGesture {
            inner: self.editor.drag_start(&mut self.graph, index),
        })
    }

    /// Returns the frame (live position, ghost rectangle, link paths) as JSON.
    pub fn drag_move(&self, gesture: &mut WasmDragGesture, dx: f32, dy: f32) -> Result<String, JsValue> {
        let frame = self.editor.drag_move(&mut gesture.inner, dx, dy);
        to_json(&frame).map_err(|error| JsValue::from_str(&error))
    }

    pub fn drag_end(&mut self, gesture: WasmDragGesture) -> Result<String, JsValue> {
        let outcome = self.editor.drag_end(gesture.inner, &mut self.graph);
        to_json(&outcome).map_err(|error| JsValue::from_str(&error))
    }

    pub fn click(&mut self, index: usize) -> Result<String, JsValue> {
        to_json(&self.editor.click(index)).map_err(|error| JsValue::from_str(&error))
    }

    pub fn mouse_over(&mut self, index: usize) {
        self.editor.mouse_over(index);
    }

    pub fn mouse_out(&mut self) {
        self.editor.mouse_out();
    }

    pub fn is_dragging(&self) -> bool {
        self.graph.dragging
    }

    /// Regenerate link paths, e.g. after the layout was replaced wholesale.
    pub fn link_paths(&self, link_indices: Vec<u32>) -> Result<String, JsValue> {
        let link_indices: Vec<usize> = link_indices.into_iter().map(|i| i as usize).collect();
        self.routed_links(&link_indices)
            .and_then(|links| to_json(&links))
            .map_err(|error| JsValue::from_str(&error))
    }

    pub fn canvas_size(&self, viewport_width: f32, viewport_height: f32) -> Result<String, JsValue> {
        let viewport = CanvasSize {
            width: viewport_width,
            height: viewport_height,
        };
        to_json(&self.editor.canvas_size(&self.graph, viewport)).map_err(|error| JsValue::from_str(&error))
    }

    pub fn graph_json(&self) -> Result<String, JsValue> {
        to_json(&self.graph).map_err(|error| JsValue::from_str(&error))
    }
}
