#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod drag;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayerConfig, default_config, load_config, parse_config};
pub use drag::{CanvasSize, DragFrame, DragGesture, DropOutcome, Editor, FocusChange, FocusState};
pub use ir::{Graph, GraphStore, Link, Node, Point};
pub use layout::{LinkPath, LinkRoute, Rect, link_path, resolve_drop, snap};
pub use parser::{GraphError, parse_graph};
pub use render::{SceneState, render_svg};
pub use theme::Theme;
