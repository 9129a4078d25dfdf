use crate::config::load_config;
use crate::drag::{CanvasSize, Editor};
use crate::ir::{Graph, GraphStore, Point};
use crate::layout_dump::{DropDump, LayoutDump, write_layout_dump};
use crate::parser::parse_graph;
use crate::render::{SceneState, render_svg, write_output_png, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    name = "layer-grid",
    version,
    about = "Replay layer drops on a network graph and render the editor canvas"
)]
pub struct Args {
    /// Input graph JSON or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (theme, themeVariables, layer)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Drag layer INDEX and release it at X,Y (repeatable, applied in order)
    #[arg(long = "drop", value_name = "INDEX:X,Y")]
    pub drops: Vec<DropSpec>,

    /// Layer to highlight as focused
    #[arg(long = "focus")]
    pub focus: Option<usize>,

    /// Viewport width
    #[arg(short = 'w', long = "width", default_value_t = 928.0)]
    pub width: f32,

    /// Viewport height
    #[arg(short = 'H', long = "height", default_value_t = 522.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropSpec {
    pub index: usize,
    pub at: Point,
}

impl FromStr for DropSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, coords) = s
            .split_once(':')
            .ok_or_else(|| format!("expected INDEX:X,Y, got '{s}'"))?;
        let (x, y) = coords
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y after ':', got '{coords}'"))?;
        let index = index
            .trim()
            .parse()
            .map_err(|_| format!("invalid layer index '{index}'"))?;
        let coord = |v: &str| {
            v.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid coordinate '{v}'"))
        };
        Ok(Self {
            index,
            at: Point::new(coord(x)?, coord(y)?),
        })
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let mut graph = parse_graph(&input).context("failed to load graph")?;
    let mut editor = Editor::new(config.clone());

    let drops = replay_drops(&mut editor, &mut graph, &args.drops)?;

    if let Some(focus) = args.focus {
        ensure_layer(&graph, focus)?;
        editor.click(focus);
    }

    let viewport = CanvasSize {
        width: args.width,
        height: args.height,
    };
    let canvas = editor.canvas_size(&graph, viewport);

    match args.output_format {
        OutputFormat::Json => {
            let dump = LayoutDump::from_store(&graph, &config.layer, canvas, drops);
            write_layout_dump(args.output.as_deref(), &dump)?;
        }
        OutputFormat::Svg | OutputFormat::Png => {
            let scene = SceneState {
                focus: Some(editor.focus()),
                ghost: None,
            };
            let svg = render_svg(&graph, &scene, canvas, &config);
            if let OutputFormat::Png = args.output_format {
                let output = ensure_output(&args.output, "png")?;
                write_output_png(&svg, &output, &config.render)?;
            } else {
                write_output_svg(&svg, args.output.as_deref())?;
            }
        }
    }

    Ok(())
}

/// Run each drop as a full gesture: start, one move to the release point, end.
fn replay_drops(editor: &mut Editor, graph: &mut Graph, drops: &[DropSpec]) -> Result<Vec<DropDump>> {
    let mut dumps = Vec::with_capacity(drops.len());
    for spec in drops {
        ensure_layer(graph, spec.index)?;
        let mut gesture = editor.drag_start(graph, spec.index);
        let from = gesture.position();
        editor.drag_move(&mut gesture, spec.at.x - from.x, spec.at.y - from.y);
        let outcome = editor.drag_end(gesture, graph);
        log::info!(
            "layer {} released at ({}, {}) settled at ({}, {})",
            spec.index,
            spec.at.x,
            spec.at.y,
            outcome.position.x,
            outcome.position.y
        );
        dumps.push(DropDump {
            index: spec.index,
            released: [spec.at.x, spec.at.y],
            resolved: [outcome.position.x, outcome.position.y],
            links: outcome.links,
        });
    }
    Ok(dumps)
}

fn ensure_layer(graph: &Graph, index: usize) -> Result<()> {
    let count = graph.nodes().len();
    anyhow::ensure!(
        index < count,
        "layer {index} does not exist (graph has {count} layers)"
    );
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
