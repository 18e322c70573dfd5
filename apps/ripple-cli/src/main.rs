use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Mat4, Vec2};
use ripple_common::ViewerConfig;
use ripple_input::{CameraAction, PointerTracker};
use ripple_render::{DebugTextRenderer, Frame, FreeCamera, GridMesh, Renderer};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ripple-cli", about = "Headless tools for the ripple grid viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print grid mesh statistics
    Grid {
        /// Cells along X, defaults to the config
        #[arg(long)]
        width: Option<u16>,
        /// Cells along Z, defaults to the config
        #[arg(long)]
        height: Option<u16>,
    },
    /// Drive the camera with scripted input and print the resulting frame
    Camera {
        /// Pointer drag by DX,DY pixels; repeatable, applied in order
        #[arg(long, value_parser = parse_drag, allow_hyphen_values = true)]
        drag: Vec<Vec2>,
        /// Movement step (forward, backward, strafe-left, strafe-right, lift-up, lift-down); repeatable
        #[arg(long = "action")]
        actions: Vec<CameraAction>,
        /// Viewport aspect ratio, defaults to the configured window
        #[arg(long)]
        aspect: Option<f32>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn parse_drag(s: &str) -> Result<Vec2, String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got `{s}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid drag component `{v}`: {e}"))
    };
    Ok(Vec2::new(parse(dx)?, parse(dy)?))
}

#[derive(Debug, Serialize)]
struct FrameReport {
    eye: [f32; 3],
    direction: [f32; 3],
    right: [f32; 3],
    view: [f32; 16],
    projection: [f32; 16],
    mvp: [f32; 16],
}

impl FrameReport {
    fn new(camera: &FreeCamera, frame: &Frame) -> Self {
        let cols = |m: Mat4| m.to_cols_array();
        Self {
            eye: frame.eye.to_array(),
            direction: frame.direction.to_array(),
            right: camera.right_axis().to_array(),
            view: cols(frame.view),
            projection: cols(frame.projection),
            mvp: cols(frame.mvp()),
        }
    }
}

/// Build the configured camera, replay drags then actions, capture a frame.
fn script_camera(
    config: &ViewerConfig,
    drags: &[Vec2],
    actions: &[CameraAction],
    aspect: f32,
) -> (FreeCamera, Frame) {
    let cam = &config.camera;
    let mut camera = FreeCamera::from_config(cam);
    camera.set_perspective_with_clip(cam.fov_degrees, aspect, cam.near, cam.far);

    let mut pointer = PointerTracker::new();
    camera.update_pointer(pointer.moved(Vec2::ZERO));
    camera.update_pointer(pointer.pressed());
    for delta in drags {
        let sample = pointer.moved(pointer.position() + *delta);
        camera.update_pointer(sample);
    }
    camera.update_pointer(pointer.released());

    for &action in actions {
        camera.apply(action);
    }

    let frame = Frame::capture(&camera);
    (camera, frame)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("ripple-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", ripple_common::crate_info());
            println!("input: {}", ripple_input::crate_info());
            println!("render: {}", ripple_render::crate_info());
        }
        Commands::Grid { width, height } => {
            let width = width.unwrap_or(config.grid.width);
            let height = height.unwrap_or(config.grid.height);
            let grid = GridMesh::new(width, height)?;
            let (hx, hz) = grid.half_extent();
            println!("Grid {width}x{height}");
            println!("Vertices: {}", grid.vertices().len());
            println!("Indices: {}", grid.indices().len());
            println!("Lines: {}", grid.line_count());
            println!("Extent: x in [{}, {hx}], z in [{}, {hz}]", -hx, -hz);
        }
        Commands::Camera {
            drag,
            actions,
            aspect,
            json,
        } => {
            let aspect = aspect.unwrap_or_else(|| config.window.aspect());
            if !(aspect.is_finite() && aspect > 0.0) {
                anyhow::bail!("aspect must be a positive number, got {aspect}");
            }
            tracing::debug!(drags = drag.len(), actions = actions.len(), "scripting camera");

            let (camera, frame) = script_camera(&config, &drag, &actions, aspect);
            if json {
                let report = FrameReport::new(&camera, &frame);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", DebugTextRenderer::new().render(&frame));
                let right = camera.right_axis();
                println!(
                    "Right: ({:.3}, {:.3}, {:.3})",
                    right.x, right.y, right.z
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn parse_drag_accepts_pairs() {
        assert_eq!(parse_drag("10,0"), Ok(Vec2::new(10.0, 0.0)));
        assert_eq!(parse_drag(" -2.5 , 4 "), Ok(Vec2::new(-2.5, 4.0)));
        assert!(parse_drag("10").is_err());
        assert!(parse_drag("a,b").is_err());
    }

    #[test]
    fn cli_parses_repeated_flags() {
        let cli = Cli::parse_from([
            "ripple-cli",
            "camera",
            "--drag",
            "10,0",
            "--drag",
            "-5,3",
            "--action",
            "forward",
            "--action",
            "strafe-left",
            "--json",
        ]);
        let Commands::Camera {
            drag,
            actions,
            json,
            ..
        } = cli.command
        else {
            panic!("expected camera command");
        };
        assert_eq!(drag, vec![Vec2::new(10.0, 0.0), Vec2::new(-5.0, 3.0)]);
        assert_eq!(actions, vec![CameraAction::Forward, CameraAction::StrafeLeft]);
        assert!(json);
    }

    #[test]
    fn cli_rejects_unknown_action() {
        let result = Cli::try_parse_from(["ripple-cli", "camera", "--action", "jump"]);
        assert!(result.is_err());
    }

    #[test]
    fn scripted_yaw_matches_single_drag() {
        let config = ViewerConfig::default();
        let (camera, _) = script_camera(&config, &[Vec2::new(10.0, 0.0)], &[], 4.0 / 3.0);

        let mut expected = FreeCamera::from_config(&config.camera);
        expected.update_mouse(Vec2::ZERO, false);
        expected.update_mouse(Vec2::new(10.0, 0.0), true);
        assert!(camera
            .view_direction()
            .abs_diff_eq(expected.view_direction(), 1e-6));
        assert_eq!(camera.last_mouse_position(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn scripted_actions_move_after_rotation() {
        let config = ViewerConfig::default();
        let (camera, frame) = script_camera(&config, &[], &[CameraAction::Forward], 1.0);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 44.0));
        assert_eq!(frame.eye, camera.position);
    }

    #[test]
    fn report_carries_column_major_matrices() {
        let config = ViewerConfig::default();
        let (camera, frame) = script_camera(&config, &[], &[], 4.0 / 3.0);
        let report = FrameReport::new(&camera, &frame);
        assert_eq!(report.mvp, frame.mvp().to_cols_array());
        assert_eq!(report.right, [1.0, 0.0, 0.0]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["eye"][2], 45.0);
        assert_eq!(json["view"].as_array().unwrap().len(), 16);
    }
}
