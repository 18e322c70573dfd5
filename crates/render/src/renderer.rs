use crate::frame::Frame;
use glam::Mat4;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a captured frame and produces output. It never touches
/// the camera; input has already been applied when the frame was captured.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable dump of the frame matrices. Used by the CLI and
/// for testing the render loop without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn write_matrix(out: &mut String, name: &str, m: &Mat4) {
    let _ = writeln!(out, "{name}:");
    // row-major for reading
    for r in 0..4 {
        let row = m.row(r);
        let _ = writeln!(
            out,
            "  [{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
            row.x, row.y, row.z, row.w
        );
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Frame ===");
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) dir=({:.3}, {:.3}, {:.3})",
            frame.eye.x,
            frame.eye.y,
            frame.eye.z,
            frame.direction.x,
            frame.direction.y,
            frame.direction.z
        );
        write_matrix(&mut out, "View", &frame.view);
        write_matrix(&mut out, "Projection", &frame.projection);
        write_matrix(&mut out, "MVP", &frame.mvp());
        out
    }
}
