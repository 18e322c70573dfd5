//! Rendering core: free camera, per-frame matrix composition, grid geometry.
//!
//! # Invariants
//! - Renderers read a captured `Frame`; they never mutate the camera.
//! - The camera's right axis is derived from its view direction, never stored.
//! - Grid geometry is generated once and never changes.

mod camera;
mod frame;
mod grid;
mod renderer;

pub use camera::{DEFAULT_FAR, DEFAULT_NEAR, FreeCamera};
pub use frame::Frame;
pub use grid::{GridError, GridMesh};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "ripple-render v0.1.0"
}
