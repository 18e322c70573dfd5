//! wgpu render backend for the ripple grid viewer.
//!
//! Draws the grid as a single indexed line list through the ripple vertex
//! shader. The `MVP` uniform is rewritten every frame; the `time` uniform is
//! set once at creation.
//!
//! # Invariants
//! - Renderer never mutates camera state.
//! - Grid geometry is uploaded once, at creation.
//! - Setup failures are reported as `GpuError`, never retried.

mod context;
mod gpu;
mod shaders;

pub use context::{GpuContext, GpuError, describe_adapter};
pub use gpu::GridRenderer;
pub use shaders::{GRID_FRAGMENT_SHADER, RIPPLE_VERTEX_SHADER, ShaderError, ShaderSources};
