use std::path::{Path, PathBuf};

/// Errors from loading shader source files.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// WGSL ripple vertex shader. Displaces each grid vertex vertically by a sine
/// wave of its distance from the origin, phase-shifted by `time`.
pub const RIPPLE_VERTEX_SHADER: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
    time: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct GridVertex {
    @location(0) pos: vec3<f32>,
};

struct RippleOutput {
    @builtin(position) clip_position: vec4<f32>,
};

const PI: f32 = 3.14159265;
const AMPLITUDE: f32 = 0.125;
const FREQUENCY: f32 = 4.0;

@vertex
fn vs_main(vertex: GridVertex) -> RippleOutput {
    let distance = length(vertex.pos);
    let y = AMPLITUDE * sin(-PI * distance * FREQUENCY + uniforms.time);

    var out: RippleOutput;
    out.clip_position = uniforms.mvp * vec4<f32>(vertex.pos.x, y, vertex.pos.z, 1.0);
    return out;
}
"#;

/// WGSL fragment shader: flat white lines.
pub const GRID_FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

/// Vertex and fragment WGSL sources. The vertex stage entry point is
/// `vs_main`, the fragment stage entry point is `fs_main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn builtin() -> Self {
        Self {
            vertex: RIPPLE_VERTEX_SHADER.to_string(),
            fragment: GRID_FRAGMENT_SHADER.to_string(),
        }
    }

    /// Built-in sources, with each stage replaced by its file when given.
    pub fn with_overrides(
        vertex: Option<&Path>,
        fragment: Option<&Path>,
    ) -> Result<Self, ShaderError> {
        let mut sources = Self::builtin();
        if let Some(path) = vertex {
            sources.vertex = read_source(path)?;
        }
        if let Some(path) = fragment {
            sources.fragment = read_source(path)?;
        }
        Ok(sources)
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded shader source {}", path.display());
    Ok(source)
}
