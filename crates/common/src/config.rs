use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a viewer config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub grid: GridConfig,
    pub camera: CameraConfig,
    pub shaders: ShaderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// RGBA, each channel in `[0, 1]`.
    pub clear_color: [f64; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ripple Deformer".into(),
            width: 640,
            height: 480,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Number of grid cells along X (`width`) and Z (`height`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
        }
    }
}

/// Startup pose and projection parameters for the free camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Euler angles in degrees, applied X then Y then Z after the look-at.
    pub rotation: Vec3,
    /// Degrees of rotation per pixel of pointer movement.
    pub rotate_speed: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 45.0),
            rotation: Vec3::new(30.0, 30.0, 0.0),
            rotate_speed: 0.1,
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Optional shader source overrides. `None` uses the built-in ripple shaders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

impl ViewerConfig {
    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document, treat it as all defaults
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        if self.grid.width == 0 || self.grid.height == 0 {
            return invalid(format!(
                "grid size must be non-zero, got {}x{}",
                self.grid.width, self.grid.height
            ));
        }

        let cam = &self.camera;
        if cam.fov_degrees.is_nan() || cam.fov_degrees <= 0.0 || cam.fov_degrees >= 180.0 {
            return invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            ));
        }
        if cam.near.is_nan() || cam.near <= 0.0 {
            return invalid(format!("near plane must be positive, got {}", cam.near));
        }
        if cam.far.is_nan() || cam.far <= cam.near {
            return invalid(format!(
                "far plane ({}) must be beyond near plane ({})",
                cam.far, cam.near
            ));
        }
        if !cam.rotate_speed.is_finite() {
            return invalid(format!("rotate_speed must be finite, got {}", cam.rotate_speed));
        }
        if !cam.position.is_finite() || !cam.rotation.is_finite() {
            return invalid("camera position and rotation must be finite".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_setup() {
        let config = ViewerConfig::default();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.grid, GridConfig { width: 20, height: 20 });
        assert_eq!(config.camera.position, Vec3::new(0.0, 2.0, 45.0));
        assert_eq!(config.camera.rotation, Vec3::new(30.0, 30.0, 0.0));
        assert_eq!(config.camera.rotate_speed, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        let config = ViewerConfig::from_yaml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let yaml = "camera:\n  position: [1.0, 2.0, 3.0]\ngrid:\n  width: 8\n";
        let config = ViewerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.grid.width, 8);
        assert_eq!(config.grid.height, 20);
        assert_eq!(config.window.title, "Ripple Deformer");
    }

    #[test]
    fn shader_paths_parse() {
        let yaml = "shaders:\n  vertex: ripple.vert.wgsl\n";
        let config = ViewerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.shaders.vertex, Some(PathBuf::from("ripple.vert.wgsl")));
        assert_eq!(config.shaders.fragment, None);
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = ViewerConfig::from_yaml_str("grid: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            "window:\n  width: 0\n",
            "grid:\n  height: 0\n",
            "camera:\n  fov_degrees: 180.0\n",
            "camera:\n  near: 0.0\n",
            "camera:\n  near: 10.0\n  far: 5.0\n",
        ];
        for yaml in cases {
            let err = ViewerConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted: {yaml}");
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ViewerConfig::load("/nonexistent/ripple.yaml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/ripple.yaml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn aspect_from_window_size() {
        let window = WindowConfig::default();
        assert!((window.aspect() - 640.0 / 480.0).abs() < 1e-6);
    }
}
