use ripple_common::GridConfig;

/// Errors from building a grid mesh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid must have at least one cell in each direction, got {width}x{height}")]
    Empty { width: u16, height: u16 },
    #[error("grid {width}x{height} needs {vertices} vertices, more than 16-bit indices can address")]
    TooManyVertices {
        width: u16,
        height: u16,
        vertices: usize,
    },
}

/// Line-list mesh of a grid lying in the XZ plane, centered on the origin.
///
/// One index per vertex, in emission order: every consecutive index pair is
/// one line segment.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    width: u16,
    height: u16,
    vertices: Vec<[f32; 3]>,
    indices: Vec<u16>,
}

impl GridMesh {
    pub fn new(width: u16, height: u16) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }

        // Odd sizes round down to the nearest even extent
        let w2 = (width / 2) as i32;
        let h2 = (height / 2) as i32;
        let vertex_count = 2 * (2 * w2 as usize + 1) + 2 * (2 * h2 as usize + 1);
        if vertex_count > u16::MAX as usize + 1 {
            return Err(GridError::TooManyVertices {
                width,
                height,
                vertices: vertex_count,
            });
        }

        let (wf, hf) = (w2 as f32, h2 as f32);
        let mut vertices = Vec::with_capacity(vertex_count);

        if width == height {
            // Interleave both line families per step
            for i in -w2..=w2 {
                let i = i as f32;
                vertices.push([i, 0.0, -hf]);
                vertices.push([i, 0.0, hf]);
                vertices.push([-wf, 0.0, i]);
                vertices.push([wf, 0.0, i]);
            }
        } else {
            for x in -w2..=w2 {
                vertices.push([x as f32, 0.0, -hf]);
                vertices.push([x as f32, 0.0, hf]);
            }
            for z in -h2..=h2 {
                vertices.push([-wf, 0.0, z as f32]);
                vertices.push([wf, 0.0, z as f32]);
            }
        }

        let indices = (0..vertices.len() as u32).map(|i| i as u16).collect();

        Ok(Self {
            width,
            height,
            vertices,
            indices,
        })
    }

    pub fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        Self::new(config.width, config.height)
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn line_count(&self) -> usize {
        self.indices.len() / 2
    }

    /// Half extents along X and Z.
    pub fn half_extent(&self) -> (f32, f32) {
        ((self.width / 2) as f32, (self.height / 2) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_shape() {
        let grid = GridMesh::from_config(&GridConfig::default()).unwrap();
        // 21 steps, four vertices each
        assert_eq!(grid.vertices().len(), 84);
        assert_eq!(grid.indices().len(), 84);
        assert_eq!(grid.line_count(), 42);
        assert_eq!(grid.half_extent(), (10.0, 10.0));
    }

    #[test]
    fn square_grid_interleaves_families() {
        let grid = GridMesh::new(20, 20).unwrap();
        let v = grid.vertices();
        assert_eq!(v[0], [-10.0, 0.0, -10.0]);
        assert_eq!(v[1], [-10.0, 0.0, 10.0]);
        assert_eq!(v[2], [-10.0, 0.0, -10.0]);
        assert_eq!(v[3], [10.0, 0.0, -10.0]);
        assert_eq!(v[83], [10.0, 0.0, 10.0]);
    }

    #[test]
    fn all_vertices_on_ground_plane_within_extent() {
        let grid = GridMesh::new(6, 10).unwrap();
        for [x, y, z] in grid.vertices() {
            assert_eq!(*y, 0.0);
            assert!(x.abs() <= 3.0);
            assert!(z.abs() <= 5.0);
        }
    }

    #[test]
    fn rectangular_grid_counts() {
        let grid = GridMesh::new(4, 2).unwrap();
        // 5 lines along Z, 3 along X
        assert_eq!(grid.line_count(), 8);
        assert_eq!(grid.vertices()[0], [-2.0, 0.0, -1.0]);
        assert_eq!(grid.vertices()[10], [-2.0, 0.0, -1.0]);
        assert_eq!(grid.vertices()[11], [2.0, 0.0, -1.0]);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let grid = GridMesh::new(31, 17).unwrap();
        let n = grid.vertices().len();
        assert!(grid.indices().iter().all(|&i| (i as usize) < n));
        assert_eq!(grid.indices().len() % 2, 0);
    }

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(
            GridMesh::new(0, 4),
            Err(GridError::Empty { width: 0, height: 4 })
        );
    }

    #[test]
    fn rejects_grid_beyond_u16_indices() {
        let err = GridMesh::new(u16::MAX, u16::MAX).unwrap_err();
        assert!(matches!(err, GridError::TooManyVertices { .. }));
        assert!(GridMesh::new(16_000, 16_000).is_ok());
    }
}
