use glam::Vec3;

use super::{material::MaterialRef, vertex::Vertex};
use crate::{BoxSceneError, BoxSceneResult};

/// Triangles of a mesh that share one material
#[derive(Debug, Clone)]
pub struct Submesh {
    pub triangle_indices: Vec<u32>,
    pub material: MaterialRef,
}

impl Submesh {
    pub fn new(triangle_indices: Vec<u32>, material: MaterialRef) -> Self {
        Self {
            triangle_indices,
            material,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangle_indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

/// CPU-side mesh description, ready to hand to a `MeshCompiler`
#[derive(Debug, Clone)]
pub struct MeshDefinition {
    pub vertices: Vec<Vertex>,
    pub submeshes: Vec<Submesh>,
}

impl MeshDefinition {
    pub fn new(vertices: Vec<Vertex>, submeshes: Vec<Submesh>) -> Self {
        Self {
            vertices,
            submeshes,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(Submesh::triangle_count).sum()
    }

    /// Structural checks a renderer needs before it can realize the mesh.
    /// Zero-area triangles pass.
    pub fn validate(&self) -> BoxSceneResult<()> {
        if self.vertices.is_empty() {
            return Err(BoxSceneError::CompileFailure(
                "mesh has no vertices".to_string(),
            ));
        }
        if self.submeshes.is_empty() {
            return Err(BoxSceneError::CompileFailure(
                "mesh has no submeshes".to_string(),
            ));
        }

        if let Some(index) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(BoxSceneError::CompileFailure(format!(
                "vertex {} has non-finite attributes",
                index
            )));
        }

        let vertex_count = self.vertices.len() as u32;
        for (i, submesh) in self.submeshes.iter().enumerate() {
            let index_count = submesh.triangle_indices.len();
            if index_count == 0 || index_count % 3 != 0 {
                return Err(BoxSceneError::CompileFailure(format!(
                    "submesh {} has {} indices, expected a non-zero multiple of 3",
                    i, index_count
                )));
            }
            if let Some(&bad) = submesh
                .triangle_indices
                .iter()
                .find(|&&index| index >= vertex_count)
            {
                return Err(BoxSceneError::CompileFailure(format!(
                    "submesh {} references vertex {} but mesh has {}",
                    i, bad, vertex_count
                )));
            }
        }

        Ok(())
    }

    /// Axis-aligned bounds of all vertex positions
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.vertices.iter().map(Vertex::position);
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::material::{Color, Material};
    use glam::Vec2;
    use std::sync::Arc;

    fn triangle_mesh(indices: Vec<u32>) -> MeshDefinition {
        let material = Arc::new(Material::with_color(Color::WHITE));
        let vertices = vec![
            Vertex::new(Vec3::ZERO, Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::X, Vec3::Z, Vec2::X),
            Vertex::new(Vec3::Y, Vec3::Z, Vec2::Y),
        ];
        MeshDefinition::new(vertices, vec![Submesh::new(indices, material)])
    }

    #[test]
    fn test_valid_triangle_passes() {
        let mesh = triangle_mesh(vec![0, 1, 2]);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.submeshes[0].triangles().collect::<Vec<_>>(), vec![[0, 1, 2]]);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mesh = triangle_mesh(vec![0, 1, 3]);
        assert!(matches!(
            mesh.validate(),
            Err(BoxSceneError::CompileFailure(_))
        ));
    }

    #[test]
    fn test_partial_triangle_rejected() {
        let mesh = triangle_mesh(vec![0, 1]);
        assert!(matches!(
            mesh.validate(),
            Err(BoxSceneError::CompileFailure(_))
        ));

        let empty = triangle_mesh(vec![]);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_zero_area_triangle_allowed() {
        let mesh = triangle_mesh(vec![0, 0, 0]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_bounds() {
        let mesh = triangle_mesh(vec![0, 1, 2]);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));

        let empty = MeshDefinition::new(Vec::new(), Vec::new());
        assert!(empty.bounds().is_none());
        assert!(empty.validate().is_err());
    }
}
