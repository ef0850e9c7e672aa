/// Parametric box mesh: 6 faces, 4 unshared vertices per face, one submesh per face
use glam::{Vec2, Vec3};

use super::{
    material::MaterialRef,
    mesh::{MeshDefinition, Submesh},
    vertex::Vertex,
};
use crate::{BoxSceneError, BoxSceneResult, renderer::MeshCompiler};

pub const FACE_COUNT: usize = 6;
pub const VERTICES_PER_FACE: usize = 4;
pub const TRIANGLES_PER_FACE: usize = 2;
const COORDS_PER_TRIANGLE: usize = 3;

/// Sign of each corner relative to the center, scaled by the half-extent.
/// p0..p3 are the bottom ring, p4..p7 sit directly above them.
pub const CORNER_SIGNS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

/// Corners of each face, in `Face::ALL` order
pub const FACE_CORNERS: [[usize; VERTICES_PER_FACE]; FACE_COUNT] = [
    [0, 1, 2, 3], // bottom
    [7, 4, 0, 3], // left
    [4, 5, 1, 0], // back
    [6, 7, 3, 2], // front
    [5, 6, 2, 1], // right
    [7, 6, 5, 4], // top
];

/// Outward normals in `Face::ALL` order. Forward is -Z, so "back" faces +Z.
pub const FACE_NORMALS: [Vec3; FACE_COUNT] = [
    Vec3::NEG_Y,
    Vec3::NEG_X,
    Vec3::Z,
    Vec3::NEG_Z,
    Vec3::X,
    Vec3::Y,
];

/// UV for each of a face's corners, shared by all faces
pub const FACE_UVS: [Vec2; VERTICES_PER_FACE] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 0.0),
];

/// Two counter-clockwise triangles over a face's local 4-vertex block
pub const QUAD_TRIANGLES: [u32; TRIANGLES_PER_FACE * COORDS_PER_TRIANGLE] = [3, 1, 0, 3, 2, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Bottom,
    Left,
    Back,
    Front,
    Right,
    Top,
}

impl Face {
    pub const ALL: [Face; FACE_COUNT] = [
        Face::Bottom,
        Face::Left,
        Face::Back,
        Face::Front,
        Face::Right,
        Face::Top,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn normal(self) -> Vec3 {
        FACE_NORMALS[self.index()]
    }

    pub fn corners(self) -> [usize; VERTICES_PER_FACE] {
        FACE_CORNERS[self.index()]
    }

    /// Offset of this face's first vertex in the flat vertex list
    pub fn first_vertex(self) -> u32 {
        (self.index() * VERTICES_PER_FACE) as u32
    }

    pub fn triangle_indices(self) -> Vec<u32> {
        let base = self.first_vertex();
        QUAD_TRIANGLES.iter().map(|&local| base + local).collect()
    }
}

/// Corner positions p0..p7 of a box
pub fn box_corners(extent: Vec3, center: Vec3) -> [Vec3; 8] {
    let half_extent = extent * 0.5;
    CORNER_SIGNS.map(|sign| center + Vec3::from_array(sign) * half_extent)
}

/// Build the definition of a box of full size `extent` centered at `center`.
///
/// `materials` must hold exactly one material per face, in `Face::ALL` order.
/// Non-positive extents are not rejected and produce a flat mesh.
pub fn box_definition(
    extent: Vec3,
    center: Vec3,
    materials: &[MaterialRef],
) -> BoxSceneResult<MeshDefinition> {
    if materials.len() != FACE_COUNT {
        return Err(BoxSceneError::InvalidArgument(format!(
            "a box needs {} materials, got {}",
            FACE_COUNT,
            materials.len()
        )));
    }

    let corners = box_corners(extent, center);

    let mut vertices = Vec::with_capacity(FACE_COUNT * VERTICES_PER_FACE);
    for face in Face::ALL {
        let normal = face.normal();
        for (corner, uv) in face.corners().into_iter().zip(FACE_UVS) {
            vertices.push(Vertex::new(corners[corner], normal, uv));
        }
    }

    let submeshes = Face::ALL
        .into_iter()
        .zip(materials)
        .map(|(face, material)| Submesh::new(face.triangle_indices(), material.clone()))
        .collect();

    Ok(MeshDefinition::new(vertices, submeshes))
}

/// Build a box and hand it to `compiler`. Compile errors are final.
pub fn make_box<C: MeshCompiler>(
    compiler: &C,
    extent: Vec3,
    center: Vec3,
    materials: &[MaterialRef],
) -> BoxSceneResult<C::Output> {
    let definition = box_definition(extent, center, materials)?;
    log::debug!(
        "Compiling box {:?} at {:?}: {} vertices, {} triangles",
        extent,
        center,
        definition.vertex_count(),
        definition.triangle_count()
    );

    compiler.compile(definition).map_err(|e| {
        log::error!("Failed to compile box mesh: {e}");
        match e {
            e @ BoxSceneError::CompileFailure(_) => e,
            other => BoxSceneError::CompileFailure(other.to_string()),
        }
    })
}
