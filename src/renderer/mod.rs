/// Renderer-side realization of mesh definitions
pub mod gpu;

pub use gpu::{CompiledMesh, CompiledSubmesh, GpuContext, GpuMeshCompiler, GpuTexture};

use crate::{BoxSceneResult, graphics::MeshDefinition};

/// Turns a CPU mesh definition into something a renderer can draw.
///
/// Failures are reported as `BoxSceneError::CompileFailure` and are not retried.
pub trait MeshCompiler {
    type Output;

    fn compile(&self, definition: MeshDefinition) -> BoxSceneResult<Self::Output>;
}
