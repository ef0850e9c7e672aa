pub mod box_mesh;
pub mod material;
pub mod mesh;
pub mod vertex;
/// Geometry and material descriptions handed to the renderer
pub use box_mesh::{Face, box_definition, make_box};
pub use material::{BoxMaterials, Color, Material, MaterialFactory, MaterialRef, MaterialSource, Texture};
pub use mesh::{MeshDefinition, Submesh};
pub use vertex::Vertex;
