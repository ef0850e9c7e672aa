/// Application flow: load the front image, prepare materials, build the box,
/// compile it, and place it in node space
use futures::FutureExt;
use glam::Vec3;

use crate::{
    BoxSceneResult,
    assets::AssetManager,
    config::{BoxLayout, SceneConfig},
    graphics::{BoxMaterials, MaterialFactory, make_box},
    renderer::{GpuContext, MeshCompiler},
    tasks::join_exact,
};

/// A compiled box positioned so its center sits at the scene origin
pub struct BoxNode<M> {
    pub mesh: M,
    pub local_position: Vec3,
    pub layout: BoxLayout,
}

pub struct BoxSceneApp {
    config: SceneConfig,
    asset_manager: AssetManager,
}

impl BoxSceneApp {
    pub fn new(config: SceneConfig) -> BoxSceneResult<Self> {
        config.validate()?;
        let asset_manager = AssetManager::new(config.asset_root.clone());
        Ok(Self {
            config,
            asset_manager,
        })
    }

    /// Prepare the three distinct materials concurrently and assign them to
    /// sides once all of them are ready. Any failure fails the whole set.
    pub async fn prepare_materials(
        &mut self,
        factory: &MaterialFactory,
    ) -> BoxSceneResult<BoxMaterials> {
        let bitmap = self
            .asset_manager
            .load_bitmap(&self.config.front_texture)
            .await;

        let side_color = self.config.side_color();
        let [front, side, back] = join_exact([
            factory
                .make_transparent_with_optional_texture(bitmap, side_color)
                .boxed(),
            factory.make_transparent_with_color(side_color).boxed(),
            factory
                .make_transparent_with_color(self.config.back_color())
                .boxed(),
        ])
        .await?;

        Ok(BoxMaterials {
            bottom: side.clone(),
            left: side.clone(),
            front,
            back,
            right: side.clone(),
            top: side,
        })
    }

    pub async fn build_node<C: MeshCompiler>(
        &mut self,
        factory: &MaterialFactory,
        compiler: &C,
    ) -> BoxSceneResult<BoxNode<C::Output>> {
        let materials = self.prepare_materials(factory).await?;
        let layout = self.config.layout();

        let mesh = make_box(
            compiler,
            layout.extent,
            layout.center,
            &materials.into_face_order(),
        )?;

        Ok(BoxNode {
            mesh,
            local_position: layout.node_position,
            layout,
        })
    }

    pub async fn run(mut self) -> BoxSceneResult<()> {
        let gpu = GpuContext::new_headless().await?;
        let factory = MaterialFactory::for_device(gpu.device());
        let compiler = gpu.mesh_compiler();

        let node = self.build_node(&factory, &compiler).await?;

        let (min, max) = node.mesh.bounds;
        log::info!(
            "Box ready on {}: extent {:?}, node at {:?}, bounds {:?}..{:?}",
            gpu.adapter_name(),
            node.layout.extent,
            node.local_position,
            min + node.local_position,
            max + node.local_position
        );
        let textured = node
            .mesh
            .submeshes
            .iter()
            .filter(|s| s.texture.is_some())
            .count();
        log::info!(
            "{} vertices, {} triangles, {} textured faces",
            node.mesh.num_vertices,
            node.mesh.num_triangles(),
            textured
        );

        self.asset_manager.cleanup_unused_assets();
        Ok(())
    }
}
