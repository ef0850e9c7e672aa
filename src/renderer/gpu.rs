use glam::Vec3;
use std::collections::HashMap;
use std::sync::Arc;
/// Headless wgpu device and the compiler that uploads mesh definitions to it
use wgpu::{Buffer, Device, Queue, Texture, TextureView, util::DeviceExt};

use super::MeshCompiler;
use crate::{
    BoxSceneError, BoxSceneResult,
    assets::Bitmap,
    graphics::{Material, MaterialRef, MeshDefinition, Vertex},
};

/// Device and queue without a presentation surface
pub struct GpuContext {
    device: Device,
    queue: Queue,
    adapter_name: String,
}

impl GpuContext {
    pub async fn new_headless() -> BoxSceneResult<Self> {
        log::info!("Initializing headless wgpu device...");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("No primary adapter found ({e}), trying fallback");
                instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::default(),
                        compatible_surface: None,
                        force_fallback_adapter: true,
                    })
                    .await
                    .map_err(|e| {
                        BoxSceneError::Graphics(format!(
                            "Failed to find any suitable GPU adapter: {}",
                            e
                        ))
                    })?
            }
        };

        let adapter_name = adapter.get_info().name;
        log::info!("Using GPU: {}", adapter_name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Box Scene Device"),
                ..Default::default()
            })
            .await
            .map_err(|e| BoxSceneError::Graphics(format!("Failed to create device: {}", e)))?;

        Ok(Self {
            device,
            queue,
            adapter_name,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    pub fn mesh_compiler(&self) -> GpuMeshCompiler<'_> {
        GpuMeshCompiler::new(&self.device, &self.queue)
    }
}

pub struct GpuTexture {
    pub texture: Texture,
    pub view: TextureView,
    pub width: u32,
    pub height: u32,
}

pub struct CompiledSubmesh {
    pub index_buffer: Buffer,
    pub num_indices: u32,
    pub material: MaterialRef,
    pub texture: Option<Arc<GpuTexture>>,
}

/// A box (or any mesh definition) realized in GPU memory
pub struct CompiledMesh {
    pub vertex_buffer: Buffer,
    pub num_vertices: u32,
    pub submeshes: Vec<CompiledSubmesh>,
    pub bounds: (Vec3, Vec3),
}

impl CompiledMesh {
    pub fn num_triangles(&self) -> u32 {
        self.submeshes.iter().map(|s| s.num_indices / 3).sum()
    }
}

pub struct GpuMeshCompiler<'a> {
    device: &'a Device,
    queue: &'a Queue,
}

impl<'a> GpuMeshCompiler<'a> {
    pub fn new(device: &'a Device, queue: &'a Queue) -> Self {
        Self { device, queue }
    }

    fn check_limits(&self, definition: &MeshDefinition) -> BoxSceneResult<()> {
        let limits = self.device.limits();

        let vertex_bytes = std::mem::size_of_val(definition.vertices.as_slice()) as u64;
        if vertex_bytes > limits.max_buffer_size {
            return Err(BoxSceneError::CompileFailure(format!(
                "vertex data is {} bytes, device allows {}",
                vertex_bytes, limits.max_buffer_size
            )));
        }

        for submesh in &definition.submeshes {
            if let Some(texture) = submesh.material.texture() {
                let (width, height) = texture.bitmap().dimensions();
                let max = limits.max_texture_dimension_2d;
                if width > max || height > max {
                    return Err(BoxSceneError::CompileFailure(format!(
                        "texture {}x{} exceeds device max dimension {}",
                        width, height, max
                    )));
                }
            }
        }

        Ok(())
    }

    fn upload_texture(&self, bitmap: &Bitmap) -> GpuTexture {
        let (width, height) = bitmap.dimensions();
        let texture_size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Material Texture"),
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            bitmap.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            texture_size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        GpuTexture {
            texture,
            view,
            width,
            height,
        }
    }

    fn upload(&self, definition: &MeshDefinition) -> CompiledMesh {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Box Vertex Buffer"),
                contents: bytemuck::cast_slice::<Vertex, u8>(&definition.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        // Faces commonly share a material; upload each texture once
        let mut textures: HashMap<*const Material, Arc<GpuTexture>> = HashMap::new();

        let submeshes = definition
            .submeshes
            .iter()
            .enumerate()
            .map(|(i, submesh)| {
                let index_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some(&format!("Box Submesh {} Index Buffer", i)),
                            contents: bytemuck::cast_slice(&submesh.triangle_indices),
                            usage: wgpu::BufferUsages::INDEX,
                        });

                let texture = submesh.material.texture().map(|texture| {
                    Arc::clone(
                        textures
                            .entry(Arc::as_ptr(&submesh.material))
                            .or_insert_with(|| Arc::new(self.upload_texture(texture.bitmap()))),
                    )
                });

                CompiledSubmesh {
                    index_buffer,
                    num_indices: submesh.triangle_indices.len() as u32,
                    material: Arc::clone(&submesh.material),
                    texture,
                }
            })
            .collect();

        CompiledMesh {
            vertex_buffer,
            num_vertices: definition.vertex_count() as u32,
            submeshes,
            bounds: definition.bounds().unwrap_or((Vec3::ZERO, Vec3::ZERO)),
        }
    }
}

impl MeshCompiler for GpuMeshCompiler<'_> {
    type Output = CompiledMesh;

    fn compile(&self, definition: MeshDefinition) -> BoxSceneResult<CompiledMesh> {
        definition.validate()?;
        self.check_limits(&definition)?;

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mesh = self.upload(&definition);
        let validation = futures::executor::block_on(self.device.pop_error_scope());
        let out_of_memory = futures::executor::block_on(self.device.pop_error_scope());

        if let Some(error) = out_of_memory.or(validation) {
            return Err(BoxSceneError::CompileFailure(error.to_string()));
        }

        log::info!(
            "Compiled mesh: {} vertices, {} triangles in {} submeshes",
            mesh.num_vertices,
            mesh.num_triangles(),
            mesh.submeshes.len()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{Color, Texture, box_definition};
    use futures::executor::block_on;

    fn headless() -> Option<GpuContext> {
        match block_on(GpuContext::new_headless()) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                eprintln!("skipping, no GPU adapter: {e}");
                None
            }
        }
    }

    fn textured(width: u32, height: u32) -> MaterialRef {
        let bitmap = Arc::new(Bitmap::from_rgba(image::RgbaImage::new(width, height)));
        let texture = Texture::from_bitmap(bitmap, u32::MAX).unwrap();
        Arc::new(Material::with_texture(texture))
    }

    fn box_with(materials: &[MaterialRef]) -> MeshDefinition {
        box_definition(Vec3::new(0.625, 1.0, 0.25), Vec3::ZERO, materials).unwrap()
    }

    #[test]
    fn test_box_compiles_with_shared_texture() {
        let Some(gpu) = headless() else { return };

        let side = Arc::new(Material::with_color(Color::WHITE));
        let poster = textured(4, 4);
        let materials = [
            side.clone(),
            poster.clone(),
            poster,
            Arc::new(Material::with_color(Color::BLACK)),
            side.clone(),
            side,
        ];

        let mesh = gpu.mesh_compiler().compile(box_with(&materials)).unwrap();
        assert_eq!(mesh.num_vertices, 24);
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.submeshes.len(), 6);

        let left = mesh.submeshes[1].texture.as_ref().unwrap();
        let back = mesh.submeshes[2].texture.as_ref().unwrap();
        assert!(Arc::ptr_eq(left, back));
        assert_eq!((left.width, left.height), (4, 4));
        assert!(mesh.submeshes[0].texture.is_none());
    }

    #[test]
    fn test_texture_over_device_limit_fails() {
        let Some(gpu) = headless() else { return };

        let max = gpu.device().limits().max_texture_dimension_2d;
        let side = Arc::new(Material::with_color(Color::WHITE));
        let mut materials: Vec<MaterialRef> = vec![side; 6];
        materials[2] = textured(max + 1, 1);

        let result = gpu.mesh_compiler().compile(box_with(&materials));
        assert!(matches!(result, Err(BoxSceneError::CompileFailure(_))));
    }

    #[test]
    fn test_malformed_definition_fails() {
        let Some(gpu) = headless() else { return };

        let side = Arc::new(Material::with_color(Color::WHITE));
        let mut definition = box_with(&vec![side; 6]);
        definition.submeshes[0].triangle_indices.push(24);

        let result = gpu.mesh_compiler().compile(definition);
        assert!(matches!(result, Err(BoxSceneError::CompileFailure(_))));
    }
}
