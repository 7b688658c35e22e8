//! Per-frame sprite drawing.
//!
//! Every frame the game hands over a list of `SpriteQuad`s in draw order. They
//! are expanded into a CPU-side mesh, streamed into GPU buffers that grow
//! (power-of-two) but never shrink, and drawn with one `draw_indexed` per quad.

use glam::Vec2;
use wgpu::util::DeviceExt;

use crate::camera::Camera2D;
use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::{TextureId, TextureRegistry};
use crate::vertex::SpriteVertex;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// One textured rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    pub texture: TextureId,
    pub center: Vec2,
    pub size: Vec2,
    /// Top-left corner of the sampled region in UV space.
    pub uv_min: Vec2,
    pub uv_size: Vec2,
    pub color: [f32; 4],
}

impl SpriteQuad {
    /// Quad sampling the whole texture.
    pub fn full(texture: TextureId, center: Vec2, size: Vec2) -> Self {
        Self {
            texture,
            center,
            size,
            uv_min: Vec2::ZERO,
            uv_size: Vec2::ONE,
            color: WHITE,
        }
    }
}

/// Expand quads into vertices (4 each, counter-clockwise from bottom-left)
/// and indices (6 each).
pub fn build_mesh(quads: &[SpriteQuad]) -> (Vec<SpriteVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(quads.len() * 4);
    let mut indices = Vec::with_capacity(quads.len() * 6);

    for quad in quads {
        let half = quad.size * 0.5;
        let u0 = quad.uv_min.x;
        let u1 = quad.uv_min.x + quad.uv_size.x;
        // Image rows run top-down, so the quad's top edge samples uv_min.y.
        let v_top = quad.uv_min.y;
        let v_bottom = quad.uv_min.y + quad.uv_size.y;
        let base_index = vertices.len() as u32;

        vertices.push(SpriteVertex {
            position: [quad.center.x - half.x, quad.center.y - half.y],
            tex_coords: [u0, v_bottom],
            color: quad.color,
        });
        vertices.push(SpriteVertex {
            position: [quad.center.x + half.x, quad.center.y - half.y],
            tex_coords: [u1, v_bottom],
            color: quad.color,
        });
        vertices.push(SpriteVertex {
            position: [quad.center.x + half.x, quad.center.y + half.y],
            tex_coords: [u1, v_top],
            color: quad.color,
        });
        vertices.push(SpriteVertex {
            position: [quad.center.x - half.x, quad.center.y + half.y],
            tex_coords: [u0, v_top],
            color: quad.color,
        });

        indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
    }

    (vertices, indices)
}

pub struct SpriteRenderer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl SpriteRenderer {
    pub fn new(device: &wgpu::Device, pipeline: &SpritePipeline, camera: &Camera2D) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[camera.build_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = pipeline.create_camera_bind_group(device, &camera_buffer);

        Self {
            vertex_buffer: create_vertex_buffer(device, 1),
            index_buffer: create_index_buffer(device, 1),
            camera_buffer,
            camera_bind_group,
            vertex_capacity: 1,
            index_capacity: 1,
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera2D) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.build_uniform()]),
        );
    }

    /// Clear the surface, draw `quads` in order and present. Returns false
    /// when no surface texture was available and the frame was skipped.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        pipeline: &SpritePipeline,
        textures: &TextureRegistry,
        quads: &[SpriteQuad],
        clear_color: wgpu::Color,
    ) -> bool {
        let (vertices, indices) = build_mesh(quads);
        self.ensure_capacity(&gpu.device, vertices.len(), indices.len());
        if !vertices.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            gpu.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }

        let Some((output, view)) = gpu.begin_frame() else {
            return false;
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sprite Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for (i, quad) in quads.iter().enumerate() {
                let Some(texture) = textures.get(quad.texture) else {
                    log::warn!("Skipping sprite with unknown texture {:?}", quad.texture);
                    continue;
                };
                let start = (i * 6) as u32;
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                render_pass.draw_indexed(start..start + 6, 0, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        true
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
