use glam::Vec2;

use crate::path::ShapeMesh;
use crate::view::Rgba;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeParams {
    /// Where the view's local origin sits on the target, in logical units.
    pub offset: [f32; 2],
    /// Target size in physical pixels.
    pub viewport: [f32; 2],
    pub color: [f32; 4],
    /// Physical pixels per logical unit.
    pub scale: f32,
    pub _pad: [f32; 3],
}

impl ShapeParams {
    pub fn new(offset: Vec2, viewport: (u32, u32), scale: f32, color: Rgba) -> Self {
        Self {
            offset: offset.to_array(),
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            color,
            scale,
            _pad: [0.0; 3],
        }
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const MIN_CAPACITY: u64 = 256;

/// Fills tessellated elastic outlines with a flat colour.
///
/// Draws over whatever is already in the target: there is no clear and no
/// rectangular background, and nothing is clipped to the view bounds so the
/// overshoot stays visible.
pub struct ShapeRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl ShapeRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("elastic_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/elastic.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("elastic_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("elastic_uniform_buffer"),
            size: std::mem::size_of::<ShapeParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("elastic_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("elastic_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("elastic_render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = create_buffer(
            device,
            "elastic_vertex_buffer",
            MIN_CAPACITY,
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = create_buffer(
            device,
            "elastic_index_buffer",
            MIN_CAPACITY,
            wgpu::BufferUsages::INDEX,
        );

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: 0,
        }
    }

    /// Upload `mesh` and `params` for the next [`Self::draw`]. A transparent
    /// colour or an empty mesh makes the next draw a no-op.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &ShapeMesh,
        params: &ShapeParams,
    ) {
        if mesh.is_empty() || params.color[3] <= 0.0 {
            self.index_count = 0;
            return;
        }

        let vertices: &[u8] = bytemuck::cast_slice(&mesh.vertices);
        let indices: &[u8] = bytemuck::cast_slice(&mesh.indices);
        ensure_capacity(
            device,
            &mut self.vertex_buffer,
            "elastic_vertex_buffer",
            vertices.len() as u64,
            wgpu::BufferUsages::VERTEX,
        );
        ensure_capacity(
            device,
            &mut self.index_buffer,
            "elastic_index_buffer",
            indices.len() as u64,
            wgpu::BufferUsages::INDEX,
        );

        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(params));
        queue.write_buffer(&self.vertex_buffer, 0, vertices);
        queue.write_buffer(&self.index_buffer, 0, indices);
        self.index_count = mesh.indices.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn create_buffer(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn ensure_capacity(
    device: &wgpu::Device,
    buffer: &mut wgpu::Buffer,
    label: &str,
    needed: u64,
    usage: wgpu::BufferUsages,
) {
    if buffer.size() >= needed {
        return;
    }
    let size = needed.next_power_of_two().max(MIN_CAPACITY);
    log::debug!("elastic: growing {label} to {size} bytes");
    *buffer = create_buffer(device, label, size, usage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_match_shader_layout() {
        assert_eq!(std::mem::size_of::<ShapeParams>(), 48);
    }

    #[test]
    fn params_never_divide_by_zero() {
        let params = ShapeParams::new(Vec2::new(4.0, 8.0), (0, 0), 2.0, [1.0; 4]);
        assert_eq!(params.viewport, [1.0, 1.0]);
        assert_eq!(params.offset, [4.0, 8.0]);
    }
}
