//! wgpu renderer for sliced sprites.
//!
//! Runs the same coordinate pipeline as [`CoordinatePipeline`] in
//! `shader.wgsl`. Each bind group carries its own slice and view uniforms,
//! so several panels with different borders can be drawn in one pass.

use glam::Mat4;
use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::error::SliceResult;
use crate::pipeline::{CoordinatePipeline, SliceUniform};
use crate::types::TextureSize;
use crate::vertex::SliceVertex;

const MAX_QUADS_PER_FRAME: usize = 256;

/// View-projection uniform for the vertex stage.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ViewUniform {
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

/// Uploads an RGBA image as a sampled 2D texture.
pub fn create_sprite_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &RgbaImage,
) -> (wgpu::Texture, wgpu::TextureView) {
    let (width, height) = image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Sliced Sprite Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 4] {
    let uniform = wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
    };
    [
        // binding 0: sprite texture
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        },
        // binding 1: sampler
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
        // binding 2: slice parameters
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: uniform,
            count: None,
        },
        // binding 3: view-projection
        wgpu::BindGroupLayoutEntry {
            binding: 3,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: uniform,
            count: None,
        },
    ]
}

/// Draws sliced sprite quads with the slice shader.
///
/// Uses a ring buffer of vertex slots so several quads can be drawn per
/// frame without overwriting vertex data before the GPU reads it.
pub struct SlicedSpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    vertex_buffer: wgpu::Buffer,
    /// Next free quad slot (reset each frame).
    current_slot: std::cell::Cell<usize>,
}

impl SlicedSpriteRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Slice Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Slice Bind Group Layout"),
            entries: &bind_group_layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Slice Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Slice Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[SliceVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Slice Vertex Buffer"),
            size: (std::mem::size_of::<[SliceVertex; 6]>() * MAX_QUADS_PER_FRAME) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            vertex_buffer,
            current_slot: std::cell::Cell::new(0),
        }
    }

    /// Reset the slot counter at the start of each frame.
    pub fn begin_frame(&self) {
        self.current_slot.set(0);
    }

    /// Validates `pipeline` against the bound texture and builds its bind group.
    ///
    /// The uniforms are snapshotted here; rebind after changing the pipeline.
    pub fn bind(
        &self,
        device: &wgpu::Device,
        texture_view: &wgpu::TextureView,
        texture_size: TextureSize,
        sampler: &wgpu::Sampler,
        pipeline: &CoordinatePipeline,
        view_proj: Mat4,
    ) -> SliceResult<wgpu::BindGroup> {
        pipeline.validate(texture_size)?;

        let slice_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Slice Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SliceUniform::from_pipeline(pipeline)]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let view_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Slice View Buffer"),
            contents: bytemuck::cast_slice(&[ViewUniform::new(view_proj)]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Slice Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: slice_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: view_buffer.as_entire_binding(),
                },
            ],
        }))
    }

    /// Draws one quad (two triangles) with a bind group from [`Self::bind`].
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        bind_group: &'a wgpu::BindGroup,
        queue: &wgpu::Queue,
        vertices: &[SliceVertex; 6],
    ) {
        let slot = self.current_slot.get();
        if slot >= MAX_QUADS_PER_FRAME {
            log::warn!("Too many sliced quads in one frame (max {})", MAX_QUADS_PER_FRAME);
            return;
        }
        self.current_slot.set(slot + 1);

        let stride = std::mem::size_of::<[SliceVertex; 6]>() as u64;
        let start = slot as u64 * stride;
        queue.write_buffer(&self.vertex_buffer, start, bytemuck::cast_slice(vertices));

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(start..start + stride));
        render_pass.draw(0..6, 0..1);
    }
}
