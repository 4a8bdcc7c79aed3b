//! Vertex attributes and the vertex stage.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::pipeline::FragmentInput;
use crate::types::RenderMode;

/// Per-vertex data for a sliced sprite.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SliceVertex {
    /// Position in world space.
    pub position: [f32; 3],
    /// Raw texture coordinate before slicing.
    pub uv: [f32; 2],
    /// Tint color (RGBA).
    pub color: [f32; 4],
    /// Render mode tag: 0 = textured, nonzero = solid.
    pub mode: u32,
}

impl SliceVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SliceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // uv
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // mode
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 9]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Uint32,
                },
            ],
        }
    }
}

/// Output of the vertex stage, input to rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    pub uv: Vec2,
    pub color: Vec4,
    /// Flat: taken from the provoking vertex, never interpolated.
    pub mode: RenderMode,
}

impl VertexOutput {
    /// Fragment input at this vertex with the given interpolated values.
    pub fn fragment(&self, uv: Vec2, color: Vec4) -> FragmentInput {
        FragmentInput {
            uv,
            color,
            mode: self.mode,
        }
    }
}

/// Projects a vertex and forwards its attributes unchanged.
pub fn transform_vertex(view_proj: Mat4, vertex: &SliceVertex) -> VertexOutput {
    VertexOutput {
        clip_position: view_proj * Vec3::from(vertex.position).extend(1.0),
        uv: Vec2::from(vertex.uv),
        color: Vec4::from(vertex.color),
        mode: RenderMode::from_tag(vertex.mode),
    }
}
