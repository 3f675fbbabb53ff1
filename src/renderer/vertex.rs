//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const TOP_SKY: [f32; 4] = [0.78, 0.87, 0.97, 1.0];
    pub const BOTTOM_SKY: [f32; 4] = [0.72, 0.83, 0.96, 1.0];
    pub const CAVERN_WALL: [f32; 4] = [0.45, 0.42, 0.50, 1.0];
    pub const CAVERN_WALL_ALT: [f32; 4] = [0.40, 0.37, 0.45, 1.0];
    pub const ROCK: [f32; 4] = [0.35, 0.30, 0.28, 1.0];
    pub const GROUND: [f32; 4] = [0.30, 0.22, 0.12, 1.0];
    pub const GROUND_ALT: [f32; 4] = [0.34, 0.25, 0.14, 1.0];
    pub const PLAYER: [f32; 4] = [0.90, 0.25, 0.20, 1.0];
    pub const PLAYER_WING: [f32; 4] = [0.98, 0.80, 0.25, 1.0];
    pub const PARTICLE: [f32; 4] = [1.0, 0.6, 0.15, 1.0];
    pub const LOGO: [f32; 4] = [0.12, 0.10, 0.16, 1.0];
    pub const GAME_OVER: [f32; 4] = [0.55, 0.08, 0.08, 1.0];
}
