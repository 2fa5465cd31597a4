// src/renderer/instance.rs

use crate::renderer::layout::Rect;
use crate::renderer::view::Color;
use glam::Vec2;

/// Instance data for GPU rendering of one solid quad
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadInstance {
    /// Bottom-left corner in normalized screen coordinates (y up)
    pub position: [f32; 2],
    /// Size (width, height) in normalized screen coordinates
    pub size: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

impl QuadInstance {
    /// Convert a window-pixel rectangle (y down) into a normalized quad
    pub fn from_rect(rect: Rect, surface: Vec2, color: Color) -> Self {
        let surface = surface.max(Vec2::ONE);
        let x = rect.min.x / surface.x;
        let y = 1.0 - rect.max().y / surface.y;
        QuadInstance {
            position: [x, y],
            size: [rect.size.x / surface.x, rect.size.y / surface.y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Size
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rect_flips_y() {
        let surface = Vec2::new(200.0, 100.0);
        let quad = QuadInstance::from_rect(Rect::new(50.0, 10.0, 20.0, 30.0), surface, [1.0; 4]);
        assert_eq!(quad.position[0], 0.25);
        assert!((quad.position[1] - 0.6).abs() < 1e-6);
        assert_eq!(quad.size, [0.1, 0.3]);
    }

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 32);
    }
}
