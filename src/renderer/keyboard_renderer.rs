// src/renderer/keyboard_renderer.rs

use crate::renderer::glyphs;
use crate::renderer::instance::QuadInstance;
use crate::renderer::pipeline::RenderPipeline;
use crate::renderer::view::{palette, KeyboardView, TextRun};
use glam::Vec2;
use wgpu::util::DeviceExt;

/// Draws a [`KeyboardView`] as one batch of instanced quads
pub struct KeyboardRenderer {
    /// Instance buffer for quad data
    instance_buffer: Option<wgpu::Buffer>,
    /// Number of quad instances in the buffer
    instance_count: u32,
}

impl KeyboardRenderer {
    pub fn new() -> Self {
        KeyboardRenderer {
            instance_buffer: None,
            instance_count: 0,
        }
    }

    /// Rebuild the instance buffer from the current view
    pub fn update(&mut self, pipeline: &RenderPipeline, view: &KeyboardView) {
        let surface = Vec2::new(pipeline.size.width as f32, pipeline.size.height as f32);
        let instances = build_instances(view, surface);

        self.instance_count = instances.len() as u32;

        if self.instance_count == 0 {
            return;
        }

        let buffer_size = (instances.len() * std::mem::size_of::<QuadInstance>()) as u64;

        let needs_new_buffer = match &self.instance_buffer {
            None => true,
            Some(buffer) => buffer.size() < buffer_size,
        };

        if needs_new_buffer {
            self.instance_buffer = Some(pipeline.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Keyboard Instance Buffer"),
                    contents: bytemuck::cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                },
            ));
        } else if let Some(buffer) = &self.instance_buffer {
            pipeline.queue.write_buffer(buffer, 0, bytemuck::cast_slice(&instances));
        }
    }

    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, pipeline: &'a RenderPipeline) {
        if self.instance_count == 0 {
            return;
        }

        if let Some(instance_buffer) = &self.instance_buffer {
            render_pass.set_pipeline(&pipeline.quad_pipeline);
            render_pass.set_bind_group(0, &pipeline.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, pipeline.quad_vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, instance_buffer.slice(..));
            render_pass.set_index_buffer(pipeline.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..pipeline.quad_index_count(), 0, 0..self.instance_count);
        }
    }
}

impl Default for KeyboardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten the view into quads, back to front
pub fn build_instances(view: &KeyboardView, surface: Vec2) -> Vec<QuadInstance> {
    let mut instances = Vec::new();
    let quad = |rect, color| QuadInstance::from_rect(rect, surface, color);

    instances.push(quad(view.panel, palette::PANEL));

    for key in view.draw_order() {
        match key.border {
            Some(border) => {
                instances.push(quad(key.rect, border));
                instances.push(quad(key.rect.inset(1.0), key.fill));
            }
            None => instances.push(quad(key.rect, key.fill)),
        }
        push_text(&mut instances, &key.note_label, surface);
        push_text(&mut instances, &key.key_label, surface);
    }

    instances.push(quad(view.slider.track, palette::SLIDER_TRACK));
    if view.slider.filled.size.x > 0.0 {
        instances.push(quad(view.slider.filled, palette::SLIDER_FILL));
    }
    instances.push(quad(view.slider.knob, palette::SLIDER_FILL));

    for run in &view.text {
        push_text(&mut instances, run, surface);
    }

    instances
}

fn push_text(instances: &mut Vec<QuadInstance>, run: &TextRun, surface: Vec2) {
    instances.extend(
        glyphs::rasterize(&run.text, run.origin, run.pixel)
            .into_iter()
            .map(|rect| QuadInstance::from_rect(rect, surface, run.color)),
    );
}
