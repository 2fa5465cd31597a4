// src/main.rs

use virtual_piano::app::PianoApp;
use virtual_piano::audio::SamplePlayer;
use virtual_piano::config::AppConfig;
use virtual_piano::renderer::{KeyboardRenderer, KeyboardView, RenderPipeline};
use virtual_piano::ui::InputAction;

use glam::Vec2;
use std::sync::Arc;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

const CONFIG_FILE: &str = "config.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Virtual Piano");

    // Optional config path as the first argument
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());

    println!("\n=== Virtual Piano Controls ===");
    println!("A S D F G H J K - White keys");
    println!("W E T Y U       - Black keys");
    println!("Mouse           - Click keys, drag the volume slider");
    println!("Up/Down         - Volume");
    println!("ESC             - Quit");
    println!("==============================\n");

    let config = AppConfig::load_or_create(&config_path);

    let player = SamplePlayer::new(&config.audio)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Virtual Piano")
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.display.width,
                config.display.height,
            ))
            .build(&event_loop)?,
    );

    let mut pipeline = pollster::block_on(RenderPipeline::new(window.clone()))?;
    let mut keyboard_renderer = KeyboardRenderer::new();

    let size = window.inner_size();
    let background = config.display.background_color;
    let mut app = PianoApp::mount(
        config,
        player,
        Vec2::new(size.width as f32, size.height as f32),
        window.scale_factor() as f32,
    );
    window.set_title(&app.title());
    window.request_redraw();

    log::info!("Application initialized, entering event loop");

    event_loop.run(move |event, elwt| {
        let Event::WindowEvent { event, .. } = event else {
            return;
        };

        if let WindowEvent::RedrawRequested = event {
            match render_frame(&pipeline, &mut keyboard_renderer, &app.view(), background) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    pipeline.resize(pipeline.size);
                    window.request_redraw();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory");
                    elwt.exit();
                }
                Err(e) => log::error!("Render error: {:?}", e),
            }
            return;
        }

        let action = app.handle_event(&event);

        match action {
            InputAction::Quit => {
                app.unmount();
                if let Err(e) = app.config_snapshot().save_to_file(&config_path) {
                    log::warn!("Failed to save config: {}", e);
                }
                elwt.exit();
            }
            InputAction::Resize(width, height) => {
                pipeline.resize(winit::dpi::PhysicalSize::new(width, height));
                app.apply(&action);
                window.request_redraw();
            }
            _ => {
                if app.apply(&action) {
                    window.set_title(&app.title());
                    window.request_redraw();
                }
            }
        }
    })?;

    log::info!("Virtual Piano shut down cleanly");
    Ok(())
}

/// Render one frame of the keyboard
fn render_frame(
    pipeline: &RenderPipeline,
    keyboard_renderer: &mut KeyboardRenderer,
    view: &KeyboardView,
    background: [f32; 4],
) -> Result<(), wgpu::SurfaceError> {
    keyboard_renderer.update(pipeline, view);

    let (output, mut encoder) = pipeline.begin_render()?;
    let target = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: background[0] as f64,
                        g: background[1] as f64,
                        b: background[2] as f64,
                        a: background[3] as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        keyboard_renderer.render(&mut render_pass, pipeline);
    }

    pipeline.queue.submit(std::iter::once(encoder.finish()));
    output.present();

    Ok(())
}
