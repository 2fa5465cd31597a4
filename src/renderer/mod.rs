// src/renderer/mod.rs

pub mod glyphs;
pub mod instance;
pub mod keyboard_renderer;
pub mod layout;
pub mod pipeline;
pub mod view;

pub use keyboard_renderer::KeyboardRenderer;
pub use layout::{KeyboardLayout, Rect};
pub use pipeline::RenderPipeline;
pub use view::{window_title, KeyboardView};
