// src/ui/mod.rs

pub mod input;
pub mod slider;

pub use input::{InputAction, InputAdapter};
pub use slider::VolumeSlider;
