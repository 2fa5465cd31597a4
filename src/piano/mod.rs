// src/piano/mod.rs

pub mod controller;
pub mod keymap;
pub mod state;

pub use controller::{PianoController, PianoEvent};
pub use keymap::{normalize_key, KeyBinding, KeyCategory, KeyMap};
pub use state::{ActiveKeySet, Volume};
