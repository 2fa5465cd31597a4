// src/lib.rs

pub mod app;
pub mod audio;
pub mod config;
pub mod piano;
pub mod renderer;
pub mod ui;
