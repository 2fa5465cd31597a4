// src/app.rs

use crate::audio::NotePlayer;
use crate::config::AppConfig;
use crate::piano::{KeyMap, PianoController};
use crate::renderer::layout::KeyboardLayout;
use crate::renderer::view::{window_title, KeyboardView};
use crate::ui::input::{InputAction, InputAdapter};
use glam::Vec2;
use winit::event::WindowEvent;

/// The piano as mounted in a window: controller, layout and input adapter.
///
/// Input is subscribed on [`PianoApp::mount`] and released on
/// [`PianoApp::unmount`] or drop, whichever comes first.
pub struct PianoApp<P: NotePlayer> {
    config: AppConfig,
    controller: PianoController<P>,
    input: InputAdapter,
    layout: KeyboardLayout,
    window_size: Vec2,
    dpi_scale: f32,
}

impl<P: NotePlayer> PianoApp<P> {
    pub fn mount(config: AppConfig, player: P, window_size: Vec2, dpi_scale: f32) -> Self {
        let key_map = KeyMap::standard();
        let mut controller = PianoController::new(key_map, player);
        controller.set_volume(config.audio.initial_volume);

        let layout = build_layout(&config, &key_map, window_size, dpi_scale);

        let mut input = InputAdapter::new();
        input.subscribe();

        log::info!(
            "Piano mounted: {} keys, volume {:.1}",
            key_map.len(),
            controller.volume().get()
        );

        PianoApp {
            config,
            controller,
            input,
            layout,
            window_size,
            dpi_scale,
        }
    }

    /// Detach input and drop any held keys
    pub fn unmount(&mut self) {
        if self.input.is_subscribed() {
            self.input.unsubscribe();
            self.controller.release_all();
            log::info!("Piano unmounted");
        }
    }

    pub fn handle_event(&mut self, event: &WindowEvent) -> InputAction {
        self.input.process_event(event, &self.layout)
    }

    /// Apply an action to the piano. Returns whether the view changed.
    pub fn apply(&mut self, action: &InputAction) -> bool {
        match action {
            InputAction::Piano(event) => {
                self.controller.apply(event.clone());
                true
            }
            InputAction::StepVolume(steps) => {
                let step = self.config.audio.volume_step;
                let target = self.controller.volume().get() + *steps as f32 * step;
                self.controller.set_volume(self.layout.slider().snap(target));
                true
            }
            InputAction::Resize(width, height) => {
                self.window_size = Vec2::new(*width as f32, *height as f32);
                self.relayout();
                true
            }
            InputAction::ScaleFactorChanged(factor) => {
                self.dpi_scale = *factor as f32;
                self.relayout();
                true
            }
            InputAction::Quit | InputAction::None => false,
        }
    }

    pub fn view(&self) -> KeyboardView {
        KeyboardView::build(
            self.controller.key_map(),
            self.controller.active_keys(),
            self.controller.volume(),
            &self.layout,
        )
    }

    pub fn title(&self) -> String {
        window_title(self.controller.volume())
    }

    /// Config to persist, carrying the volume the user ended with
    pub fn config_snapshot(&self) -> AppConfig {
        let mut config = self.config.clone();
        config.audio.initial_volume = self.controller.volume().get();
        config
    }

    pub fn controller(&self) -> &PianoController<P> {
        &self.controller
    }

    pub fn input(&self) -> &InputAdapter {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputAdapter {
        &mut self.input
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    fn relayout(&mut self) {
        self.layout = build_layout(
            &self.config,
            self.controller.key_map(),
            self.window_size,
            self.dpi_scale,
        );
    }
}

impl<P: NotePlayer> Drop for PianoApp<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn build_layout(config: &AppConfig, key_map: &KeyMap, window_size: Vec2, dpi_scale: f32) -> KeyboardLayout {
    KeyboardLayout::new(
        key_map,
        &config.keyboard,
        window_size,
        dpi_scale * config.display.ui_scale,
        config.audio.volume_step,
    )
}
