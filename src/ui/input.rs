// src/ui/input.rs

use crate::piano::PianoEvent;
use crate::renderer::layout::KeyboardLayout;
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Actions that can be triggered by input
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// No action
    None,
    /// Forward to the piano controller
    Piano(PianoEvent),
    /// Move the volume by this many slider steps
    StepVolume(i32),
    /// Window resize
    Resize(u32, u32),
    /// DPI change
    ScaleFactorChanged(f64),
    /// Quit application
    Quit,
}

/// Turns window events into piano input.
///
/// The adapter only produces piano actions while subscribed. The owning
/// application subscribes when it mounts and unsubscribes when it unmounts;
/// window lifecycle events (resize, close) are always passed through.
pub struct InputAdapter {
    subscribed: bool,
    /// Last known cursor position in window pixels
    cursor: Option<Vec2>,
    /// Key the primary button went down on, while the pointer stays on it
    held_key: Option<char>,
    dragging_slider: bool,
}

impl InputAdapter {
    pub fn new() -> Self {
        InputAdapter {
            subscribed: false,
            cursor: None,
            held_key: None,
            dragging_slider: false,
        }
    }

    pub fn subscribe(&mut self) {
        if !self.subscribed {
            self.subscribed = true;
            log::info!("Piano input subscribed");
        }
    }

    /// Stop producing piano actions and forget any pointer interaction
    pub fn unsubscribe(&mut self) {
        if self.subscribed {
            self.subscribed = false;
            self.held_key = None;
            self.dragging_slider = false;
            log::info!("Piano input unsubscribed");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Process a window event and return the resulting action
    pub fn process_event(&mut self, event: &WindowEvent, layout: &KeyboardLayout) -> InputAction {
        match event {
            WindowEvent::CloseRequested => InputAction::Quit,

            WindowEvent::Resized(size) => InputAction::Resize(size.width, size.height),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                InputAction::ScaleFactorChanged(*scale_factor)
            }

            _ if !self.subscribed => InputAction::None,

            WindowEvent::KeyboardInput { event, .. } => self.process_key_event(event),

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(Vec2::new(position.x as f32, position.y as f32), layout)
            }

            WindowEvent::CursorLeft { .. } => self.pointer_left(),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.pointer_button(*state == ElementState::Pressed, layout),

            _ => InputAction::None,
        }
    }

    fn process_key_event(&mut self, event: &KeyEvent) -> InputAction {
        let pressed = event.state == ElementState::Pressed;

        match &event.logical_key {
            Key::Character(text) => self.key(text.as_str(), pressed),
            Key::Named(NamedKey::ArrowUp) if pressed => InputAction::StepVolume(1),
            Key::Named(NamedKey::ArrowDown) if pressed => InputAction::StepVolume(-1),
            Key::Named(NamedKey::Escape) if pressed => InputAction::Quit,
            _ => InputAction::None,
        }
    }

    /// A character key changed state. Mapping is left to the controller.
    pub fn key(&mut self, text: &str, pressed: bool) -> InputAction {
        if !self.subscribed {
            return InputAction::None;
        }
        let text = text.to_string();
        if pressed {
            InputAction::Piano(PianoEvent::PhysicalPress(text))
        } else {
            InputAction::Piano(PianoEvent::PhysicalRelease(text))
        }
    }

    pub fn pointer_moved(&mut self, pos: Vec2, layout: &KeyboardLayout) -> InputAction {
        self.cursor = Some(pos);
        if !self.subscribed {
            return InputAction::None;
        }

        if self.dragging_slider {
            return InputAction::Piano(PianoEvent::SetVolume(layout.slider().value_at(pos.x)));
        }

        match self.held_key {
            Some(held) if layout.key_at(pos) != Some(held) => {
                self.held_key = None;
                InputAction::Piano(PianoEvent::PointerLeave(held))
            }
            _ => InputAction::None,
        }
    }

    /// Cursor left the window
    pub fn pointer_left(&mut self) -> InputAction {
        self.cursor = None;
        match self.held_key.take() {
            Some(held) if self.subscribed => InputAction::Piano(PianoEvent::PointerLeave(held)),
            _ => InputAction::None,
        }
    }

    /// Primary button changed state at the last known cursor position.
    ///
    /// A release only reaches the key the press went down on, and only while
    /// the pointer is still on it; releases after a slider drag, a press on
    /// empty space or a leave are dropped.
    pub fn pointer_button(&mut self, pressed: bool, layout: &KeyboardLayout) -> InputAction {
        if !self.subscribed {
            return InputAction::None;
        }

        if !pressed {
            self.dragging_slider = false;
            return match self.held_key.take() {
                Some(held) => InputAction::Piano(PianoEvent::PointerRelease(held)),
                None => InputAction::None,
            };
        }

        let Some(pos) = self.cursor else {
            return InputAction::None;
        };

        if layout.slider().contains(pos) {
            self.dragging_slider = true;
            return InputAction::Piano(PianoEvent::SetVolume(layout.slider().value_at(pos.x)));
        }
        match layout.key_at(pos) {
            Some(key) => {
                self.held_key = Some(key);
                InputAction::Piano(PianoEvent::PointerPress(key))
            }
            None => InputAction::None,
        }
    }

    pub fn held_key(&self) -> Option<char> {
        self.held_key
    }

    pub fn is_dragging_slider(&self) -> bool {
        self.dragging_slider
    }
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyboardConfig;
    use crate::piano::KeyMap;
    use winit::dpi::PhysicalSize;

    fn layout() -> KeyboardLayout {
        KeyboardLayout::new(
            &KeyMap::standard(),
            &KeyboardConfig::default(),
            Vec2::new(960.0, 600.0),
            1.0,
            0.1,
        )
    }

    fn subscribed() -> InputAdapter {
        let mut input = InputAdapter::new();
        input.subscribe();
        input
    }

    fn center_of(layout: &KeyboardLayout, key: char) -> Vec2 {
        let rect = layout.key_rect(key).unwrap().rect;
        // Bottom part of the key so naturals are not covered by accidentals
        Vec2::new(rect.center().x, rect.max().y - 8.0)
    }

    #[test]
    fn test_keys_become_physical_events() {
        let mut input = subscribed();
        assert_eq!(
            input.key("A", true),
            InputAction::Piano(PianoEvent::PhysicalPress("A".to_string()))
        );
        assert_eq!(
            input.key("a", false),
            InputAction::Piano(PianoEvent::PhysicalRelease("a".to_string()))
        );
    }

    #[test]
    fn test_click_press_and_release_on_key() {
        let layout = layout();
        let mut input = subscribed();

        input.pointer_moved(center_of(&layout, 'g'), &layout);
        assert_eq!(
            input.pointer_button(true, &layout),
            InputAction::Piano(PianoEvent::PointerPress('g'))
        );
        assert_eq!(input.held_key(), Some('g'));

        assert_eq!(
            input.pointer_button(false, &layout),
            InputAction::Piano(PianoEvent::PointerRelease('g'))
        );
        assert_eq!(input.held_key(), None);
    }

    #[test]
    fn test_dragging_off_a_key_leaves_it() {
        let layout = layout();
        let mut input = subscribed();

        input.pointer_moved(center_of(&layout, 'a'), &layout);
        input.pointer_button(true, &layout);

        // Moving within the key does nothing
        let inside = center_of(&layout, 'a') + Vec2::new(3.0, 0.0);
        assert_eq!(input.pointer_moved(inside, &layout), InputAction::None);

        assert_eq!(
            input.pointer_moved(center_of(&layout, 's'), &layout),
            InputAction::Piano(PianoEvent::PointerLeave('a'))
        );
        // Sliding onto another key neither presses nor releases it
        assert_eq!(input.held_key(), None);
        assert_eq!(input.pointer_button(false, &layout), InputAction::None);
    }

    #[test]
    fn test_release_after_slider_drag_leaves_keys_alone() {
        let layout = layout();
        let mut input = subscribed();

        input.pointer_moved(layout.slider().track.center(), &layout);
        input.pointer_button(true, &layout);
        input.pointer_moved(center_of(&layout, 'a'), &layout);
        assert_eq!(input.pointer_button(false, &layout), InputAction::None);
    }

    #[test]
    fn test_release_after_press_on_empty_space_does_nothing() {
        let layout = layout();
        let mut input = subscribed();

        input.pointer_moved(Vec2::new(5.0, 5.0), &layout);
        assert_eq!(input.pointer_button(true, &layout), InputAction::None);
        input.pointer_moved(center_of(&layout, 'd'), &layout);
        assert_eq!(input.pointer_button(false, &layout), InputAction::None);
    }

    #[test]
    fn test_hover_without_press_does_nothing() {
        let layout = layout();
        let mut input = subscribed();

        input.pointer_moved(center_of(&layout, 'a'), &layout);
        assert_eq!(
            input.pointer_moved(center_of(&layout, 's'), &layout),
            InputAction::None
        );
    }

    #[test]
    fn test_leaving_window_releases_held_key() {
        let layout = layout();
        let mut input = subscribed();

        input.pointer_moved(center_of(&layout, 'h'), &layout);
        input.pointer_button(true, &layout);
        assert_eq!(
            input.pointer_left(),
            InputAction::Piano(PianoEvent::PointerLeave('h'))
        );
        assert_eq!(input.pointer_left(), InputAction::None);
    }

    #[test]
    fn test_slider_drag_sets_volume() {
        let layout = layout();
        let mut input = subscribed();
        let track = layout.slider().track;

        input.pointer_moved(track.center(), &layout);
        assert_eq!(
            input.pointer_button(true, &layout),
            InputAction::Piano(PianoEvent::SetVolume(0.5))
        );
        assert!(input.is_dragging_slider());

        // Dragging far past the end clamps
        let beyond = Vec2::new(track.max().x + 100.0, track.center().y + 40.0);
        assert_eq!(
            input.pointer_moved(beyond, &layout),
            InputAction::Piano(PianoEvent::SetVolume(1.0))
        );

        assert_eq!(input.pointer_button(false, &layout), InputAction::None);
        assert!(!input.is_dragging_slider());
    }

    #[test]
    fn test_unsubscribed_ignores_piano_input() {
        let layout = layout();
        let mut input = InputAdapter::new();
        assert!(!input.is_subscribed());

        assert_eq!(input.key("a", true), InputAction::None);
        input.pointer_moved(center_of(&layout, 'a'), &layout);
        assert_eq!(input.pointer_button(true, &layout), InputAction::None);

        // Lifecycle events still get through
        assert_eq!(
            input.process_event(&WindowEvent::CloseRequested, &layout),
            InputAction::Quit
        );
        assert_eq!(
            input.process_event(&WindowEvent::Resized(PhysicalSize::new(800, 500)), &layout),
            InputAction::Resize(800, 500)
        );
    }

    #[test]
    fn test_unsubscribe_drops_pointer_state() {
        let layout = layout();
        let mut input = subscribed();

        input.pointer_moved(center_of(&layout, 'j'), &layout);
        input.pointer_button(true, &layout);
        input.unsubscribe();
        assert_eq!(input.held_key(), None);

        input.subscribe();
        assert_eq!(input.pointer_left(), InputAction::None);
    }
}
