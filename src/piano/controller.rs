// src/piano/controller.rs

use crate::audio::{NotePlayer, PlayRequest, Playback};
use crate::piano::keymap::{normalize_key, KeyBinding, KeyMap};
use crate::piano::state::{ActiveKeySet, Volume};

/// Piano input after it has been decoded from window events
#[derive(Debug, Clone, PartialEq)]
pub enum PianoEvent {
    PhysicalPress(String),
    PhysicalRelease(String),
    PointerPress(char),
    PointerRelease(char),
    PointerLeave(char),
    SetVolume(f32),
}

/// Owns the held-key set and volume and turns input into play requests
pub struct PianoController<P: NotePlayer> {
    key_map: KeyMap,
    active: ActiveKeySet,
    volume: Volume,
    player: P,
}

impl<P: NotePlayer> PianoController<P> {
    pub fn new(key_map: KeyMap, player: P) -> Self {
        PianoController {
            key_map,
            active: ActiveKeySet::new(),
            volume: Volume::default(),
            player,
        }
    }

    /// Route a decoded event to the matching handler
    pub fn apply(&mut self, event: PianoEvent) {
        match event {
            PianoEvent::PhysicalPress(key) => self.on_physical_press(&key),
            PianoEvent::PhysicalRelease(key) => self.on_physical_release(&key),
            PianoEvent::PointerPress(key) => self.on_pointer_press(key),
            PianoEvent::PointerRelease(key) => self.on_pointer_release(key),
            PianoEvent::PointerLeave(key) => self.on_pointer_leave(key),
            PianoEvent::SetVolume(level) => self.set_volume(level),
        }
    }

    /// Keyboard key went down. Auto-repeat of a held key is ignored.
    pub fn on_physical_press(&mut self, key: &str) {
        let Some(binding) = self.binding_for(key) else {
            return;
        };
        if self.active.insert(binding) {
            log::debug!("Key '{}' pressed - playing {}", binding.label, binding.note);
            self.play_request(binding.note);
        }
    }

    pub fn on_physical_release(&mut self, key: &str) {
        let Some(binding) = self.binding_for(key) else {
            return;
        };
        if self.active.remove(binding) {
            log::debug!("Key '{}' released", binding.label);
        }
    }

    /// Pointer went down on a key. Always plays, even if the key is held.
    pub fn on_pointer_press(&mut self, key: char) {
        let Some(binding) = self.key_map.lookup(key) else {
            return;
        };
        self.active.insert(binding);
        log::debug!("Key '{}' clicked - playing {}", binding.label, binding.note);
        self.play_request(binding.note);
    }

    pub fn on_pointer_release(&mut self, key: char) {
        if let Some(binding) = self.key_map.lookup(key) {
            self.active.remove(binding);
        }
    }

    /// Pointer was dragged off a key while held; release it so it cannot stick
    pub fn on_pointer_leave(&mut self, key: char) {
        self.on_pointer_release(key);
    }

    /// Clamp into `[0, 1]`. `NaN` leaves the volume unchanged.
    pub fn set_volume(&mut self, level: f32) {
        match Volume::new(level) {
            Some(volume) => {
                self.volume = volume;
                log::debug!("Volume set to {:.1}", volume.get());
            }
            None => log::debug!("Ignoring volume level {}", level),
        }
    }

    /// Start playing `note` at the current volume without waiting for it
    pub fn play_request(&self, note: &str) -> Playback {
        self.player.play(PlayRequest::new(note, self.volume))
    }

    /// Forget every held key, e.g. when input is detached
    pub fn release_all(&mut self) {
        self.active.clear();
    }

    pub fn active_keys(&self) -> &ActiveKeySet {
        &self.active
    }

    pub fn is_active(&self, key: char) -> bool {
        self.active.contains(key)
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    fn binding_for(&self, key: &str) -> Option<&'static KeyBinding> {
        normalize_key(key).and_then(|k| self.key_map.lookup(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{FailingPlayer, RecordingPlayer};

    fn controller() -> (PianoController<RecordingPlayer>, RecordingPlayer) {
        let player = RecordingPlayer::new();
        (PianoController::new(KeyMap::standard(), player.clone()), player)
    }

    fn active(controller: &PianoController<RecordingPlayer>) -> Vec<char> {
        controller.active_keys().iter().collect()
    }

    #[test]
    fn test_press_plays_and_release_clears() {
        let (mut piano, player) = controller();

        piano.on_physical_press("a");
        assert_eq!(active(&piano), vec!['a']);
        assert_eq!(player.notes(), vec!["C"]);

        piano.on_physical_release("a");
        assert!(piano.active_keys().is_empty());
        assert_eq!(player.count(), 1);
    }

    #[test]
    fn test_press_release_round_trip_for_every_key() {
        let (mut piano, _player) = controller();
        piano.on_physical_press("j");
        let before = piano.active_keys().clone();

        for binding in KeyMap::standard().bindings().iter().filter(|b| b.input_key != 'j') {
            let key = binding.input_key.to_string();
            piano.on_physical_press(&key);
            piano.on_physical_release(&key);
            assert_eq!(piano.active_keys(), &before, "key {}", key);
        }
    }

    #[test]
    fn test_two_held_keys() {
        let (mut piano, player) = controller();

        piano.on_physical_press("w");
        piano.on_physical_press("a");
        assert_eq!(active(&piano), vec!['a', 'w']);
        assert_eq!(player.notes(), vec!["C#", "C"]);

        piano.on_physical_release("w");
        assert_eq!(active(&piano), vec!['a']);
    }

    #[test]
    fn test_press_is_case_insensitive() {
        let (mut piano, player) = controller();

        piano.on_physical_press("G");
        assert!(piano.is_active('g'));
        piano.on_physical_release("g");
        assert!(!piano.is_active('g'));
        assert_eq!(player.notes(), vec!["G"]);
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let (mut piano, player) = controller();
        piano.on_physical_press("a");

        piano.on_physical_press("z");
        piano.on_physical_press("Shift");
        piano.on_pointer_press('z');
        piano.on_physical_release("z");

        assert_eq!(active(&piano), vec!['a']);
        assert_eq!(player.count(), 1);
    }

    #[test]
    fn test_key_repeat_plays_once() {
        let (mut piano, player) = controller();

        piano.on_physical_press("d");
        piano.on_physical_press("d");
        piano.on_physical_press("D");
        assert_eq!(player.notes(), vec!["E"]);

        piano.on_physical_release("d");
        piano.on_physical_press("d");
        assert_eq!(player.count(), 2);
    }

    #[test]
    fn test_pointer_press_always_plays() {
        let (mut piano, player) = controller();

        piano.on_pointer_press('f');
        piano.on_pointer_press('f');
        piano.on_pointer_press('f');
        assert_eq!(player.notes(), vec!["F", "F", "F"]);
        assert_eq!(active(&piano), vec!['f']);
    }

    #[test]
    fn test_pointer_press_on_physically_held_key_still_plays() {
        let (mut piano, player) = controller();

        piano.on_physical_press("t");
        piano.on_pointer_press('t');
        assert_eq!(player.notes(), vec!["F#", "F#"]);
        assert_eq!(active(&piano), vec!['t']);
    }

    #[test]
    fn test_pointer_leave_matches_pointer_release() {
        let (mut released, _) = controller();
        released.on_pointer_press('y');
        released.on_pointer_release('y');

        let (mut left, _) = controller();
        left.on_pointer_press('y');
        left.on_pointer_leave('y');

        assert!(left.active_keys().is_empty());
        assert_eq!(left.active_keys(), released.active_keys());
    }

    #[test]
    fn test_release_of_absent_key_is_noop() {
        let (mut piano, _player) = controller();
        piano.on_physical_press("s");

        piano.on_physical_release("e");
        piano.on_pointer_release('e');
        piano.on_pointer_leave('k');
        assert_eq!(active(&piano), vec!['s']);
    }

    #[test]
    fn test_volume_reaches_next_request() {
        let (mut piano, player) = controller();

        piano.set_volume(0.2);
        piano.on_physical_press("h");

        let requests = player.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].note, "A");
        assert_eq!(requests[0].volume.get(), 0.2);
    }

    #[test]
    fn test_volume_change_does_not_touch_earlier_requests() {
        let (mut piano, player) = controller();

        piano.on_pointer_press('a');
        piano.set_volume(0.9);
        piano.on_pointer_press('a');

        let volumes: Vec<f32> = player.requests().iter().map(|r| r.volume.get()).collect();
        assert_eq!(volumes, vec![0.5, 0.9]);
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        let (mut piano, player) = controller();

        piano.set_volume(1.5);
        assert_eq!(piano.volume().get(), 1.0);
        piano.on_physical_press("a");

        piano.set_volume(-3.0);
        assert_eq!(piano.volume().get(), 0.0);
        piano.on_physical_press("s");

        let volumes: Vec<f32> = player.requests().iter().map(|r| r.volume.get()).collect();
        assert_eq!(volumes, vec![1.0, 0.0]);
    }

    #[test]
    fn test_nan_volume_is_rejected() {
        let (mut piano, _player) = controller();
        piano.set_volume(0.7);
        piano.set_volume(f32::NAN);
        assert_eq!(piano.volume().get(), 0.7);
    }

    #[test]
    fn test_apply_dispatches_events() {
        let (mut piano, player) = controller();

        piano.apply(PianoEvent::SetVolume(0.3));
        piano.apply(PianoEvent::PhysicalPress("E".to_string()));
        piano.apply(PianoEvent::PointerPress('k'));
        assert_eq!(active(&piano), vec!['e', 'k']);

        piano.apply(PianoEvent::PhysicalRelease("e".to_string()));
        piano.apply(PianoEvent::PointerLeave('k'));
        assert!(piano.active_keys().is_empty());

        assert_eq!(player.notes(), vec!["D#", "C2"]);
        assert!(player.requests().iter().all(|r| r.volume.get() == 0.3));
    }

    #[test]
    fn test_failed_playback_leaves_state_alone() {
        let mut piano = PianoController::new(KeyMap::standard(), FailingPlayer);
        piano.set_volume(0.4);

        piano.on_physical_press("u");
        assert!(piano.is_active('u'));
        assert_eq!(piano.volume().get(), 0.4);
        assert!(piano.play_request("B").is_failed());
    }

    #[test]
    fn test_release_all() {
        let (mut piano, _player) = controller();
        piano.on_physical_press("a");
        piano.on_pointer_press('w');
        piano.release_all();
        assert!(piano.active_keys().is_empty());
    }
}
