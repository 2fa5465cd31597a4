// src/piano/state.rs

use crate::piano::keymap::KeyBinding;
use std::collections::BTreeSet;

/// Input keys currently held down.
///
/// Keys can only enter the set through a [`KeyBinding`], so every member is
/// guaranteed to be mapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveKeySet {
    keys: BTreeSet<char>,
}

impl ActiveKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the binding's key as held. Returns false if it already was.
    pub fn insert(&mut self, binding: &KeyBinding) -> bool {
        self.keys.insert(binding.input_key)
    }

    /// Mark the binding's key as released. Returns false if it was not held.
    pub fn remove(&mut self, binding: &KeyBinding) -> bool {
        self.keys.remove(&binding.input_key)
    }

    pub fn contains(&self, key: char) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.keys.iter().copied()
    }
}

/// Playback volume, always within `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    pub const MIN: Volume = Volume(0.0);
    pub const MAX: Volume = Volume(1.0);

    /// Clamp `level` into range. `NaN` has no meaningful clamp and yields `None`.
    pub fn new(level: f32) -> Option<Self> {
        if level.is_nan() {
            return None;
        }
        Some(Volume(level.clamp(0.0, 1.0)))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Whole-number percentage for display
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piano::keymap::KeyMap;

    #[test]
    fn test_active_set_insert_remove() {
        let map = KeyMap::standard();
        let a = map.lookup('a').unwrap();
        let w = map.lookup('w').unwrap();

        let mut set = ActiveKeySet::new();
        assert!(set.insert(a));
        assert!(!set.insert(a));
        assert!(set.insert(w));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!['a', 'w']);

        assert!(set.remove(a));
        assert!(!set.remove(a));
        assert!(set.contains('w'));
        assert!(!set.contains('a'));

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_volume_clamps() {
        assert_eq!(Volume::new(0.3).unwrap().get(), 0.3);
        assert_eq!(Volume::new(1.7).unwrap(), Volume::MAX);
        assert_eq!(Volume::new(-0.2).unwrap(), Volume::MIN);
        assert!(Volume::new(f32::NAN).is_none());
    }

    #[test]
    fn test_volume_default_and_percent() {
        assert_eq!(Volume::default().get(), 0.5);
        assert_eq!(Volume::default().percent(), 50);
        assert_eq!(Volume::new(0.2).unwrap().percent(), 20);
    }
}
