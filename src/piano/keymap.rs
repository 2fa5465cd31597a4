// src/piano/keymap.rs

/// Whether a key is a white (natural) or black (accidental) piano key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCategory {
    Natural,
    Accidental,
}

/// One physical keyboard key bound to a piano note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// Lower-case character the key produces
    pub input_key: char,
    /// Note name, also used to address the sample file
    pub note: &'static str,
    /// Label printed on the key
    pub label: char,
    pub category: KeyCategory,
}

impl KeyBinding {
    const fn new(input_key: char, note: &'static str, label: char, category: KeyCategory) -> Self {
        KeyBinding {
            input_key,
            note,
            label,
            category,
        }
    }

    pub fn is_natural(&self) -> bool {
        self.category == KeyCategory::Natural
    }
}

use KeyCategory::{Accidental, Natural};

/// One chromatic octave from C plus the C above it, in keyboard order
const STANDARD_BINDINGS: [KeyBinding; 13] = [
    KeyBinding::new('a', "C", 'A', Natural),
    KeyBinding::new('w', "C#", 'W', Accidental),
    KeyBinding::new('s', "D", 'S', Natural),
    KeyBinding::new('e', "D#", 'E', Accidental),
    KeyBinding::new('d', "E", 'D', Natural),
    KeyBinding::new('f', "F", 'F', Natural),
    KeyBinding::new('t', "F#", 'T', Accidental),
    KeyBinding::new('g', "G", 'G', Natural),
    KeyBinding::new('y', "G#", 'Y', Accidental),
    KeyBinding::new('h', "A", 'H', Natural),
    KeyBinding::new('u', "A#", 'U', Accidental),
    KeyBinding::new('j', "B", 'J', Natural),
    KeyBinding::new('k', "C2", 'K', Natural),
];

/// Immutable table of key bindings
#[derive(Debug, Clone, Copy)]
pub struct KeyMap {
    bindings: &'static [KeyBinding],
}

impl KeyMap {
    /// The built-in 13-key layout
    pub fn standard() -> Self {
        KeyMap {
            bindings: &STANDARD_BINDINGS,
        }
    }

    /// Find the binding for an already-normalized key
    pub fn lookup(&self, key: char) -> Option<&'static KeyBinding> {
        self.bindings.iter().find(|binding| binding.input_key == key)
    }

    /// All bindings in keyboard order
    pub fn bindings(&self) -> &'static [KeyBinding] {
        self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn natural_count(&self) -> usize {
        self.bindings.iter().filter(|b| b.is_natural()).count()
    }

    /// Labels of the keys of one category, for the on-screen instructions
    pub fn labels(&self, category: KeyCategory) -> Vec<char> {
        self.bindings
            .iter()
            .filter(|b| b.category == category)
            .map(|b| b.label)
            .collect()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::standard()
    }
}

/// Canonicalize the text of a logical key.
///
/// Returns `None` unless the text lower-cases to exactly one character, so
/// named keys like "Shift" or "Enter" never match a binding.
pub fn normalize_key(text: &str) -> Option<char> {
    let mut lowered = text.chars().flat_map(char::to_lowercase);
    let first = lowered.next()?;
    match lowered.next() {
        None => Some(first),
        Some(_) => None,
    }
}
