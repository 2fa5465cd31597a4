// src/renderer/view.rs

use crate::piano::{ActiveKeySet, KeyCategory, KeyMap, Volume};
use crate::renderer::glyphs;
use crate::renderer::layout::{
    KeyboardLayout, Rect, HINT_PIXEL, LABEL_PIXEL, TITLE, TITLE_PIXEL, VOLUME_LABEL,
};
use glam::Vec2;

pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const PANEL: Color = [1.0, 1.0, 1.0, 1.0];
    pub const NATURAL: Color = [1.0, 1.0, 1.0, 1.0];
    pub const NATURAL_ACTIVE: Color = [0.996, 0.976, 0.765, 1.0];
    pub const NATURAL_BORDER: Color = [0.820, 0.835, 0.859, 1.0];
    pub const NATURAL_TEXT: Color = [0.294, 0.333, 0.388, 1.0];
    pub const ACCIDENTAL: Color = [0.122, 0.161, 0.216, 1.0];
    pub const ACCIDENTAL_ACTIVE: Color = [0.216, 0.255, 0.318, 1.0];
    pub const ACCIDENTAL_TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const TITLE: Color = [0.122, 0.161, 0.216, 1.0];
    pub const BODY_TEXT: Color = [0.216, 0.255, 0.318, 1.0];
    pub const HINT_TEXT: Color = [0.294, 0.333, 0.388, 1.0];
    pub const SLIDER_TRACK: Color = [0.898, 0.906, 0.922, 1.0];
    pub const SLIDER_FILL: Color = [0.231, 0.510, 0.965, 1.0];
}

/// Key-label opacity relative to the note label
const KEY_LABEL_ALPHA: f32 = 0.6;

/// A run of bitmap text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub origin: Vec2,
    pub pixel: f32,
    pub color: Color,
}

/// One drawn piano key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRegion {
    pub input_key: char,
    pub category: KeyCategory,
    pub active: bool,
    pub rect: Rect,
    pub fill: Color,
    pub border: Option<Color>,
    pub note_label: TextRun,
    pub key_label: TextRun,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderView {
    pub value: f32,
    pub track: Rect,
    pub filled: Rect,
    pub knob: Rect,
}

/// Everything on screen for one state of the piano
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardView {
    pub panel: Rect,
    /// Key map order
    pub keys: Vec<KeyRegion>,
    pub slider: SliderView,
    pub text: Vec<TextRun>,
}

impl KeyboardView {
    /// Pure projection of piano state onto the layout
    pub fn build(
        key_map: &KeyMap,
        active: &ActiveKeySet,
        volume: Volume,
        layout: &KeyboardLayout,
    ) -> Self {
        let s = layout.scale();

        let keys = key_map
            .bindings()
            .iter()
            .filter_map(|binding| {
                let placed = layout.key_rect(binding.input_key)?;
                let is_active = active.contains(binding.input_key);
                let natural = binding.is_natural();

                let fill = match (natural, is_active) {
                    (true, false) => palette::NATURAL,
                    (true, true) => palette::NATURAL_ACTIVE,
                    (false, false) => palette::ACCIDENTAL,
                    (false, true) => palette::ACCIDENTAL_ACTIVE,
                };
                let text_color = if natural {
                    palette::NATURAL_TEXT
                } else {
                    palette::ACCIDENTAL_TEXT
                };

                // Two stacked labels centred 16px above the bottom edge
                let rect = placed.rect;
                let pixel = LABEL_PIXEL * s;
                let line_h = glyphs::text_height(pixel);
                let key_label_y = rect.max().y - 16.0 * s - line_h;
                let note_label_y = key_label_y - 4.0 * s - line_h;
                let centred = |text: &str, y: f32| {
                    Vec2::new(rect.center().x - glyphs::text_width(text, pixel) * 0.5, y)
                };

                let label = binding.label.to_string();
                let mut key_color = text_color;
                key_color[3] *= KEY_LABEL_ALPHA;

                Some(KeyRegion {
                    input_key: binding.input_key,
                    category: binding.category,
                    active: is_active,
                    rect,
                    fill,
                    border: natural.then_some(palette::NATURAL_BORDER),
                    note_label: TextRun {
                        text: binding.note.to_string(),
                        origin: centred(binding.note, note_label_y),
                        pixel,
                        color: text_color,
                    },
                    key_label: TextRun {
                        origin: centred(&label, key_label_y),
                        text: label,
                        pixel,
                        color: key_color,
                    },
                })
            })
            .collect();

        let slider = layout.slider();
        let value = volume.get();
        let track = slider.track;
        let knob_size = track.size.y * 2.0;
        let knob_x = slider.knob_x(value);
        let slider = SliderView {
            value,
            track,
            filled: Rect::new(track.min.x, track.min.y, knob_x - track.min.x, track.size.y),
            knob: Rect::new(
                knob_x - knob_size * 0.5,
                track.center().y - knob_size * 0.5,
                knob_size,
                knob_size,
            ),
        };

        let (hint, hint_origin) = layout.hint();
        let text = vec![
            TextRun {
                text: TITLE.to_string(),
                origin: layout.title_origin(),
                pixel: TITLE_PIXEL * s,
                color: palette::TITLE,
            },
            TextRun {
                text: VOLUME_LABEL.to_string(),
                origin: layout.volume_label_origin(),
                pixel: LABEL_PIXEL * s,
                color: palette::BODY_TEXT,
            },
            TextRun {
                text: hint.to_string(),
                origin: hint_origin,
                pixel: HINT_PIXEL * s,
                color: palette::HINT_TEXT,
            },
        ];

        KeyboardView {
            panel: layout.panel(),
            keys,
            slider,
            text,
        }
    }

    /// Naturals first so accidentals paint over them
    pub fn draw_order(&self) -> impl Iterator<Item = &KeyRegion> {
        let naturals = self.keys.iter().filter(|k| k.category == KeyCategory::Natural);
        let accidentals = self.keys.iter().filter(|k| k.category == KeyCategory::Accidental);
        naturals.chain(accidentals)
    }

    pub fn region(&self, key: char) -> Option<&KeyRegion> {
        self.keys.iter().find(|k| k.input_key == key)
    }
}

/// Window title text, showing the current volume
pub fn window_title(volume: Volume) -> String {
    format!("Virtual Piano | Volume {}%", volume.percent())
}
