// src/renderer/layout.rs

use crate::config::KeyboardConfig;
use crate::piano::{KeyCategory, KeyMap};
use crate::renderer::glyphs;
use crate::ui::slider::VolumeSlider;
use glam::Vec2;

pub const TITLE: &str = "Virtual Piano";
pub const VOLUME_LABEL: &str = "Volume";

/// Font pixel sizes in logical pixels
pub const TITLE_PIXEL: f32 = 4.0;
pub const LABEL_PIXEL: f32 = 2.0;
pub const HINT_PIXEL: f32 = 1.5;

const SLIDER_WIDTH: f32 = 128.0;
const SLIDER_HEIGHT: f32 = 8.0;
const SECTION_GAP: f32 = 32.0;
const PANEL_PADDING: f32 = 24.0;

/// Axis-aligned rectangle in window pixels, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.cmpge(self.min).all() && pos.cmplt(self.max()).all()
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        let shrink = Vec2::splat(amount);
        Rect {
            min: self.min + shrink,
            size: (self.size - shrink * 2.0).max(Vec2::ZERO),
        }
    }
}

/// Placement of one piano key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyRect {
    pub input_key: char,
    pub category: KeyCategory,
    pub rect: Rect,
}

/// Where everything sits in the window for a given size and scale
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    keys: Vec<KeyRect>,
    slider: VolumeSlider,
    panel: Rect,
    title_origin: Vec2,
    volume_label_origin: Vec2,
    hint_origin: Vec2,
    hint: String,
    scale: f32,
}

impl KeyboardLayout {
    /// Lay out the keyboard centred in a `window`-sized surface.
    ///
    /// `scale` converts logical to window pixels (DPI factor times UI scale).
    pub fn new(
        key_map: &KeyMap,
        keyboard: &KeyboardConfig,
        window: Vec2,
        scale: f32,
        volume_step: f32,
    ) -> Self {
        let s = scale.max(0.1);
        let natural = Vec2::new(keyboard.natural_width, keyboard.natural_height) * s;
        let accidental = Vec2::new(keyboard.accidental_width, keyboard.accidental_height) * s;

        let title_h = glyphs::text_height(TITLE_PIXEL * s);
        let label_h = glyphs::text_height(LABEL_PIXEL * s);
        let hint_h = glyphs::text_height(HINT_PIXEL * s);
        let gap = SECTION_GAP * s;
        let content_h = title_h + gap + label_h + gap + natural.y + gap + hint_h;
        let top = ((window.y - content_h) * 0.5).max(0.0);

        let title_origin = Vec2::new(
            (window.x - glyphs::text_width(TITLE, TITLE_PIXEL * s)) * 0.5,
            top,
        );

        // Volume row: label, gap, track
        let row_y = top + title_h + gap;
        let label_w = glyphs::text_width(VOLUME_LABEL, LABEL_PIXEL * s);
        let row_gap = 16.0 * s;
        let row_w = label_w + row_gap + SLIDER_WIDTH * s;
        let row_x = (window.x - row_w) * 0.5;
        let volume_label_origin = Vec2::new(row_x, row_y);
        let track = Rect::new(
            row_x + label_w + row_gap,
            row_y + (label_h - SLIDER_HEIGHT * s) * 0.5,
            SLIDER_WIDTH * s,
            SLIDER_HEIGHT * s,
        );
        let slider = VolumeSlider::new(track, volume_step, 6.0 * s);

        // Naturals left to right; each accidental straddles the boundary
        // between the natural before it and the one after
        let keys_y = row_y + label_h + gap;
        let keys_w = natural.x * key_map.natural_count() as f32;
        let keys_x = (window.x - keys_w) * 0.5;
        let mut naturals_placed = 0;
        let keys = key_map
            .bindings()
            .iter()
            .map(|binding| {
                let rect = match binding.category {
                    KeyCategory::Natural => {
                        let x = keys_x + naturals_placed as f32 * natural.x;
                        naturals_placed += 1;
                        Rect::new(x, keys_y, natural.x, natural.y)
                    }
                    KeyCategory::Accidental => {
                        let boundary = keys_x + naturals_placed as f32 * natural.x;
                        Rect::new(boundary - accidental.x * 0.5, keys_y, accidental.x, accidental.y)
                    }
                };
                KeyRect {
                    input_key: binding.input_key,
                    category: binding.category,
                    rect,
                }
            })
            .collect();

        let hint = hint_text(key_map);
        let hint_origin = Vec2::new(
            (window.x - glyphs::text_width(&hint, HINT_PIXEL * s)) * 0.5,
            keys_y + natural.y + gap,
        );

        let content_w = keys_w
            .max(row_w)
            .max(glyphs::text_width(TITLE, TITLE_PIXEL * s))
            .max(glyphs::text_width(&hint, HINT_PIXEL * s));
        let pad = PANEL_PADDING * s;
        let panel = Rect::new(
            (window.x - content_w) * 0.5 - pad,
            top - pad,
            content_w + pad * 2.0,
            content_h + pad * 2.0,
        );

        KeyboardLayout {
            keys,
            slider,
            panel,
            title_origin,
            volume_label_origin,
            hint_origin,
            hint,
            scale: s,
        }
    }

    /// Key under `pos`. Accidentals are drawn on top, so they win.
    pub fn key_at(&self, pos: Vec2) -> Option<char> {
        let hit = |category: KeyCategory| {
            self.keys
                .iter()
                .find(|key| key.category == category && key.rect.contains(pos))
                .map(|key| key.input_key)
        };
        hit(KeyCategory::Accidental).or_else(|| hit(KeyCategory::Natural))
    }

    pub fn key_rect(&self, key: char) -> Option<&KeyRect> {
        self.keys.iter().find(|k| k.input_key == key)
    }

    /// Key placements in key map order
    pub fn keys(&self) -> &[KeyRect] {
        &self.keys
    }

    pub fn slider(&self) -> &VolumeSlider {
        &self.slider
    }

    pub fn panel(&self) -> Rect {
        self.panel
    }

    pub fn title_origin(&self) -> Vec2 {
        self.title_origin
    }

    pub fn volume_label_origin(&self) -> Vec2 {
        self.volume_label_origin
    }

    pub fn hint(&self) -> (&str, Vec2) {
        (&self.hint, self.hint_origin)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// "White keys: A S D ...  Black keys: W E ..."
fn hint_text(key_map: &KeyMap) -> String {
    let spaced = |category| {
        key_map
            .labels(category)
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!(
        "White keys: {}   Black keys: {}",
        spaced(KeyCategory::Natural),
        spaced(KeyCategory::Accidental)
    )
}
