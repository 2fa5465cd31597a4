// src/ui/slider.rs

use crate::renderer::layout::Rect;
use glam::Vec2;

/// Horizontal volume slider over `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSlider {
    /// Track rectangle in window pixels
    pub track: Rect,
    /// Values snap to multiples of this
    pub step: f32,
    /// Extra vertical reach for grabbing the thin track
    grab_margin: f32,
}

impl VolumeSlider {
    pub fn new(track: Rect, step: f32, grab_margin: f32) -> Self {
        VolumeSlider {
            track,
            step,
            grab_margin,
        }
    }

    /// Check if a point is close enough to the track to grab it
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.track.min.x
            && pos.x <= self.track.max().x
            && pos.y >= self.track.min.y - self.grab_margin
            && pos.y <= self.track.max().y + self.grab_margin
    }

    /// Slider value under horizontal position `x`, snapped to the step
    pub fn value_at(&self, x: f32) -> f32 {
        if self.track.size.x <= 0.0 {
            return 0.0;
        }
        let raw = ((x - self.track.min.x) / self.track.size.x).clamp(0.0, 1.0);
        self.snap(raw)
    }

    pub fn snap(&self, value: f32) -> f32 {
        if self.step <= 0.0 {
            return value.clamp(0.0, 1.0);
        }
        let steps = (value / self.step).round();
        // Round off float noise such as 0.30000001
        ((steps * self.step * 1000.0).round() / 1000.0).clamp(0.0, 1.0)
    }

    /// Horizontal position of the knob centre for `value`
    pub fn knob_x(&self, value: f32) -> f32 {
        self.track.min.x + self.track.size.x * value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> VolumeSlider {
        VolumeSlider::new(Rect::new(100.0, 50.0, 200.0, 8.0), 0.1, 6.0)
    }

    #[test]
    fn test_contains_includes_grab_margin() {
        let slider = slider();
        assert!(slider.contains(Vec2::new(150.0, 54.0)));
        assert!(slider.contains(Vec2::new(150.0, 45.0)));
        assert!(!slider.contains(Vec2::new(150.0, 40.0)));
        assert!(!slider.contains(Vec2::new(99.0, 54.0)));
    }

    #[test]
    fn test_value_snaps_to_step() {
        let slider = slider();
        assert_eq!(slider.value_at(100.0), 0.0);
        assert_eq!(slider.value_at(300.0), 1.0);
        assert_eq!(slider.value_at(141.0), 0.2);
        assert_eq!(slider.value_at(159.0), 0.3);
        assert_eq!(slider.value_at(20.0), 0.0);
        assert_eq!(slider.value_at(500.0), 1.0);
    }

    #[test]
    fn test_knob_position() {
        let slider = slider();
        assert_eq!(slider.knob_x(0.5), 200.0);
        assert_eq!(slider.knob_x(2.0), 300.0);
    }
}
