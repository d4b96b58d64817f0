use glam::Vec2;
use parallax_engine::coords::Viewport;
use parallax_engine::input::{Key, MouseWheelDelta};

use crate::config::SceneConfig;

/// Everything that can change demo state from outside the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Scroll by a signed pixel amount (positive moves down the page).
    ScrollBy(f32),
    /// Scroll to an absolute offset in pixels.
    ScrollTo(f32),
    /// Pointer position in logical window pixels.
    PointerMoved { x: f32, y: f32 },
    Resized(Viewport),
    CycleColor,
    SetColor(String),
    ToggleWireframe,
}

/// Scroll offset over a virtual page plus the normalized cursor.
///
/// The page is one viewport tall per section, so the offset is clamped to
/// `[0, (sections - 1) * viewport_height]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTracker {
    scroll: f32,
    cursor: Vec2,
    viewport: Viewport,
    section_count: usize,
}

impl InputTracker {
    pub fn new(viewport: Viewport, section_count: usize) -> Self {
        Self {
            scroll: 0.0,
            cursor: Vec2::ZERO,
            viewport,
            section_count,
        }
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Cursor in `[-0.5, 0.5]` on both axes, `+y` down.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn max_scroll(&self) -> f32 {
        if !self.viewport.is_valid() {
            return 0.0;
        }
        self.section_count.saturating_sub(1) as f32 * self.viewport.height
    }

    /// Sets the offset (clamped). Returns whether it changed.
    pub fn scroll_to(&mut self, offset: f32) -> bool {
        let offset = if offset.is_finite() { offset } else { self.scroll };
        let next = offset.clamp(0.0, self.max_scroll());
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }

    pub fn scroll_by(&mut self, delta: f32) -> bool {
        self.scroll_to(self.scroll + delta)
    }

    /// Overwrites the cursor from a pointer position.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if !self.viewport.is_valid() {
            return;
        }
        self.cursor = Vec2::new(
            x / self.viewport.width - 0.5,
            y / self.viewport.height - 0.5,
        );
    }

    /// Applies a new viewport and re-clamps the offset. Returns whether the
    /// offset moved.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.viewport = viewport;
        self.scroll_to(self.scroll)
    }
}

/// Message for a wheel notch or trackpad swipe.
///
/// Wheel "down" reports a negative `y`; it moves down the page.
pub fn wheel_message(delta: MouseWheelDelta, config: &SceneConfig) -> Message {
    let px = match delta {
        MouseWheelDelta::Line { y, .. } => -y * config.wheel_line_px,
        MouseWheelDelta::Pixel { y, .. } => -y,
    };
    Message::ScrollBy(px)
}

/// Message for a key press, if the key is bound.
pub fn key_message(key: Key, tracker: &InputTracker, config: &SceneConfig) -> Option<Message> {
    let page = tracker.viewport().height;
    let msg = match key {
        Key::PageDown | Key::Space => Message::ScrollBy(page),
        Key::PageUp => Message::ScrollBy(-page),
        Key::ArrowDown => Message::ScrollBy(config.arrow_step_px),
        Key::ArrowUp => Message::ScrollBy(-config.arrow_step_px),
        Key::Home => Message::ScrollTo(0.0),
        Key::End => Message::ScrollTo(tracker.max_scroll()),
        Key::Letter('C') => Message::CycleColor,
        Key::Letter('W') => Message::ToggleWireframe,
        _ => return None,
    };
    Some(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> InputTracker {
        InputTracker::new(Viewport::new(1000.0, 800.0), 4)
    }

    #[test]
    fn scroll_is_clamped_to_page() {
        let mut t = tracker();
        assert!(!t.scroll_by(-50.0));
        assert_eq!(t.scroll(), 0.0);

        assert!(t.scroll_to(5000.0));
        assert_eq!(t.scroll(), 2400.0);
    }

    #[test]
    fn cursor_is_normalized_around_center() {
        let mut t = tracker();
        t.set_pointer(500.0, 400.0);
        assert_eq!(t.cursor(), Vec2::ZERO);
        t.set_pointer(0.0, 800.0);
        assert_eq!(t.cursor(), Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn shrinking_viewport_reclamps_scroll() {
        let mut t = tracker();
        t.scroll_to(2400.0);
        assert!(t.resize(Viewport::new(1000.0, 500.0)));
        assert_eq!(t.scroll(), 1500.0);
        assert!(!t.resize(Viewport::new(1000.0, 600.0)));
    }

    #[test]
    fn zero_height_viewport_pins_scroll_to_top() {
        let mut t = tracker();
        t.scroll_to(900.0);
        t.resize(Viewport::new(0.0, 0.0));
        assert_eq!(t.scroll(), 0.0);
        t.set_pointer(10.0, 10.0);
        assert_eq!(t.cursor(), Vec2::ZERO);
    }

    #[test]
    fn wheel_down_scrolls_down() {
        let config = SceneConfig::default();
        assert_eq!(
            wheel_message(MouseWheelDelta::Line { x: 0.0, y: -1.0 }, &config),
            Message::ScrollBy(100.0)
        );
        assert_eq!(
            wheel_message(MouseWheelDelta::Pixel { x: 0.0, y: 30.0 }, &config),
            Message::ScrollBy(-30.0)
        );
    }

    #[test]
    fn keys_map_to_page_moves() {
        let config = SceneConfig::default();
        let t = tracker();
        assert_eq!(key_message(Key::PageDown, &t, &config), Some(Message::ScrollBy(800.0)));
        assert_eq!(key_message(Key::End, &t, &config), Some(Message::ScrollTo(2400.0)));
        assert_eq!(key_message(Key::Letter('C'), &t, &config), Some(Message::CycleColor));
        assert_eq!(key_message(Key::Escape, &t, &config), None);
    }
}
