/// Keyboard key identifier.
///
/// Only the keys the demo binds get a named variant: page navigation and
/// `Escape`. Letters come from the layout-aware logical key, so `Letter('W')`
/// is whatever key is labelled W. Anything else becomes `Key::Unknown`
/// carrying the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,

    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,

    /// Letter key, always stored uppercase (`'A'..='Z'`).
    Letter(char),

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input (notched wheels); `Pixel`
/// is high precision (trackpads). Sign follows the platform: positive `y`
/// means the user pushed the content down, i.e. scrolled *up*.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

/// Pointer move event in logical pixels, relative to the window's top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Key repeats arrive as further `Pressed` events.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, state: KeyState },

    PointerMoved(PointerMoveEvent),

    MouseWheel { delta: MouseWheelDelta },
}
