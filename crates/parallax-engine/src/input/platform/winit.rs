use ::winit::dpi::PhysicalPosition;
use ::winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use ::winit::keyboard::{Key as LogicalKey, KeyCode, PhysicalKey};
use ::winit::window::Window;

use crate::input::{InputEvent, Key, KeyState, MouseWheelDelta, PointerMoveEvent};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(window, *p);
                    MouseWheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::MouseWheel { delta })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key { key: map_key(event.physical_key, &event.logical_key), state })
        }

        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

/// Letters follow the keyboard layout; navigation keys follow position.
fn map_key(physical: PhysicalKey, logical: &LogicalKey) -> Key {
    if let Some(c) = letter(logical) {
        return Key::Letter(c);
    }

    let PhysicalKey::Code(code) = physical else {
        // NativeKeyCode has no stable numeric form in winit 0.30.
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,

        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,

        other => Key::Unknown(other as u32),
    }
}

/// A single ASCII letter typed by `logical`, uppercased.
fn letter(logical: &LogicalKey) -> Option<char> {
    let LogicalKey::Character(text) = logical else {
        return None;
    };
    let mut chars = text.chars();
    let c = chars.next()?;
    (chars.next().is_none() && c.is_ascii_alphabetic()).then(|| c.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::winit::keyboard::{NamedKey, SmolStr};

    fn typed(text: &str) -> LogicalKey {
        LogicalKey::Character(SmolStr::new(text))
    }

    #[test]
    fn maps_navigation_keys() {
        let named = LogicalKey::Named(NamedKey::PageDown);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::PageDown), &named), Key::PageDown);
        let named = LogicalKey::Named(NamedKey::Home);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Home), &named), Key::Home);
    }

    #[test]
    fn maps_letters_uppercase() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyC), &typed("c")), Key::Letter('C'));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW), &typed("W")), Key::Letter('W'));
    }

    #[test]
    fn letters_follow_layout_not_position() {
        // AZERTY: the key in the QWERTY `Z` position types `w`.
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyZ), &typed("w")), Key::Letter('W'));
        // ...and the QWERTY `W` position types `z`.
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW), &typed("z")), Key::Letter('Z'));
    }

    #[test]
    fn space_is_named_not_a_letter() {
        let space = LogicalKey::Named(NamedKey::Space);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Space), &space), Key::Space);
        assert_eq!(letter(&typed(" ")), None);
    }

    #[test]
    fn unmapped_key_is_unknown() {
        let named = LogicalKey::Named(NamedKey::F5);
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::F5), &named), Key::Unknown(_)));
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::Digit1), &typed("1")), Key::Unknown(_)));
    }
}
