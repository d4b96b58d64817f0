use crate::input::InputEvent;

use super::ctx::FrameCtx;

/// What the runtime should do after an app callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application hooks driven by [`Runtime`](crate::window::Runtime).
///
/// Input arrives through [`on_input`](App::on_input) as it is received,
/// between frames.
pub trait App {
    /// One translated input event, before the next frame is drawn.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Advances and draws one frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
