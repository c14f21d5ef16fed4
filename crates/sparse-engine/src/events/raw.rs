use winit::keyboard::KeyCode;

use crate::input::MouseButton;

/// Platform-neutral event as drained from the platform queue.
///
/// Positions and sizes are in window pixels (top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RawEvent {
    CloseRequested,
    Destroyed,
    /// The platform loop ended independently of the window.
    PlatformExit,
    Key(RawKey),
    ModifiersChanged { alt: bool },
    MouseButton { button: MouseButton, is_down: bool },
    CursorMoved { x: f64, y: f64 },
    CursorLeft,
    Wheel(WheelDelta),
    Resized { width: u32, height: u32 },
    FocusLost,
}

/// A physical key edge together with its previous state.
///
/// `was_down == is_down` marks an auto-repeat.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RawKey {
    pub code: KeyCode,
    pub was_down: bool,
    pub is_down: bool,
}

impl RawKey {
    pub fn down(code: KeyCode) -> Self {
        Self {
            code,
            was_down: false,
            is_down: true,
        }
    }

    pub fn up(code: KeyCode) -> Self {
        Self {
            code,
            was_down: true,
            is_down: false,
        }
    }

    pub fn repeat(code: KeyCode) -> Self {
        Self {
            code,
            was_down: true,
            is_down: true,
        }
    }

    #[inline]
    pub fn is_repeat(&self) -> bool {
        self.was_down == self.is_down
    }
}

/// Vertical wheel movement as reported by the platform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    /// Whole lines/notches, positive away from the user.
    Lines(f32),
    /// Precise scrolling in pixels, positive away from the user.
    Pixels(f64),
}
