use crate::coords::Vec2;

use super::types::{ButtonState, Key, MouseButton};

/// Keyboard half of an input snapshot, indexed by [`Key::index`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct KeyboardState {
    pub keys: [ButtonState; Key::COUNT],
}

impl KeyboardState {
    #[inline]
    pub fn key(&self, key: Key) -> &ButtonState {
        &self.keys[key.index()]
    }

    #[inline]
    pub fn key_mut(&mut self, key: Key) -> &mut ButtonState {
        &mut self.keys[key.index()]
    }
}

/// Mouse half of an input snapshot.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MouseState {
    pub buttons: [ButtonState; MouseButton::COUNT],
    /// Cursor position in render space.
    pub position: Vec2,
    /// Wheel movement this frame in notches; positive is away from the user.
    pub wheel_delta: f32,
}

impl MouseState {
    #[inline]
    pub fn button(&self, button: MouseButton) -> &ButtonState {
        &self.buttons[button.index()]
    }

    #[inline]
    pub fn button_mut(&mut self, button: MouseButton) -> &mut ButtonState {
        &mut self.buttons[button.index()]
    }
}

/// One frame's input snapshot as seen by the application.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    /// Seconds the frame is expected to cover.
    pub delta_time: f32,
}

impl InputState {
    #[inline]
    pub fn key(&self, key: Key) -> &ButtonState {
        self.keyboard.key(key)
    }

    #[inline]
    pub fn button(&self, button: MouseButton) -> &ButtonState {
        self.mouse.button(button)
    }

    /// Prepares this snapshot for a new frame from the previous one.
    ///
    /// Keyboard: only `ended_down` survives. Mouse buttons: carried over with
    /// counters cleared; the live state query applied afterwards records any
    /// edge. Wheel delta is cleared. Cursor position and delta time are
    /// rewritten every frame by the loop.
    pub fn begin_frame_from(&mut self, previous: &InputState) {
        *self = InputState::default();

        for (new, old) in self.keyboard.keys.iter_mut().zip(&previous.keyboard.keys) {
            *new = old.carried_over();
        }

        for (new, old) in self.mouse.buttons.iter_mut().zip(&previous.mouse.buttons) {
            *new = old.carried_over();
        }

        self.mouse.position = previous.mouse.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_survives_frame_boundary_with_cleared_count() {
        let mut old = InputState::default();
        old.keyboard.key_mut(Key::MoveLeft).record_transition(true);
        old.keyboard.key_mut(Key::Action).record_transition(true);
        old.keyboard.key_mut(Key::Action).record_transition(false);

        let mut new = InputState::default();
        new.keyboard.key_mut(Key::MoveLeft).half_transition_count = 9;
        new.begin_frame_from(&old);

        assert_eq!(
            *new.key(Key::MoveLeft),
            ButtonState {
                ended_down: true,
                half_transition_count: 0,
            }
        );
        assert_eq!(*new.key(Key::Action), ButtonState::default());
    }

    #[test]
    fn mouse_buttons_carry_down_state_and_wheel_resets() {
        let mut old = InputState::default();
        old.mouse.button_mut(MouseButton::Right).record_transition(true);
        old.mouse.wheel_delta = 2.0;
        old.mouse.position = Vec2::new(3.0, 4.0);

        let mut new = InputState::default();
        new.mouse.wheel_delta = -1.0;
        new.begin_frame_from(&old);

        assert!(new.button(MouseButton::Right).ended_down);
        assert_eq!(new.button(MouseButton::Right).half_transition_count, 0);
        assert_eq!(new.mouse.wheel_delta, 0.0);
        assert_eq!(new.mouse.position, Vec2::new(3.0, 4.0));
    }
}
