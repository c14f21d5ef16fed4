use winit::keyboard::KeyCode;

use crate::core::{ExitReason, LoopSignals};
use crate::input::{InputState, MouseButton};

use super::keymap::translate_key;
use super::raw::{RawEvent, RawKey, WheelDelta};

/// Pixel distance treated as one wheel notch for precise scrolling.
pub const WHEEL_NOTCH_PIXELS: f64 = 120.0;

/// Non-blocking source of platform events.
pub trait EventSource {
    /// Appends every pending event to `out` and returns without waiting.
    /// An empty queue appends nothing.
    fn poll(&mut self, out: &mut Vec<RawEvent>);
}

/// Drains the platform queue once per iteration and turns it into input
/// edges, the exit flag and a pending resize.
///
/// Also tracks the live pointer: cursor position in window pixels and which
/// mouse buttons are physically held. The loop samples those after the pump.
#[derive(Debug, Default)]
pub struct EventPump {
    queue: Vec<RawEvent>,
    alt_down: bool,
    cursor: (f64, f64),
    mouse_down: [bool; MouseButton::COUNT],
    pending_resize: Option<(u32, u32)>,
    dispatched: u64,
}

impl EventPump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains `source` and dispatches every event. Returns how many were handled.
    pub fn pump<S: EventSource + ?Sized>(
        &mut self,
        source: &mut S,
        input: &mut InputState,
        signals: &mut LoopSignals,
    ) -> usize {
        let mut queue = std::mem::take(&mut self.queue);
        queue.clear();
        source.poll(&mut queue);

        for event in &queue {
            self.dispatch(event, input, signals);
        }

        let count = queue.len();
        self.queue = queue;
        count
    }

    /// Applies one event to the frame's input and the loop signals.
    pub fn dispatch(
        &mut self,
        event: &RawEvent,
        input: &mut InputState,
        signals: &mut LoopSignals,
    ) {
        self.dispatched += 1;

        match *event {
            RawEvent::CloseRequested | RawEvent::Destroyed => {
                signals.request_exit(ExitReason::CloseRequested);
            }
            RawEvent::PlatformExit => signals.request_exit(ExitReason::PlatformExit),

            RawEvent::Key(key) => self.dispatch_key(key, input, signals),

            RawEvent::ModifiersChanged { alt } => self.alt_down = alt,

            RawEvent::MouseButton { button, is_down } => {
                self.mouse_down[button.index()] = is_down;
            }

            RawEvent::CursorMoved { x, y } => self.cursor = (x, y),

            // Last known position is kept.
            RawEvent::CursorLeft => {}

            RawEvent::Wheel(delta) => {
                input.mouse.wheel_delta += wheel_notches(delta);
            }

            RawEvent::Resized { width, height } => self.pending_resize = Some((width, height)),

            RawEvent::FocusLost => self.release_all(input),
        }
    }

    fn dispatch_key(&mut self, key: RawKey, input: &mut InputState, signals: &mut LoopSignals) {
        if key.is_repeat() {
            return;
        }

        if let Some(logical) = translate_key(key.code) {
            input.keyboard.key_mut(logical).record_transition(key.is_down);
        }

        if key.is_down && key.code == KeyCode::F4 && self.alt_down {
            signals.request_exit(ExitReason::QuitAccelerator);
        }
    }

    /// Focus loss: no release events will arrive for held keys or buttons.
    fn release_all(&mut self, input: &mut InputState) {
        for key in input.keyboard.keys.iter_mut() {
            key.record_transition(false);
        }
        self.mouse_down = [false; MouseButton::COUNT];
        self.alt_down = false;
    }

    /// Most recent resize since the last call, if any.
    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.pending_resize.take()
    }

    /// Live cursor position in window pixels.
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    pub fn alt_down(&self) -> bool {
        self.alt_down
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

fn wheel_notches(delta: WheelDelta) -> f32 {
    match delta {
        WheelDelta::Lines(lines) => lines,
        WheelDelta::Pixels(pixels) => (pixels / WHEEL_NOTCH_PIXELS) as f32,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::input::{ButtonState, Key};

    /// Hands out one scripted batch per poll.
    #[derive(Default)]
    struct ScriptedSource {
        batches: VecDeque<Vec<RawEvent>>,
        polls: usize,
    }

    impl ScriptedSource {
        fn new(batches: Vec<Vec<RawEvent>>) -> Self {
            Self {
                batches: batches.into(),
                polls: 0,
            }
        }
    }

    impl EventSource for ScriptedSource {
        fn poll(&mut self, out: &mut Vec<RawEvent>) {
            self.polls += 1;
            if let Some(batch) = self.batches.pop_front() {
                out.extend(batch);
            }
        }
    }

    fn run(events: Vec<RawEvent>) -> (EventPump, InputState, LoopSignals) {
        let mut pump = EventPump::new();
        let mut input = InputState::default();
        let mut signals = LoopSignals::default();
        let mut source = ScriptedSource::new(vec![events]);
        pump.pump(&mut source, &mut input, &mut signals);
        (pump, input, signals)
    }

    #[test]
    fn empty_queue_is_a_no_op() {
        let (pump, input, signals) = run(vec![]);
        assert_eq!(pump.dispatched(), 0);
        assert_eq!(input, InputState::default());
        assert!(!signals.exit_requested());
    }

    #[test]
    fn auto_repeat_is_filtered() {
        let (_, input, _) = run(vec![
            RawEvent::Key(RawKey::down(KeyCode::Space)),
            RawEvent::Key(RawKey::repeat(KeyCode::Space)),
            RawEvent::Key(RawKey::repeat(KeyCode::Space)),
        ]);
        assert_eq!(
            *input.key(Key::Action),
            ButtonState {
                ended_down: true,
                half_transition_count: 1,
            }
        );
    }

    #[test]
    fn every_edge_is_counted() {
        let (_, input, _) = run(vec![
            RawEvent::Key(RawKey::down(KeyCode::KeyW)),
            RawEvent::Key(RawKey::up(KeyCode::KeyW)),
            RawEvent::Key(RawKey::down(KeyCode::ArrowUp)),
        ]);
        let up = input.key(Key::MoveUp);
        assert!(up.is_down());
        assert_eq!(up.half_transition_count, 3);
    }

    #[test]
    fn unmapped_keys_leave_input_untouched() {
        let (_, input, signals) = run(vec![RawEvent::Key(RawKey::down(KeyCode::KeyQ))]);
        assert_eq!(input, InputState::default());
        assert!(!signals.exit_requested());
    }

    #[test]
    fn alt_f4_requests_exit() {
        let (_, input, signals) = run(vec![
            RawEvent::ModifiersChanged { alt: true },
            RawEvent::Key(RawKey::down(KeyCode::F4)),
        ]);
        assert_eq!(signals.exit_reason(), Some(ExitReason::QuitAccelerator));
        assert!(input.key(Key::F4).is_down());
    }

    #[test]
    fn f4_without_alt_is_just_a_key() {
        let (_, _, signals) = run(vec![
            RawEvent::ModifiersChanged { alt: true },
            RawEvent::ModifiersChanged { alt: false },
            RawEvent::Key(RawKey::down(KeyCode::F4)),
        ]);
        assert!(!signals.exit_requested());
    }

    #[test]
    fn close_and_destroy_request_exit() {
        let (_, _, signals) = run(vec![RawEvent::CloseRequested]);
        assert_eq!(signals.exit_reason(), Some(ExitReason::CloseRequested));

        let (_, _, signals) = run(vec![RawEvent::Destroyed]);
        assert_eq!(signals.exit_reason(), Some(ExitReason::CloseRequested));

        let (_, _, signals) = run(vec![RawEvent::PlatformExit]);
        assert_eq!(signals.exit_reason(), Some(ExitReason::PlatformExit));
    }

    #[test]
    fn wheel_is_normalized_and_accumulated() {
        let (_, input, _) = run(vec![
            RawEvent::Wheel(WheelDelta::Lines(1.0)),
            RawEvent::Wheel(WheelDelta::Pixels(240.0)),
            RawEvent::Wheel(WheelDelta::Pixels(-60.0)),
        ]);
        assert_eq!(input.mouse.wheel_delta, 2.5);
    }

    #[test]
    fn pointer_and_resize_are_tracked_live() {
        let (mut pump, input, _) = run(vec![
            RawEvent::CursorMoved { x: 10.0, y: 20.0 },
            RawEvent::MouseButton {
                button: MouseButton::Right,
                is_down: true,
            },
            RawEvent::Resized {
                width: 800,
                height: 600,
            },
            RawEvent::Resized {
                width: 640,
                height: 480,
            },
            RawEvent::CursorLeft,
        ]);

        assert_eq!(pump.cursor(), (10.0, 20.0));
        assert!(pump.mouse_down(MouseButton::Right));
        assert!(!pump.mouse_down(MouseButton::Left));
        // Buttons reach the snapshot only through the loop's capture step.
        assert!(!input.button(MouseButton::Right).is_down());

        assert_eq!(pump.take_resize(), Some((640, 480)));
        assert_eq!(pump.take_resize(), None);
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let (pump, input, _) = run(vec![
            RawEvent::ModifiersChanged { alt: true },
            RawEvent::Key(RawKey::down(KeyCode::KeyD)),
            RawEvent::MouseButton {
                button: MouseButton::Left,
                is_down: true,
            },
            RawEvent::FocusLost,
        ]);

        let right = input.key(Key::MoveRight);
        assert!(!right.is_down());
        assert_eq!(right.half_transition_count, 2);
        assert!(!pump.mouse_down(MouseButton::Left));
        assert!(!pump.alt_down());
    }

    #[test]
    fn queue_buffer_is_reused_across_pumps() {
        let mut pump = EventPump::new();
        let mut input = InputState::default();
        let mut signals = LoopSignals::default();
        let mut source = ScriptedSource::new(vec![
            vec![RawEvent::Key(RawKey::down(KeyCode::KeyS))],
            vec![],
            vec![RawEvent::Key(RawKey::up(KeyCode::KeyS))],
        ]);

        assert_eq!(pump.pump(&mut source, &mut input, &mut signals), 1);
        assert_eq!(pump.pump(&mut source, &mut input, &mut signals), 0);
        assert_eq!(pump.pump(&mut source, &mut input, &mut signals), 1);
        assert_eq!(source.polls, 3);
        assert_eq!(input.key(Key::MoveDown).half_transition_count, 2);
    }
}
