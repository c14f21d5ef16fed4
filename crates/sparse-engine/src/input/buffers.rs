use super::state::InputState;

/// The "new"/"old" pair of input snapshots.
///
/// Roles alternate by flipping an index; the snapshots themselves never move
/// or get copied wholesale.
#[derive(Debug, Default)]
pub struct InputBuffers {
    states: [InputState; 2],
    new_index: usize,
    swaps: u64,
}

impl InputBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carries held state from old into new and clears per-frame fields.
    pub fn begin_frame(&mut self) {
        let (new, old) = self.split_mut();
        new.begin_frame_from(old);
    }

    /// Snapshot being written this frame.
    #[inline]
    pub fn new_state(&self) -> &InputState {
        &self.states[self.new_index]
    }

    #[inline]
    pub fn new_state_mut(&mut self) -> &mut InputState {
        &mut self.states[self.new_index]
    }

    /// Previous frame's snapshot, read-only.
    #[inline]
    pub fn old_state(&self) -> &InputState {
        &self.states[self.new_index ^ 1]
    }

    /// Mutable new snapshot alongside the read-only old one.
    pub fn split_mut(&mut self) -> (&mut InputState, &InputState) {
        let [a, b] = &mut self.states;
        if self.new_index == 0 {
            (a, &*b)
        } else {
            (b, &*a)
        }
    }

    /// Exchanges the roles of the two snapshots.
    #[inline]
    pub fn swap(&mut self) {
        self.new_index ^= 1;
        self.swaps += 1;
    }

    /// Slot currently playing the "new" role (0 or 1).
    #[inline]
    pub fn new_index(&self) -> usize {
        self.new_index
    }

    #[inline]
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonState, Key};

    #[test]
    fn roles_alternate_and_never_alias() {
        let mut buffers = InputBuffers::new();
        for frame in 0..6u64 {
            let new_ptr = buffers.new_state() as *const InputState;
            let old_ptr = buffers.old_state() as *const InputState;
            assert_ne!(new_ptr, old_ptr);
            assert_eq!(buffers.new_index(), (frame % 2) as usize);
            assert_eq!(buffers.swap_count(), frame);

            buffers.swap();
            assert_eq!(buffers.old_state() as *const InputState, new_ptr);
        }
    }

    #[test]
    fn key_held_at_end_of_frame_is_down_next_frame() {
        let mut buffers = InputBuffers::new();

        buffers.begin_frame();
        buffers.new_state_mut().keyboard.key_mut(Key::MoveUp).record_transition(true);
        buffers.swap();

        buffers.begin_frame();
        assert_eq!(
            *buffers.new_state().key(Key::MoveUp),
            ButtonState {
                ended_down: true,
                half_transition_count: 0,
            }
        );

        buffers.new_state_mut().keyboard.key_mut(Key::MoveUp).record_transition(false);
        buffers.swap();
        buffers.begin_frame();
        assert_eq!(*buffers.new_state().key(Key::MoveUp), ButtonState::default());
    }

    #[test]
    fn split_mut_matches_role_accessors() {
        let mut buffers = InputBuffers::new();
        buffers.swap();
        let new_ptr = buffers.new_state() as *const InputState;
        let old_ptr = buffers.old_state() as *const InputState;
        let (new, old) = buffers.split_mut();
        assert_eq!(new as *const InputState, new_ptr);
        assert_eq!(old as *const InputState, old_ptr);
    }
}
