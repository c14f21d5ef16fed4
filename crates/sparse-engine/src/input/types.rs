use std::fmt;

/// Number of keys in the function-key row (F1..F8).
pub const FUNCTION_KEY_COUNT: usize = 8;

/// One key of the function row. Only F1..F8 can be constructed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FunctionKey(u8);

impl FunctionKey {
    /// Function key by 1-based number, `None` outside F1..F8.
    pub fn new(number: u8) -> Option<Self> {
        (1..=FUNCTION_KEY_COUNT as u8)
            .contains(&number)
            .then(|| Self(number - 1))
    }

    /// 1-based number, as printed on the key.
    #[inline]
    pub fn number(self) -> u8 {
        self.0 + 1
    }
}

/// Logical keyboard key.
///
/// Decoupled from platform key codes; the pump maps several physical keys
/// onto one logical key (arrows and WASD both drive movement).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// The dedicated action key (space bar).
    Action,
    Function(FunctionKey),
}

impl Key {
    pub const COUNT: usize = 5 + FUNCTION_KEY_COUNT;

    pub const F1: Key = Key::Function(FunctionKey(0));
    pub const F2: Key = Key::Function(FunctionKey(1));
    pub const F3: Key = Key::Function(FunctionKey(2));
    pub const F4: Key = Key::Function(FunctionKey(3));
    pub const F5: Key = Key::Function(FunctionKey(4));
    pub const F6: Key = Key::Function(FunctionKey(5));
    pub const F7: Key = Key::Function(FunctionKey(6));
    pub const F8: Key = Key::Function(FunctionKey(7));

    /// Function key by 1-based number, `None` outside F1..F8.
    pub fn function(number: u8) -> Option<Key> {
        FunctionKey::new(number).map(Key::Function)
    }

    /// Slot of this key in [`crate::input::KeyboardState`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Key::MoveUp => 0,
            Key::MoveDown => 1,
            Key::MoveLeft => 2,
            Key::MoveRight => 3,
            Key::Action => 4,
            Key::Function(f) => 5 + f.0 as usize,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Function(key) => write!(f, "F{}", key.number()),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Back,
    Forward,
}

impl MouseButton {
    pub const COUNT: usize = 5;

    pub const ALL: [MouseButton; Self::COUNT] = [
        MouseButton::Left,
        MouseButton::Middle,
        MouseButton::Right,
        MouseButton::Back,
        MouseButton::Forward,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-frame state of one button.
///
/// `half_transition_count` counts down/up edges seen during the frame, so a
/// press and release inside one frame reads as `ended_down == false` with a
/// count of 2.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ButtonState {
    pub ended_down: bool,
    pub half_transition_count: u32,
}

impl ButtonState {
    /// Records one raw down/up observation.
    ///
    /// Only a change of state counts as an edge; repeating the current state
    /// is a no-op. Feed every raw event, not a value coalesced at frame end.
    #[inline]
    pub fn record_transition(&mut self, is_down: bool) {
        if self.ended_down != is_down {
            self.ended_down = is_down;
            self.half_transition_count += 1;
        }
    }

    #[inline]
    pub fn is_down(&self) -> bool {
        self.ended_down
    }

    /// True if the button went down at least once this frame.
    #[inline]
    pub fn was_pressed(&self) -> bool {
        self.half_transition_count > 1
            || (self.half_transition_count == 1 && self.ended_down)
    }

    /// True if the button came up at least once this frame.
    #[inline]
    pub fn was_released(&self) -> bool {
        self.half_transition_count > 1
            || (self.half_transition_count == 1 && !self.ended_down)
    }

    /// State carried into the next frame: held-ness kept, edges cleared.
    #[inline]
    pub fn carried_over(self) -> Self {
        Self {
            ended_down: self.ended_down,
            half_transition_count: 0,
        }
    }
}
