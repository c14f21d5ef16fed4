use winit::keyboard::KeyCode;

use crate::input::Key;

/// Maps a physical key onto the logical key it drives, if any.
pub fn translate_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Key::MoveUp,
        KeyCode::ArrowDown | KeyCode::KeyS => Key::MoveDown,
        KeyCode::ArrowLeft | KeyCode::KeyA => Key::MoveLeft,
        KeyCode::ArrowRight | KeyCode::KeyD => Key::MoveRight,
        KeyCode::Space => Key::Action,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,

        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_share_movement_keys() {
        assert_eq!(translate_key(KeyCode::ArrowUp), Some(Key::MoveUp));
        assert_eq!(translate_key(KeyCode::KeyW), Some(Key::MoveUp));
        assert_eq!(translate_key(KeyCode::KeyA), Some(Key::MoveLeft));
        assert_eq!(translate_key(KeyCode::ArrowRight), Some(Key::MoveRight));
    }

    #[test]
    fn function_row_stops_at_f8() {
        assert_eq!(translate_key(KeyCode::F1), Key::function(1));
        assert_eq!(translate_key(KeyCode::F8), Key::function(8));
        assert_eq!(translate_key(KeyCode::F9), None);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(translate_key(KeyCode::KeyQ), None);
        assert_eq!(translate_key(KeyCode::Escape), None);
    }
}
