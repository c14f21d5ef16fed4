use bytemuck::{Pod, Zeroable};

use sparse_engine::coords::{ColorRgba, Rect, Vec2};
use sparse_engine::core::{App, AppControl};
use sparse_engine::input::{InputState, Key, MouseButton};
use sparse_engine::memory::{AppMemory, Block};
use sparse_engine::render::RenderState;

/// Cursor speed in pixels per second.
const SPEED: f32 = 320.0;
const GRID_STEP: u32 = 64;
const MIN_SIZE: f32 = 8.0;
const MAX_SIZE: f32 = 256.0;

const BACKGROUNDS: [ColorRgba; 4] = [
    ColorRgba::rgb(0.08, 0.09, 0.11),
    ColorRgba::rgb(0.12, 0.10, 0.16),
    ColorRgba::rgb(0.05, 0.12, 0.10),
    ColorRgba::rgb(0.16, 0.16, 0.16),
];
const GRID: ColorRgba = ColorRgba::new(1.0, 1.0, 1.0, 0.06);
const BRUSH: ColorRgba = ColorRgba::rgb(0.95, 0.55, 0.20);
const POINTER: ColorRgba = ColorRgba::new(0.40, 0.75, 1.0, 0.8);
const POINTER_DOWN: ColorRgba = ColorRgba::rgb(1.0, 1.0, 1.0);

/// Editor state kept in the persistent arena.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct EditorState {
    brush: Vec2,
    brush_size: f32,
    background: u32,
    frames: u32,
}

/// Small level-editor style demo: a brush moved with the arrow keys or WASD,
/// resized with the wheel, over a grid built in transient memory.
#[derive(Debug, Default)]
pub struct Editor {
    state: Option<Block<EditorState>>,
}

impl App for Editor {
    fn init(&mut self, memory: &mut AppMemory<'_>) {
        self.state = Some(memory.persistent.push(EditorState {
            brush: Vec2::new(128.0, 128.0),
            brush_size: 48.0,
            background: 0,
            frames: 0,
        }));
    }

    fn update(
        &mut self,
        memory: &mut AppMemory<'_>,
        render: &mut RenderState<'_>,
        input: &InputState,
    ) -> AppControl {
        let Some(handle) = self.state else {
            log::error!("editor updated before init");
            return AppControl::Exit;
        };

        memory.transient.reset();

        let state = memory.persistent.value_mut(handle);
        step(state, input, render.width, render.height);
        let state = *state;

        if input.key(Key::F1).was_pressed() {
            log::info!(
                "frame {}: brush at ({:.0}, {:.0}), size {:.0}",
                state.frames,
                state.brush.x,
                state.brush.y,
                state.brush_size
            );
        }

        let background = BACKGROUNDS[state.background as usize % BACKGROUNDS.len()];
        if render.push_clear(background).is_err() {
            return AppControl::Continue;
        }

        let lines = grid_lines(memory, render.width, render.height);
        for rect in memory.transient.get(lines) {
            if render.push_rect(*rect, GRID).is_err() {
                return AppControl::Continue;
            }
        }

        let half = state.brush_size * 0.5;
        let brush = Rect::new(
            state.brush.x - half,
            state.brush.y - half,
            state.brush_size,
            state.brush_size,
        );
        let pointer_color = if input.button(MouseButton::Left).is_down() {
            POINTER_DOWN
        } else {
            POINTER
        };
        let pointer = Rect::new(
            input.mouse.position.x - 3.0,
            input.mouse.position.y - 3.0,
            6.0,
            6.0,
        );

        if render.push_rect(brush, BRUSH).is_err() {
            return AppControl::Continue;
        }
        if render.push_rect(pointer, pointer_color).is_err() {
            return AppControl::Continue;
        }

        AppControl::Continue
    }
}

fn step(state: &mut EditorState, input: &InputState, width: u32, height: u32) {
    state.frames = state.frames.wrapping_add(1);

    let axis = |neg: Key, pos: Key| -> f32 {
        input.key(pos).is_down() as i32 as f32 - input.key(neg).is_down() as i32 as f32
    };
    let direction = Vec2::new(
        axis(Key::MoveLeft, Key::MoveRight),
        axis(Key::MoveDown, Key::MoveUp),
    );
    let distance = SPEED * input.delta_time;
    state.brush = state.brush + Vec2::new(direction.x * distance, direction.y * distance);

    // Clicking teleports the brush to the pointer.
    if input.button(MouseButton::Left).was_pressed() {
        state.brush = input.mouse.position;
    }

    state.brush.x = state.brush.x.clamp(0.0, width as f32);
    state.brush.y = state.brush.y.clamp(0.0, height as f32);

    state.brush_size =
        (state.brush_size + input.mouse.wheel_delta * 4.0).clamp(MIN_SIZE, MAX_SIZE);

    if input.key(Key::Action).was_pressed() {
        state.background = (state.background + 1) % BACKGROUNDS.len() as u32;
    }
}

/// One-pixel grid lines every [`GRID_STEP`] pixels, built in transient memory.
fn grid_lines(memory: &mut AppMemory<'_>, width: u32, height: u32) -> Block<Rect> {
    let columns = width / GRID_STEP;
    let rows = height / GRID_STEP;
    let lines = memory.transient.alloc::<Rect>((columns + rows) as usize);

    let out = memory.transient.get_mut(lines);
    for (i, slot) in out.iter_mut().enumerate() {
        let i = i as u32;
        *slot = if i < columns {
            Rect::new(((i + 1) * GRID_STEP) as f32, 0.0, 1.0, height as f32)
        } else {
            Rect::new(0.0, ((i - columns + 1) * GRID_STEP) as f32, width as f32, 1.0)
        };
    }
    lines
}

#[cfg(test)]
mod tests {
    use sparse_engine::config::MemoryLayout;
    use sparse_engine::memory::PlatformMemory;

    use super::*;

    fn input() -> InputState {
        InputState {
            delta_time: 0.5,
            ..Default::default()
        }
    }

    fn state() -> EditorState {
        EditorState {
            brush: Vec2::new(100.0, 100.0),
            brush_size: 48.0,
            background: 0,
            frames: 0,
        }
    }

    #[test]
    fn held_keys_move_the_brush_by_speed_and_delta_time() {
        let mut input = input();
        input.keyboard.key_mut(Key::MoveRight).record_transition(true);
        input.keyboard.key_mut(Key::MoveUp).record_transition(true);

        let mut state = state();
        step(&mut state, &input, 1280, 720);
        assert_eq!(state.brush, Vec2::new(100.0 + SPEED * 0.5, 100.0 + SPEED * 0.5));
        assert_eq!(state.frames, 1);
    }

    #[test]
    fn brush_stays_on_screen_and_size_is_clamped() {
        let mut input = input();
        input.keyboard.key_mut(Key::MoveLeft).record_transition(true);
        input.mouse.wheel_delta = -100.0;

        let mut state = state();
        step(&mut state, &input, 1280, 720);
        assert_eq!(state.brush.x, 0.0);
        assert_eq!(state.brush_size, MIN_SIZE);
    }

    #[test]
    fn action_press_cycles_background() {
        let mut input = input();
        input.keyboard.key_mut(Key::Action).record_transition(true);

        let mut state = state();
        state.background = BACKGROUNDS.len() as u32 - 1;
        step(&mut state, &input, 1280, 720);
        assert_eq!(state.background, 0);
    }

    #[test]
    fn full_command_buffer_keeps_the_editor_running() {
        // 128x128 gives two grid columns and two rows: clear + 4 lines + brush
        // fit, the pointer does not.
        let layout = MemoryLayout::for_commands(6, 1024, 4096);
        let mut memory = PlatformMemory::reserve(layout).unwrap();
        let (render_arena, mut app_memory) = memory.partition().split();
        let mut render = RenderState::new(render_arena, 6);
        render.set_screen_size(128, 128);

        let mut editor = Editor::default();
        editor.init(&mut app_memory);

        let control = editor.update(&mut app_memory, &mut render, &input());
        assert_eq!(control, AppControl::Continue);
        assert_eq!(render.len(), 6);
        assert_eq!(render.dropped(), 1);
    }
}
