//! Player input handling
//!
//! Input is polled every frame and latched here; the physics tick consumes it.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

/// Mouse delta (pixels) to look input. Look input is a rate in `-1..=1`-ish units that the
/// camera scales by its rotation speed, so this stays small.
pub const MOUSE_SENSITIVITY: f32 = 0.5;

/// Client-side input state
#[derive(Resource, Default)]
pub struct InputState {
    /// Stick-style movement: x = right, y = forward. Unit length at most.
    pub movement: Vec2,
    /// Set on the frame Space goes down; cleared when the physics tick picks it up.
    pub jump: bool,
    /// Camera look rates as (pitch, yaw).
    pub look: Vec2,
}

/// Handle keyboard input for movement
pub fn handle_keyboard_input(keyboard: Res<ButtonInput<KeyCode>>, mut input_state: ResMut<InputState>) {
    let axis = |positive: KeyCode, negative: KeyCode| {
        (keyboard.pressed(positive) as i8 - keyboard.pressed(negative) as i8) as f32
    };

    input_state.movement = Vec2::new(axis(KeyCode::KeyD, KeyCode::KeyA), axis(KeyCode::KeyW, KeyCode::KeyS))
        .clamp_length_max(1.0);

    // Latch: a press between two physics ticks must not be lost.
    if keyboard.just_pressed(KeyCode::Space) {
        input_state.jump = true;
    }
}

/// Handle mouse and arrow-key input for orbiting the camera
pub fn handle_look_input(
    mut mouse_motion: MessageReader<MouseMotion>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Real>>,
    mut input_state: ResMut<InputState>,
) {
    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }

    // Mouse delta is per frame while the camera expects a rate, so divide by frame time.
    let dt = time.delta_secs();
    let mouse = if dt > 0.0 {
        // Mouse down looks down (positive pitch), mouse right turns right (positive yaw).
        Vec2::new(delta.y, delta.x) * MOUSE_SENSITIVITY * 0.01 / dt
    } else {
        Vec2::ZERO
    };

    let keys = Vec2::new(
        keyboard.pressed(KeyCode::ArrowDown) as i8 as f32 - keyboard.pressed(KeyCode::ArrowUp) as i8 as f32,
        keyboard.pressed(KeyCode::ArrowRight) as i8 as f32 - keyboard.pressed(KeyCode::ArrowLeft) as i8 as f32,
    );

    input_state.look = mouse + keys;
}
