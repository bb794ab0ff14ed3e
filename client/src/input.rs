//! Keyboard and mouse -> controller intents
//!
//! Produces one `ControllerInput` per frame. Permission gating happens later,
//! inside the controller, so this layer always reports what the player did.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use shared::ControllerInput;

use crate::ui::InventoryOpen;

/// Key layout and mouse scaling.
#[derive(Resource, Debug, Clone)]
pub struct InputBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub sprint: KeyCode,
    pub crouch: KeyCode,
    pub crouch_alt: KeyCode,
    pub toggle_cursor: KeyCode,
    pub inventory: KeyCode,
    pub inventory_alt: KeyCode,
    /// Mouse pixels -> frame-normalized look units.
    pub mouse_look_scale: f32,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
            sprint: KeyCode::ShiftLeft,
            crouch: KeyCode::ControlLeft,
            crouch_alt: KeyCode::KeyC,
            toggle_cursor: KeyCode::Escape,
            inventory: KeyCode::Tab,
            inventory_alt: KeyCode::KeyI,
            mouse_look_scale: 30.0,
        }
    }
}

fn axis(keyboard: &ButtonInput<KeyCode>, positive: KeyCode, negative: KeyCode) -> f32 {
    let mut value = 0.0;
    if keyboard.pressed(positive) {
        value += 1.0;
    }
    if keyboard.pressed(negative) {
        value -= 1.0;
    }
    value
}

/// Sample devices into the `ControllerInput` resource.
pub fn read_controller_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    bindings: Res<InputBindings>,
    inventory_open: Res<InventoryOpen>,
    mut input: ResMut<ControllerInput>,
) {
    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }

    let move_axis = Vec2::new(
        axis(&keyboard, bindings.right, bindings.left),
        axis(&keyboard, bindings.forward, bindings.backward),
    );

    *input = ControllerInput {
        // Keys give (1, 1) on diagonals; the controller expects the unit disk.
        move_axis: move_axis.clamp_length_max(1.0),
        // Screen-space y grows downward; intents use +y = look up.
        look_delta: Vec2::new(delta.x, -delta.y) * bindings.mouse_look_scale,
        sprint: keyboard.pressed(bindings.sprint),
        crouch: keyboard.pressed(bindings.crouch) || keyboard.pressed(bindings.crouch_alt),
        jump: keyboard.just_pressed(bindings.jump),
        // The overlay owns the cursor while it is open.
        toggle_cursor_lock: keyboard.just_pressed(bindings.toggle_cursor) && !inventory_open.0,
    };
}
