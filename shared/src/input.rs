//! Controller input intents and the permission gate that filters them.
//!
//! Hosts fill a [`ControllerInput`] once per frame; the controller turns it
//! into an [`InputSnapshot`] before anything else reads it, so suspension via
//! [`PermissionGate`] cannot be bypassed by any later stage.

use bevy::prelude::*;

/// Move inputs with squared magnitude below this count as "no input".
pub const MOVE_DEADZONE_SQ: f32 = 1e-4;

/// Raw per-frame intents produced by the host's input layer.
///
/// `move_axis` is strafe (x, +right) and forward (y, +forward), magnitude <= 1.
/// `look_delta` is yaw (x, +right) and pitch (y, +up), frame-normalized.
/// `jump` and `toggle_cursor_lock` are edge signals; `sprint` and `crouch`
/// are level signals.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerInput {
    pub move_axis: Vec2,
    pub look_delta: Vec2,
    pub sprint: bool,
    pub crouch: bool,
    pub jump: bool,
    pub toggle_cursor_lock: bool,
}

/// Externally owned suspension flags. Fields are private so every write goes
/// through the setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGate {
    allow_movement: bool,
    allow_look: bool,
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self {
            allow_movement: true,
            allow_look: true,
        }
    }
}

impl PermissionGate {
    pub fn allow_movement(&self) -> bool {
        self.allow_movement
    }

    pub fn allow_look(&self) -> bool {
        self.allow_look
    }

    pub fn set_allow_movement(&mut self, allowed: bool) {
        self.allow_movement = allowed;
    }

    pub fn set_allow_look(&mut self, allowed: bool) {
        self.allow_look = allowed;
    }
}

/// Immutable, gated view of one frame's input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub move_axis: Vec2,
    pub look_delta: Vec2,
    pub sprint: bool,
    pub crouch: bool,
    pub jump: bool,
    pub toggle_cursor_lock: bool,
}

impl InputSnapshot {
    /// Capture `raw` through `gate`. Movement and look are zeroed while
    /// suspended; sprint, crouch and jump pass through untouched.
    pub fn capture(raw: &ControllerInput, gate: &PermissionGate) -> Self {
        let move_axis = if gate.allow_movement() {
            finite_or_zero(raw.move_axis)
        } else {
            Vec2::ZERO
        };
        let look_delta = if gate.allow_look() {
            finite_or_zero(raw.look_delta)
        } else {
            Vec2::ZERO
        };

        Self {
            move_axis,
            look_delta,
            sprint: raw.sprint,
            crouch: raw.crouch,
            jump: raw.jump,
            toggle_cursor_lock: raw.toggle_cursor_lock,
        }
    }

    #[inline]
    pub fn wants_to_move(&self) -> bool {
        self.move_axis.length_squared() > MOVE_DEADZONE_SQ
    }
}

fn finite_or_zero(v: Vec2) -> Vec2 {
    if v.is_finite() {
        v
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> ControllerInput {
        ControllerInput {
            move_axis: Vec2::new(0.5, 1.0),
            look_delta: Vec2::new(3.0, -2.0),
            sprint: true,
            crouch: true,
            jump: true,
            toggle_cursor_lock: false,
        }
    }

    #[test]
    fn test_open_gate_passes_everything() {
        let snap = InputSnapshot::capture(&raw(), &PermissionGate::default());
        assert_eq!(snap.move_axis, Vec2::new(0.5, 1.0));
        assert_eq!(snap.look_delta, Vec2::new(3.0, -2.0));
        assert!(snap.sprint && snap.crouch && snap.jump);
    }

    #[test]
    fn test_closed_gate_zeroes_move_and_look_only() {
        let mut gate = PermissionGate::default();
        gate.set_allow_movement(false);
        gate.set_allow_look(false);

        let snap = InputSnapshot::capture(&raw(), &gate);
        assert_eq!(snap.move_axis, Vec2::ZERO);
        assert_eq!(snap.look_delta, Vec2::ZERO);
        assert!(snap.sprint && snap.crouch && snap.jump);
        assert!(!snap.wants_to_move());
    }

    #[test]
    fn test_gates_are_independent() {
        let mut gate = PermissionGate::default();
        gate.set_allow_look(false);

        let snap = InputSnapshot::capture(&raw(), &gate);
        assert_eq!(snap.move_axis, Vec2::new(0.5, 1.0));
        assert_eq!(snap.look_delta, Vec2::ZERO);
    }

    #[test]
    fn test_tiny_move_is_inside_deadzone() {
        let input = ControllerInput {
            move_axis: Vec2::new(0.005, 0.005),
            ..default()
        };
        let snap = InputSnapshot::capture(&input, &PermissionGate::default());
        assert!(!snap.wants_to_move());
    }

    #[test]
    fn test_non_finite_intent_is_dropped() {
        let input = ControllerInput {
            move_axis: Vec2::new(f32::NAN, 1.0),
            look_delta: Vec2::new(f32::INFINITY, 0.0),
            ..default()
        };
        let snap = InputSnapshot::capture(&input, &PermissionGate::default());
        assert_eq!(snap.move_axis, Vec2::ZERO);
        assert_eq!(snap.look_delta, Vec2::ZERO);
    }
}
