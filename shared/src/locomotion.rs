//! Horizontal acceleration, gravity and jump integration.
//!
//! Integration is first-order: velocity moves linearly toward
//! its target (no exponential smoothing) and gravity is a plain Euler step.

use bevy::prelude::*;

use crate::config::ControllerProfile;
use crate::input::InputSnapshot;
use crate::posture::Posture;

/// Vertical speed held while grounded so the resolver keeps reporting
/// contact instead of the body hovering a hair above the floor.
pub const GROUND_STICK_VELOCITY: f32 = -2.0;

/// The host's collision/movement resolver.
pub trait CharacterMotor {
    /// Whether the body rests on walkable ground.
    fn is_grounded(&self) -> bool;

    /// Request a world-space displacement; returns what was actually applied
    /// after collision (may differ from the request).
    fn move_by(&mut self, displacement: Vec3) -> Vec3;
}

/// Ground-plane axes the move input is projected onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for MovementBasis {
    fn default() -> Self {
        // In Bevy: +X right, +Y up, -Z forward.
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

impl MovementBasis {
    /// Axes from the viewing reference when present, else from the body.
    ///
    /// `view` is the camera transform local to `body`.
    pub fn resolve(body: &Transform, view: Option<&Transform>) -> Self {
        view.and_then(|view| Self::from_rotation(body.rotation * view.rotation))
            .or_else(|| Self::from_rotation(body.rotation))
            .unwrap_or_default()
    }

    /// Flatten a rotation's forward/right onto the ground plane. `None` when
    /// either axis points (almost) straight up or down.
    pub fn from_rotation(rotation: Quat) -> Option<Self> {
        let forward = flatten(rotation * Vec3::NEG_Z)?;
        let right = flatten(rotation * Vec3::X)?;
        Some(Self { forward, right })
    }

    /// Combine a strafe/forward input into a world direction of length <= 1.
    pub fn direction(&self, move_axis: Vec2) -> Vec3 {
        let dir = self.right * move_axis.x + self.forward * move_axis.y;
        if dir.length_squared() > 1.0 {
            dir.normalize()
        } else {
            dir
        }
    }
}

fn flatten(v: Vec3) -> Option<Vec3> {
    let flat = Vec3::new(v.x, 0.0, v.z);
    (flat.length_squared() > 1e-6).then(|| flat.normalize())
}

/// Move `current` toward `target` by at most `max_delta`, never past it.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let delta_len = delta.length();
    if delta_len <= max_delta || delta_len == 0.0 {
        target
    } else {
        current + delta * (max_delta / delta_len)
    }
}

/// What one locomotion step did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionStep {
    pub target_velocity: Vec3,
    pub requested: Vec3,
    pub resolved: Vec3,
    pub grounded: bool,
    pub jumped: bool,
}

/// Velocity state. Only [`Locomotion::step`] mutates it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Locomotion {
    horizontal_velocity: Vec3,
    vertical_velocity: f32,
}

impl Locomotion {
    pub fn horizontal_velocity(&self) -> Vec3 {
        self.horizontal_velocity
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn target_speed(profile: &ControllerProfile, input: &InputSnapshot, posture: Posture) -> f32 {
        if !input.wants_to_move() {
            0.0
        } else if posture == Posture::Crouching {
            profile.crouch_speed
        } else if input.sprint {
            profile.sprint_speed
        } else {
            profile.walk_speed
        }
    }

    /// Advance one frame and submit exactly one displacement to `motor`.
    /// `dt` must already be known to be positive and finite.
    pub fn step(
        &mut self,
        profile: &ControllerProfile,
        input: &InputSnapshot,
        posture: Posture,
        basis: &MovementBasis,
        motor: &mut dyn CharacterMotor,
        dt: f32,
    ) -> LocomotionStep {
        // --- Horizontal ---
        let target_speed = Self::target_speed(profile, input, posture);
        let target_velocity = basis.direction(input.move_axis) * target_speed;

        let rate = if target_speed > self.horizontal_velocity.length() {
            profile.acceleration
        } else {
            profile.deceleration
        };
        self.horizontal_velocity = move_towards(self.horizontal_velocity, target_velocity, rate * dt);

        // --- Vertical ---
        let grounded = motor.is_grounded();
        let mut jumped = false;
        if grounded {
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = GROUND_STICK_VELOCITY;
            }
            if input.jump {
                self.vertical_velocity = profile.jump_velocity();
                jumped = true;
            }
        }
        self.vertical_velocity += profile.gravity * dt;

        // --- Resolve ---
        let requested = (self.horizontal_velocity + Vec3::Y * self.vertical_velocity) * dt;
        let resolved = motor.move_by(requested);

        LocomotionStep {
            target_velocity,
            requested,
            resolved,
            grounded,
            jumped,
        }
    }
}
