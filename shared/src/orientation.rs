//! Look orientation (body yaw, camera pitch) and cursor-lock intent.

use bevy::prelude::*;

use crate::config::ControllerProfile;

/// Look deltas with squared magnitude below this are ignored.
pub const LOOK_DEADZONE_SQ: f32 = 1e-5;

/// Presentation layer that actually grabs or releases the pointer.
pub trait CursorPresenter {
    fn apply_cursor_lock(&mut self, locked: bool);
}

/// Accumulated pitch plus the limits it is clamped to. Angles in degrees;
/// positive pitch looks down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pitch: f32,
    max_look_angle: f32,
    sensitivity: f32,
}

impl Orientation {
    pub fn new(profile: &ControllerProfile) -> Self {
        Self {
            pitch: 0.0,
            max_look_angle: profile.max_look_angle,
            sensitivity: profile.look_sensitivity,
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Rotation to write on the viewing reference for the current pitch.
    pub fn view_rotation(&self) -> Quat {
        Quat::from_rotation_x(-self.pitch.to_radians())
    }

    /// Yaw the body and pitch the view. Returns false when the delta was too
    /// small to act on.
    pub fn apply_look(
        &mut self,
        look_delta: Vec2,
        dt: f32,
        body: &mut Transform,
        view: Option<&mut Transform>,
    ) -> bool {
        if look_delta.length_squared() <= LOOK_DEADZONE_SQ {
            return false;
        }

        // Positive yaw turns right, i.e. clockwise seen from above.
        let yaw = look_delta.x * self.sensitivity * dt;
        if yaw.is_finite() {
            body.rotate_y(-yaw.to_radians());
        }

        let pitch = self.pitch - look_delta.y * self.sensitivity * dt;
        if !pitch.is_nan() {
            self.pitch = pitch.clamp(-self.max_look_angle, self.max_look_angle);
        }

        if let Some(view) = view {
            view.rotation = self.view_rotation();
        }
        true
    }
}

/// Stored cursor-lock intent, kept apart from what the presentation layer is
/// currently showing so that a focus loss doesn't overwrite it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLock {
    locked: bool,
    relock_on_focus: bool,
}

impl CursorLock {
    /// Start with `lock_on_start` as the intent and apply it immediately.
    pub fn new(lock_on_start: bool, presenter: &mut dyn CursorPresenter) -> Self {
        presenter.apply_cursor_lock(lock_on_start);
        Self {
            locked: lock_on_start,
            relock_on_focus: lock_on_start,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Flip the intent and apply it.
    pub fn toggle(&mut self, presenter: &mut dyn CursorPresenter) {
        self.locked = !self.locked;
        presenter.apply_cursor_lock(self.locked);
    }

    /// Focus loss always unlocks; regaining focus restores the stored intent
    /// when relocking is enabled. The intent itself never changes here.
    pub fn focus_changed(&self, focused: bool, presenter: &mut dyn CursorPresenter) {
        if !focused {
            presenter.apply_cursor_lock(false);
        } else if self.relock_on_focus {
            presenter.apply_cursor_lock(self.locked);
        }
    }

    /// Push the stored intent to the presentation layer again.
    pub fn reapply(&self, presenter: &mut dyn CursorPresenter) {
        presenter.apply_cursor_lock(self.locked);
    }

    /// Unlock for good, e.g. when the controller is torn down.
    pub fn release(&self, presenter: &mut dyn CursorPresenter) {
        presenter.apply_cursor_lock(false);
    }
}
