//! Controller tuning profile and body metrics
//!
//! The profile is authored as RON (see `client/assets/controller.ron`); every
//! field is optional and falls back to the values below. Validation happens
//! once, at construction, so a bad profile is rejected instead of being
//! clamped silently every frame.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, ControllerResult};

/// Lowest height the body may shrink to, whatever the crouch ratio says.
pub const MIN_CROUCH_HEIGHT: f32 = 0.1;

/// Per-character tunables. Speeds are m/s, rates m/s^2, angles degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerProfile {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Signed vertical acceleration; must be negative (down).
    pub gravity: f32,
    /// Apex height of a jump from flat ground, in metres.
    pub jump_height: f32,
    pub look_sensitivity: f32,
    /// Pitch limit in degrees, applied symmetrically.
    pub max_look_angle: f32,
    /// Crouched height as a fraction of standing height (0-1].
    pub crouch_height_ratio: f32,
    /// Height and eye blend rate in m/s.
    pub crouch_transition_rate: f32,
    /// Lock the cursor when the controller starts and whenever focus returns.
    pub lock_cursor_on_start: bool,
}

impl Default for ControllerProfile {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            sprint_speed: 10.0,
            crouch_speed: 3.5,
            acceleration: 20.0,
            deceleration: 25.0,
            gravity: -13.0,
            jump_height: 1.6,
            look_sensitivity: 1.0,
            max_look_angle: 80.0,
            crouch_height_ratio: 0.5,
            crouch_transition_rate: 6.0,
            lock_cursor_on_start: true,
        }
    }
}

impl ControllerProfile {
    #[inline]
    pub fn gravity_magnitude(&self) -> f32 {
        -self.gravity
    }

    /// Launch speed that peaks at exactly `jump_height` under this gravity.
    #[inline]
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * self.jump_height * self.gravity_magnitude()).sqrt()
    }

    pub fn validate(&self) -> ControllerResult<()> {
        positive("walk_speed", self.walk_speed)?;
        positive("sprint_speed", self.sprint_speed)?;
        positive("crouch_speed", self.crouch_speed)?;
        positive("acceleration", self.acceleration)?;
        positive("deceleration", self.deceleration)?;
        positive("jump_height", self.jump_height)?;
        positive("look_sensitivity", self.look_sensitivity)?;
        positive("crouch_transition_rate", self.crouch_transition_rate)?;

        if !self.gravity.is_finite() || self.gravity >= 0.0 {
            return Err(ControllerError::invalid(
                "gravity",
                format!("must be negative (down), got {}", self.gravity),
            ));
        }
        if !(self.max_look_angle > 0.0 && self.max_look_angle <= 90.0) {
            return Err(ControllerError::invalid(
                "max_look_angle",
                format!("must be within (0, 90] degrees, got {}", self.max_look_angle),
            ));
        }
        if !(self.crouch_height_ratio > 0.0 && self.crouch_height_ratio <= 1.0) {
            return Err(ControllerError::invalid(
                "crouch_height_ratio",
                format!("must be within (0, 1], got {}", self.crouch_height_ratio),
            ));
        }
        Ok(())
    }

    /// Read, parse and validate a RON profile.
    pub fn load(path: impl AsRef<Path>) -> ControllerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ControllerError::ProfileIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let profile: Self = ron::from_str(&text).map_err(|e| ControllerError::ProfileParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Like [`Self::load`], but never fails: problems are logged and the
    /// built-in defaults are used instead.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!("No controller profile at {:?}; using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(profile) => {
                info!("Loaded controller profile from {:?}", path);
                profile
            }
            Err(e) => {
                warn!("{}; using default controller profile", e);
                Self::default()
            }
        }
    }
}

/// Physical dimensions of the body the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyMetrics {
    /// Standing capsule height (feet to crown).
    pub stand_height: f32,
    /// Camera height above the feet while standing.
    pub stand_eye_height: f32,
    pub radius: f32,
}

impl Default for BodyMetrics {
    fn default() -> Self {
        Self {
            stand_height: 1.8,
            stand_eye_height: 1.6,
            radius: 0.3,
        }
    }
}

impl BodyMetrics {
    pub fn validate(&self) -> ControllerResult<()> {
        positive("stand_height", self.stand_height)?;
        positive("radius", self.radius)?;
        // Crouch height never drops below the floor, so a shorter body would
        // crouch taller than it stands.
        if self.stand_height < MIN_CROUCH_HEIGHT {
            return Err(ControllerError::invalid(
                "stand_height",
                format!(
                    "must be at least {} (the crouch floor), got {}",
                    MIN_CROUCH_HEIGHT, self.stand_height
                ),
            ));
        }
        if !self.stand_eye_height.is_finite() || self.stand_eye_height < 0.0 {
            return Err(ControllerError::invalid(
                "stand_eye_height",
                format!("must be finite and non-negative, got {}", self.stand_eye_height),
            ));
        }
        Ok(())
    }

    pub fn crouch_height(&self, profile: &ControllerProfile) -> f32 {
        (self.stand_height * profile.crouch_height_ratio).max(MIN_CROUCH_HEIGHT)
    }

    pub fn crouch_eye_height(&self, profile: &ControllerProfile) -> f32 {
        self.stand_eye_height * profile.crouch_height_ratio
    }
}

fn positive(field: &'static str, value: f32) -> ControllerResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ControllerError::invalid(
            field,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}
