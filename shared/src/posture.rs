//! Standing/crouching posture and the height blend that follows it.

use crate::config::{BodyMetrics, ControllerProfile};

/// Commanded posture. The interpolated height may still be catching up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Posture {
    #[default]
    Standing,
    Crouching,
}

/// Move `current` toward `target` by at most `max_delta`, never past it.
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Tracks body height and eye height toward the commanded posture at a
/// fixed rate. Level-triggered: the posture is recomputed every frame from
/// the held crouch signal.
#[derive(Debug, Clone, PartialEq)]
pub struct PostureBlender {
    posture: Posture,
    current_height: f32,
    current_eye_height: f32,
    stand_height: f32,
    crouch_height: f32,
    stand_eye_height: f32,
    crouch_eye_height: f32,
    rate: f32,
}

impl PostureBlender {
    pub fn new(profile: &ControllerProfile, body: &BodyMetrics) -> Self {
        Self {
            posture: Posture::Standing,
            current_height: body.stand_height,
            current_eye_height: body.stand_eye_height,
            stand_height: body.stand_height,
            crouch_height: body.crouch_height(profile),
            stand_eye_height: body.stand_eye_height,
            crouch_eye_height: body.crouch_eye_height(profile),
            rate: profile.crouch_transition_rate,
        }
    }

    pub fn update(&mut self, crouch_held: bool, dt: f32) {
        self.posture = if crouch_held {
            Posture::Crouching
        } else {
            Posture::Standing
        };

        let step = self.rate * dt;
        self.current_height = approach(self.current_height, self.target_height(), step)
            .clamp(self.crouch_height, self.stand_height);
        self.current_eye_height = approach(self.current_eye_height, self.target_eye_height(), step);
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn target_height(&self) -> f32 {
        match self.posture {
            Posture::Standing => self.stand_height,
            Posture::Crouching => self.crouch_height,
        }
    }

    pub fn target_eye_height(&self) -> f32 {
        match self.posture {
            Posture::Standing => self.stand_eye_height,
            Posture::Crouching => self.crouch_eye_height,
        }
    }

    pub fn current_height(&self) -> f32 {
        self.current_height
    }

    pub fn current_eye_height(&self) -> f32 {
        self.current_eye_height
    }

    /// Capsule centre above the feet for the current height.
    pub fn collider_center(&self) -> f32 {
        self.current_height * 0.5
    }

    pub fn stand_height(&self) -> f32 {
        self.stand_height
    }

    pub fn crouch_height(&self) -> f32 {
        self.crouch_height
    }

    pub fn is_transitioning(&self) -> bool {
        self.current_height != self.target_height()
            || self.current_eye_height != self.target_eye_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blender(stand: f32, ratio: f32, rate: f32) -> PostureBlender {
        let profile = ControllerProfile {
            crouch_height_ratio: ratio,
            crouch_transition_rate: rate,
            ..Default::default()
        };
        let body = BodyMetrics {
            stand_height: stand,
            stand_eye_height: stand * 0.9,
            radius: 0.3,
        };
        PostureBlender::new(&profile, &body)
    }

    #[test]
    fn test_approach_never_overshoots() {
        assert_eq!(approach(0.0, 1.0, 0.4), 0.4);
        assert_eq!(approach(0.9, 1.0, 0.4), 1.0);
        assert_eq!(approach(1.0, -1.0, 0.5), 0.5);
        assert_eq!(approach(-0.8, -1.0, 0.5), -1.0);
    }

    #[test]
    fn test_crouch_reaches_target_and_holds() {
        // Height delta 3 at 6 m/s: 0.5s to settle, then 1.5s of holding.
        let mut b = blender(6.0, 0.5, 6.0);
        let dt = 0.0625;
        let mut settled_at = None;
        for frame in 1..=32 {
            b.update(true, dt);
            let t = frame as f32 * dt;
            if settled_at.is_none() && b.current_height() == b.crouch_height() {
                settled_at = Some(t);
            }
            if settled_at.is_some() {
                assert_eq!(b.current_height(), 3.0);
            }
        }
        let settled_at = settled_at.expect("crouch never settled");
        assert!(settled_at <= 0.5 + 1e-4, "settled at {settled_at}");
        assert_eq!(b.posture(), Posture::Crouching);
    }

    #[test]
    fn test_release_commands_standing_immediately() {
        let mut b = blender(1.8, 0.5, 6.0);
        b.update(true, 0.05);
        assert_eq!(b.posture(), Posture::Crouching);
        b.update(false, 0.05);
        assert_eq!(b.posture(), Posture::Standing);
        assert!(b.is_transitioning());
    }

    #[test]
    fn test_height_stays_in_bounds_under_toggling() {
        let mut b = blender(1.8, 0.5, 6.0);
        for i in 0..500 {
            let crouch = (i / 3) % 2 == 0 || i % 7 == 0;
            let dt = if i % 11 == 0 { 1.0 } else { 0.013 };
            b.update(crouch, dt);
            assert!(b.current_height() <= b.stand_height());
            assert!(b.current_height() >= b.crouch_height());
        }
    }

    #[test]
    fn test_eye_height_scales_with_ratio() {
        let mut b = blender(2.0, 0.5, 100.0);
        b.update(true, 1.0);
        assert!((b.current_eye_height() - 0.9).abs() < 1e-6);
        assert!((b.collider_center() - 0.5).abs() < 1e-6);
        assert!(!b.is_transitioning());
    }
}
