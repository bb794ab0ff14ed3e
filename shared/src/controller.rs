//! First-person character controller
//!
//! One `update` per frame, in a fixed order:
//! - capture input through the permission gate
//! - blend posture (height + eye)
//! - integrate horizontal/vertical velocity and hand one displacement to the resolver
//! - yaw the body and pitch the view
//!
//! The controller owns all velocity/pitch/height state. The only things
//! other systems may change are the two permission flags, via the setters.

use bevy::prelude::*;

use crate::config::{BodyMetrics, ControllerProfile};
use crate::error::ControllerResult;
use crate::input::{ControllerInput, InputSnapshot, PermissionGate};
use crate::locomotion::{CharacterMotor, Locomotion, MovementBasis};
use crate::orientation::{CursorLock, CursorPresenter, Orientation};
use crate::posture::{Posture, PostureBlender};

/// Summary of one `update` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// The frame had a non-positive or non-finite `dt` and did nothing.
    pub skipped: bool,
    pub posture: Posture,
    pub grounded: bool,
    pub jumped: bool,
    pub target_velocity: Vec3,
    pub requested: Vec3,
    pub resolved: Vec3,
    pub cursor_toggled: bool,
}

#[derive(Component, Debug, Clone)]
pub struct FirstPersonController {
    profile: ControllerProfile,
    metrics: BodyMetrics,
    gate: PermissionGate,
    posture: PostureBlender,
    locomotion: Locomotion,
    orientation: Orientation,
    cursor: CursorLock,
}

impl FirstPersonController {
    /// Validate the profile and body, then apply the initial cursor state.
    pub fn new(
        profile: ControllerProfile,
        metrics: BodyMetrics,
        cursor: &mut dyn CursorPresenter,
    ) -> ControllerResult<Self> {
        profile.validate()?;
        metrics.validate()?;

        let controller = Self {
            posture: PostureBlender::new(&profile, &metrics),
            orientation: Orientation::new(&profile),
            cursor: CursorLock::new(profile.lock_cursor_on_start, cursor),
            locomotion: Locomotion::default(),
            gate: PermissionGate::default(),
            profile,
            metrics,
        };

        info!(
            "Controller ready: walk {:.1} / sprint {:.1} / crouch {:.1} m/s, height {:.2} -> {:.2} m",
            controller.profile.walk_speed,
            controller.profile.sprint_speed,
            controller.profile.crouch_speed,
            controller.posture.stand_height(),
            controller.posture.crouch_height(),
        );
        Ok(controller)
    }

    /// Run one frame.
    ///
    /// `body` is the character's world transform, `view` the camera transform
    /// local to it (if any). `motor` receives exactly one displacement unless
    /// the frame is skipped.
    pub fn update(
        &mut self,
        raw: &ControllerInput,
        dt: f32,
        body: &mut Transform,
        mut view: Option<&mut Transform>,
        motor: &mut dyn CharacterMotor,
        cursor: &mut dyn CursorPresenter,
    ) -> FrameReport {
        let input = InputSnapshot::capture(raw, &self.gate);

        // Discrete action: honoured even on a degenerate frame so the edge isn't lost.
        if input.toggle_cursor_lock {
            self.cursor.toggle(cursor);
            info!("Cursor {}", if self.cursor.is_locked() { "locked" } else { "unlocked" });
        }

        if !(dt.is_finite() && dt > 0.0) {
            debug!("Skipping controller frame with dt = {}", dt);
            return FrameReport {
                skipped: true,
                posture: self.posture.posture(),
                cursor_toggled: input.toggle_cursor_lock,
                ..default()
            };
        }

        // --- Posture ---
        self.posture.update(input.crouch, dt);

        // --- Locomotion ---
        let basis = MovementBasis::resolve(body, view.as_deref());
        let step = self.locomotion.step(
            &self.profile,
            &input,
            self.posture.posture(),
            &basis,
            motor,
            dt,
        );

        // --- View ---
        if let Some(view) = view.as_deref_mut() {
            view.translation.y = self.posture.current_eye_height();
        }
        self.orientation.apply_look(input.look_delta, dt, body, view);

        FrameReport {
            skipped: false,
            posture: self.posture.posture(),
            grounded: step.grounded,
            jumped: step.jumped,
            target_velocity: step.target_velocity,
            requested: step.requested,
            resolved: step.resolved,
            cursor_toggled: input.toggle_cursor_lock,
        }
    }

    // --- Permission gate ---

    pub fn set_allow_movement(&mut self, allowed: bool) {
        if self.gate.allow_movement() != allowed {
            info!("Movement {}", if allowed { "resumed" } else { "suspended" });
        }
        self.gate.set_allow_movement(allowed);
    }

    pub fn set_allow_look(&mut self, allowed: bool) {
        if self.gate.allow_look() != allowed {
            info!("Look {}", if allowed { "resumed" } else { "suspended" });
        }
        self.gate.set_allow_look(allowed);
    }

    pub fn allow_movement(&self) -> bool {
        self.gate.allow_movement()
    }

    pub fn allow_look(&self) -> bool {
        self.gate.allow_look()
    }

    // --- Cursor ---

    pub fn cursor_locked(&self) -> bool {
        self.cursor.is_locked()
    }

    pub fn focus_changed(&self, focused: bool, cursor: &mut dyn CursorPresenter) {
        self.cursor.focus_changed(focused, cursor);
    }

    pub fn reapply_cursor(&self, cursor: &mut dyn CursorPresenter) {
        self.cursor.reapply(cursor);
    }

    pub fn release_cursor(&self, cursor: &mut dyn CursorPresenter) {
        self.cursor.release(cursor);
    }

    // --- Read-only state ---

    pub fn profile(&self) -> &ControllerProfile {
        &self.profile
    }

    pub fn body_metrics(&self) -> &BodyMetrics {
        &self.metrics
    }

    pub fn horizontal_velocity(&self) -> Vec3 {
        self.locomotion.horizontal_velocity()
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.locomotion.vertical_velocity()
    }

    pub fn pitch(&self) -> f32 {
        self.orientation.pitch()
    }

    pub fn posture(&self) -> Posture {
        self.posture.posture()
    }

    pub fn current_height(&self) -> f32 {
        self.posture.current_height()
    }

    pub fn current_eye_height(&self) -> f32 {
        self.posture.current_eye_height()
    }

    pub fn collider_center(&self) -> f32 {
        self.posture.collider_center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControllerError;
    use crate::locomotion::GROUND_STICK_VELOCITY;

    #[derive(Default)]
    struct FakeMotor {
        grounded: bool,
        moves: Vec<Vec3>,
    }

    impl CharacterMotor for FakeMotor {
        fn is_grounded(&self) -> bool {
            self.grounded
        }

        fn move_by(&mut self, displacement: Vec3) -> Vec3 {
            self.moves.push(displacement);
            // Pretend a wall eats half of every move.
            displacement * 0.5
        }
    }

    #[derive(Default)]
    struct RecordingCursor(Vec<bool>);

    impl CursorPresenter for RecordingCursor {
        fn apply_cursor_lock(&mut self, locked: bool) {
            self.0.push(locked);
        }
    }

    struct Rig {
        controller: FirstPersonController,
        body: Transform,
        view: Transform,
        motor: FakeMotor,
        cursor: RecordingCursor,
    }

    impl Rig {
        fn new(profile: ControllerProfile, metrics: BodyMetrics) -> Self {
            let mut cursor = RecordingCursor::default();
            let controller = FirstPersonController::new(profile, metrics, &mut cursor)
                .expect("valid profile");
            Self {
                controller,
                body: Transform::IDENTITY,
                view: Transform::from_xyz(0.0, metrics.stand_eye_height, 0.0),
                motor: FakeMotor {
                    grounded: true,
                    ..default()
                },
                cursor,
            }
        }

        fn standard() -> Self {
            Self::new(ControllerProfile::default(), BodyMetrics::default())
        }

        fn frame(&mut self, input: ControllerInput, dt: f32) -> FrameReport {
            self.controller.update(
                &input,
                dt,
                &mut self.body,
                Some(&mut self.view),
                &mut self.motor,
                &mut self.cursor,
            )
        }
    }

    fn forward() -> ControllerInput {
        ControllerInput {
            move_axis: Vec2::Y,
            ..default()
        }
    }

    #[test]
    fn test_invalid_profile_fails_construction() {
        let mut cursor = RecordingCursor::default();
        let profile = ControllerProfile {
            deceleration: -5.0,
            ..default()
        };
        let err = FirstPersonController::new(profile, BodyMetrics::default(), &mut cursor)
            .unwrap_err();
        assert!(matches!(
            err,
            ControllerError::InvalidConfiguration { field: "deceleration", .. }
        ));
        assert!(cursor.0.is_empty(), "no side effects on failed construction");
    }

    #[test]
    fn test_body_below_crouch_floor_fails_construction() {
        let mut cursor = RecordingCursor::default();
        let metrics = BodyMetrics {
            stand_height: 0.05,
            stand_eye_height: 0.04,
            radius: 0.3,
        };
        let err = FirstPersonController::new(ControllerProfile::default(), metrics, &mut cursor)
            .unwrap_err();
        assert!(matches!(
            err,
            ControllerError::InvalidConfiguration { field: "stand_height", .. }
        ));
        assert!(cursor.0.is_empty());
    }

    #[test]
    fn test_construction_applies_initial_cursor_state() {
        let rig = Rig::standard();
        assert!(rig.controller.cursor_locked());
        assert_eq!(rig.cursor.0, vec![true]);
        assert!(rig.controller.allow_movement() && rig.controller.allow_look());
    }

    #[test]
    fn test_walk_first_frame_speed() {
        let mut rig = Rig::standard();
        rig.frame(forward(), 0.1);
        assert!((rig.controller.horizontal_velocity().length() - 2.0).abs() < 1e-5);
        assert_eq!(rig.motor.moves.len(), 1);
    }

    #[test]
    fn test_diagonal_target_speed_is_walk_speed() {
        let mut rig = Rig::standard();
        let report = rig.frame(
            ControllerInput {
                move_axis: Vec2::new(1.0, 1.0),
                ..default()
            },
            0.016,
        );
        assert!((report.target_velocity.length() - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut rig = Rig::standard();
        rig.motor.grounded = false;
        let jump = ControllerInput {
            jump: true,
            ..default()
        };
        let report = rig.frame(jump, 0.02);
        assert!(!report.jumped);
        assert!(rig.controller.vertical_velocity() < 0.0);

        rig.motor.grounded = true;
        let report = rig.frame(jump, 0.02);
        assert!(report.jumped);
        let expected = (2.0 * 1.6 * 13.0_f32).sqrt() - 13.0 * 0.02;
        assert!((rig.controller.vertical_velocity() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_crouch_blend_scenario() {
        // 6 m standing, ratio 0.5 -> 3 m delta at 6 m/s.
        let metrics = BodyMetrics {
            stand_height: 6.0,
            stand_eye_height: 5.0,
            radius: 0.3,
        };
        let mut rig = Rig::new(ControllerProfile::default(), metrics);
        let crouch = ControllerInput {
            crouch: true,
            ..default()
        };
        let dt = 0.0625;
        for frame in 1..=32 {
            rig.frame(crouch, dt);
            let height = rig.controller.current_height();
            assert!((3.0..=6.0).contains(&height));
            if frame >= 8 {
                assert_eq!(height, 3.0, "frame {frame}");
            }
        }
        assert_eq!(rig.controller.posture(), Posture::Crouching);
        assert_eq!(rig.view.translation.y, rig.controller.current_eye_height());
        assert!((rig.view.translation.y - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_suspension_keeps_momentum_pitch_and_gravity() {
        let mut rig = Rig::standard();
        for _ in 0..10 {
            rig.frame(forward(), 0.05);
        }
        // Look up 5 degrees while still moving.
        rig.frame(
            ControllerInput {
                move_axis: Vec2::Y,
                look_delta: Vec2::new(0.0, 100.0),
                ..default()
            },
            0.05,
        );
        let before = rig.controller.horizontal_velocity();
        let pitch = rig.controller.pitch();
        let body_rotation = rig.body.rotation;
        let view_rotation = rig.view.rotation;
        assert!((before.length() - 7.0).abs() < 1e-5);
        assert!((pitch + 5.0).abs() < 1e-5);

        rig.controller.set_allow_movement(false);
        rig.controller.set_allow_look(false);
        // Setting the flags alone changes nothing.
        assert_eq!(rig.controller.horizontal_velocity(), before);
        assert_eq!(rig.controller.pitch(), pitch);

        rig.motor.grounded = false;
        let vy_before = rig.controller.vertical_velocity();
        let report = rig.frame(
            ControllerInput {
                move_axis: Vec2::Y,
                look_delta: Vec2::new(50.0, 50.0),
                ..default()
            },
            0.05,
        );
        assert_eq!(report.target_velocity, Vec3::ZERO);
        // Gravity still integrates while suspended.
        assert!((rig.controller.vertical_velocity() - (vy_before - 13.0 * 0.05)).abs() < 1e-5);
        // Momentum only bleeds off at the deceleration rate.
        let coasting = rig.controller.horizontal_velocity();
        assert!((coasting.length() - (7.0 - 25.0 * 0.05)).abs() < 1e-4);
        assert_eq!(rig.controller.pitch(), pitch);
        assert_eq!(rig.body.rotation, body_rotation);
        assert_eq!(rig.view.rotation, view_rotation);

        // Control resumes from the kept velocity, not from rest.
        rig.controller.set_allow_movement(true);
        rig.controller.set_allow_look(true);
        rig.motor.grounded = true;
        rig.frame(forward(), 0.05);
        let resumed = rig.controller.horizontal_velocity();
        assert!((resumed.length() - (coasting.length() + 20.0 * 0.05)).abs() < 1e-4);
        assert!(resumed.normalize().abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert_eq!(rig.controller.pitch(), pitch);
    }

    #[test]
    fn test_degenerate_dt_is_a_no_op() {
        let mut rig = Rig::standard();
        rig.frame(forward(), 0.1);
        let velocity = rig.controller.horizontal_velocity();
        let vy = rig.controller.vertical_velocity();
        let body = rig.body;

        for dt in [0.0, -0.016, f32::NAN, f32::INFINITY] {
            let report = rig.frame(
                ControllerInput {
                    move_axis: Vec2::Y,
                    look_delta: Vec2::new(10.0, 10.0),
                    crouch: true,
                    jump: true,
                    ..default()
                },
                dt,
            );
            assert!(report.skipped);
        }

        assert_eq!(rig.motor.moves.len(), 1);
        assert_eq!(rig.controller.horizontal_velocity(), velocity);
        assert_eq!(rig.controller.vertical_velocity(), vy);
        assert_eq!(rig.controller.current_height(), 1.8);
        assert_eq!(rig.body, body);
    }

    #[test]
    fn test_cursor_toggle_survives_degenerate_frame() {
        let mut rig = Rig::standard();
        let report = rig.frame(
            ControllerInput {
                toggle_cursor_lock: true,
                ..default()
            },
            0.0,
        );
        assert!(report.skipped && report.cursor_toggled);
        assert!(!rig.controller.cursor_locked());
        assert_eq!(rig.cursor.0, vec![true, false]);
    }

    #[test]
    fn test_focus_loss_keeps_lock_intent() {
        let mut rig = Rig::standard();
        rig.controller.focus_changed(false, &mut rig.cursor);
        assert!(rig.controller.cursor_locked());
        rig.controller.focus_changed(true, &mut rig.cursor);
        assert_eq!(rig.cursor.0, vec![true, false, true]);
    }

    #[test]
    fn test_resolved_displacement_is_reported() {
        let mut rig = Rig::standard();
        let report = rig.frame(forward(), 0.1);
        assert_eq!(report.resolved, report.requested * 0.5);
        assert!(report.grounded);
        // Starting at rest there is nothing to re-seat yet: one gravity step.
        assert!((rig.controller.vertical_velocity() + 1.3).abs() < 1e-5);

        // Now falling while grounded: re-seated, then gravity again.
        rig.frame(forward(), 0.1);
        let expected_vy = GROUND_STICK_VELOCITY - 13.0 * 0.1;
        assert!((rig.controller.vertical_velocity() - expected_vy).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_never_leaves_bounds() {
        let mut rig = Rig::standard();
        let mut look = 1.0_f32;
        for i in 0..200 {
            look = -look * 1.7;
            let dt = if i % 5 == 0 { 0.5 } else { 0.016 };
            rig.frame(
                ControllerInput {
                    look_delta: Vec2::new(look, look * 40.0),
                    ..default()
                },
                dt,
            );
            let pitch = rig.controller.pitch();
            assert!((-80.0..=80.0).contains(&pitch), "pitch {pitch}");
        }
    }
}
