//! Player character systems
//!
//! Spawns the local character, bridges the controller to Rapier and the
//! window cursor, and keeps the collision capsule in step with posture.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowFocused};
use bevy_rapier3d::prelude::*;
use shared::{
    BodyMetrics, CharacterMotor, ControllerInput, ControllerProfile, CursorPresenter,
    FirstPersonController, LocalPlayer, PlayerCamera,
};
use rand::seq::SliceRandom;
use rand::Rng;

use super::world::SpawnPoints;
use crate::ui::InventoryOpen;

// =============================================================================
// RESOURCES
// =============================================================================

/// Tuning the local character is built from.
#[derive(Resource, Debug, Clone, Default)]
pub struct ControllerSettings {
    pub profile: ControllerProfile,
    pub metrics: BodyMetrics,
}

const CAMERA_FOV_DEGREES: f32 = 75.0;
const SKIN_WIDTH: f32 = 0.02;

// =============================================================================
// ADAPTERS
// =============================================================================

/// Cursor presenter over the primary window's `CursorOptions`.
pub struct WindowCursor<'w>(pub Option<Mut<'w, CursorOptions>>);

impl CursorPresenter for WindowCursor<'_> {
    fn apply_cursor_lock(&mut self, locked: bool) {
        let Some(cursor) = self.0.as_mut() else {
            return;
        };
        if locked {
            cursor.grab_mode = CursorGrabMode::Locked;
            cursor.visible = false;
        } else {
            cursor.grab_mode = CursorGrabMode::None;
            cursor.visible = true;
        }
    }
}

/// Collision resolver backed by Rapier's kinematic character controller.
///
/// Rapier resolves the sweep during the physics step, after this frame's
/// update has returned. Grounding therefore comes from the previous step's
/// output and `move_by` reports the displacement as requested.
struct RapierMotor<'a> {
    grounded: bool,
    controller: &'a mut KinematicCharacterController,
}

impl CharacterMotor for RapierMotor<'_> {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn move_by(&mut self, displacement: Vec3) -> Vec3 {
        self.controller.translation = Some(displacement);
        displacement
    }
}

// =============================================================================
// BODY SHAPE
// =============================================================================

/// Capsule dimensions `(half_segment, radius)` for a body of `height`.
/// The radius shrinks when the body gets shorter than its diameter.
pub fn capsule_dimensions(height: f32, radius: f32) -> (f32, f32) {
    let radius = radius.min(height * 0.5);
    ((height * 0.5 - radius).max(0.0), radius)
}

/// Feet-anchored capsule for the character controller's sweep.
fn body_shape(controller: &FirstPersonController) -> (Collider, Vec3, Quat) {
    let (half_segment, radius) =
        capsule_dimensions(controller.current_height(), controller.body_metrics().radius);
    (
        Collider::capsule_y(half_segment, radius),
        Vec3::Y * controller.collider_center(),
        Quat::IDENTITY,
    )
}

/// Random spawn point, or the origin when the level has none.
pub fn pick_spawn_point<R: Rng + ?Sized>(points: &[Vec3], rng: &mut R) -> Vec3 {
    points.choose(rng).copied().unwrap_or(Vec3::ZERO)
}

// =============================================================================
// SPAWNING
// =============================================================================

/// Spawn the local character with its camera.
pub fn spawn_player(
    mut commands: Commands,
    settings: Res<ControllerSettings>,
    spawn_points: Option<Res<SpawnPoints>>,
    existing: Query<(), With<LocalPlayer>>,
    mut cursor_opts: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if !existing.is_empty() {
        return;
    }

    let mut cursor = WindowCursor(cursor_opts.single_mut().ok());
    let controller = match FirstPersonController::new(
        settings.profile.clone(),
        settings.metrics,
        &mut cursor,
    ) {
        Ok(controller) => controller,
        Err(err) => {
            error!("Cannot spawn player: {}", err);
            return;
        }
    };

    let points = spawn_points.as_deref().map(|p| p.0.as_slice()).unwrap_or(&[]);
    if points.is_empty() {
        warn!("No spawn points registered, spawning at the origin");
    }
    let position = pick_spawn_point(points, &mut rand::thread_rng());

    let eye_height = controller.current_eye_height();
    let shape = body_shape(&controller);

    commands
        .spawn((
            LocalPlayer,
            controller,
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            KinematicCharacterController {
                custom_shape: Some(shape),
                offset: CharacterLength::Absolute(SKIN_WIDTH),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                PlayerCamera,
                Camera3d::default(),
                Projection::Perspective(PerspectiveProjection {
                    fov: CAMERA_FOV_DEGREES.to_radians(),
                    ..default()
                }),
                Transform::from_xyz(0.0, eye_height, 0.0),
            ));
        });

    info!("Spawned local player at {:?}", position);
}

// =============================================================================
// PER-FRAME
// =============================================================================

/// Run the controller for the local character.
pub fn drive_controller(
    time: Res<Time>,
    input: Res<ControllerInput>,
    mut players: Query<
        (
            &mut FirstPersonController,
            &mut Transform,
            &mut KinematicCharacterController,
            Option<&KinematicCharacterControllerOutput>,
        ),
        (With<LocalPlayer>, Without<PlayerCamera>),
    >,
    mut cameras: Query<&mut Transform, (With<PlayerCamera>, Without<LocalPlayer>)>,
    mut cursor_opts: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok((mut controller, mut body, mut character, output)) = players.single_mut() else {
        return;
    };
    let mut view = cameras.single_mut().ok();
    let mut cursor = WindowCursor(cursor_opts.single_mut().ok());
    let mut motor = RapierMotor {
        grounded: output.is_some_and(|out| out.grounded),
        controller: &mut character,
    };

    let report = controller.update(
        &input,
        time.delta_secs(),
        &mut body,
        view.as_deref_mut(),
        &mut motor,
        &mut cursor,
    );
    if report.skipped {
        return;
    }
    if report.jumped {
        debug!("Jump");
    }

    // Body shape sync
    character.custom_shape = Some(body_shape(&controller));
}

/// Drop the cursor lock while the window is in the background and restore
/// the stored intent when it comes back.
pub fn handle_window_focus(
    mut focus_events: MessageReader<WindowFocused>,
    inventory_open: Res<InventoryOpen>,
    players: Query<&FirstPersonController, With<LocalPlayer>>,
    mut cursor_opts: Query<(Entity, &mut CursorOptions), With<PrimaryWindow>>,
) {
    let Ok(controller) = players.single() else {
        focus_events.clear();
        return;
    };
    let Ok((window, cursor_options)) = cursor_opts.single_mut() else {
        return;
    };
    let mut cursor = WindowCursor(Some(cursor_options));

    for event in focus_events.read() {
        if event.window != window {
            continue;
        }
        // The overlay owns the cursor while it is open.
        if event.focused && inventory_open.0 {
            continue;
        }
        debug!("Window focus: {}", event.focused);
        controller.focus_changed(event.focused, &mut cursor);
    }
}

/// Hand the cursor back once the controller goes away.
pub fn release_cursor_on_despawn(
    mut removed: RemovedComponents<FirstPersonController>,
    mut cursor_opts: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if removed.read().next().is_none() {
        return;
    }
    removed.clear();
    WindowCursor(cursor_opts.single_mut().ok()).apply_cursor_lock(false);
    info!("Controller removed, cursor released");
}

// =============================================================================
// TESTS
// =============================================================================
