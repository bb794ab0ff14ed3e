//! Shared character simulation: the first-person controller core, its
//! configuration, and the player's loadout.
//!
//! Nothing in here touches windows, rendering or a physics engine. Hosts plug
//! those in through [`CharacterMotor`] and [`CursorPresenter`].

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod loadout;
pub mod locomotion;
pub mod orientation;
pub mod posture;

use bevy::prelude::*;

pub use config::{BodyMetrics, ControllerProfile, MIN_CROUCH_HEIGHT};
pub use controller::{FirstPersonController, FrameReport};
pub use error::{ControllerError, ControllerResult};
pub use input::{ControllerInput, InputSnapshot, PermissionGate};
pub use loadout::{HealKind, ItemCatalog, ItemDef, Loadout, Storage};
pub use locomotion::{CharacterMotor, MovementBasis, GROUND_STICK_VELOCITY};
pub use orientation::CursorPresenter;
pub use posture::Posture;

/// Marks the locally controlled character entity.
#[derive(Component, Debug, Default)]
pub struct LocalPlayer;

/// Marks the camera that acts as the controller's viewing reference.
#[derive(Component, Debug, Default)]
pub struct PlayerCamera;
