//! First-person sandbox client
//!
//! Single-player test level for the character controller: walk, sprint,
//! crouch, jump and look around, with a loadout overlay on Tab.

mod input;
mod systems;
mod ui;

use std::path::PathBuf;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use shared::{BodyMetrics, ControllerInput, ControllerProfile, ItemCatalog, Loadout};

const PROFILE_FILE: &str = "controller.ron";

/// Asset folder: next to the executable for bundled apps, the crate's own
/// `assets/` under cargo, or `assets` relative to the working directory.
fn get_asset_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                info!("Using bundled assets at: {:?}", bundled_assets);
                return bundled_assets;
            }
        }
    }
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        return PathBuf::from(manifest_dir).join("assets");
    }
    PathBuf::from("assets")
}

fn main() {
    let asset_path = get_asset_path();

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "First-Person Sandbox".to_string(),
                    resolution: WindowResolution::new(1280, 720),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path.to_string_lossy().to_string(),
                ..default()
            }),
    );
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());

    // Tuning is read once; a missing or broken file falls back to defaults.
    let profile = ControllerProfile::load_or_default(asset_path.join(PROFILE_FILE));
    app.insert_resource(systems::ControllerSettings {
        profile,
        metrics: BodyMetrics::default(),
    });

    let catalog = ItemCatalog::default();
    app.insert_resource(Loadout::seeded(&catalog));
    app.insert_resource(catalog);

    app.init_resource::<input::InputBindings>();
    app.init_resource::<ControllerInput>();

    // UI plugins
    app.add_plugins(ui::InventoryPlugin);
    app.add_plugins(ui::CrosshairPlugin);

    app.add_systems(Startup, (systems::spawn_world, systems::spawn_player).chain());

    // ORDER MATTERS: the overlay settles the permission gate, then input is
    // sampled, then the controller runs once.
    app.add_systems(
        Update,
        (
            ui::toggle_inventory,
            input::read_controller_input,
            systems::drive_controller,
        )
            .chain(),
    );
    app.add_systems(
        Update,
        (
            systems::handle_window_focus,
            systems::release_cursor_on_despawn,
        ),
    );

    info!("Starting first-person sandbox");
    app.run();
}
