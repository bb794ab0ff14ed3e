//! Crosshair
//!
//! Centered dot, hidden while the inventory overlay owns the screen.

use bevy::prelude::*;

use super::inventory::InventoryOpen;

pub struct CrosshairPlugin;

impl Plugin for CrosshairPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_crosshair);
        app.add_systems(Update, update_crosshair_visibility);
    }
}

/// Marker component for the crosshair root
#[derive(Component)]
pub struct Crosshair;

const DOT_SIZE: f32 = 4.0;

fn spawn_crosshair(mut commands: Commands) {
    commands
        .spawn((
            Crosshair,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(DOT_SIZE),
                    height: Val::Px(DOT_SIZE),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
                BorderRadius::all(Val::Px(DOT_SIZE * 0.5)),
            ));
        });
}

fn update_crosshair_visibility(
    inventory_open: Res<InventoryOpen>,
    mut crosshair: Query<&mut Visibility, With<Crosshair>>,
) {
    if !inventory_open.is_changed() {
        return;
    }
    for mut visibility in &mut crosshair {
        *visibility = if inventory_open.0 {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}
