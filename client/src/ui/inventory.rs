//! Inventory overlay
//!
//! Tab (or I) opens a two-column view of the loadout: what the player
//! carries and what sits in the stash. Clicking an entry moves the whole
//! stack to the other side. While open, movement and look are switched off
//! on the controller and the cursor is freed.

use bevy::prelude::*;
use bevy::window::{CursorOptions, PrimaryWindow};
use shared::{FirstPersonController, ItemCatalog, LocalPlayer, Loadout, Storage};

use super::styles::*;
use crate::input::InputBindings;
use crate::systems::WindowCursor;

/// Plugin for the inventory overlay
pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InventoryOpen>();
        app.add_systems(
            Update,
            (handle_entry_clicks, rebuild_inventory_ui).chain(),
        );
    }
}

/// Resource tracking if the overlay is open
#[derive(Resource, Default)]
pub struct InventoryOpen(pub bool);

/// Marker for the overlay root
#[derive(Component)]
pub struct InventoryUI;

/// A clickable stack in one of the two lists
#[derive(Component, Debug, Clone)]
pub struct InventoryEntry {
    pub storage: Storage,
    pub item_id: String,
}

/// Open/close the overlay and hand the gate and cursor over accordingly.
///
/// Runs before input sampling so the gate is settled for the whole frame.
pub fn toggle_inventory(
    keyboard: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    mut inventory_open: ResMut<InventoryOpen>,
    mut players: Query<&mut FirstPersonController, With<LocalPlayer>>,
    mut cursor_opts: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if !(keyboard.just_pressed(bindings.inventory) || keyboard.just_pressed(bindings.inventory_alt)) {
        return;
    }

    inventory_open.0 = !inventory_open.0;
    let open = inventory_open.0;

    if let Ok(mut controller) = players.single_mut() {
        let mut cursor = WindowCursor(cursor_opts.single_mut().ok());
        controller.set_allow_movement(!open);
        controller.set_allow_look(!open);
        if open {
            controller.release_cursor(&mut cursor);
        } else {
            controller.reapply_cursor(&mut cursor);
        }
    }

    info!("Inventory {}", if open { "opened" } else { "closed" });
}

/// Rebuild the overlay whenever it opens or the loadout changes.
fn rebuild_inventory_ui(
    mut commands: Commands,
    inventory_open: Res<InventoryOpen>,
    loadout: Res<Loadout>,
    catalog: Res<ItemCatalog>,
    existing_ui: Query<Entity, With<InventoryUI>>,
) {
    if !inventory_open.is_changed() && !loadout.is_changed() {
        return;
    }

    for entity in existing_ui.iter() {
        commands.entity(entity).despawn();
    }
    if !inventory_open.0 {
        return;
    }

    commands
        .spawn((
            InventoryUI,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                column_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_children(|parent| {
            spawn_storage_panel(parent, "INVENTORY", Storage::Inventory, &loadout, &catalog);
            spawn_storage_panel(parent, "STASH", Storage::Stash, &loadout, &catalog);
        });

    spawn_hint(&mut commands, &loadout);
}

fn spawn_hint(commands: &mut Commands, loadout: &Loadout) {
    commands.spawn((
        InventoryUI,
        Text::new(format!(
            "Health {}  Shield {}    Click an item to move it    Tab to close",
            loadout.health, loadout.shield
        )),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(TEXT_MUTED),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(24.0),
            left: Val::Px(24.0),
            ..default()
        },
    ));
}

fn spawn_storage_panel(
    parent: &mut ChildSpawnerCommands,
    title: &str,
    storage: Storage,
    loadout: &Loadout,
    catalog: &ItemCatalog,
) {
    parent
        .spawn((
            Node {
                width: Val::Px(320.0),
                min_height: Val::Px(260.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(16.0)),
                border: UiRect::all(Val::Px(3.0)),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            BorderColor::from(PANEL_BORDER),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(title),
                panel_title_style(),
                TextColor(ACCENT_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(12.0)),
                    ..default()
                },
            ));

            let mut any = false;
            for (id, amount) in loadout.entries(storage) {
                any = true;
                spawn_entry(panel, storage, id, amount, catalog);
            }
            if !any {
                panel.spawn((
                    Text::new("Empty"),
                    entry_text_style(),
                    TextColor(TEXT_MUTED),
                ));
            }
        });
}

fn spawn_entry(
    parent: &mut ChildSpawnerCommands,
    storage: Storage,
    id: &str,
    amount: u32,
    catalog: &ItemCatalog,
) {
    let tint = catalog
        .get(id)
        .map(|item| item.color())
        .unwrap_or(TEXT_MUTED);

    parent
        .spawn((
            InventoryEntry {
                storage,
                item_id: id.to_string(),
            },
            Button,
            entry_button_style(),
            BackgroundColor(BUTTON_NORMAL),
            BorderColor::from(tint),
        ))
        .with_children(|row| {
            row.spawn((
                Text::new(catalog.label(id).to_string()),
                entry_text_style(),
                TextColor(TEXT_COLOR),
            ));
            row.spawn((
                Text::new(format!("{}x", amount)),
                entry_text_style(),
                TextColor(tint),
            ));
        });
}

/// Move a stack when its entry is clicked.
fn handle_entry_clicks(
    mut interaction_query: Query<
        (&Interaction, &InventoryEntry, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut loadout: ResMut<Loadout>,
) {
    for (interaction, entry, mut color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                *color = BUTTON_PRESSED.into();
                if let Err(err) = loadout.transfer(entry.storage, &entry.item_id) {
                    warn!("Transfer failed: {}", err);
                }
            }
            Interaction::Hovered => {
                *color = BUTTON_HOVERED.into();
            }
            Interaction::None => {
                *color = BUTTON_NORMAL.into();
            }
        }
    }
}
