//! World systems
//!
//! Static test level: floor, a few crates to collide with, a low beam to
//! crouch under, and the spawn points the player picks from.

use bevy::light::CascadeShadowConfigBuilder;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Candidate spawn positions (feet) for the local player.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpawnPoints(pub Vec<Vec3>);

/// Root entity for all level geometry
#[derive(Component)]
pub struct LevelRoot;

const FLOOR_HALF_EXTENT: f32 = 40.0;

/// (center, half extents) of every static box in the level.
const CRATES: [(Vec3, Vec3); 5] = [
    (Vec3::new(4.0, 0.5, -6.0), Vec3::new(0.5, 0.5, 0.5)),
    (Vec3::new(-3.0, 0.75, -9.0), Vec3::new(1.5, 0.75, 0.75)),
    (Vec3::new(0.0, 0.25, -14.0), Vec3::new(2.0, 0.25, 2.0)),
    (Vec3::new(8.0, 1.5, 2.0), Vec3::new(0.5, 1.5, 4.0)),
    (Vec3::new(-8.0, 0.15, 3.0), Vec3::new(1.0, 0.15, 1.0)),
];

/// Beam resting on two posts; the gap underneath only fits a crouched body.
const BEAM_CENTER: Vec3 = Vec3::new(0.0, 1.35, 6.0);
const BEAM_HALF_EXTENTS: Vec3 = Vec3::new(2.5, 0.15, 0.5);

/// Spawn the level and register its spawn points.
pub fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.42, 0.40, 0.36),
        perceptual_roughness: 0.95,
        ..default()
    });
    let crate_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.38, 0.20),
        perceptual_roughness: 0.8,
        ..default()
    });

    let root = commands
        .spawn((LevelRoot, Transform::default(), Visibility::default()))
        .id();

    // --- Floor ---
    let floor = commands
        .spawn((
            Mesh3d(meshes.add(
                Plane3d::default()
                    .mesh()
                    .size(FLOOR_HALF_EXTENT * 2.0, FLOOR_HALF_EXTENT * 2.0),
            )),
            MeshMaterial3d(floor_material),
            Transform::default(),
        ))
        .with_children(|floor| {
            // Slab collider with its top face flush with the rendered plane.
            floor.spawn((
                Transform::from_xyz(0.0, -0.5, 0.0),
                Collider::cuboid(FLOOR_HALF_EXTENT, 0.5, FLOOR_HALF_EXTENT),
            ));
        })
        .id();
    commands.entity(root).add_child(floor);

    // --- Crates and the crouch beam ---
    let mut boxes: Vec<(Vec3, Vec3)> = CRATES.to_vec();
    boxes.push((BEAM_CENTER, BEAM_HALF_EXTENTS));
    let post_half = Vec3::new(0.15, (BEAM_CENTER.y - BEAM_HALF_EXTENTS.y) * 0.5, 0.15);
    for side in [-1.0, 1.0] {
        let x = BEAM_CENTER.x + side * (BEAM_HALF_EXTENTS.x - post_half.x);
        boxes.push((Vec3::new(x, post_half.y, BEAM_CENTER.z), post_half));
    }

    for (center, half) in boxes {
        let entity = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::from_size(half * 2.0))),
                MeshMaterial3d(crate_material.clone()),
                Transform::from_translation(center),
                Collider::cuboid(half.x, half.y, half.z),
            ))
            .id();
        commands.entity(root).add_child(entity);
    }

    // --- Light ---
    let sun = commands
        .spawn((
            DirectionalLight {
                illuminance: 12_000.0,
                shadows_enabled: true,
                color: Color::srgb(1.0, 0.97, 0.92),
                ..default()
            },
            CascadeShadowConfigBuilder {
                num_cascades: 2,
                maximum_distance: 60.0,
                first_cascade_far_bound: 10.0,
                ..default()
            }
            .build(),
            Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
        ))
        .id();
    commands.entity(root).add_child(sun);

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.88, 1.0),
        brightness: 250.0,
        affects_lightmapped_meshes: true,
    });
    commands.insert_resource(ClearColor(Color::srgb(0.55, 0.68, 0.85)));

    commands.insert_resource(SpawnPoints(vec![
        Vec3::new(0.0, 0.05, 0.0),
        Vec3::new(-5.0, 0.05, -2.0),
        Vec3::new(5.0, 0.05, 10.0),
    ]));

    info!("Level spawned ({} static boxes)", CRATES.len() + 3);
}
