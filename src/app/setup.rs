//! Startup scene: a walled yard of static boxes to walk on and hook onto.
//!
//! Every level box is a root entity carrying a `StaticCollider` that matches
//! its mesh, so what the player sees is exactly what the controller collides
//! with and what the hookshot ray can hit.
use bevy::prelude::*;
use bevy_atmosphere::prelude::AtmosphereCamera;
use hookshot::player::{spawn_player, StaticCollider};
use hookshot::settings::Settings;

/// The directional light the sky follows.
#[derive(Component)]
pub struct Sun;

/// Where the player starts.
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 2.0, 12.0);

/// One static box of the level.
#[derive(Debug, Clone, Copy)]
pub struct LevelBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub color: Color,
}

const fn level_box(center: Vec3, half_extents: Vec3, color: Color) -> LevelBox {
    LevelBox { center, half_extents, color }
}

/// The demo yard: ground, perimeter walls, pillars, floating platforms and a
/// high beam that can only be reached with the hookshot.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn level_layout() -> Vec<LevelBox> {
    let ground = Color::srgb(0.32, 0.36, 0.30);
    let wall = Color::srgb(0.55, 0.52, 0.48);
    let pillar = Color::srgb(0.65, 0.45, 0.30);
    let platform = Color::srgb(0.30, 0.45, 0.65);

    let mut boxes = vec![
        level_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(60.0, 0.5, 60.0), ground),
        level_box(Vec3::new(0.0, 6.0, -60.0), Vec3::new(60.0, 6.0, 0.5), wall),
        level_box(Vec3::new(0.0, 6.0, 60.0), Vec3::new(60.0, 6.0, 0.5), wall),
        level_box(Vec3::new(-60.0, 6.0, 0.0), Vec3::new(0.5, 6.0, 60.0), wall),
        level_box(Vec3::new(60.0, 6.0, 0.0), Vec3::new(0.5, 6.0, 60.0), wall),
    ];

    for i in 0..6 {
        let angle = i as f32 * std::f32::consts::TAU / 6.0;
        let height = 6.0 + 3.0 * i as f32;
        let at = Vec3::new(angle.cos() * 30.0, height * 0.5, angle.sin() * 30.0);
        boxes.push(level_box(at, Vec3::new(1.5, height * 0.5, 1.5), pillar));
    }

    for (x, y, z) in [(-15.0, 6.0, -10.0), (12.0, 10.0, -25.0), (25.0, 16.0, 10.0), (-25.0, 22.0, 20.0)] {
        boxes.push(level_box(Vec3::new(x, y, z), Vec3::new(4.0, 0.4, 4.0), platform));
    }

    boxes.push(level_box(Vec3::new(0.0, 40.0, -20.0), Vec3::new(30.0, 0.5, 1.0), wall));
    boxes
}

/// Spawn the level, lights, the player rig and the crosshair.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    let layout = level_layout();
    for b in &layout {
        let size = b.half_extents * 2.0;
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(size.x, size.y, size.z)),
                material: materials.add(StandardMaterial {
                    base_color: b.color,
                    perceptual_roughness: 0.85,
                    ..default()
                }),
                transform: Transform::from_translation(b.center),
                ..default()
            },
            StaticCollider { half_extents: b.half_extents },
        ));
    }
    info!("spawned {} level boxes", layout.len());

    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                shadows_enabled: settings.graphics.shadows,
                illuminance: 9000.0,
                ..default()
            },
            transform: Transform::from_xyz(0.0, 0.0, 0.0)
                .looking_to(Vec3::new(-0.4, -1.0, -0.6), Vec3::Y),
            ..default()
        },
        Sun,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });

    if settings.atmosphere.enabled {
        spawn_player(&mut commands, &mut meshes, &mut materials, &settings, SPAWN_POINT, AtmosphereCamera::default());
    } else {
        spawn_player(&mut commands, &mut meshes, &mut materials, &settings, SPAWN_POINT, ());
    }

    hookshot::ui::spawn_crosshair(&mut commands);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookshot::player::BoxCollider;

    fn colliders() -> Vec<BoxCollider> {
        level_layout()
            .iter()
            .map(|b| BoxCollider::new(b.center, b.half_extents))
            .collect()
    }

    #[test]
    fn spawn_point_is_clear_of_the_level() {
        let body = BoxCollider::new(SPAWN_POINT, Vec3::new(0.4, 0.9, 0.4));
        assert!(colliders().iter().all(|c| !c.overlaps(&body)));
    }

    #[test]
    fn high_beam_is_hookable_from_spawn() {
        let beam = Vec3::new(0.0, 40.0, -20.0);
        let eye = SPAWN_POINT + Vec3::Y * 0.7;
        let hit = hookshot::player::physics::raycast(&colliders(), eye, beam - eye, 500.0);
        assert!(hit.is_some_and(|p| p.y > 38.0));
    }
}
