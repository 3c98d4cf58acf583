//! Enemy AI behavior systems.
//!
//! `tick_enemy_brains` wires each enemy's components and the engine services
//! into its [`EnemyBrain`] once per frame.

use bevy::prelude::*;
use bevy_kira_audio::prelude::{Audio, AudioInstance};
use bevy_rapier3d::prelude::*;

use super::audio::KiraVoice;
use super::brain::{EnemyBrain, Frame};
use super::capabilities::{Blind, Effectors, LineOfSight, RayHit};
use super::components::{Enemy, EnemyPose, EnemySounds, EnemyType, EnemyVoice};
use super::navigation::NavAgent;
use crate::core::EnemyStateChanged;
use crate::player::Player;

/// Debug overlay settings for enemy AI.
#[derive(Resource, Default)]
pub struct AiDebugConfig {
    /// Draw a line from each enemy to the target, red while hostile
    pub show_sight_lines: bool,
}

/// Line of sight through the Rapier query pipeline.
struct RapierSight<'a> {
    context: &'a RapierContext,
    enemy: Entity,
    target: Entity,
}

impl LineOfSight for RapierSight<'_> {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.context
            .cast_ray(
                origin,
                direction,
                max_distance,
                true,
                QueryFilter::default().exclude_collider(self.enemy),
            )
            .map(|(entity, distance)| RayHit {
                distance,
                is_target: entity == self.target,
            })
    }
}

/// Run one state machine step for every enemy.
pub fn tick_enemy_brains(
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    audio: Res<Audio>,
    mut instances: ResMut<Assets<AudioInstance>>,
    rapier_context: Query<&RapierContext>,
    player_query: Query<(Entity, &Transform), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (
            Entity,
            &Transform,
            &mut EnemyBrain,
            &mut NavAgent,
            &mut EnemyPose,
            &mut EnemyVoice,
            &EnemySounds,
        ),
        (With<Enemy>, Without<Player>),
    >,
    mut state_events: EventWriter<EnemyStateChanged>,
) {
    let delta = time.delta_secs();
    // Without exactly one tagged target, detection is disabled.
    let target = player_query.get_single().ok();
    let context = rapier_context.get_single().ok();

    for (entity, transform, mut brain, mut agent, mut pose, mut voice, sounds) in enemy_query.iter_mut() {
        agent.position = transform.translation;

        let frame = Frame {
            delta,
            position: transform.translation,
            target: target.map(|(_, target_transform)| target_transform.translation),
        };

        let rapier_sight = match (context, target) {
            (Some(context), Some((target_entity, _))) => Some(RapierSight {
                context,
                enemy: entity,
                target: target_entity,
            }),
            _ => None,
        };
        let sight: &dyn LineOfSight = match &rapier_sight {
            Some(sight) => sight,
            None => &Blind,
        };

        let mut kira_voice = KiraVoice {
            voice: &mut *voice,
            sounds,
            audio: &*audio,
            instances: &mut *instances,
            asset_server: &asset_server,
        };

        let mut fx = Effectors {
            navigator: &mut *agent,
            animator: &mut pose,
            voice: &mut kira_voice,
            sight,
        };

        if let Some(transition) = brain.tick(&frame, &mut fx) {
            debug!("Enemy {:?}: {:?} -> {:?}", entity, transition.from, transition.to);
            state_events.send(EnemyStateChanged {
                enemy: entity,
                from: transition.from,
                to: transition.to,
            });
        }
    }
}

/// Log when an enemy spots the target.
pub fn announce_detection(
    mut events: EventReader<EnemyStateChanged>,
    enemy_types: Query<&EnemyType>,
) {
    for event in events.read().filter(|event| event.is_detection()) {
        let name = enemy_types
            .get(event.enemy)
            .map(|enemy_type| enemy_type.0.as_str())
            .unwrap_or("enemy");
        info!("Target detected by {} {:?}", name, event.enemy);
    }
}

/// Toggle the sight line overlay with F3.
pub fn toggle_ai_debug(keyboard: Res<ButtonInput<KeyCode>>, mut config: ResMut<AiDebugConfig>) {
    if keyboard.just_pressed(KeyCode::F3) {
        config.show_sight_lines = !config.show_sight_lines;
        info!("AI sight lines: {}", config.show_sight_lines);
    }
}

/// Draw a line from every enemy to the target.
pub fn draw_sight_lines(
    config: Res<AiDebugConfig>,
    mut gizmos: Gizmos,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    enemy_query: Query<(&Transform, &EnemyBrain), With<Enemy>>,
) {
    if !config.show_sight_lines {
        return;
    }
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };

    for (transform, brain) in enemy_query.iter() {
        let color = if brain.state().kind().is_hostile() {
            Color::srgb(1.0, 0.0, 0.0)
        } else {
            Color::srgb(0.0, 1.0, 0.0)
        };
        gizmos.line(transform.translation, player_transform.translation, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::AssetPlugin;
    use bevy::hierarchy::HierarchyPlugin;
    use bevy::scene::ScenePlugin;
    use bevy::transform::TransformPlugin;
    use bevy_kira_audio::AudioPlugin;

    use crate::enemies::brain::EnemyState;
    use crate::enemies::data::EnemyDefinition;
    use crate::enemies::spawn_enemy;

    /// Headless physics world: floor with its top face at y = 0 and the
    /// player standing 7 units in front of the enemy spawn.
    fn crypt_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            ScenePlugin,
            TransformPlugin,
            HierarchyPlugin,
            AudioPlugin,
            RapierPhysicsPlugin::<NoUserData>::default(),
        ))
        .init_asset::<Mesh>()
        .add_event::<EnemyStateChanged>()
        .add_systems(Update, tick_enemy_brains);

        app.world_mut().spawn((
            Transform::from_xyz(0.0, -0.25, 0.0),
            Collider::cuboid(15.0, 0.25, 15.0),
            RigidBody::Fixed,
        ));
        app.world_mut().spawn((
            Player,
            Transform::from_xyz(0.0, 0.81, 7.0),
            Collider::capsule_y(0.5, 0.3),
        ));
        app
    }

    /// Ghoul standing on the floor, walking away from the player.
    fn spawn_ghoul(app: &mut App) {
        let definition = EnemyDefinition::parse(
            "ghoul",
            "ghoul.ron",
            r#"(name: "Ghoul")"#,
        )
        .unwrap();
        let asset_server = app.world().resource::<AssetServer>().clone();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();

        {
            let mut commands = app.world_mut().commands();
            spawn_enemy(
                &mut commands,
                &mut meshes,
                &mut materials,
                &asset_server,
                "ghoul",
                &definition,
                Vec3::ZERO,
                vec![Vec3::new(0.0, 0.0, -8.0)],
                (),
            );
        }
        app.world_mut().flush();
    }

    fn state_after_frames(app: &mut App, frames: usize) -> EnemyState {
        for _ in 0..frames {
            app.update();
        }
        let mut brains = app.world_mut().query::<&EnemyBrain>();
        brains.iter(app.world()).next().unwrap().state()
    }

    #[test]
    fn enemy_on_the_floor_spots_player_in_clear_view() {
        let mut app = crypt_app();
        spawn_ghoul(&mut app);

        assert_eq!(state_after_frames(&mut app, 5), EnemyState::Chase);
    }

    #[test]
    fn wall_between_keeps_enemy_walking() {
        let mut app = crypt_app();
        app.world_mut().spawn((
            Transform::from_xyz(0.0, 1.5, 3.5),
            Collider::cuboid(3.0, 1.5, 0.25),
            RigidBody::Fixed,
        ));
        spawn_ghoul(&mut app);

        assert_eq!(state_after_frames(&mut app, 5), EnemyState::Walk);
    }

    #[test]
    fn sight_reports_target_only_for_the_player_collider() {
        let mut app = crypt_app();
        spawn_ghoul(&mut app);
        for _ in 0..3 {
            app.update();
        }

        let world = app.world_mut();
        let player = world
            .query_filtered::<Entity, With<Player>>()
            .iter(world)
            .next()
            .unwrap();
        let enemy = world
            .query_filtered::<Entity, With<Enemy>>()
            .iter(world)
            .next()
            .unwrap();
        let context = world.query::<&RapierContext>().iter(world).next().unwrap();
        let sight = RapierSight {
            context,
            enemy,
            target: player,
        };

        let eye = Vec3::new(0.0, 1.5, 0.0);
        let toward_player = (Vec3::new(0.0, 0.81, 7.0) - eye).normalize();
        let hit = sight.cast(eye, toward_player, 10.0).unwrap();
        assert!(hit.is_target);

        // Straight down from the feet only finds the floor
        let hit = sight.cast(Vec3::ZERO, Vec3::NEG_Y, 10.0).unwrap();
        assert!(!hit.is_target);
    }
}
