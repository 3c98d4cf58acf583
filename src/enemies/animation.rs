//! Enemy animation systems.
//!
//! The brain writes an [`EnemyAction`] into [`EnemyPose`]; these systems find
//! the model's `AnimationPlayer`, build a graph with one clip per action and
//! start the matching clip whenever the pose changes.

use bevy::animation::{graph::AnimationNodeIndex, AnimationClip, AnimationPlayer, RepeatAnimation};
use bevy::asset::LoadState;
use bevy::prelude::*;

use super::capabilities::Animator;
use super::components::{Enemy, EnemyAction, EnemyPose, EnemyType};
use super::data::{AnimationIndices, EnemyRegistry};

/// Stores animation graph handle and node indices for an enemy.
#[derive(Component)]
pub struct EnemyAnimations {
    pub graph: Handle<AnimationGraph>,
    pub nodes: ActionNodes,
}

/// Graph node for each displayed action.
#[derive(Clone, Copy, Debug)]
pub struct ActionNodes {
    pub idle: AnimationNodeIndex,
    pub walking: AnimationNodeIndex,
    pub chasing: AnimationNodeIndex,
    pub raging: AnimationNodeIndex,
    pub attacking: AnimationNodeIndex,
}

impl ActionNodes {
    pub fn get(&self, action: EnemyAction) -> AnimationNodeIndex {
        match action {
            EnemyAction::Idle => self.idle,
            EnemyAction::Walking => self.walking,
            EnemyAction::Chasing => self.chasing,
            EnemyAction::Raging => self.raging,
            EnemyAction::Attacking => self.attacking,
        }
    }
}

/// Links an enemy entity to its child AnimationPlayer entity.
#[derive(Component)]
pub struct AnimationLink(pub Entity);

/// Marker for enemies awaiting AnimationPlayer discovery.
#[derive(Component)]
pub struct NeedsAnimationSetup;

// Writing through `Mut` only when the action differs keeps `Changed<EnemyPose>`
// quiet while the enemy keeps doing the same thing.
impl Animator for Mut<'_, EnemyPose> {
    fn show(&mut self, action: EnemyAction) {
        if self.action != action {
            self.action = action;
        }
    }

    fn trigger_rage(&mut self) {
        self.action = EnemyAction::Raging;
    }
}

/// Finds AnimationPlayer in scene hierarchy and builds AnimationGraph.
pub fn setup_enemy_animations(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    registry: Res<EnemyRegistry>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    enemy_query: Query<
        (Entity, &EnemyType, &EnemyPose, &SceneRoot, Option<&Children>),
        (With<NeedsAnimationSetup>, With<Enemy>),
    >,
    children_query: Query<&Children>,
    mut animation_player_query: Query<(Entity, &mut AnimationPlayer)>,
) {
    for (enemy_entity, enemy_type, pose, scene, children) in enemy_query.iter() {
        if matches!(asset_server.load_state(scene.0.id()), LoadState::Failed(_)) {
            warn!("Model for {} failed to load; it will not animate", enemy_type.0);
            commands.entity(enemy_entity).remove::<NeedsAnimationSetup>();
            continue;
        }

        // The scene may not have spawned its hierarchy yet
        let Some(player_entity) = children.and_then(|children| {
            find_animation_player_entity(children, &children_query, &animation_player_query)
        }) else {
            continue;
        };

        let Some(definition) = registry.get(&enemy_type.0) else {
            warn!("No definition found for enemy type: {}", enemy_type.0);
            commands.entity(enemy_entity).remove::<NeedsAnimationSetup>();
            continue;
        };

        let (Some(indices), Some(model_path)) = (&definition.animations, &definition.model_path) else {
            commands.entity(enemy_entity).remove::<NeedsAnimationSetup>();
            continue;
        };

        let model_base = model_path.replace("#Scene0", "");
        let (graph, nodes) = build_animation_graph(&asset_server, &model_base, indices);
        let graph_handle = graphs.add(graph);

        commands.entity(player_entity).insert(AnimationGraphHandle(graph_handle.clone()));
        commands.entity(enemy_entity)
            .remove::<NeedsAnimationSetup>()
            .insert((
                AnimationLink(player_entity),
                EnemyAnimations {
                    graph: graph_handle,
                    nodes,
                },
            ));

        // Start the current action right away; the pose may not change again for a while
        if let Ok((_, mut player)) = animation_player_query.get_mut(player_entity) {
            start_action(&mut player, &nodes, pose.action);
        }

        info!("Animation setup complete for enemy: {}", definition.name);
    }
}

/// Recursively search for AnimationPlayer entity in hierarchy.
fn find_animation_player_entity(
    children: &Children,
    children_query: &Query<&Children>,
    animation_player_query: &Query<(Entity, &mut AnimationPlayer)>,
) -> Option<Entity> {
    for &child in children.iter() {
        if animation_player_query.get(child).is_ok() {
            return Some(child);
        }

        if let Ok(grandchildren) = children_query.get(child) {
            if let Some(found) = find_animation_player_entity(grandchildren, children_query, animation_player_query) {
                return Some(found);
            }
        }
    }
    None
}

/// Build animation graph from the clip indices of a model.
fn build_animation_graph(
    asset_server: &AssetServer,
    model_base: &str,
    indices: &AnimationIndices,
) -> (AnimationGraph, ActionNodes) {
    let mut graph = AnimationGraph::new();
    let root = graph.root;

    let mut add = |index: u32| {
        let clip: Handle<AnimationClip> = asset_server.load(format!("{}#Animation{}", model_base, index));
        graph.add_clip(clip, 1.0, root)
    };

    let nodes = ActionNodes {
        idle: add(indices.idle),
        walking: add(indices.walk),
        chasing: add(indices.chase.unwrap_or(indices.walk)),
        raging: add(indices.rage.unwrap_or(indices.attack)),
        attacking: add(indices.attack),
    };

    (graph, nodes)
}

fn start_action(player: &mut AnimationPlayer, nodes: &ActionNodes, action: EnemyAction) {
    player.stop_all();
    let animation = player.start(nodes.get(action));

    if action.is_looping() {
        animation.set_repeat(RepeatAnimation::Forever);
    } else {
        animation.set_repeat(RepeatAnimation::Never);
    }
}

/// Applies EnemyPose changes to the linked AnimationPlayer.
pub fn play_enemy_animations(
    query: Query<(&EnemyPose, &AnimationLink, &EnemyAnimations), Changed<EnemyPose>>,
    mut animation_players: Query<&mut AnimationPlayer>,
) {
    for (pose, link, animations) in query.iter() {
        let Ok(mut player) = animation_players.get_mut(link.0) else {
            continue;
        };
        start_action(&mut player, &animations.nodes, pose.action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_the_same_action_leaves_pose_unchanged() {
        let mut world = World::new();
        let entity = world.spawn(EnemyPose::default()).id();
        world.clear_trackers();

        let mut pose = world.get_mut::<EnemyPose>(entity).unwrap();
        pose.show(EnemyAction::Idle);
        assert!(!world.entity(entity).get_ref::<EnemyPose>().unwrap().is_changed());

        let mut pose = world.get_mut::<EnemyPose>(entity).unwrap();
        pose.show(EnemyAction::Walking);
        let pose = world.entity(entity).get_ref::<EnemyPose>().unwrap();
        assert!(pose.is_changed());
        assert_eq!(pose.action, EnemyAction::Walking);
    }

    #[test]
    fn rage_always_marks_a_change() {
        let mut world = World::new();
        let entity = world.spawn(EnemyPose::default()).id();
        world.clear_trackers();

        let mut pose = world.get_mut::<EnemyPose>(entity).unwrap();
        pose.trigger_rage();
        let pose = world.entity(entity).get_ref::<EnemyPose>().unwrap();
        assert!(pose.is_changed());
        assert_eq!(pose.action, EnemyAction::Raging);
    }

    #[test]
    fn only_rage_plays_once() {
        assert!(EnemyAction::Idle.is_looping());
        assert!(EnemyAction::Attacking.is_looping());
        assert!(!EnemyAction::Raging.is_looping());
    }
}
