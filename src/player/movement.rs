//! First-person player movement and camera control.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::PlayState;

/// Marker component for the player's camera.
#[derive(Component, Default)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
}

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app
        .add_systems(OnEnter(PlayState::Running), grab_cursor)
        .add_systems(OnExit(PlayState::Running), release_cursor)
        .add_systems(
            Update,
            (
                mouse_look,
                player_movement,
            )
            .run_if(in_state(PlayState::Running))
        );
}

/// Grab and hide cursor when gameplay starts or resumes.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor on pause or when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Handle mouse movement for looking around.
///
/// Rotates the player entity horizontally (yaw) and the camera vertically (pitch).
/// The camera is a child of the player, so horizontal rotation affects both.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut PlayerCamera), (With<Camera3d>, Without<Player>)>,
) {
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let Ok((mut camera_transform, mut camera)) = camera_query.get_single_mut() else {
        return;
    };

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    player_transform.rotate_y(-delta.x * sensitivity);

    // Clamped to prevent flipping
    camera.pitch -= delta.y * sensitivity * y_invert;
    camera.pitch = camera.pitch.clamp(-1.4, 1.4);

    camera_transform.rotation = Quat::from_rotation_x(camera.pitch);
}

/// Read WASD into a unit direction in the player's local space.
fn input_direction(keyboard: &ButtonInput<KeyCode>) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }
    direction.normalize_or_zero()
}

/// Handle WASD movement.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
pub fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(
        &Transform,
        &mut MovementState,
        &mut KinematicCharacterController,
        Option<&KinematicCharacterControllerOutput>,
    ), With<Player>>,
) {
    let Ok((transform, mut movement_state, mut controller, output)) = player_query.get_single_mut() else {
        return;
    };

    // No output before the first physics step; assume grounded
    movement_state.is_grounded = output.map_or(true, |output| output.grounded);
    if movement_state.is_grounded {
        movement_state.vertical_velocity = 0.0;
    } else {
        movement_state.vertical_velocity -= config.gravity * time.delta_secs();
    }

    // Rotate direction to face where player is looking (only horizontal)
    let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
    let movement = Quat::from_rotation_y(yaw) * input_direction(&keyboard);
    let speed = config.speed(keyboard.pressed(KeyCode::ShiftLeft));

    let horizontal = movement * speed * time.delta_secs();
    let vertical = Vec3::new(0.0, movement_state.vertical_velocity * time.delta_secs(), 0.0);

    controller.translation = Some(horizontal + vertical);
}

/// Spawn the player entity with camera.
pub fn spawn_player(commands: &mut Commands, position: Vec3, extra: impl Bundle) -> Entity {
    let player = commands
        .spawn((
            Player,
            MovementState::default(),
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .insert(extra)
        .id();

    commands.entity(player).with_children(|parent| {
        parent.spawn((
            Camera3d::default(),
            PlayerCamera::default(),
            // Eye level relative to the capsule center
            Transform::from_xyz(0.0, 0.4, 0.0),
        ));
    });

    player
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_input_is_normalized() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyD);

        let direction = input_direction(&keyboard);
        assert!((direction.length() - 1.0).abs() < 1e-5);
        assert!(direction.z < 0.0 && direction.x > 0.0);
    }

    #[test]
    fn no_input_means_no_direction() {
        let keyboard = ButtonInput::<KeyCode>::default();
        assert_eq!(input_direction(&keyboard), Vec3::ZERO);
    }

    #[test]
    fn sprint_scales_speed() {
        let config = PlayerConfig::default();
        assert_eq!(config.speed(false), 5.0);
        assert_eq!(config.speed(true), 7.5);
    }
}
