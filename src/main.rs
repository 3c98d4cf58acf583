//! Crypt Warden - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Shift: Sprint
//! - Escape: Pause/Unpause
//! - F3: Toggle enemy sight lines
//! - F5: Restart the level

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Crypt Warden".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics and audio
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(AudioPlugin)

        .add_plugins(crypt_warden::CryptWardenPlugin)

        .run();
}
