//! Enemy-related components.

use bevy::prelude::*;
use bevy_kira_audio::prelude::{AudioInstance, AudioSource};

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// What the enemy is visibly doing. Drives the animation graph.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EnemyAction {
    #[default]
    Idle,
    Walking,
    Chasing,
    /// One-shot rage clip between chasing and attacking.
    Raging,
    Attacking,
}

impl EnemyAction {
    /// Whether the clip for this action repeats.
    pub fn is_looping(self) -> bool {
        !matches!(self, EnemyAction::Raging)
    }
}

/// Sound cues an enemy can emit, one per behaviour.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SoundCue {
    Idle,
    Walking,
    Chasing,
    Rage,
    Attack,
}

/// Current displayed action of an enemy.
#[derive(Component, Default, Debug)]
pub struct EnemyPose {
    pub action: EnemyAction,
}

/// Loaded audio clips for each cue. Missing clips are silent.
#[derive(Component, Clone, Default)]
pub struct EnemySounds {
    pub idle: Option<Handle<AudioSource>>,
    pub walking: Option<Handle<AudioSource>>,
    pub chasing: Option<Handle<AudioSource>>,
    pub rage: Option<Handle<AudioSource>>,
    pub attack: Option<Handle<AudioSource>>,
}

impl EnemySounds {
    pub fn get(&self, cue: SoundCue) -> Option<&Handle<AudioSource>> {
        match cue {
            SoundCue::Idle => self.idle.as_ref(),
            SoundCue::Walking => self.walking.as_ref(),
            SoundCue::Chasing => self.chasing.as_ref(),
            SoundCue::Rage => self.rage.as_ref(),
            SoundCue::Attack => self.attack.as_ref(),
        }
    }
}

/// The enemy's single audio voice: the cue it last started and its instance.
#[derive(Component, Default)]
pub struct EnemyVoice {
    pub current: Option<SoundCue>,
    pub instance: Option<Handle<AudioInstance>>,
}
