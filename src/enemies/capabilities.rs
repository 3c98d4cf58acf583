//! Engine services the enemy brain drives, expressed as traits.
//!
//! Bevy-backed implementations live next to the systems that own the data
//! (`navigation`, `audio`, `animation`, `ai`); tests plug in plain structs.

use bevy::math::Vec3;

use super::components::{EnemyAction, SoundCue};

/// Path-following agent: accepts a destination and speed, reports progress.
pub trait Navigator {
    fn set_destination(&mut self, destination: Vec3);
    fn set_speed(&mut self, speed: f32);
    /// Halt or resume movement without forgetting the destination.
    fn set_stopped(&mut self, stopped: bool);
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;

    fn has_arrived(&self) -> bool {
        self.remaining_distance() <= self.stopping_distance()
    }
}

/// Sink for the action an enemy is visibly performing.
pub trait Animator {
    fn show(&mut self, action: EnemyAction);
    /// Play the one-shot rage clip.
    fn trigger_rage(&mut self);
}

/// A single voice that plays one cue at a time.
pub trait SoundPlayer {
    fn is_playing(&self) -> bool;
    fn current_cue(&self) -> Option<SoundCue>;
    fn play(&mut self, cue: SoundCue);
}

/// Nearest hit of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit.
    pub distance: f32,
    /// Whether the hit entity carries the target tag.
    pub is_target: bool,
}

/// Ray-intersection query against the physics world.
pub trait LineOfSight {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Line of sight for worlds with nothing to hit (no physics context).
pub struct Blind;

impl LineOfSight for Blind {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }
}

/// Everything one brain tick may touch.
pub struct Effectors<'a> {
    pub navigator: &'a mut dyn Navigator,
    pub animator: &'a mut dyn Animator,
    pub voice: &'a mut dyn SoundPlayer,
    pub sight: &'a dyn LineOfSight,
}
