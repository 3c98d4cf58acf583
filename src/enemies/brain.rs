//! Enemy decision making: a five-state machine ticked once per frame.
//!
//! The brain never touches the ECS. Movement, animation, audio and ray casts
//! go through the traits in [`super::capabilities`], so the whole machine can
//! run against plain structs.
//!
//! ```text
//!          timer            arrived
//!   Idle ---------> Walk ----------> Idle
//!     \              |
//!      \   sighted   |  sighted
//!       +--------> Chase <-------------------+
//!                  |   \                     |
//!       <= rage    |    \ > sight -> Walk    | attack < d < sight
//!                  v                         |
//!                 Rage --(delay)--> Attack --+
//!                                     \ >= sight -> Walk
//! ```

use bevy::prelude::*;
use serde::Deserialize;

use super::capabilities::{Effectors, LineOfSight, Navigator, SoundPlayer};
use super::components::{EnemyAction, SoundCue};
use crate::world::DataLoadError;

/// Tunable thresholds and speeds for one enemy type.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrainConfig {
    /// Seconds spent idling at a waypoint before walking to the next one
    pub idle_time: f32,
    pub walk_speed: f32,
    pub chase_speed: f32,
    /// Line-of-sight range, and the distance at which a chase is abandoned
    pub sight_distance: f32,
    pub rage_distance: f32,
    pub attack_distance: f32,
    /// Length of the rage pause in seconds
    pub rage_duration: f32,
    /// Height above the feet that sight rays start from
    pub eye_height: f32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            idle_time: 2.0,
            walk_speed: 2.0,
            chase_speed: 4.0,
            sight_distance: 10.0,
            rage_distance: 5.0,
            attack_distance: 2.0,
            rage_duration: 1.5,
            eye_height: 1.5,
        }
    }
}

impl BrainConfig {
    /// Reject negative or non-finite values.
    pub fn validate(&self, enemy: &str) -> Result<(), DataLoadError> {
        let fields = [
            ("idle_time", self.idle_time),
            ("walk_speed", self.walk_speed),
            ("chase_speed", self.chase_speed),
            ("sight_distance", self.sight_distance),
            ("rage_distance", self.rage_distance),
            ("attack_distance", self.attack_distance),
            ("rage_duration", self.rage_duration),
            ("eye_height", self.eye_height),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DataLoadError::InvalidTuning {
                    enemy: enemy.to_string(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Patrol route visited round-robin.
#[derive(Clone, Debug, Default)]
pub struct Patrol {
    waypoints: Vec<Vec3>,
    index: usize,
}

impl Patrol {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.index).copied()
    }

    /// Step to the next waypoint, wrapping at the end of the route.
    pub fn advance(&mut self) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.waypoints.len();
        self.current()
    }
}

/// Countdown of an in-progress rage pause.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RageEpisode {
    /// Seconds left before the enemy attacks
    pub remaining: f32,
}

/// The active behaviour. Rage carries its own countdown, so a rage episode
/// cannot be started twice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyState {
    Idle,
    Walk,
    Chase,
    Rage(RageEpisode),
    Attack,
}

/// Fieldless mirror of [`EnemyState`] for events and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyStateKind {
    Idle,
    Walk,
    Chase,
    Rage,
    Attack,
}

impl EnemyState {
    pub fn kind(&self) -> EnemyStateKind {
        match self {
            EnemyState::Idle => EnemyStateKind::Idle,
            EnemyState::Walk => EnemyStateKind::Walk,
            EnemyState::Chase => EnemyStateKind::Chase,
            EnemyState::Rage(_) => EnemyStateKind::Rage,
            EnemyState::Attack => EnemyStateKind::Attack,
        }
    }
}

impl EnemyStateKind {
    /// Chasing or raging: the enemy has committed to the target.
    pub fn is_hostile(self) -> bool {
        matches!(self, EnemyStateKind::Chase | EnemyStateKind::Rage)
    }
}

/// A change of state produced by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: EnemyStateKind,
    pub to: EnemyStateKind,
}

/// Per-tick inputs.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    /// Seconds since the previous tick
    pub delta: f32,
    pub position: Vec3,
    /// Target position, or `None` when there is nothing to hunt
    pub target: Option<Vec3>,
}

impl Frame {
    pub fn distance_to_target(&self) -> Option<f32> {
        self.target.map(|target| self.position.distance(target))
    }
}

/// Enemy finite state machine.
#[derive(Component, Clone, Debug)]
pub struct EnemyBrain {
    config: BrainConfig,
    patrol: Patrol,
    state: EnemyState,
    idle_timer: f32,
}

impl EnemyBrain {
    /// Build a brain and send it toward its first waypoint. Without waypoints
    /// the enemy stands guard in Idle.
    pub fn start(config: BrainConfig, patrol: Patrol, navigator: &mut dyn Navigator) -> Self {
        let mut brain = Self {
            config,
            patrol,
            state: EnemyState::Idle,
            idle_timer: 0.0,
        };
        brain.head_to_waypoint(navigator);
        brain
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn idle_timer(&self) -> f32 {
        self.idle_timer
    }

    pub fn patrol(&self) -> &Patrol {
        &self.patrol
    }

    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    /// Evaluate one frame. Returns the transition, if the state changed.
    pub fn tick(&mut self, frame: &Frame, fx: &mut Effectors<'_>) -> Option<Transition> {
        let from = self.state.kind();

        if !matches!(self.state, EnemyState::Idle) {
            self.idle_timer = 0.0;
        }

        match self.state {
            EnemyState::Idle => self.idle(frame, fx),
            EnemyState::Walk => self.walk(frame, fx),
            EnemyState::Chase => self.chase(frame, fx),
            EnemyState::Rage(episode) => self.rage(frame, episode, fx),
            EnemyState::Attack => self.attack(frame, fx),
        }

        let to = self.state.kind();
        (from != to).then_some(Transition { from, to })
    }

    fn idle(&mut self, frame: &Frame, fx: &mut Effectors<'_>) {
        self.idle_timer = (self.idle_timer + frame.delta).min(self.config.idle_time);
        fx.animator.show(EnemyAction::Idle);
        cue(fx.voice, SoundCue::Idle);

        if self.idle_timer >= self.config.idle_time && self.patrol.advance().is_some() {
            self.head_to_waypoint(fx.navigator);
        }

        // Evaluated last so sighting the target wins over the timer.
        self.look_for_target(frame, fx.sight);
    }

    fn walk(&mut self, frame: &Frame, fx: &mut Effectors<'_>) {
        fx.animator.show(EnemyAction::Walking);
        cue(fx.voice, SoundCue::Walking);

        if fx.navigator.has_arrived() {
            self.state = EnemyState::Idle;
        }

        self.look_for_target(frame, fx.sight);
    }

    fn chase(&mut self, frame: &Frame, fx: &mut Effectors<'_>) {
        let (Some(target), Some(distance)) = (frame.target, frame.distance_to_target()) else {
            self.give_up_chase(fx.navigator);
            return;
        };

        fx.navigator.set_speed(self.config.chase_speed);
        fx.navigator.set_destination(target);
        fx.animator.show(EnemyAction::Chasing);
        cue(fx.voice, SoundCue::Chasing);

        if distance <= self.config.rage_distance {
            self.begin_rage(fx);
        } else if distance > self.config.sight_distance {
            self.give_up_chase(fx.navigator);
        }
    }

    fn rage(&mut self, frame: &Frame, episode: RageEpisode, fx: &mut Effectors<'_>) {
        let remaining = episode.remaining - frame.delta;
        if remaining <= 0.0 {
            fx.navigator.set_stopped(false);
            self.state = EnemyState::Attack;
        } else {
            self.state = EnemyState::Rage(RageEpisode { remaining });
        }
    }

    fn attack(&mut self, frame: &Frame, fx: &mut Effectors<'_>) {
        fx.navigator.set_destination(frame.position);
        fx.animator.show(EnemyAction::Attacking);
        cue(fx.voice, SoundCue::Attack);

        let Some(distance) = frame.distance_to_target() else {
            self.give_up_chase(fx.navigator);
            return;
        };

        if distance > self.config.attack_distance && distance < self.config.sight_distance {
            fx.navigator.set_speed(self.config.chase_speed);
            self.state = EnemyState::Chase;
        } else if distance >= self.config.sight_distance {
            self.give_up_chase(fx.navigator);
        }
    }

    /// One-shot entry into Rage: halt, roar, start the countdown.
    fn begin_rage(&mut self, fx: &mut Effectors<'_>) {
        fx.navigator.set_stopped(true);
        fx.animator.trigger_rage();
        cue(fx.voice, SoundCue::Rage);
        self.state = EnemyState::Rage(RageEpisode {
            remaining: self.config.rage_duration,
        });
    }

    /// Drop back to patrol pace. The destination is left at the last place
    /// the target was seen.
    fn give_up_chase(&mut self, navigator: &mut dyn Navigator) {
        navigator.set_speed(self.config.walk_speed);
        self.state = EnemyState::Walk;
    }

    fn head_to_waypoint(&mut self, navigator: &mut dyn Navigator) {
        let Some(waypoint) = self.patrol.current() else {
            return;
        };
        navigator.set_speed(self.config.walk_speed);
        navigator.set_destination(waypoint);
        self.state = EnemyState::Walk;
    }

    fn look_for_target(&mut self, frame: &Frame, sight: &dyn LineOfSight) {
        if self.can_see_target(frame, sight) {
            self.state = EnemyState::Chase;
        }
    }

    fn can_see_target(&self, frame: &Frame, sight: &dyn LineOfSight) -> bool {
        let Some(target) = frame.target else {
            return false;
        };
        // Standing on the target: nothing can be in between.
        if target == frame.position {
            return true;
        }

        // Rays leave from the eyes, clear of the floor
        let eye = frame.position + Vec3::Y * self.config.eye_height;
        let Some(direction) = (target - eye).try_normalize() else {
            return true;
        };

        sight
            .cast(eye, direction, self.config.sight_distance)
            .is_some_and(|hit| hit.is_target)
    }
}

/// Start `cue` unless it is already the one playing.
fn cue(voice: &mut dyn SoundPlayer, cue: SoundCue) {
    if !voice.is_playing() || voice.current_cue() != Some(cue) {
        voice.play(cue);
    }
}
