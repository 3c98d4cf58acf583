//! Straight-line steering standing in for a navmesh agent.
//!
//! Agents move on the XZ plane toward their destination and turn to face the
//! direction of travel. Obstacle avoidance is left to level layout.

use bevy::prelude::*;

use super::capabilities::Navigator;

/// Movement state of a path-following enemy.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    /// Last known world position, synced before the brain ticks
    pub position: Vec3,
    pub destination: Vec3,
    pub speed: f32,
    pub stopped: bool,
    pub stopping_distance: f32,
}

impl NavAgent {
    pub fn new(position: Vec3, stopping_distance: f32) -> Self {
        Self {
            position,
            destination: position,
            speed: 0.0,
            stopped: false,
            stopping_distance,
        }
    }

    /// Horizontal offset from the agent to its destination.
    fn offset(&self) -> Vec3 {
        let offset = self.destination - self.position;
        Vec3::new(offset.x, 0.0, offset.z)
    }

    /// Translation to apply this frame, never overshooting the destination.
    pub fn step(&self, delta: f32) -> Vec3 {
        if self.stopped || self.has_arrived() {
            return Vec3::ZERO;
        }
        let offset = self.offset();
        let distance = offset.length();
        let travel = (self.speed * delta).min(distance);
        offset.normalize_or_zero() * travel
    }
}

impl Navigator for NavAgent {
    fn set_destination(&mut self, destination: Vec3) {
        self.destination = destination;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn remaining_distance(&self) -> f32 {
        self.offset().length()
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}

/// Move every agent toward its destination and face the way it is going.
pub fn drive_nav_agents(time: Res<Time>, mut query: Query<(&mut Transform, &mut NavAgent)>) {
    let delta = time.delta_secs();

    for (mut transform, mut agent) in query.iter_mut() {
        agent.position = transform.translation;
        let movement = agent.step(delta);
        if movement == Vec3::ZERO {
            continue;
        }

        transform.translation += movement;
        agent.position = transform.translation;

        let look_target = transform.translation + movement;
        transform.look_at(look_target, Vec3::Y);
        // Rotate 180° because model's forward is +Z, not -Z
        transform.rotate_y(std::f32::consts::PI);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_is_clamped_to_destination() {
        let mut agent = NavAgent::new(Vec3::ZERO, 0.1);
        agent.set_destination(Vec3::new(1.0, 0.0, 0.0));
        agent.set_speed(4.0);

        let step = agent.step(1.0);
        assert!((step - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn stopped_agent_does_not_move() {
        let mut agent = NavAgent::new(Vec3::ZERO, 0.1);
        agent.set_destination(Vec3::new(5.0, 0.0, 0.0));
        agent.set_speed(2.0);
        agent.set_stopped(true);

        assert_eq!(agent.step(0.5), Vec3::ZERO);
        agent.set_stopped(false);
        assert!(agent.step(0.5).x > 0.0);
    }

    #[test]
    fn remaining_distance_ignores_height() {
        let mut agent = NavAgent::new(Vec3::new(0.0, 1.0, 0.0), 0.5);
        agent.set_destination(Vec3::new(0.0, 0.0, 0.3));

        assert!((agent.remaining_distance() - 0.3).abs() < 1e-5);
        assert!(agent.has_arrived());
    }

    #[test]
    fn drive_system_moves_toward_destination() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, drive_nav_agents);

        let mut agent = NavAgent::new(Vec3::ZERO, 0.1);
        agent.set_destination(Vec3::new(0.0, 0.0, 10.0));
        agent.set_speed(1000.0);
        let entity = app
            .world_mut()
            .spawn((Transform::default(), agent))
            .id();

        // First update has zero delta; later ones advance the clock.
        for _ in 0..5 {
            std::thread::sleep(std::time::Duration::from_millis(5));
            app.update();
        }

        let translation = app.world().get::<Transform>(entity).unwrap().translation;
        assert!(translation.z > 0.0);
        assert!(translation.z <= 10.0 + 1e-4);
    }
}
