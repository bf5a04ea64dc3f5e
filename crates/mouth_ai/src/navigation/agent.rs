//! NavAgent — headless реализация NavigationAgent port.

use bevy::prelude::*;

use super::NavigationError;
use crate::ai::ports::NavigationAgent;

/// Axis-aligned navigable область (всё вне неё — unreachable).
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct NavBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl NavBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// Навигационный агент (straight-line, без obstacle avoidance)
///
/// Архитектура:
/// - behavior пишет destination через `NavigationAgent::set_destination`
/// - путь "резолвится" `path_latency_ticks` fixed тиков (path_pending == true)
/// - drive_nav_agents двигает Transform к destination со скоростью `speed`
///   и останавливается в пределах `stopping_distance`
///
/// Пока путь pending, remaining_distance == INFINITY (как у настоящего navmesh
/// агента: до резолва пути дистанция невалидна).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub speed: f32,
    pub stopping_distance: f32,
    /// Сколько fixed тиков путь остаётся pending после set_destination
    pub path_latency_ticks: u32,
    /// Высота navigable surface (sample_position проецирует сюда)
    pub ground_height: f32,
    pub bounds: Option<NavBounds>,

    destination: Option<Vec3>,
    pending_ticks: u32,
    position: Vec3,
    velocity: Vec3,
    remaining: f32,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            speed: 3.5,
            stopping_distance: 0.5,
            path_latency_ticks: 1,
            ground_height: 0.0,
            bounds: None,
            destination: None,
            pending_ticks: 0,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            remaining: 0.0,
        }
    }
}

impl NavAgent {
    pub fn new(stopping_distance: f32) -> Self {
        Self {
            stopping_distance: stopping_distance.max(0.0),
            ..default()
        }
    }

    pub fn with_latency(mut self, ticks: u32) -> Self {
        self.path_latency_ticks = ticks;
        self
    }

    pub fn with_bounds(mut self, bounds: NavBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Синхронизация с Transform (Transform authoritative для позиции).
    pub fn sync_position(&mut self, position: Vec3) {
        self.position = position;
        if !self.path_pending() {
            self.remaining = self.measure_remaining();
        }
    }

    /// Один fixed тик навигации. Возвращает новую позицию агента.
    ///
    /// Пока путь pending, агент продолжает движение (repath не останавливает
    /// погоню), но remaining_distance остаётся невалидной.
    pub fn advance(&mut self, delta: f32) -> Vec3 {
        self.pending_ticks = self.pending_ticks.saturating_sub(1);

        let Some(destination) = self.destination else {
            self.velocity = Vec3::ZERO;
            return self.position;
        };

        let offset = destination - self.position;
        let distance = offset.length();

        if distance <= self.stopping_distance || distance <= f32::EPSILON {
            self.velocity = Vec3::ZERO;
        } else {
            let direction = offset / distance;
            let step = (self.speed * delta).min(distance);
            self.position += direction * step;
            self.velocity = direction * self.speed;
        }

        self.remaining = if self.path_pending() {
            f32::INFINITY
        } else {
            self.measure_remaining()
        };

        self.position
    }

    fn measure_remaining(&self) -> f32 {
        self.destination
            .map(|destination| self.position.distance(destination))
            .unwrap_or(0.0)
    }
}

impl NavigationAgent for NavAgent {
    fn set_destination(&mut self, point: Vec3) -> Result<(), NavigationError> {
        if !point.is_finite() {
            return Err(NavigationError::NonFinite);
        }
        // Destination всегда на navigable surface
        let point = Vec3::new(point.x, self.ground_height, point.z);
        if let Some(bounds) = self.bounds {
            if !bounds.contains(point) {
                return Err(NavigationError::Unreachable { point });
            }
        }

        self.destination = Some(point);
        if self.path_latency_ticks > 0 {
            self.pending_ticks = self.path_latency_ticks;
            self.remaining = f32::INFINITY;
        } else {
            self.pending_ticks = 0;
            self.remaining = self.measure_remaining();
        }
        Ok(())
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn path_pending(&self) -> bool {
        self.pending_ticks > 0
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        if !point.is_finite() {
            return None;
        }

        let mut projected = Vec3::new(point.x, self.ground_height, point.z);
        if let Some(bounds) = self.bounds {
            projected = bounds.clamp(projected);
        }

        (projected.distance(point) <= max_distance).then_some(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_pending_until_latency_elapses() {
        let mut agent = NavAgent::new(0.5).with_latency(2);
        agent.set_speed(5.0);
        agent.set_destination(Vec3::new(10.0, 0.0, 0.0)).unwrap();

        assert!(agent.path_pending());
        assert_eq!(agent.remaining_distance(), f32::INFINITY);

        agent.advance(0.5);
        assert!(agent.path_pending());
        assert_eq!(agent.remaining_distance(), f32::INFINITY);

        // Движение не ждёт резолва пути
        agent.advance(0.5);
        assert!(!agent.path_pending());
        assert_eq!(agent.position(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(agent.remaining_distance(), 5.0);
    }

    #[test]
    fn test_destination_projected_to_ground() {
        let mut agent = NavAgent::new(0.5).with_latency(0);
        agent.set_destination(Vec3::new(4.0, 1.6, 0.0)).unwrap();

        assert_eq!(agent.destination(), Some(Vec3::new(4.0, 0.0, 0.0)));
        assert_eq!(agent.remaining_distance(), 4.0);
    }

    #[test]
    fn test_agent_stops_within_stopping_distance() {
        let mut agent = NavAgent::new(0.5).with_latency(0);
        agent.set_speed(4.0);
        agent.set_destination(Vec3::new(2.0, 0.0, 0.0)).unwrap();

        for _ in 0..20 {
            agent.advance(0.1);
        }

        assert!(agent.remaining_distance() <= agent.stopping_distance());
        assert_eq!(agent.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_destination_outside_bounds_is_unreachable() {
        let bounds = NavBounds::new(Vec3::splat(-5.0), Vec3::splat(5.0));
        let mut agent = NavAgent::new(0.5).with_bounds(bounds);

        let result = agent.set_destination(Vec3::new(50.0, 0.0, 0.0));

        assert!(matches!(result, Err(NavigationError::Unreachable { .. })));
        assert_eq!(agent.destination(), None);
    }

    #[test]
    fn test_non_finite_destination_rejected() {
        let mut agent = NavAgent::default();
        assert_eq!(
            agent.set_destination(Vec3::new(f32::NAN, 0.0, 0.0)),
            Err(NavigationError::NonFinite)
        );
    }

    #[test]
    fn test_sample_position_projects_to_ground() {
        let agent = NavAgent::default();

        let sampled = agent.sample_position(Vec3::new(3.0, 0.8, -2.0), 5.0);
        assert_eq!(sampled, Some(Vec3::new(3.0, 0.0, -2.0)));

        // Слишком высоко над surface
        assert_eq!(agent.sample_position(Vec3::new(0.0, 10.0, 0.0), 1.0), None);
    }
}
