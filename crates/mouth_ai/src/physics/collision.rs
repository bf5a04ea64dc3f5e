//! Collision world: snapshot тел на текущий тик + SpatialQuery поверх него.

use bevy::math::bounding::{Aabb3d, BoundingSphere, IntersectsVolume, RayCast3d};
use bevy::prelude::*;

use crate::ai::ports::SpatialQuery;

/// Форма тела для spatial queries (axis-aligned, rotation игнорируется)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub enum Collider {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius: radius.max(0.0),
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Cuboid {
            half_extents: half_extents.abs(),
        }
    }
}

/// Маркер: тело принадлежит цели (аналог tag/layer mask игрока)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TargetTag;

/// Bounding volume тела в мировых координатах
#[derive(Debug, Clone, Copy)]
enum Volume {
    Sphere(BoundingSphere),
    Box(Aabb3d),
}

impl Volume {
    fn new(center: Vec3, shape: Collider) -> Self {
        match shape {
            Collider::Sphere { radius } => Volume::Sphere(BoundingSphere::new(center, radius)),
            Collider::Cuboid { half_extents } => Volume::Box(Aabb3d::new(center, half_extents)),
        }
    }

    fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        match self {
            Volume::Sphere(volume) => volume.intersects(sphere),
            Volume::Box(volume) => volume.intersects(sphere),
        }
    }

    /// Точка внутри (или на границе) тела
    fn contains_point(&self, point: Vec3) -> bool {
        self.intersects_sphere(&BoundingSphere::new(point, 0.0))
    }

    /// Дистанция входа луча. Луч, стартующий внутри тела, его не видит
    /// (так eye-луч агента не цепляет собственный collider).
    fn ray_entry(&self, ray: &RayCast3d) -> Option<f32> {
        if self.contains_point(Vec3::from(ray.origin)) {
            return None;
        }

        match self {
            Volume::Sphere(volume) => ray.sphere_intersection_at(volume),
            Volume::Box(volume) => ray.aabb_intersection_at(volume),
        }
    }
}

#[derive(Debug, Clone)]
struct Body {
    volume: Volume,
    tagged: bool,
}

/// Snapshot всех тел с Collider на текущий fixed тик
///
/// Собирается perception системой из Query<(&Transform, &Collider, Has<TargetTag>)>.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    bodies: Vec<Body>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, center: Vec3, shape: Collider, tagged: bool) {
        self.bodies.push(Body {
            volume: Volume::new(center, shape),
            tagged,
        });
    }
}

impl SpatialQuery for CollisionWorld {
    fn any_tagged_within(&self, origin: Vec3, radius: f32) -> bool {
        let probe = BoundingSphere::new(origin, radius);
        self.bodies
            .iter()
            .any(|body| body.tagged && body.volume.intersects_sphere(&probe))
    }

    fn raycast_hits_tagged(&self, origin: Vec3, direction: Vec3) -> bool {
        let Ok(direction) = Dir3::new(direction) else {
            return false;
        };
        let ray = RayCast3d::new(origin, direction, f32::INFINITY);

        let nearest = self
            .bodies
            .iter()
            .filter_map(|body| body.volume.ray_entry(&ray).map(|t| (t, body.tagged)))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        matches!(nearest, Some((_, true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_target(target: Vec3) -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.insert(target, Collider::sphere(0.5), true);
        world
    }

    #[test]
    fn test_overlap_finds_tagged_body_in_radius() {
        let world = world_with_target(Vec3::new(10.0, 0.0, 0.0));

        assert!(world.any_tagged_within(Vec3::ZERO, 10.0));
        assert!(!world.any_tagged_within(Vec3::ZERO, 9.0));
    }

    #[test]
    fn test_overlap_ignores_untagged_bodies() {
        let mut world = CollisionWorld::new();
        world.insert(Vec3::new(1.0, 0.0, 0.0), Collider::sphere(1.0), false);

        assert!(!world.any_tagged_within(Vec3::ZERO, 100.0));
    }

    #[test]
    fn test_raycast_hits_unoccluded_target() {
        let world = world_with_target(Vec3::new(0.0, 0.0, -10.0));

        assert!(world.raycast_hits_tagged(Vec3::ZERO, Vec3::NEG_Z));
        assert!(!world.raycast_hits_tagged(Vec3::ZERO, Vec3::Z));
    }

    #[test]
    fn test_raycast_blocked_by_wall() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -10.0));
        world.insert(
            Vec3::new(0.0, 0.0, -5.0),
            Collider::cuboid(Vec3::new(3.0, 3.0, 0.2)),
            false,
        );

        assert!(!world.raycast_hits_tagged(Vec3::ZERO, Vec3::NEG_Z));
    }

    #[test]
    fn test_overlap_measures_to_cuboid_surface() {
        let mut world = CollisionWorld::new();
        world.insert(
            Vec3::new(0.0, 0.0, -6.0),
            Collider::cuboid(Vec3::new(0.4, 1.0, 0.4)),
            true,
        );

        // Ближняя грань на 5.6м, центр на 6м
        assert!(world.any_tagged_within(Vec3::ZERO, 5.7));
        assert!(!world.any_tagged_within(Vec3::ZERO, 5.5));
    }

    #[test]
    fn test_nearer_untagged_sphere_occludes_target() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -10.0));
        world.insert(Vec3::new(0.2, 0.0, -4.0), Collider::sphere(0.5), false);
        assert!(!world.raycast_hits_tagged(Vec3::ZERO, Vec3::NEG_Z));

        // Та же сфера за целью ничего не перекрывает
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -10.0));
        world.insert(Vec3::new(0.0, 0.0, -14.0), Collider::sphere(0.5), false);
        assert!(world.raycast_hits_tagged(Vec3::ZERO, Vec3::NEG_Z));
    }

    #[test]
    fn test_zero_direction_never_hits() {
        let world = world_with_target(Vec3::ZERO);

        assert!(!world.raycast_hits_tagged(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO));
    }

    #[test]
    fn test_ray_starting_inside_body_ignores_it() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -10.0));
        // Собственный collider агента вокруг origin
        world.insert(Vec3::ZERO, Collider::sphere(1.0), false);

        assert!(world.raycast_hits_tagged(Vec3::ZERO, Vec3::NEG_Z));
    }
}
