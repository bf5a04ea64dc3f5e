//! Physics module — geometric collision world для spatial queries
//!
//! Физика как симуляция вне scope: статичные bevy bounding volumes
//! (BoundingSphere / Aabb3d) и overlap/raycast запросы AI perception поверх них.

pub mod collision;

// Re-export основных типов
pub use collision::{Collider, CollisionWorld, TargetTag};
