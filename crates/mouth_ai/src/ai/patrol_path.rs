//! PatrolPath — маршрут патруля (waypoints + no-repeat выбор следующего)

use bevy::prelude::*;
use rand::Rng;

/// Маршрут врага
///
/// Инвариант: `next_index(Some(i))` никогда не возвращает `i`, если waypoints ≥ 2.
/// С одним waypoint повтор неизбежен → всегда 0 (без цикла).
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolPath {
    pub waypoints: Vec<Vec3>,
}

impl PatrolPath {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Случайный индекс, отличный от `previous`. None — маршрут пуст.
    ///
    /// Индекс берётся из n-1 кандидатов со сдвигом через `previous`.
    pub fn next_index<R: Rng + ?Sized>(&self, previous: Option<usize>, rng: &mut R) -> Option<usize> {
        match self.waypoints.len() {
            0 => None,
            1 => Some(0),
            count => match previous {
                Some(previous) if previous < count => {
                    let candidate = rng.gen_range(0..count - 1);
                    Some(if candidate >= previous { candidate + 1 } else { candidate })
                }
                _ => Some(rng.gen_range(0..count)),
            },
        }
    }

    pub fn waypoint(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }
}
