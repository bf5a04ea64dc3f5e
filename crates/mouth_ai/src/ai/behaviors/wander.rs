//! Wander (Suspicion) behavior — ограниченное исследование вокруг агента
//!
//! Checkpoint counter стартует с 1; каждое достижение точки +1, dwell,
//! новая точка. Когда counter > wander_checkpoint_amount → Patrol
//! (единственный путь Suspicion → Patrol).

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::{issue_destination, BehaviorContext, BehaviorStatus, RejectionStreak};
use crate::ai::components::AgentState;

/// Лимит rejection sampling на одну точку
const MAX_WANDER_SAMPLES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum WanderPhase {
    /// Нужна новая точка (в т.ч. retry после неудачной проекции)
    Choose,
    Travel,
    Dwell { remaining: f32 },
}

#[derive(Debug, Clone)]
pub struct WanderRoutine {
    checkpoint: u32,
    phase: WanderPhase,
    rejections: RejectionStreak,
}

impl WanderRoutine {
    pub fn start(ctx: &mut BehaviorContext) -> Self {
        ctx.nav.set_speed(ctx.config.normal_speed);
        ctx.heading.look_at = None;

        let mut routine = Self {
            checkpoint: 1,
            phase: WanderPhase::Choose,
            rejections: RejectionStreak::default(),
        };
        routine.choose_destination(ctx);
        routine
    }

    pub fn checkpoint(&self) -> u32 {
        self.checkpoint
    }

    pub fn step(&mut self, ctx: &mut BehaviorContext) -> BehaviorStatus {
        match self.phase {
            WanderPhase::Choose => self.choose_destination(ctx),

            WanderPhase::Travel => {
                if ctx.nav.path_pending() {
                    return BehaviorStatus::Running;
                }

                if ctx.nav.remaining_distance() <= ctx.nav.stopping_distance() {
                    self.checkpoint += 1;
                    self.phase = WanderPhase::Dwell {
                        remaining: ctx.config.waypoint_wait_time,
                    };
                }
            }

            WanderPhase::Dwell { remaining } => {
                let remaining = remaining - ctx.delta;
                if remaining > 0.0 {
                    self.phase = WanderPhase::Dwell { remaining };
                    return BehaviorStatus::Running;
                }

                if self.checkpoint > ctx.config.wander_checkpoint_amount {
                    return BehaviorStatus::Request(AgentState::Patrol);
                }
                self.choose_destination(ctx);
            }
        }

        BehaviorStatus::Running
    }

    fn choose_destination(&mut self, ctx: &mut BehaviorContext) {
        let accepted =
            sample_wander_point(ctx).is_some_and(|point| issue_destination(ctx, point, &mut self.rejections));
        self.phase = if accepted {
            WanderPhase::Travel
        } else {
            WanderPhase::Choose
        };
    }
}

/// Случайная точка внутри сферы wander_range вокруг агента
///
/// - высота клэмпится в [0, 1] (не уходим под пол)
/// - точки ближе stopping_distance * wander_checkpoint_step отбрасываются
/// - если лимит попыток исчерпан, берём точку на кольце минимальной дистанции
/// - результат проецируется на navigable surface (None — проекция не удалась)
pub fn sample_wander_point(ctx: &mut BehaviorContext) -> Option<Vec3> {
    let range = ctx.config.wander_range;
    let min_distance = ctx.config.wander_min_distance(ctx.nav.stopping_distance());
    let origin = ctx.position;

    let mut candidate = None;
    for _ in 0..MAX_WANDER_SAMPLES {
        let unit = Vec3::new(
            ctx.rng.gen_range(-1.0..=1.0),
            ctx.rng.gen_range(-1.0..=1.0),
            ctx.rng.gen_range(-1.0..=1.0),
        );
        if unit.length_squared() > 1.0 {
            continue;
        }

        let mut offset = unit * range;
        offset.y = offset.y.clamp(0.0, 1.0);
        if offset.length() >= min_distance {
            candidate = Some(origin + offset);
            break;
        }
    }

    let candidate = candidate.unwrap_or_else(|| {
        let angle = ctx.rng.gen_range(0.0..TAU);
        origin + Vec3::new(angle.cos(), 0.0, angle.sin()) * min_distance
    });

    ctx.nav.sample_position(candidate, range)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;

    #[test]
    fn test_samples_respect_min_and_max_distance() {
        let mut fixture = Fixture::new();
        fixture.nav.stopping = 1.0;
        fixture.config.wander_checkpoint_step = 2.0;
        fixture.config.wander_range = 6.0;
        fixture.position = Vec3::new(5.0, 0.0, 5.0);

        for _ in 0..200 {
            let point = sample_wander_point(&mut fixture.ctx()).unwrap();
            let distance = point.distance(fixture.position);
            // Проекция на пол может срезать до 1м высоты
            assert!(distance >= 2.0 - 1.0 - 1e-3, "too close: {distance}");
            assert!(distance <= 6.0 + 1e-3, "too far: {distance}");
        }
    }

    #[test]
    fn test_degenerate_range_terminates() {
        // wander_range == минимальная дистанция: rejection почти никогда не
        // проходит, должен сработать fallback на кольцо
        let mut fixture = Fixture::new();
        fixture.nav.stopping = 2.0;
        fixture.config.wander_checkpoint_step = 1.0;
        fixture.config.wander_range = 2.0;

        let point = sample_wander_point(&mut fixture.ctx()).unwrap();
        assert!((point.distance(fixture.position) - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_returns_to_patrol_after_checkpoint_amount() {
        let mut fixture = Fixture::new();
        fixture.config.wander_checkpoint_amount = 3;
        fixture.config.waypoint_wait_time = 0.05;
        fixture.delta = 0.1;
        let mut routine = WanderRoutine::start(&mut fixture.ctx());
        assert_eq!(fixture.nav.speed, fixture.config.normal_speed);

        for completed in 1..=3 {
            assert_eq!(routine.checkpoint(), completed);
            fixture.nav.arrive();
            // arrival → dwell
            assert_eq!(routine.step(&mut fixture.ctx()), BehaviorStatus::Running);
            let status = routine.step(&mut fixture.ctx());
            if completed < 3 {
                assert_eq!(status, BehaviorStatus::Running);
            } else {
                assert_eq!(status, BehaviorStatus::Request(AgentState::Patrol));
            }
        }
        // Старт + по новой точке после каждого checkpoint, кроме последнего
        assert_eq!(fixture.nav.destinations.len(), 3);
    }

    #[test]
    fn test_retries_when_destination_rejected() {
        let mut fixture = Fixture::new();
        fixture.nav.reject_all = true;
        let mut routine = WanderRoutine::start(&mut fixture.ctx());

        for _ in 0..20 {
            assert_eq!(routine.step(&mut fixture.ctx()), BehaviorStatus::Running);
        }
        assert_eq!(routine.checkpoint(), 1);

        fixture.nav.reject_all = false;
        routine.step(&mut fixture.ctx());
        assert_eq!(fixture.nav.destinations.len(), 1);
    }
}
