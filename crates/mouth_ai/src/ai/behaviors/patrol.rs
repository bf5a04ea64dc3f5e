//! Patrol behavior — бесконечный обход PatrolPath на normal_speed.

use super::{issue_destination, BehaviorContext, BehaviorStatus, RejectionStreak};
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PatrolPhase {
    /// Маршрут пуст — стоим на месте
    Idle,
    /// Идём к waypoint `index`
    Travel,
    /// Dwell на waypoint, потом идём к `next`
    Dwell { remaining: f32, next: usize },
}

#[derive(Debug, Clone)]
pub struct PatrolRoutine {
    index: Option<usize>,
    phase: PatrolPhase,
    rejections: RejectionStreak,
}

impl PatrolRoutine {
    pub fn start(ctx: &mut BehaviorContext) -> Self {
        ctx.nav.set_speed(ctx.config.normal_speed);
        ctx.heading.look_at = None;

        let path = ctx.path;
        let first = path.and_then(|path| {
            let index = path.next_index(None, &mut *ctx.rng)?;
            path.waypoint(index).map(|point| (index, point))
        });

        let Some((index, point)) = first else {
            logger::log_warning("Patrol: empty patrol path, agent stays idle");
            return Self {
                index: None,
                phase: PatrolPhase::Idle,
                rejections: RejectionStreak::default(),
            };
        };

        let mut rejections = RejectionStreak::default();
        issue_destination(ctx, point, &mut rejections);
        Self {
            index: Some(index),
            phase: PatrolPhase::Travel,
            rejections,
        }
    }

    /// Текущий waypoint (куда идём или где стоим)
    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_dwelling(&self) -> bool {
        matches!(self.phase, PatrolPhase::Dwell { .. })
    }

    pub fn step(&mut self, ctx: &mut BehaviorContext) -> BehaviorStatus {
        match self.phase {
            PatrolPhase::Idle => {}

            PatrolPhase::Travel => {
                if ctx.nav.path_pending() {
                    return BehaviorStatus::Running;
                }

                if ctx.nav.remaining_distance() <= ctx.nav.stopping_distance() {
                    let next = ctx
                        .path
                        .and_then(|path| path.next_index(self.index, &mut *ctx.rng));
                    if let Some(next) = next {
                        self.phase = PatrolPhase::Dwell {
                            remaining: ctx.config.waypoint_wait_time,
                            next,
                        };
                    }
                }
            }

            PatrolPhase::Dwell { remaining, next } => {
                let remaining = remaining - ctx.delta;
                if remaining > 0.0 {
                    self.phase = PatrolPhase::Dwell { remaining, next };
                    return BehaviorStatus::Running;
                }

                if let Some(point) = ctx.path.and_then(|path| path.waypoint(next)) {
                    issue_destination(ctx, point, &mut self.rejections);
                }
                self.index = Some(next);
                self.phase = PatrolPhase::Travel;
            }
        }

        BehaviorStatus::Running
    }
}
