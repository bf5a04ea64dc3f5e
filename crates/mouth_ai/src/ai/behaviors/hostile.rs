//! Hostile (chase) behavior
//!
//! - chasing_speed, destination = живая позиция цели пока она видна
//! - heading плавно доворачивается к цели (turn_towards_heading)
//! - после удара: сначала face-attacker поворот до face_tolerance_degrees
//! - цель потеряна и мы у последнего destination → countdown lost_timeout;
//!   цель снова видна → countdown сбрасывается, иначе → Suspicion

use super::{issue_destination, yaw_towards, BehaviorContext, BehaviorStatus, RejectionStreak};
use crate::ai::components::AgentState;

#[derive(Debug, Clone, Copy, PartialEq)]
enum HostilePhase {
    Tracking,
    /// One-shot поворот к атакующему (вытесняет tracking до готовности)
    FacingAttacker,
    /// `elapsed` включает тик, на котором countdown начался
    LostCountdown { elapsed: f32 },
}

#[derive(Debug, Clone)]
pub struct HostileRoutine {
    phase: HostilePhase,
    rejections: RejectionStreak,
}

impl HostileRoutine {
    pub fn start(ctx: &mut BehaviorContext) -> Self {
        ctx.nav.set_speed(ctx.config.chasing_speed);
        let mut rejections = RejectionStreak::default();
        if let Some(target) = ctx.target.position() {
            issue_destination(ctx, target, &mut rejections);
        }

        Self {
            phase: HostilePhase::Tracking,
            rejections,
        }
    }

    pub fn is_facing_attacker(&self) -> bool {
        matches!(self.phase, HostilePhase::FacingAttacker)
    }

    /// Секунды, прошедшие в lost countdown (None — countdown не идёт)
    pub fn lost_elapsed(&self) -> Option<f32> {
        match self.phase {
            HostilePhase::LostCountdown { elapsed } => Some(elapsed),
            _ => None,
        }
    }

    /// Сколько destination подряд отклонила навигация
    pub fn rejected_destinations(&self) -> u32 {
        self.rejections.rejected()
    }

    pub fn step(&mut self, ctx: &mut BehaviorContext) -> BehaviorStatus {
        if ctx.struck.consume() {
            self.phase = HostilePhase::FacingAttacker;
        }

        match self.phase {
            HostilePhase::FacingAttacker => {
                if self.face_attacker(ctx) {
                    self.phase = HostilePhase::Tracking;
                }
                return BehaviorStatus::Running;
            }

            HostilePhase::LostCountdown { elapsed } => {
                if ctx.perception.is_visible {
                    self.phase = HostilePhase::Tracking;
                } else {
                    return self.count_lost(elapsed, ctx);
                }
            }

            HostilePhase::Tracking => {}
        }

        if ctx.nav.path_pending() {
            return BehaviorStatus::Running;
        }

        self.track(ctx)
    }

    fn track(&mut self, ctx: &mut BehaviorContext) -> BehaviorStatus {
        if ctx.perception.is_visible {
            if let Some(target) = ctx.target.position() {
                issue_destination(ctx, target, &mut self.rejections);
                ctx.heading.look_at = Some(target - ctx.position);
            }
            return BehaviorStatus::Running;
        }

        ctx.heading.look_at = None;
        if ctx.nav.remaining_distance() <= ctx.nav.stopping_distance() {
            return self.count_lost(0.0, ctx);
        }
        BehaviorStatus::Running
    }

    fn count_lost(&mut self, elapsed: f32, ctx: &BehaviorContext) -> BehaviorStatus {
        let elapsed = elapsed + ctx.delta;
        if elapsed >= ctx.config.lost_timeout {
            return BehaviorStatus::Request(AgentState::Suspicion);
        }
        self.phase = HostilePhase::LostCountdown { elapsed };
        BehaviorStatus::Running
    }

    /// true — уже смотрим на атакующего в пределах допуска
    fn face_attacker(&mut self, ctx: &mut BehaviorContext) -> bool {
        let Some(target) = ctx.target.position() else {
            return true;
        };

        let direction = target - ctx.position;
        let Some(look) = yaw_towards(direction) else {
            return true;
        };

        ctx.heading.look_at = Some(direction);
        ctx.rotation.angle_between(look) <= ctx.config.face_tolerance_degrees.to_radians()
    }
}
