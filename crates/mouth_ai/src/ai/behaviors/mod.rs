//! Behaviors — state-scoped routines поверх NavigationAgent
//!
//! Каждый routine — явная step-функция со своим phase enum (вместо coroutine):
//! "ждём резолва пути", "dwell N секунд", "countdown", "поворот к цели".
//! Dispatcher вызывает `start` при входе в state и `step` раз в fixed тик.
//!
//! Инвариант: у агента не больше одного активного routine (`ActiveBehavior`),
//! и только он пишет destination в навигацию.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::components::{AgentState, Heading, PerceptionSnapshot, StruckFlag};
use crate::ai::config::AgentConfig;
use crate::ai::patrol_path::PatrolPath;
use crate::ai::ports::{NavigationAgent, TargetLocator};
use crate::logger::{self, LogLevel};

pub mod hostile;
pub mod patrol;
pub mod wander;

pub use hostile::HostileRoutine;
pub use patrol::PatrolRoutine;
pub use wander::WanderRoutine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Patrol,
    Wander,
    Hostile,
}

impl BehaviorKind {
    pub fn for_state(state: AgentState) -> Option<Self> {
        match state {
            AgentState::Default => None,
            AgentState::Patrol => Some(Self::Patrol),
            AgentState::Suspicion => Some(Self::Wander),
            AgentState::Hostility => Some(Self::Hostile),
        }
    }
}

/// Результат одного step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorStatus {
    Running,
    /// Routine завершился и просит переход (wander → Patrol, lost → Suspicion)
    Request(AgentState),
}

/// Всё, что routine видит и может менять за один step
pub struct BehaviorContext<'a> {
    pub nav: &'a mut dyn NavigationAgent,
    pub config: &'a AgentConfig,
    pub perception: PerceptionSnapshot,
    pub path: Option<&'a PatrolPath>,
    pub target: &'a dyn TargetLocator,
    pub position: Vec3,
    pub rotation: Quat,
    pub heading: &'a mut Heading,
    pub struck: &'a mut StruckFlag,
    pub rng: &'a mut ChaCha8Rng,
    pub delta: f32,
}

/// Серия подряд отклонённых destination одного routine
///
/// Warning пишется только на первый отказ серии, остальные идут в debug.
/// Принятый destination обнуляет серию.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionStreak {
    rejected: u32,
}

impl RejectionStreak {
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Уровень лога для очередного отказа
    fn record_rejection(&mut self) -> LogLevel {
        self.rejected += 1;
        if self.rejected == 1 {
            LogLevel::Warning
        } else {
            LogLevel::Debug
        }
    }

    fn reset(&mut self) {
        self.rejected = 0;
    }
}

/// Отправка destination. Ошибка навигации не фатальна: логируем, behavior
/// продолжает polling remaining_distance.
pub(crate) fn issue_destination(ctx: &mut BehaviorContext, point: Vec3, streak: &mut RejectionStreak) -> bool {
    match ctx.nav.set_destination(point) {
        Ok(()) => {
            streak.reset();
            true
        }
        Err(error) => {
            let level = streak.record_rejection();
            logger::log_with_level(
                level,
                &format!(
                    "Navigation: set_destination({}) failed: {} (streak {})",
                    point,
                    error,
                    streak.rejected()
                ),
            );
            false
        }
    }
}

/// Yaw-only rotation, смотрящая вдоль `direction` (forward = -Z).
pub fn yaw_towards(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() < 1e-6 {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Patrol(PatrolRoutine),
    Wander(WanderRoutine),
    Hostile(HostileRoutine),
}

impl Behavior {
    /// Запуск routine: синхронная часть до первой точки ожидания
    /// (скорость + первый destination) выполняется сразу.
    pub fn start(kind: BehaviorKind, ctx: &mut BehaviorContext) -> Self {
        match kind {
            BehaviorKind::Patrol => Behavior::Patrol(PatrolRoutine::start(ctx)),
            BehaviorKind::Wander => Behavior::Wander(WanderRoutine::start(ctx)),
            BehaviorKind::Hostile => Behavior::Hostile(HostileRoutine::start(ctx)),
        }
    }

    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Patrol(_) => BehaviorKind::Patrol,
            Behavior::Wander(_) => BehaviorKind::Wander,
            Behavior::Hostile(_) => BehaviorKind::Hostile,
        }
    }

    pub fn step(&mut self, ctx: &mut BehaviorContext) -> BehaviorStatus {
        match self {
            Behavior::Patrol(routine) => routine.step(ctx),
            Behavior::Wander(routine) => routine.step(ctx),
            Behavior::Hostile(routine) => routine.step(ctx),
        }
    }

    /// Cooperative cancel: routine просто больше не шагает.
    /// Навигацию не откатываем, destination перезапишет новый routine.
    pub fn cancel(self, heading: &mut Heading) {
        heading.look_at = None;
    }
}

/// Активный routine агента (не больше одного)
#[derive(Component, Debug, Default)]
pub struct ActiveBehavior {
    routine: Option<Behavior>,
    starts: u64,
}

impl ActiveBehavior {
    pub fn is_active(&self) -> bool {
        self.routine.is_some()
    }

    pub fn kind(&self) -> Option<BehaviorKind> {
        self.routine.as_ref().map(Behavior::kind)
    }

    pub fn routine(&self) -> Option<&Behavior> {
        self.routine.as_ref()
    }

    /// Сколько раз запускался routine (перезапуски видны как рост счётчика)
    pub fn starts(&self) -> u64 {
        self.starts
    }

    pub fn take(&mut self) -> Option<Behavior> {
        self.routine.take()
    }

    /// Ставит новый routine. Предыдущий обязан быть снят через `take`.
    pub fn install(&mut self, behavior: Behavior) {
        debug_assert!(self.routine.is_none(), "previous behavior must be cancelled first");
        self.routine = Some(behavior);
        self.starts += 1;
    }

    pub fn step(&mut self, ctx: &mut BehaviorContext) -> BehaviorStatus {
        match self.routine.as_mut() {
            Some(routine) => routine.step(ctx),
            None => BehaviorStatus::Running,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::ai::components::LocatedTarget;
    use crate::navigation::NavigationError;
    use rand::SeedableRng;

    /// Навигация под полным контролем теста
    #[derive(Debug, Default)]
    pub struct MockNav {
        pub destinations: Vec<Vec3>,
        pub remaining: f32,
        pub pending: bool,
        pub speed: f32,
        pub stopping: f32,
        pub reject_all: bool,
    }

    impl MockNav {
        pub fn new(stopping: f32) -> Self {
            Self {
                remaining: f32::INFINITY,
                stopping,
                ..Default::default()
            }
        }

        pub fn arrive(&mut self) {
            self.pending = false;
            self.remaining = 0.0;
        }

        pub fn last_destination(&self) -> Option<Vec3> {
            self.destinations.last().copied()
        }
    }

    impl NavigationAgent for MockNav {
        fn set_destination(&mut self, point: Vec3) -> Result<(), NavigationError> {
            if self.reject_all {
                return Err(NavigationError::Unreachable { point });
            }
            self.destinations.push(point);
            self.remaining = f32::INFINITY;
            Ok(())
        }

        fn remaining_distance(&self) -> f32 {
            self.remaining
        }

        fn path_pending(&self) -> bool {
            self.pending
        }

        fn velocity(&self) -> Vec3 {
            Vec3::ZERO
        }

        fn stopping_distance(&self) -> f32 {
            self.stopping
        }

        fn set_speed(&mut self, speed: f32) {
            self.speed = speed;
        }

        fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
            Some(Vec3::new(point.x, 0.0, point.z))
        }
    }

    /// Владелец всего, что одалживает BehaviorContext
    pub struct Fixture {
        pub nav: MockNav,
        pub config: AgentConfig,
        pub perception: PerceptionSnapshot,
        pub path: PatrolPath,
        pub target: LocatedTarget,
        pub position: Vec3,
        pub rotation: Quat,
        pub heading: Heading,
        pub struck: StruckFlag,
        pub rng: ChaCha8Rng,
        pub delta: f32,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                nav: MockNav::new(0.5),
                config: AgentConfig::default(),
                perception: PerceptionSnapshot::default(),
                path: PatrolPath::new(vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(10.0, 0.0, 0.0),
                    Vec3::new(10.0, 0.0, 10.0),
                ]),
                target: LocatedTarget::at(Vec3::new(0.0, 1.6, -8.0)),
                position: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                heading: Heading::default(),
                struck: StruckFlag::default(),
                rng: ChaCha8Rng::seed_from_u64(42),
                delta: 0.1,
            }
        }

        pub fn ctx(&mut self) -> BehaviorContext<'_> {
            BehaviorContext {
                nav: &mut self.nav,
                config: &self.config,
                perception: self.perception,
                path: Some(&self.path),
                target: &self.target,
                position: self.position,
                rotation: self.rotation,
                heading: &mut self.heading,
                struck: &mut self.struck,
                rng: &mut self.rng,
                delta: self.delta,
            }
        }

        /// Шагает routine (навигация прибывает мгновенно), пока не вернёт
        /// Request или не кончится лимит
        pub fn run_until_request(&mut self, behavior: &mut Behavior, max_steps: usize) -> Option<AgentState> {
            for _ in 0..max_steps {
                self.nav.arrive();
                if let BehaviorStatus::Request(state) = behavior.step(&mut self.ctx()) {
                    return Some(state);
                }
            }
            None
        }
    }
}
