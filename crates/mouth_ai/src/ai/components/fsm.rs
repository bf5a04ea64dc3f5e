//! FSM AI components (state, perception snapshot, pending transition, target).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::ports::TargetLocator;

/// AI FSM состояния
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum AgentState {
    /// Default — placeholder до инициализации, после старта не возвращается
    #[default]
    Default,

    /// Patrol — обход PatrolPath
    Patrol,

    /// Suspicion — wander вокруг последней позиции
    Suspicion,

    /// Hostility — погоня за целью
    Hostility,
}

impl AgentState {
    /// Для внешней логики (например, можно ли закрыть дверь за врагом)
    pub fn is_patrolling(&self) -> bool {
        matches!(self, AgentState::Patrol)
    }
}

/// Результат perception на текущий fixed тик
///
/// Пишет только `evaluate_perception`, behaviors читают.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct PerceptionSnapshot {
    pub in_hostile_range: bool,
    pub in_suspicion_range: bool,
    pub is_visible: bool,
}

/// Запрошенный переход (применяет dispatcher)
///
/// Арбитраж внутри одного тика: Hostility не перетирается более слабым
/// запросом, иначе побеждает последний.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PendingTransition {
    requested: Option<AgentState>,
}

impl PendingTransition {
    pub fn request(&mut self, state: AgentState) {
        if self.requested == Some(AgentState::Hostility) && state != AgentState::Hostility {
            return;
        }
        self.requested = Some(state);
    }

    pub fn take(&mut self) -> Option<AgentState> {
        self.requested.take()
    }

    pub fn peek(&self) -> Option<AgentState> {
        self.requested
    }
}

/// One-shot "ударили" флаг
///
/// Ставится StruckByTarget event, снимается Hostile behavior ровно один раз
/// (перед face-attacker поворотом).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct StruckFlag {
    pub armed: bool,
    /// Сколько раз флаг был потреблён (для наблюдателей/тестов)
    pub consumed: u32,
}

impl StruckFlag {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Снимает флаг; true если он был взведён
    pub fn consume(&mut self) -> bool {
        if self.armed {
            self.armed = false;
            self.consumed += 1;
            true
        } else {
            false
        }
    }
}

/// Куда смотреть. `look_at == None` → по направлению движения.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Heading {
    pub look_at: Option<Vec3>,
}

/// Цель охоты (inject при спавне, без глобального поиска по tag)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HuntTarget {
    pub entity: Entity,
    /// Смещение pivot цели от её Transform (по умолчанию центр collider'а)
    pub pivot_offset: Vec3,
}

impl HuntTarget {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            pivot_offset: Vec3::ZERO,
        }
    }

    pub fn with_pivot_offset(mut self, offset: Vec3) -> Self {
        self.pivot_offset = offset;
        self
    }

    /// Резолвит позицию pivot цели через Transform query
    pub fn locate(&self, transforms: &Query<&Transform>) -> LocatedTarget {
        LocatedTarget {
            pivot: transforms
                .get(self.entity)
                .ok()
                .map(|transform| transform.translation + self.pivot_offset),
        }
    }
}

/// Позиция цели на текущий тик (None — цель despawned)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocatedTarget {
    pub pivot: Option<Vec3>,
}

impl LocatedTarget {
    pub fn at(pivot: Vec3) -> Self {
        Self { pivot: Some(pivot) }
    }
}

impl TargetLocator for LocatedTarget {
    fn position(&self) -> Option<Vec3> {
        self.pivot
    }
}
