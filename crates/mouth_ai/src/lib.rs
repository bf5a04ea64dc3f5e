//! Mouth AI Simulation Core
//!
//! ECS-симуляция врагов на Bevy 0.16 (headless)
//!
//! Архитектура:
//! - ai = perception, FSM (Patrol / Suspicion / Hostility), behaviors
//! - navigation = NavigationAgent port + headless NavAgent
//! - physics = collision world для spatial queries (overlap + raycast)
//!
//! Хост (движок) общается с AI только через ports (`ai::ports`) и события
//! (`StruckByTarget`, `AgentStateChanged`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod logger;
pub mod navigation;
pub mod physics;

// Re-export базовых типов для удобства
pub use ai::{
    AIPlugin, AgentBundle, AgentConfig, AgentState, AgentStateChanged, HuntTarget, PatrolPath, StruckByTarget,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use navigation::{NavAgent, NavigationError, NavigationPlugin};
pub use physics::{Collider, TargetTag};

/// Частота simulation tick (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Детерминистичный RNG (seed по умолчанию, если хост не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Подсистемы
            .add_plugins((AIPlugin, NavigationPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` продвигает время ровно на один fixed тик
/// (кроме самого первого update — у него нулевая delta).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f64(1.0 / SIMULATION_HZ),
        ))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
