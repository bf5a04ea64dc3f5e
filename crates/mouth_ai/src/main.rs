//! Headless симуляция Mouth AI
//!
//! Спавнит одного врага с патрулём и цель, гоняет N тиков и печатает смены state.
//! Первый аргумент (опционально) — путь к TOML конфигу агента.

use bevy::prelude::*;
use mouth_ai::{
    create_headless_app, log_error, log_info, AgentBundle, AgentConfig, AgentState, AgentStateChanged, Collider,
    PatrolPath, TargetTag,
};

const TICKS: usize = 1200;

/// Собирает все AgentStateChanged за тик (для печати из main)
#[derive(Resource, Default)]
struct StateLog {
    changes: Vec<AgentStateChanged>,
}

fn record_state_changes(mut events: EventReader<AgentStateChanged>, mut log: ResMut<StateLog>) {
    log.changes.extend(events.read().copied());
}

/// Цель медленно идёт через маршрут патруля
fn walk_target(mut targets: Query<&mut Transform, With<TargetTag>>, time: Res<Time<Fixed>>) {
    for mut transform in targets.iter_mut() {
        transform.translation.x -= 1.5 * time.delta_secs();
    }
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match AgentConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                log_error(&format!("Failed to load {}: {}", path, error));
                std::process::exit(1);
            }
        },
        None => AgentConfig::default(),
    };

    let seed = 42;
    println!("Starting Mouth AI headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.init_resource::<StateLog>()
        .add_systems(FixedUpdate, walk_target)
        .add_systems(Last, record_state_changes);

    let target = app
        .world_mut()
        .spawn((
            Transform::from_xyz(30.0, 1.0, -5.0),
            Collider::cuboid(Vec3::new(0.4, 1.0, 0.4)),
            TargetTag,
        ))
        .id();

    let path = PatrolPath::new(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(8.0, 0.0, 0.0),
        Vec3::new(8.0, 0.0, -8.0),
        Vec3::new(0.0, 0.0, -8.0),
    ]);
    let agent = app
        .world_mut()
        .spawn(AgentBundle::new(Vec3::ZERO, target, path).with_config(config))
        .id();

    for tick in 0..TICKS {
        app.update();

        let changes = std::mem::take(&mut app.world_mut().resource_mut::<StateLog>().changes);
        for change in changes {
            println!("Tick {}: {:?} {:?} → {:?}", tick, change.agent, change.previous, change.next);
        }

        if tick % 120 == 0 {
            let position = app
                .world()
                .get::<Transform>(agent)
                .map(|transform| transform.translation)
                .unwrap_or_default();
            let state = app.world().get::<AgentState>(agent).copied().unwrap_or_default();
            log_info(&format!("Tick {}: agent at {:.2} in {:?}", tick, position, state));
        }
    }

    println!("Simulation complete!");
}
