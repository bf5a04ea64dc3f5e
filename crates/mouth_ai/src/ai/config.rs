//! AgentConfig — tunables врага (detection, speeds, wander, timeouts)
//!
//! Загружается из TOML (`AgentConfig::from_toml_str` / `load`), отсутствующие
//! поля берутся из Default. Значения вне допустимых диапазонов клэмпятся
//! в `sanitized()`, а не валят загрузку.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logger;

/// Политика проверки видимости. Одна на агента, никогда не смешиваются.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum VisibilityPolicy {
    /// Цель в передней полусфере (dot(forward, dir) >= 0) + raycast
    Hemisphere,
    /// Цель внутри конуса `half_angle_degrees` от forward + raycast
    FieldOfView { half_angle_degrees: f32 },
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::Hemisphere
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read agent config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse agent config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Параметры AI агента
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    /// Радиус, в котором видимая цель сразу вызывает Hostility из Patrol (метры)
    pub hostile_detection_range: f32,
    /// Радиус, в котором видимая цель вызывает Hostility из Suspicion (метры)
    pub suspicion_detection_range: f32,
    /// Радиус случайных точек wander (клэмпится при инициализации)
    pub wander_range: f32,
    /// Пауза на каждом waypoint/checkpoint (секунды)
    pub waypoint_wait_time: f32,
    /// Сколько цель должна оставаться потерянной до Hostility → Suspicion (секунды)
    pub lost_timeout: f32,
    pub normal_speed: f32,
    pub chasing_speed: f32,
    /// Коэффициент slerp поворота (в секунду)
    pub turn_speed: f32,
    /// Сколько wander checkpoints до возврата в Patrol (1..=5)
    pub wander_checkpoint_amount: u32,
    /// Множитель stopping_distance для минимального шага wander (1..=2)
    pub wander_checkpoint_step: f32,
    /// Высота глаз над pivot агента (origin для LOS raycast)
    pub eye_height: f32,
    /// Допуск face-attacker поворота (градусы)
    pub face_tolerance_degrees: f32,
    pub visibility: VisibilityPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            hostile_detection_range: 15.0,
            suspicion_detection_range: 25.0,
            wander_range: 7.5,
            waypoint_wait_time: 3.0,
            lost_timeout: 3.0,
            normal_speed: 3.5,
            chasing_speed: 5.0,
            turn_speed: 5.0,
            wander_checkpoint_amount: 1,
            wander_checkpoint_step: 1.0,
            eye_height: 1.6,
            face_tolerance_degrees: 45.0,
            visibility: VisibilityPolicy::Hemisphere,
        }
    }
}

impl AgentConfig {
    pub const CHECKPOINT_AMOUNT_RANGE: (u32, u32) = (1, 5);
    pub const CHECKPOINT_STEP_RANGE: (f32, f32) = (1.0, 2.0);
    /// Нижняя граница turn_speed (face-attacker должен доворачиваться)
    pub const MIN_TURN_SPEED: f32 = 0.5;

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = toml::from_str(source)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Клэмп в допустимые диапазоны (отрицательные величины → 0, turn_speed → MIN_TURN_SPEED)
    pub fn sanitized(mut self) -> Self {
        let before = self.clone();

        for value in [
            &mut self.hostile_detection_range,
            &mut self.suspicion_detection_range,
            &mut self.wander_range,
            &mut self.waypoint_wait_time,
            &mut self.lost_timeout,
            &mut self.normal_speed,
            &mut self.chasing_speed,
            &mut self.eye_height,
        ] {
            *value = value.max(0.0);
        }

        self.turn_speed = self.turn_speed.max(Self::MIN_TURN_SPEED);

        let (min_amount, max_amount) = Self::CHECKPOINT_AMOUNT_RANGE;
        self.wander_checkpoint_amount = self.wander_checkpoint_amount.clamp(min_amount, max_amount);

        let (min_step, max_step) = Self::CHECKPOINT_STEP_RANGE;
        self.wander_checkpoint_step = self.wander_checkpoint_step.clamp(min_step, max_step);

        self.face_tolerance_degrees = self.face_tolerance_degrees.clamp(0.0, 180.0);
        if let VisibilityPolicy::FieldOfView { half_angle_degrees } = &mut self.visibility {
            *half_angle_degrees = half_angle_degrees.clamp(0.0, 180.0);
        }

        if self != before {
            logger::log_warning(&format!(
                "AgentConfig: out-of-range values clamped ({:?} → {:?})",
                before, self
            ));
        }

        self
    }

    /// Минимальная дистанция wander точки от агента
    pub fn wander_min_distance(&self, stopping_distance: f32) -> f32 {
        stopping_distance * self.wander_checkpoint_step
    }

    /// wander_range не может быть меньше достижимого допуска.
    /// Возвращает true, если значение было поднято.
    pub fn clamp_wander_range(&mut self, stopping_distance: f32) -> bool {
        let min_range = self.wander_min_distance(stopping_distance);
        if self.wander_range < min_range {
            self.wander_range = min_range;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AgentConfig::default();
        assert_eq!(config.hostile_detection_range, 15.0);
        assert_eq!(config.suspicion_detection_range, 25.0);
        assert_eq!(config.wander_range, 7.5);
        assert_eq!(config.waypoint_wait_time, 3.0);
        assert_eq!(config.lost_timeout, 3.0);
        assert_eq!(config.wander_checkpoint_amount, 1);
        assert_eq!(config.visibility, VisibilityPolicy::Hemisphere);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AgentConfig::from_toml_str(
            r#"
            hostile_detection_range = 8.0
            lost_timeout = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.hostile_detection_range, 8.0);
        assert_eq!(config.lost_timeout, 5.0);
        assert_eq!(config.chasing_speed, 5.0);
    }

    #[test]
    fn test_toml_field_of_view_policy() {
        let config = AgentConfig::from_toml_str(
            r#"
            [visibility.FieldOfView]
            half_angle_degrees = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.visibility,
            VisibilityPolicy::FieldOfView { half_angle_degrees: 60.0 }
        );
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = AgentConfig::from_toml_str("hostile_detection_range = \"far\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_sanitized_clamps_checkpoint_ranges() {
        let config = AgentConfig {
            wander_checkpoint_amount: 12,
            wander_checkpoint_step: 0.2,
            normal_speed: -1.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.wander_checkpoint_amount, 5);
        assert_eq!(config.wander_checkpoint_step, 1.0);
        assert_eq!(config.normal_speed, 0.0);
    }

    #[test]
    fn test_sanitized_keeps_turn_speed_positive() {
        let stalled = AgentConfig {
            turn_speed: 0.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(stalled.turn_speed, AgentConfig::MIN_TURN_SPEED);

        let reversed = AgentConfig {
            turn_speed: -3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(reversed.turn_speed, AgentConfig::MIN_TURN_SPEED);

        assert_eq!(AgentConfig::default().sanitized().turn_speed, 5.0);
    }

    #[test]
    fn test_clamp_wander_range_raises_to_acceptance_radius() {
        let mut config = AgentConfig {
            wander_range: 0.5,
            wander_checkpoint_step: 2.0,
            ..Default::default()
        };

        assert!(config.clamp_wander_range(1.5));
        assert_eq!(config.wander_range, 3.0);

        // Второй раз уже валидно
        assert!(!config.clamp_wander_range(1.5));
    }
}
