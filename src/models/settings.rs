//! Настройки камеры (вкладка Camera в редакторе).
//! schemaVersion: 1

use serde::{Deserialize, Serialize};

/// Явная пружинная динамика камеры.
///
/// Если задана, интегратор работает в пружинном режиме вместо
/// экспоненциального сглаживания.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpringDynamics {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl Default for SpringDynamics {
    fn default() -> Self {
        SpringDynamics {
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
        }
    }
}

fn default_blur_threshold() -> f64 {
    0.05
}

fn default_blur_ramp() -> f64 {
    0.6
}

fn default_blur_samples() -> u32 {
    8
}

/// Параметры motion blur, вычисляемого из скорости камеры.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MotionBlurSettings {
    /// 0.0 — выключено.
    #[serde(default)]
    pub intensity: f64,
    /// Скорость (norm/s), ниже которой blur не применяется.
    #[serde(default = "default_blur_threshold")]
    pub threshold: f64,
    /// Ширина линейного перехода от 0 до полного blur.
    #[serde(default = "default_blur_ramp")]
    pub ramp: f64,
    /// Количество сэмплов для рендерера.
    #[serde(default = "default_blur_samples")]
    pub samples: u32,
}

impl Default for MotionBlurSettings {
    fn default() -> Self {
        MotionBlurSettings {
            intensity: 0.0,
            threshold: default_blur_threshold(),
            ramp: default_blur_ramp(),
            samples: default_blur_samples(),
        }
    }
}

fn default_dead_zone_max_ratio() -> f64 {
    0.35
}

fn default_dead_zone_floor_ratio() -> f64 {
    0.08
}

fn default_adapt_start_scale() -> f64 {
    1.3
}

fn default_adapt_end_scale() -> f64 {
    2.6
}

/// Адаптивная мёртвая зона: доля полуокна сжимается от max к floor
/// между двумя порогами зума.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeadZoneSettings {
    #[serde(default = "default_dead_zone_max_ratio")]
    pub max_ratio: f64,
    #[serde(default = "default_dead_zone_floor_ratio")]
    pub floor_ratio: f64,
    #[serde(default = "default_adapt_start_scale")]
    pub adapt_start_scale: f64,
    #[serde(default = "default_adapt_end_scale")]
    pub adapt_end_scale: f64,
}

impl Default for DeadZoneSettings {
    fn default() -> Self {
        DeadZoneSettings {
            max_ratio: default_dead_zone_max_ratio(),
            floor_ratio: default_dead_zone_floor_ratio(),
            adapt_start_scale: default_adapt_start_scale(),
            adapt_end_scale: default_adapt_end_scale(),
        }
    }
}

fn default_smoothness() -> f64 {
    65.0
}

/// Конфигурация движения камеры.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CameraSettings {
    /// 0–100: чем выше, тем плавнее (и медленнее) следование.
    #[serde(default = "default_smoothness")]
    pub smoothness: f64,
    #[serde(default)]
    pub spring: Option<SpringDynamics>,
    #[serde(default)]
    pub dead_zone: DeadZoneSettings,
    #[serde(default)]
    pub motion_blur: MotionBlurSettings,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            smoothness: default_smoothness(),
            spring: None,
            dead_zone: DeadZoneSettings::default(),
            motion_blur: MotionBlurSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_deserialize_to_defaults() {
        let settings: CameraSettings = serde_json::from_str("{}").expect("deserialize settings");
        assert_eq!(settings.smoothness, 65.0);
        assert!(settings.spring.is_none());
        assert_eq!(settings.dead_zone.max_ratio, 0.35);
        assert!(settings.dead_zone.adapt_start_scale < settings.dead_zone.adapt_end_scale);
        assert_eq!(settings.motion_blur.intensity, 0.0);
        assert_eq!(settings.motion_blur.samples, 8);
    }

    #[test]
    fn explicit_spring_round_trips() {
        let settings = CameraSettings {
            spring: Some(SpringDynamics {
                stiffness: 120.0,
                damping: 20.0,
                mass: 1.5,
            }),
            ..CameraSettings::default()
        };

        let json = serde_json::to_string(&settings).expect("serialize settings");
        assert!(json.contains("\"stiffness\":120.0"));
        let parsed: CameraSettings = serde_json::from_str(&json).expect("deserialize settings");
        assert_eq!(parsed.spring, settings.spring);
    }
}
