//! Схема таймлайна эффектов (timeline.json).
//! schemaVersion: 1
//!
//! Движок читает только эффекты zoom / crop / background / cursor;
//! все поля режимов — типизированные enum'ы.

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Прямоугольная область в нормализованных координатах (0.0–1.0).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub fn full() -> Self {
        NormalizedRect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl Default for NormalizedRect {
    fn default() -> Self {
        NormalizedRect::full()
    }
}

/// Easing-кривая интро/аутро зум-блока.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionStyle {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

/// Что камера отслеживает внутри зум-блока.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FollowStrategy {
    #[default]
    Mouse,
    Center,
    Manual,
}

/// Алгоритм слежения за курсором в фазе hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FollowAlgorithm {
    #[default]
    Deadzone,
    Direct,
    Smooth,
    Thirds,
}

/// Куда направлен наезд камеры при входе в блок.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomIntoCursorMode {
    Center,
    #[default]
    Cursor,
    Snap,
    Lead,
}

/// Автоматический выбор масштаба вместо фиксированного значения.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AutoScale {
    Fill,
}

fn default_intro_ms() -> f64 {
    300.0
}

fn default_outro_ms() -> f64 {
    300.0
}

fn default_enabled() -> bool {
    true
}

fn default_cursor_size() -> f64 {
    1.0
}

fn default_cursor_smoothing() -> f64 {
    0.8
}

/// Пользовательские данные зум-эффекта (до валидации).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoomData {
    /// Целевой масштаб (>0). Игнорируется при autoScale.
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub auto_scale: Option<AutoScale>,
    #[serde(default = "default_intro_ms")]
    pub intro_ms: f64,
    #[serde(default = "default_outro_ms")]
    pub outro_ms: f64,
    /// 0–100; 0 — использовать глобальную настройку камеры.
    #[serde(default)]
    pub smoothing: f64,
    /// Ручная цель в пикселях референсного экрана.
    #[serde(default)]
    pub target_x: Option<f64>,
    #[serde(default)]
    pub target_y: Option<f64>,
    #[serde(default)]
    pub screen_width: Option<f64>,
    #[serde(default)]
    pub screen_height: Option<f64>,
    #[serde(default)]
    pub follow_strategy: FollowStrategy,
    /// Порог «мышь стоит», px. 0 — порог по умолчанию.
    #[serde(default)]
    pub mouse_idle_px: f64,
    #[serde(default)]
    pub dead_zone_ratio: Option<f64>,
    #[serde(default)]
    pub transition_style: TransitionStyle,
    #[serde(default)]
    pub mouse_follow_algorithm: FollowAlgorithm,
    #[serde(default)]
    pub zoom_into_cursor_mode: ZoomIntoCursorMode,
}

impl Default for ZoomData {
    fn default() -> Self {
        ZoomData {
            scale: None,
            auto_scale: None,
            intro_ms: default_intro_ms(),
            outro_ms: default_outro_ms(),
            smoothing: 0.0,
            target_x: None,
            target_y: None,
            screen_width: None,
            screen_height: None,
            follow_strategy: FollowStrategy::default(),
            mouse_idle_px: 0.0,
            dead_zone_ratio: None,
            transition_style: TransitionStyle::default(),
            mouse_follow_algorithm: FollowAlgorithm::default(),
            zoom_into_cursor_mode: ZoomIntoCursorMode::default(),
        }
    }
}

/// Кадрирование исходного видео.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CropData {
    #[serde(default)]
    pub rect: NormalizedRect,
}

/// Тип фона за видео.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BackgroundStyle {
    Solid {
        color: String,
    },
    Gradient {
        from: String,
        to: String,
        direction: String,
    },
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        BackgroundStyle::Solid {
            color: "#1a1a2e".to_string(),
        }
    }
}

/// Фон и отступ вокруг контента.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundData {
    #[serde(default)]
    pub style: BackgroundStyle,
    /// Доля контента, отведённая под фон с каждой стороны (≥0).
    #[serde(default)]
    pub padding_ratio: f64,
}

/// Настройки отрисовки курсора.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CursorData {
    /// Относительный размер глифа (1.0 = нормальный).
    #[serde(default = "default_cursor_size")]
    pub size: f64,
    /// Сглаживание траектории при отрисовке (0.0–1.0).
    #[serde(default = "default_cursor_smoothing")]
    pub smoothing: f64,
}

impl Default for CursorData {
    fn default() -> Self {
        CursorData {
            size: default_cursor_size(),
            smoothing: default_cursor_smoothing(),
        }
    }
}

/// Типизированная нагрузка эффекта.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum EffectData {
    Zoom(ZoomData),
    Crop(CropData),
    Background(BackgroundData),
    Cursor(CursorData),
}

/// Один эффект на таймлайне: интервал [startTime, endTime) в мс.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(flatten)]
    pub data: EffectData,
}

impl Effect {
    pub fn zoom(id: &str, start_time: f64, end_time: f64, data: ZoomData) -> Self {
        Effect {
            id: id.to_string(),
            enabled: true,
            start_time,
            end_time,
            data: EffectData::Zoom(data),
        }
    }
}
