//! Схема лога мыши (events.json).
//! schemaVersion: 1

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Тип системного курсора на момент события.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CursorKind {
    #[default]
    Arrow,
    Pointer,
    Text,
    Grab,
    Crosshair,
}

/// Одно событие мыши в пиксельных координатах записи.
///
/// Лог append-only: движок читает его, но никогда не изменяет.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MouseEvent {
    /// Миллисекунды от начала записи.
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub cursor_type: CursorKind,
}

/// Метаданные записи: разрешение захвата и лог мыши.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingMeta {
    pub schema_version: u32,
    /// Разрешение захваченного видео.
    pub width: u32,
    pub height: u32,
    pub events: Vec<MouseEvent>,
}

impl RecordingMeta {
    pub fn new(width: u32, height: u32, events: Vec<MouseEvent>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            width,
            height,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_event_with_camel_case_cursor_type() {
        let event = MouseEvent {
            timestamp: 120.0,
            x: 640.0,
            y: 360.0,
            cursor_type: CursorKind::Pointer,
        };

        let json = serde_json::to_string(&event).expect("serialize event");
        assert!(json.contains("\"cursorType\""));
        assert!(json.contains("\"pointer\""));
    }

    #[test]
    fn missing_cursor_type_defaults_to_arrow() {
        let raw = r#"{"timestamp":5.0,"x":10.0,"y":20.0}"#;
        let event: MouseEvent = serde_json::from_str(raw).expect("deserialize event");
        assert_eq!(event.cursor_type, CursorKind::Arrow);
    }

    #[test]
    fn recording_meta_round_trips() {
        let meta = RecordingMeta::new(
            1_920,
            1_080,
            vec![MouseEvent {
                timestamp: 0.0,
                x: 1.0,
                y: 2.0,
                cursor_type: CursorKind::Arrow,
            }],
        );

        let json = serde_json::to_string(&meta).expect("serialize meta");
        let parsed: RecordingMeta = serde_json::from_str(&json).expect("deserialize meta");
        assert_eq!(parsed.schema_version, SCHEMA_VERSION);
        assert_eq!(parsed.width, 1_920);
        assert_eq!(parsed.events.len(), 1);
    }
}
