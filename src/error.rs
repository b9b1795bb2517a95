use thiserror::Error;

/// Validation failures raised while parsing timeline data.
///
/// Camera motion derived from corrupt authoring data is worse than no
/// camera motion, so these are fatal at parse time and always name the
/// offending effect and field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("zoom effect `{block_id}`: field `{field}` {reason}")]
    ZoomBlockField {
        block_id: String,
        field: &'static str,
        reason: String,
    },

    #[error("zoom effect `{block_id}`: interval [{start_ms}, {end_ms}) has no duration")]
    EmptyInterval {
        block_id: String,
        start_ms: f64,
        end_ms: f64,
    },
}

impl ValidationError {
    pub fn field(block_id: &str, field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::ZoomBlockField {
            block_id: block_id.to_string(),
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_block_and_field() {
        let err = ValidationError::field("zoom-3", "scale", "must be greater than zero");
        let text = err.to_string();
        assert!(text.contains("zoom-3"));
        assert!(text.contains("scale"));
    }

    #[test]
    fn empty_interval_display_carries_bounds() {
        let err = ValidationError::EmptyInterval {
            block_id: "zoom-1".to_string(),
            start_ms: 2_000.0,
            end_ms: 2_000.0,
        };
        assert!(err.to_string().contains("2000"));
    }
}
