//! Parsing and lookup of timeline zoom blocks.
//!
//! Authoring data is untrusted: every numeric field is validated up front
//! and parsing fails fast with the offending effect id and field instead of
//! coercing. Lookup tolerates boundary rounding with a bounded epsilon.

use crate::error::ValidationError;
use crate::models::timeline::{
    Effect, EffectData, FollowAlgorithm, FollowStrategy, TransitionStyle, ZoomData,
    ZoomIntoCursorMode,
};

/// Pre-/post-roll tolerance for frame times that land just outside a block.
pub const BLOCK_EDGE_EPSILON_MS: f64 = 40.0;

/// Target scale of a block: fixed factor or fill-the-output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockScale {
    Fixed(f64),
    Fill,
}

/// Manual focus point in reference-screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualTarget {
    pub x: f64,
    pub y: f64,
    pub screen_width: f64,
    pub screen_height: f64,
}

impl ManualTarget {
    /// Target normalized into the reference dimensions, clamped to frame.
    pub fn normalized(&self) -> (f64, f64) {
        (
            (self.x / self.screen_width).clamp(0.0, 1.0),
            (self.y / self.screen_height).clamp(0.0, 1.0),
        )
    }
}

/// Validated, immutable view of one timeline zoom effect.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedZoomBlock {
    pub id: String,
    pub start_ms: f64,
    pub end_ms: f64,
    pub scale: BlockScale,
    pub intro_ms: f64,
    pub outro_ms: f64,
    /// 0–100; 0 means the global camera smoothness applies.
    pub smoothing: f64,
    pub manual_target: Option<ManualTarget>,
    pub follow_strategy: FollowStrategy,
    pub mouse_idle_px: f64,
    pub dead_zone_ratio: Option<f64>,
    pub transition_style: TransitionStyle,
    pub follow_algorithm: FollowAlgorithm,
    pub zoom_into_cursor: ZoomIntoCursorMode,
}

impl ParsedZoomBlock {
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    pub fn contains(&self, t_ms: f64) -> bool {
        t_ms >= self.start_ms && t_ms < self.end_ms
    }

    /// Distance from `t_ms` to the block interval; 0.0 inside.
    pub fn edge_distance(&self, t_ms: f64) -> f64 {
        if t_ms < self.start_ms {
            self.start_ms - t_ms
        } else if t_ms >= self.end_ms {
            t_ms - self.end_ms
        } else {
            0.0
        }
    }

    /// Intro/outro durations, proportionally shrunk when their sum exceeds
    /// the block duration so the ramps never overlap.
    pub fn effective_ramps(&self) -> (f64, f64) {
        let total = self.intro_ms + self.outro_ms;
        let duration = self.duration_ms();
        if total <= duration || total <= 0.0 {
            return (self.intro_ms, self.outro_ms);
        }
        let factor = duration / total;
        (self.intro_ms * factor, self.outro_ms * factor)
    }
}

/// Parses enabled zoom effects into validated blocks, preserving authored
/// order so overlap resolution stays author-defined.
pub fn parse_zoom_blocks(effects: &[Effect]) -> Result<Vec<ParsedZoomBlock>, ValidationError> {
    let mut blocks = Vec::new();

    for effect in effects {
        let zoom = match &effect.data {
            EffectData::Zoom(zoom) if effect.enabled => zoom,
            _ => continue,
        };
        let id = effect.id.as_str();

        require_finite(id, "startTime", effect.start_time)?;
        require_finite(id, "endTime", effect.end_time)?;
        if effect.start_time >= effect.end_time {
            return Err(ValidationError::EmptyInterval {
                block_id: id.to_string(),
                start_ms: effect.start_time,
                end_ms: effect.end_time,
            });
        }

        let scale = match (zoom.auto_scale, zoom.scale) {
            (Some(_), _) => BlockScale::Fill,
            (None, Some(value)) => {
                require_finite(id, "scale", value)?;
                if value <= 0.0 {
                    return Err(ValidationError::field(
                        id,
                        "scale",
                        "must be greater than zero",
                    ));
                }
                BlockScale::Fixed(value)
            }
            (None, None) => {
                return Err(ValidationError::field(
                    id,
                    "scale",
                    "is required when autoScale is not set",
                ));
            }
        };

        require_non_negative(id, "introMs", zoom.intro_ms)?;
        require_non_negative(id, "outroMs", zoom.outro_ms)?;
        require_non_negative(id, "smoothing", zoom.smoothing)?;
        require_non_negative(id, "mouseIdlePx", zoom.mouse_idle_px)?;

        if let Some(ratio) = zoom.dead_zone_ratio {
            require_finite(id, "deadZoneRatio", ratio)?;
            if !(0.0..1.0).contains(&ratio) {
                return Err(ValidationError::field(
                    id,
                    "deadZoneRatio",
                    "must be in [0, 1)",
                ));
            }
        }

        let manual_target = if zoom.follow_strategy == FollowStrategy::Manual {
            Some(parse_manual_target(id, zoom)?)
        } else {
            None
        };

        blocks.push(ParsedZoomBlock {
            id: id.to_string(),
            start_ms: effect.start_time,
            end_ms: effect.end_time,
            scale,
            intro_ms: zoom.intro_ms,
            outro_ms: zoom.outro_ms,
            smoothing: zoom.smoothing,
            manual_target,
            follow_strategy: zoom.follow_strategy,
            mouse_idle_px: zoom.mouse_idle_px,
            dead_zone_ratio: zoom.dead_zone_ratio,
            transition_style: zoom.transition_style,
            follow_algorithm: zoom.mouse_follow_algorithm,
            zoom_into_cursor: zoom.zoom_into_cursor_mode,
        });
    }

    Ok(blocks)
}

fn parse_manual_target(id: &str, zoom: &ZoomData) -> Result<ManualTarget, ValidationError> {
    let x = zoom
        .target_x
        .ok_or_else(|| ValidationError::field(id, "targetX", "is required for manual follow"))?;
    let y = zoom
        .target_y
        .ok_or_else(|| ValidationError::field(id, "targetY", "is required for manual follow"))?;
    let screen_width = zoom.screen_width.ok_or_else(|| {
        ValidationError::field(id, "screenWidth", "is required for manual follow")
    })?;
    let screen_height = zoom.screen_height.ok_or_else(|| {
        ValidationError::field(id, "screenHeight", "is required for manual follow")
    })?;

    require_finite(id, "targetX", x)?;
    require_finite(id, "targetY", y)?;
    require_finite(id, "screenWidth", screen_width)?;
    require_finite(id, "screenHeight", screen_height)?;
    if screen_width <= 0.0 || screen_height <= 0.0 {
        return Err(ValidationError::field(
            id,
            "screenWidth",
            "reference dimensions must be positive",
        ));
    }

    Ok(ManualTarget {
        x,
        y,
        screen_width,
        screen_height,
    })
}

fn require_finite(id: &str, field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::field(id, field, "must be a finite number"))
    }
}

fn require_non_negative(id: &str, field: &'static str, value: f64) -> Result<(), ValidationError> {
    require_finite(id, field, value)?;
    if value < 0.0 {
        return Err(ValidationError::field(id, field, "must not be negative"));
    }
    Ok(())
}

/// Lookup memo owned by the calling context (one per preview session or
/// export run). Replaces hidden module-level caches: invalidation is an
/// explicit version bump.
#[derive(Debug, Clone, Default)]
pub struct BlockLookupCache {
    version: u64,
    last_hit: Option<usize>,
}

impl BlockLookupCache {
    pub fn new(version: u64) -> Self {
        BlockLookupCache {
            version,
            last_hit: None,
        }
    }

    /// Drops the memo when the timeline identity changed.
    pub fn sync(&mut self, version: u64) {
        if self.version != version {
            self.version = version;
            self.last_hit = None;
        }
    }
}

/// Resolves the block active at `t_ms`: exact `[start, end)` match first
/// (authored order wins on overlap), else the nearest block within
/// [`BLOCK_EDGE_EPSILON_MS`], ties broken by smallest distance.
pub fn active_block_at<'a>(
    blocks: &'a [ParsedZoomBlock],
    t_ms: f64,
    cache: &mut BlockLookupCache,
) -> Option<&'a ParsedZoomBlock> {
    if let Some(index) = cache.last_hit {
        if let Some(block) = blocks.get(index) {
            if block.contains(t_ms) {
                return Some(block);
            }
        }
    }

    if let Some(index) = blocks.iter().position(|block| block.contains(t_ms)) {
        cache.last_hit = Some(index);
        return Some(&blocks[index]);
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, block) in blocks.iter().enumerate() {
        let distance = block.edge_distance(t_ms);
        if distance > BLOCK_EDGE_EPSILON_MS {
            continue;
        }
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }

    match best {
        Some((index, distance)) => {
            log::debug!(
                "active_block_at: fuzzy match `{}` at t={t_ms}ms (distance {distance}ms)",
                blocks[index].id
            );
            cache.last_hit = Some(index);
            Some(&blocks[index])
        }
        None => {
            cache.last_hit = None;
            None
        }
    }
}
