//! Cursor trajectory interpolation, velocity, and dwell classification.
//!
//! Positions are returned in normalized source coordinates (0.0–1.0).
//! Dwell detection is hysteresis-based: once the attractor freezes on an
//! averaged position, a higher velocity is required to thaw it, so the
//! camera never oscillates at the threshold.

use crate::models::events::{MouseEvent, RecordingMeta};

/// Backward-looking window for instantaneous velocity.
pub const VELOCITY_WINDOW_MS: f64 = 90.0;
/// Normalized speed (units/s) below which the cursor counts as dwelling.
pub const STICKY_VELOCITY_THRESHOLD: f64 = 0.18;
/// Thaw requires this multiple of the freeze threshold.
pub const UNFREEZE_FACTOR: f64 = 1.5;
/// The cursor must dwell at least this long before the attractor freezes.
pub const DWELL_MIN_MS: f64 = 160.0;
/// Window for the smoothed sample taken at block entry.
pub const SMOOTH_SAMPLE_WINDOW_MS: f64 = 80.0;

const AVERAGE_SAMPLES: usize = 8;

/// Read-only view over a recording's mouse log.
#[derive(Debug, Clone, Copy)]
pub struct CursorTrack<'a> {
    events: &'a [MouseEvent],
    width: f64,
    height: f64,
}

impl<'a> CursorTrack<'a> {
    pub fn new(meta: &'a RecordingMeta) -> Self {
        Self::from_events(&meta.events, meta.width, meta.height)
    }

    pub fn from_events(events: &'a [MouseEvent], width: u32, height: u32) -> Self {
        CursorTrack {
            events,
            width: width.max(1) as f64,
            height: height.max(1) as f64,
        }
    }

    pub fn width_px(&self) -> f64 {
        self.width
    }

    pub fn height_px(&self) -> f64 {
        self.height
    }

    pub fn min_side_px(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Linear interpolation between the bracketing events; nearest event at
    /// stream ends. An empty log resolves to the frame center.
    pub fn position_at(&self, t_ms: f64) -> (f64, f64) {
        if self.events.is_empty() {
            return (0.5, 0.5);
        }

        let index = self
            .events
            .partition_point(|event| event.timestamp <= t_ms);
        if index == 0 {
            return self.normalize(self.events[0]);
        }
        if index == self.events.len() {
            return self.normalize(self.events[self.events.len() - 1]);
        }

        let left = self.events[index - 1];
        let right = self.events[index];
        let span = right.timestamp - left.timestamp;
        if span <= 0.0 {
            return self.normalize(right);
        }

        let ratio = ((t_ms - left.timestamp) / span).clamp(0.0, 1.0);
        self.normalize_xy(
            left.x + (right.x - left.x) * ratio,
            left.y + (right.y - left.y) * ratio,
        )
    }

    /// Velocity over the trailing [`VELOCITY_WINDOW_MS`], normalized units/s.
    pub fn velocity_at(&self, t_ms: f64) -> (f64, f64) {
        if self.events.len() < 2 {
            return (0.0, 0.0);
        }

        let (x1, y1) = self.position_at(t_ms);
        let (x0, y0) = self.position_at(t_ms - VELOCITY_WINDOW_MS);
        let window_s = VELOCITY_WINDOW_MS / 1_000.0;
        ((x1 - x0) / window_s, (y1 - y0) / window_s)
    }

    pub fn speed_at(&self, t_ms: f64) -> f64 {
        let (vx, vy) = self.velocity_at(t_ms);
        vx.hypot(vy)
    }

    /// Low-pass attractor: the mean position over `[from_ms, to_ms]`.
    pub fn averaged_position(&self, from_ms: f64, to_ms: f64) -> (f64, f64) {
        if to_ms <= from_ms {
            return self.position_at(to_ms);
        }

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for step in 0..AVERAGE_SAMPLES {
            let ratio = step as f64 / (AVERAGE_SAMPLES - 1) as f64;
            let (x, y) = self.position_at(from_ms + (to_ms - from_ms) * ratio);
            sum_x += x;
            sum_y += y;
        }
        (sum_x / AVERAGE_SAMPLES as f64, sum_y / AVERAGE_SAMPLES as f64)
    }

    /// Smoothed sample extrapolated ahead by the current velocity.
    pub fn lead_position(&self, t_ms: f64, lead_ms: f64) -> (f64, f64) {
        let (x, y) = self.averaged_position(t_ms - SMOOTH_SAMPLE_WINDOW_MS, t_ms);
        let (vx, vy) = self.velocity_at(t_ms);
        let lead_s = lead_ms / 1_000.0;
        (
            (x + vx * lead_s).clamp(0.0, 1.0),
            (y + vy * lead_s).clamp(0.0, 1.0),
        )
    }

    fn normalize(&self, event: MouseEvent) -> (f64, f64) {
        self.normalize_xy(event.x, event.y)
    }

    fn normalize_xy(&self, x: f64, y: f64) -> (f64, f64) {
        ((x / self.width).clamp(0.0, 1.0), (y / self.height).clamp(0.0, 1.0))
    }
}

/// Frozen-attractor bookkeeping carried inside the physics state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DwellState {
    /// Time the cursor first dropped below the sticky threshold.
    pub dwell_since_ms: Option<f64>,
    /// Averaged dwell position the camera is pinned to, if frozen.
    pub frozen: Option<(f64, f64)>,
}

impl DwellState {
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    pub fn reset(&mut self) {
        *self = DwellState::default();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DwellParams {
    pub sticky_threshold: f64,
    pub min_dwell_ms: f64,
}

impl Default for DwellParams {
    fn default() -> Self {
        DwellParams {
            sticky_threshold: STICKY_VELOCITY_THRESHOLD,
            min_dwell_ms: DWELL_MIN_MS,
        }
    }
}

impl DwellParams {
    /// Per-block override: `mouse_idle_px` of travel per 100 ms counts as
    /// idle, normalized against the source's smaller side. Zero keeps the
    /// default threshold.
    pub fn for_idle_px(mouse_idle_px: f64, min_side_px: f64) -> Self {
        if mouse_idle_px <= 0.0 {
            return DwellParams::default();
        }
        DwellParams {
            sticky_threshold: mouse_idle_px * 10.0 / min_side_px.max(1.0),
            min_dwell_ms: DWELL_MIN_MS,
        }
    }
}

/// Resolves the effective attractor at `t_ms`, updating the dwell state.
pub fn classify_dwell(
    track: &CursorTrack<'_>,
    t_ms: f64,
    dwell: &mut DwellState,
    params: &DwellParams,
) -> (f64, f64) {
    let speed = track.speed_at(t_ms);

    if let Some(frozen) = dwell.frozen {
        if speed > params.sticky_threshold * UNFREEZE_FACTOR {
            dwell.reset();
            return track.position_at(t_ms);
        }
        return frozen;
    }

    if speed < params.sticky_threshold {
        let since = *dwell.dwell_since_ms.get_or_insert(t_ms);
        if t_ms - since >= params.min_dwell_ms {
            let target = track.averaged_position(t_ms - params.min_dwell_ms, t_ms);
            dwell.frozen = Some(target);
            return target;
        }
    } else {
        dwell.dwell_since_ms = None;
    }

    track.position_at(t_ms)
}
