//! Per-frame camera solution.
//!
//! Orchestrates block lookup, cursor trajectory, phase control, dead-zone
//! following, visibility projection, bounds clamping and physics
//! integration. All mutable state lives in an explicit
//! [`CameraPhysicsState`] value owned by the calling loop and threaded
//! through every call; the engine itself holds nothing.

use crate::algorithm::bounds::{clamp_center, OutputOverscan};
use crate::algorithm::dead_zone::{
    adaptive_ratio, fill_scale, follow_target, half_windows, thirds_target,
};
use crate::algorithm::integrator::{is_seek, Integrator};
use crate::algorithm::phase::{blend_position, intro_position, phase_at, scale_at, Phase};
use crate::algorithm::trajectory::{
    classify_dwell, CursorTrack, DwellParams, DwellState, SMOOTH_SAMPLE_WINDOW_MS,
};
use crate::algorithm::visibility::{project_for_visibility, GlyphMargins};
use crate::algorithm::zoom_blocks::{
    active_block_at, BlockLookupCache, BlockScale, ParsedZoomBlock,
};
use crate::models::settings::CameraSettings;
use crate::models::timeline::{
    CursorData, FollowAlgorithm, FollowStrategy, NormalizedRect, ZoomIntoCursorMode,
};

/// Velocity lookahead for `zoomIntoCursorMode: lead`.
pub const LEAD_LOOKAHEAD_MS: f64 = 120.0;

/// Per-frame output canvas description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderLayout {
    pub output_width: u32,
    pub output_height: u32,
    /// Region of the output canvas the content occupies when composited
    /// into a device frame; `None` means the whole canvas.
    pub screen_rect: Option<NormalizedRect>,
}

impl RenderLayout {
    pub fn new(output_width: u32, output_height: u32) -> Self {
        RenderLayout {
            output_width,
            output_height,
            screen_rect: None,
        }
    }

    pub fn has_mockup(&self) -> bool {
        self.screen_rect.is_some()
    }

    /// Pixel dimensions of the canvas region the content is fitted into.
    pub fn content_dims(&self) -> (f64, f64) {
        let width = self.output_width.max(1) as f64;
        let height = self.output_height.max(1) as f64;
        match self.screen_rect {
            Some(rect) => (
                width * rect.width.clamp(0.001, 1.0),
                height * rect.height.clamp(0.001, 1.0),
            ),
            None => (width, height),
        }
    }
}

/// The only carried mutable entity. Owned exclusively by the calling loop
/// (path calculator for export, the playback controller for preview) and
/// never shared across concurrent callers.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPhysicsState {
    pub center: (f64, f64),
    pub velocity: (f64, f64),
    pub scale: f64,
    /// Camera center snapshotted on block entry; intro pans away from it.
    pub intro_anchor: Option<(f64, f64)>,
    /// Fixed intro destination computed once on block entry, so the
    /// zoom-in never chases a live, jittery cursor.
    pub intro_destination: Option<(f64, f64)>,
    pub dwell: DwellState,
    pub last_time_ms: Option<f64>,
    pub last_block_id: Option<String>,
}

impl Default for CameraPhysicsState {
    fn default() -> Self {
        CameraPhysicsState {
            center: (0.5, 0.5),
            velocity: (0.0, 0.0),
            scale: 1.0,
            intro_anchor: None,
            intro_destination: None,
            dwell: DwellState::default(),
            last_time_ms: None,
            last_block_id: None,
        }
    }
}

/// Everything the orchestrator needs for one frame. All referenced inputs
/// are resident in memory; the engine performs no I/O.
#[derive(Debug, Clone)]
pub struct FrameInput<'a> {
    pub time_ms: f64,
    pub blocks: &'a [ParsedZoomBlock],
    pub track: CursorTrack<'a>,
    pub crop: NormalizedRect,
    pub overscan: OutputOverscan,
    pub cursor: CursorData,
    pub layout: RenderLayout,
    pub settings: &'a CameraSettings,
}

/// Resolved camera placement for one frame. Center and scale are final,
/// already projected and clamped; consumers must not reinterpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSolution {
    pub block_id: Option<String>,
    pub center: (f64, f64),
    pub scale: f64,
}

impl FrameSolution {
    pub fn idle() -> Self {
        FrameSolution {
            block_id: None,
            center: (0.5, 0.5),
            scale: 1.0,
        }
    }
}

/// Computes the camera placement for one frame and the state to carry into
/// the next call.
pub fn solve_frame(
    input: &FrameInput<'_>,
    cache: &mut BlockLookupCache,
    state: CameraPhysicsState,
) -> (FrameSolution, CameraPhysicsState) {
    let mut state = state;
    let t = input.time_ms;

    let Some(block) = active_block_at(input.blocks, t, cache) else {
        // Idle invariant: no active block pins the camera to the default
        // framing and clears all per-block bookkeeping.
        state = CameraPhysicsState {
            last_time_ms: Some(t),
            ..CameraPhysicsState::default()
        };
        return (FrameSolution::idle(), state);
    };

    let (out_w, out_h) = input.layout.content_dims();
    let (src_w, src_h) = (input.track.width_px(), input.track.height_px());
    let target_scale = match block.scale {
        BlockScale::Fixed(scale) => scale,
        BlockScale::Fill => fill_scale(src_w, src_h, out_w, out_h),
    };

    let seek = is_seek(state.last_time_ms, t);
    let dt_ms = match state.last_time_ms {
        Some(last) if !seek => t - last,
        _ => 0.0,
    };

    if state.last_block_id.as_deref() != Some(block.id.as_str()) {
        state.dwell.reset();
        state.velocity = (0.0, 0.0);
        state.intro_anchor = Some(state.center);
        let halves_full = half_windows(target_scale, src_w, src_h, out_w, out_h);
        let margins = GlyphMargins::for_cursor(input.cursor.size, target_scale);
        state.intro_destination =
            Some(intro_destination(block, t, input, halves_full, &margins));
        state.last_block_id = Some(block.id.clone());
    }

    let tb = t.clamp(block.start_ms, block.end_ms);
    let phase = phase_at(block, tb);
    let current_scale = scale_at(block, phase, target_scale);

    let halves = half_windows(current_scale, src_w, src_h, out_w, out_h);
    let pinned = block.follow_strategy == FollowStrategy::Center
        || matches!(block.scale, BlockScale::Fill);

    let anchor = state.intro_anchor.unwrap_or((0.5, 0.5));
    let destination = state.intro_destination.unwrap_or((0.5, 0.5));

    let (center, velocity) = if pinned {
        ((0.5, 0.5), (0.0, 0.0))
    } else {
        match phase {
            Phase::Intro(p) => {
                let snap = block.zoom_into_cursor == ZoomIntoCursorMode::Snap;
                (intro_position(block, anchor, destination, p, snap), (0.0, 0.0))
            }
            Phase::Blend(progress) => {
                let live = live_target(block, t, current_scale, halves, &mut state, input);
                (blend_position(destination, live, progress), (0.0, 0.0))
            }
            Phase::Hold => {
                let live = live_target(block, t, current_scale, halves, &mut state, input);
                if seek || block.follow_algorithm == FollowAlgorithm::Direct {
                    (live, (0.0, 0.0))
                } else {
                    let integrator = Integrator::from_settings(input.settings, block.smoothing);
                    advance_center(&integrator, &state, live, dt_ms, current_scale)
                }
            }
            Phase::Outro(_) => {
                // Crane-shot settle back to the default framing.
                let target = (0.5, 0.5);
                if seek {
                    (target, (0.0, 0.0))
                } else {
                    let integrator = Integrator::from_settings(input.settings, block.smoothing)
                        .softened_for_outro();
                    advance_center(&integrator, &state, target, dt_ms, current_scale)
                }
            }
        }
    };

    // Single authoritative clamp; pinned centers are exact by contract.
    let clamped = if pinned {
        center
    } else {
        clamp_center(center, halves, &input.crop, &input.overscan)
    };

    state.center = clamped;
    state.velocity = velocity;
    state.scale = current_scale;
    state.last_time_ms = Some(t);

    (
        FrameSolution {
            block_id: Some(block.id.clone()),
            center: clamped,
            scale: current_scale,
        },
        state,
    )
}

fn advance_center(
    integrator: &Integrator,
    state: &CameraPhysicsState,
    target: (f64, f64),
    dt_ms: f64,
    scale: f64,
) -> ((f64, f64), (f64, f64)) {
    let (x, vx) = integrator.advance(state.center.0, state.velocity.0, target.0, dt_ms, scale);
    let (y, vy) = integrator.advance(state.center.1, state.velocity.1, target.1, dt_ms, scale);
    ((x, y), (vx, vy))
}

/// Fixed intro destination: the position the hold algorithm would select
/// once fully zoomed in, from a smoothed cursor sample taken at entry.
fn intro_destination(
    block: &ParsedZoomBlock,
    entry_ms: f64,
    input: &FrameInput<'_>,
    halves: (f64, f64),
    margins: &GlyphMargins,
) -> (f64, f64) {
    let destination = match block.follow_strategy {
        FollowStrategy::Center => (0.5, 0.5),
        FollowStrategy::Manual => block
            .manual_target
            .map_or((0.5, 0.5), |target| target.normalized()),
        FollowStrategy::Mouse => {
            let sample = match block.zoom_into_cursor {
                ZoomIntoCursorMode::Center => {
                    return clamp_center((0.5, 0.5), halves, &input.crop, &input.overscan);
                }
                ZoomIntoCursorMode::Lead => {
                    input.track.lead_position(entry_ms, LEAD_LOOKAHEAD_MS)
                }
                ZoomIntoCursorMode::Cursor | ZoomIntoCursorMode::Snap => input
                    .track
                    .averaged_position(entry_ms - SMOOTH_SAMPLE_WINDOW_MS, entry_ms),
            };
            let framed = match block.follow_algorithm {
                FollowAlgorithm::Thirds => thirds_target(sample, halves),
                _ => sample,
            };
            project_for_visibility(framed, input.track.position_at(entry_ms), halves, margins)
                .center
        }
    };
    clamp_center(destination, halves, &input.crop, &input.overscan)
}

/// Live hold target: dwell-classified attractor through the selected follow
/// algorithm, visibility-projected against the raw cursor.
fn live_target(
    block: &ParsedZoomBlock,
    t_ms: f64,
    scale: f64,
    halves: (f64, f64),
    state: &mut CameraPhysicsState,
    input: &FrameInput<'_>,
) -> (f64, f64) {
    match block.follow_strategy {
        FollowStrategy::Center => (0.5, 0.5),
        FollowStrategy::Manual => block
            .manual_target
            .map_or((0.5, 0.5), |target| target.normalized()),
        FollowStrategy::Mouse => {
            let raw = input.track.position_at(t_ms);
            let attractor = if block.follow_algorithm == FollowAlgorithm::Direct {
                raw
            } else {
                let params =
                    DwellParams::for_idle_px(block.mouse_idle_px, input.track.min_side_px());
                classify_dwell(&input.track, t_ms, &mut state.dwell, &params)
            };

            let dead_zone = &input.settings.dead_zone;
            let max_ratio = block.dead_zone_ratio.unwrap_or(dead_zone.max_ratio);
            let ratio = adaptive_ratio(scale, max_ratio, dead_zone);
            let framed = match block.follow_algorithm {
                FollowAlgorithm::Deadzone => {
                    follow_target(attractor, state.center, halves, ratio)
                }
                FollowAlgorithm::Direct | FollowAlgorithm::Smooth => attractor,
                FollowAlgorithm::Thirds => thirds_target(attractor, halves),
            };

            let margins = GlyphMargins::for_cursor(input.cursor.size, scale);
            let projection = project_for_visibility(framed, raw, halves, &margins);
            if projection.correction != (0.0, 0.0) {
                // Anchor slide: keep the frozen dwell target consistent with
                // the applied correction so later frames don't snap back.
                if let Some(frozen) = state.dwell.frozen {
                    state.dwell.frozen = Some((
                        frozen.0 + projection.correction.0,
                        frozen.1 + projection.correction.1,
                    ));
                }
            }
            projection.center
        }
    }
}
