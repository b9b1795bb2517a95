//! Whole-composition camera path computation.
//!
//! Drives the per-frame loop for export: frames are visited strictly
//! forward with the physics state folded into the next iteration, so the
//! pass is deterministic and bit-reproducible. The result is a flat array
//! the renderer indexes by frame number; preview sessions reuse the same
//! [`solve_frame`] entry point with their own state.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::algorithm::bounds::OutputOverscan;
use crate::algorithm::camera_engine::{
    solve_frame, CameraPhysicsState, FrameInput, FrameSolution, RenderLayout,
};
use crate::algorithm::trajectory::CursorTrack;
use crate::algorithm::zoom_blocks::{parse_zoom_blocks, BlockLookupCache};
use crate::error::ValidationError;
use crate::models::events::RecordingMeta;
use crate::models::settings::{CameraSettings, MotionBlurSettings};
use crate::models::timeline::{CursorData, Effect, EffectData, NormalizedRect};

/// How often the cancellation flag is polled, in frames.
const CANCEL_CHECK_INTERVAL: usize = 64;

/// Ready-to-apply camera transform: scale plus normalized pan.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomTransform {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl ZoomTransform {
    pub fn identity() -> Self {
        ZoomTransform {
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    pub fn from_center(center: (f64, f64), scale: f64) -> Self {
        ZoomTransform {
            scale,
            pan_x: (0.5 - center.0) * scale,
            pan_y: (0.5 - center.1) * scale,
        }
    }

    /// Pre-formatted transform string for CSS-style consumers.
    pub fn to_css(&self) -> String {
        format!(
            "scale({:.4}) translate({:.3}%, {:.3}%)",
            self.scale,
            self.pan_x * 100.0,
            self.pan_y * 100.0
        )
    }
}

/// Per-frame output record. Values are final: already projected and
/// clamped, never to be reinterpreted by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPathFrame {
    pub active_block: Option<String>,
    pub center: (f64, f64),
    pub velocity: (f64, f64),
    pub motion_blur_mix: f64,
    pub transform: ZoomTransform,
    pub transform_css: String,
}

impl CameraPathFrame {
    pub fn identity() -> Self {
        let transform = ZoomTransform::identity();
        CameraPathFrame {
            active_block: None,
            center: (0.5, 0.5),
            velocity: (0.0, 0.0),
            motion_blur_mix: 0.0,
            transform_css: transform.to_css(),
            transform,
        }
    }
}

/// Inputs for one full path computation. All data is already resident in
/// memory; the calculator performs no I/O.
#[derive(Debug, Clone)]
pub struct PathRequest<'a> {
    pub effects: &'a [Effect],
    pub recording: &'a RecordingMeta,
    pub settings: &'a CameraSettings,
    pub layout: RenderLayout,
    pub fps: f64,
    pub frame_count: usize,
}

/// Computes the camera path for every frame of the composition.
pub fn calculate_path(
    request: &PathRequest<'_>,
) -> Result<Vec<CameraPathFrame>, ValidationError> {
    Ok(compute(request, None)?.unwrap_or_default())
}

/// Cancellable variant for background export pre-computation: returns
/// `Ok(None)` when the flag is raised so an in-flight pass is discarded
/// rather than partially applied.
pub fn calculate_path_cancellable(
    request: &PathRequest<'_>,
    cancel: &AtomicBool,
) -> Result<Option<Vec<CameraPathFrame>>, ValidationError> {
    compute(request, Some(cancel))
}

fn compute(
    request: &PathRequest<'_>,
    cancel: Option<&AtomicBool>,
) -> Result<Option<Vec<CameraPathFrame>>, ValidationError> {
    let blocks = parse_zoom_blocks(request.effects)?;
    let frame_count = request.frame_count;

    // Fast path: nothing ever moves the camera, so every frame is the
    // same default record.
    if blocks.is_empty() && !request.layout.has_mockup() {
        log::debug!("calculate_path: fast path, {frame_count} uniform frames");
        return Ok(Some(vec![CameraPathFrame::identity(); frame_count]));
    }

    let fps = if request.fps.is_finite() {
        request.fps.clamp(1.0, 240.0)
    } else {
        30.0
    };
    let frame_ms = 1_000.0 / fps;
    let track = CursorTrack::new(request.recording);

    let mut cache = BlockLookupCache::default();
    let mut state = CameraPhysicsState::default();
    let mut frames = Vec::with_capacity(frame_count);
    let mut previous: Option<FrameSolution> = None;

    log::debug!("calculate_path: {frame_count} frames at {fps} fps, {} blocks", blocks.len());
    for index in 0..frame_count {
        if let Some(flag) = cancel {
            if index % CANCEL_CHECK_INTERVAL == 0 && flag.load(Ordering::Relaxed) {
                log::debug!("calculate_path: cancelled at frame {index}, pass discarded");
                return Ok(None);
            }
        }

        let time_ms = index as f64 * frame_ms;
        let frame_input = FrameInput {
            time_ms,
            blocks: &blocks,
            track,
            crop: crop_at(request.effects, time_ms),
            overscan: overscan_at(request.effects, time_ms),
            cursor: cursor_at(request.effects, time_ms),
            layout: request.layout,
            settings: request.settings,
        };

        let (solution, next_state) = solve_frame(&frame_input, &mut cache, state);
        state = next_state;

        let velocity = derive_velocity(previous.as_ref(), &solution, frame_ms);
        let motion_blur_mix = motion_blur_mix(velocity, &request.settings.motion_blur);
        let transform = ZoomTransform::from_center(solution.center, solution.scale);
        frames.push(CameraPathFrame {
            active_block: solution.block_id.clone(),
            center: solution.center,
            velocity,
            motion_blur_mix,
            transform_css: transform.to_css(),
            transform,
        });
        previous = Some(solution);
    }

    Ok(Some(frames))
}

/// Velocity from the previous frame's resolved center, weighted by
/// `(scale - 1)` so it is zero whenever there is no visual pan.
fn derive_velocity(
    previous: Option<&FrameSolution>,
    current: &FrameSolution,
    frame_ms: f64,
) -> (f64, f64) {
    let Some(previous) = previous else {
        return (0.0, 0.0);
    };
    let dt_s = frame_ms / 1_000.0;
    let weight = (current.scale - 1.0).max(0.0);
    (
        (current.center.0 - previous.center.0) / dt_s * weight,
        (current.center.1 - previous.center.1) / dt_s * weight,
    )
}

fn motion_blur_mix(velocity: (f64, f64), settings: &MotionBlurSettings) -> f64 {
    if settings.intensity <= 0.0 {
        return 0.0;
    }
    let speed = velocity.0.hypot(velocity.1);
    let ramp = settings.ramp.max(1e-9);
    ((speed - settings.threshold) / ramp).clamp(0.0, 1.0) * settings.intensity.clamp(0.0, 1.0)
}

fn crop_at(effects: &[Effect], time_ms: f64) -> NormalizedRect {
    active_payload(effects, time_ms, |data| match data {
        EffectData::Crop(crop) => Some(crop.rect),
        _ => None,
    })
    .unwrap_or_else(NormalizedRect::full)
}

fn overscan_at(effects: &[Effect], time_ms: f64) -> OutputOverscan {
    active_payload(effects, time_ms, |data| match data {
        EffectData::Background(background) => {
            Some(OutputOverscan::uniform(background.padding_ratio))
        }
        _ => None,
    })
    .unwrap_or_default()
}

fn cursor_at(effects: &[Effect], time_ms: f64) -> CursorData {
    active_payload(effects, time_ms, |data| match data {
        EffectData::Cursor(cursor) => Some(*cursor),
        _ => None,
    })
    .unwrap_or_default()
}

/// First enabled effect of the wanted kind active at `time_ms`, in
/// authored order.
fn active_payload<T>(
    effects: &[Effect],
    time_ms: f64,
    select: impl Fn(&EffectData) -> Option<T>,
) -> Option<T> {
    effects
        .iter()
        .filter(|effect| {
            effect.enabled && time_ms >= effect.start_time && time_ms < effect.end_time
        })
        .find_map(|effect| select(&effect.data))
}
