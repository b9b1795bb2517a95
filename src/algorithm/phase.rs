//! Zoom-block phase control: intro, intro-to-hold blend, hold, outro.
//!
//! The phase decides how the center and scale are produced each frame:
//! the intro interpolates from the entry anchor toward a fixed
//! destination with the same eased curve driving the scale ramp (pan and
//! zoom complete together), a short blend window hands off to live
//! tracking without a pop, and the outro settles back to the default
//! framing.

use crate::algorithm::easing::{ease, lerp, smootherstep};
use crate::algorithm::zoom_blocks::ParsedZoomBlock;

/// Blend window between the intro's fixed destination and live tracking.
pub const INTRO_HOLD_BLEND_MS: f64 = 150.0;

/// Temporal phase of a zoom block at a given block-local time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Eased zoom-in; payload is raw progress in [0, 1].
    Intro(f64),
    /// Intro-to-hold handoff; payload is raw progress in [0, 1].
    Blend(f64),
    /// Steady-state follow.
    Hold,
    /// Eased zoom-out; payload is raw progress in [0, 1].
    Outro(f64),
}

/// Phase for `tb`, which must already be clamped into `[start, end]`.
pub fn phase_at(block: &ParsedZoomBlock, tb: f64) -> Phase {
    let (intro_ms, outro_ms) = block.effective_ramps();
    let intro_end = block.start_ms + intro_ms;
    let outro_start = block.end_ms - outro_ms;

    if intro_ms > 0.0 && tb < intro_end {
        return Phase::Intro((tb - block.start_ms) / intro_ms);
    }
    if tb >= outro_start {
        if outro_ms <= 0.0 {
            return Phase::Hold;
        }
        return Phase::Outro(((tb - outro_start) / outro_ms).clamp(0.0, 1.0));
    }
    if tb - intro_end < INTRO_HOLD_BLEND_MS {
        return Phase::Blend((tb - intro_end) / INTRO_HOLD_BLEND_MS);
    }
    Phase::Hold
}

/// Scale ramp: 1 -> target during the intro, target -> 1 during the outro,
/// flat in between, driven by the block's transition-style easing.
pub fn scale_at(block: &ParsedZoomBlock, phase: Phase, target_scale: f64) -> f64 {
    match phase {
        Phase::Intro(p) => lerp(1.0, target_scale, ease(block.transition_style, p)),
        Phase::Outro(q) => lerp(target_scale, 1.0, ease(block.transition_style, q)),
        Phase::Blend(_) | Phase::Hold => target_scale,
    }
}

/// Intro center: eased interpolation from the entry anchor to the fixed
/// destination. Snap mode jumps straight to the destination and lets the
/// scale ramp do the work.
pub fn intro_position(
    block: &ParsedZoomBlock,
    anchor: (f64, f64),
    destination: (f64, f64),
    progress: f64,
    snap: bool,
) -> (f64, f64) {
    if snap {
        return destination;
    }
    let eased = ease(block.transition_style, progress);
    (
        lerp(anchor.0, destination.0, eased),
        lerp(anchor.1, destination.1, eased),
    )
}

/// Intro-to-hold handoff: smootherstep-weighted interpolation from the
/// intro's ending position to the live target.
pub fn blend_position(
    destination: (f64, f64),
    live: (f64, f64),
    progress: f64,
) -> (f64, f64) {
    let weight = smootherstep(progress);
    (
        lerp(destination.0, live.0, weight),
        lerp(destination.1, live.1, weight),
    )
}
