//! Authoritative camera-center clamping.
//!
//! Invoked once per frame after all target/physics computation. Two modes:
//! a strict content clamp that never lets the window exit the crop
//! rectangle, and an overscan-reveal clamp that remaps the candidate into
//! output space (content plus background padding) so the camera may
//! intentionally show padding while zoomed.

use crate::models::timeline::NormalizedRect;

/// Normalized padding the rendered output extends beyond the video content
/// on each side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputOverscan {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl OutputOverscan {
    pub fn uniform(ratio: f64) -> Self {
        let ratio = ratio.max(0.0);
        OutputOverscan {
            left: ratio,
            right: ratio,
            top: ratio,
            bottom: ratio,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.left <= 0.0 && self.right <= 0.0 && self.top <= 0.0 && self.bottom <= 0.0
    }
}

/// Clamps the camera center so the visible window stays inside the crop
/// rectangle, or inside crop-plus-padding when overscan is configured.
pub fn clamp_center(
    center: (f64, f64),
    half_windows: (f64, f64),
    crop: &NormalizedRect,
    overscan: &OutputOverscan,
) -> (f64, f64) {
    if overscan.is_zero() {
        return (
            content_clamp_axis(center.0, half_windows.0, crop.x, crop.right()),
            content_clamp_axis(center.1, half_windows.1, crop.y, crop.bottom()),
        );
    }

    (
        overscan_clamp_axis(
            center.0,
            half_windows.0,
            crop.x,
            crop.right(),
            overscan.left,
            overscan.right,
        ),
        overscan_clamp_axis(
            center.1,
            half_windows.1,
            crop.y,
            crop.bottom(),
            overscan.top,
            overscan.bottom,
        ),
    )
}

fn content_clamp_axis(value: f64, half_window: f64, lo: f64, hi: f64) -> f64 {
    let min_center = lo + half_window;
    let max_center = hi - half_window;
    if min_center > max_center {
        log::debug!(
            "clamp_center: window wider than content span [{lo}, {hi}], settling on midpoint"
        );
        return (lo + hi) * 0.5;
    }
    value.clamp(min_center, max_center)
}

/// Remaps into output space (content + padding normalized to 0..1), clamps
/// there, and maps back, so travel limits follow the true output edges.
fn overscan_clamp_axis(
    value: f64,
    half_window: f64,
    lo: f64,
    hi: f64,
    pad_lo: f64,
    pad_hi: f64,
) -> f64 {
    let span_lo = lo - pad_lo.max(0.0);
    let span_hi = hi + pad_hi.max(0.0);
    let span = span_hi - span_lo;
    if span <= 0.0 {
        return (lo + hi) * 0.5;
    }

    let out = (value - span_lo) / span;
    let half_out = half_window / span;
    let clamped = if half_out > 0.5 {
        log::debug!("clamp_center: window wider than output span, settling on midpoint");
        0.5
    } else {
        out.clamp(half_out, 1.0 - half_out)
    };
    span_lo + clamped * span
}
