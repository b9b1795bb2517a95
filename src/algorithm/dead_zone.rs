//! Adaptive dead-zone follow target and viewport geometry.
//!
//! The boundary between "inside the dead zone" (camera holds) and "outside"
//! (camera tracks the cursor to the zone edge) is not a hard step: a
//! transition band blends the two with a smootherstep weight so crossing
//! the boundary never produces a velocity discontinuity.

use crate::algorithm::easing::{lerp, smootherstep};
use crate::models::settings::DeadZoneSettings;

/// The soft transition band spans 1.0x–1.5x of the dead-zone half-extent.
pub const TRANSITION_BAND_FACTOR: f64 = 1.5;

/// Half the normalized width/height of the visible source region.
///
/// At scale <= 1 the visible window is the whole frame. Above 1 the window
/// shrinks by 1/scale, with the constrained axis corrected when output and
/// source aspect ratios differ (letterbox vs. pillarbox).
pub fn half_windows(
    scale: f64,
    source_width: f64,
    source_height: f64,
    output_width: f64,
    output_height: f64,
) -> (f64, f64) {
    if scale <= 1.0 {
        return (0.5, 0.5);
    }

    let source_aspect = source_width.max(1.0) / source_height.max(1.0);
    let output_aspect = output_width.max(1.0) / output_height.max(1.0);

    let mut width_norm = 1.0 / scale;
    let mut height_norm = (width_norm * source_aspect) / output_aspect;
    if height_norm > 1.0 {
        height_norm = 1.0 / scale;
        width_norm = (height_norm * output_aspect) / source_aspect;
    }

    ((width_norm * 0.5).min(0.5), (height_norm * 0.5).min(0.5))
}

/// Scale at which the source content fully covers the output canvas
/// (no letterbox bars), used by `autoScale: fill` blocks.
pub fn fill_scale(
    source_width: f64,
    source_height: f64,
    output_width: f64,
    output_height: f64,
) -> f64 {
    let source_aspect = source_width.max(1.0) / source_height.max(1.0);
    let output_aspect = output_width.max(1.0) / output_height.max(1.0);
    (output_aspect / source_aspect).max(source_aspect / output_aspect)
}

/// Dead-zone ratio for the current zoom: `max_ratio` (the configured or
/// per-block maximum) shrinks toward the floor between the configured
/// start and end scales — tighter zoom needs tighter tracking.
pub fn adaptive_ratio(scale: f64, max_ratio: f64, settings: &DeadZoneSettings) -> f64 {
    let floor = settings.floor_ratio.min(max_ratio);
    let start = settings.adapt_start_scale;
    let end = settings.adapt_end_scale.max(start + f64::EPSILON);
    if scale <= start {
        return max_ratio;
    }
    if scale >= end {
        return floor;
    }
    lerp(max_ratio, floor, (scale - start) / (end - start))
}

/// Follow target for the current cursor and camera center.
///
/// Inside the dead zone the target is exactly the current center (no
/// drift); past the transition band the target places the cursor on the
/// dead-zone edge; in between the two are smootherstep-blended.
pub fn follow_target(
    cursor: (f64, f64),
    center: (f64, f64),
    half_windows: (f64, f64),
    ratio: f64,
) -> (f64, f64) {
    (
        axis_target(cursor.0, center.0, half_windows.0, ratio),
        axis_target(cursor.1, center.1, half_windows.1, ratio),
    )
}

fn axis_target(cursor: f64, center: f64, half_window: f64, ratio: f64) -> f64 {
    let dead = half_window * ratio.clamp(0.0, 1.0);
    let offset = cursor - center;
    let magnitude = offset.abs();

    if magnitude <= dead {
        return center;
    }

    // Center that puts the cursor exactly on the dead-zone edge.
    let tracked = cursor - offset.signum() * dead;
    let band_end = dead * TRANSITION_BAND_FACTOR;
    if magnitude >= band_end || band_end <= dead {
        return tracked;
    }

    let weight = smootherstep((magnitude - dead) / (band_end - dead));
    lerp(center, tracked, weight)
}

/// Rule-of-thirds framing: the cursor sits on the viewport third line
/// nearer the frame center, leaving room ahead of it.
pub fn thirds_target(cursor: (f64, f64), half_windows: (f64, f64)) -> (f64, f64) {
    let offset_x = if cursor.0 <= 0.5 { 1.0 } else { -1.0 } * half_windows.0 / 3.0;
    let offset_y = if cursor.1 <= 0.5 { 1.0 } else { -1.0 } * half_windows.1 / 3.0;
    (cursor.0 + offset_x, cursor.1 + offset_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_windows_cover_full_frame_at_or_below_unit_scale() {
        assert_eq!(half_windows(1.0, 1_920.0, 1_080.0, 1_920.0, 1_080.0), (0.5, 0.5));
        assert_eq!(half_windows(0.5, 1_920.0, 1_080.0, 1_920.0, 1_080.0), (0.5, 0.5));
    }

    #[test]
    fn half_windows_shrink_by_inverse_scale_for_matching_aspects() {
        let (hw, hh) = half_windows(2.0, 1_920.0, 1_080.0, 1_920.0, 1_080.0);
        assert!((hw - 0.25).abs() < 1e-12);
        assert!((hh - 0.25).abs() < 1e-12);
    }

    #[test]
    fn half_windows_correct_constrained_axis_for_portrait_output() {
        let (hw, hh) = half_windows(2.0, 1_920.0, 1_080.0, 1_080.0, 1_920.0);
        // Height is the free axis; width is pinched to the portrait aspect.
        assert!((hh - 0.25).abs() < 1e-12);
        let expected_w = 0.25 * (1_080.0 / 1_920.0) / (1_920.0 / 1_080.0);
        assert!((hw - expected_w).abs() < 1e-12);
        assert!(hw < hh);
    }

    #[test]
    fn fill_scale_is_unity_for_matching_aspects() {
        assert!((fill_scale(1_920.0, 1_080.0, 1_280.0, 720.0) - 1.0).abs() < 1e-12);
        assert!(fill_scale(1_920.0, 1_080.0, 1_080.0, 1_920.0) > 3.0);
    }

    #[test]
    fn adaptive_ratio_shrinks_between_thresholds() {
        let settings = DeadZoneSettings::default();
        assert_eq!(adaptive_ratio(1.0, settings.max_ratio, &settings), settings.max_ratio);
        assert_eq!(adaptive_ratio(3.0, settings.max_ratio, &settings), settings.floor_ratio);

        let mid_scale = (settings.adapt_start_scale + settings.adapt_end_scale) / 2.0;
        let mid = adaptive_ratio(mid_scale, settings.max_ratio, &settings);
        assert!(mid < settings.max_ratio);
        assert!(mid > settings.floor_ratio);
    }

    #[test]
    fn block_override_caps_the_floor() {
        let settings = DeadZoneSettings::default();
        let ratio = adaptive_ratio(5.0, 0.05, &settings);
        assert_eq!(ratio, 0.05, "floor must never exceed the configured max");
    }

    #[test]
    fn cursor_inside_dead_zone_keeps_center_exactly() {
        let center = (0.5, 0.5);
        let halves = (0.25, 0.25);
        let max_ratio = DeadZoneSettings::default().max_ratio;
        let dead = 0.25 * max_ratio;
        let cursor = (0.5 + dead * 0.9, 0.5 - dead * 0.5);

        assert_eq!(follow_target(cursor, center, halves, max_ratio), center);
    }

    #[test]
    fn cursor_past_band_tracks_to_dead_zone_edge() {
        let center = (0.5, 0.5);
        let halves = (0.25, 0.25);
        let ratio = 0.2;
        let dead = halves.0 * ratio;
        let cursor = (0.5 + dead * 2.0, 0.5);

        let (tx, ty) = follow_target(cursor, center, halves, ratio);
        assert!((tx - (cursor.0 - dead)).abs() < 1e-12);
        assert_eq!(ty, 0.5);
    }

    #[test]
    fn transition_band_blends_continuously() {
        let center = 0.5;
        let half = 0.25;
        let ratio = 0.2;
        let dead = half * ratio;

        let at_band_start = axis_target(center + dead * 1.0001, center, half, ratio);
        assert!((at_band_start - center).abs() < 1e-4);

        let mid_cursor = center + dead * 1.25;
        let mid = axis_target(mid_cursor, center, half, ratio);
        assert!(mid > center);
        assert!(mid < mid_cursor - dead + 1e-12);

        let at_band_end = axis_target(center + dead * 1.5, center, half, ratio);
        assert!((at_band_end - (center + dead * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn zero_ratio_degenerates_to_direct_tracking() {
        let target = axis_target(0.8, 0.5, 0.25, 0.0);
        assert_eq!(target, 0.8);
    }

    #[test]
    fn thirds_places_cursor_on_nearer_third_line() {
        let halves = (0.3, 0.3);
        let (cx, _) = thirds_target((0.2, 0.5), halves);
        assert!((cx - 0.3).abs() < 1e-12);

        let (cx_right, _) = thirds_target((0.8, 0.5), halves);
        assert!((cx_right - 0.7).abs() < 1e-12);
    }
}
