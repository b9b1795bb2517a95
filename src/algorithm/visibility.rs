//! Cursor-glyph visibility projection.
//!
//! A hard constraint that overrides aesthetic framing: the rendered glyph's
//! full bounding box, not just its hotspot, must stay inside the viewport.
//! Infeasible configurations (huge glyph at extreme zoom) degrade to the
//! widest feasible range instead of erroring.

/// Hotspot-relative glyph extents of the default arrow at size 1.0 and
/// scale 1.0, in normalized source units. The hotspot sits near the
/// glyph's top-left, so the right/bottom margins dominate.
const BASE_MARGIN_LEFT: f64 = 0.002;
const BASE_MARGIN_RIGHT: f64 = 0.016;
const BASE_MARGIN_TOP: f64 = 0.002;
const BASE_MARGIN_BOTTOM: f64 = 0.022;

/// Directional extents of the rendered glyph around its hotspot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl GlyphMargins {
    /// Margins for a glyph composited at output resolution: its footprint
    /// in source-content units shrinks as the camera zooms in.
    pub fn for_cursor(size: f64, scale: f64) -> Self {
        let factor = size.max(0.0) / scale.max(1.0);
        GlyphMargins {
            left: BASE_MARGIN_LEFT * factor,
            right: BASE_MARGIN_RIGHT * factor,
            top: BASE_MARGIN_TOP * factor,
            bottom: BASE_MARGIN_BOTTOM * factor,
        }
    }

    pub fn zero() -> Self {
        GlyphMargins {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
        }
    }
}

/// Result of a visibility projection: the adjusted center and how far the
/// candidate was moved (used for frozen-anchor slide).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub center: (f64, f64),
    pub correction: (f64, f64),
}

/// Adjusts `center` per axis so the margin-expanded glyph box around the
/// raw cursor stays within `[center - half, center + half]`.
pub fn project_for_visibility(
    center: (f64, f64),
    cursor: (f64, f64),
    half_windows: (f64, f64),
    margins: &GlyphMargins,
) -> Projection {
    let x = project_axis(center.0, cursor.0, half_windows.0, margins.left, margins.right);
    let y = project_axis(center.1, cursor.1, half_windows.1, margins.top, margins.bottom);
    Projection {
        center: (x, y),
        correction: (x - center.0, y - center.1),
    }
}

/// Feasible center range on one axis: the glyph box spans
/// `[cursor - lead, cursor + trail]`, so the center must lie within
/// `[cursor + trail - half, cursor - lead + half]`. A degenerate range
/// collapses to its midpoint, the widest feasible compromise.
fn project_axis(center: f64, cursor: f64, half_window: f64, lead: f64, trail: f64) -> f64 {
    let min_center = cursor + trail - half_window;
    let max_center = cursor - lead + half_window;
    if min_center > max_center {
        return (min_center + max_center) * 0.5;
    }
    center.clamp(min_center, max_center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn centered_cursor_needs_no_correction() {
        let margins = GlyphMargins::for_cursor(1.0, 2.0);
        let projection =
            project_for_visibility((0.5, 0.5), (0.5, 0.5), (0.25, 0.25), &margins);
        assert_eq!(projection.center, (0.5, 0.5));
        assert_eq!(projection.correction, (0.0, 0.0));
    }

    #[test]
    fn cursor_at_window_edge_pushes_center_out() {
        let margins = GlyphMargins {
            left: 0.01,
            right: 0.05,
            top: 0.01,
            bottom: 0.05,
        };
        // Cursor sits exactly on the right window edge; the glyph's right
        // margin would leave the frame without a correction.
        let projection =
            project_for_visibility((0.5, 0.5), (0.75, 0.5), (0.25, 0.25), &margins);
        assert!(projection.center.0 > 0.5);
        assert!((projection.center.0 - (0.75 + 0.05 - 0.25)).abs() < 1e-12);
        assert!(projection.correction.0 > 0.0);

        // The full box is inside the adjusted window.
        let (cx, _) = projection.center;
        assert!(0.75 + 0.05 <= cx + 0.25 + 1e-12);
        assert!(0.75 - 0.01 >= cx - 0.25 - 1e-12);
    }

    #[test]
    fn infeasible_margins_fall_back_to_midpoint() {
        let margins = GlyphMargins {
            left: 0.4,
            right: 0.4,
            top: 0.4,
            bottom: 0.4,
        };
        let projection =
            project_for_visibility((0.1, 0.9), (0.5, 0.5), (0.1, 0.1), &margins);
        // min = 0.5 + 0.4 - 0.1 = 0.8, max = 0.5 - 0.4 + 0.1 = 0.2.
        assert!((projection.center.0 - 0.5).abs() < 1e-12);
        assert!((projection.center.1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn margins_shrink_with_zoom() {
        let wide = GlyphMargins::for_cursor(1.0, 1.0);
        let zoomed = GlyphMargins::for_cursor(1.0, 3.0);
        assert!(zoomed.right < wide.right);
        assert!((zoomed.bottom * 3.0 - wide.bottom).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn projected_box_is_visible_or_center_is_midpoint(
            center in 0.0f64..1.0,
            cursor in 0.0f64..1.0,
            half in 0.05f64..0.5,
            lead in 0.0f64..0.2,
            trail in 0.0f64..0.2,
        ) {
            let margins = GlyphMargins { left: lead, right: trail, top: lead, bottom: trail };
            let projection = project_for_visibility(
                (center, center),
                (cursor, cursor),
                (half, half),
                &margins,
            );
            let (cx, _) = projection.center;

            let min_center = cursor + trail - half;
            let max_center = cursor - lead + half;
            if min_center <= max_center {
                // Feasible: the margin-expanded box lies inside the window.
                prop_assert!(cursor - lead >= cx - half - 1e-9);
                prop_assert!(cursor + trail <= cx + half + 1e-9);
            } else {
                prop_assert!((cx - (min_center + max_center) * 0.5).abs() < 1e-9);
            }
        }
    }
}
