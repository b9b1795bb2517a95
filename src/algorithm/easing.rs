//! Easing curves shared by the phase controller and the dead-zone follower.

use crate::models::timeline::TransitionStyle;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Quintic smootherstep, C2-continuous at both ends.
///
/// Used wherever a hard boundary would otherwise produce a velocity step:
/// the dead-zone transition band and the intro-to-hold blend window.
pub fn smootherstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Progress curve for intro/outro ramps, selected per block.
pub fn ease(style: TransitionStyle, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match style {
        TransitionStyle::Linear => t,
        TransitionStyle::EaseIn => t * t * t,
        TransitionStyle::EaseOut => 1.0 - (1.0 - t).powi(3),
        TransitionStyle::EaseInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: [TransitionStyle; 4] = [
        TransitionStyle::Linear,
        TransitionStyle::EaseIn,
        TransitionStyle::EaseOut,
        TransitionStyle::EaseInOut,
    ];

    #[test]
    fn easing_hits_exact_endpoints() {
        for style in STYLES {
            assert_eq!(ease(style, 0.0), 0.0);
            assert_eq!(ease(style, 1.0), 1.0);
        }
    }

    #[test]
    fn easing_is_monotonic() {
        for style in STYLES {
            let mut prev = 0.0;
            for step in 1..=100 {
                let value = ease(style, step as f64 / 100.0);
                assert!(value >= prev, "{style:?} decreased at step {step}");
                prev = value;
            }
        }
    }

    #[test]
    fn smootherstep_clamps_outside_unit_range() {
        assert_eq!(smootherstep(-1.0), 0.0);
        assert_eq!(smootherstep(2.0), 1.0);
        assert!((smootherstep(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn smootherstep_has_flat_tangents_at_ends() {
        let eps = 1e-4;
        assert!(smootherstep(eps) / eps < 0.01);
        assert!((1.0 - smootherstep(1.0 - eps)) / eps < 0.01);
    }
}
