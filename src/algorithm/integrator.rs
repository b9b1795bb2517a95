//! Camera center integration toward the frame target.
//!
//! Two interchangeable strategies: exponential smoothing driven by the
//! 0–100 smoothness dial, or a semi-implicit Euler spring-damper when
//! explicit spring dynamics are configured. Sub-stepping keeps the spring
//! numerically stable when frame deltas are large.

use crate::models::settings::CameraSettings;

/// Sub-step ceiling for the spring simulation.
pub const MAX_SPRING_STEP_MS: f64 = 16.0;
/// Time discontinuities past this are seeks: velocity resets, position snaps.
pub const SEEK_RESET_THRESHOLD_MS: f64 = 250.0;

const EXPONENTIAL_RATE_MIN: f64 = 3.0;
const EXPONENTIAL_RATE_MAX: f64 = 18.0;
/// Response damping per unit of zoom above 1, so high zoom does not
/// amplify small cursor jitter.
const HIGH_ZOOM_DAMPING: f64 = 0.30;

const OUTRO_RATE_SOFTEN: f64 = 0.6;
const OUTRO_STIFFNESS_SOFTEN: f64 = 0.55;
const OUTRO_DAMPING_BOOST: f64 = 1.35;

/// Selected integration strategy with resolved parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Integrator {
    Exponential {
        rate: f64,
    },
    Spring {
        stiffness: f64,
        damping: f64,
        mass: f64,
    },
}

impl Integrator {
    /// Resolves the strategy from camera settings; a non-zero per-block
    /// smoothing overrides the global dial.
    pub fn from_settings(settings: &CameraSettings, block_smoothing: f64) -> Self {
        if let Some(spring) = settings.spring {
            return Integrator::Spring {
                stiffness: spring.stiffness.max(0.000_1),
                damping: spring.damping.max(0.0),
                mass: spring.mass.max(0.000_1),
            };
        }

        let smoothness = if block_smoothing > 0.0 {
            block_smoothing
        } else {
            settings.smoothness
        }
        .clamp(0.0, 100.0);

        let rate = EXPONENTIAL_RATE_MAX
            - smoothness / 100.0 * (EXPONENTIAL_RATE_MAX - EXPONENTIAL_RATE_MIN);
        Integrator::Exponential { rate }
    }

    /// Softer variant for the outro settle: lower stiffness, higher damping.
    pub fn softened_for_outro(self) -> Self {
        match self {
            Integrator::Exponential { rate } => Integrator::Exponential {
                rate: rate * OUTRO_RATE_SOFTEN,
            },
            Integrator::Spring {
                stiffness,
                damping,
                mass,
            } => Integrator::Spring {
                stiffness: stiffness * OUTRO_STIFFNESS_SOFTEN,
                damping: damping * OUTRO_DAMPING_BOOST,
                mass,
            },
        }
    }

    /// Advances one axis by `dt_ms`, returning the new (position, velocity).
    pub fn advance(
        &self,
        position: f64,
        velocity: f64,
        target: f64,
        dt_ms: f64,
        scale: f64,
    ) -> (f64, f64) {
        let dt_s = dt_ms.max(0.0) / 1_000.0;
        if dt_s <= 0.0 {
            return (position, velocity);
        }

        match *self {
            Integrator::Exponential { rate } => {
                let damped_rate = rate / (1.0 + (scale - 1.0).max(0.0) * HIGH_ZOOM_DAMPING);
                let alpha = 1.0 - (-damped_rate * dt_s).exp();
                let next = position + (target - position) * alpha;
                (next, (next - position) / dt_s)
            }
            Integrator::Spring {
                stiffness,
                damping,
                mass,
            } => {
                let mut position = position;
                let mut velocity = velocity;
                let mut remaining_ms = dt_ms;
                while remaining_ms > 0.0 {
                    let step_s = remaining_ms.min(MAX_SPRING_STEP_MS) / 1_000.0;
                    let acceleration =
                        (stiffness * (target - position) - damping * velocity) / mass;
                    velocity += acceleration * step_s;
                    position += velocity * step_s;
                    remaining_ms -= MAX_SPRING_STEP_MS;
                }
                (position, velocity)
            }
        }
    }
}

/// A seek is any time discontinuity the integrator must not carry momentum
/// across: backward jumps, gaps past the threshold, or a missing last time.
pub fn is_seek(last_ms: Option<f64>, now_ms: f64) -> bool {
    match last_ms {
        None => true,
        Some(last) => now_ms < last || now_ms - last > SEEK_RESET_THRESHOLD_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::SpringDynamics;

    fn exponential(smoothness: f64) -> Integrator {
        Integrator::from_settings(
            &CameraSettings {
                smoothness,
                ..CameraSettings::default()
            },
            0.0,
        )
    }

    fn spring() -> Integrator {
        Integrator::from_settings(
            &CameraSettings {
                spring: Some(SpringDynamics::default()),
                ..CameraSettings::default()
            },
            0.0,
        )
    }

    #[test]
    fn exponential_converges_to_target() {
        let integrator = exponential(50.0);
        let mut position = 0.0;
        let mut velocity = 0.0;
        for _ in 0..240 {
            (position, velocity) = integrator.advance(position, velocity, 1.0, 1_000.0 / 60.0, 1.0);
        }
        assert!((position - 1.0).abs() < 0.01);
    }

    #[test]
    fn exponential_holds_exactly_at_target() {
        let integrator = exponential(50.0);
        let (position, velocity) = integrator.advance(0.4, 0.0, 0.4, 16.0, 2.0);
        assert_eq!(position, 0.4);
        assert_eq!(velocity, 0.0);
    }

    #[test]
    fn high_zoom_dampens_exponential_response() {
        let integrator = exponential(50.0);
        let (at_base, _) = integrator.advance(0.0, 0.0, 1.0, 16.0, 1.0);
        let (at_zoom, _) = integrator.advance(0.0, 0.0, 1.0, 16.0, 3.0);
        assert!(at_zoom < at_base);
    }

    #[test]
    fn lower_smoothness_responds_faster() {
        let snappy = exponential(0.0);
        let floaty = exponential(100.0);
        let (fast, _) = snappy.advance(0.0, 0.0, 1.0, 16.0, 1.0);
        let (slow, _) = floaty.advance(0.0, 0.0, 1.0, 16.0, 1.0);
        assert!(fast > slow);
    }

    #[test]
    fn spring_converges_to_target() {
        let integrator = spring();
        let mut position = 0.0;
        let mut velocity = 0.0;
        for _ in 0..240 {
            (position, velocity) = integrator.advance(position, velocity, 1.0, 1_000.0 / 120.0, 1.0);
        }
        assert!((position - 1.0).abs() < 0.01);
    }

    #[test]
    fn spring_holds_at_rest_on_target() {
        let integrator = spring();
        let (position, velocity) = integrator.advance(0.7, 0.0, 0.7, 16.0, 2.0);
        assert_eq!(position, 0.7);
        assert_eq!(velocity, 0.0);
    }

    #[test]
    fn large_delta_is_substepped_without_blowing_up() {
        let integrator = Integrator::Spring {
            stiffness: 400.0,
            damping: 10.0,
            mass: 1.0,
        };
        let (position, velocity) = integrator.advance(0.0, 0.0, 1.0, 500.0, 1.0);
        assert!(position.is_finite() && velocity.is_finite());
        assert!(position.abs() < 3.0, "unstable spring produced {position}");
    }

    #[test]
    fn outro_softening_slows_both_strategies() {
        let exp = exponential(50.0);
        let (normal, _) = exp.advance(0.0, 0.0, 1.0, 16.0, 1.0);
        let (soft, _) = exp.softened_for_outro().advance(0.0, 0.0, 1.0, 16.0, 1.0);
        assert!(soft < normal);

        match spring().softened_for_outro() {
            Integrator::Spring {
                stiffness, damping, ..
            } => {
                assert!(stiffness < 170.0);
                assert!(damping > 26.0);
            }
            _ => panic!("expected spring"),
        }
    }

    #[test]
    fn seek_detection_covers_jumps_and_resets() {
        assert!(is_seek(None, 100.0));
        assert!(is_seek(Some(500.0), 400.0));
        assert!(is_seek(Some(0.0), SEEK_RESET_THRESHOLD_MS + 1.0));
        assert!(!is_seek(Some(0.0), 33.0));
    }
}
