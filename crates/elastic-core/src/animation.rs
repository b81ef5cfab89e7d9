use serde::{Deserialize, Serialize};

use crate::outline::ControlPoints;

/// Remaining amplitude, as a fraction of travel, once the duration has elapsed.
const SETTLE_THRESHOLD: f32 = 0.01;

/// At ζ = 1, e^(-ω₀T)(1 + ω₀T) = 0.01 gives ω₀T ≈ 6.6. Above 1 the same
/// factor is applied to the slow root ω₀(ζ - √(ζ² - 1)), which keeps the
/// residual under 1%.
const CRITICALLY_DAMPED_SETTLE_FACTOR: f32 = 6.6;

const MIN_DURATION: f32 = 0.001;
const MIN_DAMPING: f32 = 0.01;

/// Damped harmonic oscillator from 0 to 1, tuned so its envelope has decayed
/// to 1% when `duration` ends. The value then snaps onto the target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Seconds until the animation completes.
    pub duration: f32,
    /// Damping ratio ζ. Below 1 bounces, 1 and above does not.
    pub damping: f32,
    /// Starting speed in units of total travel per second.
    pub initial_velocity: f32,
}

impl Spring {
    /// Quick, stiff push outward on touch-down.
    pub const OVERSHOOT: Spring = Spring {
        duration: 0.25,
        damping: 0.9,
        initial_velocity: 1.5,
    };

    /// Loose, wobbly return to rest.
    pub const SETTLE: Spring = Spring {
        duration: 0.45,
        damping: 0.15,
        initial_velocity: 5.5,
    };

    fn effective_duration(&self) -> f32 {
        self.duration.max(MIN_DURATION)
    }

    fn zeta(&self) -> f32 {
        self.damping.max(MIN_DAMPING)
    }

    /// Natural frequency ω₀ for this duration and damping.
    pub fn natural_frequency(&self) -> f32 {
        let zeta = self.zeta();
        if zeta < 1.0 {
            (1.0 / SETTLE_THRESHOLD).ln() / (zeta * self.effective_duration())
        } else {
            // 1 / (ζ - √(ζ² - 1)) without the cancellation at large ζ
            let slow_root_scale = zeta + (zeta * zeta - 1.0).sqrt();
            CRITICALLY_DAMPED_SETTLE_FACTOR * slow_root_scale / self.effective_duration()
        }
    }

    /// Normalized progress at `t` seconds: 0 at the start, exactly 1 from
    /// `duration` on. Under-damped springs swing past 1 in between.
    pub fn progress(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= self.effective_duration() {
            return 1.0;
        }

        let omega = self.natural_frequency();
        let zeta = self.zeta();
        let v0 = self.initial_velocity;

        // Offset from the target: y = x - 1, y(0) = -1, y'(0) = v0.
        let offset = if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let b = (v0 - zeta * omega) / omega_d;
            let decay = (-zeta * omega * t).exp();
            decay * (-(omega_d * t).cos() + b * (omega_d * t).sin())
        } else if (zeta - 1.0).abs() < 1e-3 {
            let b = v0 - omega;
            (-1.0 + b * t) * (-omega * t).exp()
        } else {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            let c1 = (v0 + r2) / (r1 - r2);
            let c2 = -1.0 - c1;
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        };

        1.0 + offset
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::OVERSHOOT
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpringStatus {
    /// Nothing is running.
    Idle,
    Running,
    /// The running spring reached its target during this step. Reported once.
    Finished,
}

/// Drives control points from one set of positions to another.
///
/// Completion is reported through [`SpringRunner::advance`] returning
/// [`SpringStatus::Finished`]; the caller reacts to it the way it would to a
/// completion callback.
pub trait SpringRunner {
    /// Start animating, replacing anything already running.
    fn run_spring(&mut self, from: ControlPoints, to: ControlPoints, spring: Spring);

    /// Step the running spring by `dt` seconds.
    fn advance(&mut self, dt: f32) -> SpringStatus;

    /// What the points look like right now: the interpolated value while
    /// running, the final target once finished, `None` before the first run.
    fn presentation(&self) -> Option<ControlPoints>;
}

#[derive(Clone, Debug)]
struct ActiveSpring {
    from: ControlPoints,
    to: ControlPoints,
    spring: Spring,
    elapsed: f32,
}

/// [`SpringRunner`] evaluating the closed-form spring curve.
#[derive(Clone, Debug, Default)]
pub struct AnalyticSpringRunner {
    active: Option<ActiveSpring>,
    settled: Option<ControlPoints>,
}

impl AnalyticSpringRunner {
    pub fn new() -> Self {
        Self::default()
    }

}

impl SpringRunner for AnalyticSpringRunner {
    fn run_spring(&mut self, from: ControlPoints, to: ControlPoints, spring: Spring) {
        self.active = Some(ActiveSpring {
            from,
            to,
            spring,
            elapsed: 0.0,
        });
    }

    fn advance(&mut self, dt: f32) -> SpringStatus {
        let Some(active) = &mut self.active else {
            return SpringStatus::Idle;
        };

        active.elapsed += dt.max(0.0);
        if active.elapsed < active.spring.effective_duration() {
            return SpringStatus::Running;
        }

        self.settled = Some(active.to);
        self.active = None;
        SpringStatus::Finished
    }

    fn presentation(&self) -> Option<ControlPoints> {
        match &self.active {
            Some(active) => {
                let t = active.spring.progress(active.elapsed);
                Some(active.from.lerp(&active.to, t))
            }
            None => self.settled,
        }
    }
}
