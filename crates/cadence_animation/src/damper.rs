//! Critically damped smoothing toward a moving target
//!
//! The update is the closed-form critically damped spring step popularised
//! as "SmoothDamp": `e^-x` is approximated by `1 / (1 + x + 0.48x² + 0.235x³)`,
//! which stays stable for large frame times.

use cadence_core::clamp;
use serde::{Deserialize, Serialize};

/// Damper options, as read from configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DamperConfig {
    /// Approximate time in seconds to reach the target
    pub smooth_time: f32,
    /// Speed cap in units per second; unlimited when absent
    pub max_speed: Option<f32>,
    /// Distance at which the damper snaps onto the target
    pub precision: f32,
}

impl Default for DamperConfig {
    fn default() -> Self {
        Self {
            smooth_time: 1.0,
            max_speed: None,
            precision: Damper::DEFAULT_PRECISION,
        }
    }
}

/// A value that eases toward a target without overshooting
#[derive(Clone, Debug)]
pub struct Damper {
    value: f32,
    velocity: f32,
    smooth_time: f32,
    max_speed: f32,
    precision: f32,
}

impl Damper {
    pub const MIN_SMOOTH_TIME: f32 = 0.0001;
    pub const DEFAULT_PRECISION: f32 = 0.001;

    /// Create a damper at `initial_value`. `smooth_time` is in seconds.
    pub fn new(initial_value: f32, smooth_time: f32) -> Self {
        Self {
            value: initial_value,
            velocity: 0.0,
            smooth_time: sanitize_smooth_time(smooth_time),
            max_speed: f32::INFINITY,
            precision: Self::DEFAULT_PRECISION,
        }
    }

    pub fn from_config(initial_value: f32, config: &DamperConfig) -> Self {
        let damper = Self::new(initial_value, config.smooth_time).with_precision(config.precision);
        match config.max_speed {
            Some(max_speed) => damper.with_max_speed(max_speed),
            None => damper,
        }
    }

    /// Builder: cap the speed in units per second
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        if !max_speed.is_nan() {
            self.max_speed = max_speed.abs();
        }
        self
    }

    /// Builder: set the snap distance
    pub fn with_precision(mut self, precision: f32) -> Self {
        if precision.is_finite() {
            self.precision = precision.abs();
        }
        self
    }

    /// Step toward `target` by `dt` seconds and return the new value.
    ///
    /// A non-positive or non-finite `dt` leaves the damper untouched.
    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        if !target.is_finite() || !dt.is_finite() || dt <= 0.0 {
            return self.value;
        }

        if (self.value - target).abs() <= self.precision {
            self.value = target;
            self.velocity = 0.0;
            return self.value;
        }

        let omega = 2.0 / self.smooth_time;
        let x = omega * dt;
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let max_change = self.max_speed * self.smooth_time;
        let change = clamp(self.value - target, -max_change, max_change);
        let limited_target = self.value - change;

        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut next = limited_target + (change + temp) * decay;

        // Never step past the target
        if (target - self.value > 0.0) == (next > target) {
            next = target;
            self.velocity = 0.0;
        }

        self.value = next;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current velocity in units per second
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn smooth_time(&self) -> f32 {
        self.smooth_time
    }

    pub fn set_smooth_time(&mut self, smooth_time: f32) {
        self.smooth_time = sanitize_smooth_time(smooth_time);
    }

    /// Jump to `value` and drop any velocity
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }

    /// Whether the damper sits on `target` within precision
    pub fn is_settled(&self, target: f32) -> bool {
        (self.value - target).abs() <= self.precision && self.velocity == 0.0
    }
}

fn sanitize_smooth_time(smooth_time: f32) -> f32 {
    if smooth_time.is_nan() {
        1.0
    } else {
        smooth_time.max(Damper::MIN_SMOOTH_TIME)
    }
}
