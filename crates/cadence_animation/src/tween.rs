//! Tween: eased interpolation between two values
//!
//! ```rust
//! use cadence_animation::Tween;
//! use cadence_core::Easing;
//!
//! let mut tween = Tween::new(2000.0).with_easing(Easing::EaseOutCubic);
//! tween.start(0.0, 100.0);
//!
//! // Host frames, in milliseconds
//! tween.on_frame(0.0);
//! tween.on_frame(1000.0);
//! tween.on_frame(2000.0);
//!
//! assert_eq!(tween.value(), 100.0);
//! assert!(!tween.is_running());
//! ```

use cadence_core::Easing;
use serde::{Deserialize, Serialize};

/// Called with `(value, delta, progress)` after every frame
pub type UpdateCallback = Box<dyn FnMut(f32, f32, f32) + Send>;

/// Called with the final value when the tween stops
pub type CompletedCallback = Box<dyn FnMut(f32) + Send>;

/// Tween options, as read from configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TweenConfig {
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            easing: Easing::Linear,
        }
    }
}

pub struct Tween {
    duration_ms: f64,
    easing: Easing,
    on_update: Option<UpdateCallback>,
    on_completed: Option<CompletedCallback>,

    running: bool,
    value: f32,
    start_value: f32,
    target_value: f32,
    start_time: Option<f64>,
    progress: f32,
    delta: f32,
}

impl Tween {
    /// Create a linear tween lasting `duration_ms`
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms: sanitize_duration(duration_ms),
            easing: Easing::Linear,
            on_update: None,
            on_completed: None,
            running: false,
            value: 0.0,
            start_value: 0.0,
            target_value: 0.0,
            start_time: None,
            progress: 0.0,
            delta: 0.0,
        }
    }

    pub fn from_config(config: &TweenConfig) -> Self {
        Self::new(config.duration_ms).with_easing(config.easing)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32, f32, f32) + Send + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_completed<F>(mut self, callback: F) -> Self
    where
        F: FnMut(f32) + Send + 'static,
    {
        self.on_completed = Some(Box::new(callback));
        self
    }

    /// Start animating from `start_value` to `target_value`.
    ///
    /// The clock starts at the first frame delivered after this call.
    pub fn start(&mut self, start_value: f32, target_value: f32) {
        self.value = start_value;
        self.start_value = start_value;
        self.target_value = target_value;
        self.start_time = None;
        self.progress = 0.0;
        self.delta = 0.0;
        self.running = true;
    }

    /// Stop the animation, optionally jumping to the target first.
    ///
    /// `on_completed` fires only if the tween was running.
    pub fn stop(&mut self, finish: bool) {
        if !self.running {
            return;
        }
        self.running = false;

        if finish {
            let previous = self.value;
            self.value = self.target_value;
            self.delta = self.value - previous;
            self.progress = 1.0;
            self.emit_update();
        }

        let value = self.value;
        if let Some(callback) = self.on_completed.as_mut() {
            callback(value);
        }
    }

    /// Stop without finishing and drop the callbacks
    pub fn destroy(&mut self) {
        self.stop(false);
        self.on_update = None;
        self.on_completed = None;
    }

    /// Advance to `time_ms`. Frames are ignored while the tween is stopped.
    pub fn on_frame(&mut self, time_ms: f64) {
        if !self.running {
            return;
        }

        let start = *self.start_time.get_or_insert(time_ms);
        let elapsed = time_ms - start;
        let linear = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / self.duration_ms).clamp(0.0, 1.0) as f32
        };

        self.progress = self.easing.apply(linear);

        let previous = self.value;
        self.value = if linear >= 1.0 {
            self.target_value
        } else {
            self.start_value + (self.target_value - self.start_value) * self.progress
        };
        self.delta = self.value - previous;

        self.emit_update();

        if linear >= 1.0 || self.value == self.target_value {
            self.stop(false);
        }
    }

    fn emit_update(&mut self) {
        let (value, delta, progress) = (self.value, self.delta, self.progress);
        if let Some(callback) = self.on_update.as_mut() {
            callback(value, delta, progress);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Eased progress of the last frame
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Change in value during the last frame
    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

fn sanitize_duration(duration_ms: f64) -> f64 {
    if duration_ms.is_finite() {
        duration_ms.max(0.0)
    } else {
        0.0
    }
}
