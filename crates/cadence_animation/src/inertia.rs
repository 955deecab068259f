//! Inertia: a value that decays toward zero once released
//!
//! Typical use is scroll or drag momentum: feed the last velocity with
//! [`Inertia::set_value`], call [`Inertia::activate`] on release and read
//! the decaying value every frame.

use cadence_core::lerp;
use serde::{Deserialize, Serialize};

/// Inertia options
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InertiaConfig {
    /// Fraction of the remaining value removed each frame
    pub lerp_factor: f32,
    /// Magnitude below which the value counts as at rest
    pub precision: f32,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            lerp_factor: 0.035,
            precision: 0.1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Inertia {
    config: InertiaConfig,
    value: f32,
    active: bool,
}

impl Inertia {
    pub fn new(config: InertiaConfig) -> Self {
        Self {
            config,
            value: 0.0,
            active: false,
        }
    }

    /// Start decaying. Does nothing while the value is already at rest.
    pub fn activate(&mut self) {
        if self.value.abs() < self.config.precision {
            return;
        }
        self.active = true;
    }

    /// Stop decaying and reset the value to zero
    pub fn deactivate(&mut self) {
        self.active = false;
        self.value = 0.0;
    }

    pub fn set_value(&mut self, value: f32) {
        if value.is_finite() {
            self.value = value;
        }
    }

    pub fn destroy(&mut self) {
        self.deactivate();
    }

    /// Advance one frame. Returns whether the inertia is still active.
    pub fn on_frame(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.value = lerp(self.value, 0.0, self.config.lerp_factor);

        if self.value.abs() < self.config.precision {
            tracing::trace!("inertia at rest");
            self.deactivate();
        }

        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn config(&self) -> &InertiaConfig {
        &self.config
    }
}
