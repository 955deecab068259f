//! Configuration file handling (`cadence.toml`)
//!
//! ```toml
//! [loop]
//! debug = true
//! target_fps = 120
//!
//! [damper]
//! smooth_time = 0.3
//!
//! [tween]
//! duration_ms = 400
//! easing = "ease-out-cubic"
//! ```

use std::fs;
use std::path::Path;

use cadence_core::{CadenceError, Result};
use serde::{Deserialize, Serialize};

use crate::damper::DamperConfig;
use crate::inertia::InertiaConfig;
use crate::scheduler::LoopConfig;
use crate::timer::TimerConfig;
use crate::tween::TweenConfig;

/// File name looked up by [`AnimationConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "cadence.toml";

/// Top-level configuration, every table optional
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    #[serde(rename = "loop")]
    pub frame_loop: LoopConfig,
    pub damper: DamperConfig,
    pub inertia: InertiaConfig,
    pub tween: TweenConfig,
    pub timer: TimerConfig,
}

impl AnimationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnimationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `cadence.toml` from `path` (a file or a directory containing one).
    ///
    /// A missing file yields the defaults.
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| CadenceError::Io {
            path: config_path.clone(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Reject values the primitives cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.frame_loop.target_fps == 0 {
            return Err(invalid("loop.target_fps", "must be at least 1"));
        }
        if !(self.frame_loop.debug_interval_ms >= 0.0) {
            return Err(invalid("loop.debug_interval_ms", "must not be negative"));
        }
        if !(self.damper.smooth_time > 0.0) || !self.damper.smooth_time.is_finite() {
            return Err(invalid("damper.smooth_time", "must be a positive number of seconds"));
        }
        if self.damper.max_speed.is_some_and(|speed| !(speed > 0.0)) {
            return Err(invalid("damper.max_speed", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.inertia.lerp_factor) {
            return Err(invalid("inertia.lerp_factor", "must be within 0..=1"));
        }
        if !(self.inertia.precision >= 0.0) || !self.inertia.precision.is_finite() {
            return Err(invalid("inertia.precision", "must be a finite, non-negative number"));
        }
        if !(self.tween.duration_ms >= 0.0) || !self.tween.duration_ms.is_finite() {
            return Err(invalid("tween.duration_ms", "must be a finite, non-negative duration"));
        }
        Ok(())
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn invalid(field: &'static str, reason: &str) -> CadenceError {
    CadenceError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
