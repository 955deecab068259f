//! Cadence Animation Primitives
//!
//! Frame-driven smoothing and timing helpers for UI code.
//!
//! # Features
//!
//! - **Frame Loop**: one shared loop fanning each frame out to many subscribers
//! - **Damper**: critically damped smoothing toward a moving target
//! - **Inertia**: exponential decay toward rest after a fling
//! - **Tween**: eased interpolation between two values over a duration
//! - **Sampler**: rolling average with optional outlier rejection
//! - **Timer**: delayed, repeating callbacks with a fixed iteration count
//!
//! The host owns the clock. Frame-driven types are fed timestamps through
//! `on_frame` and report whether they still want frames; [`FrameClock`]
//! provides that clock on a tokio runtime.

pub mod config;
pub mod damper;
pub mod inertia;
pub mod sampler;
pub mod scheduler;
pub mod timer;
pub mod timing;
pub mod tween;

pub use config::AnimationConfig;
pub use damper::{Damper, DamperConfig};
pub use inertia::{Inertia, InertiaConfig};
pub use sampler::Sampler;
pub use scheduler::{AnimationLoop, LoopConfig, LoopHandle, SubscriptionId};
pub use timer::{Timer, TimerConfig};
pub use timing::{delay, next_frame, FrameClock};
pub use tween::{Tween, TweenConfig};
