//! Fixed-rate simulations of the smoothing primitives

use cadence_animation::{Damper, Tween};
use cadence_core::Easing;

/// One simulated frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub time_ms: f64,
    pub value: f32,
}

/// Step a damper at `fps` until it settles on `target` or `max_seconds` pass
pub fn damp(mut damper: Damper, target: f32, fps: u32, max_seconds: f32) -> Vec<Sample> {
    let dt = 1.0 / fps.max(1) as f32;
    let max_frames = (max_seconds / dt).ceil() as usize;
    let mut samples = vec![Sample {
        time_ms: 0.0,
        value: damper.value(),
    }];

    for frame in 1..=max_frames {
        let value = damper.update(target, dt);
        samples.push(Sample {
            time_ms: frame as f64 * dt as f64 * 1000.0,
            value,
        });
        if damper.is_settled(target) {
            break;
        }
    }

    tracing::debug!(frames = samples.len(), "damper simulation done");
    samples
}

/// Play a tween at `fps` until it completes
pub fn tween(mut tween: Tween, from: f32, to: f32, fps: u32) -> Vec<Sample> {
    let frame_ms = 1000.0 / fps.max(1) as f64;
    let mut samples = Vec::new();

    tween.start(from, to);
    let mut time_ms = 0.0;
    while tween.is_running() {
        tween.on_frame(time_ms);
        samples.push(Sample {
            time_ms,
            value: tween.value(),
        });
        time_ms += frame_ms;
    }

    samples
}

/// Sample `easing` at `steps + 1` evenly spaced points in `0..=1`
pub fn curve(easing: Easing, steps: usize) -> Vec<(f32, f32)> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            (t, easing.apply(t))
        })
        .collect()
}

/// Render a value in `0..=1` as a horizontal bar, clipping overshoot
pub fn bar(value: f32, width: usize) -> String {
    let filled = (value.clamp(0.0, 1.0) * width as f32).round() as usize;
    let mut out = "#".repeat(filled);
    out.push_str(&" ".repeat(width - filled));
    out
}
