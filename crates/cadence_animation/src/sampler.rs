//! Rolling average sampler for smoothing noisy values (e.g. touch deltas)

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct Sampler {
    size: usize,
    clamp_ratio: f32,
    buffer: VecDeque<f32>,
}

impl Sampler {
    pub const DEFAULT_SIZE: usize = 5;

    /// Average over the last `size` samples (at least one)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            clamp_ratio: 0.0,
            buffer: VecDeque::with_capacity(size + 1),
        }
    }

    /// Builder: ignore samples deviating from the mean by more than
    /// `ratio * |mean|`. Zero disables rejection.
    pub fn with_clamp_ratio(mut self, ratio: f32) -> Self {
        self.clamp_ratio = if ratio.is_finite() { ratio.max(0.0) } else { 0.0 };
        self
    }

    /// Add a sample and return the smoothed value.
    ///
    /// Non-finite input is rejected with `None`. A rejected outlier leaves
    /// the window untouched and returns the current mean.
    pub fn sample(&mut self, value: f32) -> Option<f32> {
        if !value.is_finite() {
            return None;
        }

        let average = self.average();
        let mean = if average == 0.0 { value } else { average };

        if self.clamp_ratio > 0.0 && !self.buffer.is_empty() {
            let deviation = (value - mean).abs();
            if deviation > self.clamp_ratio * mean.abs() {
                tracing::trace!(value, mean, "sampler rejected outlier");
                return Some(mean);
            }
        }

        self.buffer.push_back(value);
        if self.buffer.len() > self.size {
            self.buffer.pop_front();
        }

        Some(self.average())
    }

    /// Mean of the current window, zero when empty.
    ///
    /// Summed from the window in `f64` on every call, so evicted samples
    /// leave no rounding residue.
    pub fn average(&self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.buffer.iter().map(|v| *v as f64).sum();
        (sum / self.buffer.len() as f64) as f32
    }

    /// Clear the window
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.size
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}
