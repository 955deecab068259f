//! Scalar helpers

/// Clamp `value` into `[min, max]`.
///
/// Follows `min(max(value, min), max)`, so an inverted range resolves to
/// `max` instead of panicking like [`f32::clamp`].
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Linear interpolation with the factor clamped to `0.0..=1.0`.
///
/// The endpoints are returned exactly at factor 0 and 1.
#[inline]
pub fn lerp(a: f32, b: f32, factor: f32) -> f32 {
    let factor = clamp(factor, 0.0, 1.0);

    if factor == 0.0 {
        a
    } else if factor == 1.0 {
        b
    } else {
        a + (b - a) * factor
    }
}

/// Map `value` from the `input` range onto the `output` range.
///
/// No clamping is applied. An empty input range maps everything to the
/// start of the output range.
pub fn map_range(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span == 0.0 {
        return output.0;
    }

    (value - input.0) * (output.1 - output.0) / span + output.0
}
