/// Fast vector math re-exported from [`glam`].
///
/// Pointer positions, drag offsets and deltas are all [`Vec2`]s.
///
/// ```
/// use berth_core::math::Vec2;
///
/// let press = Vec2::new(10.0, 20.0);
/// let now = Vec2::new(14.0, 26.0);
/// assert_eq!(now - press, Vec2::new(4.0, 6.0));
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::{Vec2, vec2};
}

pub use fast::*;

/// Clamp `value` to at least `min`, tolerating `NaN` by returning `min`.
#[inline]
pub fn at_least(value: f32, min: f32) -> f32 {
    if value.is_nan() { min } else { value.max(min) }
}

/// Clamp `value` into `[min, max]`. When the range is inverted, `min` wins.
#[inline]
pub fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        return min;
    }
    at_least(value, min).min(max)
}

/// Whether two lengths are within `tolerance` of each other.
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range(5.0, 10.0, 20.0), 10.0);
        assert_eq!(clamp_range(25.0, 10.0, 20.0), 20.0);
        assert_eq!(clamp_range(15.0, 10.0, 20.0), 15.0);
        // Inverted range: the floor wins.
        assert_eq!(clamp_range(15.0, 30.0, 20.0), 30.0);
    }

    #[test]
    fn test_at_least_nan() {
        assert_eq!(at_least(f32::NAN, 50.0), 50.0);
        assert_eq!(at_least(-3.0, 0.0), 0.0);
    }
}
