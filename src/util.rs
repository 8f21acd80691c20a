/// Clamp `coord` to lie between `lower` and `upper`.
///
/// When `upper < lower` the result is `upper`; camera Y relies on this for
/// maps shorter than the screen.
#[inline]
pub fn clamp(coord: f32, lower: f32, upper: f32) -> f32 {
    upper.min(coord.max(lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [f32; 9] = [-1000.0, -16.5, -0.0, 0.0, 0.25, 15.9, 16.0, 480.0, 1.0e6];

    #[test]
    fn result_lies_within_bounds() {
        for &lower in &SAMPLES {
            for &upper in SAMPLES.iter().filter(|&&u| u >= lower) {
                for &c in &SAMPLES {
                    let v = clamp(c, lower, upper);
                    assert!(v >= lower && v <= upper, "clamp({c}, {lower}, {upper}) = {v}");
                }
            }
        }
    }

    #[test]
    fn is_idempotent() {
        for &lower in &SAMPLES {
            for &upper in SAMPLES.iter().filter(|&&u| u >= lower) {
                for &c in &SAMPLES {
                    let once = clamp(c, lower, upper);
                    assert_eq!(clamp(once, lower, upper), once);
                }
            }
        }
    }

    #[test]
    fn inverted_bounds_pick_upper() {
        assert_eq!(clamp(5.0, 0.0, -40.0), -40.0);
    }
}
