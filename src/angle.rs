use std::f32::consts::TAU;

#[inline]
pub fn degrees_to_radians(deg: f32) -> f32 {
    deg.to_radians()
}

/// Map an angle into [0, 2*pi).
#[inline]
pub fn normalize(angle: f32) -> f32 {
    // Rust's % keeps the sign of the dividend, so negative input needs an
    // extra full turn. The second % folds the case where adding 2*pi to a
    // tiny negative remainder rounds up to exactly 2*pi.
    (angle % TAU + TAU) % TAU
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn normalize_lands_in_the_canonical_range() {
        for a in [-100.0, -PI, -1e-7, 0.0, 1.0, PI, TAU, 7.0, 123.456] {
            let n = normalize(a);
            assert!((0.0..TAU).contains(&n), "normalize({a}) = {n}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for a in [-5.0, -0.25, 0.0, 2.5, 9.0] {
            assert_eq!(normalize(normalize(a)), normalize(a));
        }
    }

    #[test]
    fn normalize_ignores_full_turns() {
        let a = 1.25f32;
        for k in [-3i32, -1, 1, 4] {
            assert!((normalize(a + k as f32 * TAU) - a).abs() < 1e-5);
        }
    }

    #[test]
    fn degree_conversion_is_linear() {
        assert!((degrees_to_radians(180.0) - PI).abs() < 1e-6);
        assert!((degrees_to_radians(60.0) - PI / 3.0).abs() < 1e-6);
        assert_eq!(degrees_to_radians(0.0), 0.0);
    }
}
