//! Scalar animation helpers shared by the reveal fades, the retro-TV
//! sequence, and the CPU mirrors of the shader masks.

/// Hermite 0→1 ramp between `edge0` and `edge1`, clamped outside the band.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 >= edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The page's standard easing curve, cubic-bezier(0.4, 0.0, 0.2, 1.0).
///
/// Solves the bezier x(u) = t for u by Newton iteration, then evaluates
/// y(u). Input and output are both clamped to [0, 1].
pub fn ease_standard(t: f32) -> f32 {
    cubic_bezier(0.4, 0.0, 0.2, 1.0, t)
}

pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }

    let sample = |c1: f32, c2: f32, u: f32| {
        // De Casteljau expansion with P0 = 0, P3 = 1.
        3.0 * c1 * u * (1.0 - u) * (1.0 - u) + 3.0 * c2 * u * u * (1.0 - u) + u * u * u
    };
    let derivative = |c1: f32, c2: f32, u: f32| {
        3.0 * c1 * (1.0 - u) * (1.0 - 3.0 * u) + 3.0 * c2 * u * (2.0 - 3.0 * u) + 3.0 * u * u
    };

    let mut u = t;
    for _ in 0..8 {
        let x = sample(x1, x2, u) - t;
        let dx = derivative(x1, x2, u);
        if dx.abs() < 1e-6 {
            break;
        }
        u = (u - x / dx).clamp(0.0, 1.0);
    }
    sample(y1, y2, u).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_clamps_and_ramps() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        let low = smoothstep(0.2, 0.8, 0.3);
        let high = smoothstep(0.2, 0.8, 0.7);
        assert!(low < high);
    }

    #[test]
    fn smoothstep_degenerate_band_is_a_step() {
        assert_eq!(smoothstep(0.5, 0.5, 0.4), 0.0);
        assert_eq!(smoothstep(0.5, 0.5, 0.6), 1.0);
    }

    #[test]
    fn ease_endpoints_are_exact() {
        assert_eq!(ease_standard(0.0), 0.0);
        assert_eq!(ease_standard(1.0), 1.0);
    }

    #[test]
    fn ease_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let y = ease_standard(i as f32 / 100.0);
            assert!(y >= prev - 1e-4, "not monotonic at {i}: {y} < {prev}");
            prev = y;
        }
    }
}
