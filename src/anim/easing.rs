//! Easing curves for tween steps.

/// Easing curves mapping linear progress in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Cubic acceleration from rest.
    Power2In,
    /// Cubic deceleration to rest.
    Power2Out,
}

impl Ease {
    /// Input is clamped, so callers may pass raw elapsed/duration ratios.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        for ease in [Ease::Linear, Ease::Power2In, Ease::Power2Out] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
            assert_eq!(ease.apply(-3.0), 0.0);
            assert_eq!(ease.apply(7.0), 1.0);
        }
    }

    #[test]
    fn test_curve_shapes() {
        assert_eq!(Ease::Power2In.apply(0.5), 0.125);
        assert_eq!(Ease::Power2Out.apply(0.5), 0.875);
        assert!((Ease::Power2In.apply(0.2) - 0.008).abs() < 1e-6);
        assert!((Ease::Power2Out.apply(0.2) - 0.488).abs() < 1e-6);
        assert_eq!(Ease::Linear.apply(0.5), 0.5);
    }
}
