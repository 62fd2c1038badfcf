/// Interpolation curve applied to the raw trace phase.
///
/// All curves map [0,1] to [0,1], hit both endpoints exactly and are
/// monotonically non-decreasing, so traced distance never moves backwards.
/// `OutQuad` is the default and matches the decelerating curve the trace
/// animation was designed around: fast early progress, slowing toward the
/// end of each glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    #[default]
    OutQuad,
    OutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 3] = [Ease::Linear, Ease::OutQuad, Ease::OutCubic];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in ALL {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b);
            assert!(b < c);
        }
    }

    #[test]
    fn out_curves_run_ahead_of_linear() {
        for ease in [Ease::OutQuad, Ease::OutCubic] {
            for t in [0.1, 0.25, 0.5, 0.75, 0.9] {
                assert!(ease.apply(t) > t);
            }
        }
    }

    #[test]
    fn input_is_clamped() {
        for ease in ALL {
            assert_eq!(ease.apply(-1.0), 0.0);
            assert_eq!(ease.apply(2.0), 1.0);
        }
    }
}
