//! Rounding configuration.

/// Decimal rounding applied before equality and degeneracy checks.
///
/// Passed by value wherever a zero test happens, the same way `GeomCfg`-style
/// tolerance structs travel through geometry code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rounding {
    pub digits: i32,
}

impl Default for Rounding {
    fn default() -> Self {
        Self { digits: 10 }
    }
}

impl Rounding {
    #[inline]
    pub fn new(digits: i32) -> Self {
        Self { digits }
    }

    #[inline]
    pub fn round(&self, x: f64) -> f64 {
        round(x, self.digits)
    }

    /// `x` rounds to zero at this precision.
    #[inline]
    pub fn is_zero(&self, x: f64) -> bool {
        self.round(x) == 0.0
    }
}

/// Round `x` to `digits` decimal places (half away from zero).
#[inline]
pub fn round(x: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (x * scale).round() / scale
}
