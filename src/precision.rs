//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

//! Fixed decimal precision for ordinate values.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tie-break rule for values exactly halfway between two representable decimals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties round away from zero.
    #[default]
    HalfUp,
    /// Ties round towards zero.
    HalfDown,
}

impl TryFrom<u8> for RoundingMode {
    type Error = Error;

    /// Legacy numeric mode codes: 1 = half-up, 2 = half-down.
    fn try_from(mode: u8) -> Result<Self> {
        match mode {
            1 => Ok(RoundingMode::HalfUp),
            2 => Ok(RoundingMode::HalfDown),
            _ => Err(Error::Precision(format!(
                "rounding mode must be either 1 or 2, found {}",
                mode
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrecisionModel {
    precision: u32,
    mode: RoundingMode,
}

// Significant digits kept when cleaning up the scaled value before rounding.
const PRE_ROUND_DIGITS: usize = 15;

impl PrecisionModel {
    pub const MAX_PRECISION: u32 = f64::DIGITS;
    pub const DEFAULT_PRECISION: u32 = 6;

    pub fn new(precision: u32, mode: RoundingMode) -> Result<Self> {
        if precision > Self::MAX_PRECISION {
            return Err(Error::Precision(format!(
                "precision of {} exceeds the maximum of {} decimal digits",
                precision,
                Self::MAX_PRECISION
            )));
        }
        Ok(PrecisionModel { precision, mode })
    }

    /// Number of digits after the decimal point.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn mode(&self) -> RoundingMode {
        self.mode
    }

    /// Rounds `value` to the model's number of decimal digits.
    ///
    /// NaN and infinities are returned unchanged.
    pub fn make_precise(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let factor = 10f64.powi(self.precision as i32);
        let scaled = value * factor;
        if !scaled.is_finite() || scaled.abs() >= 1e15 {
            // no fractional digits left to round at this magnitude
            return value;
        }
        let scaled = pre_round(scaled);
        let rounded = match self.mode {
            RoundingMode::HalfUp => scaled.round(),
            RoundingMode::HalfDown => {
                let truncated = scaled.trunc();
                if (scaled - truncated).abs() == 0.5 {
                    truncated
                } else {
                    scaled.round()
                }
            }
        };
        rounded / factor
    }

    /// Like [`make_precise`](Self::make_precise) for textual input; non-numeric text yields NaN.
    pub fn make_precise_str(&self, value: &str) -> f64 {
        match value.trim().parse::<f64>() {
            Ok(v) => self.make_precise(v),
            Err(_) => f64::NAN,
        }
    }
}

impl Default for PrecisionModel {
    fn default() -> Self {
        PrecisionModel {
            precision: Self::DEFAULT_PRECISION,
            mode: RoundingMode::HalfUp,
        }
    }
}

// Binary representation error turns decimal ties like 1.0000005 into 1000000.4999999999;
// rounding to 15 significant digits restores the intended decimal value.
fn pre_round(value: f64) -> f64 {
    format!("{:.*e}", PRE_ROUND_DIGITS - 1, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults() {
        let model = PrecisionModel::default();
        assert_eq!(model.precision(), 6);
        assert_eq!(model.mode(), RoundingMode::HalfUp);
    }

    #[rstest]
    #[case(29.12345697842, 29.123457)]
    #[case(-85.12875423, -85.128754)]
    #[case(0.01299999999999, 0.013)]
    #[case(10.0, 10.0)]
    fn make_precise(#[case] value: f64, #[case] expected: f64) {
        assert_eq!(PrecisionModel::default().make_precise(value), expected);
    }

    #[rstest]
    #[case(RoundingMode::HalfUp, 1.0000005, 1.000001)]
    #[case(RoundingMode::HalfDown, 1.0000005, 1.0)]
    #[case(RoundingMode::HalfUp, -1.0000005, -1.000001)]
    #[case(RoundingMode::HalfDown, -1.0000005, -1.0)]
    #[case(RoundingMode::HalfDown, 1.0000006, 1.000001)]
    fn ties(#[case] mode: RoundingMode, #[case] value: f64, #[case] expected: f64) {
        let model = PrecisionModel::new(6, mode).unwrap();
        assert_eq!(model.make_precise(value), expected);
    }

    #[rstest]
    #[case("String Value", true)]
    #[case("12.3", false)]
    #[case("10", false)]
    #[case("Ten", true)]
    fn text_input(#[case] value: &str, #[case] is_nan: bool) {
        let precise = PrecisionModel::default().make_precise_str(value);
        assert_eq!(precise.is_nan(), is_nan);
    }

    #[test]
    fn idempotent() {
        let model = PrecisionModel::new(4, RoundingMode::HalfDown).unwrap();
        for value in [0.0, 1.23456789, -98765.4321987, 3.00005, 1e-9, 123456789.98765] {
            let once = model.make_precise(value);
            assert_eq!(model.make_precise(once), once);
        }
    }

    #[test]
    fn non_finite_passes_through() {
        let model = PrecisionModel::default();
        assert!(model.make_precise(f64::NAN).is_nan());
        assert_eq!(model.make_precise(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn invalid_configuration() {
        assert!(matches!(
            PrecisionModel::new(99, RoundingMode::HalfUp),
            Err(Error::Precision(_))
        ));
        assert!(PrecisionModel::new(PrecisionModel::MAX_PRECISION, RoundingMode::HalfUp).is_ok());
        assert_eq!(RoundingMode::try_from(2).unwrap(), RoundingMode::HalfDown);
        assert!(matches!(RoundingMode::try_from(3), Err(Error::Precision(_))));
    }
}
