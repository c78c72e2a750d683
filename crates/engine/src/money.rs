use std::{
    fmt,
    ops::Sub,
    str::FromStr,
};

use crate::EngineError;

/// Largest magnitude accepted when converting from a JSON number.
///
/// Above 2^53 an `f64` can no longer represent every cent.
const MAX_NUMBER_CENTS: f64 = 9_007_199_254_740_992.0;

/// Prizecash amount represented as **integer hundredths**.
///
/// Every monetary value in the engine (balances, ledger amounts, the
/// minimum donation) goes through this type so comparisons never suffer
/// floating-point drift. The JSON API exchanges plain numbers; use
/// [`PrizeCash::from_number`] and [`PrizeCash::as_number`] at that boundary.
///
/// # Examples
///
/// ```rust
/// use engine::PrizeCash;
///
/// let amount = PrizeCash::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(PrizeCash::new(500).to_string(), "5");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::PrizeCash;
///
/// assert_eq!("10".parse::<PrizeCash>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<PrizeCash>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<PrizeCash>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PrizeCash(i64);

impl PrizeCash {
    pub const ZERO: PrizeCash = PrizeCash(0);

    /// Creates a new amount from integer hundredths.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole prizecash units.
    #[must_use]
    pub const fn whole(units: i64) -> Self {
        Self(units * 100)
    }

    /// Returns the raw value in hundredths.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Clamps the amount into `[min, max]`.
    #[must_use]
    pub fn clamp_to(self, min: PrizeCash, max: PrizeCash) -> PrizeCash {
        if max < min {
            return min;
        }
        self.clamp(min, max)
    }

    /// Converts a JSON number into an amount.
    ///
    /// Rejects non-finite values, values with more than two decimals and
    /// values too large to be represented exactly.
    pub fn from_number(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }
        if rounded.abs() > MAX_NUMBER_CENTS {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Self(rounded as i64))
    }

    /// Returns the amount as a JSON-friendly number.
    #[must_use]
    pub fn as_number(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for PrizeCash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        if cents == 0 {
            write!(f, "{sign}{units}")
        } else {
            write!(f, "{sign}{units}.{cents:02}")
        }
    }
}

impl Sub for PrizeCash {
    type Output = PrizeCash;

    fn sub(self, rhs: PrizeCash) -> Self::Output {
        PrizeCash(self.0 - rhs.0)
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for PrizeCash {
    type Err = EngineError;

    /// Parses `12`, `12.5`, `12,50` or `-0.01`. At most two decimals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {:?}", s.trim()));

        let input = s.trim();
        let (negative, digits) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            _ => (false, input),
        };

        let (units, fraction) = match digits.split_once(['.', ',']) {
            Some((units, fraction)) => (units, fraction),
            None => (digits, ""),
        };
        if !all_digits(units) || (!fraction.is_empty() && !all_digits(fraction)) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }

        let hundredths = format!("{fraction:0<2}");
        let cents = units
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .and_then(|total| total.checked_add(hundredths.parse::<i64>().ok()?))
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;

        Ok(PrizeCash(if negative { -cents } else { cents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_drops_zero_fraction() {
        assert_eq!(PrizeCash::new(0).to_string(), "0");
        assert_eq!(PrizeCash::new(1).to_string(), "0.01");
        assert_eq!(PrizeCash::new(10).to_string(), "0.10");
        assert_eq!(PrizeCash::new(1050).to_string(), "10.50");
        assert_eq!(PrizeCash::new(10000).to_string(), "100");
        assert_eq!(PrizeCash::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<PrizeCash>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<PrizeCash>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<PrizeCash>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<PrizeCash>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<PrizeCash>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<PrizeCash>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<PrizeCash>().is_err());
        assert!("0.001".parse::<PrizeCash>().is_err());
        assert!("1.2.3".parse::<PrizeCash>().is_err());
        assert!("".parse::<PrizeCash>().is_err());
        assert!("-".parse::<PrizeCash>().is_err());
        assert!(".5".parse::<PrizeCash>().is_err());
    }

    #[test]
    fn from_number_keeps_cents_exact() {
        assert_eq!(PrizeCash::from_number(20.0).unwrap(), PrizeCash::whole(20));
        assert_eq!(PrizeCash::from_number(0.1).unwrap().cents(), 10);
        assert_eq!(PrizeCash::from_number(19.99).unwrap().cents(), 1999);
        assert_eq!(PrizeCash::from_number(-3.5).unwrap().cents(), -350);
    }

    #[test]
    fn from_number_rejects_garbage() {
        assert!(PrizeCash::from_number(f64::NAN).is_err());
        assert!(PrizeCash::from_number(f64::INFINITY).is_err());
        assert!(PrizeCash::from_number(1.005).is_err());
        assert!(PrizeCash::from_number(1e300).is_err());
    }

    #[test]
    fn clamp_to_handles_inverted_bounds() {
        let max = PrizeCash::whole(10);
        assert_eq!(PrizeCash::whole(20).clamp_to(PrizeCash::ZERO, max), max);
        assert_eq!(PrizeCash::whole(-5).clamp_to(PrizeCash::ZERO, max), PrizeCash::ZERO);
        assert_eq!(
            PrizeCash::whole(3).clamp_to(PrizeCash::ZERO, PrizeCash::whole(-1)),
            PrizeCash::ZERO
        );
    }
}
