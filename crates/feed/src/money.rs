use std::{fmt, str::FromStr};

use crate::FeedError;

/// Amount in integer minor units (cents), as carried by
/// [`TransactionRecord::amount_minor`](api_types::transaction::TransactionRecord).
///
/// Parsing accepts `.` or `,` as decimal separator, an optional sign and at
/// most two fractional digits:
///
/// ```rust
/// use feed::MinorAmount;
///
/// assert_eq!("12".parse::<MinorAmount>().unwrap().minor(), 1200);
/// assert_eq!("12,5".parse::<MinorAmount>().unwrap().minor(), 1250);
/// assert!("1.999".parse::<MinorAmount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MinorAmount(i64);

impl MinorAmount {
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MinorAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for MinorAmount {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FeedError::InvalidAmount(format!("\"{}\" is not an amount", s.trim()));
        let overflow = || FeedError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let rest = rest.trim().replace(',', ".");
        let (units, fraction) = match rest.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (rest.as_str(), ""),
        };

        if units.is_empty() || !units.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units.parse().map_err(|_| overflow())?;
        let cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_cents() {
        assert_eq!(MinorAmount::new(0).to_string(), "0.00");
        assert_eq!(MinorAmount::new(7).to_string(), "0.07");
        assert_eq!(MinorAmount::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10.5".parse::<MinorAmount>().unwrap().minor(), 1050);
        assert_eq!(" 10,50 ".parse::<MinorAmount>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<MinorAmount>().unwrap().minor(), -1);
        assert_eq!("+3".parse::<MinorAmount>().unwrap().minor(), 300);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<MinorAmount>().is_err());
        assert!("abc".parse::<MinorAmount>().is_err());
        assert!("1.2.3".parse::<MinorAmount>().is_err());
        assert!("12.345".parse::<MinorAmount>().is_err());
        assert!(".50".parse::<MinorAmount>().is_err());
    }
}
