//! Calendar month type for delivery scheduling.
//!
//! Cargo decisions are made on a monthly grid. [`DeliveryMonth`] is a
//! validated (year, month) pair with the arithmetic the desk needs: stepping
//! forward for next-month settlement, distance between months for lead times
//! and hedge timing, and the first calendar day for fee-window checks.

use super::error::DateError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// A calendar month in which a cargo is delivered.
///
/// Ordering is chronological. Serialises as `"YYYY-MM"`.
///
/// # Examples
///
/// ```
/// use lng_core::types::DeliveryMonth;
///
/// let m = DeliveryMonth::new(2025, 12).unwrap();
/// assert_eq!(m.next(), DeliveryMonth::new(2026, 1).unwrap());
/// assert_eq!(m.to_string(), "2025-12");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct DeliveryMonth {
    year: i32,
    month: u32,
}

impl DeliveryMonth {
    /// Creates a new delivery month.
    ///
    /// # Errors
    ///
    /// Returns `DateError::InvalidMonth` if `month` is outside 1..=12 or the
    /// year is outside the supported calendar range.
    pub fn new(year: i32, month: u32) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(DateError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    /// Returns the calendar year.
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the calendar month (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the zero-based calendar month index (January = 0).
    #[inline]
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// Returns the first calendar day of the month, or `None` when
    /// [`add_months`](Self::add_months) has stepped outside the supported
    /// calendar range.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Returns the month `n` months later (or earlier for negative `n`).
    pub fn add_months(&self, n: i32) -> Self {
        let total = self.year * 12 + (self.month as i32 - 1) + n;
        Self {
            year: total.div_euclid(12),
            month: total.rem_euclid(12) as u32 + 1,
        }
    }

    /// Returns the following month.
    #[inline]
    pub fn next(&self) -> Self {
        self.add_months(1)
    }

    /// Returns the signed number of months from `earlier` to `self`.
    ///
    /// ```
    /// use lng_core::types::DeliveryMonth;
    ///
    /// let a = DeliveryMonth::new(2025, 11).unwrap();
    /// let b = DeliveryMonth::new(2026, 2).unwrap();
    /// assert_eq!(b.months_since(&a), 3);
    /// assert_eq!(a.months_since(&b), -3);
    /// ```
    pub fn months_since(&self, earlier: &DeliveryMonth) -> i32 {
        (self.year - earlier.year) * 12 + (self.month as i32 - earlier.month as i32)
    }

    /// Returns `count` consecutive months starting at `self`.
    pub fn sequence(&self, count: usize) -> Vec<DeliveryMonth> {
        (0..count as i32).map(|i| self.add_months(i)).collect()
    }
}

impl Default for DeliveryMonth {
    /// January 1970.
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
        }
    }
}

impl fmt::Display for DeliveryMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for DeliveryMonth {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| DateError::ParseError(format!("expected YYYY-MM, got '{}'", s)))?;
        let year: i32 = year
            .parse()
            .map_err(|_| DateError::ParseError(format!("invalid year in '{}'", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| DateError::ParseError(format!("invalid month in '{}'", s)))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for DeliveryMonth {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeliveryMonth> for String {
    fn from(value: DeliveryMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_new_rejects_invalid_month() {
        assert!(matches!(
            DeliveryMonth::new(2025, 13),
            Err(DateError::InvalidMonth { month: 13, .. })
        ));
        assert!(DeliveryMonth::new(2025, 0).is_err());
    }

    #[test]
    fn test_add_months_across_year_boundary() {
        let m = DeliveryMonth::new(2025, 11).unwrap();
        assert_eq!(m.add_months(3), DeliveryMonth::new(2026, 2).unwrap());
        assert_eq!(m.add_months(-11), DeliveryMonth::new(2024, 12).unwrap());
    }

    #[test]
    fn test_parse_and_display() {
        let m: DeliveryMonth = "2026-03".parse().unwrap();
        assert_eq!(m.year(), 2026);
        assert_eq!(m.month(), 3);
        assert_eq!(m.month_index(), 2);
        assert_eq!(m.to_string(), "2026-03");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "March 2026".parse::<DeliveryMonth>(),
            Err(DateError::ParseError(_))
        ));
        assert!("2026-xx".parse::<DeliveryMonth>().is_err());
    }

    #[test]
    fn test_first_day() {
        let m = DeliveryMonth::new(2026, 2).unwrap();
        let d = m.first_day().unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2026, 2, 1));
    }

    #[test]
    fn test_first_day_outside_calendar_range_is_none() {
        let last = DeliveryMonth::new(NaiveDate::MAX.year(), 12).unwrap();
        assert!(last.first_day().is_some());
        assert_eq!(last.next().first_day(), None);
    }

    #[test]
    fn test_sequence() {
        let m = DeliveryMonth::new(2025, 10).unwrap();
        let seq = m.sequence(6);
        assert_eq!(seq.len(), 6);
        assert_eq!(seq[5].to_string(), "2026-03");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = DeliveryMonth::new(2025, 12).unwrap();
        let b = DeliveryMonth::new(2026, 1).unwrap();
        assert!(a < b);
    }
}
