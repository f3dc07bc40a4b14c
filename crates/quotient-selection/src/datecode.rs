//! Date-code classification.
//!
//! Marketplace listings carry free-text date codes (`2217` = year 22 week 17,
//! `25`, `22+`, sometimes nothing). The classifier reduces them to a
//! three-valued freshness signal used only for ranking: a supplier is never
//! excluded for an old or missing date code.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Four-digit values in this range read equally well as a calendar year or as
/// a YYWW code, so they classify as unknown.
const AMBIGUOUS_YEAR_RANGE: std::ops::RangeInclusive<u32> = 2020..=2029;

/// Freshness signal derived from a raw date code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateCodeStatus {
    /// Confirmed within the freshness window
    Fresh,
    /// Missing, ambiguous, or unparseable; never penalized, never preferred
    Unknown,
    /// Confirmed older than the window
    Old,
}

impl DateCodeStatus {
    /// Favorability for aggregation: Fresh > Unknown > Old.
    #[must_use]
    pub fn favorability(self) -> u8 {
        match self {
            Self::Fresh => 2,
            Self::Unknown => 1,
            Self::Old => 0,
        }
    }

    /// The more favorable of two statuses.
    #[must_use]
    pub fn most_favorable(self, other: Self) -> Self {
        if other.favorability() > self.favorability() {
            other
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedDateCode {
    year_two_digit: u32,
    ambiguous: bool,
}

/// Classifies raw date-code text against a freshness window.
///
/// The current year is held explicitly so classification stays deterministic
/// under test and carries no ambient clock state.
#[derive(Debug, Clone)]
pub struct DateCodeClassifier {
    window_years: i32,
    current_year: i32,
}

impl DateCodeClassifier {
    /// Create a classifier with the given freshness window, anchored to the
    /// current wall-clock year.
    #[must_use]
    pub fn new(window_years: i32) -> Self {
        Self {
            window_years,
            current_year: Utc::now().year(),
        }
    }

    /// Anchor the classifier to a fixed year.
    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Classify a raw date-code string.
    #[must_use]
    pub fn classify(&self, raw: &str) -> DateCodeStatus {
        match Self::parse(raw) {
            None => DateCodeStatus::Unknown,
            Some(parsed) if parsed.ambiguous => DateCodeStatus::Unknown,
            Some(parsed) => self.status_for_year(parsed.year_two_digit),
        }
    }

    fn status_for_year(&self, year_two_digit: u32) -> DateCodeStatus {
        let year = self.resolve_year(year_two_digit);
        if year >= self.current_year - self.window_years {
            DateCodeStatus::Fresh
        } else {
            DateCodeStatus::Old
        }
    }

    /// Resolve a two-digit year against the current century, rolling back a
    /// century when the result would land more than one year in the future
    /// (a `99` code seen in 2026 means 1999, not 2099).
    fn resolve_year(&self, year_two_digit: u32) -> i32 {
        let century = self.current_year - self.current_year.rem_euclid(100);
        let mut year = century + i32::try_from(year_two_digit).unwrap_or(0);
        if year > self.current_year + 1 {
            year -= 100;
        }
        year
    }

    /// Extract a two-digit year and an ambiguity flag from raw text.
    ///
    /// - `25` -> year 25
    /// - `2217` -> year 22, week 17
    /// - `22+` -> year 22, ambiguous ("22 or newer")
    /// - `2022` -> ambiguous: could be the year 2022 or YYWW 20/22
    fn parse(raw: &str) -> Option<ParsedDateCode> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let has_plus = trimmed.contains('+');
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        let stripped: String = trimmed.chars().filter(|c| *c != '+').collect();

        let two_digit = |s: &str| s[..2].parse::<u32>().ok();

        if stripped.len() == 2 && stripped == digits {
            return two_digit(&stripped).map(|year| ParsedDateCode {
                year_two_digit: year,
                ambiguous: has_plus,
            });
        }

        if stripped.len() == 4 && stripped == digits {
            let value = stripped.parse::<u32>().ok()?;
            let year = two_digit(&stripped)?;
            return Some(ParsedDateCode {
                year_two_digit: year,
                ambiguous: has_plus || AMBIGUOUS_YEAR_RANGE.contains(&value),
            });
        }

        // Fall back to a leading two-digit prefix ("2217A", "22/17")
        if stripped.len() >= 2 && stripped.as_bytes()[..2].iter().all(u8::is_ascii_digit) {
            return two_digit(&stripped).map(|year| ParsedDateCode {
                year_two_digit: year,
                ambiguous: has_plus,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DateCodeClassifier {
        DateCodeClassifier::new(2).with_current_year(2026)
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(classifier().classify(""), DateCodeStatus::Unknown);
        assert_eq!(classifier().classify("   "), DateCodeStatus::Unknown);
    }

    #[test]
    fn test_unparseable_is_unknown() {
        assert_eq!(classifier().classify("N/A"), DateCodeStatus::Unknown);
        assert_eq!(classifier().classify("fresh"), DateCodeStatus::Unknown);
    }

    #[test]
    fn test_plus_suffix_is_unknown() {
        // "22+" means "2022 or newer"; the actual stock could be anything
        assert_eq!(classifier().classify("22+"), DateCodeStatus::Unknown);
        assert_eq!(classifier().classify("25+"), DateCodeStatus::Unknown);
    }

    #[test]
    fn test_two_digit_year_within_window() {
        assert_eq!(classifier().classify("25"), DateCodeStatus::Fresh);
        assert_eq!(classifier().classify("24"), DateCodeStatus::Fresh);
        assert_eq!(classifier().classify("26"), DateCodeStatus::Fresh);
    }

    #[test]
    fn test_two_digit_year_outside_window() {
        assert_eq!(classifier().classify("23"), DateCodeStatus::Old);
        assert_eq!(classifier().classify("19"), DateCodeStatus::Old);
    }

    #[test]
    fn test_yyww_format() {
        assert_eq!(classifier().classify("2517"), DateCodeStatus::Fresh);
        assert_eq!(classifier().classify("1840"), DateCodeStatus::Old);
    }

    #[test]
    fn test_four_digit_calendar_year_is_ambiguous() {
        // "2022" could be the year 2022 or YYWW 20/22
        assert_eq!(classifier().classify("2022"), DateCodeStatus::Unknown);
        assert_eq!(classifier().classify("2025"), DateCodeStatus::Unknown);
    }

    #[test]
    fn test_trailing_suffix_uses_year_prefix() {
        assert_eq!(classifier().classify("2517A"), DateCodeStatus::Fresh);
        assert_eq!(classifier().classify("18/40"), DateCodeStatus::Old);
    }

    #[test]
    fn test_century_rollover() {
        // In 2001 a "99" code is 1999, not 2099
        let c = DateCodeClassifier::new(2).with_current_year(2001);
        assert_eq!(c.classify("99"), DateCodeStatus::Fresh);
        let c = DateCodeClassifier::new(2).with_current_year(2005);
        assert_eq!(c.classify("99"), DateCodeStatus::Old);
    }

    #[test]
    fn test_next_year_code_is_fresh() {
        // Date codes can run one year ahead of the calendar
        assert_eq!(classifier().classify("27"), DateCodeStatus::Fresh);
    }

    #[test]
    fn test_most_favorable_ordering() {
        use DateCodeStatus::{Fresh, Old, Unknown};
        assert_eq!(Old.most_favorable(Unknown), Unknown);
        assert_eq!(Unknown.most_favorable(Fresh), Fresh);
        assert_eq!(Fresh.most_favorable(Old), Fresh);
        assert_eq!(Unknown.most_favorable(Unknown), Unknown);
    }
}
