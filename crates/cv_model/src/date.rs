//! Structured dates used by experience and education entries
//!
//! Dates are entered as free text in one of two shapes, `MM/YYYY` or
//! `DD/MM/YYYY`, and stored as [`DateParts`]. A `None` day means the date has
//! month granularity.

use crate::{CvModelError, Result};
use regex_lite::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Pattern accepted for month granularity dates
pub const MONTH_YEAR_PATTERN: &str = r"^(0[1-9]|1[0-2])/([0-9]{4})$";

/// Pattern accepted for day granularity dates
pub const DAY_MONTH_YEAR_PATTERN: &str =
    r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/([0-9]{4})$";

/// Placeholder shown next to date inputs
pub const DATE_FORMAT_HINT: &str = "MM/YYYY or DD/MM/YYYY";

fn month_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MONTH_YEAR_PATTERN).expect("valid month/year pattern"))
}

fn day_month_year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DAY_MONTH_YEAR_PATTERN).expect("valid day/month/year pattern"))
}

/// A calendar date with optional day precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateParts {
    /// Day of month, `None` for month/year dates. Not range-checked against the month.
    pub day: Option<u8>,
    /// Month, 1..=12
    pub month: u8,
    /// Four digit year
    pub year: u16,
}

impl DateParts {
    /// Create a month/year date
    pub fn month_year(month: u8, year: u16) -> Self {
        Self {
            day: None,
            month,
            year,
        }
    }

    /// Create a day/month/year date
    pub fn full(day: u8, month: u8, year: u16) -> Self {
        Self {
            day: Some(day),
            month,
            year,
        }
    }

    /// Whether this date carries a day component
    pub fn has_day(&self) -> bool {
        self.day.is_some()
    }
}

/// Parse `MM/YYYY` or `DD/MM/YYYY` into a [`DateParts`].
///
/// Surrounding whitespace is ignored. Any other shape returns `None`, which
/// the form pages treat as a validation failure.
pub fn parse_date(text: &str) -> Option<DateParts> {
    let trimmed = text.trim();

    if let Some(caps) = month_year_regex().captures(trimmed) {
        return Some(DateParts {
            day: None,
            month: caps[1].parse().ok()?,
            year: caps[2].parse().ok()?,
        });
    }

    if let Some(caps) = day_month_year_regex().captures(trimmed) {
        return Some(DateParts {
            day: Some(caps[1].parse().ok()?),
            month: caps[2].parse().ok()?,
            year: caps[3].parse().ok()?,
        });
    }

    None
}

/// Format a date back into the text shape it was parsed from
pub fn format_date(date: &DateParts) -> String {
    date.to_string()
}

/// Whether `text` is a date the form pages accept
pub fn is_valid_date_text(text: &str) -> bool {
    parse_date(text).is_some()
}

impl fmt::Display for DateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day {
            Some(day) => write!(f, "{:02}/{:02}/{:04}", day, self.month, self.year),
            None => write!(f, "{:02}/{:04}", self.month, self.year),
        }
    }
}

impl FromStr for DateParts {
    type Err = CvModelError;

    fn from_str(s: &str) -> Result<Self> {
        parse_date(s).ok_or_else(|| CvModelError::InvalidDate(s.to_string()))
    }
}

/// Wire forms a stored date may take: the structured object, or the text
/// form written by older builds.
#[derive(Deserialize)]
#[serde(untagged)]
enum DateRepr {
    Parts {
        #[serde(default)]
        day: Option<u8>,
        month: u8,
        year: u16,
    },
    Text(String),
}

impl DateParts {
    fn from_repr<E: de::Error>(repr: DateRepr) -> std::result::Result<Self, E> {
        match repr {
            DateRepr::Parts { day, month, year } => {
                if !(1..=12).contains(&month) {
                    return Err(E::custom(format!("month out of range: {}", month)));
                }
                Ok(DateParts { day, month, year })
            }
            DateRepr::Text(text) => parse_date(&text)
                .ok_or_else(|| E::custom(format!("unrecognised date text: {:?}", text))),
        }
    }
}

impl<'de> Deserialize<'de> for DateParts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        DateParts::from_repr(DateRepr::deserialize(deserializer)?)
    }
}

/// Deserialize an optional date, reading `null` and blank text as no date.
///
/// Older builds stored an empty string for an unset end date.
pub fn deserialize_optional_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<DateParts>, D::Error> {
    match Option::<DateRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(DateRepr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(repr) => DateParts::from_repr::<D::Error>(repr).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_month_year() {
        assert_eq!(parse_date("03/2021"), Some(DateParts::month_year(3, 2021)));
    }

    #[test]
    fn test_parse_day_month_year() {
        assert_eq!(parse_date("15/09/2019"), Some(DateParts::full(15, 9, 2019)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_date("  12/2020 "), Some(DateParts::month_year(12, 2020)));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for text in [
            "13/2024",
            "2024/01",
            "1/1/2024",
            "00/2024",
            "01/24",
            "32/01/2024",
            "01/13/2024",
            "01-2024",
            "",
            "01/2024/",
            "a1/2024",
        ] {
            assert_eq!(parse_date(text), None, "{:?} should be rejected", text);
        }
    }

    #[test]
    fn test_day_of_month_not_checked_against_month() {
        assert_eq!(parse_date("31/02/2023"), Some(DateParts::full(31, 2, 2023)));
    }

    #[test]
    fn test_format_pads_components() {
        assert_eq!(format_date(&DateParts::month_year(1, 2020)), "01/2020");
        assert_eq!(format_date(&DateParts::full(5, 7, 2018)), "05/07/2018");
        assert_eq!(format_date(&DateParts::month_year(4, 987)), "04/0987");
    }

    #[test]
    fn test_from_str_error() {
        let err = "2024".parse::<DateParts>().unwrap_err();
        assert_eq!(err, CvModelError::InvalidDate("2024".to_string()));
    }

    #[test]
    fn test_serialize_month_year_keeps_null_day() {
        let json = serde_json::to_string(&DateParts::month_year(6, 2022)).unwrap();
        assert_eq!(json, r#"{"day":null,"month":6,"year":2022}"#);
    }

    #[test]
    fn test_deserialize_structured_and_text() {
        let parts: DateParts = serde_json::from_str(r#"{"day":2,"month":3,"year":2020}"#).unwrap();
        assert_eq!(parts, DateParts::full(2, 3, 2020));

        let text: DateParts = serde_json::from_str(r#""03/2020""#).unwrap();
        assert_eq!(text, DateParts::month_year(3, 2020));
    }

    #[test]
    fn test_deserialize_rejects_bad_month() {
        assert!(serde_json::from_str::<DateParts>(r#"{"day":null,"month":13,"year":2020}"#).is_err());
        assert!(serde_json::from_str::<DateParts>(r#""yesterday""#).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct EndDate {
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        end: Option<DateParts>,
    }

    #[test]
    fn test_optional_date_treats_blank_as_none() {
        for json in [r#"{}"#, r#"{"end":null}"#, r#"{"end":""}"#, r#"{"end":"   "}"#] {
            let parsed: EndDate = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.end, None, "{}", json);
        }
        let parsed: EndDate = serde_json::from_str(r#"{"end":"06/2021"}"#).unwrap();
        assert_eq!(parsed.end, Some(DateParts::month_year(6, 2021)));
        assert!(serde_json::from_str::<EndDate>(r#"{"end":"soon"}"#).is_err());
    }

    fn any_parsable_date() -> impl Strategy<Value = DateParts> {
        (proptest::option::of(1u8..=31), 1u8..=12, 0u16..=9999)
            .prop_map(|(day, month, year)| DateParts { day, month, year })
    }

    proptest! {
        #[test]
        fn prop_format_then_parse_round_trips(date in any_parsable_date()) {
            prop_assert_eq!(parse_date(&format_date(&date)), Some(date));
        }

        #[test]
        fn prop_parse_never_panics(text in "\\PC{0,16}") {
            let _ = parse_date(&text);
        }
    }
}
