// Measurement scopes
//
// A scope is the temporal aggregation the UBA applies to raw readings. The
// API takes the numeric code; matrices are keyed by the short label.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Temporal aggregation of a measurement.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Scope {
    /// Daily mean.
    #[serde(rename = "1TMW")]
    #[strum(to_string = "1TMW")]
    DailyMean,
    /// One-hour mean.
    #[default]
    #[serde(rename = "1SMW")]
    #[strum(to_string = "1SMW")]
    HourlyMean,
    /// Daily maximum of the one-hour means.
    #[serde(rename = "1SMW_MAX")]
    #[strum(to_string = "1SMW_MAX")]
    DailyMaxHourlyMean,
    /// Eight-hour mean.
    #[serde(rename = "8SMW")]
    #[strum(to_string = "8SMW")]
    EightHourMean,
    /// Daily maximum of the eight-hour means.
    #[serde(rename = "8SMW_MAX")]
    #[strum(to_string = "8SMW_MAX")]
    DailyMaxEightHourMean,
    /// Daily rolling mean.
    #[serde(rename = "1TMWGL")]
    #[strum(to_string = "1TMWGL")]
    DailyRollingMean,
}

impl Scope {
    /// Numeric code sent as the `scope` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            Self::DailyMean => "1",
            Self::HourlyMean => "2",
            Self::DailyMaxHourlyMean => "3",
            Self::EightHourMean => "4",
            Self::DailyMaxEightHourMean => "5",
            Self::DailyRollingMean => "6",
        }
    }

    /// Short label used as the matrix key.
    pub fn label(self) -> &'static str {
        match self {
            Self::DailyMean => "1TMW",
            Self::HourlyMean => "1SMW",
            Self::DailyMaxHourlyMean => "1SMW_MAX",
            Self::EightHourMean => "8SMW",
            Self::DailyMaxEightHourMean => "8SMW_MAX",
            Self::DailyRollingMean => "1TMWGL",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::DailyMean => "daily mean",
            Self::HourlyMean => "one-hour mean",
            Self::DailyMaxHourlyMean => "daily maximum of one-hour means",
            Self::EightHourMean => "eight-hour mean",
            Self::DailyMaxEightHourMean => "daily maximum of eight-hour means",
            Self::DailyRollingMean => "daily rolling mean",
        }
    }

    /// Every scope, in code order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

/// Accepts either the numeric code or the label, case-insensitively.
impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::iter()
            .find(|scope| scope.code() == s || scope.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scope '{s}' (expected 1-6 or a label such as 1SMW)"))
    }
}
