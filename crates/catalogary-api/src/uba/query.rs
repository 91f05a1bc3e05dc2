// Query parameters for the UBA endpoints
//
// Dates go out as `YYYY-MM-DD`, hours as two digits `00`..`24`. An open end
// date is sent as the far-future sentinel the API expects.

use chrono::NaiveDate;

use crate::error::Error;
use crate::uba::scope::Scope;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// End date sent when a window has no upper bound.
pub const OPEN_END: &str = "2999-12-31";

/// Hour the API uses for "end of day".
pub const END_OF_DAY: u8 = 24;

/// A `[date_from time_from, date_to time_to]` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    date_from: NaiveDate,
    time_from: u8,
    date_to: Option<NaiveDate>,
    time_to: u8,
}

impl TimeWindow {
    /// Open-ended window starting at the end of `date_from`.
    pub fn starting(date_from: NaiveDate) -> Self {
        Self {
            date_from,
            time_from: END_OF_DAY,
            date_to: None,
            time_to: END_OF_DAY,
        }
    }

    /// Parse the start date from `YYYY-MM-DD`.
    pub fn parse(date_from: &str) -> Result<Self, Error> {
        Ok(Self::starting(parse_date("date_from", date_from)?))
    }

    pub fn time_from(mut self, hour: u8) -> Result<Self, Error> {
        self.time_from = check_hour("time_from", hour)?;
        Ok(self)
    }

    /// Close the window at `date_to`.
    pub fn until(mut self, date_to: NaiveDate) -> Result<Self, Error> {
        if date_to < self.date_from {
            return Err(Error::InvalidParameter {
                name: "date_to",
                reason: format!("{date_to} is before date_from {}", self.date_from),
            });
        }
        self.date_to = Some(date_to);
        Ok(self)
    }

    /// Like [`until`](Self::until), from `YYYY-MM-DD`.
    pub fn until_str(self, date_to: &str) -> Result<Self, Error> {
        let date = parse_date("date_to", date_to)?;
        self.until(date)
    }

    pub fn time_to(mut self, hour: u8) -> Result<Self, Error> {
        self.time_to = check_hour("time_to", hour)?;
        Ok(self)
    }

    pub fn date_from(&self) -> NaiveDate {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    /// The four window parameters, in the order the API documents them.
    pub fn params(&self) -> [(&'static str, String); 4] {
        [
            ("date_from", self.date_from.format(DATE_FORMAT).to_string()),
            ("time_from", format!("{:02}", self.time_from)),
            (
                "date_to",
                self.date_to.map_or_else(
                    || OPEN_END.to_owned(),
                    |d| d.format(DATE_FORMAT).to_string(),
                ),
            ),
            ("time_to", format!("{:02}", self.time_to)),
        ]
    }
}

/// Filters for one `measures` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureQuery {
    pub window: TimeWindow,
    pub component: String,
    pub scope: Scope,
    pub station: Option<String>,
}

impl MeasureQuery {
    /// Component `1` at the hourly-mean scope, all stations.
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            component: "1".into(),
            scope: Scope::default(),
            station: None,
        }
    }

    pub fn component(mut self, id: impl Into<String>) -> Self {
        self.component = id.into();
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }
}

fn parse_date(name: &'static str, raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| Error::InvalidParameter {
        name,
        reason: format!("'{raw}' is not a YYYY-MM-DD date: {e}"),
    })
}

fn check_hour(name: &'static str, hour: u8) -> Result<u8, Error> {
    if hour > END_OF_DAY {
        return Err(Error::InvalidParameter {
            name,
            reason: format!("hour {hour} is outside 0-24"),
        });
    }
    Ok(hour)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn open_window_uses_sentinel_and_end_of_day() {
        let window = TimeWindow::parse("2026-10-01").expect("valid date");
        let params = window.params();
        assert_eq!(param(&params, "date_from"), Some("2026-10-01"));
        assert_eq!(param(&params, "time_from"), Some("24"));
        assert_eq!(param(&params, "date_to"), Some("2999-12-31"));
        assert_eq!(param(&params, "time_to"), Some("24"));
    }

    #[test]
    fn hours_are_zero_padded() {
        let window = TimeWindow::parse("2026-10-01")
            .and_then(|w| w.time_from(1))
            .and_then(|w| w.until_str("2026-10-02"))
            .and_then(|w| w.time_to(0))
            .expect("valid window");
        let params = window.params();
        assert_eq!(param(&params, "time_from"), Some("01"));
        assert_eq!(param(&params, "date_to"), Some("2026-10-02"));
        assert_eq!(param(&params, "time_to"), Some("00"));
    }

    #[test]
    fn rejects_out_of_range_hours_and_bad_dates() {
        let window = TimeWindow::parse("2026-10-01").expect("valid date");
        assert!(matches!(
            window.time_to(25),
            Err(Error::InvalidParameter { name: "time_to", .. })
        ));
        assert!(matches!(
            TimeWindow::parse("01.10.2026"),
            Err(Error::InvalidParameter { name: "date_from", .. })
        ));
        assert!(window.until_str("2026-09-30").is_err());
    }

    #[test]
    fn measure_query_defaults() {
        let query = MeasureQuery::new(TimeWindow::parse("2026-10-01").expect("valid date"));
        assert_eq!(query.component, "1");
        assert_eq!(query.scope.code(), "2");
        assert!(query.station.is_none());
    }
}
