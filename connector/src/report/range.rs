//! Named report ranges resolved against a reference instant.

use crate::datetime::local_date;
use crate::error::{ConnectorError, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic date range. Wire values are `"0"`..`"11"` in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateRangeSelector {
    Today,
    ThisWeek,
    ThisAndLastWeek,
    ThisMonth,
    ThisYear,
    Yesterday,
    LastWeek,
    Last2Weeks,
    Last4Weeks,
    LastMonth,
    LastYear,
    Custom,
}

impl DateRangeSelector {
    pub const ALL: [DateRangeSelector; 12] = [
        Self::Today,
        Self::ThisWeek,
        Self::ThisAndLastWeek,
        Self::ThisMonth,
        Self::ThisYear,
        Self::Yesterday,
        Self::LastWeek,
        Self::Last2Weeks,
        Self::Last4Weeks,
        Self::LastMonth,
        Self::LastYear,
        Self::Custom,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "current Week",
            Self::ThisAndLastWeek => "current 2 Weeks",
            Self::ThisMonth => "current Month",
            Self::ThisYear => "current Year",
            Self::Yesterday => "Yesterday",
            Self::LastWeek => "last Week",
            Self::Last2Weeks => "last 2 Weeks",
            Self::Last4Weeks => "last 4 Weeks",
            Self::LastMonth => "last Month",
            Self::LastYear => "last Year",
            Self::Custom => "Custom Range",
        }
    }
}

impl FromStr for DateRangeSelector {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(|code| Self::ALL.get(code).copied())
            .ok_or_else(|| ConnectorError::InvalidRange(format!("unknown selector '{}'", s)))
    }
}

impl fmt::Display for DateRangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Closed interval of calendar dates, serialized as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Caller-supplied bounds for `Custom`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CustomBounds<'a> {
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
}

/// Resolves selectors to concrete dates.
///
/// "Today" is the calendar date of `now` in the configured zone. Custom
/// bounds are read in the zone written into each bound, so a bound of
/// `2025-01-31T23:30:00-05:00` stays on the 31st.
#[derive(Clone, Copy, Debug)]
pub struct DateRangeResolver {
    zone: Tz,
    week_start: Weekday,
}

impl DateRangeResolver {
    pub fn new(zone: Tz, week_start: Weekday) -> Self {
        Self { zone, week_start }
    }

    pub fn resolve(
        &self,
        selector: DateRangeSelector,
        now: DateTime<Utc>,
        custom: CustomBounds<'_>,
    ) -> Result<DateInterval> {
        let today = now.with_timezone(&self.zone).date_naive();
        let this_week = self.week_of(today);
        let last_week = self.week_of(today - Duration::weeks(1));

        let interval = match selector {
            DateRangeSelector::Today => DateInterval::new(today, today),
            DateRangeSelector::ThisWeek => this_week,
            DateRangeSelector::ThisAndLastWeek => DateInterval::new(last_week.start, this_week.end),
            DateRangeSelector::ThisMonth => month_of(today),
            DateRangeSelector::ThisYear => year_of(today),
            DateRangeSelector::Yesterday => {
                let yesterday = today - Duration::days(1);
                DateInterval::new(yesterday, yesterday)
            }
            DateRangeSelector::LastWeek => last_week,
            DateRangeSelector::Last2Weeks => {
                DateInterval::new(self.week_of(today - Duration::weeks(2)).start, last_week.end)
            }
            DateRangeSelector::Last4Weeks => {
                DateInterval::new(self.week_of(today - Duration::weeks(4)).start, last_week.end)
            }
            DateRangeSelector::LastMonth => month_of(month_of(today).start - Duration::days(1)),
            DateRangeSelector::LastYear => year_of(year_of(today).start - Duration::days(1)),
            // Caller bounds are passed through as given, even when inverted.
            DateRangeSelector::Custom => match (custom.start, custom.end) {
                (Some(start), Some(end)) => DateInterval::new(local_date(start)?, local_date(end)?),
                _ => DateInterval::new(today, today),
            },
        };
        Ok(interval)
    }

    fn week_of(&self, day: NaiveDate) -> DateInterval {
        let offset = (7 + day.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;
        let start = day - Duration::days(i64::from(offset));
        DateInterval::new(start, start + Duration::days(6))
    }
}

fn month_of(day: NaiveDate) -> DateInterval {
    let start = day - Duration::days(i64::from(day.day0()));
    // 32 days past the 1st always lands in the following month
    let next = start + Duration::days(32);
    let next_start = next - Duration::days(i64::from(next.day0()));
    DateInterval::new(start, next_start - Duration::days(1))
}

fn year_of(day: NaiveDate) -> DateInterval {
    let start = day - Duration::days(i64::from(day.ordinal0()));
    let next = start + Duration::days(366);
    let next_start = next - Duration::days(i64::from(next.ordinal0()));
    DateInterval::new(start, next_start - Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn monday_resolver() -> DateRangeResolver {
        DateRangeResolver::new(Tz::UTC, Weekday::Mon)
    }

    fn resolve(selector: DateRangeSelector, now: DateTime<Utc>) -> DateInterval {
        monday_resolver()
            .resolve(selector, now, CustomBounds::default())
            .unwrap()
    }

    #[test]
    fn test_selector_from_wire_value() {
        assert_eq!("0".parse::<DateRangeSelector>().unwrap(), DateRangeSelector::Today);
        assert_eq!("6".parse::<DateRangeSelector>().unwrap(), DateRangeSelector::LastWeek);
        assert_eq!("11".parse::<DateRangeSelector>().unwrap(), DateRangeSelector::Custom);
        assert!(matches!(
            "12".parse::<DateRangeSelector>(),
            Err(ConnectorError::InvalidRange(_))
        ));
        assert!("lastweek".parse::<DateRangeSelector>().is_err());
        assert_eq!(DateRangeSelector::Last4Weeks.to_string(), "8");
    }

    #[test]
    fn test_this_month() {
        let interval = resolve(DateRangeSelector::ThisMonth, utc(2025, 1, 15, 12));
        assert_eq!(interval, DateInterval::new(date(2025, 1, 1), date(2025, 1, 31)));
    }

    #[test]
    fn test_last_week_from_wednesday() {
        // 2025-01-15 is a Wednesday
        let interval = resolve(DateRangeSelector::LastWeek, utc(2025, 1, 15, 9));
        assert_eq!(interval, DateInterval::new(date(2025, 1, 6), date(2025, 1, 12)));
        assert_eq!(interval.start.weekday(), Weekday::Mon);
        assert_eq!(interval.end.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_sunday_week_start() {
        let resolver = DateRangeResolver::new(Tz::UTC, Weekday::Sun);
        let interval = resolver
            .resolve(DateRangeSelector::ThisWeek, utc(2025, 1, 15, 9), CustomBounds::default())
            .unwrap();
        assert_eq!(interval, DateInterval::new(date(2025, 1, 12), date(2025, 1, 18)));
    }

    #[test]
    fn test_week_containing_week_start_day() {
        // Monday itself starts the current week
        let interval = resolve(DateRangeSelector::ThisWeek, utc(2025, 1, 13, 0));
        assert_eq!(interval, DateInterval::new(date(2025, 1, 13), date(2025, 1, 19)));
    }

    #[test]
    fn test_full_table() {
        let now = utc(2024, 3, 1, 10); // Friday, leap year
        let cases = [
            (DateRangeSelector::Today, (2024, 3, 1), (2024, 3, 1)),
            (DateRangeSelector::ThisWeek, (2024, 2, 26), (2024, 3, 3)),
            (DateRangeSelector::ThisAndLastWeek, (2024, 2, 19), (2024, 3, 3)),
            (DateRangeSelector::ThisMonth, (2024, 3, 1), (2024, 3, 31)),
            (DateRangeSelector::ThisYear, (2024, 1, 1), (2024, 12, 31)),
            (DateRangeSelector::Yesterday, (2024, 2, 29), (2024, 2, 29)),
            (DateRangeSelector::LastWeek, (2024, 2, 19), (2024, 2, 25)),
            (DateRangeSelector::Last2Weeks, (2024, 2, 12), (2024, 2, 25)),
            (DateRangeSelector::Last4Weeks, (2024, 1, 29), (2024, 2, 25)),
            (DateRangeSelector::LastMonth, (2024, 2, 1), (2024, 2, 29)),
            (DateRangeSelector::LastYear, (2023, 1, 1), (2023, 12, 31)),
        ];
        for (selector, (sy, sm, sd), (ey, em, ed)) in cases {
            let interval = resolve(selector, now);
            assert_eq!(
                interval,
                DateInterval::new(date(sy, sm, sd), date(ey, em, ed)),
                "selector {:?}",
                selector
            );
        }
    }

    #[test]
    fn test_start_never_after_end() {
        let instants = [
            utc(2023, 1, 1, 0),
            utc(2023, 12, 31, 23),
            utc(2024, 2, 29, 12),
            utc(2025, 6, 30, 5),
        ];
        for now in instants {
            for selector in DateRangeSelector::ALL {
                let interval = resolve(selector, now);
                assert!(interval.start <= interval.end, "{:?} at {}", selector, now);
            }
        }
    }

    #[test]
    fn test_year_boundaries() {
        let interval = resolve(DateRangeSelector::LastMonth, utc(2025, 1, 10, 0));
        assert_eq!(interval, DateInterval::new(date(2024, 12, 1), date(2024, 12, 31)));

        let interval = resolve(DateRangeSelector::Yesterday, utc(2025, 1, 1, 0));
        assert_eq!(interval, DateInterval::new(date(2024, 12, 31), date(2024, 12, 31)));
    }

    #[test]
    fn test_today_uses_configured_zone() {
        // 2025-01-15 02:00 UTC is still the 14th in New York
        let resolver = DateRangeResolver::new(chrono_tz::America::New_York, Weekday::Mon);
        let interval = resolver
            .resolve(DateRangeSelector::Today, utc(2025, 1, 15, 2), CustomBounds::default())
            .unwrap();
        assert_eq!(interval, DateInterval::new(date(2025, 1, 14), date(2025, 1, 14)));
    }

    #[test]
    fn test_custom_without_bounds_falls_back_to_today() {
        let now = utc(2025, 1, 15, 12);
        let only_start = CustomBounds {
            start: Some("2025-01-01"),
            end: None,
        };
        let resolver = monday_resolver();
        assert_eq!(
            resolver
                .resolve(DateRangeSelector::Custom, now, CustomBounds::default())
                .unwrap(),
            resolve(DateRangeSelector::Today, now)
        );
        assert_eq!(
            resolver
                .resolve(DateRangeSelector::Custom, now, only_start)
                .unwrap(),
            resolve(DateRangeSelector::Today, now)
        );
    }

    #[test]
    fn test_custom_ignores_time_of_day() {
        let resolver = monday_resolver();
        let now = utc(2025, 6, 1, 0);
        let morning = resolver
            .resolve(
                DateRangeSelector::Custom,
                now,
                CustomBounds {
                    start: Some("2025-01-01T00:00:00+00:00"),
                    end: Some("2025-01-31T00:00:00+00:00"),
                },
            )
            .unwrap();
        let evening = resolver
            .resolve(
                DateRangeSelector::Custom,
                now,
                CustomBounds {
                    start: Some("2025-01-01T21:45:12.500+00:00"),
                    end: Some("2025-01-31T23:59:59+00:00"),
                },
            )
            .unwrap();
        assert_eq!(morning, DateInterval::new(date(2025, 1, 1), date(2025, 1, 31)));
        assert_eq!(morning, evening);
    }

    #[test]
    fn test_custom_honors_embedded_zone() {
        let interval = monday_resolver()
            .resolve(
                DateRangeSelector::Custom,
                utc(2025, 6, 1, 0),
                CustomBounds {
                    start: Some("2025-01-01T00:30:00+09:00"),
                    end: Some("2025-01-31T23:30:00-05:00"),
                },
            )
            .unwrap();
        // Forcing UTC would give 2024-12-31 .. 2025-02-01
        assert_eq!(interval, DateInterval::new(date(2025, 1, 1), date(2025, 1, 31)));
    }

    #[test]
    fn test_custom_inverted_bounds_pass_through() {
        let interval = monday_resolver()
            .resolve(
                DateRangeSelector::Custom,
                utc(2025, 6, 1, 0),
                CustomBounds {
                    start: Some("2025-03-31"),
                    end: Some("2025-03-01"),
                },
            )
            .unwrap();
        assert_eq!(interval, DateInterval::new(date(2025, 3, 31), date(2025, 3, 1)));
        assert!(interval.start > interval.end);
    }

    #[test]
    fn test_custom_invalid_bound() {
        let err = monday_resolver()
            .resolve(
                DateRangeSelector::Custom,
                utc(2025, 6, 1, 0),
                CustomBounds {
                    start: Some("first of january"),
                    end: Some("2025-01-31"),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput(_)));
    }

    #[test]
    fn test_interval_serializes_as_plain_dates() {
        let interval = DateInterval::new(date(2025, 1, 1), date(2025, 1, 31));
        assert_eq!(
            serde_json::to_value(interval).unwrap(),
            serde_json::json!({"start": "2025-01-01", "end": "2025-01-31"})
        );
    }
}
