//! Date ranges and the archive/forecast split

use chrono::NaiveDate;
use serde::Serialize;

/// Message reported whenever a range ends before it starts
pub const INVALID_RANGE_MESSAGE: &str = "end date must be on/after start date";

/// An inclusive calendar date range with `end >= start`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, &'static str> {
        if end < start {
            return Err(INVALID_RANGE_MESSAGE);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Decide which source(s) serve this range as of `today`
    ///
    /// Days strictly before `today` belong to the archive; `today` and later
    /// belong to the forecast.
    pub fn plan(self, today: NaiveDate) -> RangePlan {
        if self.end < today {
            return RangePlan::Historical(self);
        }
        if self.start >= today {
            return RangePlan::Forecast(self);
        }

        // start < today, so today always has a predecessor
        match today.pred_opt() {
            Some(yesterday) => RangePlan::Split {
                historical: Self {
                    start: self.start,
                    end: yesterday,
                },
                forecast: Self {
                    start: today,
                    end: self.end,
                },
            },
            None => RangePlan::Forecast(self),
        }
    }
}

/// Which upstream source(s) a range is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePlan {
    /// Entirely before today
    Historical(DateRange),
    /// Entirely today or later
    Forecast(DateRange),
    /// Straddles today: archive up to yesterday, forecast from today
    Split {
        historical: DateRange,
        forecast: DateRange,
    },
}

impl RangePlan {
    pub fn historical(&self) -> Option<DateRange> {
        match self {
            RangePlan::Historical(range) => Some(*range),
            RangePlan::Split { historical, .. } => Some(*historical),
            RangePlan::Forecast(_) => None,
        }
    }

    pub fn forecast(&self) -> Option<DateRange> {
        match self {
            RangePlan::Forecast(range) => Some(*range),
            RangePlan::Split { forecast, .. } => Some(*forecast),
            RangePlan::Historical(_) => None,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, RangePlan::Split { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end)).unwrap()
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = DateRange::new(date("2024-06-05"), date("2024-06-01")).unwrap_err();
        assert_eq!(err, INVALID_RANGE_MESSAGE);
    }

    #[test]
    fn test_single_day_range() {
        let r = range("2024-06-05", "2024-06-05");
        assert_eq!(r.days(), 1);
        assert_eq!(r.start(), r.end());
    }

    #[test]
    fn test_fully_past_range_is_historical() {
        let plan = range("2024-06-01", "2024-06-05").plan(date("2024-06-10"));
        assert_eq!(plan, RangePlan::Historical(range("2024-06-01", "2024-06-05")));
        assert_eq!(plan.forecast(), None);
    }

    #[test]
    fn test_range_ending_yesterday_is_historical() {
        let plan = range("2024-06-01", "2024-06-09").plan(date("2024-06-10"));
        assert!(matches!(plan, RangePlan::Historical(_)));
    }

    #[test]
    fn test_range_starting_today_is_forecast() {
        let plan = range("2024-06-10", "2024-06-15").plan(date("2024-06-10"));
        assert_eq!(plan, RangePlan::Forecast(range("2024-06-10", "2024-06-15")));
        assert_eq!(plan.historical(), None);
    }

    #[test]
    fn test_straddling_range_is_split_at_today() {
        let plan = range("2024-06-05", "2024-06-15").plan(date("2024-06-10"));
        assert!(plan.is_split());
        assert_eq!(plan.historical(), Some(range("2024-06-05", "2024-06-09")));
        assert_eq!(plan.forecast(), Some(range("2024-06-10", "2024-06-15")));
    }

    #[test]
    fn test_range_ending_today_is_split() {
        let plan = range("2024-06-08", "2024-06-10").plan(date("2024-06-10"));
        assert_eq!(plan.historical(), Some(range("2024-06-08", "2024-06-09")));
        assert_eq!(plan.forecast(), Some(range("2024-06-10", "2024-06-10")));
    }

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..2000).prop_map(|offset| date("2020-01-01") + chrono::Duration::days(offset))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every day of the requested range is served by exactly one source
        #[test]
        fn prop_plan_partitions_range(
            a in date_strategy(),
            b in date_strategy(),
            today in date_strategy()
        ) {
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            let requested = DateRange::new(start, end).unwrap();
            let plan = requested.plan(today);

            let hist_days = plan.historical().map(|r| r.days()).unwrap_or(0);
            let fcst_days = plan.forecast().map(|r| r.days()).unwrap_or(0);
            prop_assert_eq!(hist_days + fcst_days, requested.days());

            if let Some(h) = plan.historical() {
                prop_assert!(h.end() < today);
                prop_assert_eq!(h.start(), start);
            }
            if let Some(f) = plan.forecast() {
                prop_assert!(f.start() >= today || f.start() == start);
                prop_assert_eq!(f.end(), end);
            }
        }

        #[test]
        fn prop_reversed_range_always_rejected(a in date_strategy(), gap in 1i64..400) {
            let later = a + chrono::Duration::days(gap);
            prop_assert!(DateRange::new(later, a).is_err());
        }
    }
}
