//! Daily weather series and the archive/forecast merge

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Key of the date index sequence
pub const TIME_KEY: &str = "time";

/// Reasons a daily series is rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("daily series has no \"time\" sequence")]
    MissingTime,

    #[error("\"time\" value at index {index} is not an ISO date")]
    InvalidDate { index: usize },

    #[error("\"time\" is not strictly ascending at index {index}")]
    NotAscending { index: usize },

    #[error("sequence \"{key}\" has {actual} values, expected {expected}")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
}

/// Parallel per-day value sequences keyed by metric name
///
/// Serializes as a plain JSON object, e.g.
/// `{"time": ["2024-06-01", ...], "temperature_2m_max": [21.3, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeries(BTreeMap<String, Vec<Value>>);

impl DailySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<Value>) {
        self.0.insert(key.into(), values);
    }

    pub fn get(&self, key: &str) -> Option<&[Value]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Length of one sequence, zero when the key is absent
    pub fn len_of(&self, key: &str) -> usize {
        self.0.get(key).map_or(0, Vec::len)
    }

    /// Number of days, i.e. the length of the `"time"` sequence
    pub fn days(&self) -> usize {
        self.len_of(TIME_KEY)
    }

    /// Parsed `"time"` sequence; entries that are not ISO dates are skipped
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.get(TIME_KEY)
            .unwrap_or_default()
            .iter()
            .filter_map(parse_date)
            .collect()
    }

    /// Check the single-source invariants: a `"time"` sequence of strictly
    /// ascending ISO dates, and every other sequence of the same length.
    pub fn validate(&self) -> Result<(), SeriesError> {
        let times = self.get(TIME_KEY).ok_or(SeriesError::MissingTime)?;

        let mut previous: Option<NaiveDate> = None;
        for (index, value) in times.iter().enumerate() {
            let current = parse_date(value).ok_or(SeriesError::InvalidDate { index })?;
            if previous.is_some_and(|p| p >= current) {
                return Err(SeriesError::NotAscending { index });
            }
            previous = Some(current);
        }

        let expected = times.len();
        for (key, values) in &self.0 {
            if values.len() != expected {
                return Err(SeriesError::LengthMismatch {
                    key: key.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }

        Ok(())
    }

    /// Merge an archive series with the forecast series that follows it.
    ///
    /// Every key from either side is kept; a side lacking a key contributes
    /// nothing to it. Values are concatenated archive-first. For `"time"`,
    /// forecast dates already present in the archive are dropped, so a date
    /// reported by both sources appears once and the archive's entry wins.
    pub fn merge(historical: DailySeries, forecast: DailySeries) -> DailySeries {
        let DailySeries(mut past) = historical;
        let DailySeries(mut future) = forecast;

        let keys: BTreeSet<String> = past.keys().chain(future.keys()).cloned().collect();

        let merged = keys
            .into_iter()
            .map(|key| {
                let mut values = past.remove(&key).unwrap_or_default();
                let tail = future.remove(&key).unwrap_or_default();

                if key == TIME_KEY {
                    let seen: HashSet<String> = values.iter().map(Value::to_string).collect();
                    values.extend(tail.into_iter().filter(|t| !seen.contains(&t.to_string())));
                } else {
                    values.extend(tail);
                }

                (key, values)
            })
            .collect();

        DailySeries(merged)
    }
}

impl FromIterator<(String, Vec<Value>)> for DailySeries {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Value>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn series(pairs: &[(&str, Value)]) -> DailySeries {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_array().cloned().unwrap_or_default()))
            .collect()
    }

    #[test]
    fn test_validate_accepts_aligned_series() {
        let s = series(&[
            ("time", json!(["2024-06-01", "2024-06-02"])),
            ("temperature_2m_max", json!([21.5, null])),
        ]);
        assert_eq!(s.validate(), Ok(()));
        assert_eq!(s.days(), 2);
    }

    #[test]
    fn test_validate_rejects_missing_time() {
        let s = series(&[("temperature_2m_max", json!([21.5]))]);
        assert_eq!(s.validate(), Err(SeriesError::MissingTime));
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let s = series(&[
            ("time", json!(["2024-06-01", "2024-06-02"])),
            ("precipitation_sum", json!([0.0])),
        ]);
        assert!(matches!(
            s.validate(),
            Err(SeriesError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_dates() {
        let s = series(&[("time", json!(["2024-06-01", "2024-06-01"]))]);
        assert_eq!(s.validate(), Err(SeriesError::NotAscending { index: 1 }));
    }

    #[test]
    fn test_validate_rejects_non_date_time() {
        let s = series(&[("time", json!(["2024-06-01", 7]))]);
        assert_eq!(s.validate(), Err(SeriesError::InvalidDate { index: 1 }));
    }

    #[test]
    fn test_merge_drops_overlapping_forecast_date() {
        let past = series(&[
            ("time", json!(["2024-06-08", "2024-06-09"])),
            ("temperature_2m_max", json!([20.0, 21.0])),
        ]);
        let future = series(&[
            ("time", json!(["2024-06-09", "2024-06-10", "2024-06-11"])),
            ("temperature_2m_max", json!([99.0, 22.0, 23.0])),
        ]);

        let merged = DailySeries::merge(past, future);

        assert_eq!(
            merged.get("time").unwrap(),
            json!(["2024-06-08", "2024-06-09", "2024-06-10", "2024-06-11"])
                .as_array()
                .unwrap()
                .as_slice()
        );
        // non-time sequences are concatenated verbatim
        assert_eq!(merged.len_of("temperature_2m_max"), 5);
        assert_eq!(merged.get("temperature_2m_max").unwrap()[1], json!(21.0));
    }

    #[test]
    fn test_merge_keeps_keys_missing_on_one_side() {
        let past = series(&[
            ("time", json!(["2024-06-09"])),
            ("precipitation_sum", json!([1.2])),
        ]);
        let future = series(&[
            ("time", json!(["2024-06-10"])),
            ("weather_code", json!([3])),
        ]);

        let merged = DailySeries::merge(past, future);

        assert_eq!(merged.days(), 2);
        assert_eq!(merged.len_of("precipitation_sum"), 1);
        assert_eq!(merged.get("precipitation_sum").unwrap(), &[json!(1.2)]);
        assert_eq!(merged.get("weather_code").unwrap(), &[json!(3)]);
    }

    #[test]
    fn test_merge_with_empty_side() {
        let past = series(&[("time", json!(["2024-06-09"]))]);
        let merged = DailySeries::merge(past.clone(), DailySeries::new());
        assert_eq!(merged, past);
    }

    #[test]
    fn test_series_round_trips_as_plain_object() {
        let s = series(&[("time", json!(["2024-06-09"]))]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json, json!({"time": ["2024-06-09"]}));
        let back: DailySeries = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    fn consecutive(start: NaiveDate, days: usize) -> Vec<Value> {
        (0..days)
            .map(|i| json!((start + chrono::Duration::days(i as i64)).format("%Y-%m-%d").to_string()))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Merged dates stay strictly ascending and other keys add up
        #[test]
        fn prop_merge_time_ascending_and_lengths_sum(
            past_days in 0usize..30,
            future_days in 0usize..30,
            overlap in 0usize..3
        ) {
            let split = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
            let past_start = split - chrono::Duration::days(past_days as i64);
            let overlap = overlap.min(past_days);
            let future_start = split - chrono::Duration::days(overlap as i64);

            let past = series(&[
                ("time", Value::Array(consecutive(past_start, past_days))),
                ("temperature_2m_min", Value::Array(vec![json!(1.0); past_days])),
            ]);
            let future = series(&[
                ("time", Value::Array(consecutive(future_start, future_days))),
                ("temperature_2m_min", Value::Array(vec![json!(2.0); future_days])),
            ]);

            let merged = DailySeries::merge(past, future);

            let dates = merged.dates();
            prop_assert_eq!(dates.len(), merged.days());
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(merged.len_of("temperature_2m_min"), past_days + future_days);
        }
    }
}
