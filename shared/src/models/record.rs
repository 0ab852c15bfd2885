//! Query record models

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::range::DateRange;

/// Kind label persisted with every record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Current,
    Forecast,
    #[default]
    Range,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Current => "current",
            QueryKind::Forecast => "forecast",
            QueryKind::Range => "range",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = RecordQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(QueryKind::Current),
            "forecast" => Ok(QueryKind::Forecast),
            "range" => Ok(QueryKind::Range),
            other => Err(RecordQueryError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordQueryError {
    #[error("unknown query kind: {0}")]
    UnknownKind(String),

    #[error("range queries need both start_date and end_date")]
    MissingDates,

    #[error("{0}")]
    InvalidRange(&'static str),
}

/// What a record asked for, with the data each kind needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordQuery {
    Current,
    Forecast,
    Range(DateRange),
}

impl RecordQuery {
    /// Rebuild a query from its stored columns.
    ///
    /// Dates are only meaningful for range queries and are ignored otherwise.
    pub fn from_parts(
        kind: QueryKind,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, RecordQueryError> {
        match kind {
            QueryKind::Current => Ok(RecordQuery::Current),
            QueryKind::Forecast => Ok(RecordQuery::Forecast),
            QueryKind::Range => {
                let (Some(start), Some(end)) = (start_date, end_date) else {
                    return Err(RecordQueryError::MissingDates);
                };
                DateRange::new(start, end)
                    .map(RecordQuery::Range)
                    .map_err(RecordQueryError::InvalidRange)
            }
        }
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            RecordQuery::Current => QueryKind::Current,
            RecordQuery::Forecast => QueryKind::Forecast,
            RecordQuery::Range(_) => QueryKind::Range,
        }
    }

    pub fn date_range(&self) -> Option<DateRange> {
        match self {
            RecordQuery::Range(range) => Some(*range),
            RecordQuery::Current | RecordQuery::Forecast => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::range::INVALID_RANGE_MESSAGE;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("current".parse::<QueryKind>(), Ok(QueryKind::Current));
        assert_eq!("range".parse::<QueryKind>(), Ok(QueryKind::Range));
        assert_eq!(
            "hourly".parse::<QueryKind>(),
            Err(RecordQueryError::UnknownKind("hourly".to_string()))
        );
    }

    #[test]
    fn test_kind_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&QueryKind::Forecast).unwrap(), "\"forecast\"");
        assert_eq!(QueryKind::default(), QueryKind::Range);
    }

    #[test]
    fn test_range_query_requires_both_dates() {
        let err = RecordQuery::from_parts(QueryKind::Range, Some(date("2024-06-01")), None);
        assert_eq!(err, Err(RecordQueryError::MissingDates));
    }

    #[test]
    fn test_range_query_rejects_reversed_dates() {
        let err = RecordQuery::from_parts(
            QueryKind::Range,
            Some(date("2024-06-05")),
            Some(date("2024-06-01")),
        );
        assert_eq!(err, Err(RecordQueryError::InvalidRange(INVALID_RANGE_MESSAGE)));
    }

    #[test]
    fn test_current_query_ignores_dates() {
        let query = RecordQuery::from_parts(
            QueryKind::Current,
            Some(date("2024-06-05")),
            Some(date("2024-06-01")),
        )
        .unwrap();
        assert_eq!(query, RecordQuery::Current);
        assert_eq!(query.date_range(), None);
    }

    #[test]
    fn test_range_query_round_trip() {
        let query = RecordQuery::from_parts(
            QueryKind::Range,
            Some(date("2024-06-01")),
            Some(date("2024-06-05")),
        )
        .unwrap();
        assert_eq!(query.kind(), QueryKind::Range);
        let range = query.date_range().unwrap();
        assert_eq!(range.start(), date("2024-06-01"));
        assert_eq!(range.end(), date("2024-06-05"));
    }
}
