//! Reporting calendar.
//!
//! A project reports once per calendar month, from the month of its start
//! date up to the current month (or its end date, whichever comes first).

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::reporting::error::ReportError;
use crate::reporting::types::ReportState;

/// One month a project has to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingMonth {
    /// First day of the month.
    pub from_date: NaiveDate,
    /// Last day of the month.
    pub to_date: NaiveDate,
    /// `todo` for the current month, `pending` for past ones.
    pub state: ReportState,
}

/// Date helpers for monthly reports.
pub struct ReportingPeriod;

impl ReportingPeriod {
    /// First day of the month containing `date`.
    #[must_use]
    pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
        date.with_day(1).unwrap_or(date)
    }

    /// Last day of the month containing `date`.
    #[must_use]
    pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
        Self::first_day_of_month(date)
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date)
    }

    /// Fills in a missing report period.
    ///
    /// `to_date` defaults to the end of the current month and `from_date`
    /// to the first day of `to_date`'s month.
    pub fn resolve(
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(NaiveDate, NaiveDate), ReportError> {
        let to = to_date.unwrap_or_else(|| Self::last_day_of_month(today));
        let from = from_date.unwrap_or_else(|| Self::first_day_of_month(to));
        if to < from {
            return Err(ReportError::InvalidPeriod);
        }
        Ok((from, to))
    }

    /// Display title, e.g. `"March, 2024 Report"`.
    #[must_use]
    pub fn title(from_date: Option<NaiveDate>, to_date: Option<NaiveDate>) -> Option<String> {
        from_date
            .or(to_date)
            .map(|date| date.format("%B, %Y Report").to_string())
    }

    /// Months a project has to report on as of `today`.
    ///
    /// Empty when the project has not started yet.
    #[must_use]
    pub fn months(start_date: NaiveDate, end_date: NaiveDate, today: NaiveDate) -> Vec<ReportingMonth> {
        let last = Self::first_day_of_month(end_date.min(today));
        let current = Self::first_day_of_month(today);

        let mut months = Vec::new();
        let mut cursor = Self::first_day_of_month(start_date);
        while cursor <= last {
            months.push(ReportingMonth {
                from_date: cursor,
                to_date: Self::last_day_of_month(cursor),
                state: if cursor == current {
                    ReportState::Todo
                } else {
                    ReportState::Pending
                },
            });
            match cursor.checked_add_months(Months::new(1)) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        months
    }

    /// Returns true if the report period touches the project's dates.
    #[must_use]
    pub fn overlaps_project(
        from_date: NaiveDate,
        to_date: NaiveDate,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> bool {
        from_date <= end_date && to_date >= start_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(ReportingPeriod::first_day_of_month(date(2024, 2, 17)), date(2024, 2, 1));
        assert_eq!(ReportingPeriod::last_day_of_month(date(2024, 2, 17)), date(2024, 2, 29));
        assert_eq!(ReportingPeriod::last_day_of_month(date(2023, 12, 5)), date(2023, 12, 31));
    }

    #[test]
    fn test_resolve_defaults() {
        let today = date(2024, 3, 14);
        assert_eq!(
            ReportingPeriod::resolve(None, None, today).unwrap(),
            (date(2024, 3, 1), date(2024, 3, 31))
        );
        assert_eq!(
            ReportingPeriod::resolve(None, Some(date(2024, 1, 31)), today).unwrap(),
            (date(2024, 1, 1), date(2024, 1, 31))
        );
        assert!(matches!(
            ReportingPeriod::resolve(Some(date(2024, 2, 1)), Some(date(2024, 1, 1)), today),
            Err(ReportError::InvalidPeriod)
        ));
    }

    #[test]
    fn test_title() {
        assert_eq!(
            ReportingPeriod::title(Some(date(2024, 3, 1)), None).as_deref(),
            Some("March, 2024 Report")
        );
        assert_eq!(
            ReportingPeriod::title(None, Some(date(2023, 11, 30))).as_deref(),
            Some("November, 2023 Report")
        );
        assert_eq!(ReportingPeriod::title(None, None), None);
    }

    #[test]
    fn test_months_until_today() {
        let months = ReportingPeriod::months(date(2023, 11, 15), date(2024, 12, 31), date(2024, 2, 10));
        assert_eq!(months.len(), 4);
        assert_eq!(months[0].from_date, date(2023, 11, 1));
        assert_eq!(months[0].state, ReportState::Pending);
        assert_eq!(months[3].from_date, date(2024, 2, 1));
        assert_eq!(months[3].to_date, date(2024, 2, 29));
        assert_eq!(months[3].state, ReportState::Todo);
    }

    #[test]
    fn test_months_stop_at_end_date() {
        let months = ReportingPeriod::months(date(2023, 1, 1), date(2023, 3, 10), date(2024, 6, 1));
        assert_eq!(months.len(), 3);
        assert!(months.iter().all(|m| m.state == ReportState::Pending));
    }

    #[test]
    fn test_months_empty_before_start() {
        assert!(ReportingPeriod::months(date(2025, 1, 1), date(2025, 12, 31), date(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_overlap() {
        let (start, end) = (date(2024, 1, 15), date(2024, 6, 15));
        assert!(ReportingPeriod::overlaps_project(date(2024, 1, 1), date(2024, 1, 31), start, end));
        assert!(ReportingPeriod::overlaps_project(date(2024, 6, 1), date(2024, 6, 30), start, end));
        assert!(!ReportingPeriod::overlaps_project(date(2024, 7, 1), date(2024, 7, 31), start, end));
        assert!(!ReportingPeriod::overlaps_project(date(2023, 12, 1), date(2023, 12, 31), start, end));
    }
}
