//! Проверка общей оси дней: все строки страницы должны иметь одинаковый ряд дат.

use chrono::NaiveDate;
use thiserror::Error;

use super::dto::ReportRow;

/// Расхождение ряда дат строки с рядом первой строки
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DayAxisError {
    #[error("row {row}: expected {expected} days, got {actual}")]
    LengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}: day {position} is {actual}, expected {expected}")]
    DateMismatch {
        row: usize,
        position: usize,
        expected: NaiveDate,
        actual: NaiveDate,
    },
}

impl DayAxisError {
    /// Индекс строки (0-based) на странице
    pub fn row(&self) -> usize {
        match self {
            DayAxisError::LengthMismatch { row, .. } => *row,
            DayAxisError::DateMismatch { row, .. } => *row,
        }
    }
}

/// Сравнивает ряд дат каждой строки с рядом первой строки.
/// Возвращает первое найденное расхождение.
pub fn validate_day_axis(rows: &[ReportRow]) -> Result<(), DayAxisError> {
    let Some((first, rest)) = rows.split_first() else {
        return Ok(());
    };

    for (offset, row) in rest.iter().enumerate() {
        let index = offset + 1;
        if row.days.len() != first.days.len() {
            return Err(DayAxisError::LengthMismatch {
                row: index,
                expected: first.days.len(),
                actual: row.days.len(),
            });
        }

        let mismatch = first
            .dates()
            .zip(row.dates())
            .enumerate()
            .find(|(_, (expected, actual))| expected != actual);

        if let Some((position, (expected, actual))) = mismatch {
            return Err(DayAxisError::DateMismatch {
                row: index,
                position,
                expected,
                actual,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d402_operation_report::dto::DayMetric;

    fn row_with_days(dates: &[&str]) -> ReportRow {
        ReportRow {
            days: dates
                .iter()
                .map(|d| DayMetric {
                    date: NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_and_single_row_are_valid() {
        assert_eq!(validate_day_axis(&[]), Ok(()));
        assert_eq!(validate_day_axis(&[row_with_days(&["2024-05-01"])]), Ok(()));
    }

    #[test]
    fn test_aligned_rows_are_valid() {
        let rows = vec![
            row_with_days(&["2024-05-01", "2024-05-02"]),
            row_with_days(&["2024-05-01", "2024-05-02"]),
        ];
        assert_eq!(validate_day_axis(&rows), Ok(()));
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let rows = vec![
            row_with_days(&["2024-05-01", "2024-05-02"]),
            row_with_days(&["2024-05-01", "2024-05-02"]),
            row_with_days(&["2024-05-01"]),
        ];
        let err = validate_day_axis(&rows).unwrap_err();
        assert_eq!(
            err,
            DayAxisError::LengthMismatch {
                row: 2,
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(err.row(), 2);
    }

    #[test]
    fn test_date_mismatch_is_reported() {
        let rows = vec![
            row_with_days(&["2024-05-01", "2024-05-02"]),
            row_with_days(&["2024-05-01", "2024-05-03"]),
        ];
        let err = validate_day_axis(&rows).unwrap_err();
        assert!(matches!(
            err,
            DayAxisError::DateMismatch {
                row: 1,
                position: 1,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "row 1: day 1 is 2024-05-03, expected 2024-05-02"
        );
    }
}
