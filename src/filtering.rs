use crate::dataset::timestamp::TIMESTAMP_COLUMN;
use crate::error::SolarCompareError;
use chrono::{DateTime, NaiveDate};
use polars::prelude::{
    col, lit, ChunkAgg, DataFrame, DataType, IntoLazy, LazyFrame, PolarsResult, TimeUnit,
};

/// An inclusive calendar date window. `start` never lies after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// # Errors
    ///
    /// Returns [`SolarCompareError::InvalidDateRange`] when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SolarCompareError> {
        if start > end {
            return Err(SolarCompareError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub trait TimestampFilterExt {
    /// Keeps rows whose `Timestamp` falls on a date inside `window` (both ends inclusive).
    /// Assumes `Timestamp` is a datetime column, as produced by the loader.
    ///
    /// # Returns
    /// A new `LazyFrame` with the filter applied. Type errors surface on `collect`.
    fn filter_dates(self, window: DateWindow) -> LazyFrame;
}

impl TimestampFilterExt for LazyFrame {
    fn filter_dates(self, window: DateWindow) -> LazyFrame {
        self.filter(
            col(TIMESTAMP_COLUMN)
                .cast(DataType::Date)
                .gt_eq(lit(window.start))
                .and(
                    col(TIMESTAMP_COLUMN)
                        .cast(DataType::Date)
                        .lt_eq(lit(window.end)),
                ),
        )
    }
}

/// Eager variant of [`TimestampFilterExt::filter_dates`].
pub fn filter_by_dates(frame: &DataFrame, window: DateWindow) -> PolarsResult<DataFrame> {
    frame.clone().lazy().filter_dates(window).collect()
}

/// Earliest and latest calendar dates in the `Timestamp` column, for initialising
/// a date picker. `None` when the column is absent or holds no timestamps.
pub fn timestamp_bounds(frame: &DataFrame) -> PolarsResult<Option<DateWindow>> {
    let Ok(column) = frame.column(TIMESTAMP_COLUMN) else {
        return Ok(None);
    };
    if !matches!(column.dtype(), DataType::Datetime(_, _)) {
        return Ok(None);
    }
    let millis = column
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;
    let millis = millis.i64()?;

    let to_date = |ms: i64| DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive());
    let (Some(first), Some(last)) = (
        millis.min().and_then(to_date),
        millis.max().and_then(to_date),
    ) else {
        return Ok(None);
    };
    Ok(Some(DateWindow {
        start: first,
        end: last,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::timestamp::parse_timestamp_column;
    use polars::prelude::*;
    use std::error::Error;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn frame() -> PolarsResult<DataFrame> {
        let mut frame = df!(
            TIMESTAMP_COLUMN => [
                "2022-01-01 06:00",
                "2022-01-02 00:00",
                "2022-01-02 23:59",
                "2022-01-03 12:00",
                "garbage",
            ],
            "GHI" => [1.0, 2.0, 3.0, 4.0, 5.0],
        )?;
        parse_timestamp_column(&mut frame)?;
        Ok(frame)
    }

    #[test]
    fn rejects_reversed_window() {
        let result = DateWindow::new(date(2022, 2, 1), date(2022, 1, 1));
        assert!(matches!(
            result,
            Err(SolarCompareError::InvalidDateRange { start, end })
                if start == date(2022, 2, 1) && end == date(2022, 1, 1)
        ));
        assert!(DateWindow::new(date(2022, 1, 1), date(2022, 1, 1)).is_ok());
    }

    #[test]
    fn keeps_whole_days_at_both_ends() -> Result<(), Box<dyn Error>> {
        let window = DateWindow::new(date(2022, 1, 2), date(2022, 1, 2))?;
        let filtered = filter_by_dates(&frame()?, window)?;

        let ghi: Vec<f64> = filtered.column("GHI")?.f64()?.into_no_null_iter().collect();
        assert_eq!(ghi, vec![2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn wide_window_drops_only_unparsed_rows() -> Result<(), Box<dyn Error>> {
        let window = DateWindow::new(date(2021, 1, 1), date(2023, 1, 1))?;
        let filtered = filter_by_dates(&frame()?, window)?;
        assert_eq!(filtered.height(), 4);
        Ok(())
    }

    #[test]
    fn bounds_span_first_and_last_dates() -> Result<(), Box<dyn Error>> {
        let bounds = timestamp_bounds(&frame()?)?;
        assert_eq!(
            bounds,
            Some(DateWindow::new(date(2022, 1, 1), date(2022, 1, 3))?)
        );
        assert_eq!(timestamp_bounds(&df!("GHI" => [1.0])?)?, None);
        Ok(())
    }
}
