//! Parsing of the textual `Timestamp` column into a polars `Datetime` column.

use polars::prelude::*;

pub const TIMESTAMP_COLUMN: &str = "Timestamp";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

fn lenient(format: &str) -> StrptimeOptions {
    StrptimeOptions {
        format: Some(format.into()),
        strict: false,
        ..Default::default()
    }
}

/// One candidate expression per accepted layout; the first that parses a cell wins.
fn timestamp_expr() -> Expr {
    let text = col(TIMESTAMP_COLUMN).str().strip_chars(lit(NULL));
    let mut candidates: Vec<Expr> = DATETIME_FORMATS
        .iter()
        .map(|format| {
            text.clone().str().to_datetime(
                Some(TimeUnit::Milliseconds),
                None,
                lenient(format),
                lit("raise"),
            )
        })
        .collect();
    candidates.push(
        text.str()
            .to_date(lenient(DATE_FORMAT))
            .cast(DataType::Datetime(TimeUnit::Milliseconds, None)),
    );
    coalesce(&candidates).alias(TIMESTAMP_COLUMN)
}

/// Replaces a textual `Timestamp` column with a millisecond `Datetime` column.
///
/// Frames without the column, or where it is already temporal, are left as is.
/// Cells that match none of the known layouts become null.
pub(crate) fn parse_timestamp_column(df: &mut DataFrame) -> PolarsResult<()> {
    match df.column(TIMESTAMP_COLUMN) {
        Ok(column) if column.dtype() == &DataType::String => {}
        _ => return Ok(()),
    }
    *df = df.clone().lazy().with_column(timestamp_expr()).collect()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn millis(y: i32, m: u32, d: u32, h: u32, min: u32) -> Option<i64> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .map(|dt| dt.and_utc().timestamp_millis())
    }

    fn parsed(cells: &[&str]) -> PolarsResult<Vec<Option<i64>>> {
        let mut df = df!(TIMESTAMP_COLUMN => cells)?;
        parse_timestamp_column(&mut df)?;
        let column = df.column(TIMESTAMP_COLUMN)?;
        assert_eq!(
            column.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        Ok(column.datetime()?.physical().into_iter().collect())
    }

    #[test]
    fn parses_supported_layouts() -> PolarsResult<()> {
        let values = parsed(&[
            "2021-08-09 00:01",
            "2021-08-09 00:01:00",
            "2021-08-09T00:01",
            " 2021-08-09T00:01:00 ",
            "2021-08-09",
            "yesterday",
        ])?;
        let expected = millis(2021, 8, 9, 0, 1);
        assert_eq!(values[..4], [expected; 4]);
        assert_eq!(values[4], millis(2021, 8, 9, 0, 0));
        assert_eq!(values[5], None);
        Ok(())
    }

    #[test]
    fn replaces_text_column_with_datetime() -> PolarsResult<()> {
        let mut df = df!(
            TIMESTAMP_COLUMN => ["2021-08-09 00:01", "not a date"],
            "GHI" => [1.0, 2.0],
        )?;
        parse_timestamp_column(&mut df)?;

        let column = df.column(TIMESTAMP_COLUMN)?;
        assert_eq!(
            column.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(column.null_count(), 1);
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("GHI")?.f64()?.get(1), Some(2.0));
        Ok(())
    }

    #[test]
    fn frames_without_timestamp_are_untouched() -> PolarsResult<()> {
        let mut df = df!("GHI" => [1.0, 2.0])?;
        parse_timestamp_column(&mut df)?;
        assert_eq!(df.width(), 1);
        assert_eq!(df.column("GHI")?.dtype(), &DataType::Float64);
        Ok(())
    }
}
