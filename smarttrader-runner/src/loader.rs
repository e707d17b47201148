//! CSV loading: a file of daily bars (plus any precomputed indicator
//! columns) into a [`BarSeries`].
//!
//! Headers are matched case-insensitively against known aliases. Columns
//! that match nothing are ignored. Indicator columns are optional here;
//! the scanner and scorer decide whether what was loaded is enough.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

use smarttrader_core::domain::{BarSeries, SeriesError};
use smarttrader_core::schema::Field;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("no date column in '{path}' (expected 'date' or 'timestamp')")]
    MissingDate { path: String },

    #[error("column '{column}' in '{path}' appears more than once")]
    DuplicateColumn { path: String, column: String },

    #[error("column '{column}': {reason}")]
    Column { column: String, reason: String },

    #[error("row {row}: cannot parse date '{value}'")]
    BadDate { row: usize, value: String },

    #[error("row {row}: date is empty")]
    EmptyDate { row: usize },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Map a CSV header onto an engine field.
pub fn field_for_header(header: &str) -> Option<Field> {
    let field = match header.trim().to_ascii_lowercase().as_str() {
        "date" | "timestamp" => Field::Timestamp,
        "open" => Field::Open,
        "high" => Field::High,
        "low" => Field::Low,
        "close" => Field::Close,
        "volume" => Field::Volume,
        "sma" => Field::Sma,
        "ema" => Field::Ema,
        "rsi" => Field::Rsi,
        "macd" => Field::Macd,
        "macd_signal" => Field::MacdSignal,
        "bb_high" | "bb_upper" => Field::BbUpper,
        "bb_low" | "bb_lower" => Field::BbLower,
        _ => return None,
    };
    Some(field)
}

/// Parse a date cell. Accepts `YYYY-MM-DD` and datetimes whose date part
/// comes first (`2024-01-02 00:00:00`, `2024-01-02T00:00:00`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    // timezone suffixes and fractional seconds: keep the date part only
    value
        .get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Load a CSV file into a series named `symbol`.
pub fn load_csv(path: &Path, symbol: &str) -> Result<BarSeries, LoadError> {
    let read_err = |e: PolarsError| LoadError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    // every column as text; numeric conversion happens per column below so
    // that empty cells become NaN rather than failing inference
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(read_err)?
        .finish()
        .map_err(read_err)?;

    frame_to_series(&df, symbol, path)
}

fn frame_to_series(df: &DataFrame, symbol: &str, path: &Path) -> Result<BarSeries, LoadError> {
    let mut date_column: Option<&Column> = None;
    let mut numeric: Vec<(Field, &Column)> = Vec::new();

    for column in df.get_columns() {
        let Some(field) = field_for_header(column.name().as_str()) else {
            tracing::debug!(column = column.name().as_str(), "ignoring unknown column");
            continue;
        };
        let duplicate = match field {
            Field::Timestamp => date_column.replace(column).is_some(),
            _ => {
                let seen = numeric.iter().any(|(f, _)| *f == field);
                numeric.push((field, column));
                seen
            }
        };
        if duplicate {
            return Err(LoadError::DuplicateColumn {
                path: path.display().to_string(),
                column: field.name().to_string(),
            });
        }
    }

    let date_column = date_column.ok_or_else(|| LoadError::MissingDate {
        path: path.display().to_string(),
    })?;
    let dates = parse_dates(date_column)?;

    let mut series = BarSeries::new(symbol, dates)?;
    for (field, column) in numeric {
        series.insert(field, to_f64(column)?)?;
    }

    let insane = (0..series.len())
        .filter_map(|i| series.bar(i))
        .filter(|bar| !bar.is_void() && !bar.is_sane())
        .count();
    if insane > 0 {
        tracing::warn!(
            symbol,
            path = %path.display(),
            insane,
            "bars violate OHLC ordering; kept as loaded"
        );
    }
    tracing::debug!(symbol, rows = series.len(), fields = ?series.fields(), "loaded series");

    Ok(series)
}

fn parse_dates(column: &Column) -> Result<Vec<NaiveDate>, LoadError> {
    let text = column.str().map_err(|e| LoadError::Column {
        column: column.name().to_string(),
        reason: e.to_string(),
    })?;
    text.into_iter()
        .enumerate()
        .map(|(row, value)| {
            let value = value.ok_or(LoadError::EmptyDate { row })?;
            parse_date(value).ok_or_else(|| LoadError::BadDate {
                row,
                value: value.to_string(),
            })
        })
        .collect()
}

/// Convert a text column to floats. Empty cells become NaN; any other
/// unparsable cell is an error.
fn to_f64(column: &Column) -> Result<Vec<f64>, LoadError> {
    let column_err = |e: PolarsError| LoadError::Column {
        column: column.name().to_string(),
        reason: e.to_string(),
    };
    let floats = column
        .as_materialized_series()
        .strict_cast(&DataType::Float64)
        .map_err(column_err)?;
    let values = floats.f64().map_err(column_err)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn header_aliases() {
        assert_eq!(field_for_header("Date"), Some(Field::Timestamp));
        assert_eq!(field_for_header("timestamp"), Some(Field::Timestamp));
        assert_eq!(field_for_header(" CLOSE "), Some(Field::Close));
        assert_eq!(field_for_header("MACD_signal"), Some(Field::MacdSignal));
        assert_eq!(field_for_header("BB_High"), Some(Field::BbUpper));
        assert_eq!(field_for_header("bb_lower"), Some(Field::BbLower));
        assert_eq!(field_for_header("Adj Close"), None);
    }

    #[test]
    fn date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(parse_date("2024-01-02"), Some(d));
        assert_eq!(parse_date("2024-01-02 00:00:00"), Some(d));
        assert_eq!(parse_date("2024-01-02T16:00:00"), Some(d));
        assert_eq!(parse_date("2024-01-02 00:00:00-05:00"), Some(d));
        assert_eq!(parse_date("01/02/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn loads_prices_and_indicators() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume,RSI,Adj Close\n\
             2024-01-02,10,11,9,10.5,1000,45.5,10.4\n\
             2024-01-03,10.5,12,10,11.5,1200,,11.4\n",
        );
        let series = load_csv(file.path(), "ACME").unwrap();
        assert_eq!(series.symbol(), "ACME");
        assert_eq!(series.len(), 2);
        assert_eq!(series.column(Field::Close), Some(&[10.5, 11.5][..]));
        let rsi = series.column(Field::Rsi).unwrap();
        assert_eq!(rsi[0], 45.5);
        assert!(rsi[1].is_nan());
        assert!(!series.has(Field::Sma));
    }

    #[test]
    fn missing_date_column_is_an_error() {
        let file = write_csv("Open,High,Low,Close\n1,2,0.5,1.5\n");
        assert!(matches!(
            load_csv(file.path(), "X"),
            Err(LoadError::MissingDate { .. })
        ));
    }

    #[test]
    fn unsorted_dates_are_rejected() {
        let file = write_csv("date,close\n2024-01-03,1\n2024-01-02,2\n");
        assert!(matches!(
            load_csv(file.path(), "X"),
            Err(LoadError::Series(SeriesError::NotAscending { .. }))
        ));
    }

    #[test]
    fn garbage_number_is_a_column_error() {
        let file = write_csv("date,close\n2024-01-02,abc\n");
        assert!(matches!(
            load_csv(file.path(), "X"),
            Err(LoadError::Column { .. })
        ));
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let file = write_csv("date,bb_high,bb_upper\n2024-01-02,1,2\n");
        assert!(matches!(
            load_csv(file.path(), "X"),
            Err(LoadError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn insane_bars_are_kept() {
        let file = write_csv("date,open,high,low,close\n2024-01-02,10,9,11,10\n");
        let series = load_csv(file.path(), "X").unwrap();
        assert_eq!(series.len(), 1);
        assert!(!series.bar(0).unwrap().is_sane());
    }
}
