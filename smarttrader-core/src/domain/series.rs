//! Bar series — dates plus positionally aligned numeric columns.
//!
//! Price columns come from the market-data collaborator; indicator columns are
//! attached by the indicator collaborator. Undefined values are `f64::NAN` and
//! are never silently dropped here. Each engine stage asks for a cleaned view
//! over the fields it needs (see [`BarSeries::clean`]); cleaning compacts the
//! rows, so positions shift while dates remain the stable join key.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

use super::bar::Bar;
use crate::schema::{validate_fields, Field, SchemaError};

/// Structural problems found while assembling a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("timestamps must be strictly increasing: {previous} followed by {current} at row {index}")]
    NotAscending {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("column '{field}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        field: Field,
        expected: usize,
        actual: usize,
    },

    #[error("timestamps are carried by the date index, not a numeric column")]
    TimestampColumn,
}

/// An ordered, gap-free OHLCV series with attached indicator columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    columns: BTreeMap<Field, Vec<f64>>,
}

impl BarSeries {
    /// Create an empty-column series over `dates`.
    ///
    /// Dates must be strictly increasing (which also rules out duplicates).
    pub fn new(symbol: impl Into<String>, dates: Vec<NaiveDate>) -> Result<Self, SeriesError> {
        for (index, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SeriesError::NotAscending {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            dates,
            columns: BTreeMap::new(),
        })
    }

    /// Build a series from bars, attaching open/high/low/close/volume columns.
    pub fn from_bars(symbol: impl Into<String>, bars: &[Bar]) -> Result<Self, SeriesError> {
        let mut series = Self::new(symbol, bars.iter().map(|b| b.date).collect())?;
        series.insert(Field::Open, bars.iter().map(|b| b.open).collect())?;
        series.insert(Field::High, bars.iter().map(|b| b.high).collect())?;
        series.insert(Field::Low, bars.iter().map(|b| b.low).collect())?;
        series.insert(Field::Close, bars.iter().map(|b| b.close).collect())?;
        series.insert(Field::Volume, bars.iter().map(|b| b.volume).collect())?;
        Ok(series)
    }

    /// Attach (or replace) a numeric column.
    pub fn insert(&mut self, field: Field, values: Vec<f64>) -> Result<(), SeriesError> {
        if field == Field::Timestamp {
            return Err(SeriesError::TimestampColumn);
        }
        if values.len() != self.dates.len() {
            return Err(SeriesError::LengthMismatch {
                field,
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(field, values);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_column(mut self, field: Field, values: Vec<f64>) -> Result<Self, SeriesError> {
        self.insert(field, values)?;
        Ok(self)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Full column for a field, if attached.
    pub fn column(&self, field: Field) -> Option<&[f64]> {
        self.columns.get(&field).map(|v| v.as_slice())
    }

    /// Fields present on this series. The timestamp is always present.
    pub fn fields(&self) -> Vec<Field> {
        std::iter::once(Field::Timestamp)
            .chain(self.columns.keys().copied())
            .collect()
    }

    pub fn has(&self, field: Field) -> bool {
        field == Field::Timestamp || self.columns.contains_key(&field)
    }

    /// Fail with [`SchemaError`] unless every field in `required` is attached.
    pub fn require(&self, required: &[Field]) -> Result<(), SchemaError> {
        validate_fields(&self.fields(), required)
    }

    /// The bar at a position. Missing price columns read as NaN.
    pub fn bar(&self, index: usize) -> Option<Bar> {
        let date = *self.dates.get(index)?;
        let value = |field| {
            self.column(field)
                .and_then(|c| c.get(index).copied())
                .unwrap_or(f64::NAN)
        };
        Some(Bar {
            date,
            open: value(Field::Open),
            high: value(Field::High),
            low: value(Field::Low),
            close: value(Field::Close),
            volume: value(Field::Volume),
        })
    }

    /// Compact the series down to rows where every field in `required` is
    /// defined (finite).
    ///
    /// Fails with [`SchemaError`] if a required column is absent altogether.
    /// The cleaned view carries only the required columns.
    pub fn clean(&self, required: &[Field]) -> Result<CleanSeries, SchemaError> {
        self.require(required)?;

        let numeric: Vec<(Field, &[f64])> = required
            .iter()
            .filter(|f| **f != Field::Timestamp)
            .filter_map(|f| self.column(*f).map(|c| (*f, c)))
            .collect();

        let kept: Vec<usize> = (0..self.len())
            .filter(|&i| numeric.iter().all(|(_, col)| col[i].is_finite()))
            .collect();

        let columns = numeric
            .iter()
            .map(|(field, col)| (*field, kept.iter().map(|&i| col[i]).collect()))
            .collect();

        Ok(CleanSeries {
            dates: kept.iter().map(|&i| self.dates[i]).collect(),
            original_index: kept,
            columns,
        })
    }
}

/// A compacted view of a [`BarSeries`] restricted to rows where a chosen set
/// of fields is fully defined.
///
/// Positions are renumbered `0..len`; the original position and the date of
/// every row are kept so results can be joined back by date.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSeries {
    dates: Vec<NaiveDate>,
    original_index: Vec<usize>,
    columns: BTreeMap<Field, Vec<f64>>,
}

impl CleanSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Position of a cleaned row in the source series.
    pub fn original_index(&self, index: usize) -> Option<usize> {
        self.original_index.get(index).copied()
    }

    /// Column for a field. Empty when the field was not part of the
    /// cleaning set.
    pub fn column(&self, field: Field) -> &[f64] {
        self.columns.get(&field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Materialise the cleaned rows as bars. Price fields outside the
    /// cleaning set read as NaN.
    pub fn to_bars(&self) -> Vec<Bar> {
        let value = |field: Field, i: usize| self.column(field).get(i).copied().unwrap_or(f64::NAN);
        self.dates
            .iter()
            .enumerate()
            .map(|(i, &date)| Bar {
                date,
                open: value(Field::Open, i),
                high: value(Field::High, i),
                low: value(Field::Low, i),
                close: value(Field::Close, i),
                volume: value(Field::Volume, i),
            })
            .collect()
    }
}
