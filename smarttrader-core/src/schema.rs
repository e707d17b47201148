//! Column schema contract — the boundary between the external data and
//! indicator collaborators and the engine.
//!
//! Every column a bar series may carry is named by a [`Field`]. Each engine
//! stage declares the set of fields it requires; a series missing any of them
//! is rejected with [`SchemaError`] before any work is done.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A column of a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Timestamp,
    Open,
    High,
    Low,
    Close,
    Volume,
    Sma,
    Ema,
    Rsi,
    Macd,
    MacdSignal,
    BbUpper,
    BbLower,
}

impl Field {
    /// Every field, in canonical column order.
    pub const ALL: [Field; 13] = [
        Field::Timestamp,
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
        Field::Sma,
        Field::Ema,
        Field::Rsi,
        Field::Macd,
        Field::MacdSignal,
        Field::BbUpper,
        Field::BbLower,
    ];

    /// Canonical column name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
            Field::Sma => "sma",
            Field::Ema => "ema",
            Field::Rsi => "rsi",
            Field::Macd => "macd",
            Field::MacdSignal => "macd_signal",
            Field::BbUpper => "bb_upper",
            Field::BbLower => "bb_lower",
        }
    }

    /// Whether the column is supplied by the indicator collaborator rather
    /// than the market-data provider.
    pub fn is_indicator(&self) -> bool {
        matches!(
            self,
            Field::Sma
                | Field::Ema
                | Field::Rsi
                | Field::Macd
                | Field::MacdSignal
                | Field::BbUpper
                | Field::BbLower
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields the pattern scanner reads.
pub const PATTERN_FIELDS: &[Field] = &[
    Field::Timestamp,
    Field::Open,
    Field::High,
    Field::Low,
    Field::Close,
];

/// Fields the signal scorer reads.
pub const SCORING_FIELDS: &[Field] = &[
    Field::Timestamp,
    Field::Close,
    Field::Volume,
    Field::Sma,
    Field::Rsi,
    Field::Macd,
    Field::MacdSignal,
];

/// A required column is absent. Fatal to the call that needed it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing required column(s): {}", field_list(.0))]
    MissingColumns(Vec<Field>),
}

impl SchemaError {
    /// The fields that were required but absent.
    pub fn missing(&self) -> &[Field] {
        match self {
            SchemaError::MissingColumns(fields) => fields,
        }
    }
}

fn field_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check a set of available fields against a required set.
///
/// Reports every missing field, in the order of `required`.
pub fn validate_fields(available: &[Field], required: &[Field]) -> Result<(), SchemaError> {
    let missing: Vec<Field> = required
        .iter()
        .filter(|f| !available.contains(f))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_set_passes() {
        let available = Field::ALL.to_vec();
        assert!(validate_fields(&available, PATTERN_FIELDS).is_ok());
        assert!(validate_fields(&available, SCORING_FIELDS).is_ok());
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let available = [Field::Timestamp, Field::Close, Field::Volume];
        let err = validate_fields(&available, SCORING_FIELDS).unwrap_err();
        assert_eq!(
            err.missing(),
            &[Field::Sma, Field::Rsi, Field::Macd, Field::MacdSignal]
        );
        let msg = err.to_string();
        assert!(msg.contains("sma"));
        assert!(msg.contains("macd_signal"));
    }

    #[test]
    fn pattern_fields_do_not_need_indicators() {
        assert!(PATTERN_FIELDS.iter().all(|f| !f.is_indicator()));
        assert!(SCORING_FIELDS.iter().any(|f| f.is_indicator()));
    }

    #[test]
    fn field_names_are_unique() {
        let mut names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Field::ALL.len());
    }
}
