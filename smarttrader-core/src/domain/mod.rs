//! Domain types for SmartTrader

pub mod bar;
pub mod series;
pub mod signal;

pub use bar::Bar;
pub use series::{BarSeries, CleanSeries, SeriesError};
pub use signal::{Action, FusedSignal, PatternOccurrence, SignalRecord};
