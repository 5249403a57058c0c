//! # Domain Models
//!
//! Canonical domain types for stockline quote responses.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercased ticker |
//! | [`Period`] | Lookback window (`1d` .. `max`) |
//! | [`QuoteRow`] | One rounded OHLCV row |
//! | [`QuoteSummary`] | Statistics over the close prices |
//! | [`QuoteReport`] | History endpoint payload |
//! | [`SymbolMatch`] | Lookup endpoint payload |
//!
//! ## Validation
//!
//! [`Symbol`] and [`Period`] enforce their invariants at construction time,
//! so a handler holding one never needs to re-check it:
//!
//! ```rust
//! use std::str::FromStr;
//! use stockline_core::{Period, Symbol, ValidationError};
//!
//! assert_eq!(Symbol::parse("aapl").unwrap().as_str(), "AAPL");
//! assert!(matches!(
//!     Period::from_str("2w"),
//!     Err(ValidationError::InvalidPeriod { .. })
//! ));
//! ```

mod models;
mod period;
mod symbol;

pub use models::{round2, QuoteReport, QuoteRow, QuoteSummary, SymbolMatch};
pub use period::Period;
pub use symbol::Symbol;
