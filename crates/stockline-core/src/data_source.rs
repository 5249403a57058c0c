//! Market data source contract and request/response types.
//!
//! This module defines the adapter contract (`MarketDataSource`) the quote
//! handlers are written against, along with the request and response types
//! for each upstream operation.
//!
//! # Operations
//!
//! | Operation | Request | Response | Description |
//! |-----------|---------|----------|-------------|
//! | History | [`HistoryRequest`] | [`PriceHistory`] | Daily OHLCV rows for a lookback period |
//! | Profile | [`Symbol`] | [`SymbolProfile`] | Display name and currency metadata |
//!
//! # Example
//!
//! ```rust,ignore
//! use stockline_core::{HistoryRequest, MarketDataSource, Period, SourceError, Symbol, YahooAdapter};
//!
//! async fn print_closes(adapter: &YahooAdapter, symbol: Symbol) -> Result<(), SourceError> {
//!     let request = HistoryRequest::new(symbol, Period::OneMonth);
//!     let history = adapter.history(request).await?;
//!
//!     for bar in &history.bars {
//!         println!("{}: {:.2}", bar.date, bar.close);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::{Period, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The provider does not know the symbol or has no rows for it.
    NotFound,
    Unavailable,
    RateLimited,
    Internal,
}

/// Structured source error returned by adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, SourceErrorKind::NotFound)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the history operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: Period,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, period: Period) -> Self {
        Self { symbol, period }
    }
}

/// One trading day as reported by the provider, before any rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    /// Exchange-local calendar date.
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Daily bars in ascending date order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub bars: Vec<DailyBar>,
}

impl PriceHistory {
    pub fn new(symbol: Symbol, bars: Vec<DailyBar>) -> Self {
        Self { symbol, bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Descriptive metadata for a symbol. Every field is optional because
/// providers omit what they do not know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolProfile {
    pub symbol: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub currency: Option<String>,
}

impl SymbolProfile {
    /// Long name first, then short name.
    pub fn display_name(&self) -> Option<&str> {
        let non_blank = |name: &&str| !name.trim().is_empty();
        self.long_name
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.short_name.as_deref().filter(non_blank))
    }

    /// True when the provider identified the symbol at all.
    pub fn is_identified(&self) -> bool {
        self.symbol
            .as_deref()
            .is_some_and(|symbol| !symbol.trim().is_empty())
            || self.display_name().is_some()
    }
}

/// Market data adapter contract.
///
/// Both operations are read-only and keyed by symbol. Implementations must be
/// `Send + Sync` as one instance is shared by every request handler.
pub trait MarketDataSource: Send + Sync {
    /// Fetches daily OHLCV bars covering `req.period`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] with kind [`SourceErrorKind::NotFound`] when
    /// the provider does not know the symbol, and another kind when the
    /// provider is unreachable or answers with something undecodable.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>>;

    /// Fetches descriptive metadata for `symbol`.
    ///
    /// # Errors
    ///
    /// Same classification as [`history`](MarketDataSource::history).
    fn profile<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<SymbolProfile, SourceError>> + Send + 'a>>;
}
