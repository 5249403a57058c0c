//! # Stockline Core
//!
//! Domain types, provider contract and request handlers for the stockline
//! quote service.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo chart endpoint) |
//! | [`data_source`] | Market data source trait and request/response types |
//! | [`domain`] | Domain models (Symbol, Period, QuoteRow, QuoteSummary) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`lookup`] | Symbol validation use case |
//! | [`quotes`] | Quote history use case |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockline_core::{fetch_quote, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = YahooAdapter::default();
//!     let report = fetch_quote(&adapter, "aapl", Some("3mo")).await?;
//!
//!     println!("{} closed at {:.2}", report.ticker, report.summary.current_price);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP handlers  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ quotes / lookup │────▶│ Domain Models    │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │────▶│ HTTP Client      │
//! │ Source (trait)  │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Each use case has its own error enum so callers branch on the kind, not
//! on message text:
//!
//! ```rust
//! use stockline_core::QuoteError;
//!
//! fn describe(error: &QuoteError) -> &'static str {
//!     match error {
//!         QuoteError::InvalidPeriod(_) => "fix the request",
//!         QuoteError::NotFound { .. } => "check the ticker",
//!         QuoteError::Provider(_) => "try again later",
//!     }
//! }
//! ```

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod lookup;
pub mod quotes;

pub use adapters::YahooAdapter;

pub use data_source::{
    DailyBar, HistoryRequest, MarketDataSource, PriceHistory, SourceError, SourceErrorKind,
    SymbolProfile,
};

pub use domain::{round2, Period, QuoteReport, QuoteRow, QuoteSummary, Symbol, SymbolMatch};

pub use error::ValidationError;

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
    DEFAULT_TIMEOUT_MS,
};

pub use lookup::{lookup_symbol, LookupError};
pub use quotes::{fetch_quote, QuoteError};
