//! Quote history use case behind `GET /api/stock/{ticker}`.

use std::str::FromStr;

use thiserror::Error;

use crate::data_source::{HistoryRequest, MarketDataSource, SourceError};
use crate::{Period, QuoteReport, QuoteRow, QuoteSummary, Symbol, ValidationError};

const FALLBACK_CURRENCY: &str = "USD";

/// Failure of the quote history use case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error(transparent)]
    InvalidPeriod(ValidationError),

    #[error("No data found for ticker: {ticker}. Please check the symbol and try again.")]
    NotFound { ticker: String },

    #[error("An error occurred: {}", .0.message())]
    Provider(SourceError),
}

impl QuoteError {
    /// HTTP status the error is reported with.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPeriod(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Provider(_) => 500,
        }
    }

    fn not_found(ticker: impl Into<String>) -> Self {
        Self::NotFound {
            ticker: ticker.into(),
        }
    }

    fn from_source(ticker: &Symbol, error: SourceError) -> Self {
        if error.is_not_found() {
            Self::not_found(ticker.as_str())
        } else {
            Self::Provider(error)
        }
    }
}

/// Fetch daily history for `ticker` over `period` (default `1mo`) and
/// summarize it.
///
/// Only the period is rejected as a bad request. A ticker that cannot name
/// any listing is reported as not found without asking the provider.
pub async fn fetch_quote<S>(
    source: &S,
    ticker: &str,
    period: Option<&str>,
) -> Result<QuoteReport, QuoteError>
where
    S: MarketDataSource + ?Sized,
{
    let period = period
        .map(Period::from_str)
        .transpose()
        .map_err(QuoteError::InvalidPeriod)?
        .unwrap_or_default();
    let symbol = Symbol::parse(ticker)
        .map_err(|_| QuoteError::not_found(ticker.trim().to_ascii_uppercase()))?;

    let history = source
        .history(HistoryRequest::new(symbol.clone(), period))
        .await
        .map_err(|error| QuoteError::from_source(&symbol, error))?;
    if history.is_empty() {
        return Err(QuoteError::not_found(symbol.as_str()));
    }

    let profile = source
        .profile(symbol.clone())
        .await
        .map_err(|error| QuoteError::from_source(&symbol, error))?;

    let data = history.bars.iter().map(QuoteRow::from).collect::<Vec<_>>();
    let closes = data.iter().map(|row| row.close).collect::<Vec<_>>();
    let summary = QuoteSummary::from_closes(&closes)
        .ok_or_else(|| QuoteError::not_found(symbol.as_str()))?;

    let name = profile
        .display_name()
        .map_or_else(|| symbol.to_string(), str::to_owned);
    let currency = profile
        .currency
        .filter(|currency| !currency.trim().is_empty())
        .unwrap_or_else(|| String::from(FALLBACK_CURRENCY));

    Ok(QuoteReport {
        ticker: symbol,
        name,
        currency,
        period,
        data,
        summary,
    })
}
