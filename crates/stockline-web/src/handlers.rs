//! Route handlers. Each one is a thin shell over a `stockline_core` use case.

use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use stockline_core::{fetch_quote, lookup_symbol, QuoteError, QuoteReport, SymbolMatch};

use crate::error::{LookupFailure, QuoteFailure};
use crate::server::AppState;

/// Query string as ordered pairs, so a repeated key is not a decoding error.
type QueryPairs = Vec<(String, String)>;

/// First value given for `key`; later repeats are ignored.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// `GET /api/stock/{ticker}?period={period}`
///
/// Extractor rejections are taken as values so they still answer with the
/// JSON error body.
pub async fn stock_history(
    State(state): State<Arc<AppState>>,
    ticker: Result<Path<String>, PathRejection>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<QuoteReport>, QuoteFailure> {
    let Path(ticker) = ticker?;
    let Query(pairs) = query?;
    let period = first_value(&pairs, "period");

    match fetch_quote(state.source.as_ref(), &ticker, period).await {
        Ok(report) => {
            tracing::debug!(
                ticker = %report.ticker,
                period = %report.period,
                rows = report.data.len(),
                "quote history served"
            );
            Ok(Json(report))
        }
        Err(error) => {
            match &error {
                QuoteError::Provider(source) => {
                    tracing::warn!(ticker = %ticker, code = source.code(), error = %source, "quote provider failure");
                }
                other => tracing::debug!(ticker = %ticker, error = %other, "quote request rejected"),
            }
            Err(error.into())
        }
    }
}

/// `GET /api/search/{query}`
pub async fn search_symbol(
    State(state): State<Arc<AppState>>,
    query: Result<Path<String>, PathRejection>,
) -> Result<Json<SymbolMatch>, LookupFailure> {
    let Path(query) = query?;
    lookup_symbol(state.source.as_ref(), &query)
        .await
        .map(Json)
        .map_err(|error| {
            if error.is_provider_failure() {
                tracing::warn!(query = %query, error = %error, "symbol lookup provider failure");
            } else {
                tracing::debug!(query = %query, error = %error, "symbol not found");
            }
            error.into()
        })
}

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}
