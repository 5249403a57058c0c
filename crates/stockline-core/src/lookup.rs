//! Symbol validation use case behind `GET /api/search/{query}`.

use thiserror::Error;

use crate::data_source::{MarketDataSource, SourceError};
use crate::{Symbol, SymbolMatch};

/// Why a lookup did not produce a match.
///
/// Every variant is reported to clients as 404 with `valid: false`; the
/// variants exist so callers and logs can tell an unknown ticker apart from
/// an unreachable provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Ticker not found")]
    NotFound { ticker: String },

    #[error("{}", .0.message())]
    Provider(SourceError),
}

impl LookupError {
    pub const fn status_code(&self) -> u16 {
        404
    }

    pub const fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

/// Check whether the provider has metadata for `query`.
pub async fn lookup_symbol<S>(source: &S, query: &str) -> Result<SymbolMatch, LookupError>
where
    S: MarketDataSource + ?Sized,
{
    let Ok(symbol) = Symbol::parse(query) else {
        return Err(LookupError::NotFound {
            ticker: query.trim().to_ascii_uppercase(),
        });
    };

    match source.profile(symbol.clone()).await {
        Ok(profile) if profile.is_identified() => {
            let name = profile
                .display_name()
                .map_or_else(|| symbol.to_string(), str::to_owned);
            Ok(SymbolMatch::new(symbol, name))
        }
        Ok(_) => Err(LookupError::NotFound {
            ticker: symbol.into(),
        }),
        Err(error) if error.is_not_found() => Err(LookupError::NotFound {
            ticker: symbol.into(),
        }),
        Err(error) => Err(LookupError::Provider(error)),
    }
}
