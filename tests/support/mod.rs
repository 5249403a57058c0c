//! Scripted market data source shared by the behavior tests.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use stockline_core::{
    DailyBar, HistoryRequest, MarketDataSource, PriceHistory, SourceError, Symbol, SymbolProfile,
};
use time::{Date, Duration, Month};

/// Source that replays fixed answers and records every call it receives.
pub struct ScriptedSource {
    history: Result<Vec<DailyBar>, SourceError>,
    profile: Result<SymbolProfile, SourceError>,
    history_calls: Mutex<Vec<HistoryRequest>>,
    profile_calls: Mutex<Vec<Symbol>>,
}

impl ScriptedSource {
    pub fn with_bars(bars: Vec<DailyBar>) -> Self {
        Self {
            history: Ok(bars),
            profile: Ok(apple_profile()),
            history_calls: Mutex::new(Vec::new()),
            profile_calls: Mutex::new(Vec::new()),
        }
    }

    /// One bar per consecutive day starting 2024-01-02, open/high/low equal to close.
    pub fn with_closes(closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(offset, &close)| bar(offset as i64, close))
            .collect();
        Self::with_bars(bars)
    }

    pub fn failing_history(error: SourceError) -> Self {
        Self {
            history: Err(error),
            ..Self::with_bars(Vec::new())
        }
    }

    pub fn with_profile(mut self, profile: SymbolProfile) -> Self {
        self.profile = Ok(profile);
        self
    }

    pub fn failing_profile(mut self, error: SourceError) -> Self {
        self.profile = Err(error);
        self
    }

    pub fn history_calls(&self) -> Vec<HistoryRequest> {
        self.history_calls
            .lock()
            .expect("call log should not be poisoned")
            .clone()
    }

    pub fn profile_calls(&self) -> Vec<Symbol> {
        self.profile_calls
            .lock()
            .expect("call log should not be poisoned")
            .clone()
    }

    pub fn total_calls(&self) -> usize {
        self.history_calls().len() + self.profile_calls().len()
    }
}

impl MarketDataSource for ScriptedSource {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        self.history_calls
            .lock()
            .expect("call log should not be poisoned")
            .push(req.clone());
        let result = self
            .history
            .clone()
            .map(|bars| PriceHistory::new(req.symbol, bars));
        Box::pin(async move { result })
    }

    fn profile<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<SymbolProfile, SourceError>> + Send + 'a>> {
        self.profile_calls
            .lock()
            .expect("call log should not be poisoned")
            .push(symbol);
        let result = self.profile.clone();
        Box::pin(async move { result })
    }
}

pub fn apple_profile() -> SymbolProfile {
    SymbolProfile {
        symbol: Some(String::from("AAPL")),
        long_name: Some(String::from("Apple Inc.")),
        short_name: Some(String::from("Apple")),
        currency: Some(String::from("USD")),
    }
}

pub fn bar(days_after_start: i64, close: f64) -> DailyBar {
    let start = Date::from_calendar_date(2024, Month::January, 2).expect("valid date");
    DailyBar {
        date: start + Duration::days(days_after_start),
        open: close,
        high: close,
        low: close,
        close,
        volume: Some(1_000),
    }
}
