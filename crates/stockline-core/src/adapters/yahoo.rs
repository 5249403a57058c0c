use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};

use crate::data_source::{
    DailyBar, HistoryRequest, MarketDataSource, PriceHistory, SourceError, SymbolProfile,
};
use crate::http_client::{
    HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS,
};
use crate::Symbol;

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
const YAHOO_REFERER: &str = "https://finance.yahoo.com/";

/// Yahoo Finance adapter backed by the public v8 chart endpoint.
///
/// Both operations read the same endpoint: `history` uses the requested
/// range, `profile` asks for a one day range and keeps only the `meta` block.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), HttpAuth::from_env())
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, auth: HttpAuth) -> Self {
        Self {
            http_client,
            auth,
            base_url: String::from(YAHOO_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    fn chart_url(&self, symbol: &Symbol, range: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            range
        )
    }

    async fn fetch_chart(&self, symbol: &Symbol, range: &str) -> Result<YahooChartResult, SourceError> {
        let request = HttpRequest::get(self.chart_url(symbol, range))
            .with_header("referer", YAHOO_REFERER)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        tracing::debug!(symbol = %symbol, range, "requesting yahoo chart");

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.timed_out() {
                SourceError::unavailable(format!("yahoo request timed out: {}", error.message()))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            }
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("yahoo rate limited the request"));
        }

        // Yahoo sends a JSON error object with 404s, so decode before checking status.
        let decoded = serde_json::from_str::<YahooChartResponse>(&response.body);
        if let Ok(YahooChartResponse {
            chart: YahooChartData {
                error: Some(error), ..
            },
        }) = &decoded
        {
            return Err(classify_chart_error(symbol, error));
        }

        if response.status == 404 {
            return Err(not_found(symbol));
        }

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let chart = decoded.map_err(|e| {
            SourceError::internal(format!("failed to decode yahoo chart response: {e}"))
        })?;

        chart
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| not_found(symbol))
    }
}

impl MarketDataSource for YahooAdapter {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.fetch_chart(&req.symbol, req.period.as_str()).await?;
            let bars = daily_bars(&result)?;
            Ok(PriceHistory::new(req.symbol, bars))
        })
    }

    fn profile<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<SymbolProfile, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let result = self.fetch_chart(&symbol, "1d").await?;
            let meta = result.meta;
            Ok(SymbolProfile {
                symbol: meta.symbol,
                long_name: meta.long_name,
                short_name: meta.short_name,
                currency: meta.currency,
            })
        })
    }
}

/// Convert parallel chart arrays into bars dated in the exchange time zone.
///
/// Days missing any of open/high/low/close are skipped. When Yahoo appends a
/// live bar for a day it already reported, the later bar wins.
fn daily_bars(result: &YahooChartResult) -> Result<Vec<DailyBar>, SourceError> {
    let Some(timestamps) = result.timestamp.as_deref() else {
        return Ok(Vec::new());
    };
    let Some(quote) = result
        .indicators
        .as_ref()
        .and_then(|indicators| indicators.quote.first())
    else {
        return Ok(Vec::new());
    };

    let offset = i32::try_from(result.meta.gmtoffset)
        .ok()
        .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
        .unwrap_or(UtcOffset::UTC);

    let mut bars: Vec<DailyBar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) else {
            continue;
        };

        let date = OffsetDateTime::from_unix_timestamp(ts)
            .map_err(|e| SourceError::internal(format!("invalid yahoo timestamp {ts}: {e}")))?
            .to_offset(offset)
            .date();
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite())
            .map(|v| v.max(0.0) as u64);

        let bar = DailyBar {
            date,
            open: *open,
            high: *high,
            low: *low,
            close: *close,
            volume,
        };

        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => bars.push(bar),
        }
    }

    Ok(bars)
}

fn classify_chart_error(symbol: &Symbol, error: &YahooChartError) -> SourceError {
    if error.code.eq_ignore_ascii_case("not found") {
        return not_found(symbol);
    }

    match &error.description {
        Some(description) => SourceError::unavailable(format!(
            "yahoo chart API error: {}: {description}",
            error.code
        )),
        None => SourceError::unavailable(format!("yahoo chart API error: {}", error.code)),
    }
}

fn not_found(symbol: &Symbol) -> SourceError {
    SourceError::not_found(format!("yahoo has no chart data for {symbol}"))
}

// Yahoo Finance chart response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<YahooChartIndicators>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(rename = "longName", default)]
    long_name: Option<String>,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::Period;
    use std::sync::Mutex;
    use time::{Date, Month};

    const AAPL_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "longName": "Apple Inc.",
                    "shortName": "Apple Inc.",
                    "gmtoffset": -18000
                },
                "timestamp": [1704810600, 1704897000, 1704983400],
                "indicators": {
                    "quote": [{
                        "open": [184.35, 184.9, null],
                        "high": [185.15, 186.4, 187.05],
                        "low": [182.73, 183.92, 183.62],
                        "close": [185.14, 186.19, 185.59],
                        "volume": [42841800, 46792900, 49128400]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    const NOT_FOUND_CHART: &str = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    #[derive(Debug)]
    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn responding(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn adapter_for(client: Arc<RecordingHttpClient>) -> YahooAdapter {
        YahooAdapter::with_http_client(client, HttpAuth::None)
            .with_base_url("https://yahoo.test/")
            .with_timeout_ms(2_500)
    }

    fn history_request(symbol: &str, period: Period) -> HistoryRequest {
        HistoryRequest::new(Symbol::parse(symbol).expect("valid symbol"), period)
    }

    #[tokio::test]
    async fn history_requests_daily_chart_for_period() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(AAPL_CHART)));
        let adapter = adapter_for(client.clone());

        adapter
            .history(history_request("aapl", Period::ThreeMonths))
            .await
            .expect("history should succeed");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://yahoo.test/v8/finance/chart/AAPL?range=3mo&interval=1d"
        );
        assert_eq!(requests[0].timeout_ms, 2_500);
        assert_eq!(
            requests[0].headers.get("referer").map(String::as_str),
            Some(YAHOO_REFERER)
        );
    }

    #[tokio::test]
    async fn history_skips_incomplete_rows_and_uses_exchange_dates() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(AAPL_CHART)));
        let adapter = adapter_for(client);

        let history = adapter
            .history(history_request("AAPL", Period::OneMonth))
            .await
            .expect("history should succeed");

        assert_eq!(history.symbol.as_str(), "AAPL");
        assert_eq!(history.bars.len(), 2);
        assert_eq!(
            history.bars[0].date,
            Date::from_calendar_date(2024, Month::January, 9).expect("date")
        );
        assert_eq!(history.bars[0].close, 185.14);
        assert_eq!(history.bars[1].volume, Some(46_792_900));
    }

    #[tokio::test]
    async fn history_keeps_latest_bar_for_repeated_day() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
            "timestamp":[1704844800, 1704870000],
            "indicators":{"quote":[{"open":[1.0,1.5],"high":[2.0,2.5],"low":[0.5,1.0],"close":[1.5,2.0],"volume":[10,20]}]}}],"error":null}}"#;
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(body)));
        let adapter = adapter_for(client);

        let history = adapter
            .history(history_request("MSFT", Period::FiveDays))
            .await
            .expect("history should succeed");

        assert_eq!(history.bars.len(), 1);
        assert_eq!(history.bars[0].close, 2.0);
    }

    #[tokio::test]
    async fn history_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"NEWCO"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(body)));
        let adapter = adapter_for(client);

        let history = adapter
            .history(history_request("NEWCO", Period::OneDay))
            .await
            .expect("history should succeed");

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn unknown_symbol_maps_to_not_found() {
        let client =
            RecordingHttpClient::responding(Ok(HttpResponse::new(404, NOT_FOUND_CHART)));
        let adapter = adapter_for(client);

        let error = adapter
            .history(history_request("ZZZZZ", Period::OneMonth))
            .await
            .expect_err("unknown symbol should fail");

        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert!(error.message().contains("ZZZZZ"));
    }

    #[tokio::test]
    async fn throttled_response_maps_to_rate_limited() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::new(
            429,
            "Too Many Requests",
        )));
        let adapter = adapter_for(client);

        let error = adapter
            .profile(Symbol::parse("AAPL").expect("valid symbol"))
            .await
            .expect_err("throttled call should fail");

        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn server_error_maps_to_unavailable() {
        let client =
            RecordingHttpClient::responding(Ok(HttpResponse::new(503, "<html>down</html>")));
        let adapter = adapter_for(client);

        let error = adapter
            .history(history_request("AAPL", Period::OneMonth))
            .await
            .expect_err("upstream outage should fail");

        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert_eq!(error.message(), "yahoo returned status 503");
    }

    #[tokio::test]
    async fn transport_timeout_maps_to_unavailable() {
        let client = RecordingHttpClient::responding(Err(HttpError::timeout(
            "request timed out after 2500 ms",
        )));
        let adapter = adapter_for(client);

        let error = adapter
            .history(history_request("AAPL", Period::OneMonth))
            .await
            .expect_err("timeout should fail");

        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("timed out"));
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_internal() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json("not json")));
        let adapter = adapter_for(client);

        let error = adapter
            .history(history_request("AAPL", Period::OneMonth))
            .await
            .expect_err("garbage should fail");

        assert_eq!(error.kind(), SourceErrorKind::Internal);
    }

    #[tokio::test]
    async fn profile_reads_chart_meta() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(AAPL_CHART)));
        let adapter = adapter_for(client.clone());

        let profile = adapter
            .profile(Symbol::parse("aapl").expect("valid symbol"))
            .await
            .expect("profile should succeed");

        assert_eq!(profile.symbol.as_deref(), Some("AAPL"));
        assert_eq!(profile.display_name(), Some("Apple Inc."));
        assert_eq!(profile.currency.as_deref(), Some("USD"));
        assert!(client.recorded_requests()[0].url.contains("range=1d"));
    }

    #[tokio::test]
    async fn symbols_are_url_encoded() {
        let client = RecordingHttpClient::responding(Ok(HttpResponse::ok_json(AAPL_CHART)));
        let adapter = adapter_for(client.clone());

        adapter
            .profile(Symbol::parse("^gspc").expect("valid symbol"))
            .await
            .expect("profile should succeed");

        assert!(client.recorded_requests()[0]
            .url
            .contains("/v8/finance/chart/%5EGSPC?"));
    }
}
