use serde::{Serialize, Serializer};
use time::Date;

use crate::data_source::DailyBar;
use crate::{Period, Symbol};

/// Round to two decimal places.
///
/// Works on the exact stored value rather than `value * 100`, so `2.675`
/// (stored as `2.67499…`) becomes `2.67` and exact ties go to the even digit.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// One trading day as returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteRow {
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&DailyBar> for QuoteRow {
    fn from(bar: &DailyBar) -> Self {
        Self {
            date: bar.date,
            open: round2(bar.open),
            high: round2(bar.high),
            low: round2(bar.low),
            close: round2(bar.close),
            volume: bar.volume.unwrap_or(0),
        }
    }
}

/// Statistics derived from the ordered close prices of one response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteSummary {
    pub current_price: f64,
    pub highest: f64,
    pub lowest: f64,
    pub average: f64,
    pub change: f64,
    /// `None` when the first close is zero.
    pub change_percent: Option<f64>,
}

impl QuoteSummary {
    /// Summarize closes in chronological order. Returns `None` for an empty slice.
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        let (&first, &last) = (closes.first()?, closes.last()?);

        let highest = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = closes.iter().copied().fold(f64::INFINITY, f64::min);
        let average = closes.iter().sum::<f64>() / closes.len() as f64;
        let delta = last - first;
        let change_percent = (first != 0.0).then(|| round2(delta / first * 100.0));

        Some(Self {
            current_price: last,
            highest,
            lowest,
            average: round2(average),
            change: round2(delta),
            change_percent,
        })
    }
}

/// Success payload of the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteReport {
    pub ticker: Symbol,
    pub name: String,
    pub currency: String,
    pub period: Period,
    pub data: Vec<QuoteRow>,
    pub summary: QuoteSummary,
}

/// Success payload of the symbol lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolMatch {
    pub valid: bool,
    pub ticker: Symbol,
    pub name: String,
}

impl SymbolMatch {
    pub fn new(ticker: Symbol, name: impl Into<String>) -> Self {
        Self {
            valid: true,
            ticker,
            name: name.into(),
        }
    }
}

fn serialize_date<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&format_args!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    ))
}
