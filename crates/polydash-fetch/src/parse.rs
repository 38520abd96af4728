//! Aggregates response decoding.
//!
//! The wire format uses single-letter field names and floating point volume.
//! [`WireBar::normalize`] turns each wire record into a [`DailyBar`].

use polydash_types::{DailyBar, DateWindow, FetchError, Ticker, TickerSeries};
use serde::Deserialize;

/// Status value the upstream reports for a usable response.
pub const STATUS_OK: &str = "OK";

/// Top-level aggregates response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatesResponse {
    /// Echoed ticker symbol.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Response status, `"OK"` when the request succeeded.
    #[serde(default)]
    pub status: String,
    /// Whether results are split-adjusted.
    #[serde(default)]
    pub adjusted: Option<bool>,
    /// Number of base aggregates used to build the results.
    #[serde(default)]
    pub query_count: Option<u64>,
    /// Number of bars in `results`.
    #[serde(default)]
    pub results_count: Option<u64>,
    /// Upstream request identifier.
    #[serde(default, rename = "request_id")]
    pub request_id: Option<String>,
    /// Bars, absent when there is no data for the window.
    #[serde(default)]
    pub results: Option<Vec<WireBar>>,
}

/// One aggregate bar as sent on the wire.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireBar {
    /// Open.
    pub o: f64,
    /// High.
    pub h: f64,
    /// Low.
    pub l: f64,
    /// Close.
    pub c: f64,
    /// Volume, reported as a float.
    pub v: f64,
    /// Volume-weighted average price.
    #[serde(default)]
    pub vw: f64,
    /// Period start in epoch milliseconds.
    pub t: i64,
    /// Number of transactions.
    #[serde(default)]
    pub n: Option<f64>,
}

impl WireBar {
    /// Converts the wire record into a domain bar.
    ///
    /// Prices pass through unchanged. Volume and transaction counts are
    /// rounded to whole numbers.
    #[must_use]
    pub fn normalize(self) -> DailyBar {
        let bar = DailyBar::new(
            self.t,
            self.o,
            self.h,
            self.l,
            self.c,
            self.vw,
            self.v.round() as u64,
        );
        self.n
            .map_or(bar, |n| bar.with_transactions(n.round() as u64))
    }
}

/// Decodes an aggregates response body into a series.
///
/// Bars are returned in upstream order.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] if the body is not valid JSON for the
/// envelope, and [`FetchError::NoData`] if the status is not `"OK"` or the
/// results are missing or empty.
pub fn parse_aggregates(
    ticker: &Ticker,
    window: &DateWindow,
    body: &str,
) -> Result<TickerSeries, FetchError> {
    let response: AggregatesResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode {
            ticker: ticker.clone(),
            message: e.to_string(),
        })?;

    let no_data = || FetchError::NoData {
        ticker: ticker.clone(),
        from: window.start,
        to: window.end,
    };

    if response.status != STATUS_OK {
        return Err(no_data());
    }

    match response.results {
        Some(bars) if !bars.is_empty() => Ok(bars.into_iter().map(WireBar::normalize).collect()),
        _ => Err(no_data()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tsla() -> Ticker {
        Ticker::new("TSLA").unwrap()
    }

    fn window() -> DateWindow {
        DateWindow::reference()
    }

    const BODY: &str = r#"{
        "ticker": "TSLA",
        "queryCount": 2,
        "resultsCount": 2,
        "adjusted": true,
        "results": [
            {"v": 70790813.0, "vw": 131.6292, "o": 130.465, "c": 130.15, "h": 133.04, "l": 129.47, "t": 1673240400000, "n": 645365},
            {"v": 63896155.4, "vw": 132.8, "o": 131.0, "c": 133.5, "h": 134.0, "l": 130.25, "t": 1673326800000}
        ],
        "status": "OK",
        "request_id": "6a7e466379af0a71039d60cc78e72282"
    }"#;

    #[test]
    fn test_parse_ok_response() {
        let series = parse_aggregates(&tsla(), &window(), BODY).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, 1_673_240_400_000);
        assert_eq!(series[0].open, 130.465);
        assert_eq!(series[0].close, 130.15);
        assert_eq!(series[0].vwap, 131.6292);
        assert_eq!(series[0].volume, 70_790_813);
        assert_eq!(series[0].transactions, Some(645_365));
        assert_eq!(series[1].volume, 63_896_155);
        assert_eq!(series[1].transactions, None);
    }

    #[test]
    fn test_parse_keeps_upstream_order() {
        let body = r#"{"status":"OK","results":[
            {"o":1,"h":1,"l":1,"c":1,"v":1,"vw":1,"t":300},
            {"o":2,"h":2,"l":2,"c":2,"v":2,"vw":2,"t":100}
        ]}"#;
        let series = parse_aggregates(&tsla(), &window(), body).unwrap();
        assert_eq!(series[0].timestamp, 300);
        assert_eq!(series[1].timestamp, 100);
    }

    #[test]
    fn test_parse_status_not_ok_is_no_data() {
        let body = r#"{"status":"ERROR","results":[{"o":1,"h":1,"l":1,"c":1,"v":1,"vw":1,"t":1}]}"#;
        let err = parse_aggregates(&tsla(), &window(), body).unwrap_err();
        assert!(matches!(err, FetchError::NoData { .. }));
    }

    #[test]
    fn test_parse_missing_or_empty_results_is_no_data() {
        for body in [r#"{"status":"OK"}"#, r#"{"status":"OK","results":[]}"#] {
            let err = parse_aggregates(&tsla(), &window(), body).unwrap_err();
            match err {
                FetchError::NoData { ticker, from, to } => {
                    assert_eq!(ticker, tsla());
                    assert_eq!(from, window().start);
                    assert_eq!(to, window().end);
                }
                other => panic!("expected NoData, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_invalid_json_is_decode_error() {
        let err = parse_aggregates(&tsla(), &window(), "<html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[test]
    fn test_normalize_rounds_volume() {
        let wire = WireBar {
            o: 1.0,
            h: 2.0,
            l: 0.5,
            c: 1.5,
            v: 1234.6,
            vw: 1.25,
            t: 42,
            n: Some(9.0),
        };
        let bar = wire.normalize();
        assert_eq!(bar.volume, 1235);
        assert_eq!(bar.transactions, Some(9));
        assert_eq!(bar.timestamp, 42);
    }
}
