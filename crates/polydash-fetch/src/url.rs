//! Aggregates endpoint URL construction.

use polydash_types::{DateWindow, Ticker, Timespan};

/// Default base URL for the market data API.
pub const BASE_URL: &str = "https://api.polygon.io";

/// Builds the URL for a ticker's historical aggregate bars.
///
/// URL format:
/// `{base}/v2/aggs/ticker/{TICKER}/range/{multiplier}/{timespan}/{from}/{to}?adjusted=true&sort=asc&apiKey={key}`
///
/// Both dates are inclusive. Results are split-adjusted and sorted ascending.
///
/// # Example
///
/// ```
/// use polydash_fetch::url::aggregates_url;
/// use polydash_types::{DateWindow, Ticker, Timespan};
///
/// let ticker = Ticker::new("tsla").unwrap();
/// let window = DateWindow::parse("2024-09-16", "2024-12-13").unwrap();
/// let url = aggregates_url("https://api.polygon.io", &ticker, 1, Timespan::Day, &window, "KEY");
/// assert_eq!(
///     url,
///     "https://api.polygon.io/v2/aggs/ticker/TSLA/range/1/day/2024-09-16/2024-12-13?adjusted=true&sort=asc&apiKey=KEY"
/// );
/// ```
#[must_use]
pub fn aggregates_url(
    base_url: &str,
    ticker: &Ticker,
    multiplier: u32,
    timespan: Timespan,
    window: &DateWindow,
    api_key: &str,
) -> String {
    format!(
        "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}?adjusted=true&sort=asc&apiKey={}",
        base_url.trim_end_matches('/'),
        ticker,
        multiplier,
        timespan,
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d"),
        api_key
    )
}

/// Replaces the `apiKey` query value with `***` so a URL can be logged.
#[must_use]
pub fn redact_api_key(url: &str) -> String {
    const PARAM: &str = "apiKey=";

    let Some(start) = url.find(PARAM).map(|i| i + PARAM.len()) else {
        return url.to_string();
    };
    let end = url[start..].find('&').map_or(url.len(), |i| start + i);

    format!("{}***{}", &url[..start], &url[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DateWindow {
        DateWindow::parse("2024-09-14", "2024-12-13").unwrap()
    }

    #[test]
    fn test_aggregates_url_shape() {
        let ticker = Ticker::new("nvda").unwrap();
        let url = aggregates_url(BASE_URL, &ticker, 1, Timespan::Day, &window(), "abc123");
        assert_eq!(
            url,
            "https://api.polygon.io/v2/aggs/ticker/NVDA/range/1/day/2024-09-14/2024-12-13?adjusted=true&sort=asc&apiKey=abc123"
        );
    }

    #[test]
    fn test_aggregates_url_trims_trailing_slash() {
        let ticker = Ticker::new("AAPL").unwrap();
        let url = aggregates_url(
            "http://localhost:8080/",
            &ticker,
            2,
            Timespan::Week,
            &window(),
            "k",
        );
        assert!(url.starts_with("http://localhost:8080/v2/aggs/ticker/AAPL/range/2/week/"));
    }

    #[test]
    fn test_redact_api_key() {
        assert_eq!(
            redact_api_key("https://x/v2?adjusted=true&apiKey=secret"),
            "https://x/v2?adjusted=true&apiKey=***"
        );
        assert_eq!(
            redact_api_key("https://x/v2?apiKey=secret&sort=asc"),
            "https://x/v2?apiKey=***&sort=asc"
        );
        assert_eq!(redact_api_key("https://x/v2"), "https://x/v2");
    }
}
