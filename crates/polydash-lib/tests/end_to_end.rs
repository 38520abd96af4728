//! Fetch, normalize and summarize against an in-memory upstream.

use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use polydash_fetch::{MockTransport, RecordingTimer};
use polydash_lib::{
    CardMetrics, ChartMode, ClientConfig, CsvFormatter, Dashboard, DateWindow, Formatter,
    MarketDataClient, Orchestrator, OrchestratorConfig, Ticker, compute_stats,
};

const TSLA_BODY: &str = r#"{
    "ticker": "TSLA",
    "status": "OK",
    "resultsCount": 2,
    "results": [
        {"o": 200.0, "h": 221.0, "l": 198.0, "c": 220.0, "v": 1.2345e8, "vw": 212.0, "t": 1000},
        {"o": 220.0, "h": 225.5, "l": 205.25, "c": 209.0, "v": 98765432.0, "vw": 212.125, "t": 2000}
    ]
}"#;

const AAPL_BODY: &str = r#"{
    "status": "OK",
    "results": [
        {"o": 50.0, "h": 51.0, "l": 49.0, "c": 50.0, "v": 1000.0, "vw": 50.0, "t": 2000},
        {"o": 50.0, "h": 76.0, "l": 50.0, "c": 75.0, "v": 1000.0, "vw": 63.0, "t": 3000}
    ]
}"#;

fn orchestrator(
    transport: MockTransport,
) -> (Orchestrator<MarketDataClient>, Arc<RecordingTimer>, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let config = ClientConfig {
        max_retries: 0,
        ..ClientConfig::new("test-key")
    };
    let client = MarketDataClient::with_transport(config, transport.clone()).unwrap();
    let timer = Arc::new(RecordingTimer::new());
    let orchestrator =
        Orchestrator::with_timer(client, OrchestratorConfig::default(), timer.clone());
    (orchestrator, timer, transport)
}

#[tokio::test]
async fn test_single_ticker_dashboard() {
    let (orchestrator, timer, _) =
        orchestrator(MockTransport::new().with_response("TSLA", 200, TSLA_BODY));
    let tickers = vec![Ticker::new("TSLA").unwrap()];

    let results = orchestrator.fetch_all(&tickers).await;
    assert_eq!(results.len(), 1);
    assert!(timer.sleeps().is_empty());

    let summary = &results[0].summary;
    assert_eq!(summary.open, 220.0);
    assert_eq!(summary.close, 209.0);
    assert_eq!(results[0].series[0].volume, 123_450_000);

    let card = CardMetrics::from_summary(summary);
    assert_relative_eq!(card.change_percent.unwrap(), -5.0, epsilon = 1e-9);
    assert!(!card.is_positive);

    let stats = compute_stats(results.iter().map(|r| &r.summary)).unwrap();
    assert_eq!(stats.best_performer, stats.worst_performer);
    assert_relative_eq!(stats.average_move_percent, -5.0, epsilon = 1e-9);

    let raw = Dashboard::build(DateWindow::reference(), &results, ChartMode::Raw);
    assert_eq!(raw.chart[0].value("TSLA"), Some(220.0));
    assert_eq!(raw.chart[1].value("TSLA"), Some(209.0));

    let indexed = Dashboard::build(DateWindow::reference(), &results, ChartMode::Indexed);
    assert_eq!(indexed.chart[0].value("TSLA"), Some(100.0));
    assert_relative_eq!(indexed.chart[1].value("TSLA").unwrap(), 95.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_failed_ticker_is_absent_everywhere() {
    let (orchestrator, timer, transport) = orchestrator(
        MockTransport::new()
            .with_response("TSLA", 200, TSLA_BODY)
            .with_response("NVDA", 429, "{}")
            .with_response("AAPL", 200, AAPL_BODY),
    );
    let tickers = Ticker::parse_list("TSLA,NVDA,AAPL").unwrap();

    let report = orchestrator
        .fetch_all_with(&tickers, polydash_lib::CancelSignal::never(), |_| {})
        .await;
    let failed: Vec<Ticker> = report.failures().map(|e| e.ticker().clone()).collect();
    let results = report.into_results();

    let symbols: Vec<&str> = results.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(symbols, vec!["TSLA", "AAPL"]);
    assert_eq!(transport.requests().len(), 3);
    assert_eq!(timer.total(), Duration::from_secs(15));

    let dashboard = Dashboard::build(DateWindow::reference(), &results, ChartMode::Indexed)
        .with_failed(failed);
    assert_eq!(dashboard.failed, vec![Ticker::new("NVDA").unwrap()]);

    let dates: Vec<i64> = dashboard.chart.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![1000, 2000, 3000]);
    assert!(dashboard.chart.iter().all(|p| p.value("NVDA").is_none()));

    let stats = dashboard.stats.as_ref().unwrap();
    assert_eq!(stats.best_performer.ticker.as_str(), "AAPL");
    assert_eq!(stats.worst_performer.ticker.as_str(), "TSLA");
    assert_eq!((stats.gainers, stats.losers, stats.unchanged), (1, 1, 0));

    let mut csv = Vec::new();
    CsvFormatter::new()
        .write_chart(&dashboard.tickers, &dashboard.chart, &mut csv)
        .unwrap();
    let csv = String::from_utf8(csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,TSLA,AAPL");
    assert_eq!(lines[1], "1970-01-01,100,");
    assert_eq!(lines[3], "1970-01-01,,150");
}

#[tokio::test]
async fn test_every_ticker_failing_yields_empty_dashboard() {
    let (orchestrator, timer, _) = orchestrator(MockTransport::new());
    let tickers = Ticker::parse_list("TSLA,AAPL").unwrap();

    let results = orchestrator.fetch_all(&tickers).await;
    assert!(results.is_empty());
    assert!(timer.sleeps().is_empty());

    let dashboard = Dashboard::build(DateWindow::reference(), &results, ChartMode::Raw);
    assert!(dashboard.is_empty());
    assert!(dashboard.stats.is_none());
}

#[test]
fn test_dashboard_serializes_flat_chart_points() {
    let dashboard = Dashboard::build(DateWindow::reference(), &[], ChartMode::Indexed);
    let json = serde_json::to_value(&dashboard).unwrap();

    assert_eq!(json["mode"], "indexed");
    assert!(json["chart"].as_array().unwrap().is_empty());
    assert!(json.get("failed").is_none());
}
