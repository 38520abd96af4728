//! Sequential, rate-limited fetching across a ticker list.
//!
//! The orchestrator is an explicit state machine. Each ticker is requested
//! in input order; after a successful fetch that is not the last, it enters
//! [`FetchState::AwaitingSlot`] and waits out the configured delay before the
//! next request. Failures are recorded and the loop moves straight on.
//!
//! ```text
//! Ready(i) --fetch ok, more left--> AwaitingSlot(i+1) --delay--> Ready(i+1)
//! Ready(i) --fetch failed, more left--> Ready(i+1)
//! Ready(last) --any--> Done
//! any --cancelled--> Done
//! ```

use std::sync::Arc;
use std::time::Duration;

use polydash_types::{FetchError, Ticker, TickerResult};
use tracing::{debug, info, warn};

use crate::cancel::CancelSignal;
use crate::client::TickerSource;
use crate::timer::{Timer, TokioTimer};

/// Default delay between successful requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(15);

/// Orchestrator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Wait inserted after each successful fetch except the last.
    pub delay: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl OrchestratorConfig {
    /// Returns the worst-case wall time spent waiting for `tickers` requests.
    #[must_use]
    pub fn estimated_duration(&self, tickers: usize) -> Duration {
        let waits = u32::try_from(tickers.saturating_sub(1)).unwrap_or(u32::MAX);
        self.delay.saturating_mul(waits)
    }
}

/// Position of the orchestrator in the ticker list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// About to request the ticker at `next`.
    Ready {
        /// Index of the next ticker.
        next: usize,
    },
    /// Waiting out the request delay before the ticker at `next`.
    AwaitingSlot {
        /// Index of the next ticker.
        next: usize,
    },
    /// Every ticker was attempted, or the run was cancelled.
    Done,
}

impl FetchState {
    /// Returns the initial state for a list of `total` tickers.
    #[must_use]
    pub const fn start(total: usize) -> Self {
        if total == 0 {
            Self::Done
        } else {
            Self::Ready { next: 0 }
        }
    }

    /// Returns the state after the ticker at `index` finished.
    ///
    /// A wait is only scheduled after a success with tickers remaining and
    /// a non-zero delay.
    #[must_use]
    pub const fn after_fetch(index: usize, total: usize, succeeded: bool, delay: Duration) -> Self {
        let next = index + 1;
        if next >= total {
            Self::Done
        } else if succeeded && !delay.is_zero() {
            Self::AwaitingSlot { next }
        } else {
            Self::Ready { next }
        }
    }
}

/// Result of attempting one ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    /// The ticker produced a summary and series.
    Fetched(TickerResult),
    /// The ticker failed and was skipped.
    Failed(FetchError),
}

impl TickerOutcome {
    /// Returns the ticker this outcome belongs to.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        match self {
            Self::Fetched(result) => &result.ticker,
            Self::Failed(error) => error.ticker(),
        }
    }

    /// Returns true for a successful fetch.
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }
}

/// Progress notifications emitted while fetching.
#[derive(Debug, Clone, Copy)]
pub enum FetchEvent<'a> {
    /// A request for `ticker` is about to be issued.
    Started {
        /// Ticker being fetched.
        ticker: &'a Ticker,
        /// Zero-based position in the input.
        index: usize,
        /// Number of tickers in the input.
        total: usize,
    },
    /// `ticker` was fetched.
    Fetched {
        /// Ticker fetched.
        ticker: &'a Ticker,
        /// Number of bars received.
        bars: usize,
    },
    /// `ticker` failed and was skipped.
    Failed {
        /// Ticker that failed.
        ticker: &'a Ticker,
        /// Failure reason.
        error: &'a FetchError,
    },
    /// Waiting before requesting `next`.
    Waiting {
        /// Length of the wait.
        delay: Duration,
        /// Ticker requested after the wait.
        next: &'a Ticker,
    },
    /// The run stopped early with `remaining` tickers not attempted.
    Cancelled {
        /// Number of tickers never requested.
        remaining: usize,
    },
}

/// Accumulated outcomes of a fetch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchReport {
    /// One outcome per attempted ticker, in input order.
    pub outcomes: Vec<TickerOutcome>,
    /// True if the run stopped before attempting every ticker.
    pub cancelled: bool,
}

impl FetchReport {
    /// Returns the successful results in input order.
    pub fn results(&self) -> impl Iterator<Item = &TickerResult> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TickerOutcome::Fetched(result) => Some(result),
            TickerOutcome::Failed(_) => None,
        })
    }

    /// Returns the failures in input order.
    pub fn failures(&self) -> impl Iterator<Item = &FetchError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TickerOutcome::Fetched(_) => None,
            TickerOutcome::Failed(error) => Some(error),
        })
    }

    /// Consumes the report, keeping only the successful results.
    #[must_use]
    pub fn into_results(self) -> Vec<TickerResult> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                TickerOutcome::Fetched(result) => Some(result),
                TickerOutcome::Failed(_) => None,
            })
            .collect()
    }

    /// Returns the number of successful results.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.results().count()
    }

    /// Returns the number of failed tickers.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Fetches tickers one at a time with a delay between successful requests.
#[derive(Debug, Clone)]
pub struct Orchestrator<S> {
    source: S,
    timer: Arc<dyn Timer>,
    config: OrchestratorConfig,
}

impl<S: TickerSource> Orchestrator<S> {
    /// Creates an orchestrator that waits on the tokio clock.
    pub fn new(source: S, config: OrchestratorConfig) -> Self {
        Self::with_timer(source, config, Arc::new(TokioTimer))
    }

    /// Creates an orchestrator with a custom timer.
    pub fn with_timer(source: S, config: OrchestratorConfig, timer: Arc<dyn Timer>) -> Self {
        Self {
            source,
            timer,
            config,
        }
    }

    /// Returns the orchestrator configuration.
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns the underlying ticker source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetches every ticker in order and returns the successful results.
    ///
    /// Failed tickers are logged and left out. An empty input returns an
    /// empty list without issuing requests.
    pub async fn fetch_all(&self, tickers: &[Ticker]) -> Vec<TickerResult> {
        self.fetch_all_with(tickers, CancelSignal::never(), |_| {})
            .await
            .into_results()
    }

    /// Fetches every ticker in order, reporting progress to `observer`.
    ///
    /// Cancellation is checked before each request and raced against each
    /// wait. A cancelled run keeps the outcomes gathered so far.
    pub async fn fetch_all_with<F>(
        &self,
        tickers: &[Ticker],
        mut cancel: CancelSignal,
        mut observer: F,
    ) -> FetchReport
    where
        F: FnMut(FetchEvent<'_>) + Send,
    {
        let total = tickers.len();
        let mut report = FetchReport {
            outcomes: Vec::with_capacity(total),
            cancelled: false,
        };
        let mut state = FetchState::start(total);

        info!(tickers = total, delay_ms = self.config.delay.as_millis() as u64, "Starting fetch");

        loop {
            state = match state {
                FetchState::Done => break,
                FetchState::Ready { next } | FetchState::AwaitingSlot { next }
                    if cancel.is_cancelled() =>
                {
                    Self::cancel_at(next, total, &mut report, &mut observer)
                }
                FetchState::Ready { next } => {
                    let ticker = &tickers[next];
                    observer(FetchEvent::Started {
                        ticker,
                        index: next,
                        total,
                    });

                    let outcome = match self.source.fetch_ticker(ticker).await {
                        Ok(result) => {
                            info!(ticker = %ticker, bars = result.series.len(), "Fetched ticker");
                            observer(FetchEvent::Fetched {
                                ticker,
                                bars: result.series.len(),
                            });
                            TickerOutcome::Fetched(result)
                        }
                        Err(error) => {
                            warn!(ticker = %ticker, error = %error, "Skipping ticker");
                            observer(FetchEvent::Failed {
                                ticker,
                                error: &error,
                            });
                            TickerOutcome::Failed(error)
                        }
                    };

                    let succeeded = outcome.is_fetched();
                    report.outcomes.push(outcome);
                    FetchState::after_fetch(next, total, succeeded, self.config.delay)
                }
                FetchState::AwaitingSlot { next } => {
                    let delay = self.config.delay;
                    debug!(next = %tickers[next], delay_ms = delay.as_millis() as u64, "Waiting for request slot");
                    observer(FetchEvent::Waiting {
                        delay,
                        next: &tickers[next],
                    });

                    tokio::select! {
                        () = self.timer.sleep(delay) => FetchState::Ready { next },
                        () = cancel.cancelled() => Self::cancel_at(next, total, &mut report, &mut observer),
                    }
                }
            };
        }

        info!(
            fetched = report.success_count(),
            failed = report.failure_count(),
            cancelled = report.cancelled,
            "Fetch finished"
        );
        report
    }

    fn cancel_at<F>(next: usize, total: usize, report: &mut FetchReport, observer: &mut F) -> FetchState
    where
        F: FnMut(FetchEvent<'_>),
    {
        let remaining = total - next;
        info!(remaining, "Fetch cancelled");
        observer(FetchEvent::Cancelled { remaining });
        report.cancelled = true;
        FetchState::Done
    }
}
