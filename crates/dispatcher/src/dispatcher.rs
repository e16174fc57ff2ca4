//! Dispatcher - launches the selected crawlers and joins all of them

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

use contracts::{CrawlerName, DispatchSettings, MetricSink};
use observability::RunningStats;

use crate::crawler::CrawlOutcome;
use crate::error::DispatchError;
use crate::registry::CrawlerRegistry;

/// Dispatcher configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Deadline per crawler (None = run to natural completion)
    pub unit_timeout: Option<Duration>,
    /// Reject the run when a selected name is not registered
    pub reject_unknown: bool,
}

impl From<&DispatchSettings> for DispatcherConfig {
    fn from(settings: &DispatchSettings) -> Self {
        Self {
            unit_timeout: settings.unit_timeout(),
            reject_unknown: settings.reject_unknown,
        }
    }
}

/// Result of one dispatch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Crawlers started
    pub launched: usize,
    /// Crawlers observed finishing (always equal to `launched`)
    pub completed: usize,
    /// Crawlers whose batch reached the sink
    pub written: usize,
    /// Crawlers that failed, timed out or panicked
    pub failed: usize,
    /// Selected names with no registered crawler
    pub skipped: usize,
    /// Outcome per launched crawler
    pub outcomes: BTreeMap<CrawlerName, CrawlOutcome>,
}

impl RunSummary {
    fn record(&mut self, name: CrawlerName, outcome: CrawlOutcome) {
        self.completed += 1;
        if matches!(outcome, CrawlOutcome::Written { .. }) {
            self.written += 1;
        }
        if outcome.is_failure() {
            self.failed += 1;
        }
        self.outcomes.insert(name, outcome);
    }
}

/// Runs named crawlers concurrently against one shared sink
pub struct Dispatcher<S> {
    registry: Arc<CrawlerRegistry>,
    sink: Arc<S>,
    config: DispatcherConfig,
}

impl<S> Dispatcher<S>
where
    S: MetricSink + Sync + 'static,
{
    pub fn new(registry: CrawlerRegistry, sink: Arc<S>) -> Self {
        Self {
            registry: Arc::new(registry),
            sink,
            config: DispatcherConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &CrawlerRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Run every crawler named in `names` and wait for all of them
    ///
    /// Duplicate names run once. Unknown names are skipped with a warning,
    /// or rejected up front when `reject_unknown` is set.
    ///
    /// # Errors
    /// `NoSourcesSelected` for an empty selection, `UnknownSource` when
    /// rejecting unknown names. Nothing is launched in either case.
    #[instrument(name = "dispatcher_run_selected", skip(self, names))]
    pub async fn run_selected<I, N>(&self, names: I) -> Result<RunSummary, DispatchError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let requested: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        if requested.is_empty() {
            return Err(DispatchError::NoSourcesSelected);
        }

        let mut seen = HashSet::new();
        let mut selected = Vec::new();
        let mut unknown = Vec::new();
        for name in requested {
            if !seen.insert(name.clone()) {
                continue;
            }
            match self.registry.entry(&name) {
                Some((registered, crawler)) => selected.push((registered.clone(), crawler.clone())),
                None => unknown.push(name),
            }
        }

        if !unknown.is_empty() {
            if self.config.reject_unknown {
                return Err(DispatchError::UnknownSource { names: unknown });
            }
            for name in &unknown {
                warn!(crawler = %name, "unknown crawler, skipping");
            }
        }

        let mut summary = RunSummary {
            skipped: unknown.len(),
            ..RunSummary::default()
        };

        let mut tasks = JoinSet::new();
        for (name, crawler) in selected {
            let sink = Arc::clone(&self.sink);
            let unit_timeout = self.config.unit_timeout;
            tasks.spawn(async move {
                let started = Instant::now();
                // Inner task so a panic surfaces here with the crawler's name
                let unit_name = name.clone();
                let unit = tokio::spawn(async move {
                    let run = crawler.run(unit_name.as_str(), sink.as_ref());
                    match unit_timeout {
                        Some(limit) => tokio::time::timeout(limit, run).await.unwrap_or_else(|_| {
                            warn!(crawler = %unit_name, timeout_ms = limit.as_millis() as u64, "crawler timed out");
                            observability::record_crawl_outcome(unit_name.as_str(), CrawlOutcome::TimedOut.as_str());
                            CrawlOutcome::TimedOut
                        }),
                        None => run.await,
                    }
                });
                let outcome = match unit.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(crawler = %name, error = %e, "crawler task panicked");
                        observability::record_crawl_outcome(name.as_str(), CrawlOutcome::Panicked.as_str());
                        CrawlOutcome::Panicked
                    }
                };
                (name, outcome, started.elapsed())
            });
            summary.launched += 1;
        }

        info!(launched = summary.launched, skipped = summary.skipped, "crawlers launched");
        observability::record_crawls_in_flight(tasks.len());

        let mut durations = RunningStats::default();
        while let Some(joined) = tasks.join_next().await {
            observability::record_crawls_in_flight(tasks.len());
            match joined {
                Ok((name, outcome, elapsed)) => {
                    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
                    durations.push(elapsed_ms);
                    observability::record_crawl_duration_ms(name.as_str(), elapsed_ms);
                    summary.record(name, outcome);
                }
                Err(e) => {
                    // Only reachable if the wrapper itself dies; the name is lost
                    error!(error = %e, "crawler wrapper task failed");
                    summary.completed += 1;
                    summary.failed += 1;
                }
            }
        }

        info!(
            launched = summary.launched,
            completed = summary.completed,
            written = summary.written,
            failed = summary.failed,
            skipped = summary.skipped,
            duration_ms = %durations.summary(),
            "dispatch complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::test_support::{CadenceEcho, MockSink, Script, ScriptedSource};
    use crate::crawler::Crawler;
    use contracts::CrawlCadence;

    fn scripted(name: &'static str, script: Script) -> Crawler {
        Crawler::single(ScriptedSource { name, script })
    }

    fn dispatcher(sink: Arc<MockSink>) -> Dispatcher<MockSink> {
        let echo: Arc<dyn contracts::FrequencyAggregator> = Arc::new(CadenceEcho);
        let registry = CrawlerRegistry::builder()
            .register("ok_a", scripted("a.example", Script::Points(2)))
            .register("ok_b", scripted("b.example", Script::Points(1)))
            .register("broken", scripted("c.example", Script::Fail))
            .register("slow", scripted("d.example", Script::Sleep(Duration::from_secs(5))))
            .register("boom", scripted("e.example", Script::Panic))
            .register("echo_1m", Crawler::aggregated(echo.clone(), CrawlCadence::Immediate))
            .register("echo_1d", Crawler::aggregated(echo, CrawlCadence::Day))
            .build()
            .unwrap();
        Dispatcher::new(registry, sink)
    }

    #[tokio::test]
    async fn test_empty_selection_launches_nothing() {
        let sink = Arc::new(MockSink::default());
        let err = dispatcher(sink.clone())
            .run_selected(Vec::<String>::new())
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::NoSourcesSelected);
        assert_eq!(sink.calls(), 0);
    }

    #[tokio::test]
    async fn test_only_unknown_names_returns_promptly() {
        let sink = Arc::new(MockSink::default());
        let summary = dispatcher(sink.clone())
            .run_selected(["unknown"])
            .await
            .unwrap();

        assert_eq!(summary.launched, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(sink.calls(), 0);
    }

    #[tokio::test]
    async fn test_reject_unknown_fails_before_launch() {
        let sink = Arc::new(MockSink::default());
        let err = dispatcher(sink.clone())
            .with_config(DispatcherConfig {
                reject_unknown: true,
                ..Default::default()
            })
            .run_selected(["ok_a", "nope"])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::UnknownSource {
                names: vec!["nope".to_string()]
            }
        );
        assert_eq!(sink.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_affect_siblings() {
        let sink = Arc::new(MockSink::default());
        let summary = dispatcher(sink.clone())
            .run_selected(["ok_a", "broken", "ok_b", "missing"])
            .await
            .unwrap();

        assert_eq!(summary.launched, 3);
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.written, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.outcomes["broken"], CrawlOutcome::GatherFailed);
        assert_eq!(sink.points(), 3);
    }

    #[tokio::test]
    async fn test_join_completes_when_everything_fails() {
        let sink = Arc::new(MockSink::failing());
        let summary = dispatcher(sink.clone())
            .run_selected(["ok_a", "ok_b", "broken", "boom"])
            .await
            .unwrap();

        assert_eq!(summary.completed, summary.launched);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.outcomes["boom"], CrawlOutcome::Panicked);
        assert_eq!(summary.outcomes["ok_a"], CrawlOutcome::WriteFailed);
    }

    #[tokio::test]
    async fn test_duplicate_selection_runs_once() {
        let sink = Arc::new(MockSink::default());
        let summary = dispatcher(sink.clone())
            .run_selected(["ok_a", "ok_a", "ok_a"])
            .await
            .unwrap();

        assert_eq!(summary.launched, 1);
        assert_eq!(sink.calls(), 1);
    }

    #[tokio::test]
    async fn test_aggregated_crawlers_use_their_cadence() {
        let sink = Arc::new(MockSink::default());
        let summary = dispatcher(sink.clone())
            .run_selected(["echo_1m", "echo_1d"])
            .await
            .unwrap();

        assert_eq!(summary.outcomes["echo_1m"], CrawlOutcome::Written { points: 4 });
        assert_eq!(summary.outcomes["echo_1d"], CrawlOutcome::Written { points: 1 });
    }

    #[tokio::test]
    async fn test_unit_timeout_counts_as_failed() {
        let sink = Arc::new(MockSink::default());
        let summary = dispatcher(sink.clone())
            .with_config(DispatcherConfig {
                unit_timeout: Some(Duration::from_millis(100)),
                ..Default::default()
            })
            .run_selected(["slow", "ok_a"])
            .await
            .unwrap();

        assert_eq!(summary.outcomes["slow"], CrawlOutcome::TimedOut);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, 1);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = DispatchSettings {
            unit_timeout_secs: 30,
            reject_unknown: true,
            ..Default::default()
        };
        let config = DispatcherConfig::from(&settings);
        assert_eq!(config.unit_timeout, Some(Duration::from_secs(30)));
        assert!(config.reject_unknown);
    }
}
