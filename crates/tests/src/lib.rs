//! # Integration Tests
//!
//! End-to-end dispatch runs against mock HTTP servers.
//!
//! Covers:
//! - settings file -> registry -> dispatcher -> InfluxDB line protocol
//! - failure isolation between sibling crawlers
//! - gather policy behaviour across the whole stack

#[cfg(test)]
mod e2e_tests {
    use std::sync::{Arc, Mutex};

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        Batch, ContractError, CrawlCadence, CrawlerSettings, FrequencyAggregator, GatherPolicy,
        MetricSink,
    };
    use dispatcher::{
        CrawlOutcome, Crawler, CrawlerRegistry, DispatchError, Dispatcher, DispatcherConfig,
        InfluxSink,
    };
    use sources::{BitcoinDe, BlockchainInfo, Bitstamp, HttpFetcher};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TICKER: &str = r#"{
        "USD": {"15m": 2500.1, "last": 2500.5, "buy": 2501.0, "sell": 2499.0, "symbol": "$"},
        "EUR": {"15m": 2200.1, "last": 2200.5, "buy": 2201.0, "sell": 2199.0, "symbol": "€"},
        "CNY": {"15m": 17000.0, "last": 17001.0, "buy": 17002.0, "sell": 17000.5, "symbol": "¥"}
    }"#;
    const BITSTAMP_USD: &str =
        r#"{"high":"2600","last":"2505.1","timestamp":"1500000000","bid":"2505","low":"2400","ask":"2506"}"#;
    const BITSTAMP_EUR: &str =
        r#"{"high":"2300","last":"2205","timestamp":"1500000030","bid":"2204","low":"2100","ask":"2206"}"#;

    /// Sink that keeps every batch it is handed
    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<Batch>>,
    }

    impl RecordingSink {
        fn sources(&self) -> Vec<String> {
            let batches = self.batches.lock().unwrap();
            let mut sources: Vec<String> = batches
                .iter()
                .flat_map(|b| b.iter().map(|p| p.source().to_string()))
                .collect();
            sources.dedup();
            sources
        }

        fn batch_count(&self) -> usize {
            self.batches.lock().unwrap().len()
        }
    }

    impl MetricSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn write(&self, batch: &Batch) -> Result<(), ContractError> {
            self.batches.lock().unwrap().push(batch.clone());
            Ok(())
        }
    }

    async fn mount(server: &MockServer, at: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Every data endpoint the tests touch, healthy
    async fn mount_healthy_sources(server: &MockServer) {
        mount(server, "/ticker", 200, TICKER).await;
        mount(server, "/q/unconfirmedcount", 200, "4211").await;
        mount(server, "/q/24hrtransactioncount", 200, "250000").await;
        mount(server, "/q/interval", 200, "583.2").await;
        mount(server, "/pools", 200, r#"{"poolA": 30, "poolB": 70}"#).await;
        mount(server, "/api/v2/ticker/btcusd/", 200, BITSTAMP_USD).await;
        mount(server, "/api/v2/ticker/btceur/", 200, BITSTAMP_EUR).await;
    }

    /// Registry shaped like the production one, pointed at `server`
    fn registry(server: &MockServer, settings: &CrawlerSettings) -> CrawlerRegistry {
        let http = HttpFetcher::new(&settings.http).unwrap();
        let blockchain_info: Arc<dyn FrequencyAggregator> = Arc::new(
            BlockchainInfo::new(http.clone())
                .with_base_url(&server.uri())
                .with_policy(settings.dispatch.gather_policy),
        );

        let mut builder = CrawlerRegistry::builder();
        for cadence in CrawlCadence::ALL {
            builder = builder.register(
                format!("blockchaininfo_{}", cadence.suffix()),
                Crawler::aggregated(Arc::clone(&blockchain_info), cadence),
            );
        }
        builder
            .register(
                "bitstamp",
                Crawler::single(Bitstamp::new(http.clone()).with_base_url(&server.uri())),
            )
            .register(
                "bitcoinde",
                Crawler::single(
                    BitcoinDe::new(http, settings.credentials.bitcoin_de_api_key.clone())
                        .with_base_url(&server.uri()),
                ),
            )
            .build()
            .unwrap()
    }

    fn settings_for(influx: &MockServer, extra: &str) -> CrawlerSettings {
        let content = format!(
            "[influx]\naddr = \"{}\"\ndatabase = \"seismograph_test\"\n{extra}",
            influx.uri()
        );
        let mut settings = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap();
        // Whatever the host environment holds, these runs have no key
        settings.credentials.bitcoin_de_api_key = None;
        settings
    }

    #[tokio::test]
    async fn test_settings_to_influx_line_protocol() {
        let data = MockServer::start().await;
        let influx = MockServer::start().await;
        mount_healthy_sources(&data).await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .and(query_param("q", "CREATE DATABASE \"seismograph_test\""))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"results":[{}]}"#))
            .expect(1)
            .mount(&influx)
            .await;
        Mock::given(method("POST"))
            .and(path("/write"))
            .and(query_param("db", "seismograph_test"))
            .and(query_param("precision", "s"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&influx)
            .await;

        let settings = settings_for(&influx, "");
        let sink = Arc::new(InfluxSink::new(&settings.influx, &settings.http).unwrap());
        sink.ensure_database().await.unwrap();

        let dispatcher = Dispatcher::new(registry(&data, &settings), Arc::clone(&sink))
            .with_config(DispatcherConfig::from(&settings.dispatch));
        let summary = dispatcher
            .run_selected(["blockchaininfo_1m", "bitstamp"])
            .await
            .unwrap();

        assert_eq!(summary.launched, 2);
        assert_eq!(summary.written, 2);
        assert_eq!(sink.metrics().points_written, 6);

        let requests = influx.received_requests().await.unwrap();
        let bodies: Vec<String> = requests
            .iter()
            .filter(|r| r.url.path() == "/write")
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect();
        let all = bodies.join("\n");
        assert!(all.contains("price,currency=USD,source=blockchain.info ask=2501,bid=2499,last=2500.5 "));
        assert!(all.contains("network,source=blockchain.info unconfirmedCount=4211 "));
        assert!(all.contains("price,currency=EUR,source=bitstamp.net "));
        assert!(all.contains(" 1500000030"));
    }

    #[tokio::test]
    async fn test_failing_endpoint_isolated_from_siblings() {
        let data = MockServer::start().await;
        mount_healthy_sources(&data).await;
        mount(&data, "/q/getdifficulty", 500, "").await;

        let settings = CrawlerSettings::default();
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(registry(&data, &settings), Arc::clone(&sink));

        let summary = dispatcher
            .run_selected(["blockchaininfo_15m", "blockchaininfo_1m", "bitstamp"])
            .await
            .unwrap();

        assert_eq!(summary.completed, 3);
        assert_eq!(
            summary.outcomes.get("blockchaininfo_15m"),
            Some(&CrawlOutcome::GatherFailed)
        );
        assert_eq!(summary.written, 2);
        assert_eq!(sink.batch_count(), 2);
    }

    #[tokio::test]
    async fn test_lenient_policy_keeps_healthy_groups() {
        let data = MockServer::start().await;
        mount_healthy_sources(&data).await;
        mount(&data, "/q/getdifficulty", 500, "").await;

        let mut settings = CrawlerSettings::default();
        settings.dispatch.gather_policy = GatherPolicy::Lenient;
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(registry(&data, &settings), Arc::clone(&sink));

        let summary = dispatcher.run_selected(["blockchaininfo_15m"]).await.unwrap();

        // Network group lost, pool shares kept
        assert_eq!(
            summary.outcomes.get("blockchaininfo_15m"),
            Some(&CrawlOutcome::Written { points: 2 })
        );
        assert_eq!(sink.sources(), ["blockchain.info"]);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let data = MockServer::start().await;

        let settings = CrawlerSettings::default();
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(registry(&data, &settings), Arc::clone(&sink));

        let summary = dispatcher.run_selected(["bitcoinde"]).await.unwrap();

        assert_eq!(summary.outcomes.get("bitcoinde"), Some(&CrawlOutcome::GatherFailed));
        assert!(data.received_requests().await.unwrap().is_empty());
        assert_eq!(sink.batch_count(), 0);
    }

    #[tokio::test]
    async fn test_influx_rejection_is_write_failure_only() {
        let data = MockServer::start().await;
        let influx = MockServer::start().await;
        mount_healthy_sources(&data).await;
        Mock::given(method("POST"))
            .and(path("/write"))
            .respond_with(ResponseTemplate::new(400).set_body_string("partial write"))
            .mount(&influx)
            .await;

        let settings = settings_for(&influx, "[dispatch]\nunit_timeout_secs = 10\n");
        let sink = Arc::new(InfluxSink::new(&settings.influx, &settings.http).unwrap());
        let dispatcher = Dispatcher::new(registry(&data, &settings), Arc::clone(&sink))
            .with_config(DispatcherConfig::from(&settings.dispatch));

        let summary = dispatcher
            .run_selected(["bitstamp", "blockchaininfo_1m"])
            .await
            .unwrap();

        assert_eq!(summary.failed, 2);
        assert!(summary
            .outcomes
            .values()
            .all(|o| *o == CrawlOutcome::WriteFailed));
        assert_eq!(sink.metrics().failure_count, 2);
    }

    #[tokio::test]
    async fn test_selection_errors_launch_nothing() {
        let data = MockServer::start().await;
        let settings = CrawlerSettings::default();
        let sink = Arc::new(RecordingSink::default());

        let permissive = Dispatcher::new(registry(&data, &settings), Arc::clone(&sink));
        assert_eq!(
            permissive.run_selected(Vec::<String>::new()).await.unwrap_err(),
            DispatchError::NoSourcesSelected
        );
        let summary = permissive.run_selected(["nope"]).await.unwrap();
        assert_eq!((summary.launched, summary.skipped), (0, 1));

        let strict = Dispatcher::new(registry(&data, &settings), Arc::clone(&sink)).with_config(
            DispatcherConfig {
                reject_unknown: true,
                ..DispatcherConfig::default()
            },
        );
        assert!(matches!(
            strict.run_selected(["bitstamp", "nope"]).await,
            Err(DispatchError::UnknownSource { .. })
        ));
        assert!(data.received_requests().await.unwrap().is_empty());
    }
}
