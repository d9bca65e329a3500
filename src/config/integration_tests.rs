// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use crate::config::{
        load_and_validate_config, OutputFormat, PipelineKind, RuntimeBuilder, SourceConfig,
    };
    use crate::errors::{ConfigError, PipelineError, ValidationError};
    use crate::functions::{is_prime, FilterKind};
    use crate::engine::PipelineContext;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::Builder;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// The bundled sample configurations all load and validate
    #[test]
    fn test_bundled_configs_load() {
        let config = load_and_validate_config("configs/primes-fan-out.yaml").unwrap();
        assert_eq!(config.pipeline, PipelineKind::FanOutFanIn);
        assert_eq!(config.source, SourceConfig::Random { max: 500_000_000 });
        assert_eq!(config.filter, FilterKind::Prime);
        assert_eq!(config.take, Some(10));

        let config = load_and_validate_config("configs/primes-naive.yaml").unwrap();
        assert_eq!(config.pipeline, PipelineKind::Naive);

        let config = load_and_validate_config("configs/squares.toml").unwrap();
        assert_eq!(config.pipeline, PipelineKind::Squares);
        assert_eq!(config.output, OutputFormat::Json);

        let config = load_and_validate_config("configs/evens.yaml").unwrap();
        assert_eq!(config.source, SourceConfig::Counter { start: 0 });

        let config = load_and_validate_config("configs/ticker.yaml").unwrap();
        assert_eq!(config.source, SourceConfig::Ticker { interval_ms: 100 });
    }

    /// Every validation problem surfaces through the loader
    #[test]
    fn test_invalid_config_reports_all_problems() {
        let file = write_config(
            ".yaml",
            r#"
pipeline: fan_out_fan_in
source:
  kind: cycle
  start: 10
  end: 10
options:
  fan_out_width: 0
"#,
        );

        match load_and_validate_config(file.path()) {
            Err(ConfigError::Invalid(problems)) => assert_eq!(
                problems,
                vec![
                    ValidationError::ZeroFanOutWidth,
                    ValidationError::EmptyCycleRange { start: 10, end: 10 },
                    ValidationError::UnboundedSource { source: "cycle" },
                ]
            ),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml_and_toml() {
        let yaml = write_config(".yml", "pipeline: [not, a, kind]\n");
        assert!(matches!(
            load_and_validate_config(yaml.path()),
            Err(ConfigError::Yaml(_))
        ));

        let toml = write_config(".toml", "pipeline = \n");
        assert!(matches!(
            load_and_validate_config(toml.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_and_validate_config("configs/does-not-exist.yaml"),
            Err(ConfigError::Io(_))
        ));
    }

    /// Load a config from disk, build its runtime, and run it end to end
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_config_to_report() {
        let file = write_config(
            ".yaml",
            r#"
name: small_primes
pipeline: fan_out_fan_in
source:
  kind: cycle
  start: 1
  end: 100
filter: prime
take: 10
options:
  fan_out_width: 3
  timeout_ms: 5000
"#,
        );

        let config = load_and_validate_config(file.path()).unwrap();
        let runtime = RuntimeBuilder::from_config(&config);
        let report = runtime.run().await.unwrap();

        assert_eq!(report.pipeline, "small_primes");
        assert_eq!(report.runner, "fan_out_fan_in");
        assert_eq!(report.values.len(), 10);
        assert!(report.values.iter().all(|n| is_prime(*n) && *n < 100));
    }

    #[tokio::test]
    async fn test_toml_squares_to_json() {
        let file = write_config(
            ".toml",
            r#"
pipeline = "squares"
output = "json"

[source]
kind = "values"
values = [2, 3, 4, 7, 1]
"#,
        );

        let config = load_and_validate_config(file.path()).unwrap();
        let runtime = RuntimeBuilder::from_config(&config);
        let report = runtime.run().await.unwrap();
        assert_eq!(report.values, vec![4, 9, 16, 49, 1]);

        let rendered = report.render(runtime.output()).unwrap();
        assert!(rendered.contains("\"runner\": \"squares\""));
    }

    #[tokio::test]
    async fn test_external_cancel_through_runtime() {
        let file = write_config(
            ".yaml",
            r#"
pipeline: naive
source:
  kind: cycle
  start: 1
  end: 2
filter: even
take: 1
"#,
        );

        let config = load_and_validate_config(file.path()).unwrap();
        let runtime = RuntimeBuilder::from_config(&config);
        let ctx = PipelineContext::new(runtime.name());

        let canceller = {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                ctx.cancel("signal");
            })
        };

        let result = runtime.run_with(&ctx).await;
        canceller.await.unwrap();

        assert!(matches!(
            result,
            Err(PipelineError::Cancelled {
                reason: "signal",
                ..
            })
        ));
        assert_eq!(ctx.live_workers(), 0);
    }
}
