//! Batch runs over a ranked CSV with mock domains.

use std::fs;
use std::time::Duration;

use favicon_finder::run::{run_batch, runtime_log_path, worker_csv_path, worker_log_path};
use favicon_finder::{Config, ResolverConfig};
use regex::Regex;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn favicon_domain() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/x-icon")
                .set_body_bytes(vec![0u8; 1150]),
        )
        .mount(&server)
        .await;
    server
}

async fn slow_domain() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/x-icon")
                .set_body_bytes(vec![0u8; 1150])
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><head></head></html>"))
        .mount(&server)
        .await;
    server
}

fn config_for(dir: &TempDir, rows: &str) -> Config {
    let input_csv = dir.path().join("top-1m.csv");
    fs::write(&input_csv, rows).expect("Failed to write input CSV");
    Config {
        input_csv,
        output_dir: dir.path().join("output"),
        log_file: dir.path().join("output").join("app.log"),
        resolver: ResolverConfig {
            scheme: "http".to_string(),
            probe_timeout: Duration::from_millis(300),
            html_connect_timeout: Duration::from_millis(500),
            html_timeout: Duration::from_secs(1),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_batch_isolates_a_timed_out_domain() {
    let first = favicon_domain().await;
    let second = slow_domain().await;
    let third = favicon_domain().await;

    let dir = TempDir::new().expect("Failed to create temp directory");
    let rows = format!(
        "1,{}\n2,{}\n3,{}\n",
        first.address(),
        second.address(),
        third.address()
    );
    let config = config_for(&dir, &rows);

    let report = run_batch(&config, 1, Some(3))
        .await
        .expect("batch should complete");
    assert_eq!(report.processed, 3);
    assert_eq!(report.found, 2);
    assert_eq!(report.total_errors(), 1);

    let csv = fs::read_to_string(worker_csv_path(&config.output_dir, 1))
        .expect("result file should exist");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("1,{},{}/favicon.ico", first.address(), first.uri()),
            format!("2,{},", second.address()),
            format!("3,{},{}/favicon.ico", third.address(), third.uri()),
        ]
    );

    let errors = fs::read_to_string(worker_log_path(&config.output_dir, 1))
        .expect("error log should exist");
    assert_eq!(errors.lines().count(), 1, "unexpected error log: {errors}");

    let runtime = fs::read_to_string(runtime_log_path(&config.output_dir))
        .expect("runtime log should exist");
    let re = Regex::new(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] start:1, offset:3 completed in \d+s\.$")
        .unwrap();
    assert_eq!(runtime.lines().count(), 1);
    assert!(re.is_match(runtime.trim_end()), "unexpected runtime line: {runtime}");
}

#[tokio::test]
async fn test_rerun_overwrites_results_and_appends_runtime_log() {
    let server = favicon_domain().await;
    let dir = TempDir::new().expect("Failed to create temp directory");
    let rows = format!("1,skipped.example\n2,{}\n", server.address());
    let config = config_for(&dir, &rows);

    for _ in 0..2 {
        run_batch(&config, 2, Some(10))
            .await
            .expect("batch should complete");
    }

    let csv = fs::read_to_string(worker_csv_path(&config.output_dir, 2)).unwrap();
    assert_eq!(
        csv,
        format!("2,{},{}/favicon.ico\n", server.address(), server.uri())
    );

    let runtime = fs::read_to_string(runtime_log_path(&config.output_dir)).unwrap();
    let lines: Vec<&str> = runtime.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.ends_with("start:2, offset:10 completed in 0s.")));
}

#[tokio::test]
async fn test_offset_defaults_to_batch_size() {
    let server = favicon_domain().await;
    let dir = TempDir::new().expect("Failed to create temp directory");
    let rows = format!(
        "1,{0}\n2,{0}\n3,{0}\n",
        server.address()
    );
    let mut config = config_for(&dir, &rows);
    config.batch_size = 2;

    let report = run_batch(&config, 1, None).await.unwrap();
    assert_eq!(report.offset, 2);
    assert_eq!(report.processed, 2);
}
