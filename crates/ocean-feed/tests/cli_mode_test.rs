/*
[INPUT]:  Mock REST server and a generated YAML config file
[OUTPUT]: Binary behavior verification for one-shot query commands
[POS]:    Integration test layer - CLI mode
[UPDATE]: When changing subcommands or config loading
*/

use std::path::PathBuf;

use serde_json::{Value, json};
use tokio::process::Command;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(name: &str, api_url: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ocean-feed-{}-{name}.yaml", std::process::id()));
    let content = format!("network: kovan\napi_url: \"{api_url}\"\nrequest_timeout_secs: 5\n");
    std::fs::write(&path, content).expect("write config");
    path
}

async fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ocean-feed"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .await
        .expect("Failed to start ocean-feed binary")
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_pairs_prints_backend_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/token_pairs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"baseToken": {"address": "0xAAA"}, "quoteToken": {"address": "0xBBB"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config("pairs", &server.uri());
    let config_arg = config.to_string_lossy().to_string();
    let output = run(&["--config", &config_arg, "--log-level", "error", "pairs"]).await;
    let _ = std::fs::remove_file(&config);

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let printed: Value = assert_ok!(serde_json::from_slice(&output.stdout));
    assert_eq!(printed[0]["baseToken"]["address"], "0xAAA");
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_order_book_forwards_pair_and_depth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/order_book"))
        .and(query_param("baseTokenAddress", "0xAAA"))
        .and(query_param("quoteTokenAddress", "0xBBB"))
        .and(query_param("depth", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bids": [], "asks": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config("order-book", &server.uri());
    let config_arg = config.to_string_lossy().to_string();
    let output = run(&[
        "--config", &config_arg, "--log-level", "error", "order-book", "--base", "0xAAA", "--quote",
        "0xBBB", "--depth", "5",
    ])
    .await;
    let _ = std::fs::remove_file(&config);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let printed: Value = assert_ok!(serde_json::from_slice(&output.stdout));
    assert_eq!(printed, json!({"bids": [], "asks": []}));
}

#[tokio::test(flavor = "multi_thread")]
async fn cli_reports_backend_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = write_config("tickers", &server.uri());
    let config_arg = config.to_string_lossy().to_string();
    let output = run(&["--config", &config_arg, "--log-level", "error", "tickers"]).await;
    let _ = std::fs::remove_file(&config);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn cli_watch_rejects_separator_in_address() {
    let output = run(&["watch", "--channel", "ticker", "--base", "0x_A", "--quote", "0xBBB"]).await;
    assert!(!output.status.success());
}
