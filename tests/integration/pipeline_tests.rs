//! End-to-end tests for the extraction pipeline
//!
//! A wiremock server plays the documentation site (and, where needed, the
//! model endpoints) so the whole crawl → parse → analyze chain runs offline.

use docsift::config::{load_config, Config};
use docsift::output::{generate_json, parse_json};
use docsift::{DocsiftError, Pipeline};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GETTING_STARTED: &str = r#"<html>
<head><title>Getting Started</title></head>
<body>
  <h2>Installation</h2>
  <p>Installation includes downloading, configuring, and testing the package.</p>
</body>
</html>"#;

fn offline_config() -> Config {
    let mut config = Config::default();
    config.crawler.request_timeout_secs = 5;
    config.cache.enabled = false;
    config
}

async fn docs_site() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(GETTING_STARTED)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_getting_started_scenario() {
    let server = docs_site().await;
    let pipeline = Pipeline::from_config(offline_config()).unwrap();

    let report = pipeline.run(&server.uri()).await.unwrap();

    assert_eq!(report.pages_crawled, 1);
    let names: Vec<&str> = report.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Getting Started", "Installation"]);

    let installation = &report.modules[1];
    assert_eq!(
        installation.submodules.names().collect::<Vec<_>>(),
        vec!["Downloading", "Configuring", "Testing The Package"]
    );
    for module in &report.modules {
        assert!((0.5..=1.0).contains(&module.confidence_score));
        assert!(module.description.chars().count() <= 500);
        for (_, description) in module.submodules.iter() {
            assert!(description.chars().count() <= 200);
        }
    }

    // the title outranks headings
    assert!(report.modules[0].confidence_score > installation.confidence_score);
}

#[tokio::test]
async fn test_json_round_trip() {
    let server = docs_site().await;
    let pipeline = Pipeline::from_config(offline_config()).unwrap();
    let report = pipeline.run(&server.uri()).await.unwrap();

    let json = generate_json(&report.modules, true, &report.extracted_at).unwrap();
    assert_eq!(parse_json(&json).unwrap(), report.modules);
}

#[tokio::test]
async fn test_seed_without_scheme_gets_https() {
    let pipeline = Pipeline::from_config(offline_config()).unwrap();
    // nothing listens on port 9, so the crawl comes back empty
    let result = pipeline.run("127.0.0.1:9/docs").await;

    match result {
        Err(DocsiftError::EmptyCrawl { url }) => assert_eq!(url, "https://127.0.0.1:9/docs"),
        other => panic!("expected an empty crawl, got {:?}", other.map(|r| r.modules)),
    }
}

#[tokio::test]
async fn test_not_found_seed_is_empty_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let pipeline = Pipeline::from_config(offline_config()).unwrap();
    let result = pipeline.run(&server.uri()).await;
    assert!(matches!(result, Err(DocsiftError::EmptyCrawl { .. })));
}

#[tokio::test]
async fn test_llm_descriptions_from_config() {
    let site = docs_site().await;
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"choices":[{"message":{"role":"assistant","content":"Generated description."}}]}"#,
        ))
        .mount(&model)
        .await;

    let key_var = "DOCSIFT_TEST_LLM_KEY";
    std::env::set_var(key_var, "test-key");

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[cache]
enabled = false

[llm]
enabled = true
base-url = "{}"
api-key-env = "{}"
"#,
        model.uri(),
        key_var
    )
    .unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).unwrap();
    let pipeline = Pipeline::from_config(config).unwrap();
    let report = pipeline.run(&site.uri()).await.unwrap();

    assert!(report
        .modules
        .iter()
        .all(|m| m.description == "Generated description."));
    // submodules never come from the model
    assert_eq!(report.modules[1].submodules.len(), 3);
}

#[tokio::test]
async fn test_llm_failure_falls_back_to_heuristic() {
    let site = docs_site().await;
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&model)
        .await;

    let key_var = "DOCSIFT_TEST_FAILING_LLM_KEY";
    std::env::set_var(key_var, "test-key");

    let mut config = offline_config();
    config.llm.enabled = true;
    config.llm.base_url = model.uri();
    config.llm.api_key_env = key_var.to_string();

    let pipeline = Pipeline::from_config(config).unwrap();
    let report = pipeline.run(&site.uri()).await.unwrap();

    assert!(report.modules[1]
        .description
        .starts_with("Installation: Installation includes"));
}
