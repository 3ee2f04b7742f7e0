//! OpenAI-compatible enrichment client against a mock server

use crate::common::{RowFactory, fast_config, single_category};
use catalog_enricher::config::{Credential, EnrichmentConfig};
use catalog_enricher::core::traits::EnrichmentService;
use catalog_enricher::core::types::CategoryRef;
use catalog_enricher::services::HttpEnrichmentClient;
use catalog_enricher::storage::InMemoryCatalogStore;
use catalog_enricher::{Orchestrator, PipelineError};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpEnrichmentClient {
    HttpEnrichmentClient::new(EnrichmentConfig {
        api_base: format!("{}/v1", server.uri()),
        ..EnrichmentConfig::default()
    })
    .expect("client builds")
}

fn credential() -> Credential {
    Credential::new("primary", 60).with_api_key("sk-test")
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

#[tokio::test]
async fn test_translate_name_sends_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(chat_reply("\"Cordless drill\"\n"))
        .expect(1)
        .mount(&server)
        .await;

    let name = crate::assert_ok!(
        client(&server)
            .translate_name(&credential(), "Дрель аккумуляторная")
            .await
    );
    assert_eq!(name, "Cordless drill");
}

#[tokio::test]
async fn test_details_request_uses_json_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "response_format": { "type": "json_object" }
        })))
        .respond_with(chat_reply(
            r#"{"description": "Drills wood and metal.", "brand": "Acme", "unit": "pcs"}"#,
        ))
        .mount(&server)
        .await;

    let details = crate::assert_ok!(
        client(&server)
            .generate_details(
                &credential(),
                "Cordless drill",
                &CategoryRef::new("Drills", Some("Hardware")),
            )
            .await
    );
    assert_eq!(details.description, "Drills wood and metal.");
    assert_eq!(details.brand.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn test_image_url_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": "https://cdn.example.test/drill.png" }]
        })))
        .mount(&server)
        .await;

    let url = crate::assert_ok!(
        client(&server)
            .generate_image(&credential(), "Cordless drill", "Drills wood.")
            .await
    );
    assert_eq!(url, "https://cdn.example.test/drill.png");
}

#[tokio::test]
async fn test_error_status_becomes_enrichment_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = crate::assert_err!(
        client(&server)
            .translate_name(&credential(), "Drill")
            .await
    );
    assert!(matches!(err, PipelineError::Enrichment(_)));
    assert!(err.to_string().contains("HTTP 429"));
    assert!(err.is_row_level());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_calls_fall_back_per_field() {
    let server = MockServer::start().await;
    // Translation works, details fail; the row must still be imported
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(chat_reply("Translated item"))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryCatalogStore::new());
    let orchestrator = Orchestrator::new(
        fast_config(),
        vec![credential()],
        Arc::new(client(&server)),
        store.clone(),
        single_category(5),
    );

    let report = orchestrator.run(&RowFactory::products(2)).await;

    assert!(report.success, "{}", report.message);
    assert_eq!(report.imported, 2);
    let record = store.get("P1").expect("P1 committed");
    assert_eq!(record.name, "Translated item");
    assert_eq!(record.description, "Translated item from our Tools range.");
    assert_eq!(record.unit, "pcs");
    assert!(record.brand.is_none());
}
