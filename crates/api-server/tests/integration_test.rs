//! Integration tests for the API server
//!
//! These tests start the server with a fake document processor, send real
//! multipart requests over HTTP, and verify the normalized JSON responses.
//! No network dependency on the real document-understanding service.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat, RgbImage};
use tokio::time::sleep;

use id_doc_api_server::{start_server, ApiState};
use id_doc_docai::{
    BoundingPoly, DocAiError, Document, DocumentProcessor, Entity, NormalizedVertex, PageAnchor,
    PageRef, ProcessResponse, ProcessorRef,
};
use id_doc_extraction::{DocumentService, Processors};

/// Fake processor returning a canned response and counting calls
struct FakeProcessor {
    response: ProcessResponse,
    calls: AtomicUsize,
}

impl FakeProcessor {
    fn returning(response: ProcessResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DocumentProcessor for FakeProcessor {
    async fn process(
        &self,
        _processor: &ProcessorRef,
        _content: &[u8],
        _mime_type: &str,
    ) -> Result<ProcessResponse, DocAiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

fn processors() -> Processors {
    let processor = ProcessorRef {
        location: "us".to_string(),
        id: "fake".to_string(),
    };
    Processors {
        driver_license: processor.clone(),
        id_proofing: processor.clone(),
        passport: processor.clone(),
        patent: processor,
    }
}

fn state_with(fake: Arc<FakeProcessor>) -> ApiState {
    ApiState::with_service(DocumentService::new(fake, processors()))
}

async fn spawn_server(addr: &'static str, state: ApiState) {
    tokio::spawn(async move {
        start_server(addr, state)
            .await
            .expect("Failed to start server");
    });

    // Give the server time to bind
    sleep(Duration::from_millis(200)).await;
}

fn entity(entity_type: &str, mention: &str) -> Entity {
    Entity {
        entity_type: entity_type.to_string(),
        mention_text: Some(mention.to_string()),
        ..Default::default()
    }
}

fn portrait_entity() -> Entity {
    Entity {
        entity_type: "Portrait".to_string(),
        confidence: Some(0.98),
        page_anchor: Some(PageAnchor {
            page_refs: Some(vec![PageRef {
                page: Some("0".to_string()),
                bounding_poly: Some(BoundingPoly {
                    normalized_vertices: Some(vec![
                        NormalizedVertex::new(0.1, 0.1),
                        NormalizedVertex::new(0.9, 0.1),
                        NormalizedVertex::new(0.9, 0.9),
                        NormalizedVertex::new(0.1, 0.9),
                    ]),
                }),
            }]),
        }),
        ..Default::default()
    }
}

fn response_with(entities: Vec<Entity>) -> ProcessResponse {
    ProcessResponse {
        document: Some(Document {
            entities: Some(entities),
        }),
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn png_form(data: Vec<u8>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(data)
        .file_name("document.png")
        .mime_str("image/png")
        .unwrap();
    reqwest::multipart::Form::new().part("file", part)
}

#[tokio::test]
async fn test_health_endpoint() {
    let fake = FakeProcessor::returning(response_with(vec![]));
    spawn_server("127.0.0.1:19080", state_with(fake)).await;

    let client = reqwest::Client::new();
    let response = client
        .get("http://127.0.0.1:19080/health")
        .send()
        .await
        .expect("Failed to send health check request");

    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_driver_license_parse_with_portrait() {
    let fake = FakeProcessor::returning(response_with(vec![
        entity("Family Name", "SAMPLE"),
        entity("Given Names", "ALEX"),
        entity("Document Id", "D1234567"),
        portrait_entity(),
    ]));
    spawn_server("127.0.0.1:19081", state_with(fake.clone())).await;

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19081/countries/us/ids/driver-licenses/parse")
        .multipart(png_form(png_bytes(100, 200)))
        .send()
        .await
        .expect("Failed to send parse request");

    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["familyName"], "SAMPLE");
    assert_eq!(json["givenNames"], "ALEX");
    assert_eq!(json["documentId"], "D1234567");
    assert!(json["address"].is_null());
    assert!(json["expirationDate"].is_null());

    // Portrait cropped out of the 100x200 upload by the 0.1..0.9 polygon
    let encoded = json["portraitImage"].as_str().expect("portrait expected");
    let decoded = BASE64.decode(encoded).unwrap();
    let portrait = image::load_from_memory(&decoded).unwrap();
    assert_eq!(portrait.width(), 80);
    assert_eq!(portrait.height(), 160);

    assert_eq!(fake.call_count(), 1);
}

#[tokio::test]
async fn test_passport_parse() {
    let fake = FakeProcessor::returning(response_with(vec![
        entity("Family Name", "SAMPLE"),
        entity("MRZ Code", "P<USASAMPLE<<ALEX<<<<<<<"),
    ]));
    spawn_server("127.0.0.1:19082", state_with(fake)).await;

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19082/countries/us/ids/passports/parse")
        .multipart(png_form(png_bytes(50, 50)))
        .send()
        .await
        .expect("Failed to send parse request");

    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["mrzCode"], "P<USASAMPLE<<ALEX<<<<<<<");
    assert_eq!(json["familyName"], "SAMPLE");
    assert!(json["portraitImage"].is_null());
}

#[tokio::test]
async fn test_patent_parse() {
    let fake = FakeProcessor::returning(response_with(vec![
        entity("patent_number", "9876543"),
        entity("title_line_1", "SEMICONDUCTOR DEVICE"),
        entity("class_us", "257/613"),
    ]));
    spawn_server("127.0.0.1:19083", state_with(fake)).await;

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19083/countries/us/patents/parse")
        .multipart(png_form(png_bytes(50, 50)))
        .send()
        .await
        .expect("Failed to send parse request");

    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["patentNumber"], "9876543");
    assert_eq!(json["titleLine1"], "SEMICONDUCTOR DEVICE");
    assert_eq!(json["classUS"], "257/613");
    assert!(json["filingDate"].is_null());
}

#[tokio::test]
async fn test_id_proof_evidence_lists() {
    let fake = FakeProcessor::returning(response_with(vec![
        entity("fraud_signals_is_identity_document", "PASS"),
        entity("evidence_suspicious_word", "SPECIMEN"),
        entity("evidence_suspicious_word", "VOID"),
        entity("evidence_suspicious_word", "SAMPLE"),
    ]));
    spawn_server("127.0.0.1:19084", state_with(fake)).await;

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19084/countries/us/ids/id-proof")
        .multipart(png_form(png_bytes(50, 50)))
        .send()
        .await
        .expect("Failed to send id-proof request");

    assert_eq!(response.status(), 200);

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["fraudSignalsIsIdentityDocument"], "PASS");
    assert_eq!(
        json["evidenceSuspiciousWord"],
        serde_json::json!(["SPECIMEN", "VOID", "SAMPLE"])
    );
    assert_eq!(json["evidenceHostname"], serde_json::json!([]));
    assert!(json["fraudSignalsOnlineDuplicate"].is_null());
}

#[tokio::test]
async fn test_upload_without_files_is_client_error() {
    let fake = FakeProcessor::returning(response_with(vec![]));
    spawn_server("127.0.0.1:19085", state_with(fake.clone())).await;

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19085/countries/us/ids/driver-licenses/parse")
        .multipart(reqwest::multipart::Form::new())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert_eq!(fake.call_count(), 0, "processor must not be called");
}

#[tokio::test]
async fn test_upload_with_two_files_is_client_error() {
    let fake = FakeProcessor::returning(response_with(vec![]));
    spawn_server("127.0.0.1:19086", state_with(fake.clone())).await;

    let form = png_form(png_bytes(10, 10)).part(
        "second",
        reqwest::multipart::Part::bytes(png_bytes(10, 10))
            .file_name("second.png")
            .mime_str("image/png")
            .unwrap(),
    );

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19086/countries/us/ids/passports/parse")
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert_eq!(fake.call_count(), 0, "processor must not be called");
}

#[tokio::test]
async fn test_unsupported_content_type_is_client_error() {
    let fake = FakeProcessor::returning(response_with(vec![]));
    spawn_server("127.0.0.1:19087", state_with(fake.clone())).await;

    let part = reqwest::multipart::Part::bytes(vec![1, 2, 3])
        .file_name("document.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19087/countries/us/ids/driver-licenses/parse")
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert_eq!(fake.call_count(), 0, "processor must not be called");
}

#[tokio::test]
async fn test_missing_document_payload_maps_to_bad_gateway() {
    let fake = FakeProcessor::returning(ProcessResponse { document: None });
    spawn_server("127.0.0.1:19088", state_with(fake)).await;

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19088/countries/us/patents/parse")
        .multipart(png_form(png_bytes(10, 10)))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn test_portrait_without_polygon_maps_to_bad_gateway() {
    let broken_portrait = Entity {
        entity_type: "Portrait".to_string(),
        confidence: Some(0.9),
        page_anchor: Some(PageAnchor {
            page_refs: Some(vec![PageRef {
                page: Some("0".to_string()),
                bounding_poly: None,
            }]),
        }),
        ..Default::default()
    };
    let fake = FakeProcessor::returning(response_with(vec![broken_portrait]));
    spawn_server("127.0.0.1:19089", state_with(fake)).await;

    let client = reqwest::Client::new();
    let response = client
        .post("http://127.0.0.1:19089/countries/us/ids/driver-licenses/parse")
        .multipart(png_form(png_bytes(50, 50)))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 502);
}
