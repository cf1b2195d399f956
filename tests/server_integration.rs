//! Router-level tests: pages, form handling and health probe.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request, StatusCode, header};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use ofitec_web::AppState;
use ofitec_web::client::ImportApi;
use ofitec_web::config::AppConfig;
use ofitec_web::error::ImportError;
use ofitec_web::server::build_router;
use ofitec_web::upload::SelectedFile;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Stand-in for the import API: records calls, answers with a canned result.
struct FakeApi {
    calls: Mutex<Vec<(String, SelectedFile)>>,
    reply: fn() -> Result<Value, ImportError>,
}

impl FakeApi {
    fn replying(reply: fn() -> Result<Value, ImportError>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply,
        })
    }

    fn calls(&self) -> Vec<(String, SelectedFile)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImportApi for FakeApi {
    async fn import_excel(
        &self,
        project_name: &str,
        file: &SelectedFile,
    ) -> Result<Value, ImportError> {
        self.calls
            .lock()
            .unwrap()
            .push((project_name.to_string(), file.clone()));
        (self.reply)()
    }
}

fn ok_reply() -> Result<Value, ImportError> {
    Ok(json!({"status": "ok", "rows": 3}))
}

fn server_with(api: Arc<FakeApi>) -> TestServer {
    let state = AppState {
        importer: api,
        config: Arc::new(AppConfig::default()),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn hx_request() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("hx-request"),
        HeaderValue::from_static("true"),
    )
}

fn spreadsheet_form(project: &str, file_name: &'static str, data: &'static [u8]) -> MultipartForm {
    MultipartForm::new()
        .add_text("project_name", project.to_string())
        .add_part(
            "file",
            Part::bytes(data).file_name(file_name).mime_type(XLSX),
        )
}

#[tokio::test]
async fn index_renders_shell_with_form() {
    let server = server_with(FakeApi::replying(ok_reply));

    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();

    assert_eq!(html.matches("<header").count(), 1);
    let header = html.find(">OFITEC</header>").unwrap();
    let form = html.find(r#"<form id="upload-form""#).unwrap();
    assert!(header < form);
    assert!(html.contains(r#"value="Proyecto Demo""#));
    assert!(html.contains("<title>OFITEC</title>"));
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server_with(FakeApi::replying(ok_reply));

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"status": "ok"}));
}

#[tokio::test]
async fn submit_without_file_is_a_silent_no_op() {
    let api = FakeApi::replying(ok_reply);
    let server = server_with(Arc::clone(&api));

    let form = MultipartForm::new().add_text("project_name", "Obra Norte");
    let (name, value) = hx_request();
    let response = server
        .post("/imports/excel")
        .add_header(name, value)
        .multipart(form)
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn empty_file_input_counts_as_no_selection() {
    let api = FakeApi::replying(ok_reply);
    let server = server_with(Arc::clone(&api));

    let form = MultipartForm::new()
        .add_text("project_name", "Obra Norte")
        .add_part(
            "file",
            Part::bytes(Vec::<u8>::new())
                .file_name("")
                .mime_type("application/octet-stream"),
        );
    let response = server.post("/imports/excel").multipart(form).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn htmx_submit_returns_dialog_fragment() {
    let api = FakeApi::replying(ok_reply);
    let server = server_with(Arc::clone(&api));

    let (name, value) = hx_request();
    let response = server
        .post("/imports/excel")
        .add_header(name, value)
        .multipart(spreadsheet_form("Obra Norte", "budget.xlsx", b"PK"))
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.starts_with("<dialog"));
    assert!(!html.contains("<header"));
    assert!(html.contains("{&quot;status&quot;:&quot;ok&quot;,&quot;rows&quot;:3}"));

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "Obra Norte");
    assert_eq!(calls[0].1.name(), "budget.xlsx");
    assert_eq!(calls[0].1.data(), b"PK");
    assert_eq!(calls[0].1.mime_type(), XLSX);
}

#[tokio::test]
async fn plain_submit_returns_full_page_with_dialog() {
    let api = FakeApi::replying(ok_reply);
    let server = server_with(Arc::clone(&api));

    let response = server
        .post("/imports/excel")
        .multipart(spreadsheet_form("Obra Sur", "budget.xlsx", b"PK"))
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert_eq!(html.matches("<header").count(), 1);
    assert!(html.contains(r#"value="Obra Sur""#));
    assert!(html.contains(r#"<dialog id="import-result""#));
}

#[tokio::test]
async fn later_file_field_replaces_earlier_one() {
    let api = FakeApi::replying(ok_reply);
    let server = server_with(Arc::clone(&api));

    let form = spreadsheet_form("Obra", "a.xlsx", b"first").add_part(
        "file",
        Part::bytes(b"second".as_slice())
            .file_name("b.xlsx")
            .mime_type(XLSX),
    );
    let response = server.post("/imports/excel").multipart(form).await;

    response.assert_status_ok();
    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.name(), "b.xlsx");
    assert_eq!(calls[0].1.data(), b"second");
}

#[tokio::test]
async fn missing_project_name_keeps_default() {
    let api = FakeApi::replying(ok_reply);
    let server = server_with(Arc::clone(&api));

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"PK".as_slice())
            .file_name("budget.xlsx")
            .mime_type(XLSX),
    );
    server
        .post("/imports/excel")
        .multipart(form)
        .await
        .assert_status_ok();

    assert_eq!(api.calls()[0].0, "Proyecto Demo");
}

#[tokio::test]
async fn remote_failure_renders_error_dialog() {
    let api = FakeApi::replying(|| {
        Err(ImportError::Api {
            status: 500,
            body: "Internal Server Error".to_string(),
        })
    });
    let server = server_with(Arc::clone(&api));

    let (name, value) = hx_request();
    let response = server
        .post("/imports/excel")
        .add_header(name, value)
        .multipart(spreadsheet_form("Obra", "budget.xlsx", b"PK"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let html = response.text();
    assert!(html.contains("Error en la importación"));
    assert!(html.contains("API error (500): Internal Server Error"));
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_reaching_the_api() {
    let api = FakeApi::replying(ok_reply);
    let mut config = AppConfig::default();
    config.server.max_upload_bytes = 64;
    let state = AppState {
        importer: Arc::clone(&api) as Arc<dyn ImportApi>,
        config: Arc::new(config),
    };

    let mut body = String::from(
        "--BOUNDARY\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"big.xlsx\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n",
    );
    body.push_str(&"x".repeat(4096));
    body.push_str("\r\n--BOUNDARY--\r\n");

    let request = Request::builder()
        .method("POST")
        .uri("/imports/excel")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
        .body(Body::from(body))
        .unwrap();

    let response = build_router(state).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(api.calls().is_empty());
}
