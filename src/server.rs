use anyhow::Context;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::{info, warn};

use crate::AppState;
use crate::client::HttpImportClient;
use crate::config::AppConfig;
use crate::layout::render_page;
use crate::upload::view::FORM_ACTION;
use crate::upload::{UploadForm, render_error_dialog, render_form, render_result_dialog};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let base_url = config
        .api_base()
        .context("Missing import API base URL (set NEXT_PUBLIC_API_BASE or api.base_url)")?;

    let importer = HttpImportClient::new(base_url, Duration::from_secs(config.api.timeout_secs))?;

    info!(
        name: "api.config.loaded",
        endpoint = %importer.endpoint(),
        timeout_secs = config.api.timeout_secs,
        "Import API configured"
    );

    let state = AppState {
        importer: Arc::new(importer),
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the router: pages, form endpoint, health probe and static assets.
pub fn build_router(state: AppState) -> Router {
    // A disabled timeout is a very long one, so the layer stack keeps one type.
    let timeout_duration = if state.config.server.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60) // 1 year
    } else {
        Duration::from_secs(state.config.server.timeout_secs)
    };

    Router::new()
        .route("/", get(index_handler))
        .route(FORM_ACTION, post(import_excel_handler))
        .route("/health", get(health_handler))
        .nest_service("/static", ServeDir::new(&state.config.server.static_dir))
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Upload page.
async fn index_handler() -> Html<String> {
    Html(render_page(&render_form(&UploadForm::new(), "")))
}

/// POST /imports/excel - Forward the browser form to the import API.
///
/// HTMX requests get the dialog fragment; plain form posts get the whole
/// page with the dialog open. Without a file nothing is sent and the answer
/// is `204 No Content`.
async fn import_excel_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let htmx = is_htmx_request(&headers);

    let form = match UploadForm::from_multipart(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(name: "import.form.invalid", error = %e, "Unreadable form submission");
            return dialog_response(
                htmx,
                &UploadForm::new(),
                e.status_code(),
                &render_error_dialog(&e),
            );
        }
    };

    match form.submit(state.importer.as_ref()).await {
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Ok(Some(outcome)) => dialog_response(
            htmx,
            &form,
            StatusCode::OK,
            &render_result_dialog(&outcome),
        ),
        Err(e) => dialog_response(htmx, &form, e.status_code(), &render_error_dialog(&e)),
    }
}

fn dialog_response(htmx: bool, form: &UploadForm, status: StatusCode, dialog: &str) -> Response {
    let body = if htmx {
        dialog.to_string()
    } else {
        render_page(&render_form(form, dialog))
    };
    (status, Html(body)).into_response()
}

fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /health - Liveness probe.
async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
