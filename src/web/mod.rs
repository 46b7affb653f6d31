//! HTTP runtime for the dashboard.
//!
//! The page is generated from `Dashboard::layout()`. Its script reports every
//! selector change to `/_dash-update-component`, which runs the bound
//! callbacks and answers with the updates to apply. Chart children come back
//! with their SVG already rendered.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::domain::{ChartDescriptor, ChartSet, SelectionState};
use crate::error::AppError;
use crate::render::render_svg;
use crate::shell::{ComponentId, Dashboard, Property, TITLE, Update, UpdateValue};

mod page;

pub use page::render_page;

/// Pixel size of each rendered chart.
pub const CHART_SIZE: (u32, u32) = (640, 420);

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

/// Selector round-trip sent by the page.
///
/// Selector values stay untyped JSON: a year may arrive as `2005` or
/// `"2005"`, and whatever cannot be read as text counts as unset.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    /// DOM id of the selector that changed; `null` on first load.
    #[serde(default)]
    pub changed: Option<String>,
    #[serde(default)]
    pub report: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
}

/// Raw selector text for a JSON value.
fn selector_value(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub updates: Vec<UpdatePayload>,
}

#[derive(Debug, Serialize)]
pub struct UpdatePayload {
    pub component: ComponentId,
    pub property: Property,
    pub value: PayloadValue,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Disabled(bool),
    Children { rows: Vec<Vec<RenderedChart>> },
}

#[derive(Debug, Serialize)]
pub struct RenderedChart {
    pub chart: ChartDescriptor,
    pub svg: String,
}

enum WebError {
    BadRequest(String),
    Internal(AppError),
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        WebError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WebError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            WebError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<AppError> for WebError {
    fn from(err: AppError) -> Self {
        WebError::Internal(err)
    }
}

/// Routes with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/_dash-layout", get(layout))
        .route("/_dash-update-component", post(update_component))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C. Builds its own runtime so the blocking dataset load
/// can finish before any async machinery starts.
pub fn serve(dashboard: Dashboard, bind: SocketAddr) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::runtime(format!("Failed to start async runtime: {e}")))?;

    let state = AppState {
        dashboard: Arc::new(dashboard),
    };
    runtime.block_on(run_server(state, bind))
}

async fn run_server(state: AppState, bind: SocketAddr) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| AppError::runtime(format!("Failed to bind {bind}: {e}")))?;

    info!(addr = %bind, "dashboard listening on http://{bind}/");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::runtime(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(TITLE, &state.dashboard.layout()))
}

async fn layout(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.layout())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn update_component(
    State(state): State<AppState>,
    request: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, WebError> {
    let Json(request) = request?;
    let changed = match request.changed.as_deref() {
        None => None,
        Some(raw) => Some(
            ComponentId::parse(raw)
                .ok_or_else(|| WebError::BadRequest(format!("unknown component '{raw}'")))?,
        ),
    };

    let selection = SelectionState {
        report: selector_value(request.report),
        year: selector_value(request.year),
    };

    // Aggregation and SVG rendering are CPU-bound; keep them off the async workers.
    let dashboard = Arc::clone(&state.dashboard);
    let updates = tokio::task::spawn_blocking(move || {
        dashboard
            .dispatch(&selection, changed)
            .into_iter()
            .map(to_payload)
            .collect::<Result<Vec<_>, _>>()
    })
    .await
    .map_err(|e| AppError::runtime(format!("Update task failed: {e}")))??;

    Ok(Json(UpdateResponse { updates }))
}

fn to_payload(update: Update) -> Result<UpdatePayload, AppError> {
    let value = match update.value {
        UpdateValue::Disabled(disabled) => PayloadValue::Disabled(disabled),
        UpdateValue::Children(set) => PayloadValue::Children {
            rows: render_rows(set)?,
        },
    };
    Ok(UpdatePayload {
        component: update.target.component,
        property: update.target.property,
        value,
    })
}

fn render_rows(set: ChartSet) -> Result<Vec<Vec<RenderedChart>>, AppError> {
    let mut rows: Vec<Vec<RenderedChart>> = Vec::new();
    for (idx, chart) in set.charts.into_iter().enumerate() {
        let svg = render_svg(&chart, CHART_SIZE)?;
        if idx % ChartSet::PER_ROW == 0 {
            rows.push(Vec::with_capacity(ChartSet::PER_ROW));
        }
        if let Some(row) = rows.last_mut() {
            row.push(RenderedChart { chart, svg });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::testutil::sample_table;

    fn app() -> Router {
        router(AppState {
            dashboard: Arc::new(Dashboard::new(Arc::new(sample_table()))),
        })
    }

    async fn post_update(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/_dash-update-component")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn index_serves_page() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Automobile Sales Statistics Dashboard"));
        assert!(html.contains("/_dash-update-component"));
    }

    #[tokio::test]
    async fn layout_is_json_tree() {
        let response = app()
            .oneshot(Request::builder().uri("/_dash-layout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let tree: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tree["type"], "page");
        assert_eq!(tree["children"][0]["type"], "heading");
        assert_eq!(tree["children"][2]["children"][1]["id"], "select-year");
        assert_eq!(tree["children"][2]["children"][1]["disabled"], true);
    }

    #[tokio::test]
    async fn initial_render_returns_both_updates() {
        let (status, body) =
            post_update(serde_json::json!({ "changed": null, "report": null, "year": null })).await;
        assert_eq!(status, StatusCode::OK);
        let updates = body["updates"].as_array().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0]["component"], "select-year");
        assert_eq!(updates[0]["property"], "disabled");
        assert_eq!(updates[0]["value"], true);
        assert_eq!(updates[1]["component"], "output-container");
        assert_eq!(updates[1]["value"]["rows"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn yearly_selection_renders_two_rows_of_svg() {
        let (status, body) = post_update(serde_json::json!({
            "changed": "select-year",
            "report": "Yearly Statistics",
            "year": "2005",
        }))
        .await;
        assert_eq!(status, StatusCode::OK);

        let updates = body["updates"].as_array().unwrap();
        assert_eq!(updates.len(), 1);
        let rows = updates[0]["value"]["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            let cells = row.as_array().unwrap();
            assert_eq!(cells.len(), 2);
            for cell in cells {
                assert!(cell["svg"].as_str().unwrap().contains("<svg"));
            }
        }
        assert_eq!(rows[1][0]["chart"]["title"], "Avg Vehicles Sold by Type in 2005");
    }

    #[tokio::test]
    async fn report_change_enables_year_selector() {
        let (_, body) = post_update(serde_json::json!({
            "changed": "dropdown-statistics",
            "report": "Yearly Statistics",
        }))
        .await;
        let updates = body["updates"].as_array().unwrap();
        assert_eq!(updates[0]["value"], false);
        assert_eq!(updates[1]["value"]["rows"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn numeric_year_is_accepted() {
        let (status, body) = post_update(serde_json::json!({
            "changed": "select-year",
            "report": "Yearly Statistics",
            "year": 2005,
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["updates"][0]["value"]["rows"].as_array().unwrap();
        let charts: usize = rows.iter().map(|r| r.as_array().unwrap().len()).sum();
        assert_eq!(charts, 4);
        assert_eq!(rows[1][0]["chart"]["title"], "Avg Vehicles Sold by Type in 2005");
    }

    #[tokio::test]
    async fn unreadable_year_means_no_charts() {
        for year in [serde_json::json!({}), serde_json::json!([2005]), serde_json::json!(true)] {
            let (status, body) = post_update(serde_json::json!({
                "changed": "select-year",
                "report": "Yearly Statistics",
                "year": year,
            }))
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["updates"][0]["value"]["rows"].as_array().map(Vec::len), Some(0));
        }
    }

    #[tokio::test]
    async fn malformed_body_reports_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/_dash-update-component")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[test]
    fn selector_values_coerce_to_text() {
        assert_eq!(selector_value(Some(serde_json::json!(2005))), Some("2005".to_string()));
        assert_eq!(selector_value(Some(serde_json::json!(2005.0))), Some("2005".to_string()));
        assert_eq!(selector_value(Some(serde_json::json!("2005"))), Some("2005".to_string()));
        assert_eq!(selector_value(Some(serde_json::json!(null))), None);
        assert_eq!(selector_value(Some(serde_json::json!({}))), None);
        assert_eq!(selector_value(None), None);
    }

    #[tokio::test]
    async fn unknown_component_is_bad_request() {
        let (status, body) = post_update(serde_json::json!({ "changed": "nope" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }
}
