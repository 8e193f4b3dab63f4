use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::clock::Clock;
use super::compliance::display_text;
use super::domain::{Issue, SlaConfigError, SlaConfiguration};
use super::engine::SlaEngine;
use super::import::IssueLogImporter;

#[derive(Debug, Deserialize)]
pub struct IssueSlaRequest {
    pub issue: Issue,
    #[serde(default)]
    pub config: Option<SlaConfiguration>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ComplianceRequest {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub issues_csv: Option<String>,
    #[serde(default)]
    pub config: Option<SlaConfiguration>,
    #[serde(default)]
    pub target_hours: Option<u32>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DisplayRequest {
    pub compliance_rate: f64,
    pub target_hours: u32,
}

/// Router builder exposing SLA evaluation endpoints.
pub fn sla_router<C>(engine: Arc<SlaEngine<C>>) -> Router
where
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/issues/sla", post(issue_sla_handler::<C>))
        .route(
            "/api/v1/agencies/compliance",
            post(agency_compliance_handler::<C>),
        )
        .route("/api/v1/compliance/display", post(display_handler))
        .with_state(engine)
}

fn engine_for<C: Clock>(
    engine: &SlaEngine<C>,
    config: Option<SlaConfiguration>,
) -> Result<SlaEngine<C>, SlaConfigError> {
    match config {
        Some(config) => {
            config.validate()?;
            Ok(engine.with_config(config))
        }
        None => Ok(engine.clone()),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn issue_sla_handler<C>(
    State(engine): State<Arc<SlaEngine<C>>>,
    Json(request): Json<IssueSlaRequest>,
) -> Response
where
    C: Clock + 'static,
{
    let engine = match engine_for(&engine, request.config) {
        Ok(engine) => engine,
        Err(error) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
    };

    let now = request.now.unwrap_or_else(|| engine.now());
    let snapshot = engine.evaluate_at(&request.issue, now);
    debug!(
        issue = %snapshot.issue_id,
        priority = %snapshot.priority,
        overdue = snapshot.overdue,
        "evaluated issue SLA"
    );

    (StatusCode::OK, Json(snapshot)).into_response()
}

pub(crate) async fn agency_compliance_handler<C>(
    State(engine): State<Arc<SlaEngine<C>>>,
    Json(request): Json<ComplianceRequest>,
) -> Response
where
    C: Clock + 'static,
{
    let ComplianceRequest {
        mut issues,
        issues_csv,
        config,
        target_hours,
        now,
    } = request;

    let engine = match engine_for(&engine, config) {
        Ok(engine) => engine,
        Err(error) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
    };

    if let Some(csv) = issues_csv {
        match IssueLogImporter::from_reader(Cursor::new(csv.into_bytes())) {
            Ok(imported) => issues.extend(imported),
            Err(error) => {
                warn!(%error, "rejected issue CSV");
                return error_response(StatusCode::BAD_REQUEST, error.to_string());
            }
        }
    }

    let now = now.unwrap_or_else(|| engine.now());
    let target_hours = target_hours.unwrap_or(engine.config().emergency_response_hours);
    let snapshot = engine.compliance_at(&issues, target_hours, now);
    debug!(
        issues = issues.len(),
        compliance_rate = snapshot.compliance_rate,
        "computed agency compliance"
    );

    (StatusCode::OK, Json(snapshot)).into_response()
}

pub(crate) async fn display_handler(Json(request): Json<DisplayRequest>) -> Response {
    let display = display_text(request.compliance_rate, request.target_hours);
    (StatusCode::OK, Json(display)).into_response()
}
