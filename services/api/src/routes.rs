use crate::infra::{AppState, CarbonView, ProfileView};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post, put};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use esg_auditor::assessment::{
    Answer, Assessment, DiagnosticRecord, DiagnosticStep, Questionnaire,
};
use esg_auditor::carbon::{CarbonRecord, Footprint};
use esg_auditor::error::AppError;
use esg_auditor::portfolio::{
    rank_risks, snapshot_kpis, ActionDraft, ActionItem, Kpi, KpiDraft, KpiSnapshot, RankedRisk,
    Risk, RiskDraft,
};
use esg_auditor::report::{DashboardView, ReportView};
use esg_auditor::store::KeyValueStore;
use esg_auditor::workspace::AuditorWorkspace;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

type Workspace<S> = State<Arc<AuditorWorkspace<S>>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SignInRequest {
    pub(crate) company: String,
    pub(crate) email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) answer: Answer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StepRequest {
    pub(crate) step: DiagnosticStep,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KpiValueRequest {
    pub(crate) current: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRequest {
    pub(crate) progress: i64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

/// Workspace endpoints under `/api/v1`.
pub(crate) fn workspace_router<S>(workspace: Arc<AuditorWorkspace<S>>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/questionnaire", get(questionnaire_handler::<S>))
        .route(
            "/api/v1/profile",
            get(profile_handler::<S>)
                .put(sign_in_handler::<S>)
                .delete(sign_out_handler::<S>),
        )
        .route(
            "/api/v1/diagnostic",
            get(diagnostic_handler::<S>).delete(reset_diagnostic_handler::<S>),
        )
        .route(
            "/api/v1/diagnostic/answers/:question_id",
            put(record_answer_handler::<S>).delete(clear_answer_handler::<S>),
        )
        .route("/api/v1/diagnostic/step", put(set_step_handler::<S>))
        .route("/api/v1/assessment", get(assessment_handler::<S>))
        .route(
            "/api/v1/carbon",
            get(carbon_handler::<S>)
                .put(update_carbon_handler::<S>)
                .delete(reset_carbon_handler::<S>),
        )
        .route("/api/v1/carbon/calculate", post(calculate_carbon_handler::<S>))
        .route(
            "/api/v1/risks",
            get(list_risks_handler::<S>).post(add_risk_handler::<S>),
        )
        .route(
            "/api/v1/risks/:id",
            axum::routing::delete(remove_risk_handler::<S>),
        )
        .route(
            "/api/v1/kpis",
            get(list_kpis_handler::<S>).post(add_kpi_handler::<S>),
        )
        .route(
            "/api/v1/kpis/:id",
            patch(update_kpi_handler::<S>).delete(remove_kpi_handler::<S>),
        )
        .route(
            "/api/v1/actions",
            get(list_actions_handler::<S>).post(add_action_handler::<S>),
        )
        .route(
            "/api/v1/actions/:id",
            patch(update_action_handler::<S>).delete(remove_action_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .route("/api/v1/report", get(report_handler::<S>))
        .with_state(workspace)
}

pub(crate) fn with_workspace_routes<S>(workspace: Arc<AuditorWorkspace<S>>) -> Router
where
    S: KeyValueStore + 'static,
{
    workspace_router(workspace)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn questionnaire_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<Questionnaire> {
    Json(workspace.questionnaire().clone())
}

async fn profile_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<ProfileView> {
    Json(workspace.profile().into())
}

async fn sign_in_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<ProfileView>, AppError> {
    let profile = workspace.sign_in(&request.company, &request.email)?;
    Ok(Json(profile.into()))
}

async fn sign_out_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Result<StatusCode, AppError> {
    workspace.sign_out()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn diagnostic_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<DiagnosticRecord> {
    Json(workspace.diagnostic())
}

async fn reset_diagnostic_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Result<StatusCode, AppError> {
    workspace.reset_diagnostic()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_answer_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Path(question_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<DiagnosticRecord>, AppError> {
    Ok(Json(workspace.record_answer(&question_id, request.answer)?))
}

async fn clear_answer_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Path(question_id): Path<String>,
) -> Result<Json<DiagnosticRecord>, AppError> {
    Ok(Json(workspace.clear_answer(&question_id)?))
}

async fn set_step_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Json(request): Json<StepRequest>,
) -> Result<Json<DiagnosticRecord>, AppError> {
    Ok(Json(workspace.set_step(request.step)?))
}

async fn assessment_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<Assessment> {
    Json(workspace.assessment())
}

async fn carbon_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<CarbonView> {
    Json(workspace.carbon().into())
}

async fn update_carbon_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Json(record): Json<CarbonRecord>,
) -> Result<Json<CarbonView>, AppError> {
    Ok(Json(workspace.update_carbon(record)?.into()))
}

async fn reset_carbon_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Result<StatusCode, AppError> {
    workspace.reset_carbon()?;
    Ok(StatusCode::NO_CONTENT)
}

async fn calculate_carbon_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Result<Json<Footprint>, AppError> {
    workspace.mark_calculated()?;
    Ok(Json(workspace.footprint().rounded(2)))
}

async fn list_risks_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<Vec<RankedRisk>> {
    Json(rank_risks(&workspace.risks()))
}

async fn add_risk_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Json(draft): Json<RiskDraft>,
) -> Result<(StatusCode, Json<Risk>), AppError> {
    let risk = workspace.add_risk(draft)?;
    Ok((StatusCode::CREATED, Json(risk)))
}

async fn remove_risk_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    workspace.remove_risk(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_kpis_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<Vec<KpiSnapshot>> {
    Json(snapshot_kpis(&workspace.kpis()))
}

async fn add_kpi_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Json(draft): Json<KpiDraft>,
) -> Result<(StatusCode, Json<Kpi>), AppError> {
    let kpi = workspace.add_kpi(draft)?;
    Ok((StatusCode::CREATED, Json(kpi)))
}

async fn update_kpi_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Path(id): Path<String>,
    Json(request): Json<KpiValueRequest>,
) -> Result<Json<Kpi>, AppError> {
    Ok(Json(workspace.update_kpi_current(&id, request.current)?))
}

async fn remove_kpi_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    workspace.remove_kpi(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_actions_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<Vec<ActionItem>> {
    Json(workspace.actions())
}

async fn add_action_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Json(draft): Json<ActionDraft>,
) -> Result<(StatusCode, Json<ActionItem>), AppError> {
    let action = workspace.add_action(draft)?;
    Ok((StatusCode::CREATED, Json(action)))
}

async fn update_action_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Path(id): Path<String>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<ActionItem>, AppError> {
    Ok(Json(workspace.update_action_progress(&id, request.progress)?))
}

async fn remove_action_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    workspace.remove_action(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn dashboard_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
) -> Json<DashboardView> {
    Json(workspace.dashboard())
}

async fn report_handler<S: KeyValueStore + 'static>(
    State(workspace): Workspace<S>,
    Query(query): Query<ReportQuery>,
) -> Json<ReportView> {
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    Json(workspace.report(today))
}
