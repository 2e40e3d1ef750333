use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::workflows::identity::{actor_from_headers, UserId};

use super::domain::{AssignmentId, CompletionId, ProgramId};
use super::repository::OnboardingStore;
use super::service::{NewTask, OnboardingError, OnboardingService};

/// Router builder exposing the onboarding checklist endpoints.
pub fn onboarding_router<S>(service: Arc<OnboardingService<S>>) -> Router
where
    S: OnboardingStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/onboarding/programs",
            post(create_program_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/programs/:program_id/tasks",
            post(add_task_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/programs/:program_id/assignments",
            post(assign_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/assignments/:assignment_id/progress",
            get(assignment_progress_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/my-assignments",
            get(my_assignments_handler::<S>),
        )
        .route(
            "/api/v1/onboarding/completions/:completion_id/complete",
            post(complete_task_handler::<S>),
        )
        .with_state(service)
}

fn error_response(error: OnboardingError) -> Response {
    AppError::from(error).into_response()
}

#[derive(Debug, Deserialize)]
struct NewProgram {
    title: String,
    #[serde(default)]
    description: String,
}

async fn create_program_handler<S>(
    State(service): State<Arc<OnboardingService<S>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<NewProgram>,
) -> Response
where
    S: OnboardingStore + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.create_program(payload.title, payload.description, &actor) {
        Ok(program) => (StatusCode::CREATED, axum::Json(program)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn add_task_handler<S>(
    State(service): State<Arc<OnboardingService<S>>>,
    Path(program_id): Path<String>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<NewTask>,
) -> Response
where
    S: OnboardingStore + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.add_task(&ProgramId(program_id), payload, &actor) {
        Ok(task) => (StatusCode::CREATED, axum::Json(task)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct AssignRequest {
    employee_id: String,
    #[serde(default)]
    due_date: Option<NaiveDate>,
}

async fn assign_handler<S>(
    State(service): State<Arc<OnboardingService<S>>>,
    Path(program_id): Path<String>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<AssignRequest>,
) -> Response
where
    S: OnboardingStore + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.assign(
        &ProgramId(program_id),
        UserId(payload.employee_id),
        payload.due_date,
        &actor,
    ) {
        Ok(assignment) => (StatusCode::CREATED, axum::Json(assignment)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn assignment_progress_handler<S>(
    State(service): State<Arc<OnboardingService<S>>>,
    Path(assignment_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: OnboardingStore + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.assignment_progress(&AssignmentId(assignment_id), &actor) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn my_assignments_handler<S>(
    State(service): State<Arc<OnboardingService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: OnboardingStore + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.assignments_for_employee(&actor) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn complete_task_handler<S>(
    State(service): State<Arc<OnboardingService<S>>>,
    Path(completion_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: OnboardingStore + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.complete_task(&CompletionId(completion_id), &actor) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}
