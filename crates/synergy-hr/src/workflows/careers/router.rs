use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::notifications::{NotificationDispatcher, SubscriberDirectory};
use crate::workflows::identity::actor_from_headers;

use super::domain::{ApplicationId, ApplicationSubmission, JobId, JobPosting};
use super::repository::CareersStore;
use super::service::{CareersError, CareersService};

/// Router builder exposing the hiring funnel endpoints.
pub fn careers_router<S, D, N>(service: Arc<CareersService<S, D, N>>) -> Router
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    Router::new()
        .route("/api/v1/careers/jobs", post(post_job_handler::<S, D, N>))
        .route(
            "/api/v1/careers/jobs/:job_id/applications",
            post(submit_application_handler::<S, D, N>),
        )
        .route(
            "/api/v1/careers/applications",
            get(applications_page_handler::<S, D, N>),
        )
        .route(
            "/api/v1/careers/applications/export",
            get(export_handler::<S, D, N>),
        )
        .route(
            "/api/v1/careers/applications/:application_id/status",
            post(status_handler::<S, D, N>),
        )
        .route(
            "/api/v1/careers/applications/:application_id/rating",
            post(rating_handler::<S, D, N>),
        )
        .route(
            "/api/v1/careers/applications/:application_id/notes",
            post(notes_handler::<S, D, N>),
        )
        .with_state(service)
}

fn error_response(error: CareersError) -> Response {
    AppError::from(error).into_response()
}

async fn post_job_handler<S, D, N>(
    State(service): State<Arc<CareersService<S, D, N>>>,
    headers: HeaderMap,
    axum::Json(posting): axum::Json<JobPosting>,
) -> Response
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.post_job(posting, &actor) {
        Ok(job) => (StatusCode::CREATED, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn submit_application_handler<S, D, N>(
    State(service): State<Arc<CareersService<S, D, N>>>,
    Path(job_id): Path<String>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    match service.submit_application(&JobId(job_id), submission) {
        Ok(application) => {
            let payload = json!({
                "application_id": application.id,
                "status": application.status,
                "applied_at": application.applied_at,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    page: Option<usize>,
}

async fn applications_page_handler<S, D, N>(
    State(service): State<Arc<CareersService<S, D, N>>>,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    match service.applications_page(query.page.unwrap_or(1)) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn export_handler<S, D, N>(
    State(service): State<Arc<CareersService<S, D, N>>>,
    headers: HeaderMap,
) -> Response
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.export_applications(&actor) {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            csv,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct StatusChange {
    status: String,
}

async fn status_handler<S, D, N>(
    State(service): State<Arc<CareersService<S, D, N>>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(change): axum::Json<StatusChange>,
) -> Response
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.transition(&ApplicationId(application_id), &change.status, &actor) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct RatingChange {
    rating: i16,
}

async fn rating_handler<S, D, N>(
    State(service): State<Arc<CareersService<S, D, N>>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(change): axum::Json<RatingChange>,
) -> Response
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.set_rating(&ApplicationId(application_id), change.rating, &actor) {
        Ok(application) => {
            let payload = json!({
                "application_id": application.id,
                "rating": application.rating,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct NotesChange {
    notes: String,
}

async fn notes_handler<S, D, N>(
    State(service): State<Arc<CareersService<S, D, N>>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(change): axum::Json<NotesChange>,
) -> Response
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.set_notes(&ApplicationId(application_id), change.notes, &actor) {
        Ok(application) => {
            let payload = json!({
                "application_id": application.id,
                "notes": application.notes,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
