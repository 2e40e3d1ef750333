use crate::infra::{
    AppState, ConsoleDispatcher, HrServices, InMemoryCareersStore, InMemoryEventStore,
    InMemoryOnboardingStore,
};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use synergy_hr::error::AppError;
use synergy_hr::store::StoreError;
use synergy_hr::workflows::analytics::{self, HiringDashboard};
use synergy_hr::workflows::careers::{careers_router, CareersStore};
use synergy_hr::workflows::events::{
    EventId, EventRegistrationService, EventStore, RegistrationRequest,
};
use synergy_hr::workflows::onboarding::{onboarding_router, OnboardingStore};

/// Read-only handles the dashboard aggregates over.
pub(crate) struct Snapshots {
    pub(crate) careers: Arc<InMemoryCareersStore>,
    pub(crate) onboarding: Arc<InMemoryOnboardingStore>,
    pub(crate) events: Arc<InMemoryEventStore>,
}

impl Snapshots {
    fn dashboard(&self) -> Result<HiringDashboard, StoreError> {
        let jobs = self.careers.jobs()?;
        let applications = self.careers.applications()?;
        let active_events = self.events.active_event_count()?;
        let open_assignments = self.onboarding.open_assignment_count()?;
        Ok(analytics::dashboard(
            &jobs,
            &applications,
            active_events,
            open_assignments,
            Utc::now(),
        ))
    }
}

pub(crate) fn with_api_routes(services: &HrServices) -> Router {
    let snapshots = Arc::new(Snapshots {
        careers: services.careers_store.clone(),
        onboarding: services.onboarding_store.clone(),
        events: services.event_store.clone(),
    });

    careers_router(services.careers.clone())
        .merge(onboarding_router(services.onboarding.clone()))
        .merge(
            Router::new()
                .route(
                    "/api/v1/events/:event_id/registrations",
                    post(register_endpoint),
                )
                .with_state(services.events.clone()),
        )
        .merge(
            Router::new()
                .route("/api/v1/analytics/dashboard", get(dashboard_endpoint))
                .with_state(snapshots),
        )
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn register_endpoint(
    State(service): State<Arc<EventRegistrationService<InMemoryEventStore, ConsoleDispatcher>>>,
    Path(event_id): Path<String>,
    Json(request): Json<RegistrationRequest>,
) -> Response {
    match service.register(&EventId(event_id), request) {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

async fn dashboard_endpoint(State(snapshots): State<Arc<Snapshots>>) -> Response {
    match snapshots.dashboard() {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
