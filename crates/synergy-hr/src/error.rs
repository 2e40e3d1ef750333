use crate::config::ConfigError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use crate::workflows::careers::service::CareersError;
use crate::workflows::events::EventsError;
use crate::workflows::onboarding::service::OnboardingError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Careers(CareersError),
    Onboarding(OnboardingError),
    Events(EventsError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Careers(err) => write!(f, "careers workflow error: {}", err),
            AppError::Onboarding(err) => write!(f, "onboarding workflow error: {}", err),
            AppError::Events(err) => write!(f, "events workflow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Careers(err) => Some(err),
            AppError::Onboarding(err) => Some(err),
            AppError::Events(err) => Some(err),
        }
    }
}

/// The single wire mapping for workflow errors. Routers never pick status
/// codes themselves; they convert into [`AppError`] and call this.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Careers(error) => {
                let status = match error {
                    CareersError::InvalidStatus(_) | CareersError::InvalidRating(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    CareersError::NotAuthorized | CareersError::NotFound => StatusCode::NOT_FOUND,
                    CareersError::Store(store) => store_status(store),
                    CareersError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, json!({ "error": error.to_string() }))
            }
            AppError::Onboarding(error) => match error {
                // A re-submitted assignment is a caller mistake, not a
                // failure: report it as a warning so retries degrade
                // gracefully.
                OnboardingError::DuplicateAssignment { .. } => {
                    (StatusCode::CONFLICT, json!({ "warning": error.to_string() }))
                }
                OnboardingError::NotFound | OnboardingError::NotAuthorized => {
                    (StatusCode::NOT_FOUND, json!({ "error": error.to_string() }))
                }
                OnboardingError::Store(store) => {
                    (store_status(store), json!({ "error": error.to_string() }))
                }
            },
            AppError::Events(error) => match error {
                EventsError::NotFound => {
                    (StatusCode::NOT_FOUND, json!({ "error": error.to_string() }))
                }
                EventsError::Store(store) => {
                    (store_status(store), json!({ "error": error.to_string() }))
                }
            },
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Conflict => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CareersError> for AppError {
    fn from(value: CareersError) -> Self {
        Self::Careers(value)
    }
}

impl From<OnboardingError> for AppError {
    fn from(value: OnboardingError) -> Self {
        Self::Onboarding(value)
    }
}

impl From<EventsError> for AppError {
    fn from(value: EventsError) -> Self {
        Self::Events(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::identity::UserId;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn duplicate_assignment_renders_as_a_warning() {
        let error = AppError::from(OnboardingError::DuplicateAssignment {
            employee: UserId("emp-1".to_string()),
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let payload = body_json(response).await;
        assert_eq!(payload["warning"], "program is already assigned to emp-1");
        assert!(payload.get("error").is_none());
    }

    #[tokio::test]
    async fn authorization_failures_read_as_missing_records() {
        let response = AppError::from(CareersError::NotAuthorized).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "record not found");
    }

    #[tokio::test]
    async fn store_conflicts_map_to_http_conflict() {
        let response = AppError::from(CareersError::Store(StoreError::Conflict)).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response =
            AppError::from(OnboardingError::Store(StoreError::Unavailable(
                "db offline".to_string(),
            )))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_review_inputs_are_unprocessable() {
        let response =
            AppError::from(CareersError::InvalidStatus("SHORTLISTED".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = AppError::from(CareersError::InvalidRating(6)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
