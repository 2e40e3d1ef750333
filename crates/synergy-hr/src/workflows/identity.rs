//! Actor identity as the engine sees it. Authentication happens upstream;
//! the workflows only consume an opaque user id plus the HR-manager
//! capability asserted by the caller context.

use std::fmt;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for users referenced across workflows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    HrManager,
    Employee,
}

/// The authenticated caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: ActorRole,
}

impl Actor {
    pub fn hr_manager(id: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            role: ActorRole::HrManager,
        }
    }

    pub fn employee(id: impl Into<String>) -> Self {
        Self {
            id: UserId(id.into()),
            role: ActorRole::Employee,
        }
    }

    pub fn is_hr_manager(&self) -> bool {
        self.role == ActorRole::HrManager
    }
}

/// Resolve the caller from the `X-Actor-Id` / `X-Actor-Role` headers the
/// authenticating proxy sets. Absent or unrecognized values fall back to an
/// anonymous employee, which every gated operation then rejects.
pub fn actor_from_headers(headers: &HeaderMap) -> Actor {
    let id = headers
        .get("x-actor-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("anonymous")
        .to_string();

    let role = match headers.get("x-actor-role").and_then(|value| value.to_str().ok()) {
        Some(value) if value.eq_ignore_ascii_case("hr") => ActorRole::HrManager,
        _ => ActorRole::Employee,
    };

    Actor {
        id: UserId(id),
        role,
    }
}
