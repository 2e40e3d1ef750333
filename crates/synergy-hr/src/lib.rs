//! Workflow engine for an HR operation: the hiring funnel (jobs and
//! applications moving through review statuses) and onboarding checklists
//! (programs assigned to new hires, tracked task by task).
//!
//! The crate exposes storage traits so the services can be exercised against
//! in-memory stores in tests and against real backends in deployments. All
//! notification delivery goes through the [`notifications`] contract and is
//! strictly best-effort: a failed send never rolls back a workflow mutation.

pub mod config;
pub mod error;
pub mod notifications;
pub mod store;
pub mod telemetry;
pub mod workflows;
