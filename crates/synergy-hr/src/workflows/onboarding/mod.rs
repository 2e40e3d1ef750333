//! Onboarding checklists: programs of tasks assigned to new hires, with
//! per-task completion tracking and derived assignment progress.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    progress_percent, AssignmentId, CompletionId, OnboardingAssignment, OnboardingProgram,
    OnboardingTask, ProgramId, ProgressSnapshot, TaskCompletion, TaskId, TaskType,
};
pub use repository::{AssignmentProgressView, OnboardingStore, TaskProgressView};
pub use router::onboarding_router;
pub use service::{NewTask, OnboardingError, OnboardingService};
