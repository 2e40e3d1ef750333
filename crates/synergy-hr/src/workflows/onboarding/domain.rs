use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::identity::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionId(pub String);

/// Kind of checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    DocumentUpload,
    PolicyAcknowledgement,
    Training,
    Form,
    General,
}

impl TaskType {
    pub const fn label(self) -> &'static str {
        match self {
            TaskType::DocumentUpload => "Document Upload",
            TaskType::PolicyAcknowledgement => "Policy Acknowledgement",
            TaskType::Training => "Training / Course",
            TaskType::Form => "Complete a Form",
            TaskType::General => "General Task",
        }
    }
}

/// A named onboarding checklist (e.g. "Software Engineer Onboarding").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingProgram {
    pub id: ProgramId,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Individual checklist item within a program. Display order within the
/// program is `(order, id)`; order values need not be contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingTask {
    pub id: TaskId,
    pub program_id: ProgramId,
    pub title: String,
    pub description: String,
    pub task_type: TaskType,
    pub order: u32,
    pub is_required: bool,
}

/// One program bound to one employee. Unique per (program, employee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingAssignment {
    pub id: AssignmentId,
    pub program_id: ProgramId,
    pub employee: UserId,
    pub assigned_by: UserId,
    pub assigned_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Per-task completion row, materialized in bulk when the assignment is
/// created. The set is a frozen snapshot: tasks added to the program later
/// never appear on existing assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub id: CompletionId,
    pub assignment_id: AssignmentId,
    pub task_id: TaskId,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Derived progress state returned after each completion so callers can
/// update live progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub progress_percent: u8,
    pub completed_count: usize,
    pub total_tasks: usize,
    pub assignment_completed: bool,
}

/// Completion percentage over the assignment's frozen task set. An empty
/// checklist is vacuously complete.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((100.0 * completed as f64) / total as f64).round() as u8
}
