use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::store::StoreError;
use crate::workflows::identity::UserId;

use super::domain::{
    AssignmentId, CompletionId, OnboardingAssignment, OnboardingProgram, OnboardingTask,
    ProgramId, ProgressSnapshot, TaskCompletion, TaskId,
};

/// Storage abstraction for onboarding programs, assignments, and per-task
/// completion rows.
///
/// `create_assignment` is the one cross-entity write the engine needs: the
/// assignment and its full completion set must land together or not at all,
/// and a duplicate (program, employee) pair must come back as `Conflict`.
pub trait OnboardingStore: Send + Sync {
    fn insert_program(&self, program: OnboardingProgram)
        -> Result<OnboardingProgram, StoreError>;
    fn fetch_program(&self, id: &ProgramId) -> Result<Option<OnboardingProgram>, StoreError>;

    fn insert_task(&self, task: OnboardingTask) -> Result<OnboardingTask, StoreError>;
    fn fetch_task(&self, id: &TaskId) -> Result<Option<OnboardingTask>, StoreError>;
    /// Tasks for a program ordered by `(order, id)`.
    fn tasks_for_program(&self, id: &ProgramId) -> Result<Vec<OnboardingTask>, StoreError>;

    fn create_assignment(
        &self,
        assignment: OnboardingAssignment,
        completions: Vec<TaskCompletion>,
    ) -> Result<OnboardingAssignment, StoreError>;
    fn fetch_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<OnboardingAssignment>, StoreError>;
    fn assignment_for(
        &self,
        program: &ProgramId,
        employee: &UserId,
    ) -> Result<Option<OnboardingAssignment>, StoreError>;
    fn update_assignment(&self, assignment: OnboardingAssignment) -> Result<(), StoreError>;
    fn assignments_for_employee(
        &self,
        employee: &UserId,
    ) -> Result<Vec<OnboardingAssignment>, StoreError>;

    fn fetch_completion(&self, id: &CompletionId) -> Result<Option<TaskCompletion>, StoreError>;
    fn update_completion(&self, completion: TaskCompletion) -> Result<(), StoreError>;
    fn completions_for_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Vec<TaskCompletion>, StoreError>;

    /// Count of assignments not yet marked complete, for summary metrics.
    fn open_assignment_count(&self) -> Result<usize, StoreError>;
}

/// Per-task row in a progress view.
#[derive(Debug, Clone, Serialize)]
pub struct TaskProgressView {
    pub completion_id: CompletionId,
    pub task_title: String,
    pub task_description: String,
    pub task_type_label: &'static str,
    pub is_required: bool,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Full progress picture for one assignment, for HR and self-service views.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentProgressView {
    pub assignment_id: AssignmentId,
    pub program_title: String,
    pub employee: UserId,
    pub assigned_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub progress: ProgressSnapshot,
    pub tasks: Vec<TaskProgressView>,
}
