use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::store::{EntityLocks, StoreError};
use crate::workflows::identity::{Actor, UserId};

use super::domain::{
    progress_percent, AssignmentId, CompletionId, OnboardingAssignment, OnboardingProgram,
    OnboardingTask, ProgramId, ProgressSnapshot, TaskCompletion, TaskId, TaskType,
};
use super::repository::{AssignmentProgressView, OnboardingStore, TaskProgressView};

static PROGRAM_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TASK_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ASSIGNMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMPLETION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_program_id() -> ProgramId {
    ProgramId(format!(
        "prog-{:04}",
        PROGRAM_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_task_id() -> TaskId {
    TaskId(format!(
        "task-{:05}",
        TASK_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_assignment_id() -> AssignmentId {
    AssignmentId(format!(
        "asg-{:05}",
        ASSIGNMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

fn next_completion_id() -> CompletionId {
    CompletionId(format!(
        "tc-{:06}",
        COMPLETION_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

/// Error raised by the onboarding service.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    /// Recoverable warning outcome: the caller re-submitted an assignment
    /// that already exists. Nothing was mutated.
    #[error("program is already assigned to {employee}")]
    DuplicateAssignment { employee: UserId },
    #[error("record not found")]
    NotFound,
    /// Indistinguishable from `NotFound` on the wire so unauthorized callers
    /// cannot probe for existence.
    #[error("record not found")]
    NotAuthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Payload for adding a checklist item to a program.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub task_type: TaskType,
    /// Defaults to the next position after the program's existing tasks.
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default = "default_required")]
    pub is_required: bool,
}

fn default_required() -> bool {
    true
}

/// Tracks onboarding checklists: assignment materialization and per-task
/// completion, including the derived assignment-completion transition.
pub struct OnboardingService<S> {
    store: Arc<S>,
    assignment_locks: EntityLocks<AssignmentId>,
}

impl<S> OnboardingService<S>
where
    S: OnboardingStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            assignment_locks: EntityLocks::default(),
        }
    }

    pub fn create_program(
        &self,
        title: String,
        description: String,
        actor: &Actor,
    ) -> Result<OnboardingProgram, OnboardingError> {
        require_hr(actor)?;
        let program = OnboardingProgram {
            id: next_program_id(),
            title,
            description,
            is_active: true,
            created_by: actor.id.clone(),
            created_at: Utc::now(),
        };
        Ok(self.store.insert_program(program)?)
    }

    pub fn add_task(
        &self,
        program_id: &ProgramId,
        task: NewTask,
        actor: &Actor,
    ) -> Result<OnboardingTask, OnboardingError> {
        require_hr(actor)?;
        self.store
            .fetch_program(program_id)?
            .ok_or(OnboardingError::NotFound)?;

        let order = match task.order {
            Some(order) => order,
            None => self.store.tasks_for_program(program_id)?.len() as u32 + 1,
        };

        let task = OnboardingTask {
            id: next_task_id(),
            program_id: program_id.clone(),
            title: task.title,
            description: task.description,
            task_type: task.task_type,
            order,
            is_required: task.is_required,
        };
        Ok(self.store.insert_task(task)?)
    }

    /// Assign a program to an employee, materializing one incomplete
    /// completion row per task currently in the program. All-or-nothing: a
    /// duplicate (program, employee) pair aborts with zero mutation.
    pub fn assign(
        &self,
        program_id: &ProgramId,
        employee: UserId,
        due_date: Option<NaiveDate>,
        actor: &Actor,
    ) -> Result<OnboardingAssignment, OnboardingError> {
        require_hr(actor)?;

        self.store
            .fetch_program(program_id)?
            .ok_or(OnboardingError::NotFound)?;

        if self.store.assignment_for(program_id, &employee)?.is_some() {
            warn!(program = %program_id.0, %employee, "program already assigned");
            return Err(OnboardingError::DuplicateAssignment { employee });
        }

        let assignment = OnboardingAssignment {
            id: next_assignment_id(),
            program_id: program_id.clone(),
            employee: employee.clone(),
            assigned_by: actor.id.clone(),
            assigned_at: Utc::now(),
            due_date,
            is_completed: false,
            completed_at: None,
        };

        let completions = self
            .store
            .tasks_for_program(program_id)?
            .into_iter()
            .map(|task| TaskCompletion {
                id: next_completion_id(),
                assignment_id: assignment.id.clone(),
                task_id: task.id,
                is_completed: false,
                completed_at: None,
                notes: String::new(),
            })
            .collect();

        let assignment = self
            .store
            .create_assignment(assignment, completions)
            .map_err(|error| match error {
                StoreError::Conflict => OnboardingError::DuplicateAssignment { employee },
                other => OnboardingError::Store(other),
            })?;

        info!(
            assignment_id = %assignment.id.0,
            program = %program_id.0,
            employee = %assignment.employee,
            "onboarding assignment created"
        );
        Ok(assignment)
    }

    /// Mark one task complete for the calling employee and recompute the
    /// parent assignment's progress.
    ///
    /// Idempotent: re-completing a finished task returns the current state
    /// without touching `completed_at`. The terminal assignment-completion
    /// transition runs under the assignment's lock so concurrent completions
    /// of the last tasks mark the assignment complete exactly once.
    pub fn complete_task(
        &self,
        completion_id: &CompletionId,
        actor: &Actor,
    ) -> Result<ProgressSnapshot, OnboardingError> {
        let completion = self
            .store
            .fetch_completion(completion_id)?
            .ok_or(OnboardingError::NotFound)?;

        let mut assignment = self
            .store
            .fetch_assignment(&completion.assignment_id)?
            .ok_or(OnboardingError::NotFound)?;

        if assignment.employee != actor.id {
            return Err(OnboardingError::NotAuthorized);
        }

        let lock = self.assignment_locks.acquire(&assignment.id);
        let _held = lock.lock().expect("assignment lock poisoned");

        // Re-read under the lock; a concurrent call may have won the race.
        let mut completion = self
            .store
            .fetch_completion(completion_id)?
            .ok_or(OnboardingError::NotFound)?;

        if !completion.is_completed {
            completion.is_completed = true;
            completion.completed_at = Some(Utc::now());
            self.store.update_completion(completion.clone())?;
        }

        let completions = self
            .store
            .completions_for_assignment(&assignment.id)?;
        let total = completions.len();
        let completed = completions
            .iter()
            .filter(|completion| completion.is_completed)
            .count();

        if completed >= total && !assignment.is_completed {
            assignment = self
                .store
                .fetch_assignment(&assignment.id)?
                .ok_or(OnboardingError::NotFound)?;
            if !assignment.is_completed {
                assignment.is_completed = true;
                assignment.completed_at = Some(Utc::now());
                self.store.update_assignment(assignment.clone())?;
                info!(
                    assignment_id = %assignment.id.0,
                    employee = %assignment.employee,
                    "onboarding assignment completed"
                );
            }
        }

        Ok(ProgressSnapshot {
            progress_percent: progress_percent(completed, total),
            completed_count: completed,
            total_tasks: total,
            assignment_completed: assignment.is_completed,
        })
    }

    /// HR view of one assignment's per-task progress.
    pub fn assignment_progress(
        &self,
        assignment_id: &AssignmentId,
        actor: &Actor,
    ) -> Result<AssignmentProgressView, OnboardingError> {
        require_hr(actor)?;
        let assignment = self
            .store
            .fetch_assignment(assignment_id)?
            .ok_or(OnboardingError::NotFound)?;
        self.progress_view(&assignment)
    }

    /// Self-service view: every assignment for the calling employee.
    pub fn assignments_for_employee(
        &self,
        actor: &Actor,
    ) -> Result<Vec<AssignmentProgressView>, OnboardingError> {
        let assignments = self.store.assignments_for_employee(&actor.id)?;
        assignments
            .iter()
            .map(|assignment| self.progress_view(assignment))
            .collect()
    }

    fn progress_view(
        &self,
        assignment: &OnboardingAssignment,
    ) -> Result<AssignmentProgressView, OnboardingError> {
        let program = self
            .store
            .fetch_program(&assignment.program_id)?
            .ok_or(OnboardingError::NotFound)?;
        let completions = self
            .store
            .completions_for_assignment(&assignment.id)?;

        let total = completions.len();
        let completed = completions
            .iter()
            .filter(|completion| completion.is_completed)
            .count();

        let mut tasks = Vec::with_capacity(completions.len());
        for completion in completions {
            let task = self
                .store
                .fetch_task(&completion.task_id)?
                .ok_or(OnboardingError::NotFound)?;
            tasks.push(TaskProgressView {
                completion_id: completion.id,
                task_title: task.title,
                task_description: task.description,
                task_type_label: task.task_type.label(),
                is_required: task.is_required,
                is_completed: completion.is_completed,
                completed_at: completion.completed_at,
                notes: completion.notes,
            });
        }

        Ok(AssignmentProgressView {
            assignment_id: assignment.id.clone(),
            program_title: program.title,
            employee: assignment.employee.clone(),
            assigned_at: assignment.assigned_at,
            due_date: assignment.due_date,
            progress: ProgressSnapshot {
                progress_percent: progress_percent(completed, total),
                completed_count: completed,
                total_tasks: total,
                assignment_completed: assignment.is_completed,
            },
            tasks,
        })
    }
}

fn require_hr(actor: &Actor) -> Result<(), OnboardingError> {
    if actor.is_hr_manager() {
        Ok(())
    } else {
        Err(OnboardingError::NotAuthorized)
    }
}
