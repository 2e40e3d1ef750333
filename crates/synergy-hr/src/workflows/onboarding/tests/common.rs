use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::store::StoreError;
use crate::workflows::identity::{Actor, UserId};
use crate::workflows::onboarding::domain::{
    AssignmentId, CompletionId, OnboardingAssignment, OnboardingProgram, OnboardingTask,
    ProgramId, TaskCompletion, TaskId, TaskType,
};
use crate::workflows::onboarding::repository::OnboardingStore;
use crate::workflows::onboarding::router::onboarding_router;
use crate::workflows::onboarding::service::{NewTask, OnboardingService};

pub(super) fn hr() -> Actor {
    Actor::hr_manager("hr-1")
}

pub(super) fn employee() -> Actor {
    Actor::employee("emp-1")
}

pub(super) fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        task_type: TaskType::General,
        order: None,
        is_required: true,
    }
}

pub(super) fn build_service() -> (
    Arc<OnboardingService<MemoryOnboardingStore>>,
    Arc<MemoryOnboardingStore>,
) {
    let store = Arc::new(MemoryOnboardingStore::default());
    let service = Arc::new(OnboardingService::new(store.clone()));
    (service, store)
}

/// Program with `task_count` generically named tasks, created through the
/// service facade.
pub(super) fn seed_program(
    service: &OnboardingService<MemoryOnboardingStore>,
    task_count: usize,
) -> OnboardingProgram {
    let program = service
        .create_program(
            "Software Engineer Onboarding".to_string(),
            "Everything a new engineer needs in week one.".to_string(),
            &hr(),
        )
        .expect("program created");
    for index in 0..task_count {
        service
            .add_task(&program.id, new_task(&format!("Task {index}")), &hr())
            .expect("task added");
    }
    program
}

pub(super) fn router_with_service(
    service: Arc<OnboardingService<MemoryOnboardingStore>>,
) -> axum::Router {
    onboarding_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
struct Inner {
    programs: HashMap<ProgramId, OnboardingProgram>,
    tasks: Vec<OnboardingTask>,
    assignments: HashMap<AssignmentId, OnboardingAssignment>,
    completions: HashMap<CompletionId, TaskCompletion>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryOnboardingStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryOnboardingStore {
    pub(super) fn completion_count(&self) -> usize {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .completions
            .len()
    }
}

impl OnboardingStore for MemoryOnboardingStore {
    fn insert_program(
        &self,
        program: OnboardingProgram,
    ) -> Result<OnboardingProgram, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if inner.programs.contains_key(&program.id) {
            return Err(StoreError::Conflict);
        }
        inner.programs.insert(program.id.clone(), program.clone());
        Ok(program)
    }

    fn fetch_program(&self, id: &ProgramId) -> Result<Option<OnboardingProgram>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.programs.get(id).cloned())
    }

    fn insert_task(&self, task: OnboardingTask) -> Result<OnboardingTask, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.tasks.push(task.clone());
        Ok(task)
    }

    fn fetch_task(&self, id: &TaskId) -> Result<Option<OnboardingTask>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.tasks.iter().find(|task| &task.id == id).cloned())
    }

    fn tasks_for_program(&self, id: &ProgramId) -> Result<Vec<OnboardingTask>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut tasks: Vec<OnboardingTask> = inner
            .tasks
            .iter()
            .filter(|task| &task.program_id == id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.0.cmp(&b.id.0)));
        Ok(tasks)
    }

    fn create_assignment(
        &self,
        assignment: OnboardingAssignment,
        completions: Vec<TaskCompletion>,
    ) -> Result<OnboardingAssignment, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let duplicate = inner.assignments.values().any(|existing| {
            existing.program_id == assignment.program_id
                && existing.employee == assignment.employee
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        inner
            .assignments
            .insert(assignment.id.clone(), assignment.clone());
        for completion in completions {
            inner.completions.insert(completion.id.clone(), completion);
        }
        Ok(assignment)
    }

    fn fetch_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Option<OnboardingAssignment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.assignments.get(id).cloned())
    }

    fn assignment_for(
        &self,
        program: &ProgramId,
        employee: &UserId,
    ) -> Result<Option<OnboardingAssignment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .assignments
            .values()
            .find(|assignment| {
                &assignment.program_id == program && &assignment.employee == employee
            })
            .cloned())
    }

    fn update_assignment(&self, assignment: OnboardingAssignment) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if !inner.assignments.contains_key(&assignment.id) {
            return Err(StoreError::NotFound);
        }
        inner.assignments.insert(assignment.id.clone(), assignment);
        Ok(())
    }

    fn assignments_for_employee(
        &self,
        employee: &UserId,
    ) -> Result<Vec<OnboardingAssignment>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut assignments: Vec<OnboardingAssignment> = inner
            .assignments
            .values()
            .filter(|assignment| &assignment.employee == employee)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(assignments)
    }

    fn fetch_completion(
        &self,
        id: &CompletionId,
    ) -> Result<Option<TaskCompletion>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.completions.get(id).cloned())
    }

    fn update_completion(&self, completion: TaskCompletion) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if !inner.completions.contains_key(&completion.id) {
            return Err(StoreError::NotFound);
        }
        inner.completions.insert(completion.id.clone(), completion);
        Ok(())
    }

    fn completions_for_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Vec<TaskCompletion>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut completions: Vec<TaskCompletion> = inner
            .completions
            .values()
            .filter(|completion| &completion.assignment_id == id)
            .cloned()
            .collect();
        completions.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(completions)
    }

    fn open_assignment_count(&self) -> Result<usize, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .assignments
            .values()
            .filter(|assignment| !assignment.is_completed)
            .count())
    }
}
