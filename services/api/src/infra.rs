//! In-memory infrastructure wiring for the service binary. Production
//! deployments swap these for database-backed stores and a real mail
//! transport behind the same traits.

use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use synergy_hr::notifications::{
    DispatchError, Notification, NotificationDispatcher, SubscriberDirectory,
};
use synergy_hr::store::StoreError;
use synergy_hr::workflows::careers::{
    Application, ApplicationId, CareersService, CareersStore, Job, JobId,
};
use synergy_hr::workflows::events::{
    Event, EventId, EventRegistrationService, EventStore, Registration, RegistrationId,
};
use synergy_hr::workflows::identity::UserId;
use synergy_hr::workflows::onboarding::{
    AssignmentId, CompletionId, OnboardingAssignment, OnboardingProgram, OnboardingService,
    OnboardingStore, OnboardingTask, ProgramId, TaskCompletion, TaskId,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    /// `None` when the Prometheus exporter is disabled by configuration.
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
}

/// Dispatcher for local runs: renders each message to the log instead of an
/// outbound transport.
#[derive(Default, Clone)]
pub(crate) struct ConsoleDispatcher;

impl NotificationDispatcher for ConsoleDispatcher {
    fn notify(&self, notification: Notification) -> Result<(), DispatchError> {
        info!(
            kind = notification.template_kind(),
            recipient = notification.recipient(),
            subject = %notification.subject(),
            "notification dispatched"
        );
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubscriberDirectory {
    emails: Arc<Mutex<Vec<String>>>,
}

impl InMemorySubscriberDirectory {
    pub(crate) fn subscribe(&self, email: impl Into<String>) {
        self.emails
            .lock()
            .expect("subscriber mutex poisoned")
            .push(email.into());
    }
}

impl SubscriberDirectory for InMemorySubscriberDirectory {
    fn active_subscriber_emails(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .emails
            .lock()
            .expect("subscriber mutex poisoned")
            .clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCareersStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl CareersStore for InMemoryCareersStore {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        let mut jobs: Vec<Job> = guard.values().cloned().collect();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.0.cmp(&a.id.0)));
        Ok(jobs)
    }

    fn insert_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), StoreError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if !guard.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, StoreError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn applications(&self) -> Result<Vec<Application>, StoreError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        let mut applications: Vec<Application> = guard.values().cloned().collect();
        applications.sort_by(|a, b| {
            b.applied_at
                .cmp(&a.applied_at)
                .then(b.id.0.cmp(&a.id.0))
        });
        Ok(applications)
    }
}

#[derive(Default)]
struct OnboardingInner {
    programs: HashMap<ProgramId, OnboardingProgram>,
    tasks: Vec<OnboardingTask>,
    assignments: HashMap<AssignmentId, OnboardingAssignment>,
    completions: HashMap<CompletionId, TaskCompletion>,
}

/// Single-mutex store so the assignment-plus-completions write stays atomic.
#[derive(Default, Clone)]
pub(crate) struct InMemoryOnboardingStore {
    inner: Arc<Mutex<OnboardingInner>>,
}

impl OnboardingStore for InMemoryOnboardingStore {
    fn insert_program(
        &self,
        program: OnboardingProgram,
    ) -> Result<OnboardingProgram, StoreError> {
        let mut inner = self.inner.lock().expect("onboarding mutex poisoned");
        if inner.programs.contains_key(&program.id) {
            return Err(StoreError::Conflict);
        }
        inner.programs.insert(program.id.clone(), program.clone());
        Ok(program)
    }

    fn fetch_program(&self, id: &ProgramId) -> Result<Option<OnboardingProgram>, StoreError> {
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
        Ok(inner.programs.get(id).cloned())
    }

    fn insert_task(&self, task: OnboardingTask) -> Result<OnboardingTask, StoreError> {
        let mut inner = self.inner.lock().expect("onboarding mutex poisoned");
        inner.tasks.push(task.clone());
        Ok(task)
    }

    fn fetch_task(&self, id: &TaskId) -> Result<Option<OnboardingTask>, StoreError> {
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
        Ok(inner.tasks.iter().find(|task| &task.id == id).cloned())
    }

    fn tasks_for_program(&self, id: &ProgramId) -> Result<Vec<OnboardingTask>, StoreError> {
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
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
        let mut inner = self.inner.lock().expect("onboarding mutex poisoned");
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
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
        Ok(inner.assignments.get(id).cloned())
    }

    fn assignment_for(
        &self,
        program: &ProgramId,
        employee: &UserId,
    ) -> Result<Option<OnboardingAssignment>, StoreError> {
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
        Ok(inner
            .assignments
            .values()
            .find(|assignment| {
                &assignment.program_id == program && &assignment.employee == employee
            })
            .cloned())
    }

    fn update_assignment(&self, assignment: OnboardingAssignment) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("onboarding mutex poisoned");
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
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
        let mut assignments: Vec<OnboardingAssignment> = inner
            .assignments
            .values()
            .filter(|assignment| &assignment.employee == employee)
            .cloned()
            .collect();
        assignments.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(assignments)
    }

    fn fetch_completion(&self, id: &CompletionId) -> Result<Option<TaskCompletion>, StoreError> {
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
        Ok(inner.completions.get(id).cloned())
    }

    fn update_completion(&self, completion: TaskCompletion) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("onboarding mutex poisoned");
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
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
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
        let inner = self.inner.lock().expect("onboarding mutex poisoned");
        Ok(inner
            .assignments
            .values()
            .filter(|assignment| !assignment.is_completed)
            .count())
    }
}

/// Every service the binary exposes, wired over the in-memory stores. The
/// store handles stay visible so the analytics read and the demo seeder can
/// reach the same data the services mutate.
pub(crate) struct HrServices {
    pub(crate) careers: Arc<
        CareersService<InMemoryCareersStore, ConsoleDispatcher, InMemorySubscriberDirectory>,
    >,
    pub(crate) onboarding: Arc<OnboardingService<InMemoryOnboardingStore>>,
    pub(crate) events: Arc<EventRegistrationService<InMemoryEventStore, ConsoleDispatcher>>,
    pub(crate) careers_store: Arc<InMemoryCareersStore>,
    pub(crate) onboarding_store: Arc<InMemoryOnboardingStore>,
    pub(crate) event_store: Arc<InMemoryEventStore>,
    pub(crate) subscribers: Arc<InMemorySubscriberDirectory>,
}

pub(crate) fn build_hr_services() -> HrServices {
    let careers_store = Arc::new(InMemoryCareersStore::default());
    let onboarding_store = Arc::new(InMemoryOnboardingStore::default());
    let event_store = Arc::new(InMemoryEventStore::default());
    let subscribers = Arc::new(InMemorySubscriberDirectory::default());
    let dispatcher = Arc::new(ConsoleDispatcher);

    HrServices {
        careers: Arc::new(CareersService::new(
            careers_store.clone(),
            dispatcher.clone(),
            subscribers.clone(),
        )),
        onboarding: Arc::new(OnboardingService::new(onboarding_store.clone())),
        events: Arc::new(EventRegistrationService::new(
            event_store.clone(),
            dispatcher,
        )),
        careers_store,
        onboarding_store,
        event_store,
        subscribers,
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEventStore {
    events: Arc<Mutex<HashMap<EventId, Event>>>,
    registrations: Arc<Mutex<HashMap<RegistrationId, Registration>>>,
}

impl EventStore for InMemoryEventStore {
    fn insert_event(&self, event: Event) -> Result<Event, StoreError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        if guard.contains_key(&event.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    fn fetch_event(&self, id: &EventId) -> Result<Option<Event>, StoreError> {
        let guard = self.events.lock().expect("event mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_registration(
        &self,
        registration: Registration,
    ) -> Result<Registration, StoreError> {
        let mut guard = self
            .registrations
            .lock()
            .expect("registration mutex poisoned");
        guard.insert(registration.id.clone(), registration.clone());
        Ok(registration)
    }

    fn active_event_count(&self) -> Result<usize, StoreError> {
        let guard = self.events.lock().expect("event mutex poisoned");
        Ok(guard.values().filter(|event| event.is_active).count())
    }
}
