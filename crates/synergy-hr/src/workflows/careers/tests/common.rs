use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::notifications::{
    DispatchError, Notification, NotificationDispatcher, SubscriberDirectory,
};
use crate::store::StoreError;
use crate::workflows::careers::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, Job, JobId, JobPosting,
    JobType,
};
use crate::workflows::careers::repository::CareersStore;
use crate::workflows::careers::router::careers_router;
use crate::workflows::careers::service::CareersService;
use crate::workflows::identity::Actor;

pub(super) fn hr() -> Actor {
    Actor::hr_manager("hr-1")
}

pub(super) fn posting() -> JobPosting {
    JobPosting {
        title: "HR Analyst".to_string(),
        location: "Des Moines".to_string(),
        job_type: JobType::FullTime,
        description: "Own the people-data reporting pipeline.".to_string(),
        requirements: "2+ years HRIS experience.".to_string(),
        salary_range: Some("$60k - $75k".to_string()),
        deadline: None,
    }
}

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        full_name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "555-0100".to_string(),
        linkedin_url: Some("https://linkedin.com/in/janedoe".to_string()),
        resume_key: "resumes/jane-doe.pdf".to_string(),
        cover_letter: "I would love to join the team.".to_string(),
    }
}

/// Hand-built stored application for store-level fixtures that bypass the
/// service intake path.
pub(super) fn stored_application(
    id: &str,
    job_id: &JobId,
    applied_at: DateTime<Utc>,
) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        job_id: job_id.clone(),
        full_name: format!("Candidate {id}"),
        email: format!("{id}@example.com"),
        phone: "555-0000".to_string(),
        linkedin_url: None,
        resume_key: format!("resumes/{id}.pdf"),
        cover_letter: String::new(),
        applied_at,
        status: ApplicationStatus::Pending,
        notes: String::new(),
        rating: 0,
        reviewed_by: None,
        reviewed_at: None,
    }
}

pub(super) type TestService =
    CareersService<MemoryCareersStore, MemoryDispatcher, MemorySubscribers>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryCareersStore>,
    Arc<MemoryDispatcher>,
    Arc<MemorySubscribers>,
) {
    let store = Arc::new(MemoryCareersStore::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let subscribers = Arc::new(MemorySubscribers::default());
    let service = Arc::new(CareersService::new(
        store.clone(),
        dispatcher.clone(),
        subscribers.clone(),
    ));
    (service, store, dispatcher, subscribers)
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    careers_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryCareersStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl CareersStore for MemoryCareersStore {
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

#[derive(Default, Clone)]
pub(super) struct MemoryDispatcher {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryDispatcher {
    pub(super) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("dispatch mutex poisoned").clone()
    }

    pub(super) fn status_changes(&self) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|notification| {
                matches!(notification, Notification::ApplicationStatusChanged { .. })
            })
            .collect()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn notify(&self, notification: Notification) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("dispatch mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingDispatcher;

impl NotificationDispatcher for FailingDispatcher {
    fn notify(&self, _notification: Notification) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("smtp offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySubscribers {
    emails: Arc<Mutex<Vec<String>>>,
}

impl MemorySubscribers {
    pub(super) fn add(&self, email: &str) {
        self.emails
            .lock()
            .expect("subscriber mutex poisoned")
            .push(email.to_string());
    }
}

impl SubscriberDirectory for MemorySubscribers {
    fn active_subscriber_emails(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .emails
            .lock()
            .expect("subscriber mutex poisoned")
            .clone())
    }
}

pub(super) struct UnavailableSubscribers;

impl SubscriberDirectory for UnavailableSubscribers {
    fn active_subscriber_emails(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("directory offline".to_string()))
    }
}
