use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::notifications::{
    broadcast_job_posted, dispatch_best_effort, Notification, NotificationDispatcher,
    SubscriberDirectory,
};
use crate::store::{EntityLocks, Page, StoreError};
use crate::workflows::identity::Actor;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, Job, JobId, JobPosting,
};
use super::export::{applications_csv, ExportError};
use super::repository::{CareersStore, ReviewOutcome};

/// Fixed page size for application listings.
pub const APPLICATION_PAGE_SIZE: usize = 25;

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:04}"))
}

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Error raised by the careers service.
#[derive(Debug, thiserror::Error)]
pub enum CareersError {
    #[error("'{0}' is not a recognized application status")]
    InvalidStatus(String),
    #[error("rating must be between 0 and 5, got {0}")]
    InvalidRating(i16),
    /// Deliberately indistinguishable from a missing record so unauthorized
    /// callers learn nothing about what exists.
    #[error("record not found")]
    NotAuthorized,
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Service composing the job board, application store, and the status
/// machine governing review transitions.
///
/// Every mutation of a single application is serialized through a
/// per-application lock; notification dispatch is fire-and-forget and never
/// fails the triggering operation.
pub struct CareersService<S, D, N> {
    store: Arc<S>,
    dispatcher: Arc<D>,
    subscribers: Arc<N>,
    application_locks: EntityLocks<ApplicationId>,
}

impl<S, D, N> CareersService<S, D, N>
where
    S: CareersStore + 'static,
    D: NotificationDispatcher + 'static,
    N: SubscriberDirectory + 'static,
{
    pub fn new(store: Arc<S>, dispatcher: Arc<D>, subscribers: Arc<N>) -> Self {
        Self {
            store,
            dispatcher,
            subscribers,
            application_locks: EntityLocks::default(),
        }
    }

    /// Publish a new opening and announce it to active newsletter
    /// subscribers. The broadcast is best-effort per recipient.
    pub fn post_job(&self, posting: JobPosting, actor: &Actor) -> Result<Job, CareersError> {
        require_hr(actor)?;

        let job = Job {
            id: next_job_id(),
            title: posting.title,
            location: posting.location,
            job_type: posting.job_type,
            description: posting.description,
            requirements: posting.requirements,
            salary_range: posting.salary_range,
            deadline: posting.deadline,
            posted_at: Utc::now(),
            is_active: true,
        };

        let job = self.store.insert_job(job)?;
        info!(job_id = %job.id.0, title = %job.title, "job posted");

        broadcast_job_posted(self.dispatcher.as_ref(), self.subscribers.as_ref(), &job);
        Ok(job)
    }

    /// Record a candidate's application against a job and confirm receipt.
    pub fn submit_application(
        &self,
        job_id: &JobId,
        submission: ApplicationSubmission,
    ) -> Result<Application, CareersError> {
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or(CareersError::NotFound)?;

        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            full_name: submission.full_name,
            email: submission.email,
            phone: submission.phone,
            linkedin_url: submission.linkedin_url,
            resume_key: submission.resume_key,
            cover_letter: submission.cover_letter,
            applied_at: Utc::now(),
            status: ApplicationStatus::Pending,
            notes: String::new(),
            rating: 0,
            reviewed_by: None,
            reviewed_at: None,
        };

        let application = self.store.insert_application(application)?;

        dispatch_best_effort(
            self.dispatcher.as_ref(),
            Notification::ApplicationSubmitted {
                recipient: application.email.clone(),
                applicant_name: application.full_name.clone(),
                job_title: job.title.clone(),
                job_location: job.location.clone(),
                applied_on: application.applied_at.date_naive(),
            },
        );

        Ok(application)
    }

    /// Move an application to `new_status`, stamping the reviewer and the
    /// review time. Any status may be set from any other, including the one
    /// it already holds; a same-status transition still re-stamps and still
    /// notifies the applicant.
    pub fn transition(
        &self,
        application_id: &ApplicationId,
        new_status: &str,
        actor: &Actor,
    ) -> Result<ReviewOutcome, CareersError> {
        require_hr(actor)?;

        let new_status = ApplicationStatus::from_code(new_status)
            .ok_or_else(|| CareersError::InvalidStatus(new_status.to_string()))?;

        let lock = self.application_locks.acquire(application_id);
        let _held = lock.lock().expect("application lock poisoned");

        let mut application = self
            .store
            .fetch_application(application_id)?
            .ok_or(CareersError::NotFound)?;

        let old_status = application.status;
        application.status = new_status;
        application.reviewed_by = Some(actor.id.clone());
        application.reviewed_at = Some(Utc::now());
        self.store.update_application(application.clone())?;

        info!(
            application_id = %application.id.0,
            from = old_status.code(),
            to = new_status.code(),
            reviewer = %actor.id,
            "application status transition"
        );

        let job_title = self
            .store
            .fetch_job(&application.job_id)?
            .map(|job| job.title)
            .unwrap_or_default();

        dispatch_best_effort(
            self.dispatcher.as_ref(),
            Notification::ApplicationStatusChanged {
                recipient: application.email.clone(),
                applicant_name: application.full_name.clone(),
                job_title,
                old_status,
                new_status,
            },
        );

        ReviewOutcome::from_application(&application).ok_or(CareersError::NotFound)
    }

    /// Record a 0-5 star rating. Does not touch status or review stamps.
    pub fn set_rating(
        &self,
        application_id: &ApplicationId,
        rating: i16,
        actor: &Actor,
    ) -> Result<Application, CareersError> {
        require_hr(actor)?;

        if !(0..=5).contains(&rating) {
            return Err(CareersError::InvalidRating(rating));
        }

        let lock = self.application_locks.acquire(application_id);
        let _held = lock.lock().expect("application lock poisoned");

        let mut application = self
            .store
            .fetch_application(application_id)?
            .ok_or(CareersError::NotFound)?;
        application.rating = rating;
        self.store.update_application(application.clone())?;
        Ok(application)
    }

    /// Replace the internal HR notes on an application.
    pub fn set_notes(
        &self,
        application_id: &ApplicationId,
        notes: String,
        actor: &Actor,
    ) -> Result<Application, CareersError> {
        require_hr(actor)?;

        let lock = self.application_locks.acquire(application_id);
        let _held = lock.lock().expect("application lock poisoned");

        let mut application = self
            .store
            .fetch_application(application_id)?
            .ok_or(CareersError::NotFound)?;
        application.notes = notes;
        self.store.update_application(application.clone())?;
        Ok(application)
    }

    /// One fixed-size page of the application pipeline, newest first.
    pub fn applications_page(&self, page: usize) -> Result<Page<Application>, CareersError> {
        let applications = self.store.applications()?;
        Ok(Page::paginate(applications, page, APPLICATION_PAGE_SIZE))
    }

    /// CSV dump of every application for the HR report surface.
    pub fn export_applications(&self, actor: &Actor) -> Result<String, CareersError> {
        require_hr(actor)?;
        let applications = self.store.applications()?;
        let jobs = self.store.jobs()?;
        Ok(applications_csv(&applications, &jobs)?)
    }
}

fn require_hr(actor: &Actor) -> Result<(), CareersError> {
    if actor.is_hr_manager() {
        Ok(())
    } else {
        Err(CareersError::NotAuthorized)
    }
}
