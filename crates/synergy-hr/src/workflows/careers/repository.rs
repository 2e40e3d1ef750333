use crate::store::StoreError;
use crate::workflows::identity::UserId;

use super::domain::{Application, ApplicationId, Job, JobId};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Storage abstraction for jobs and applications so the review service can
/// be exercised against in-memory stores in tests.
///
/// Listings come back newest-first (`posted_at` / `applied_at` descending).
pub trait CareersStore: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn jobs(&self) -> Result<Vec<Job>, StoreError>;

    fn insert_application(&self, application: Application) -> Result<Application, StoreError>;
    fn update_application(&self, application: Application) -> Result<(), StoreError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, StoreError>;
    fn applications(&self) -> Result<Vec<Application>, StoreError>;
}

/// Review metadata snapshot returned to callers after a transition.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub application_id: ApplicationId,
    pub status: &'static str,
    pub status_label: &'static str,
    pub reviewed_by: UserId,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewOutcome {
    pub(crate) fn from_application(application: &Application) -> Option<Self> {
        let reviewed_by = application.reviewed_by.clone()?;
        let reviewed_at = application.reviewed_at?;
        Some(Self {
            application_id: application.id.clone(),
            status: application.status.code(),
            status_label: application.status.label(),
            reviewed_by,
            reviewed_at,
        })
    }
}
