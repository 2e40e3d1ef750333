//! Hiring funnel: job postings, candidate applications, and the status
//! machine HR uses to move applications through review.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationSubmission, Job, JobId, JobPosting,
    JobType,
};
pub use export::{applications_csv, ExportError};
pub use repository::{CareersStore, ReviewOutcome};
pub use router::careers_router;
pub use service::{CareersError, CareersService, APPLICATION_PAGE_SIZE};
