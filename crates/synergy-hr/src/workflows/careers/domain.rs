use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::identity::UserId;

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Employment arrangement advertised on a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

/// A published job opening. Owns its applications; deleting a job (an
/// external admin operation) cascades to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub location: String,
    pub job_type: JobType,
    pub description: String,
    pub requirements: String,
    pub salary_range: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub posted_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Payload for publishing a new opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub location: String,
    pub job_type: JobType,
    pub description: String,
    pub requirements: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Hiring funnel position of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Interview,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            ApplicationStatus::Pending,
            ApplicationStatus::Reviewed,
            ApplicationStatus::Interview,
            ApplicationStatus::Rejected,
            ApplicationStatus::Hired,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Reviewed => "REVIEWED",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Hired => "HIRED",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending Review",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Interview => "Interview Scheduled",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Hired => "Hired",
        }
    }

    /// Parse the wire/admin code for a status. Any unrecognized value is the
    /// caller's `InvalidStatus` case.
    pub fn from_code(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(value))
    }
}

/// One candidate's application to one job.
///
/// `reviewed_by` and `reviewed_at` are only ever written together by a status
/// transition; `applied_at` is immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin_url: Option<String>,
    /// Opaque handle into the external resume file store.
    pub resume_key: String,
    pub cover_letter: String,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub notes: String,
    pub rating: i16,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Candidate-supplied intake payload for a new application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    pub resume_key: String,
    #[serde(default)]
    pub cover_letter: String,
}
