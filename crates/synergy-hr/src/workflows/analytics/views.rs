use serde::Serialize;

use crate::workflows::careers::domain::{ApplicationStatus, JobId};

/// One bucket of the hiring funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelEntry {
    pub status: ApplicationStatus,
    pub status_label: &'static str,
    pub count: usize,
}

/// One calendar month of application volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBucket {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub count: usize,
}

/// One job in the volume ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobVolumeEntry {
    pub job_id: JobId,
    pub title: String,
    pub application_count: usize,
}

/// Everything the HR dashboard renders in one read.
#[derive(Debug, Clone, Serialize)]
pub struct HiringDashboard {
    pub funnel: Vec<FunnelEntry>,
    pub timeline: Vec<TimelineBucket>,
    pub top_jobs: Vec<JobVolumeEntry>,
    pub average_time_to_hire_days: i64,
    pub total_applications: usize,
    pub active_events: usize,
    pub open_onboarding_assignments: usize,
}
