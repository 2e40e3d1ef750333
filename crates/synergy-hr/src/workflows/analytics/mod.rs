//! Read-only hiring and onboarding analytics, recomputed on demand.

pub mod summary;
pub mod views;

pub use summary::{
    application_timeline, average_time_to_hire_days, dashboard, status_funnel, top_jobs_by_volume,
};
pub use views::{FunnelEntry, HiringDashboard, JobVolumeEntry, TimelineBucket};
