//! Read-side aggregation over the hiring funnel. Pure functions over a
//! snapshot of the entity store; nothing here mutates, and nothing is kept
//! as an incrementally maintained counter that could drift from the records.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::workflows::careers::domain::{Application, ApplicationStatus, Job, JobId};

use super::views::{FunnelEntry, HiringDashboard, JobVolumeEntry, TimelineBucket};

/// Months of history in the application timeline, current month included.
const TIMELINE_MONTHS: u32 = 6;
/// Ranking depth for the job volume table.
const TOP_JOBS: usize = 5;

/// Application counts per status, zero-filled across all five statuses so
/// the funnel always sums to the total application count.
pub fn status_funnel(applications: &[Application]) -> Vec<FunnelEntry> {
    let mut counts: HashMap<ApplicationStatus, usize> = HashMap::new();
    for application in applications {
        *counts.entry(application.status).or_default() += 1;
    }

    ApplicationStatus::ordered()
        .into_iter()
        .map(|status| FunnelEntry {
            status,
            status_label: status.label(),
            count: counts.get(&status).copied().unwrap_or(0),
        })
        .collect()
}

fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 - back as i32;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// Applications created per calendar month over the trailing six months,
/// dense (zero months included). When no application falls in the window at
/// all, a single zero bucket for the current month stands in for the series.
pub fn application_timeline(
    applications: &[Application],
    now: DateTime<Utc>,
) -> Vec<TimelineBucket> {
    let current = (now.year(), now.month());
    let window: Vec<(i32, u32)> = (0..TIMELINE_MONTHS)
        .rev()
        .map(|back| months_back(current.0, current.1, back))
        .collect();

    let mut counts: HashMap<(i32, u32), usize> = HashMap::new();
    for application in applications {
        let key = (application.applied_at.year(), application.applied_at.month());
        if window.contains(&key) {
            *counts.entry(key).or_default() += 1;
        }
    }

    if counts.is_empty() {
        return vec![TimelineBucket {
            year: current.0,
            month: current.1,
            label: month_label(current.0, current.1),
            count: 0,
        }];
    }

    window
        .into_iter()
        .map(|(year, month)| TimelineBucket {
            year,
            month,
            label: month_label(year, month),
            count: counts.get(&(year, month)).copied().unwrap_or(0),
        })
        .collect()
}

/// Jobs ranked by application volume, descending, truncated to the top five.
/// Ties keep the order the jobs were listed in (stable sort).
pub fn top_jobs_by_volume(jobs: &[Job], applications: &[Application]) -> Vec<JobVolumeEntry> {
    let mut counts: HashMap<&JobId, usize> = HashMap::new();
    for application in applications {
        *counts.entry(&application.job_id).or_default() += 1;
    }

    let mut ranking: Vec<JobVolumeEntry> = jobs
        .iter()
        .map(|job| JobVolumeEntry {
            job_id: job.id.clone(),
            title: job.title.clone(),
            application_count: counts.get(&job.id).copied().unwrap_or(0),
        })
        .collect();
    ranking.sort_by(|a, b| b.application_count.cmp(&a.application_count));
    ranking.truncate(TOP_JOBS);
    ranking
}

/// Mean of `reviewed_at - applied_at` in whole days over applications
/// currently hired with a review stamp. Zero when no such application
/// exists, never NaN.
pub fn average_time_to_hire_days(applications: &[Application]) -> i64 {
    let durations: Vec<i64> = applications
        .iter()
        .filter(|application| application.status == ApplicationStatus::Hired)
        .filter_map(|application| {
            application
                .reviewed_at
                .map(|reviewed_at| (reviewed_at - application.applied_at).num_days())
        })
        .collect();

    if durations.is_empty() {
        return 0;
    }
    durations.iter().sum::<i64>() / durations.len() as i64
}

/// Assemble the full dashboard from one snapshot of the store.
pub fn dashboard(
    jobs: &[Job],
    applications: &[Application],
    active_events: usize,
    open_onboarding_assignments: usize,
    now: DateTime<Utc>,
) -> HiringDashboard {
    HiringDashboard {
        funnel: status_funnel(applications),
        timeline: application_timeline(applications, now),
        top_jobs: top_jobs_by_volume(jobs, applications),
        average_time_to_hire_days: average_time_to_hire_days(applications),
        total_applications: applications.len(),
        active_events,
        open_onboarding_assignments,
    }
}
