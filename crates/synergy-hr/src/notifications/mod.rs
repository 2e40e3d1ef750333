//! Outbound notification contract.
//!
//! The engine never depends on delivery succeeding: every send goes through
//! [`dispatch_best_effort`], which logs a failure and moves on. Payloads are
//! a closed set of template kinds with fixed shapes so dispatcher
//! implementations can be checked statically.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::StoreError;
use crate::workflows::careers::domain::{ApplicationStatus, Job};

/// Trait describing the outbound message hook (e-mail, queue, console).
///
/// `notify` is synchronous from the engine's perspective but implementations
/// must not block unboundedly; queue-and-return is the expected shape.
pub trait NotificationDispatcher: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), DispatchError>;
}

/// Source of active newsletter recipient addresses for job broadcasts.
pub trait SubscriberDirectory: Send + Sync {
    fn active_subscriber_emails(&self) -> Result<Vec<String>, StoreError>;
}

/// Notification dispatch error. Absorbed by [`dispatch_best_effort`]; never
/// surfaced to workflow callers.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Closed set of message templates the workflows emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    ApplicationSubmitted {
        recipient: String,
        applicant_name: String,
        job_title: String,
        job_location: String,
        applied_on: NaiveDate,
    },
    ApplicationStatusChanged {
        recipient: String,
        applicant_name: String,
        job_title: String,
        old_status: ApplicationStatus,
        new_status: ApplicationStatus,
    },
    JobPosted {
        recipient: String,
        job_title: String,
        location: String,
        job_type_label: String,
        salary_range: Option<String>,
        deadline: Option<NaiveDate>,
    },
    EventRegistrationConfirmed {
        recipient: String,
        attendee_name: String,
        event_title: String,
        starts_at: DateTime<Utc>,
        location: String,
        meeting_link: Option<String>,
    },
}

impl Notification {
    pub fn template_kind(&self) -> &'static str {
        match self {
            Notification::ApplicationSubmitted { .. } => "application_submitted",
            Notification::ApplicationStatusChanged { .. } => "application_status_changed",
            Notification::JobPosted { .. } => "job_posted",
            Notification::EventRegistrationConfirmed { .. } => "event_registration_confirmed",
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Notification::ApplicationSubmitted { recipient, .. }
            | Notification::ApplicationStatusChanged { recipient, .. }
            | Notification::JobPosted { recipient, .. }
            | Notification::EventRegistrationConfirmed { recipient, .. } => recipient,
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Notification::ApplicationSubmitted { job_title, .. } => {
                format!("Application Received — {job_title}")
            }
            Notification::ApplicationStatusChanged { job_title, .. } => {
                format!("Application Update — {job_title}")
            }
            Notification::JobPosted { job_title, .. } => {
                format!("New Opportunity — {job_title}")
            }
            Notification::EventRegistrationConfirmed { event_title, .. } => {
                format!("Registration Confirmed — {event_title}")
            }
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::ApplicationSubmitted {
                applicant_name,
                job_title,
                job_location,
                applied_on,
                ..
            } => format!(
                "Dear {applicant_name},\n\n\
                 Thank you for applying for the position of {job_title} at \
                 Strategic Synergy Consultancy.\n\n\
                 We have received your application and our HR team will review it \
                 shortly. You will be notified of any updates to your application \
                 status.\n\n\
                 Position: {job_title}\n\
                 Location: {job_location}\n\
                 Application Date: {}\n\n\
                 Best regards,\nStrategic Synergy HR Team",
                applied_on.format("%B %d, %Y")
            ),
            Notification::ApplicationStatusChanged {
                applicant_name,
                job_title,
                new_status,
                ..
            } => {
                let mut body = format!(
                    "Dear {applicant_name},\n\n\
                     Your application for {job_title} has been updated.\n\n\
                     New Status: {}\n\n",
                    new_status.label()
                );
                match new_status {
                    ApplicationStatus::Interview => body.push_str(
                        "Congratulations! We'd like to invite you for an interview. \
                         Our team will reach out with scheduling details soon.\n\n",
                    ),
                    ApplicationStatus::Hired => body.push_str(
                        "Congratulations! We're thrilled to welcome you to the \
                         Strategic Synergy team! You will receive onboarding \
                         information shortly.\n\n",
                    ),
                    ApplicationStatus::Rejected => body.push_str(
                        "After careful consideration, we've decided to move forward \
                         with other candidates. We appreciate your interest and \
                         encourage you to apply for future openings.\n\n",
                    ),
                    _ => {}
                }
                body.push_str("Best regards,\nStrategic Synergy HR Team");
                body
            }
            Notification::JobPosted {
                job_title,
                location,
                job_type_label,
                salary_range,
                deadline,
                ..
            } => {
                let mut body = format!(
                    "A new position has been posted at Strategic Synergy \
                     Consultancy!\n\n\
                     Position: {job_title}\n\
                     Location: {location}\n\
                     Type: {job_type_label}\n"
                );
                if let Some(range) = salary_range {
                    body.push_str(&format!("Salary Range: {range}\n"));
                }
                if let Some(deadline) = deadline {
                    body.push_str(&format!(
                        "Application Deadline: {}\n",
                        deadline.format("%B %d, %Y")
                    ));
                }
                body.push_str(
                    "\nVisit our careers page to learn more and apply.\n\n\
                     Best regards,\nStrategic Synergy HR Team\n\n—\n\
                     You're receiving this because you subscribed to our newsletter.",
                );
                body
            }
            Notification::EventRegistrationConfirmed {
                attendee_name,
                event_title,
                starts_at,
                location,
                meeting_link,
                ..
            } => {
                let mut body = format!(
                    "Dear {attendee_name},\n\n\
                     You have successfully registered for:\n\n\
                     Event: {event_title}\n\
                     Date: {}\n\
                     Location: {location}\n",
                    starts_at.format("%B %d, %Y at %I:%M %p")
                );
                if let Some(link) = meeting_link {
                    body.push_str(&format!("Meeting Link: {link}\n"));
                }
                body.push_str(
                    "\nWe look forward to seeing you there!\n\n\
                     Best regards,\nStrategic Synergy Events Team",
                );
                body
            }
        }
    }
}

/// Send a notification, swallowing any dispatcher failure. The triggering
/// workflow operation must already have been persisted by the time this runs.
pub fn dispatch_best_effort<D>(dispatcher: &D, notification: Notification)
where
    D: NotificationDispatcher + ?Sized,
{
    let kind = notification.template_kind();
    let recipient = notification.recipient().to_string();
    if let Err(error) = dispatcher.notify(notification) {
        warn!(kind, %recipient, %error, "notification dispatch failed; continuing");
    }
}

/// Fan a job-posted announcement out to every active newsletter subscriber.
/// Directory lookup failure aborts the broadcast without surfacing an error.
pub fn broadcast_job_posted<D, S>(dispatcher: &D, directory: &S, job: &Job)
where
    D: NotificationDispatcher + ?Sized,
    S: SubscriberDirectory + ?Sized,
{
    let subscribers = match directory.active_subscriber_emails() {
        Ok(subscribers) => subscribers,
        Err(error) => {
            warn!(%error, "subscriber directory unavailable; skipping job broadcast");
            return;
        }
    };

    for recipient in subscribers {
        dispatch_best_effort(
            dispatcher,
            Notification::JobPosted {
                recipient,
                job_title: job.title.clone(),
                location: job.location.clone(),
                job_type_label: job.job_type.label().to_string(),
                salary_range: job.salary_range.clone(),
                deadline: job.deadline.map(|deadline| deadline.date_naive()),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingDispatcher;

    impl NotificationDispatcher for FailingDispatcher {
        fn notify(&self, _notification: Notification) -> Result<(), DispatchError> {
            Err(DispatchError::Transport("smtp offline".to_string()))
        }
    }

    fn submitted() -> Notification {
        Notification::ApplicationSubmitted {
            recipient: "jane@example.com".to_string(),
            applicant_name: "Jane Doe".to_string(),
            job_title: "HR Analyst".to_string(),
            job_location: "Des Moines".to_string(),
            applied_on: NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date"),
        }
    }

    #[test]
    fn best_effort_dispatch_swallows_transport_failures() {
        dispatch_best_effort(&FailingDispatcher, submitted());
    }

    #[test]
    fn status_change_body_congratulates_hires() {
        let notification = Notification::ApplicationStatusChanged {
            recipient: "jane@example.com".to_string(),
            applicant_name: "Jane Doe".to_string(),
            job_title: "HR Analyst".to_string(),
            old_status: ApplicationStatus::Interview,
            new_status: ApplicationStatus::Hired,
        };
        assert!(notification.body().contains("welcome you"));
        assert!(notification.subject().contains("HR Analyst"));
    }

    #[test]
    fn rejection_body_uses_the_regret_paragraph() {
        let notification = Notification::ApplicationStatusChanged {
            recipient: "jane@example.com".to_string(),
            applicant_name: "Jane Doe".to_string(),
            job_title: "HR Analyst".to_string(),
            old_status: ApplicationStatus::Pending,
            new_status: ApplicationStatus::Rejected,
        };
        assert!(notification.body().contains("other candidates"));
    }

    #[test]
    fn submitted_body_names_the_position() {
        let notification = submitted();
        assert_eq!(notification.template_kind(), "application_submitted");
        assert!(notification.body().contains("HR Analyst"));
        assert!(notification.body().contains("January 10, 2024"));
    }
}
