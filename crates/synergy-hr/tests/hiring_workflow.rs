//! End-to-end coverage of the hiring funnel: posting, intake, review
//! transitions, export, and the analytics read computed over the same store.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use synergy_hr::notifications::{
        DispatchError, Notification, NotificationDispatcher, SubscriberDirectory,
    };
    use synergy_hr::store::StoreError;
    use synergy_hr::workflows::careers::{
        Application, ApplicationId, ApplicationSubmission, CareersService, CareersStore, Job,
        JobId, JobPosting, JobType,
    };

    pub(super) fn posting(title: &str) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            location: "Des Moines".to_string(),
            job_type: JobType::FullTime,
            description: "Role description.".to_string(),
            requirements: "Role requirements.".to_string(),
            salary_range: Some("$60k - $75k".to_string()),
            deadline: None,
        }
    }

    pub(super) fn submission(name: &str, email: &str) -> ApplicationSubmission {
        ApplicationSubmission {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            linkedin_url: None,
            resume_key: format!("resumes/{email}.pdf"),
            cover_letter: String::new(),
        }
    }

    pub(super) type TestService = CareersService<MemoryStore, MemoryDispatcher, MemorySubscribers>;

    pub(super) fn build_service() -> (
        Arc<TestService>,
        Arc<MemoryStore>,
        Arc<MemoryDispatcher>,
        Arc<MemorySubscribers>,
    ) {
        let store = Arc::new(MemoryStore::default());
        let dispatcher = Arc::new(MemoryDispatcher::default());
        let subscribers = Arc::new(MemorySubscribers::default());
        let service = Arc::new(CareersService::new(
            store.clone(),
            dispatcher.clone(),
            subscribers.clone(),
        ));
        (service, store, dispatcher, subscribers)
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryStore {
        jobs: Arc<Mutex<HashMap<JobId, Job>>>,
        applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
    }

    impl CareersStore for MemoryStore {
        fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
            let mut guard = self.jobs.lock().expect("job mutex poisoned");
            if guard.contains_key(&job.id) {
                return Err(StoreError::Conflict);
            }
            guard.insert(job.id.clone(), job.clone());
            Ok(job)
        }

        fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
            Ok(self
                .jobs
                .lock()
                .expect("job mutex poisoned")
                .get(id)
                .cloned())
        }

        fn jobs(&self) -> Result<Vec<Job>, StoreError> {
            let guard = self.jobs.lock().expect("job mutex poisoned");
            let mut jobs: Vec<Job> = guard.values().cloned().collect();
            jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.0.cmp(&a.id.0)));
            Ok(jobs)
        }

        fn insert_application(
            &self,
            application: Application,
        ) -> Result<Application, StoreError> {
            let mut guard = self
                .applications
                .lock()
                .expect("application mutex poisoned");
            if guard.contains_key(&application.id) {
                return Err(StoreError::Conflict);
            }
            guard.insert(application.id.clone(), application.clone());
            Ok(application)
        }

        fn update_application(&self, application: Application) -> Result<(), StoreError> {
            let mut guard = self
                .applications
                .lock()
                .expect("application mutex poisoned");
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
            Ok(self
                .applications
                .lock()
                .expect("application mutex poisoned")
                .get(id)
                .cloned())
        }

        fn applications(&self) -> Result<Vec<Application>, StoreError> {
            let guard = self
                .applications
                .lock()
                .expect("application mutex poisoned");
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
}

use chrono::Utc;
use common::*;
use synergy_hr::notifications::Notification;
use synergy_hr::workflows::analytics;
use synergy_hr::workflows::careers::{ApplicationStatus, CareersStore};
use synergy_hr::workflows::identity::Actor;

#[test]
fn candidate_journey_from_posting_to_hire() {
    let (service, store, dispatcher, subscribers) = build_service();
    subscribers.add("reader@example.com");
    let hr = Actor::hr_manager("hr-lead");

    let job = service
        .post_job(posting("Staff Consultant"), &hr)
        .expect("job posted");
    let hired = service
        .submit_application(&job.id, submission("Ada Park", "ada@example.com"))
        .expect("application accepted");
    service
        .submit_application(&job.id, submission("Ben Ito", "ben@example.com"))
        .expect("application accepted");

    for status in ["REVIEWED", "INTERVIEW", "HIRED"] {
        service
            .transition(&hired.id, status, &hr)
            .expect("transition applied");
    }

    let stored = store
        .fetch_application(&hired.id)
        .expect("store reachable")
        .expect("application present");
    assert_eq!(stored.status, ApplicationStatus::Hired);
    assert_eq!(
        stored.reviewed_by.as_ref().map(|id| id.0.as_str()),
        Some("hr-lead")
    );

    // One broadcast, two receipts, three status updates.
    let sent = dispatcher.sent();
    let broadcasts = sent
        .iter()
        .filter(|n| matches!(n, Notification::JobPosted { .. }))
        .count();
    let receipts = sent
        .iter()
        .filter(|n| matches!(n, Notification::ApplicationSubmitted { .. }))
        .count();
    let updates = sent
        .iter()
        .filter(|n| matches!(n, Notification::ApplicationStatusChanged { .. }))
        .count();
    assert_eq!((broadcasts, receipts, updates), (1, 2, 3));

    let export = service.export_applications(&hr).expect("csv rendered");
    assert!(export.contains("Ada Park"));
    assert!(export.contains("Hired"));
    assert!(export.contains("Staff Consultant"));
}

#[test]
fn dashboard_reflects_the_live_pipeline() {
    let (service, store, _, _) = build_service();
    let hr = Actor::hr_manager("hr-lead");

    let busy = service
        .post_job(posting("Senior Consultant"), &hr)
        .expect("job posted");
    let quiet = service
        .post_job(posting("Office Manager"), &hr)
        .expect("job posted");

    for index in 0..3 {
        service
            .submit_application(
                &busy.id,
                submission(&format!("Candidate {index}"), &format!("c{index}@example.com")),
            )
            .expect("application accepted");
    }
    let hired = service
        .submit_application(&quiet.id, submission("Dana Reyes", "dana@example.com"))
        .expect("application accepted");
    service
        .transition(&hired.id, "HIRED", &hr)
        .expect("transition applied");

    let jobs = store.jobs().expect("store reachable");
    let applications = store.applications().expect("store reachable");
    let dashboard = analytics::dashboard(&jobs, &applications, 1, 2, Utc::now());

    assert_eq!(dashboard.total_applications, 4);
    assert_eq!(dashboard.active_events, 1);
    assert_eq!(dashboard.open_onboarding_assignments, 2);

    // All five funnel buckets are present even when empty.
    assert_eq!(dashboard.funnel.len(), 5);
    let funnel_total: usize = dashboard.funnel.iter().map(|entry| entry.count).sum();
    assert_eq!(funnel_total, 4);
    assert!(dashboard
        .funnel
        .iter()
        .any(|entry| entry.status == ApplicationStatus::Hired && entry.count == 1));

    assert_eq!(dashboard.top_jobs[0].title, "Senior Consultant");
    assert_eq!(dashboard.top_jobs[0].application_count, 3);

    // Everything was submitted just now, so the whole volume lands in the
    // current month at the end of the dense six-month window.
    assert_eq!(dashboard.timeline.len(), 6);
    assert_eq!(dashboard.timeline[5].count, 4);

    // Hired and reviewed moments are seconds apart.
    assert_eq!(dashboard.average_time_to_hire_days, 0);
}
