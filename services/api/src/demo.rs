use crate::infra::{build_hr_services, HrServices};
use chrono::{Duration, Utc};
use clap::Args;
use synergy_hr::error::AppError;
use synergy_hr::workflows::analytics;
use synergy_hr::workflows::careers::{
    ApplicationSubmission, CareersError, CareersStore, JobPosting, JobType,
};
use synergy_hr::workflows::events::{Event, EventId, EventsError, EventStore, RegistrationRequest};
use synergy_hr::workflows::identity::{Actor, UserId};
use synergy_hr::workflows::onboarding::{
    NewTask, OnboardingError, OnboardingStore, TaskType,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the CSV export of the application pipeline as part of the output
    #[arg(long)]
    pub(crate) include_export: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let services = build_hr_services();
    let hr = Actor::hr_manager("hr-demo");

    println!("Strategic Synergy HR workflow demo");
    services.subscribers.subscribe("talent-watch@example.com");
    services.subscribers.subscribe("alumni@example.com");

    let consultant = services.careers.post_job(
        JobPosting {
            title: "Senior Consultant".to_string(),
            location: "Des Moines".to_string(),
            job_type: JobType::FullTime,
            description: "Lead client engagements end to end.".to_string(),
            requirements: "5+ years consulting experience.".to_string(),
            salary_range: Some("$95k - $120k".to_string()),
            deadline: None,
        },
        &hr,
    )?;
    let office_manager = services.careers.post_job(
        JobPosting {
            title: "Office Manager".to_string(),
            location: "Des Moines".to_string(),
            job_type: JobType::PartTime,
            description: "Keep the office running.".to_string(),
            requirements: "Organizational wizardry.".to_string(),
            salary_range: None,
            deadline: None,
        },
        &hr,
    )?;
    println!(
        "- Posted {} and {} (2 newsletter subscribers notified per posting)",
        consultant.title, office_manager.title
    );

    let candidates = [
        ("Ada Park", "ada@example.com", &consultant.id),
        ("Ben Ito", "ben@example.com", &consultant.id),
        ("Cleo Vance", "cleo@example.com", &office_manager.id),
    ];
    let mut applications = Vec::new();
    for (name, email, job_id) in candidates {
        let application = services.careers.submit_application(
            job_id,
            ApplicationSubmission {
                full_name: name.to_string(),
                email: email.to_string(),
                phone: "555-0100".to_string(),
                linkedin_url: None,
                resume_key: format!("resumes/{email}.pdf"),
                cover_letter: String::new(),
            },
        )?;
        applications.push(application);
    }
    println!("- Received {} applications", applications.len());

    for status in ["REVIEWED", "INTERVIEW", "HIRED"] {
        let outcome = services.careers.transition(&applications[0].id, status, &hr)?;
        println!(
            "- {} -> {} (reviewed by {})",
            outcome.application_id.0, outcome.status_label, outcome.reviewed_by
        );
    }
    services.careers.transition(&applications[1].id, "REVIEWED", &hr)?;
    services.careers.set_rating(&applications[0].id, 5, &hr)?;

    let program = services.onboarding.create_program(
        "Consultant Onboarding".to_string(),
        "First-week checklist for consultants.".to_string(),
        &hr,
    )?;
    for (title, task_type) in [
        ("Upload signed offer", TaskType::DocumentUpload),
        ("Acknowledge handbook", TaskType::PolicyAcknowledgement),
        ("Security training", TaskType::Training),
    ] {
        services.onboarding.add_task(
            &program.id,
            NewTask {
                title: title.to_string(),
                description: String::new(),
                task_type,
                order: None,
                is_required: true,
            },
            &hr,
        )?;
    }

    let new_hire = Actor::employee("emp-ada");
    let assignment = services.onboarding.assign(
        &program.id,
        UserId("emp-ada".to_string()),
        Some((Utc::now() + Duration::days(14)).date_naive()),
        &hr,
    )?;
    let completions = services
        .onboarding_store
        .completions_for_assignment(&assignment.id)
        .map_err(OnboardingError::from)?;
    for completion in completions.iter().take(2) {
        let snapshot = services.onboarding.complete_task(&completion.id, &new_hire)?;
        println!(
            "- Onboarding progress for {}: {}% ({}/{})",
            assignment.employee,
            snapshot.progress_percent,
            snapshot.completed_count,
            snapshot.total_tasks
        );
    }

    let now = Utc::now();
    services
        .event_store
        .insert_event(Event {
            id: EventId("evt-0001".to_string()),
            title: "Quarterly Town Hall".to_string(),
            description: "Company-wide update and Q&A.".to_string(),
            start_time: now + Duration::days(7),
            end_time: now + Duration::days(7) + Duration::hours(2),
            location: "HQ Auditorium".to_string(),
            meeting_link: Some("https://meet.example.com/town-hall".to_string()),
            is_active: true,
            created_at: now,
        })
        .map_err(EventsError::from)?;
    let registration = services.events.register(
        &EventId("evt-0001".to_string()),
        RegistrationRequest {
            name: "Ada Park".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
        },
    )?;
    println!(
        "- {} registered for the town hall ({})",
        registration.name, registration.id.0
    );

    let jobs = services
        .careers_store
        .jobs()
        .map_err(CareersError::from)?;
    let pipeline = services
        .careers_store
        .applications()
        .map_err(CareersError::from)?;
    let active_events = services
        .event_store
        .active_event_count()
        .map_err(EventsError::from)?;
    let open_assignments = services
        .onboarding_store
        .open_assignment_count()
        .map_err(OnboardingError::from)?;

    let dashboard = analytics::dashboard(&jobs, &pipeline, active_events, open_assignments, now);
    match serde_json::to_string_pretty(&dashboard) {
        Ok(json) => println!("\nHiring dashboard:\n{json}"),
        Err(err) => println!("\nHiring dashboard unavailable: {err}"),
    }

    if args.include_export {
        let export = export_pipeline(&services, &hr)?;
        println!("\nApplication export:\n{export}");
    }

    Ok(())
}

fn export_pipeline(services: &HrServices, hr: &Actor) -> Result<String, AppError> {
    Ok(services.careers.export_applications(hr)?)
}
