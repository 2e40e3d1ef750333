//! Tabular dump of the application pipeline. Formatting only; every value
//! comes straight off the stored records.

use std::collections::HashMap;

use super::domain::{Application, Job, JobId};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Buffer(String),
    #[error("exported csv was not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

const HEADER: [&str; 8] = [
    "name",
    "email",
    "phone",
    "job_title",
    "applied_date",
    "status",
    "rating",
    "notes",
];

/// Render the applications table as CSV. Applied dates are ISO dates and the
/// status column carries the human label, matching the report handed to HR.
pub fn applications_csv(applications: &[Application], jobs: &[Job]) -> Result<String, ExportError> {
    let titles: HashMap<&JobId, &str> = jobs
        .iter()
        .map(|job| (&job.id, job.title.as_str()))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for application in applications {
        writer.write_record([
            application.full_name.as_str(),
            application.email.as_str(),
            application.phone.as_str(),
            titles.get(&application.job_id).copied().unwrap_or(""),
            &application.applied_at.date_naive().to_string(),
            application.status.label(),
            &application.rating.to_string(),
            application.notes.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
