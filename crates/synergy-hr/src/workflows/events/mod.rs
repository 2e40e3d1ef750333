//! Company events and attendee registrations. The engine only needs the
//! registration operation (with its confirmation notification) and the
//! active-event tally consumed by the analytics summary.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notifications::{dispatch_best_effort, Notification, NotificationDispatcher};
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

/// A scheduled company event, physical or virtual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub meeting_link: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// One attendee registration for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub registered_at: DateTime<Utc>,
}

/// Attendee-supplied registration payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Storage abstraction for events and registrations.
pub trait EventStore: Send + Sync {
    fn insert_event(&self, event: Event) -> Result<Event, StoreError>;
    fn fetch_event(&self, id: &EventId) -> Result<Option<Event>, StoreError>;
    fn insert_registration(&self, registration: Registration)
        -> Result<Registration, StoreError>;
    fn active_event_count(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

static REGISTRATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_registration_id() -> RegistrationId {
    RegistrationId(format!(
        "reg-{:05}",
        REGISTRATION_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

/// Records registrations and confirms them to the attendee, best-effort.
pub struct EventRegistrationService<S, D> {
    store: Arc<S>,
    dispatcher: Arc<D>,
}

impl<S, D> EventRegistrationService<S, D>
where
    S: EventStore + 'static,
    D: NotificationDispatcher + 'static,
{
    pub fn new(store: Arc<S>, dispatcher: Arc<D>) -> Self {
        Self { store, dispatcher }
    }

    pub fn register(
        &self,
        event_id: &EventId,
        request: RegistrationRequest,
    ) -> Result<Registration, EventsError> {
        let event = self
            .store
            .fetch_event(event_id)?
            .filter(|event| event.is_active)
            .ok_or(EventsError::NotFound)?;

        let registration = Registration {
            id: next_registration_id(),
            event_id: event.id.clone(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            registered_at: Utc::now(),
        };
        let registration = self.store.insert_registration(registration)?;

        dispatch_best_effort(
            self.dispatcher.as_ref(),
            Notification::EventRegistrationConfirmed {
                recipient: registration.email.clone(),
                attendee_name: registration.name.clone(),
                event_title: event.title.clone(),
                starts_at: event.start_time,
                location: event.location.clone(),
                meeting_link: event.meeting_link.clone(),
            },
        );

        Ok(registration)
    }
}
