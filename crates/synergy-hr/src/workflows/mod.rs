pub mod analytics;
pub mod careers;
pub mod events;
pub mod identity;
pub mod onboarding;
