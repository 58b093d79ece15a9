//! Observability for the content engine
//!
//! Structured JSON log lines keyed by typed [`Event`]s. Logging never affects
//! the outcome of the operation being logged.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, LogLevel};

/// Log an event with fields at the severity its kind implies
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        LogLevel::Error
    } else {
        LogLevel::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
