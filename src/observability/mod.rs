//! Observability
//!
//! Structured one-line JSON logs naming a typed `Event`.
//!
//! ```ignore
//! use schooldesk::observability::{Event, Logger};
//!
//! Logger::info(Event::ClassCreated.as_str(), &[("class_id", "c1")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{format_line, parse_line, Logger, Severity};
