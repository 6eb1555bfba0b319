pub mod match_filter;
pub mod poll_service;
pub mod notification_service;

pub use match_filter::MatchFilter;
pub use poll_service::{CycleReport, PollService};
pub use notification_service::{ConsoleNotifier, EmailNotifier, Notifier};
