//! Service layer
//!
//! Capabilities the coordinator is handed instead of reaching them directly:
//! firing a job's trigger endpoint and marking downstream views stale.
//!
//! Both are trait-based so tests can substitute fakes.

mod trigger;
mod views;

// Re-export traits
pub use trigger::JobTrigger;
pub use views::ViewInvalidator;

// Re-export implementations
pub use trigger::HttpJobTrigger;
pub use views::ViewCache;
