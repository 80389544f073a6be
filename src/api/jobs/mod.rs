pub mod dto;
pub mod handlers;
pub mod service;

// Re-export commonly used types
pub use dto::{CheckReport, CheckSummary};
pub use service::{JobTracker, ServiceError};
