pub mod models;
pub mod region;

// Re-export commonly used types
pub use models::JobRecord;
pub use region::categorize_location;
