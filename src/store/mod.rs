pub mod seen;

// Re-export commonly used types
pub use seen::{FileSeenStore, SeenStore, StoreError};
