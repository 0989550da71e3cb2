//! Configuration for SetDisplay
//!
//! - **paths**: where profile files live, resolved once in `main` and passed
//!   to the profile store as a `StoreConfig` value

pub mod paths;

// Re-export commonly used types
pub use paths::StoreConfig;
