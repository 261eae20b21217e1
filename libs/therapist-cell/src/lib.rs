pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

// Re-export models and services for external use
pub use models::*;
pub use services::*;
