pub mod error;
pub mod handlers;
pub mod router;
pub mod models;
pub mod services;
pub mod store;

// Re-export all models and services for external use
pub use error::VetError;
pub use models::*;
pub use services::*;
pub use store::{InMemoryVetStore, SupabaseVetStore, VetStore};
