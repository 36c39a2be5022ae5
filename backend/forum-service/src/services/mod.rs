//! Business logic layer
//!
//! Boundary validation and server-side authorization over the repositories.
//! Nothing reaches the store without passing these checks.

pub mod posts;
pub mod users;

// Re-export commonly used services
pub use posts::PostService;
pub use users::{Session, UserService};
