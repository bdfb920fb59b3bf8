//! HTTP request handlers.

pub mod health;
pub mod signup;

pub use health::{health_check, liveness_check};
pub use signup::{method_not_allowed, preflight, signup};
