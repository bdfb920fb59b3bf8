//! Core domain types for the waitlist signup service.
//!
//! Provides the validated email newtype, the signup record with its storage
//! key derivation, the write-only store abstraction, and the clock used to
//! stamp signups. All other crates depend on these foundational types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;
pub mod time;

pub use error::{CoreError, Result};
pub use models::{EmailAddress, Signup};
pub use storage::SignupStore;
pub use time::{Clock, RealClock, TestClock};
