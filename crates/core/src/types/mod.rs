//! Core types for the JobHub client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod job;
pub mod role;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use job::{Company, JobSummary};
pub use role::{AccountStatus, UserRole};
pub use user::{User, UserPatch};
