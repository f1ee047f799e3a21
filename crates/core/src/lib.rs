//! JobHub Core - Shared domain types.
//!
//! This crate provides the common types used across the JobHub client
//! workspace:
//!
//! - `client` - Session, navigation, and backend API clients
//! - `integration-tests` - Scenario tests with fixture collaborators
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! storage access. This keeps it lightweight and allows it to be used
//! anywhere, including inside test fixtures.
//!
//! # Modules
//!
//! - [`types`] - ID newtypes, validated emails, roles, user and job records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
