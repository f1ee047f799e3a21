//! JobHub client engine.
//!
//! This crate holds the non-visual machinery of the JobHub single-page
//! application:
//!
//! - [`session`] - the session store: who is logged in, token persistence,
//!   refresh, and the MFA handshake
//! - [`navigation`] - the navigation controller: logical pages, the
//!   page/path table, and authorization guards
//! - [`api`] - HTTP collaborator clients for the JobHub REST backend
//! - [`storage`] - the durable string key-value store seam
//! - [`config`] - environment-driven client configuration
//!
//! # Architecture
//!
//! Rendering is someone else's job. The session store and navigation
//! controller are plain objects constructed at application bootstrap and
//! handed to the UI layer; every browser-facing effect (address bar,
//! scroll, persistent storage, analytics) goes through a trait seam so the
//! whole engine runs unmodified under test.
//!
//! The navigation controller subscribes to session events rather than
//! reading session state ambiently, which keeps the dependency direction
//! explicit: session changes flow forward into page transitions, never the
//! other way around.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod navigation;
pub mod session;
pub mod storage;
