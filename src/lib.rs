//! binwatch intake library.
//!
//! Exposes the pure-logic modules for integration testing and
//! embedding in a host process. All filesystem and clock code lives
//! behind port traits in [`app::ports`], with concrete adapters under
//! [`adapters`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod fill;
pub mod alert;
pub mod history;
pub mod reading;

pub mod error;
pub mod adapters;
