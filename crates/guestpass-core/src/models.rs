//! Domain models for guestpass.
//!
//! These are the core types shared across all crates.

pub mod account;
pub mod group;
pub mod session;
