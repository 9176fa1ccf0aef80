//! Lunchbox Core - Shared types and business rules.
//!
//! This crate provides the types used across all Lunchbox components:
//! - `server` - The lunch ordering web application
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`permissions`] - The store deletion rule, shared by the web
//!   workflow and the JSON APIs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod permissions;
pub mod types;

pub use permissions::can_user_delete;
pub use types::*;
