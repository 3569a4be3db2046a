//! Gursha Core - Shared domain types.
//!
//! This crate provides the common types used across all Gursha client
//! components:
//! - `client` - Stores, API gateway, and secure-storage bindings
//! - `cli` - Development harness driving the stores from the terminal
//!
//! # Architecture
//!
//! The core crate contains only types and their invariants - no I/O, no
//! HTTP, no persistence. This keeps it lightweight and allows it to be
//! used anywhere, including inside tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, and the status/role/label enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
