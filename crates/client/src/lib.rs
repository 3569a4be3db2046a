//! Gursha client-state layer.
//!
//! Everything between the screens (out of scope here) and the REST
//! backend: configuration, the API gateway, the secure-storage binding,
//! and the stores that own each slice of client state.
//!
//! # Architecture
//!
//! Control flow is unidirectional and shallow: a screen triggers a store
//! operation, the store calls the [`gateway`], applies the result to its
//! own slice, and the screen re-renders from the store. Each store is the
//! sole writer of its slice; there are no cross-store transactions.
//!
//! Concurrency is the single-threaded UI event loop model: store methods
//! take `&mut self` and interleave only at `await` points. The gateway
//! never fabricates success data on failure - fallback display decisions
//! belong to the stores and screens.
//!
//! # Modules
//!
//! - [`config`] - Environment-based configuration
//! - [`gateway`] - The shared HTTP client for all backend calls
//! - [`models`] - Client-side entity types
//! - [`storage`] - Secure on-device key-value persistence
//! - [`stores`] - Auth, cart/order, profile, restaurant, and recipe state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod storage;
pub mod stores;

pub use config::{ClientConfig, Environment};
pub use error::ValidationError;
pub use gateway::{ApiError, ApiGateway};
