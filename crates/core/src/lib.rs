//! OnGil Core - Shared types library.
//!
//! This crate provides common types used across all OnGil storefront
//! components:
//! - `storefront` - The client-state engine (cart, reviews, remote API)
//! - `integration-tests` - Cross-module tests driving the engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and decimal prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
