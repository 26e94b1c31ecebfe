//! Core types and trait definitions for the Locus site registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod asset;
pub mod error;
pub mod patch;
pub mod program;
pub mod recommendation;
pub mod site;
pub mod staff;
pub mod store;
pub mod user;

pub use error::{EntityKind, Error, Result};
