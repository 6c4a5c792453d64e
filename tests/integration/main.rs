//! Integration tests for wari.
//!
//! These tests exercise the public API the way an application does: error
//! kinds declared with `#[derive(Details)]`, passed through call chains and
//! dispatched at the edge.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With guard and dispatch events printed
//! RUST_LOG=wari=debug cargo test --test integration -- --nocapture
//! ```

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;
mod derive_tests;
mod dispatch_tests;
mod guard_tests;
