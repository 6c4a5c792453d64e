//! Configuration types.
//!
//! This module provides configuration options for:
//! - [`GuardConfig`]: How guards report and record caught failures

mod guard;

pub use guard::GuardConfig;
