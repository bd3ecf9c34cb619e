//! Shared test utilities for the oauth-cli workspace.
//!
//! This crate provides:
//! - Proptest generators for service identities, URLs and PEM shapes
//! - Test fixtures: private keys in every supported encoding and sample
//!   token endpoint responses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use generators::*;
