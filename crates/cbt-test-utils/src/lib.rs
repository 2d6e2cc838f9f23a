//! Shared test utilities for the cbt-modules workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`packages`]: [`TestPackages`] builder for a packages directory with
//!   manifests and restored modules

pub mod packages;

pub use packages::TestPackages;
