//! Test utilities for feedload.
//!
//! This crate provides an in-process mock of the feed API and a test logger. See the modules for
//! all available utilities.

pub mod server;
pub mod tracing;
