//! Load generator for the social feed API.
//!
//! Simulated users pick randomized read requests from weighted behavior [`profiles`] and send them
//! to the target host. Every response is classified as pass or fail by [`classify`], and the
//! resulting counters are reported per endpoint. Scheduling of virtual users and the statistics
//! are provided by [goose](https://docs.rs/goose).
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod attack;
pub mod classify;
pub mod cli;
pub mod config;
pub mod endpoint;
pub mod healthcheck;
pub mod observability;
pub mod profiles;
pub mod request;
pub mod samples;
pub mod session;
pub mod transport;
