//! Building blocks for randomized feed requests.
//!
//! A [`FeedRequest`] is a fully resolved description of a single GET request: which endpoint to
//! call, which query parameters to send and which responses count as a success. Recipes in the
//! [`profiles`](crate::profiles) modules produce these from a [`Context`] and an RNG, which keeps
//! them free of any I/O and easy to test.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::endpoint::Endpoint;
use crate::samples::SampleData;

/// Query parameter carrying the pubkey of the user performing the request.
pub const REQUESTER: &str = "requesterPubkey";

/// Probability of adding a `before` cursor in full pagination.
const BEFORE_PROBABILITY: f64 = 0.3;
/// Probability of adding an `after` cursor when no `before` cursor was added.
const AFTER_PROBABILITY: f64 = 0.1;

/// Which responses a request expects.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Expectation {
    /// Only `200 OK` is a success.
    Ok,
    /// The request is malformed on purpose; `400` and `404` are successes.
    ClientError,
}

/// A single GET request against the feed API.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedRequest {
    /// The endpoint to call.
    pub endpoint: Endpoint,
    /// Query parameters in the order they are sent.
    pub params: Vec<(&'static str, String)>,
    /// Which responses count as a success.
    pub expect: Expectation,
}

impl FeedRequest {
    /// Creates a request without parameters that expects `200 OK`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
            expect: Expectation::Ok,
        }
    }

    /// Appends a query parameter.
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Marks the request as intentionally invalid.
    pub fn expect_client_error(mut self) -> Self {
        self.expect = Expectation::ClientError;
        self
    }

    /// Adds `before`/`after` cursors the way a scrolling client would.
    ///
    /// With probability 0.3 a `before` cursor between one hour and one day in the past is added.
    /// Otherwise, an independent draw with probability 0.1 adds an `after` cursor between one and
    /// two days in the past.
    pub fn paginate<R: Rng + ?Sized>(self, rng: &mut R, now: u64) -> Self {
        if rng.random_bool(BEFORE_PROBABILITY) {
            self.param("before", now.saturating_sub(rng.random_range(3600..=86400)))
        } else if rng.random_bool(AFTER_PROBABILITY) {
            self.param("after", now.saturating_sub(rng.random_range(86400..=172800)))
        } else {
            self
        }
    }

    /// Adds a `before` cursor between one hour and one day in the past with the given probability.
    pub fn paginate_before<R: Rng + ?Sized>(self, rng: &mut R, now: u64, probability: f64) -> Self {
        if rng.random_bool(probability) {
            self.param("before", now.saturating_sub(rng.random_range(3600..=86400)))
        } else {
            self
        }
    }

    /// Returns the value of the first parameter with the given name.
    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Everything a recipe needs besides randomness.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    /// Identifiers to draw parameters from.
    pub samples: &'a SampleData,
    /// The pubkey this virtual user acts as.
    pub requester: &'a str,
    /// Current unix time in seconds.
    pub now: u64,
}

impl<'a> Context<'a> {
    /// Creates a context for the given requester at the current wall-clock time.
    pub fn new(samples: &'a SampleData, requester: &'a str) -> Self {
        Self {
            samples,
            requester,
            now: unix_now(),
        }
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
