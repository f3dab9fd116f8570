//! Pass/fail classification of responses.

use crate::request::Expectation;

/// Bodies longer than this are cut off in failure messages.
const MAX_BODY_LEN: usize = 512;

/// Outcome of a single request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// The response matches the expectation.
    Pass,
    /// The response does not match; carries a message for the error report.
    Fail(String),
}

/// Classifies a response status against the expectation of its request.
pub fn classify(status: u16, expect: Expectation, body: &str) -> Verdict {
    let body = truncate(body);
    match (expect, status) {
        (Expectation::Ok, 200) => Verdict::Pass,
        (Expectation::Ok, status) => Verdict::Fail(format!("Got {status}: {body}")),
        (Expectation::ClientError, 400 | 404) => Verdict::Pass,
        (Expectation::ClientError, 200) => {
            Verdict::Fail(format!("Expected error but got 200: {body}"))
        }
        (Expectation::ClientError, status) => {
            Verdict::Fail(format!("Unexpected status {status}: {body}"))
        }
    }
}

fn truncate(body: &str) -> &str {
    if body.len() <= MAX_BODY_LEN {
        return body;
    }
    let mut end = MAX_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_requests_only_accept_200() {
        assert_eq!(classify(200, Expectation::Ok, ""), Verdict::Pass);
        assert_eq!(
            classify(204, Expectation::Ok, ""),
            Verdict::Fail("Got 204: ".into())
        );
        assert_eq!(
            classify(429, Expectation::Ok, "slow down"),
            Verdict::Fail("Got 429: slow down".into())
        );
    }

    #[test]
    fn client_errors_accept_400_and_404() {
        assert_eq!(classify(400, Expectation::ClientError, ""), Verdict::Pass);
        assert_eq!(classify(404, Expectation::ClientError, ""), Verdict::Pass);
        assert_eq!(
            classify(200, Expectation::ClientError, "{}"),
            Verdict::Fail("Expected error but got 200: {}".into())
        );
        assert_eq!(
            classify(500, Expectation::ClientError, "boom"),
            Verdict::Fail("Unexpected status 500: boom".into())
        );
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "ä".repeat(MAX_BODY_LEN);
        let Verdict::Fail(message) = classify(500, Expectation::Ok, &body) else {
            panic!("expected failure");
        };
        assert!(message.len() <= "Got 500: ".len() + MAX_BODY_LEN);
    }
}
