//! Executes [`FeedRequest`]s through a goose user.

use goose::goose::GooseResponse;
use goose::prelude::*;

use crate::classify::{Verdict, classify};
use crate::request::FeedRequest;

/// Sends a request on behalf of `user` and records whether it passed.
///
/// Requests are named by their endpoint path so that statistics aggregate per endpoint. Returns the
/// response body if the request passed. Requests that fail at the transport level are recorded by
/// goose itself and yield `Ok(None)`, so a refused connection does not stop the user.
pub async fn send(
    user: &mut GooseUser,
    request: &FeedRequest,
) -> Result<Option<String>, Box<TransactionError>> {
    let path = request.endpoint.path();
    let builder = user
        .get_request_builder(&GooseMethod::Get, path)?
        .query(&request.params);
    let goose_request = GooseRequest::builder()
        .method(GooseMethod::Get)
        .path(path)
        .name(path)
        .set_request_builder(builder)
        .build();

    let GooseResponse {
        request: mut metric,
        response,
    } = user.request(goose_request).await?;

    let response = match response {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!(%error, endpoint = path, "request failed");
            return Ok(None);
        }
    };

    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();

    match classify(status, request.expect, &body) {
        Verdict::Pass => {
            user.set_success(&mut metric)?;
            Ok(Some(body))
        }
        Verdict::Fail(message) => {
            tracing::trace!(endpoint = path, status, "{message}");
            user.set_failure(&message, &mut metric, Some(&headers), Some(&body))?;
            Ok(None)
        }
    }
}
