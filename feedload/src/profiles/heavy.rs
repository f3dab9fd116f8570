//! Aggressive users that page through feeds with large limits and short pauses.

use goose::prelude::*;

use super::api::recipe_transaction;
use super::{Profile, ProfileOptions, Task};
use crate::config::WaitTime;
use crate::endpoint::Endpoint;
use crate::request::{Context, FeedRequest, REQUESTER};
use crate::session;
use crate::transport::send;

/// Page size used for rapid pagination.
const PAGE_LIMIT: u32 = 50;

/// Cursor offsets of consecutive pages: one, two and three hours ago.
const PAGE_OFFSETS: [u64; 3] = [3600, 7200, 10800];

/// Few users that page quickly through the watching feed.
pub fn heavy_load_user(options: ProfileOptions) -> Profile {
    Profile::new("HeavyLoadUser", 1, WaitTime::from_millis(500, 1500))
        .task_if(options.following_feed, || {
            Task::new(
                "rapid_following",
                5,
                Endpoint::ContentsFollowing,
                transaction!(rapid_following_transaction),
            )
        })
        .task(Task::new(
            "rapid_pagination",
            3,
            Endpoint::PostsWatching,
            transaction!(rapid_pagination_transaction),
        ))
}

/// Three consecutive pages of the watching feed, walking back in time.
pub fn rapid_pagination(ctx: &Context<'_>) -> Vec<FeedRequest> {
    PAGE_OFFSETS
        .iter()
        .map(|offset| {
            FeedRequest::new(Endpoint::PostsWatching)
                .param(REQUESTER, ctx.requester)
                .param("limit", PAGE_LIMIT)
                .param("before", ctx.now.saturating_sub(*offset))
        })
        .collect()
}

/// The following feed at the maximum page size.
pub fn rapid_following<R: rand::Rng + ?Sized>(_rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::ContentsFollowing)
        .param(REQUESTER, ctx.requester)
        .param("limit", 100)
}

async fn rapid_pagination_transaction(user: &mut GooseUser) -> TransactionResult {
    let requester = session::requester(user);
    let pages = rapid_pagination(&Context::new(session::samples(), &requester));

    for page in &pages {
        send(user, page).await?;
    }

    Ok(())
}

recipe_transaction!(rapid_following_transaction, rapid_following);
