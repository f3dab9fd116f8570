//! Users that browse slowly, look at their own activity and open posts they came across.

use goose::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::api::recipe_transaction;
use super::{Profile, ProfileOptions, Task};
use crate::config::WaitTime;
use crate::endpoint::Endpoint;
use crate::request::{Context, FeedRequest, REQUESTER};
use crate::session::{self, UserSession};
use crate::transport::send;

const FEED_PAGE_SIZES: [u32; 3] = [10, 20, 30];
const DISCOVERY_PAGE_SIZES: [u32; 2] = [20, 50];
const OWN_PAGE_SIZE: u32 = 20;

/// The most common kind of user: long pauses and a self-centered task mix.
pub fn realistic_user(options: ProfileOptions) -> Profile {
    Profile::new("RealisticUser", 3, WaitTime::from_millis(2000, 8000))
        .task_if(options.following_feed, || {
            Task::new(
                "browse_following_feed",
                10,
                Endpoint::ContentsFollowing,
                transaction!(browse_following_feed_transaction),
            )
        })
        .task(Task::new(
            "check_mentions",
            2,
            Endpoint::Mentions,
            transaction!(check_mentions_transaction),
        ))
        .task(Task::new(
            "view_post_details",
            3,
            Endpoint::PostDetails,
            transaction!(view_post_details_transaction),
        ))
        .task(Task::new(
            "browse_user_discovery",
            2,
            Endpoint::Users,
            transaction!(browse_user_discovery_transaction),
        ))
        .task(Task::new(
            "check_own_posts",
            1,
            Endpoint::Posts,
            transaction!(check_own_posts_transaction),
        ))
}

/// A following feed page of a typical size.
pub fn browse_following_feed<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::ContentsFollowing)
        .param(REQUESTER, ctx.requester)
        .param("limit", *FEED_PAGE_SIZES.choose(rng).unwrap_or(&20))
}

/// Mentions of the requester.
pub fn check_mentions<R: Rng + ?Sized>(_rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Mentions)
        .param("user", ctx.requester)
        .param(REQUESTER, ctx.requester)
        .param("limit", OWN_PAGE_SIZE)
}

/// Opens a post discovered earlier in the session, or the fallback post.
pub fn view_post_details<R: Rng + ?Sized>(
    rng: &mut R,
    ctx: &Context<'_>,
    session: &UserSession,
) -> FeedRequest {
    FeedRequest::new(Endpoint::PostDetails)
        .param("id", session.pick_post(rng, &ctx.samples.fallback_post_id))
        .param(REQUESTER, ctx.requester)
}

/// User introductions.
pub fn browse_user_discovery<R: Rng + ?Sized>(rng: &mut R, _ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Users)
        .param("limit", *DISCOVERY_PAGE_SIZES.choose(rng).unwrap_or(&20))
}

/// Posts of the requester.
pub fn check_own_posts<R: Rng + ?Sized>(_rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Posts)
        .param("user", ctx.requester)
        .param(REQUESTER, ctx.requester)
        .param("limit", OWN_PAGE_SIZE)
}

async fn browse_following_feed_transaction(user: &mut GooseUser) -> TransactionResult {
    let requester = session::requester(user);
    let request = browse_following_feed(
        &mut rand::rng(),
        &Context::new(session::samples(), &requester),
    );

    if let Some(body) = send(user, &request).await? {
        let remembered = session::session(user).remember_posts(&body);
        tracing::trace!(remembered, "remembered posts from following feed");
    }

    Ok(())
}

async fn view_post_details_transaction(user: &mut GooseUser) -> TransactionResult {
    let request = {
        let state = &*session::session(user);
        view_post_details(
            &mut rand::rng(),
            &Context::new(session::samples(), &state.requester),
            state,
        )
    };
    send(user, &request).await?;

    Ok(())
}

recipe_transaction!(check_mentions_transaction, check_mentions);
recipe_transaction!(browse_user_discovery_transaction, browse_user_discovery);
recipe_transaction!(check_own_posts_transaction, check_own_posts);
