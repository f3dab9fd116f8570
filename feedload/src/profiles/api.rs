//! Broad exerciser of the read API, including intentionally malformed requests.

use goose::prelude::*;
use rand::Rng;

use super::{Profile, ProfileOptions, Task};
use crate::config::WaitTime;
use crate::endpoint::Endpoint;
use crate::request::{Context, FeedRequest, REQUESTER};

/// Number of distinct malformed requests issued by [`error_condition`].
pub const ERROR_CONDITIONS: usize = 5;

/// The API user: hits every read endpoint with randomized limits and cursors.
pub fn api_user(options: ProfileOptions) -> Profile {
    api_tasks(Profile::new("ApiUser", 1, WaitTime::from_millis(1000, 3000)), options)
}

/// The default website user: the same task mix as [`api_user`] with a higher share of users.
pub fn website_user(options: ProfileOptions) -> Profile {
    api_tasks(
        Profile::new("WebsiteUser", 2, WaitTime::from_millis(1000, 3000)),
        options,
    )
}

fn api_tasks(profile: Profile, options: ProfileOptions) -> Profile {
    profile
        .task_if(options.following_feed, || {
            Task::new(
                "contents_following",
                3,
                Endpoint::ContentsFollowing,
                transaction!(contents_following_transaction),
            )
        })
        .task(Task::new(
            "posts_watching",
            5,
            Endpoint::PostsWatching,
            transaction!(posts_watching_transaction),
        ))
        .task(Task::new(
            "mentions",
            1,
            Endpoint::Mentions,
            transaction!(mentions_transaction),
        ))
        .task(Task::new(
            "users",
            2,
            Endpoint::Users,
            transaction!(users_transaction),
        ))
        .task(Task::new(
            "posts",
            6,
            Endpoint::Posts,
            transaction!(posts_transaction),
        ))
        .task(Task::new(
            "replies_by_post",
            4,
            Endpoint::Replies,
            transaction!(replies_by_post_transaction),
        ))
        .task(Task::new(
            "replies_by_user",
            4,
            Endpoint::Replies,
            transaction!(replies_by_user_transaction),
        ))
        .task(Task::new(
            "post_details",
            3,
            Endpoint::PostDetails,
            transaction!(post_details_transaction),
        ))
        .task(Task::new(
            "error_conditions",
            1,
            Endpoint::Posts,
            transaction!(error_conditions_transaction),
        ))
}

/// Content of followed users, with cursors.
pub fn contents_following<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::ContentsFollowing)
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(5..=50))
        .paginate(rng, ctx.now)
}

/// The watching feed, with cursors.
pub fn posts_watching<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::PostsWatching)
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(5..=50))
        .paginate(rng, ctx.now)
}

/// Mentions of a random user.
pub fn mentions<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Mentions)
        .param("user", ctx.samples.random_pubkey(rng))
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(5..=30))
        .paginate_before(rng, ctx.now, 0.2)
}

/// A page of user introductions.
pub fn users<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Users)
        .param("limit", rng.random_range(10..=100))
        .paginate_before(rng, ctx.now, 0.2)
}

/// Posts of a random user, with cursors.
pub fn posts<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Posts)
        .param("user", ctx.samples.random_pubkey(rng))
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(5..=50))
        .paginate(rng, ctx.now)
}

/// Replies to a random post.
pub fn replies_by_post<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Replies)
        .param("post", ctx.samples.random_post_id(rng))
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(5..=30))
        .paginate_before(rng, ctx.now, 0.2)
}

/// Replies authored by a random user.
pub fn replies_by_user<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Replies)
        .param("user", ctx.samples.random_pubkey(rng))
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(5..=30))
        .paginate_before(rng, ctx.now, 0.2)
}

/// Details of a random post.
pub fn post_details<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::PostDetails)
        .param("id", ctx.samples.random_post_id(rng))
        .param(REQUESTER, ctx.requester)
}

/// The `index`-th malformed request, see [`ERROR_CONDITIONS`].
pub fn error_condition(index: usize, ctx: &Context<'_>) -> FeedRequest {
    let user = ctx.samples.first_pubkey();
    let request = match index % ERROR_CONDITIONS {
        // missing requesterPubkey
        0 => FeedRequest::new(Endpoint::Posts).param("user", user),
        1 => FeedRequest::new(Endpoint::Mentions).param("user", user),
        // limit out of range
        2 => FeedRequest::new(Endpoint::Posts)
            .param("user", user)
            .param(REQUESTER, ctx.requester)
            .param("limit", 0),
        3 => FeedRequest::new(Endpoint::Posts)
            .param("user", user)
            .param(REQUESTER, ctx.requester)
            .param("limit", 150),
        // malformed post ID
        _ => FeedRequest::new(Endpoint::PostDetails)
            .param("id", "invalid_post_id")
            .param(REQUESTER, ctx.requester),
    };
    request.expect_client_error()
}

/// Picks one of the malformed requests uniformly.
pub fn error_conditions<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    error_condition(rng.random_range(0..ERROR_CONDITIONS), ctx)
}

/// Defines a transaction that runs `recipe` for the virtual user and sends the resulting request.
macro_rules! recipe_transaction {
    ($name:ident, $recipe:path) => {
        async fn $name(user: &mut ::goose::goose::GooseUser) -> ::goose::goose::TransactionResult {
            let requester = $crate::session::requester(user);
            let request = $recipe(
                &mut ::rand::rng(),
                &$crate::request::Context::new($crate::session::samples(), &requester),
            );
            $crate::transport::send(user, &request).await?;
            Ok(())
        }
    };
}

pub(crate) use recipe_transaction;

recipe_transaction!(contents_following_transaction, contents_following);
recipe_transaction!(posts_watching_transaction, posts_watching);
recipe_transaction!(mentions_transaction, mentions);
recipe_transaction!(users_transaction, users);
recipe_transaction!(posts_transaction, posts);
recipe_transaction!(replies_by_post_transaction, replies_by_post);
recipe_transaction!(replies_by_user_transaction, replies_by_user);
recipe_transaction!(post_details_transaction, post_details);
recipe_transaction!(error_conditions_transaction, error_conditions);
