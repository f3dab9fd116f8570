//! Users that mostly check notifications and browse the follower graph.

use goose::prelude::*;
use rand::Rng;

use super::api::recipe_transaction;
use super::{Profile, ProfileOptions, Task};
use crate::config::WaitTime;
use crate::endpoint::Endpoint;
use crate::request::{Context, FeedRequest, REQUESTER};

/// Notification and follower graph reads.
pub fn social_user(_options: ProfileOptions) -> Profile {
    Profile::new("SocialUser", 1, WaitTime::from_millis(1000, 4000))
        .task(Task::new(
            "notifications",
            3,
            Endpoint::Notifications,
            transaction!(notifications_transaction),
        ))
        .task(Task::new(
            "notifications_count",
            2,
            Endpoint::NotificationsCount,
            transaction!(notifications_count_transaction),
        ))
        .task(Task::new(
            "followed_users",
            2,
            Endpoint::FollowedUsers,
            transaction!(followed_users_transaction),
        ))
        .task(Task::new(
            "users_following",
            1,
            Endpoint::UsersFollowing,
            transaction!(users_following_transaction),
        ))
        .task(Task::new(
            "users_followers",
            1,
            Endpoint::UsersFollowers,
            transaction!(users_followers_transaction),
        ))
        .task(Task::new(
            "user_details",
            2,
            Endpoint::UserDetails,
            transaction!(user_details_transaction),
        ))
}

/// Notifications of the requester, with cursors.
pub fn notifications<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::Notifications)
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(5..=50))
        .paginate(rng, ctx.now)
}

/// Unseen notification counter of the requester.
pub fn notifications_count<R: Rng + ?Sized>(_rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::NotificationsCount).param(REQUESTER, ctx.requester)
}

/// Accounts the requester follows.
pub fn followed_users<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::FollowedUsers)
        .param(REQUESTER, ctx.requester)
        .param("limit", rng.random_range(10..=100))
        .paginate_before(rng, ctx.now, 0.2)
}

/// Accounts a random user follows.
pub fn users_following<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    follow_graph(Endpoint::UsersFollowing, rng, ctx)
}

/// Followers of a random user.
pub fn users_followers<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    follow_graph(Endpoint::UsersFollowers, rng, ctx)
}

fn follow_graph<R: Rng + ?Sized>(
    endpoint: Endpoint,
    rng: &mut R,
    ctx: &Context<'_>,
) -> FeedRequest {
    FeedRequest::new(endpoint)
        .param(REQUESTER, ctx.requester)
        .param("userPubkey", ctx.samples.random_pubkey(rng))
        .param("limit", rng.random_range(5..=50))
}

/// Profile of a random user.
pub fn user_details<R: Rng + ?Sized>(rng: &mut R, ctx: &Context<'_>) -> FeedRequest {
    FeedRequest::new(Endpoint::UserDetails)
        .param("user", ctx.samples.random_pubkey(rng))
        .param(REQUESTER, ctx.requester)
}

recipe_transaction!(notifications_transaction, notifications);
recipe_transaction!(notifications_count_transaction, notifications_count);
recipe_transaction!(followed_users_transaction, followed_users);
recipe_transaction!(users_following_transaction, users_following);
recipe_transaction!(users_followers_transaction, users_followers);
recipe_transaction!(user_details_transaction, user_details);

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::samples::SampleData;

    #[test]
    fn every_request_names_the_requester() {
        let samples = SampleData::default();
        let ctx = Context {
            samples: &samples,
            requester: "03me",
            now: 1_700_000_000,
        };
        let mut rng = SmallRng::seed_from_u64(12);

        let requests = [
            notifications(&mut rng, &ctx),
            notifications_count(&mut rng, &ctx),
            followed_users(&mut rng, &ctx),
            users_following(&mut rng, &ctx),
            users_followers(&mut rng, &ctx),
            user_details(&mut rng, &ctx),
        ];
        assert!(requests.iter().all(|r| r.get(REQUESTER) == Some("03me")));

        assert!(requests[1].get("limit").is_none());
        assert!(requests[3].get("userPubkey").is_some());
        assert_eq!(requests[4].endpoint, Endpoint::UsersFollowers);
        assert!(requests[5].get("user").is_some());
    }

    #[test]
    fn profile_covers_social_endpoints() {
        let profile = social_user(ProfileOptions::default());
        assert_eq!(profile.tasks.len(), 6);
        assert_eq!(profile.total_task_weight(), 11);
        assert!(
            profile
                .tasks
                .iter()
                .all(|t| t.endpoint != Endpoint::Posts && t.endpoint != Endpoint::Health)
        );
    }
}
