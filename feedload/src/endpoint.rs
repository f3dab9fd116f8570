//! Read endpoints of the feed API.

use std::fmt;

/// A read endpoint exposed by the feed API.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Endpoint {
    /// Posts authored by a user.
    Posts,
    /// Posts from users the requester is watching.
    PostsWatching,
    /// Content from users the requester follows.
    ContentsFollowing,
    /// Replies to a post, or replies authored by a user.
    Replies,
    /// Posts mentioning a user.
    Mentions,
    /// User introductions, used for discovery.
    Users,
    /// A single post with its counters.
    PostDetails,
    /// Profile of a single user.
    UserDetails,
    /// Notifications addressed to the requester.
    Notifications,
    /// Number of unseen notifications.
    NotificationsCount,
    /// Users followed by the requester.
    FollowedUsers,
    /// Users a given user follows.
    UsersFollowing,
    /// Users following a given user.
    UsersFollowers,
    /// Liveness probe.
    Health,
}

impl Endpoint {
    /// The request path relative to the target host.
    ///
    /// This doubles as the name under which request statistics are aggregated, so that randomized
    /// query strings collapse into a single row per endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Posts => "/get-posts",
            Endpoint::PostsWatching => "/get-posts-watching",
            Endpoint::ContentsFollowing => "/get-contents-following",
            Endpoint::Replies => "/get-replies",
            Endpoint::Mentions => "/get-mentions",
            Endpoint::Users => "/get-users",
            Endpoint::PostDetails => "/get-post-details",
            Endpoint::UserDetails => "/get-user-details",
            Endpoint::Notifications => "/get-notifications",
            Endpoint::NotificationsCount => "/get-notifications-count",
            Endpoint::FollowedUsers => "/get-followed-users",
            Endpoint::UsersFollowing => "/get-users-following",
            Endpoint::UsersFollowers => "/get-users-followers",
            Endpoint::Health => "/health",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
