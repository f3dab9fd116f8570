//! Per-user state carried across the transactions of a virtual user.

use std::sync::OnceLock;

use goose::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;

use crate::samples::SampleData;

/// Number of post IDs remembered from a single feed page.
const POSTS_PER_PAGE: usize = 3;

/// Upper bound of remembered post IDs per session. Older posts are forgotten first.
const MAX_SESSION_POSTS: usize = 50;

static SAMPLES: OnceLock<SampleData> = OnceLock::new();

/// Installs the sample data used by all virtual users of this process.
///
/// Only the first call takes effect. Returns `false` if different samples were installed before.
pub fn install_samples(samples: SampleData) -> bool {
    let installed = SAMPLES.get_or_init(|| samples.clone());
    *installed == samples
}

/// The sample data shared by all virtual users.
pub fn samples() -> &'static SampleData {
    SAMPLES.get_or_init(SampleData::default)
}

/// State of a single virtual user.
#[derive(Clone, Debug, Default)]
pub struct UserSession {
    /// The pubkey sent as `requesterPubkey` for the lifetime of the session.
    pub requester: String,
    /// Post IDs discovered while browsing feeds.
    pub session_posts: Vec<String>,
}

#[derive(Deserialize)]
struct FeedPage {
    #[serde(default)]
    posts: Vec<FeedPost>,
}

#[derive(Deserialize)]
struct FeedPost {
    id: Option<String>,
}

impl UserSession {
    /// Starts a session acting as a random sample pubkey.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, samples: &SampleData) -> Self {
        Self {
            requester: samples.random_pubkey(rng).to_owned(),
            session_posts: Vec::new(),
        }
    }

    /// Remembers the first few post IDs of a feed response.
    ///
    /// Returns the number of newly remembered posts. Bodies that are not a feed page are ignored.
    /// At most `MAX_SESSION_POSTS` are kept, dropping the oldest.
    pub fn remember_posts(&mut self, body: &str) -> usize {
        let Ok(page) = serde_json::from_str::<FeedPage>(body) else {
            return 0;
        };

        let before = self.session_posts.len();
        self.session_posts.extend(
            page.posts
                .into_iter()
                .take(POSTS_PER_PAGE)
                .filter_map(|post| post.id),
        );
        let added = self.session_posts.len() - before;

        let excess = self.session_posts.len().saturating_sub(MAX_SESSION_POSTS);
        self.session_posts.drain(..excess);
        added
    }

    /// Picks a previously discovered post, or `fallback` if there is none.
    pub fn pick_post<'a, R: Rng + ?Sized>(&'a self, rng: &mut R, fallback: &'a str) -> &'a str {
        self.session_posts
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(fallback)
    }
}

/// Returns the session of a virtual user, creating it if the user has none yet.
pub fn session(user: &mut GooseUser) -> &mut UserSession {
    if user.get_session_data::<UserSession>().is_none() {
        let session = UserSession::new(&mut rand::rng(), samples());
        user.set_session_data(session);
    }
    user.get_session_data_unchecked_mut::<UserSession>()
}

/// Returns the requester pubkey of a virtual user.
pub fn requester(user: &mut GooseUser) -> String {
    session(user).requester.clone()
}

/// On-start transaction shared by all profiles: picks the requester of this user.
pub async fn start(user: &mut GooseUser) -> TransactionResult {
    let session = UserSession::new(&mut rand::rng(), samples());
    tracing::debug!(requester = %session.requester, "session started");
    user.set_session_data(session);

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn requester_is_a_sample_pubkey() {
        let samples = SampleData::default();
        let mut rng = SmallRng::seed_from_u64(3);

        let session = UserSession::new(&mut rng, &samples);
        assert!(samples.pubkeys.contains(&session.requester));
        assert!(session.session_posts.is_empty());
    }

    #[test]
    fn remembers_first_three_posts() {
        let mut session = UserSession::default();
        let body = r#"{"posts":[{"id":"a1"},{"id":"b2"},{"nope":1},{"id":"d4"}],"pagination":{}}"#;

        assert_eq!(session.remember_posts(body), 2);
        assert_eq!(session.session_posts, ["a1", "b2"]);
    }

    #[test]
    fn keeps_only_newest_posts() {
        let mut session = UserSession::default();
        for n in 0..MAX_SESSION_POSTS {
            let body = format!(r#"{{"posts":[{{"id":"p{n}"}}]}}"#);
            assert_eq!(session.remember_posts(&body), 1);
        }
        assert_eq!(session.session_posts.len(), MAX_SESSION_POSTS);

        let body = r#"{"posts":[{"id":"new1"},{"id":"new2"}]}"#;
        assert_eq!(session.remember_posts(body), 2);
        assert_eq!(session.session_posts.len(), MAX_SESSION_POSTS);
        assert_eq!(session.session_posts[0], "p2");
        assert_eq!(session.session_posts[MAX_SESSION_POSTS - 1], "new2");
    }

    #[test]
    fn ignores_unparseable_bodies() {
        let mut session = UserSession::default();
        assert_eq!(session.remember_posts("<html>"), 0);
        assert_eq!(session.remember_posts(r#"{"users":[]}"#), 0);
        assert!(session.session_posts.is_empty());
    }

    #[test]
    fn picks_fallback_without_posts() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut session = UserSession::default();
        assert_eq!(session.pick_post(&mut rng, "fallback"), "fallback");

        session.session_posts.push("cafe".into());
        assert_eq!(session.pick_post(&mut rng, "fallback"), "cafe");
    }
}
