//! Identifiers used to populate request parameters.
//!
//! The built-in set mirrors accounts and posts that exist on the shared staging dataset. Any of the
//! lists can be replaced through configuration to target a different dataset.

use anyhow::{Result, bail};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

const DEFAULT_PUBKEYS: &[&str] = &[
    "02218b3732df2353978154ec5323b745bce9520a5ed506a96de4f4e3dad20dc44f",
    "033d01709a02bf78f95e09cd00ba93ad8fb7c8ac11e6d3f871a11062eeb2aa8cd8",
    "03f56f6ad1c1166e330fb2897ae60afcb25afa10006212cfee24264c04d21bce60",
    "03feff5d6e0d399a189ade44901c5f9b5bd959e6e2b82020446b78eae06732f21a",
    "02d22b4947724fa545681aa8281db260c1fbb081a6a53d8b4233c1be9f0bae4506",
    "028e6cb879cadeea0acef3fa34cd456ac5b12d533b6e42e8965804bc5506f0863e",
    "03b1f9ed63976b28ad4e648b9da672679bd27895def79159f372eeea30df45abf7",
    // Listed twice on purpose: this account is picked twice as often.
    "028e6cb879cadeea0acef3fa34cd456ac5b12d533b6e42e8965804bc5506f0863e",
];

const DEFAULT_POST_IDS: &[&str] = &[
    "63e35ea479377d8cb36165f12dbaeb8b9c35a6b20e4c411254cfb910b570a48f",
    "ac0c73cf661259a3af663914e5d52f608a8430b47d9173164838d5198ae8d5d8",
    "baf60e2b8ef9027204ef8d1157b0908881a9deb5e8ad54d3de4ba9988f5f2fc3",
    "a44ca44bd09d54a6e6cc5919aca6e68cd7645498826e9c7bda92f824591d1495",
    "b3d26a66b57504ada5847bb635c639f3ecd734bc4deccaed0e64d75b8bae1c04",
    "794148d047ca5ef8729aea6aea0adda8d3eddbd593e01420d9930b4f9918d709",
    "f05e5f02ff1e27fd44a160801c5e4c81b8e198e8fcefaedac2e396451646e889",
    "9dc6942b6a3c880b49379b8bdbea1d8d68ec7bf8b6b3f941e9b86ffa2fd82d5e",
    "361013d8b5debb512b599615ad3739e8058d1b838ce71cec9bf1c0afadf32929",
    "fb44c8e5a5e14ee43c336e0d4ffe51bc64e883185fb83e5c1fe74dd305e6754a",
    "d79efc9b9aef2c93a030dbb53177fa5ab674cd29c1483335ff768524aad9e5cb",
    "78be2e16605ee6cd4f6903088d9e32936faa2655952a671475a940a2b7263fd3",
    "e710db11e2eff2a2ceeac00a085988278aaa646843c3582b6a73c18485477bb8",
    "602631308c97ba35f76d286ba69c34b580665cb83b5c5a35dc3f9f4c0a41b31c",
];

/// Public keys and content IDs that virtual users draw their request parameters from.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SampleData {
    /// Hex-encoded public keys, used both as requesters and as queried users.
    pub pubkeys: Vec<String>,
    /// Hex-encoded post IDs.
    pub post_ids: Vec<String>,
    /// Post ID to look up when a session has not discovered any posts yet.
    pub fallback_post_id: String,
}

impl Default for SampleData {
    fn default() -> Self {
        Self {
            pubkeys: DEFAULT_PUBKEYS.iter().map(|s| s.to_string()).collect(),
            post_ids: DEFAULT_POST_IDS.iter().map(|s| s.to_string()).collect(),
            fallback_post_id: DEFAULT_POST_IDS[0].to_owned(),
        }
    }
}

impl SampleData {
    /// Picks a pubkey uniformly at random. Duplicated entries weigh more.
    pub fn random_pubkey<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.pubkeys
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Picks a post ID uniformly at random.
    pub fn random_post_id<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.post_ids
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The first configured pubkey, used for deterministic negative requests.
    pub fn first_pubkey(&self) -> &str {
        self.pubkeys.first().map(String::as_str).unwrap_or_default()
    }

    /// Checks that all lists are populated with hex identifiers.
    pub fn validate(&self) -> Result<()> {
        if self.pubkeys.is_empty() {
            bail!("samples.pubkeys must not be empty");
        }
        if self.post_ids.is_empty() {
            bail!("samples.post_ids must not be empty");
        }

        let all = self
            .pubkeys
            .iter()
            .chain(&self.post_ids)
            .chain(std::iter::once(&self.fallback_post_id));
        for id in all {
            if !is_hex(id) {
                bail!("sample identifier `{id}` is not a hex string");
            }
        }

        Ok(())
    }
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let samples = SampleData::default();
        samples.validate().unwrap();

        assert_eq!(samples.pubkeys.len(), 8);
        assert_eq!(samples.post_ids.len(), 14);
        assert_eq!(samples.fallback_post_id, samples.post_ids[0]);
    }

    #[test]
    fn random_picks_come_from_the_lists() {
        let samples = SampleData::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..100 {
            let pubkey = samples.random_pubkey(&mut rng);
            assert!(samples.pubkeys.iter().any(|p| p == pubkey));

            let post = samples.random_post_id(&mut rng);
            assert!(samples.post_ids.iter().any(|p| p == post));
        }
    }

    #[test]
    fn rejects_empty_and_non_hex() {
        let mut samples = SampleData::default();
        samples.pubkeys.clear();
        assert!(samples.validate().is_err());

        let mut samples = SampleData::default();
        samples.post_ids.push("invalid_post_id".into());
        let err = samples.validate().unwrap_err();
        assert!(err.to_string().contains("invalid_post_id"));

        let mut samples = SampleData::default();
        samples.fallback_post_id = String::new();
        assert!(samples.validate().is_err());
    }
}
