//! Configuration for a load test run.
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//!
//! 1. Environment variables (prefixed with `FEEDLOAD__`)
//! 2. YAML configuration file (specified via `-c` or `--config` flag)
//! 3. Defaults
//!
//! Environment variables use double underscores (`__`) to denote nested configuration structures,
//! for example:
//!
//! - `FEEDLOAD__HOST=http://staging:8080` sets the target host
//! - `FEEDLOAD__PROFILES__SOCIAL__ENABLED=true` enables the social profile
//! - `FEEDLOAD__LOGGING__LEVEL=debug` raises the log level
//!
//! The same configuration in YAML:
//!
//! ```yaml
//! host: http://staging:8080
//! users: 50
//! run_time: 5m
//!
//! profiles:
//!   social:
//!     enabled: true
//!
//! logging:
//!   level: debug
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::samples::SampleData;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "FEEDLOAD__";

/// Main configuration of a load test.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the feed API under test.
    ///
    /// # Default
    ///
    /// `http://127.0.0.1:8080`
    pub host: String,

    /// Number of concurrent virtual users.
    ///
    /// # Default
    ///
    /// `10`
    pub users: usize,

    /// Virtual users started per second while ramping up.
    ///
    /// # Default
    ///
    /// `1.0`
    pub hatch_rate: f64,

    /// Duration of the attack after all users have been started.
    ///
    /// # Default
    ///
    /// `60s`
    #[serde(with = "humantime_serde")]
    pub run_time: Duration,

    /// Keeps statistics collected during ramp-up instead of resetting them.
    ///
    /// # Default
    ///
    /// `true`
    pub keep_ramp_up_metrics: bool,

    /// Path of an HTML report written when the attack finishes.
    pub report_file: Option<String>,

    /// Upper bound of requests per second across all users.
    pub throttle_requests: Option<usize>,

    /// Checks `/health` on the host before starting the attack.
    ///
    /// # Default
    ///
    /// `true`
    pub preflight: bool,

    /// Adds tasks that browse `/get-contents-following`.
    ///
    /// # Default
    ///
    /// `false`
    pub following_feed: bool,

    /// Identifiers used in request parameters.
    pub samples: SampleData,

    /// Enabled profiles and their weights.
    pub profiles: Profiles,

    /// Logging configuration.
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1:8080".to_owned(),
            users: 10,
            hatch_rate: 1.0,
            run_time: Duration::from_secs(60),
            keep_ramp_up_metrics: true,
            report_file: None,
            throttle_requests: None,
            preflight: true,
            following_feed: false,
            samples: SampleData::default(),
            profiles: Profiles::default(),
            logging: Logging::default(),
        }
    }
}

impl Config {
    /// Loads configuration from defaults, an optional YAML file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that cannot produce a meaningful attack.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            bail!("host must not be empty");
        }
        if self.users == 0 {
            bail!("users must be at least 1");
        }
        if self.hatch_rate.is_nan() || self.hatch_rate <= 0.0 {
            bail!("hatch_rate must be positive");
        }
        if self.run_time.as_secs() == 0 {
            bail!("run_time must be at least one second");
        }
        self.samples.validate()
    }
}

/// Settings of a single profile.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    /// Whether virtual users of this profile are spawned.
    pub enabled: bool,
    /// Relative share of virtual users. Uses the profile's built-in weight if unset.
    pub weight: Option<usize>,
    /// Pause between two tasks. Uses the profile's built-in range if unset.
    pub wait_time: Option<WaitTime>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: None,
            wait_time: None,
        }
    }
}

impl ProfileConfig {
    fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Inclusive range of pauses between two tasks of a virtual user.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct WaitTime {
    /// Shortest pause.
    #[serde(with = "humantime_serde")]
    pub min: Duration,
    /// Longest pause.
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl WaitTime {
    /// Creates a wait time range from milliseconds.
    pub const fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.min, self.max)
    }
}

/// Per-profile settings.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Profiles {
    /// Broad API exerciser, including intentionally invalid requests.
    pub api: ProfileConfig,
    /// Rapid pagination through the watching feed.
    pub heavy: ProfileConfig,
    /// Slow-paced browsing that reuses discovered posts.
    pub realistic: ProfileConfig,
    /// The default mix of behaviors, same tasks as `api`.
    pub website: ProfileConfig,
    /// Notifications and follower graph reads. Disabled by default.
    pub social: ProfileConfig,
}

impl Default for Profiles {
    fn default() -> Self {
        Self {
            api: ProfileConfig::default(),
            heavy: ProfileConfig::default(),
            realistic: ProfileConfig::default(),
            website: ProfileConfig::default(),
            social: ProfileConfig::disabled(),
        }
    }
}

/// The log output format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty for a TTY, simplified otherwise.
    Auto,
    /// Pretty printing with colors.
    Pretty,
    /// Simplified plain text output.
    Simplified,
    /// JSON lines.
    Json,
}

/// Logging configuration. Logs are always written to stderr.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Minimum log level to output.
    ///
    /// `RUST_LOG` takes precedence if set.
    ///
    /// # Default
    ///
    /// `INFO`
    #[serde(with = "display_fromstr")]
    pub level: LevelFilter,

    /// Log output format.
    ///
    /// # Default
    ///
    /// `auto`
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Auto,
        }
    }
}

mod display_fromstr {
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: std::fmt::Display,
    {
        serializer.collect_str(&value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: std::str::FromStr,
        <T as std::str::FromStr>::Err: std::fmt::Display,
    {
        use serde::Deserialize;
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load(None).unwrap();

            assert_eq!(config.host, "http://127.0.0.1:8080");
            assert_eq!(config.users, 10);
            assert_eq!(config.run_time, Duration::from_secs(60));
            assert!(config.preflight);
            assert!(!config.following_feed);
            assert!(config.profiles.api.enabled);
            assert!(!config.profiles.social.enabled);
            assert_eq!(config.samples, SampleData::default());
            assert_eq!(config.logging.level, LevelFilter::INFO);

            Ok(())
        });
    }

    #[test]
    fn configurable_via_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FEEDLOAD__HOST", "http://staging:9000");
            jail.set_env("FEEDLOAD__USERS", "250");
            jail.set_env("FEEDLOAD__RUN_TIME", "5m");
            jail.set_env("FEEDLOAD__PROFILES__SOCIAL__ENABLED", "true");
            jail.set_env("FEEDLOAD__PROFILES__HEAVY__WEIGHT", "4");
            jail.set_env("FEEDLOAD__LOGGING__LEVEL", "debug");

            let config = Config::load(None).unwrap();

            assert_eq!(config.host, "http://staging:9000");
            assert_eq!(config.users, 250);
            assert_eq!(config.run_time, Duration::from_secs(300));
            assert!(config.profiles.social.enabled);
            assert_eq!(config.profiles.heavy.weight, Some(4));
            assert_eq!(config.logging.level, LevelFilter::DEBUG);

            Ok(())
        });
    }

    #[test]
    fn configurable_via_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            host: http://localhost:3000
            hatch_rate: 2.5
            following_feed: true
            report_file: report.html
            profiles:
                realistic:
                    wait_time:
                        min: 500ms
                        max: 2s
                website:
                    enabled: false
            samples:
                pubkeys: ["02aa", "03bb"]
                post_ids: ["ff00"]
                fallback_post_id: ff00
            logging:
                format: json
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|_jail| {
            let config = Config::load(Some(tempfile.path())).unwrap();

            assert_eq!(config.host, "http://localhost:3000");
            assert_eq!(config.hatch_rate, 2.5);
            assert!(config.following_feed);
            assert_eq!(config.report_file.as_deref(), Some("report.html"));
            assert_eq!(
                config.profiles.realistic.wait_time,
                Some(WaitTime::from_millis(500, 2000))
            );
            assert!(!config.profiles.website.enabled);
            assert!(config.profiles.api.enabled);
            assert_eq!(config.samples.pubkeys, ["02aa", "03bb"]);
            assert_eq!(config.logging.format, LogFormat::Json);

            Ok(())
        });
    }

    #[test]
    fn env_overrides_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile.write_all(b"users: 5\n").unwrap();

        figment::Jail::expect_with(|jail| {
            jail.set_env("FEEDLOAD__USERS", "7");

            let config = Config::load(Some(tempfile.path())).unwrap();
            assert_eq!(config.users, 7);

            Ok(())
        });
    }

    #[test]
    fn rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FEEDLOAD__USERS", "0");
            assert!(Config::load(None).is_err());
            Ok(())
        });

        let config = Config {
            hatch_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            run_time: Duration::from_millis(200),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.samples.post_ids.clear();
        assert!(config.validate().is_err());
    }
}
