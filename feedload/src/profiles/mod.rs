//! Behavior profiles of simulated users.
//!
//! Each [`Profile`] becomes one goose scenario. Goose distributes virtual users across scenarios
//! by profile weight and picks tasks within a scenario by task weight; every task is a single
//! transaction that issues one or more GET requests.
//!
//! Each profile module contains two layers: pure *recipes* which turn a [`Context`] and an RNG
//! into [`FeedRequest`]s, and thin goose transactions that run these recipes for a virtual user.
//!
//! [`Context`]: crate::request::Context
//! [`FeedRequest`]: crate::request::FeedRequest

use std::fmt;

use anyhow::{Result, bail};
use goose::prelude::*;

use crate::config::{Config, ProfileConfig, WaitTime};
use crate::endpoint::Endpoint;
use crate::session::start;

pub mod api;
pub mod heavy;
pub mod realistic;
pub mod social;

/// Switches that change the task mix of several profiles at once.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileOptions {
    /// Adds tasks that browse `/get-contents-following`.
    pub following_feed: bool,
}

/// A weighted task of a profile.
pub struct Task {
    /// Name of the task, used in transaction statistics.
    pub name: &'static str,
    /// Relative frequency within the profile.
    pub weight: usize,
    /// The endpoint this task hits.
    pub endpoint: Endpoint,
    transaction: Transaction,
}

impl Task {
    /// Creates a task running the given transaction.
    pub fn new(
        name: &'static str,
        weight: usize,
        endpoint: Endpoint,
        transaction: Transaction,
    ) -> Self {
        Self {
            name,
            weight,
            endpoint,
            transaction,
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// A simulated-user behavior profile.
#[derive(Debug)]
pub struct Profile {
    /// Name of the profile, shown in reports.
    pub name: &'static str,
    /// Relative share of virtual users running this profile.
    pub weight: usize,
    /// Pause between two tasks.
    pub wait_time: WaitTime,
    /// Weighted tasks.
    pub tasks: Vec<Task>,
}

impl Profile {
    /// Creates an empty profile.
    pub fn new(name: &'static str, weight: usize, wait_time: WaitTime) -> Self {
        Self {
            name,
            weight,
            wait_time,
            tasks: Vec::new(),
        }
    }

    /// Adds a task.
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds a task only if `condition` holds.
    pub fn task_if(self, condition: bool, task: impl FnOnce() -> Task) -> Self {
        if condition { self.task(task()) } else { self }
    }

    /// Applies user overrides of weight and wait time.
    pub fn configure(mut self, config: &ProfileConfig) -> Self {
        if let Some(weight) = config.weight {
            self.weight = weight;
        }
        if let Some(wait_time) = config.wait_time {
            self.wait_time = wait_time;
        }
        self
    }

    /// Sum of all task weights.
    pub fn total_task_weight(&self) -> usize {
        self.tasks.iter().map(|t| t.weight).sum()
    }

    /// Converts the profile into a goose scenario.
    ///
    /// Every scenario starts with a transaction that picks the requester of the virtual user.
    pub fn into_scenario(self) -> Result<Scenario, GooseError> {
        let mut scenario = Scenario::new(self.name)
            .set_weight(self.weight)?
            .set_wait_time(self.wait_time.min, self.wait_time.max)?
            .register_transaction(
                transaction!(start)
                    .set_name("start_session")
                    .set_on_start(),
            );

        for task in self.tasks {
            let transaction = task.transaction.set_name(task.name).set_weight(task.weight)?;
            scenario = scenario.register_transaction(transaction);
        }

        Ok(scenario)
    }
}

/// Builds all profiles enabled in the configuration.
pub fn enabled(config: &Config) -> Result<Vec<Profile>> {
    let options = ProfileOptions {
        following_feed: config.following_feed,
    };
    let profiles = &config.profiles;

    let candidates = [
        (&profiles.api, api::api_user as fn(ProfileOptions) -> Profile),
        (&profiles.heavy, heavy::heavy_load_user),
        (&profiles.realistic, realistic::realistic_user),
        (&profiles.website, api::website_user),
        (&profiles.social, social::social_user),
    ];

    let enabled: Vec<_> = candidates
        .into_iter()
        .filter(|(profile_config, _)| profile_config.enabled)
        .map(|(profile_config, build)| build(options).configure(profile_config))
        .filter(|profile| profile.weight > 0 && !profile.tasks.is_empty())
        .collect();

    if enabled.is_empty() {
        bail!("no profiles are enabled");
    }
    Ok(enabled)
}
