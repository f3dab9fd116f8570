//! Runs the enabled profiles against the target host.

use anyhow::{Context, Result};
use goose::config::GooseConfiguration;
use goose::metrics::GooseMetrics;
use goose::prelude::*;

use crate::config::Config;
use crate::profiles;
use crate::session;

/// Request counters of a single request name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestSummary {
    /// Method and name of the request, e.g. `GET /get-posts`.
    pub name: String,
    /// Requests classified as passed.
    pub successes: usize,
    /// Requests classified as failed, including transport errors.
    pub failures: usize,
}

/// Runs a load test as described by `config` and returns the collected metrics.
///
/// Scheduling, ramp-up and reporting are performed by goose. Every enabled profile is registered
/// as one scenario.
pub async fn run(config: &Config) -> Result<GooseMetrics> {
    if !session::install_samples(config.samples.clone()) {
        tracing::warn!("sample data was installed before, keeping the previous set");
    }

    let mut attack = GooseAttack::initialize_with_config(GooseConfiguration::default())?;
    for profile in profiles::enabled(config)? {
        tracing::info!(
            profile = profile.name,
            weight = profile.weight,
            tasks = profile.tasks.len(),
            "registering profile"
        );
        attack = attack.register_scenario(profile.into_scenario()?);
    }

    let mut attack = attack
        .set_default(GooseDefault::Host, config.host.as_str())?
        .set_default(GooseDefault::Users, config.users)?
        .set_default(GooseDefault::HatchRate, config.hatch_rate.to_string().as_str())?
        .set_default(GooseDefault::RunTime, config.run_time.as_secs() as usize)?
        .set_default(GooseDefault::NoResetMetrics, config.keep_ramp_up_metrics)?;

    if let Some(report_file) = &config.report_file {
        attack = attack.set_default(GooseDefault::ReportFile, report_file.as_str())?;
    }
    if let Some(throttle) = config.throttle_requests {
        attack = attack.set_default(GooseDefault::ThrottleRequests, throttle)?;
    }

    tracing::info!(
        host = %config.host,
        users = config.users,
        run_time = ?config.run_time,
        "starting load test"
    );
    let metrics = attack.execute().await.context("load test failed")?;

    for summary in summarize(&metrics) {
        tracing::info!(
            request = %summary.name,
            successes = summary.successes,
            failures = summary.failures,
            "request totals"
        );
    }

    Ok(metrics)
}

/// Collects pass/fail counters per request name, sorted by name.
pub fn summarize(metrics: &GooseMetrics) -> Vec<RequestSummary> {
    let mut summaries: Vec<_> = metrics
        .requests
        .iter()
        .map(|(name, aggregate)| RequestSummary {
            name: name.clone(),
            successes: aggregate.success_count,
            failures: aggregate.fail_count,
        })
        .collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name));
    summaries
}
