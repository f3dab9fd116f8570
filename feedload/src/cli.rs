use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;
use yansi::Paint;

use crate::attack::{self, RequestSummary};
use crate::config::Config;
use crate::{healthcheck, observability, profiles};

/// Load generator for the social feed API.
#[derive(Debug, FromArgs)]
struct Args {
    /// path to the YAML configuration file
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,

    #[argh(subcommand)]
    pub command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Run(RunCommand),
    Healthcheck(HealthcheckCommand),
    Profiles(ProfilesCommand),
    Version(VersionCommand),
}

/// run a load test against the configured host
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "run")]
struct RunCommand {}

/// check that the configured host answers its health endpoint
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "healthcheck")]
struct HealthcheckCommand {}

/// print the enabled profiles and their task mix
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "profiles")]
struct ProfilesCommand {}

/// print the feedload version
#[derive(Default, Debug, FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCommand {}

/// Bootstrap the runtime and execute the CLI command.
pub fn execute() -> Result<()> {
    let args: Args = argh::from_env();

    // Special switch to just print the version and exit.
    if let Command::Version(_) = args.command {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;

    if let Command::Profiles(_) = args.command {
        return print_profiles(&config);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("main-rt")
        .enable_all()
        .build()?;
    let _runtime_guard = runtime.enter();

    observability::init_tracing(&config);
    tracing::debug!(?config);

    runtime.block_on(async move {
        match args.command {
            Command::Run(RunCommand {}) => {
                if config.preflight {
                    healthcheck::healthcheck(&config.host).await?;
                }
                let metrics = attack::run(&config).await?;
                print_totals(&attack::summarize(&metrics));
                Ok(())
            }
            Command::Healthcheck(HealthcheckCommand {}) => {
                healthcheck::healthcheck(&config.host).await
            }
            Command::Profiles(_) | Command::Version(_) => unreachable!(),
        }
    })
}

fn print_profiles(config: &Config) -> Result<()> {
    let profiles = profiles::enabled(config)?;
    let total_weight: usize = profiles.iter().map(|p| p.weight).sum();

    for profile in profiles {
        let task_weight = profile.total_task_weight();

        println!();
        println!(
            "{} {} (weight {} of {}, waits {})",
            "## Profile".bold(),
            profile.name.bold().blue(),
            profile.weight.bold(),
            total_weight,
            profile.wait_time,
        );
        for task in &profile.tasks {
            let share = task.weight as f64 * 100.0 / task_weight as f64;
            println!(
                "  {:<24} {:>3}  {:>5.1}%  {}",
                task.name,
                task.weight,
                share,
                task.endpoint.dim()
            );
        }
    }

    Ok(())
}

fn print_totals(summaries: &[RequestSummary]) {
    let successes: usize = summaries.iter().map(|s| s.successes).sum();
    let failures: usize = summaries.iter().map(|s| s.failures).sum();

    println!();
    println!("{}", "## TOTALS".bold());
    for summary in summaries {
        print!("{} ({} passed", summary.name.bold(), summary.successes);
        if summary.failures > 0 {
            print!(", {}", format!("{} FAILURES", summary.failures).bold().red());
        }
        println!(")");
    }
    println!();

    let overall = format!("{successes} passed, {failures} failed");
    if failures > 0 {
        println!("{}", overall.bold().red());
    } else {
        println!("{}", overall.bold().green());
    }
}
