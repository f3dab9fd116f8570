use std::env;
use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

use crate::config::{Config, LogFormat};

/// Installs the global tracing subscriber.
///
/// Goose reports through the `log` crate, which is bridged into the same subscriber.
pub fn init_tracing(config: &Config) {
    let (level, env_filter) = parse_rust_log(config.logging.level);

    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let format: Box<dyn Layer<Registry> + Send + Sync> = match resolve_format(config.logging.format)
    {
        LogFormat::Json => format.json().with_filter(level).boxed(),
        LogFormat::Simplified => format.with_ansi(false).with_filter(level).boxed(),
        LogFormat::Pretty | LogFormat::Auto => format.pretty().with_filter(level).boxed(),
    };

    tracing_subscriber::registry()
        .with(format)
        .with(env_filter)
        .try_init()
        .ok();
}

fn resolve_format(format: LogFormat) -> LogFormat {
    match format {
        LogFormat::Auto if std::io::stderr().is_terminal() => LogFormat::Pretty,
        LogFormat::Auto => LogFormat::Simplified,
        format => format,
    }
}

/// Returns the effective level and the per-crate filter.
///
/// `RUST_LOG` may be a plain level, which then overrides the configured level. Anything else is
/// used literally as filter directives.
pub fn parse_rust_log(configured: LevelFilter) -> (LevelFilter, EnvFilter) {
    let level = match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) => match value.parse::<LevelFilter>() {
            Ok(level) => level,
            Err(_) => return (LevelFilter::TRACE, EnvFilter::new(value)),
        },
        Err(_) => configured,
    };

    // This is the maximum verbosity that will be logged, we filter this down to `level`.
    let env_filter = EnvFilter::new(
        "INFO,\
        goose=INFO,\
        feedload=TRACE,\
        ",
    );

    (level, env_filter)
}
