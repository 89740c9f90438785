//! Subscriber setup for the `sigbench` binary.
//!
//! Library code only emits `tracing` events. The binary installs one
//! subscriber here, writing to stderr so stdout carries nothing but reports.
//! `RUST_LOG` takes precedence over `LOG_LEVEL` when both are set.

use std::env;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Line layout for stderr output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Level, target and fields on one spaced-out line
    #[default]
    Pretty,
    /// Shorter lines with span context folded in
    Compact,
}

impl LogFormat {
    /// `"compact"` in any case selects `Compact`; anything else is `Pretty`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// How the binary's subscriber is built.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Level filter used when `RUST_LOG` is unset.
    pub default_level: String,
    /// Print the emitting module path with each event.
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_level: "info".to_string(),
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Settings from `LOG_FORMAT` (`pretty` | `compact`), `LOG_LEVEL`
    /// (used only when `RUST_LOG` is unset) and `LOG_TARGET` (`true`/`1`
    /// to show module paths, the default).
    pub fn from_env() -> Self {
        Self {
            format: env::var("LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or_default(),
            default_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            include_target: env::var("LOG_TARGET")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(true),
        }
    }

    /// Replace the fallback level used when `RUST_LOG` is unset.
    pub fn with_default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }
}

/// Install the process-wide stderr subscriber.
///
/// The filter comes from `RUST_LOG` when it parses, otherwise from
/// `config.default_level`. Fails if a global subscriber already exists.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.include_target);
            registry.with(layer).try_init()?;
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(config.include_target);
            registry.with(layer).try_init()?;
        }
    }
    Ok(())
}
