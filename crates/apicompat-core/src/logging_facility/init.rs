//! Logging initialization

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output on stderr, debug level
    Development,
    /// JSON lines on stderr, info level
    Production,
    /// Registry only; tests attach a capture layer instead
    Test,
}

impl Profile {
    /// Profile for the CLI's `--verbose` / `--log-json` flags. `None` keeps
    /// logging off.
    pub fn from_flags(verbose: bool, json: bool) -> Option<Profile> {
        match (verbose, json) {
            (_, true) => Some(Profile::Production),
            (true, false) => Some(Profile::Development),
            (false, false) => None,
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the global subscriber. Later calls are no-ops.
///
/// `RUST_LOG` overrides the profile's default filter.
///
/// # Example
///
/// ```
/// use apicompat_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("apicompat=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("apicompat=info")),
                )
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
