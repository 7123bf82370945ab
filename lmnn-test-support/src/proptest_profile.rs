//! Property-test run profile parsing for CI and local overrides.
//!
//! Centralises environment-driven proptest tuning so the suites in every
//! crate interpret the same overrides the same way.

use std::env;

/// Environment variable controlling proptest case counts.
pub const LMNN_PBT_CASES_ENV_KEY: &str = "LMNN_PBT_CASES";
/// Environment variable controlling proptest process forking.
pub const LMNN_PBT_FORK_ENV_KEY: &str = "LMNN_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile from environment variables with the provided defaults.
    ///
    /// Invalid overrides are logged and ignored rather than aborting the
    /// suite.
    ///
    /// # Examples
    ///
    /// ```
    /// use lmnn_test_support::proptest_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: env_override(LMNN_PBT_CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: env_override(LMNN_PBT_FORK_ENV_KEY, parse_bool).unwrap_or(default_fork),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

/// Reads one override variable, treating unparsable values as absent.
fn env_override<T>(key: &'static str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let raw = env::var(key).ok()?;
    let value = parse(&raw);
    if value.is_none() {
        tracing::warn!(
            env = key,
            raw = %raw,
            "unusable property-test override; keeping the default",
        );
    }
    value
}

fn parse_cases(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|&cases| cases > 0)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
