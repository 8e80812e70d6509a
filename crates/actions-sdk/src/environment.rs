// Environment key registry and the environment read abstraction.
// The registry is the closed vocabulary of variable names the runner uses
// to hand file paths and inputs to a job step.

use std::collections::HashMap;

/// Well-known environment variable keys consumed by the protocol.
pub mod keys {
    /// Path to the file that sets variables from workflow commands.
    pub const GITHUB_ENV: &str = "GITHUB_ENV";
    /// Path to the file that sets the current step's outputs.
    pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
    /// Path to the file that saves state for the post step.
    pub const GITHUB_STATE: &str = "GITHUB_STATE";
    /// Path to the file that prepends entries to the system `PATH`.
    pub const GITHUB_PATH: &str = "GITHUB_PATH";
    /// Path to the file that collects the job summary.
    pub const GITHUB_STEP_SUMMARY: &str = "GITHUB_STEP_SUMMARY";
    /// Set to `true` when running under GitHub Actions.
    pub const GITHUB_ACTIONS: &str = "GITHUB_ACTIONS";
    /// Set to `1` when runner diagnostic logging is enabled.
    pub const RUNNER_DEBUG: &str = "RUNNER_DEBUG";
    /// The process `PATH` variable itself.
    pub const PATH: &str = "PATH";
}

/// Environment variable key prefixes, combined with [`suffixes`] or with
/// normalized input/state names.
pub mod prefixes {
    pub const GITHUB_: &str = "GITHUB_";
    pub const INPUT_: &str = "INPUT_";
    pub const STATE_: &str = "STATE_";
}

/// File command suffixes; `GITHUB_<suffix>` resolves the target file path.
pub mod suffixes {
    pub const ENV: &str = "ENV";
    pub const OUTPUT: &str = "OUTPUT";
    pub const STATE: &str = "STATE";
    pub const PATH: &str = "PATH";
    pub const STEP_SUMMARY: &str = "STEP_SUMMARY";
}

/// The environment variable name holding the input with the given name:
/// spaces become underscores, uppercased, prefixed with `INPUT_`.
pub fn input_variable_name(name: &str) -> String {
    format!(
        "{}{}",
        prefixes::INPUT_,
        name.replace(' ', "_").to_uppercase()
    )
}

/// The environment variable name holding saved state for the given name.
/// State names are not normalized; the runner exports them verbatim.
pub fn state_variable_name(name: &str) -> String {
    format!("{}{}", prefixes::STATE_, name)
}

/// Read access to the process environment.
///
/// The protocol reads, but never writes, the host-owned environment; tests
/// substitute [`MapEnvironment`] so no process-wide state is mutated.
pub trait Environment {
    /// Returns the value of `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}
