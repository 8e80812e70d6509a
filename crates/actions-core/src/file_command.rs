// The file command channel: delimiter-fenced blocks appended to files whose
// paths arrive via `GITHUB_<suffix>` environment variables. Append-only;
// the host runner owns the files and guarantees no concurrent writer.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use actions_sdk::environment::prefixes;
use actions_sdk::{CommandValue, Environment};
use uuid::Uuid;

use crate::errors::{CoreError, Result};

/// Appends file commands to runner-provided files.
#[derive(Debug, Clone)]
pub struct FileCommandWriter<E: Environment> {
    env: E,
}

impl<E: Environment> FileCommandWriter<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Append the coerced `message` (plus a trailing newline) to the file
    /// named by `GITHUB_<suffix>`.
    ///
    /// For key/value payloads the message is a heredoc block built by
    /// [`prepare_key_value_message`](Self::prepare_key_value_message); for
    /// single-line suffixes such as `PATH` it is the bare value.
    pub fn issue_file_command(&self, suffix: &str, message: &CommandValue) -> Result<()> {
        let variable = format!("{}{}", prefixes::GITHUB_, suffix);
        let file_path = self
            .env
            .get(&variable)
            .filter(|value| !value.trim().is_empty())
            .ok_or(CoreError::ConfigurationMissing { variable })?;

        let path = Path::new(&file_path);
        if !path.exists() {
            return Err(CoreError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut file = OpenOptions::new().append(true).open(path)?;
        writeln!(file, "{}", message.coerce())?;

        tracing::debug!(suffix, path = %path.display(), "appended file command");
        Ok(())
    }

    /// Build a heredoc block for `key`/`value` with a fresh, unguessable
    /// delimiter:
    ///
    /// ```text
    /// <key><<ghadelimiter_<uuid>
    /// <value>
    /// ghadelimiter_<uuid>
    /// ```
    pub fn prepare_key_value_message(&self, key: &str, value: &CommandValue) -> Result<String> {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        build_key_value_message(key, value.coerce(), &delimiter)
    }
}

/// The delimiter must not appear in either the key or the value, or a
/// crafted value could terminate the heredoc early and smuggle extra
/// key/value pairs into the runner's parser. The delimiter is fresh
/// high-entropy per call, so this guard is expected never to fire.
fn build_key_value_message(key: &str, value: &str, delimiter: &str) -> Result<String> {
    // The runner matches the closing fence without regard to case, so the
    // containment check is case-insensitive too.
    if contains_ignore_case(key, delimiter) {
        return Err(CoreError::InvalidArgument(format!(
            "name should not contain the delimiter {delimiter}"
        )));
    }

    if contains_ignore_case(value, delimiter) {
        return Err(CoreError::InvalidArgument(format!(
            "value should not contain the delimiter {delimiter}"
        )));
    }

    Ok(format!("{key}<<{delimiter}\n{value}\n{delimiter}"))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
