// The step-facing service surface: outputs, exported variables, saved
// state, inputs, annotations, log grouping. An explicitly constructed
// object owning its sinks and environment; no process-wide singletons, so
// tests stay isolated from environment mutation.

use std::cell::Cell;

use actions_sdk::environment::{input_variable_name, keys, state_variable_name, suffixes};
use actions_sdk::{CommandValue, Environment, ProcessEnvironment};

use crate::annotations::AnnotationProperties;
use crate::command_issuer::{CommandIssuer, Console, StdoutConsole};
use crate::errors::{CoreError, Result};
use crate::file_command::FileCommandWriter;
use crate::workflow_command::command_names;

/// Options for reading a step input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOptions {
    /// Whether the input is required; a required, missing input is an error.
    pub required: bool,
    /// Whether leading/trailing whitespace is trimmed. Defaults to true.
    pub trim_whitespace: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            required: false,
            trim_whitespace: true,
        }
    }
}

/// The exit code the step should terminate with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitCode {
    #[default]
    Success = 0,
    Failure = 1,
}

/// High-level access to the workflow command and file command channels.
///
/// Prefers the file command channel whenever the corresponding `GITHUB_*`
/// variable is present, falling back to the deprecated stdout command
/// otherwise, matching the runner's own preference order.
pub struct CoreService<C: Console, E: Environment> {
    issuer: CommandIssuer<C>,
    file_commands: FileCommandWriter<E>,
    env: E,
    exit_code: Cell<ExitCode>,
}

impl Default for CoreService<StdoutConsole, ProcessEnvironment> {
    /// A service wired to process stdout and the process environment.
    fn default() -> Self {
        Self::new(StdoutConsole, ProcessEnvironment)
    }
}

impl<C: Console, E: Environment + Clone> CoreService<C, E> {
    pub fn new(console: C, env: E) -> Self {
        Self {
            issuer: CommandIssuer::new(console),
            file_commands: FileCommandWriter::new(env.clone()),
            env,
            exit_code: Cell::new(ExitCode::Success),
        }
    }
}

impl<C: Console, E: Environment> CoreService<C, E> {
    // -----------------------------------------------------------------------
    // Variables, outputs, state, path
    // -----------------------------------------------------------------------

    /// Set an environment variable for this and future steps in the job.
    pub fn export_variable(&self, name: &str, value: impl Into<CommandValue>) -> Result<()> {
        self.keyed_file_command_or(keys::GITHUB_ENV, suffixes::ENV, command_names::SET_ENV, name, value.into())
    }

    /// Set a step output, readable by downstream steps.
    pub fn set_output(&self, name: &str, value: impl Into<CommandValue>) -> Result<()> {
        let value = value.into();
        if self.env.get(keys::GITHUB_OUTPUT).is_some() {
            let message = self.file_commands.prepare_key_value_message(name, &value)?;
            return self
                .file_commands
                .issue_file_command(suffixes::OUTPUT, &CommandValue::from(message));
        }

        // The runner expects the legacy command on a fresh line.
        self.issuer.console().write_line("")?;
        self.issuer
            .issue_command(command_names::SET_OUTPUT, [("name", name)], value)
    }

    /// Save state for the post step of this action.
    pub fn save_state(&self, name: &str, value: impl Into<CommandValue>) -> Result<()> {
        self.keyed_file_command_or(
            keys::GITHUB_STATE,
            suffixes::STATE,
            command_names::SAVE_STATE,
            name,
            value.into(),
        )
    }

    /// Prepend a directory to the system `PATH` for future steps.
    pub fn add_path(&self, path: &str) -> Result<()> {
        if self.env.get(keys::GITHUB_PATH).is_some() {
            return self
                .file_commands
                .issue_file_command(suffixes::PATH, &CommandValue::from(path));
        }

        self.issuer.issue(command_names::ADD_PATH, path)
    }

    fn keyed_file_command_or(
        &self,
        variable: &str,
        suffix: &str,
        legacy_command: &str,
        name: &str,
        value: CommandValue,
    ) -> Result<()> {
        if self.env.get(variable).is_some() {
            let message = self.file_commands.prepare_key_value_message(name, &value)?;
            return self
                .file_commands
                .issue_file_command(suffix, &CommandValue::from(message));
        }

        self.issuer
            .issue_command(legacy_command, [("name", name)], value)
    }

    // -----------------------------------------------------------------------
    // Inputs and state
    // -----------------------------------------------------------------------

    /// Read a step input. The name is normalized (spaces to underscores,
    /// uppercased) and resolved from the `INPUT_` family.
    pub fn get_input(&self, name: &str, options: InputOptions) -> Result<String> {
        let value = self
            .env
            .get(&input_variable_name(name))
            .unwrap_or_default();

        if options.required && value.trim().is_empty() {
            return Err(CoreError::InvalidArgument(format!(
                "Input required and not supplied: {name}"
            )));
        }

        Ok(if options.trim_whitespace {
            value.trim().to_string()
        } else {
            value
        })
    }

    /// Read a multiline input, one entry per non-empty line.
    pub fn get_multiline_input(&self, name: &str, options: InputOptions) -> Result<Vec<String>> {
        let value = self.get_input(name, options)?;

        Ok(value
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| {
                if options.trim_whitespace {
                    line.trim().to_string()
                } else {
                    line.to_string()
                }
            })
            .collect())
    }

    /// Read a boolean input per the YAML 1.2 core schema:
    /// `true | True | TRUE | false | False | FALSE`.
    pub fn get_bool_input(&self, name: &str, options: InputOptions) -> Result<bool> {
        let value = self.get_input(name, options)?;

        match value.as_str() {
            "true" | "True" | "TRUE" => Ok(true),
            "false" | "False" | "FALSE" => Ok(false),
            _ => Err(CoreError::InvalidArgument(format!(
                "Input does not meet YAML 1.2 \"Core Schema\" specification: {name}\n\
                 Support boolean input list: `true | True | TRUE | false | False | FALSE`"
            ))),
        }
    }

    /// Read state saved by the main step, from the `STATE_` family.
    pub fn get_state(&self, name: &str) -> String {
        self.env.get(&state_variable_name(name)).unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Logging and annotations
    // -----------------------------------------------------------------------

    /// Whether runner diagnostic logging is enabled.
    pub fn is_debug(&self) -> bool {
        self.env.get(keys::RUNNER_DEBUG).as_deref() == Some("1")
    }

    /// Register a secret to be masked from all log output. Must be called
    /// before the secret first appears in any other line.
    pub fn set_secret(&self, secret: &str) -> Result<()> {
        self.issuer
            .issue_command(command_names::ADD_MASK, no_properties(), secret)
    }

    pub fn debug(&self, message: &str) -> Result<()> {
        self.issuer
            .issue_command(command_names::DEBUG, no_properties(), message)
    }

    /// Write an ordinary log line, outside the command protocol.
    pub fn info(&self, message: &str) -> Result<()> {
        self.issuer.console().write_line(message)?;
        Ok(())
    }

    pub fn notice(&self, message: &str, properties: &AnnotationProperties) -> Result<()> {
        self.issuer.issue_command(
            command_names::NOTICE,
            properties.to_command_properties(),
            message,
        )
    }

    pub fn warning(&self, message: &str, properties: &AnnotationProperties) -> Result<()> {
        self.issuer.issue_command(
            command_names::WARNING,
            properties.to_command_properties(),
            message,
        )
    }

    pub fn error(&self, message: &str, properties: &AnnotationProperties) -> Result<()> {
        self.issuer.issue_command(
            command_names::ERROR,
            properties.to_command_properties(),
            message,
        )
    }

    /// Begin a foldable output group.
    pub fn start_group(&self, name: &str) -> Result<()> {
        self.issuer.issue(command_names::GROUP, name)
    }

    /// End the current output group.
    pub fn end_group(&self) -> Result<()> {
        self.issuer.issue(command_names::END_GROUP, CommandValue::Empty)
    }

    /// Run `f` inside an output group. The group is closed even when `f`
    /// panics, so a failing body never leaves later log lines folded.
    pub fn group<T>(&self, name: &str, f: impl FnOnce() -> T) -> Result<T> {
        self.start_group(name)?;

        let mut guard = EndGroupGuard {
            issuer: &self.issuer,
            armed: true,
        };
        let result = f();
        guard.armed = false;
        drop(guard);

        self.end_group()?;
        Ok(result)
    }

    /// Enable or disable echoing of workflow commands into the log.
    pub fn set_command_echo(&self, enabled: bool) -> Result<()> {
        self.issuer
            .issue(command_names::ECHO, if enabled { "on" } else { "off" })
    }

    /// Mark the step as failed and emit the message as an error annotation.
    pub fn set_failed(&self, message: &str) -> Result<()> {
        self.exit_code.set(ExitCode::Failure);
        self.error(message, &AnnotationProperties::default())
    }

    /// The exit code the step should terminate with.
    pub fn exit_code(&self) -> ExitCode {
        self.exit_code.get()
    }
}

/// Closes the group during unwind. On the normal path the caller disarms
/// the guard and issues `endgroup` itself so the write error can surface.
struct EndGroupGuard<'a, C: Console> {
    issuer: &'a CommandIssuer<C>,
    armed: bool,
}

impl<C: Console> Drop for EndGroupGuard<'_, C> {
    fn drop(&mut self) {
        if self.armed {
            // Already unwinding; a failed write here cannot be reported.
            let _ = self
                .issuer
                .issue(command_names::END_GROUP, CommandValue::Empty);
        }
    }
}

fn no_properties() -> std::iter::Empty<(String, String)> {
    std::iter::empty()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
