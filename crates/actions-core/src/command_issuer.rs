// Writes encoded workflow commands to the output sink.
// Line order on the wire is significant (group/endgroup pairing, add-mask
// registration), so the issuer is a single synchronous writer; callers
// serialize concurrent use themselves.

use std::io::{self, Write};

use actions_sdk::CommandValue;

use crate::errors::Result;
use crate::workflow_command::WorkflowCommand;

/// Diagnostic line emitted before any command whose name is outside the
/// conventional set.
const UNCONVENTIONAL_NOTICE: &str = "Issuing unconventional command.";

/// An append-only, line-buffered output sink.
pub trait Console {
    /// Write a single line, terminated by the platform newline. A failed
    /// write propagates to the caller; the command may be lost.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// The process standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, line: &str) -> io::Result<()> {
        // Lock once per line so the command reaches the stream whole.
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{line}")
    }
}

impl<C: Console + ?Sized> Console for &C {
    fn write_line(&self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

/// Issues workflow commands against a [`Console`].
#[derive(Debug, Clone)]
pub struct CommandIssuer<C: Console> {
    console: C,
}

impl<C: Console> CommandIssuer<C> {
    pub fn new(console: C) -> Self {
        Self { console }
    }

    /// The underlying output sink.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Issue a command with no properties.
    pub fn issue(&self, command_name: &str, message: impl Into<CommandValue>) -> Result<()> {
        self.issue_workflow_command(WorkflowCommand::new(command_name, message))
    }

    /// Issue a command with the given properties.
    pub fn issue_command<K, V>(
        &self,
        command_name: &str,
        properties: impl IntoIterator<Item = (K, V)>,
        message: impl Into<CommandValue>,
    ) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.issue_workflow_command(
            WorkflowCommand::new(command_name, message).properties(properties),
        )
    }

    fn issue_workflow_command(&self, command: WorkflowCommand) -> Result<()> {
        if !command.is_conventional() {
            self.console.write_line(UNCONVENTIONAL_NOTICE)?;
        }

        tracing::trace!(command = command.name(), "issuing workflow command");
        self.console.write_line(&command.to_string())?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreError;
    use crate::test_support::{FailingConsole, RecordingConsole};
    use crate::workflow_command::command_names;

    #[test]
    fn conventional_command_emits_single_line() {
        let console = RecordingConsole::new();
        let issuer = CommandIssuer::new(&console);

        issuer.issue(command_names::WARNING, "m").unwrap();

        assert_eq!(console.lines(), vec!["::warning::m"]);
    }

    #[test]
    fn unconventional_command_emits_diagnostic_first() {
        let console = RecordingConsole::new();
        let issuer = CommandIssuer::new(&console);

        issuer.issue("custom-xyz", "m").unwrap();

        assert_eq!(
            console.lines(),
            vec!["Issuing unconventional command.", "::custom-xyz::m"]
        );
    }

    #[test]
    fn unconventional_command_with_properties() {
        let console = RecordingConsole::new();
        let issuer = CommandIssuer::new(&console);

        issuer
            .issue_command("command", Vec::<(String, String)>::new(), "message")
            .unwrap();

        assert_eq!(
            console.lines(),
            vec!["Issuing unconventional command.", "::command::message"]
        );
    }

    #[test]
    fn set_output_with_name_property() {
        let console = RecordingConsole::new();
        let issuer = CommandIssuer::new(&console);

        issuer
            .issue_command(
                command_names::SET_OUTPUT,
                [("name", "summary")],
                "Everything worked as expected",
            )
            .unwrap();

        assert_eq!(
            console.lines(),
            vec!["::set-output name=summary::Everything worked as expected"]
        );
    }

    #[test]
    fn preserves_call_order() {
        let console = RecordingConsole::new();
        let issuer = CommandIssuer::new(&console);

        issuer.issue(command_names::GROUP, "build").unwrap();
        issuer.issue(command_names::DEBUG, "inside").unwrap();
        issuer
            .issue(command_names::END_GROUP, CommandValue::Empty)
            .unwrap();

        assert_eq!(
            console.lines(),
            vec!["::group::build", "::debug::inside", "::endgroup::"]
        );
    }

    #[test]
    fn failed_write_propagates_to_caller() {
        let issuer = CommandIssuer::new(FailingConsole);

        let err = issuer.issue(command_names::WARNING, "m").unwrap_err();

        assert!(matches!(err, CoreError::Io(_)));
    }
}
