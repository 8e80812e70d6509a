// The workflow command wire format:
//   ::name key=value,key=value::message
// A pure string transform; issuing the line is `command_issuer`'s job.

use std::fmt;

use actions_sdk::{escape_data, escape_property, CommandValue};

/// The closed set of command names the runner's log scanner recognizes.
/// Anything outside this set is still transmitted, but is "unconventional".
pub mod command_names {
    pub const SET_ENV: &str = "set-env";
    pub const ADD_MASK: &str = "add-mask";
    pub const ADD_PATH: &str = "add-path";
    pub const ECHO: &str = "echo";
    pub const DEBUG: &str = "debug";
    pub const ERROR: &str = "error";
    pub const WARNING: &str = "warning";
    pub const NOTICE: &str = "notice";
    pub const GROUP: &str = "group";
    pub const END_GROUP: &str = "endgroup";

    // Deprecated in favor of the GITHUB_STATE / GITHUB_OUTPUT file commands,
    // but still recognized by the runner.
    pub const SAVE_STATE: &str = "save-state";
    pub const SET_OUTPUT: &str = "set-output";

    const ALL: &[&str] = &[
        SET_ENV, ADD_MASK, ADD_PATH, ECHO, DEBUG, ERROR, WARNING, NOTICE, GROUP, END_GROUP,
        SAVE_STATE, SET_OUTPUT,
    ];

    /// Whether `command` is one of the runner-recognized command names.
    pub fn is_conventional(command: &str) -> bool {
        ALL.contains(&command)
    }
}

/// A single workflow command: name, ordered key/value properties, and a
/// message. Immutable once built; constructed fresh per invocation.
#[derive(Debug, Clone)]
pub struct WorkflowCommand {
    name: String,
    properties: Vec<(String, String)>,
    message: CommandValue,
}

impl WorkflowCommand {
    /// Create a command with no properties. An empty name is legal wire
    /// syntax (`::::`) even though semantically meaningless.
    pub fn new(name: impl Into<String>, message: impl Into<CommandValue>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            message: message.into(),
        }
    }

    /// Append a property, replacing the value in place if the key already
    /// exists. Insertion order is preserved for deterministic output.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.properties.push((key, value)),
        }
        self
    }

    /// Append properties from an iterator, in iteration order.
    pub fn properties<K, V>(mut self, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in properties {
            self = self.property(key, value);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the command name is in the conventional set.
    pub fn is_conventional(&self) -> bool {
        command_names::is_conventional(&self.name)
    }
}

impl fmt::Display for WorkflowCommand {
    /// Renders the byte-exact wire line. The name is emitted verbatim; the
    /// property segment (and its leading space) appears only when at least
    /// one property is present; the message segment always appears.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}", self.name)?;

        if !self.properties.is_empty() {
            f.write_str(" ")?;
            for (index, (key, value)) in self.properties.iter().enumerate() {
                if index > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}={}", key, escape_property(value))?;
            }
        }

        write!(f, "::{}", escape_data(self.message.coerce()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_simple_command() {
        let cmd = WorkflowCommand::new("some-cmd", "7");
        assert_eq!(cmd.to_string(), "::some-cmd::7");
    }

    #[test]
    fn renders_command_with_property() {
        let cmd = WorkflowCommand::new("cmdr", false).property("k1", "v1");
        assert_eq!(cmd.to_string(), "::cmdr k1=v1::false");
    }

    #[test]
    fn renders_empty_name_and_message() {
        let cmd = WorkflowCommand::new("", CommandValue::Empty);
        assert_eq!(cmd.to_string(), "::::");
    }

    #[test]
    fn renders_unescaped_name() {
        let cmd = WorkflowCommand::new("~~~", "Hi friends!");
        assert_eq!(cmd.to_string(), "::~~~::Hi friends!");
    }

    #[test]
    fn set_output_with_name_property() {
        let cmd = WorkflowCommand::new(command_names::SET_OUTPUT, "Everything worked as expected")
            .property("name", "summary");
        assert_eq!(
            cmd.to_string(),
            "::set-output name=summary::Everything worked as expected"
        );
    }

    #[test]
    fn escapes_property_values() {
        let cmd = WorkflowCommand::new(command_names::SET_OUTPUT, CommandValue::Empty).property(
            "name",
            "percent % percent % cr \r cr \r lf \n lf \n colon : colon : comma , comma ,",
        );
        assert_eq!(
            cmd.to_string(),
            "::set-output name=percent %25 percent %25 cr %0D cr %0D lf %0A lf %0A \
             colon %3A colon %3A comma %2C comma %2C::"
        );
    }

    #[test]
    fn escapes_data_even_when_already_escaped_looking() {
        let cmd = WorkflowCommand::new(
            command_names::SET_OUTPUT,
            "%25 %25 %0D %0D %0A %0A %3A %3A %2C %2C",
        );
        assert_eq!(
            cmd.to_string(),
            "::set-output::%2525 %2525 %250D %250D %250A %250A %253A %253A %252C %252C"
        );
    }

    #[test]
    fn multiple_properties_keep_insertion_order() {
        let cmd = WorkflowCommand::new(command_names::SET_OUTPUT, "example")
            .property("prop1", "Value 1")
            .property("prop2", "Value 2");
        assert_eq!(
            cmd.to_string(),
            "::set-output prop1=Value 1,prop2=Value 2::example"
        );
    }

    #[test]
    fn duplicate_property_key_replaces_in_place() {
        let cmd = WorkflowCommand::new("cmd", "m")
            .property("a", "1")
            .property("b", "2")
            .property("a", "3");
        assert_eq!(cmd.to_string(), "::cmd a=3,b=2::m");
    }

    #[test]
    fn json_property_escapes_colon() {
        let cmd = WorkflowCommand::new(command_names::SET_OUTPUT, "{\"test\":\"object\"}")
            .property("prop1", "{\"test\":\"object\"}")
            .property("prop2", "123")
            .property("prop3", "true");
        assert_eq!(
            cmd.to_string(),
            "::set-output prop1={\"test\"%3A\"object\"},prop2=123,prop3=true::{\"test\":\"object\"}"
        );
    }

    #[test]
    fn conventional_membership() {
        for name in [
            "set-env", "add-mask", "add-path", "echo", "debug", "error", "warning", "notice",
            "group", "endgroup", "save-state", "set-output",
        ] {
            assert!(command_names::is_conventional(name), "{name}");
        }
        assert!(!command_names::is_conventional("custom-xyz"));
        assert!(!command_names::is_conventional(""));
    }
}
