// actions-core: The GitHub Actions command protocol and step service facade.
// This crate builds on `actions-sdk` and implements the two channels a job
// step uses to talk to its host runner: `::name ...::message` lines on
// standard output, and delimiter-fenced blocks appended to runner-provided
// files.

pub mod annotations;
pub mod command_issuer;
pub mod core_service;
pub mod errors;
pub mod file_command;
pub mod summary;
pub mod workflow_command;

#[cfg(test)]
pub(crate) mod test_support;

// ---------------------------------------------------------------------------
// Re-exports for convenient access
// ---------------------------------------------------------------------------

pub use actions_sdk::{CommandValue, Environment, MapEnvironment, ProcessEnvironment};
pub use annotations::AnnotationProperties;
pub use command_issuer::{CommandIssuer, Console, StdoutConsole};
pub use core_service::{CoreService, ExitCode, InputOptions};
pub use errors::{CoreError, Result};
pub use file_command::FileCommandWriter;
pub use summary::{
    AlertType, Summary, SummaryImageOptions, SummaryTable, SummaryTableCell, SummaryTableRow,
    SummaryWriteOptions, TableColumnAlignment, TaskItem,
};
pub use workflow_command::{command_names, WorkflowCommand};
