//! Error types for external command execution.

use std::io;

use thiserror::Error;

/// Errors raised while executing an external command.
///
/// Only two conditions are ever reported as errors. Everything else —
/// including a command that runs and fails — is data on the
/// [`Payload`](crate::Payload).
#[derive(Debug, Error)]
pub enum Error {
    /// The child process could not be created, or the pipe exchange with
    /// it broke down. Unrelated to the command's own exit status and
    /// never suppressed by configuration.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// The command line that was being executed.
        command: String,
        /// The underlying operating-system error.
        source: io::Error,
    },

    /// The command exited with a status greater than zero while strict
    /// mode was enabled.
    #[error("`{command}` exited with status {status}")]
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// The child's exit status.
        status: i32,
        /// The full captured standard-error text.
        stderr: String,
    },
}
