//! Payload value describing the outcome of one command invocation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Snapshot of the request that produced a [`Payload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extras {
    command: String,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl Extras {
    pub(crate) fn new(
        command: String,
        cwd: Option<PathBuf>,
        env: BTreeMap<String, String>,
    ) -> Self {
        Self { command, cwd, env }
    }

    /// The command line that was executed.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The working-directory override, or `None` when the caller's
    /// directory was inherited.
    #[must_use]
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// The environment mapping in effect at invocation time. Empty means
    /// the parent environment was inherited.
    #[must_use]
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

/// The outcome of one external command invocation.
///
/// Produced by [`ExternalCommand::execute`](crate::ExternalCommand::execute)
/// and read-only afterwards. Failure is data here: a non-zero exit status
/// is reported through [`is_error`](Self::is_error) rather than raised,
/// unless the executor runs in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    status: i32,
    input: Option<String>,
    output: String,
    messages: Vec<String>,
    extras: Extras,
}

impl Payload {
    pub(crate) fn new(
        status: i32,
        input: Option<String>,
        output: String,
        messages: Vec<String>,
        extras: Extras,
    ) -> Self {
        Self { status, input, output, messages, extras }
    }

    /// The child process exit status. `-1` stands in for signal
    /// termination, where the platform reports no code.
    #[must_use]
    pub fn status(&self) -> i32 {
        self.status
    }

    /// The input text that was sent to the child, if any.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// The captured standard output, trimmed of surrounding whitespace.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Non-empty standard-error lines, in original order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Metadata snapshot of the request that produced this payload.
    #[must_use]
    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    /// Whether the command exited with status zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Whether the command exited with a status greater than zero.
    ///
    /// Negative statuses (signal termination) are neither success nor
    /// error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status > 0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}
