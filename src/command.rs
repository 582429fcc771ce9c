//! External command executor built on `/bin/sh -c`.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;

use crate::error::Error;
use crate::payload::{Extras, Payload};

/// Shell used to interpret command lines.
const SHELL: &str = "/bin/sh";

/// Runs one shell command line and captures its outcome as a [`Payload`].
///
/// The command string is handed to the platform shell, so metacharacters
/// (pipes, redirects, variable expansion) are honored; callers are
/// responsible for quoting. Configuration is fixed at construction time
/// via the builder methods; [`execute`](Self::execute) may be called any
/// number of times and spawns a fresh process each time.
///
/// By default a failing command is not an error: the non-zero status is
/// reported on the payload and inspected via
/// [`Payload::is_error`](crate::Payload::is_error). Strict mode turns the
/// same condition into [`Error::CommandFailed`].
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    command: String,
    cwd: Option<PathBuf>,
    env: BTreeMap<String, String>,
    strict: bool,
}

impl ExternalCommand {
    /// Creates an executor for the given shell command line.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), cwd: None, env: BTreeMap::new(), strict: false }
    }

    /// Sets the working directory for the child process. Without an
    /// override the child inherits the caller's current directory.
    #[must_use]
    pub fn current_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cwd = Some(path.into());
        self
    }

    /// Replaces the environment mapping for the child process.
    ///
    /// A non-empty mapping becomes the child's entire environment; the
    /// parent environment is not merged in, so include `PATH` if the
    /// command needs it. An empty mapping inherits the parent environment.
    #[must_use]
    pub fn env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Enables or disables strict mode, which raises
    /// [`Error::CommandFailed`] on an exit status greater than zero.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Runs the command, optionally feeding `input` to its standard input,
    /// and blocks until the child exits.
    ///
    /// The input write and both output drains run concurrently, so a child
    /// blocked on a full pipe buffer cannot deadlock the exchange no
    /// matter how its output and error volume interleave.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the process could not be created or the
    /// pipe exchange failed, regardless of strict mode. Returns
    /// [`Error::CommandFailed`] if strict mode is enabled and the command
    /// exited with a status greater than zero.
    pub fn execute(&self, input: Option<&str>) -> Result<Payload, Error> {
        let mut child = self.spawn()?;
        let (output, error) = self.exchange(&mut child, input)?;
        let status = child.wait().map_err(|source| self.spawn_error(source))?;
        let status = status.code().unwrap_or(-1);
        tracing::debug!(command = %self.command, status, "command exited");

        if self.strict && status > 0 {
            return Err(Error::CommandFailed {
                command: self.command.clone(),
                status,
                stderr: error,
            });
        }

        Ok(Payload::new(
            status,
            input.map(str::to_string),
            output.trim().to_string(),
            split_messages(&error),
            Extras::new(self.command.clone(), self.cwd.clone(), self.env.clone()),
        ))
    }

    fn spawn(&self) -> Result<Child, Error> {
        let mut command = Command::new(SHELL);
        command
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        if !self.env.is_empty() {
            command.env_clear().envs(&self.env);
        }
        tracing::debug!(command = %self.command, "spawning external command");
        command.spawn().map_err(|source| self.spawn_error(source))
    }

    /// Writes the input and drains both output streams, each on its own
    /// scoped thread, joined before the caller waits on the child.
    fn exchange(
        &self,
        child: &mut Child,
        input: Option<&str>,
    ) -> Result<(String, String), Error> {
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let exchanged = thread::scope(|scope| -> io::Result<(String, String)> {
            let writer = scope.spawn(move || write_input(stdin, input));
            let error_reader = scope.spawn(move || drain(stderr));
            let output = drain(stdout)?;
            join(writer)?;
            let error = join(error_reader)?;
            Ok((output, error))
        });
        exchanged.map_err(|source| self.spawn_error(source))
    }

    fn spawn_error(&self, source: io::Error) -> Error {
        Error::Spawn { command: self.command.clone(), source }
    }
}

/// Writes the optional input, then closes the stream by dropping the
/// handle. Closing signals end-of-input; many commands block on it before
/// producing output.
fn write_input(stdin: Option<ChildStdin>, input: Option<&str>) -> io::Result<()> {
    let Some(mut stdin) = stdin else { return Ok(()) };
    if let Some(text) = input {
        if let Err(err) = stdin.write_all(text.as_bytes()) {
            // The child may exit without reading its input.
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(err);
            }
        }
    }
    Ok(())
}

fn drain(stream: Option<impl Read>) -> io::Result<String> {
    let Some(mut stream) = stream else { return Ok(String::new()) };
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, io::Result<T>>) -> io::Result<T> {
    handle.join().map_err(|_| io::Error::other("stream worker panicked"))?
}

fn split_messages(error: &str) -> Vec<String> {
    error.lines().filter(|line| !line.is_empty()).map(String::from).collect()
}
