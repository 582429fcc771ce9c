//! Run external shell commands and capture their outcome.
//!
//! [`ExternalCommand`] spawns one process per invocation through
//! `/bin/sh -c`, feeds it optional input, drains standard output and
//! standard error, and packages the result into an immutable [`Payload`].
//! Failure is data by default; strict mode raises instead.
//!
//! ```
//! use xcmd::ExternalCommand;
//!
//! let payload = ExternalCommand::new("echo hello").execute(None)?;
//! assert!(payload.is_success());
//! assert_eq!(payload.output(), "hello");
//! # Ok::<(), xcmd::Error>(())
//! ```

pub mod command;
pub mod error;
pub mod payload;

pub use command::ExternalCommand;
pub use error::Error;
pub use payload::{Extras, Payload};
