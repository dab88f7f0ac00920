//! Command-line argument normalisation for the daemon binary.
//!
//! The gateway accepts its listen port as a lone positional argument
//! (`ws2piped 13000`). The configuration loader only understands flags, so
//! the positional form is rewritten into `--port <n>` before loading.

use std::ffi::{OsStr, OsString};

use thiserror::Error;

/// Flags whose value is passed as the following argument unless given
/// inline with `=`.
const VALUE_FLAGS: &[&str] = &[
    "--config-path",
    "--listen-host",
    "--log-filter",
    "--log-format",
    "--pipe-timeout-ms",
    "--port",
];

/// Errors raised while rewriting positional arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// A numeric positional argument did not fit a TCP port.
    #[error("invalid port '{value}': expected a number between 0 and 65535")]
    InvalidPort {
        /// Argument as given.
        value: String,
    },
    /// A positional argument that is not a port.
    #[error("unexpected argument '{value}'")]
    UnexpectedArgument {
        /// Argument as given.
        value: String,
    },
    /// More than one positional port was supplied.
    #[error("port given more than once: '{value}'")]
    DuplicatePort {
        /// The second positional port.
        value: String,
    },
}

#[derive(Debug, Clone, Copy)]
enum FlagAction {
    Keep { needs_value: bool },
    Positional,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with('-') || text == "-" {
        return FlagAction::Positional;
    }
    let mut parts = text.splitn(2, '=');
    let flag = parts.next().unwrap_or_default();
    let has_inline_value = parts.next().is_some();
    FlagAction::Keep {
        needs_value: VALUE_FLAGS.contains(&flag) && !has_inline_value,
    }
}

fn parse_port(argument: &OsStr) -> Result<u16, ArgumentError> {
    let text = argument.to_string_lossy();
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ArgumentError::UnexpectedArgument {
            value: text.into_owned(),
        });
    }
    match text.parse::<u16>() {
        Ok(port) => Ok(port),
        Err(_) => Err(ArgumentError::InvalidPort {
            value: text.into_owned(),
        }),
    }
}

/// Rewrites a lone numeric positional argument into `--port <n>`.
///
/// The first element is the program name and is kept as is. Flags and their
/// values pass through unchanged.
///
/// # Errors
///
/// Returns an [`ArgumentError`] for non-numeric positionals, ports outside
/// the `u16` range, or a second positional port.
pub fn normalise_arguments<I>(args: I) -> Result<Vec<OsString>, ArgumentError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut normalised: Vec<OsString> = args.next().into_iter().collect();
    let mut positional_port = None::<u16>;
    let mut pending_value = false;

    for argument in args {
        if pending_value {
            pending_value = false;
            normalised.push(argument);
            continue;
        }
        match classify(&argument) {
            FlagAction::Keep { needs_value } => {
                pending_value = needs_value;
                normalised.push(argument);
            }
            FlagAction::Positional => {
                let port = parse_port(&argument)?;
                if positional_port.replace(port).is_some() {
                    return Err(ArgumentError::DuplicatePort {
                        value: argument.to_string_lossy().into_owned(),
                    });
                }
                normalised.push(OsString::from("--port"));
                normalised.push(OsString::from(port.to_string()));
            }
        }
    }

    Ok(normalised)
}
