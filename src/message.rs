// This file is part of ras, an assembler.
// Copyright (C) 2020 Jeffrey Sharp
//
// ras is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// ras is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ras.  If not, see <http://www.gnu.org/licenses/>.

//! Diagnostic messages: origin, severity, and the small `Log` sink builtin
//! handlers and the top-level driver report through (§7, §10.1, §10.4).

use std::fmt::{self, Arguments, Display, Formatter};
use colored::Colorize;
use crate::util::Location;

// -----------------------------------------------------------------------------

/// Trait for diagnostic message types.
pub trait Message: Display {
    /// Returns the origin (e.g. path, line, and column) of the message.
    #[inline]
    fn origin(&self) -> Origin { Origin::General }

    /// Returns the severity level of the message.
    #[inline]
    fn severity(&self) -> Severity { Severity::Normal }
}

impl Message for str           {}
impl Message for String        {}
impl Message for Arguments<'_> {}

impl<T> Message for &T where T: Message + ?Sized {
    #[inline]
    fn origin(&self) -> Origin { (*self).origin() }

    #[inline]
    fn severity(&self) -> Severity { (*self).severity() }
}

// -----------------------------------------------------------------------------

/// Diagnostic message origins.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Origin<'a> {
    /// The message has no associated input location.
    General,

    /// The message is tied to the location of the *triggering token*
    /// (§6), not the location where the active builtin was defined.
    File {
        /// Path of the source file.
        path: &'a str,

        /// Line-and-column location within the source file.
        loc: Location
    },
}

impl Display for Origin<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Origin::General            => write!(f, "{}", crate::PROGRAM_NAME),
            Origin::File { path, loc } => write!(f, "{}:{}", path, loc),
        }
    }
}

// -----------------------------------------------------------------------------

/// Wrapper type that adds file origin information to a message.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FileMessage<'a, M: Message> {
    /// The assembler message.
    msg: M,

    /// Path of the source code file.
    path: &'a str,

    /// Line-and-column location within the source code file.
    loc: Location,
}

impl<'a, M: Message> Message for FileMessage<'a, M> {
    #[inline]
    fn origin(&self) -> Origin {
        Origin::File { path: self.path, loc: self.loc }
    }

    #[inline]
    fn severity(&self) -> Severity {
        self.msg.severity()
    }
}

impl<'a, M: Message> Display for FileMessage<'a, M> {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.msg.fmt(f)
    }
}

// -----------------------------------------------------------------------------

/// Message severity levels.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// For informational messages.
    Normal,

    /// For recoverable problems that do not stop processing (§7's
    /// "recoverable, warning" class). Processing continues and the exit
    /// code is left unaffected.
    Warning,

    /// For problems that are reported to the caller but do not themselves
    /// abort processing (§7's "recoverable, reported" class). Raises the
    /// process exit code.
    Error,

    /// For conditions that make further processing meaningless (§7's
    /// "fatal, abort" class: EOF inside a quote or comment, a broken
    /// invariant). Terminates the run immediately with a distinguished
    /// exit code.
    Fatal,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Severity::Normal  => "",
            Severity::Warning => "warning: ",
            Severity::Error   => "error: ",
            Severity::Fatal   => "fatal: ",
        })
    }
}

// -----------------------------------------------------------------------------

/// Wrapper type that gives warning severity to a message.
#[derive(Copy, Clone, Debug)]
pub struct Warning<T: Message>(T);

impl<T: Message> Message for Warning<T> {
    #[inline]
    fn origin(&self) -> Origin {
        self.0.origin()
    }

    #[inline]
    fn severity(&self) -> Severity {
        Severity::Warning
    }
}

impl<T: Message> Display for Warning<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

// -----------------------------------------------------------------------------

/// Wrapper type that gives error severity to a message.
#[derive(Copy, Clone, Debug)]
pub struct Error<T: Message>(T);

impl<T: Message> Message for Error<T> {
    #[inline]
    fn origin(&self) -> Origin {
        self.0.origin()
    }

    #[inline]
    fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl<T: Message> Display for Error<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

// -----------------------------------------------------------------------------

/// Wrapper type that gives fatal severity to a message.
#[derive(Copy, Clone, Debug)]
pub struct Fatal<T: Message>(T);

impl<T: Message> Message for Fatal<T> {
    #[inline]
    fn origin(&self) -> Origin {
        self.0.origin()
    }

    #[inline]
    fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl<T: Message> Display for Fatal<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

// -----------------------------------------------------------------------------

pub fn file_not_found_error(path: &str) -> impl Message + '_ {
    FileMessage {
        msg: Error("file not found"),
        path: path,
        loc: Location::UNKNOWN,
    }
}

// -----------------------------------------------------------------------------

/// Sink for diagnostics, tracking warning/error counts (§7, §10.4).
pub trait Log {
    /// Reports `msg`, updating counters and printing per its severity.
    fn log<M: Message>(&mut self, msg: M);
}

/// The crate's one [`Log`] implementation: prints to stderr, prefixed with
/// the message's origin and severity, colorized via `colored` (which
/// itself detects non-tty output and disables color automatically).
#[derive(Debug, Default)]
pub struct Logger {
    warning_count: u32,
    error_count:   u32,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> u32 { self.warning_count }
    pub fn error_count(&self)   -> u32 { self.error_count }

    /// The process exit code implied by messages logged so far (§7's
    /// "distinguished non-zero exit code").
    pub fn exit_code(&self) -> i32 {
        if self.error_count > 0 { 1 } else { 0 }
    }
}

impl Log for Logger {
    fn log<M: Message>(&mut self, msg: M) {
        let severity = msg.severity();
        match severity {
            Severity::Warning => self.warning_count += 1,
            Severity::Error | Severity::Fatal => self.error_count += 1,
            Severity::Normal => {}
        }

        let line = format!("{}: {}{}", msg.origin(), severity, msg);
        let line = match severity {
            Severity::Warning => line.yellow().to_string(),
            Severity::Error | Severity::Fatal => line.red().to_string(),
            Severity::Normal => line,
        };
        eprintln!("{}", line);

        if severity == Severity::Fatal {
            std::process::exit(2);
        }
    }
}
