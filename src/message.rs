// This file is part of bcc, a compiler for the B programming language.
// Copyright 2026 The bcc Authors.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// bcc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// bcc is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with bcc.  If not, see <http://www.gnu.org/licenses/>.

//! Compiler diagnostics.

use std::fmt::{self, Display, Formatter};
use colored::Colorize;

use crate::PROGRAM_NAME;

// -----------------------------------------------------------------------------

/// Trait for compiler message types.
pub trait Message: Display {
    /// Returns the origin (program, or a specific source file) of the message.
    #[inline]
    fn origin(&self) -> Origin { Origin::General }

    /// Returns the severity level of the message.
    #[inline]
    fn severity(&self) -> Severity { Severity::Normal }
}

impl Message for str    {}
impl Message for String {}

impl<T> Message for &T where T: Message + ?Sized {
    #[inline]
    fn origin(&self) -> Origin { (*self).origin() }

    #[inline]
    fn severity(&self) -> Severity { (*self).severity() }
}

// -----------------------------------------------------------------------------

/// Compiler message origins.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Origin<'a> {
    /// The message originates from the compiler driver itself.
    General,

    /// The message originates from a specific source file.
    File(&'a str),
}

impl Display for Origin<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Origin::General    => write!(f, "{}", PROGRAM_NAME),
            Origin::File(path) => write!(f, "{}", path),
        }
    }
}

// -----------------------------------------------------------------------------

/// Message severity levels.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// For informational messages.
    Normal,

    /// For problems that prevent complete compilation.
    Error,

    /// For severe, unrecoverable problems. The compiler terminates
    /// immediately and does not produce output.
    Fatal,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Severity::Normal => "",
            Severity::Error  => "error: ",
            Severity::Fatal  => "error: ",
        })
    }
}

// -----------------------------------------------------------------------------

/// Wrapper type that gives error severity to a compiler message.
#[derive(Copy, Clone, Debug)]
pub struct Error<T>(pub T);

impl<T: Display> Message for Error<T> {
    #[inline]
    fn severity(&self) -> Severity { Severity::Error }
}

impl<T: Display> Display for Error<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Wrapper type that gives fatal severity to a compiler message, and that
/// additionally ties the message to a specific source file.
#[derive(Copy, Clone, Debug)]
pub struct FileFatal<'a, T>(pub &'a str, pub T);

impl<'a, T: Display> Message for FileFatal<'a, T> {
    #[inline]
    fn origin(&self) -> Origin { Origin::File(self.0) }

    #[inline]
    fn severity(&self) -> Severity { Severity::Fatal }
}

impl<'a, T: Display> Display for FileFatal<'a, T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.1.fmt(f)
    }
}

// -----------------------------------------------------------------------------

/// Prints `msg` to stderr as `<origin>: <severity><message>`, with the origin
/// in bold white and the severity prefix in bold red, per the diagnostic
/// convention used throughout this compiler.
pub fn report<M: Message>(msg: M) {
    eprintln!(
        "{}: {}{}",
        msg.origin().to_string().white().bold(),
        msg.severity().to_string().bold().red(),
        msg,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_general_display() {
        assert_eq!(Origin::General.to_string(), PROGRAM_NAME);
    }

    #[test]
    fn origin_file_display() {
        assert_eq!(Origin::File("prog.b").to_string(), "prog.b");
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Normal.to_string(), "");
        assert_eq!(Severity::Error.to_string(),  "error: ");
        assert_eq!(Severity::Fatal.to_string(),  "error: ");
    }

    #[test]
    fn error_wrapper() {
        let e = Error("oops");
        assert_eq!(e.severity(), Severity::Error);
        assert_eq!(e.origin(),   Origin::General);
        assert_eq!(e.to_string(), "oops");
    }

    #[test]
    fn file_fatal_wrapper() {
        let e = FileFatal("prog.b", "missing semicolon");
        assert_eq!(e.severity(), Severity::Fatal);
        assert_eq!(e.origin(),   Origin::File("prog.b"));
        assert_eq!(e.to_string(), "missing semicolon");
    }
}
