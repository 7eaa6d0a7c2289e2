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

#![allow(dead_code)]

mod compiler;
mod driver;
mod message;

use std::env;
use std::process::ExitCode;

use driver::{Driver, DEFAULT_OUTPUT};
use message::{report, Error};

/// The name of the compiler, as printed in diagnostics and `--version`.
pub const PROGRAM_NAME: &str = "bcc";

fn main() -> ExitCode {
    ExitCode::from(run(env::args().skip(1).collect()) as u8)
}

fn run(args: Vec<String>) -> i32 {
    let mut assemble = true;
    let mut link      = true;
    let mut output    = None;
    let mut inputs    = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" => {
                print_usage();
                return 0;
            }
            "--version" => {
                print_version();
                return 0;
            }
            "-o" => {
                i += 1;
                match args.get(i) {
                    Some(path) => output = Some(path.clone()),
                    None       => report("missing filename"),
                }
            }
            "-S" => {
                assemble = false;
                link     = false;
            }
            "-c" => {
                link = false;
            }
            _ if arg.starts_with('-') => {
                report(Error(format!("unrecognized command-line option '{}'", arg)));
                return 1;
            }
            _ => inputs.push(arg.clone()),
        }
        i += 1;
    }

    if inputs.is_empty() {
        report("no input files");
        return 1;
    }

    // Only the final `ld` invocation ever honors `-o`: the intermediate
    // `a.s`/`a.o` paths are fixed regardless of where compilation stops.
    let output = output.unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let driver = Driver { assemble, link, output };
    driver.run(&inputs)
}

fn print_usage() {
    println!("usage: {} [options] file...", PROGRAM_NAME);
    println!();
    println!("options:");
    println!("  --help        print this message and exit");
    println!("  --version     print version information and exit");
    println!("  -o <file>     set output path");
    println!("  -S            emit assembly only, do not assemble or link");
    println!("  -c            assemble to an object file, do not link");
}

fn print_version() {
    println!("{} {}", PROGRAM_NAME, env!("CARGO_PKG_VERSION"));
    println!("Copyright (C) 2026 The bcc Authors.");
    println!("This program comes with ABSOLUTELY NO WARRANTY.");
    println!("This is free software, and you are welcome to redistribute it");
    println!("under the terms of the GNU General Public License version 3 or later.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_files_is_an_error() {
        assert_eq!(run(vec![]), 1);
    }

    #[test]
    fn unrecognized_flag_is_fatal() {
        assert_eq!(run(vec!["-z".to_string()]), 1);
    }

    #[test]
    fn help_exits_zero_without_requiring_inputs() {
        assert_eq!(run(vec!["--help".to_string()]), 0);
    }

    #[test]
    fn version_exits_zero_without_requiring_inputs() {
        assert_eq!(run(vec!["--version".to_string()]), 0);
    }

    #[test]
    fn missing_o_argument_is_reported_but_not_immediately_fatal() {
        // "-o" with nothing after it reports an error but falls through to
        // the "no input files" check rather than exiting on the spot.
        assert_eq!(run(vec!["-o".to_string()]), 1);
    }
}
