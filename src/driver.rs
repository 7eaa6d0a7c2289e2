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

//! Orchestrates a full run: compiling every `.b` input into one assembly
//! buffer, then optionally assembling and linking it with external tools.

use std::fs;
use std::process::Command;

use crate::compiler::Emitter;
use crate::message::{self, Error, FileFatal};

/// Fixed path of the intermediate assembly file.
pub const ASM_PATH: &str = "a.s";

/// Fixed path of the intermediate object file.
pub const OBJ_PATH: &str = "a.o";

/// Default path of the linked executable.
pub const DEFAULT_OUTPUT: &str = "a.out";

/// Compiles and, as configured, assembles and links a set of input files.
pub struct Driver {
    /// Whether to invoke `as` on the emitted assembly.
    pub assemble: bool,

    /// Whether to invoke `ld` on the assembled object. Ignored if `assemble`
    /// is false.
    pub link: bool,

    /// Final output path: the assembly file (`-S`), the object file (`-c`),
    /// or the linked executable.
    pub output: String,
}

impl Driver {
    /// Runs the full pipeline over `paths`, in order. Files not ending in
    /// `.b` are silently skipped. Returns the process exit code: `0` on
    /// success, or the code to surface on failure.
    pub fn run(&self, paths: &[String]) -> i32 {
        match self.try_run(paths) {
            Ok(())   => 0,
            Err(code) => code,
        }
    }

    fn try_run(&self, paths: &[String]) -> Result<(), i32> {
        let asm = self.compile_all(paths)?;

        fs::write(ASM_PATH, &asm).map_err(|e| {
            message::report(Error(format!("could not write {}: {}", ASM_PATH, e)));
            1
        })?;

        if !self.assemble {
            return Ok(());
        }

        run_command(Command::new("as").arg(ASM_PATH).arg("-o").arg(OBJ_PATH))?;
        let _ = fs::remove_file(ASM_PATH);

        if !self.link {
            return Ok(());
        }

        run_command(
            Command::new("ld")
                .arg("-static")
                .arg("-nostdlib")
                .arg(OBJ_PATH)
                .arg("-L.")
                .arg("-L/lib64")
                .arg("-L/usr/local/lib64")
                .arg("-lb")
                .arg("-o")
                .arg(&self.output),
        )?;
        let _ = fs::remove_file(OBJ_PATH);

        Ok(())
    }

    /// Compiles every `.b` file in `paths`, in argv order, into a single
    /// buffer, threading the statement-id counter across files so that
    /// labels stay unique for the whole run.
    fn compile_all(&self, paths: &[String]) -> Result<String, i32> {
        let mut asm = String::new();
        let mut next_id = 0;

        for path in paths {
            if !path.ends_with(".b") {
                continue;
            }

            let bytes = fs::read(path).map_err(|e| {
                message::report(FileFatal(path.as_str(), e));
                1
            })?;

            let mut emitter = Emitter::with_next_id(path, &bytes, next_id);
            emitter.compile().map_err(|_| 1)?;

            next_id = emitter.next_id();
            asm.push_str(emitter.output());
        }

        Ok(asm)
    }
}

/// Runs a child process to completion, reporting and surfacing its exit
/// code on any failure to start or any non-zero exit.
fn run_command(cmd: &mut Command) -> Result<(), i32> {
    let program = cmd.get_program().to_string_lossy().into_owned();

    match cmd.status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => {
            let code = status.code().unwrap_or(1);
            message::report(Error(format!("{} failed", program)));
            Err(code)
        }
        Err(e) => {
            message::report(Error(format!("could not run {}: {}", program, e)));
            Err(1)
        }
    }
}
