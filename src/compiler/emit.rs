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

//! The fused recursive-descent parser and x86-64 emitter.
//!
//! There is no AST: each producer below reads exactly the syntax it is
//! responsible for and appends assembly text to the output buffer as it
//! goes. The only state threaded through the recursion besides `self` is the
//! enclosing function name (for `return`) and the innermost `switch`'s id and
//! case-value list (for `case`); everything else is read once and discarded.

use std::fmt::Display;

use crate::message::{self, FileFatal};

use super::input::Input;
use super::lex::{self, Number};
use super::{CResult, Fatal, WORD_SIZE};

/// The case-value list and id of a `switch` being compiled. A `case` looks
/// up the innermost one of these via the `switch` parameter threaded through
/// [`Emitter::emit_stmt`] and its callees; nested `switch`es install a fresh
/// one for their own body.
struct Switch {
    id:    u32,
    cases: Vec<u64>,
}

/// Compiles one source file into x86-64 assembly text.
///
/// An `Emitter` is single-use: construct one per input file, call
/// [`Emitter::compile`] once, and take the accumulated text with
/// [`Emitter::into_output`]. The statement-id counter is threaded from one
/// file's `Emitter` to the next's via [`Emitter::with_next_id`] /
/// [`Emitter::next_id`], so labels stay unique across an entire compilation.
pub struct Emitter<'a> {
    path:    &'a str,
    input:   Input<'a>,
    out:     String,
    next_id: u32,
}

impl<'a> Emitter<'a> {
    /// Creates an [`Emitter`] for `bytes`, with the statement-id counter
    /// starting at zero.
    pub fn new(path: &'a str, bytes: &'a [u8]) -> Self {
        Self::with_next_id(path, bytes, 0)
    }

    /// Creates an [`Emitter`] for `bytes`, continuing the statement-id
    /// counter from a prior file's [`Emitter::next_id`].
    pub fn with_next_id(path: &'a str, bytes: &'a [u8], next_id: u32) -> Self {
        Self { path, input: Input::new(bytes), out: String::new(), next_id }
    }

    /// The statement-id counter's next value, for continuing into another
    /// `Emitter` over a subsequent file.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Returns the assembly text accumulated so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    /// Consumes the emitter, returning the accumulated assembly text.
    pub fn into_output(self) -> String {
        self.out
    }

    /// Compiles the entire input as a sequence of top-level declarations.
    pub fn compile(&mut self) -> CResult {
        while let Some(ident) = lex::read_ident(&mut self.input) {
            self.emit_decl(&ident)?;
        }

        lex::skip_whitespace(&mut self.input);
        if self.input.peek().is_some() {
            return Err(self.fatal("expect identifier at top level"));
        }

        Ok(())
    }

    // -- Declaration dispatcher (§4.2) --------------------------------------

    fn emit_decl(&mut self, id: &str) -> CResult {
        self.push(&format!(".globl {}\n", id));

        lex::skip_whitespace(&mut self.input);
        match self.input.next() {
            Some(b'(') => self.emit_function(id),
            Some(b'[') => self.emit_global(id, true),
            Some(_)    => { self.input.unget(); self.emit_global(id, false) }
            None       => Err(self.fatal("unexpected end of file after declaration")),
        }
    }

    // -- Global scalar / vector producer (§4.3) -----------------------------

    fn emit_global(&mut self, id: &str, is_vector: bool) -> CResult {
        self.push("\n.data\n");
        self.push(&format!(".type {}, @object\n", id));
        self.push(&format!(".align {}\n", WORD_SIZE));
        self.push(&format!("{}:\n", id));

        let size = if is_vector {
            lex::skip_whitespace(&mut self.input);
            if self.input.peek() == Some(b']') {
                self.input.next();
                None
            } else {
                let n = self.expect_number("expected vector size or ']'")?;
                self.expect_byte(b']', "expected ']' after vector size")?;
                Some(n)
            }
        } else {
            None
        };

        lex::skip_whitespace(&mut self.input);
        match self.input.next() {
            Some(b';') => {
                match (is_vector, size) {
                    (false, _)      => self.push(&format!(".zero {}\n", WORD_SIZE)),
                    (true, Some(n)) => self.push(&format!(".zero {}\n", WORD_SIZE as u64 * n)),
                    (true, None)    => {}
                }
                Ok(())
            }
            Some(_) => {
                self.input.unget();
                self.emit_ivals()
            }
            None => Err(self.fatal("unexpected end of file in initializer")),
        }
    }

    fn emit_ivals(&mut self) -> CResult {
        loop {
            self.emit_ival()?;

            lex::skip_whitespace(&mut self.input);
            match self.input.next() {
                Some(b',') => continue,
                Some(b';') => return Ok(()),
                _          => return Err(self.fatal("expected ',' or ';' in initializer list")),
            }
        }
    }

    /// Reads one `ival`: an identifier, a character literal, or an integer.
    fn emit_ival(&mut self) -> CResult {
        lex::skip_whitespace(&mut self.input);
        match self.input.peek() {
            Some(b'\'') => {
                self.input.next();
                let value = self.read_char_literal()?;
                self.push(&format!(".long {}\n", value));
                Ok(())
            }
            Some(b) if b.is_ascii_alphabetic() => {
                let ident = lex::read_ident(&mut self.input)
                    .expect("peek confirmed an alphabetic byte");
                self.push(&format!(".long {}\n", ident));
                Ok(())
            }
            Some(b) if b.is_ascii_digit() => {
                let value = self.expect_number("expected integer literal in initializer")?;
                self.push(&format!(".long {}\n", value));
                Ok(())
            }
            Some(_) => Err(self.fatal("expected identifier, character literal, or integer in initializer")),
            None    => Err(self.fatal("unexpected end of file in initializer")),
        }
    }

    // -- Function producer (§4.4) --------------------------------------------

    fn emit_function(&mut self, id: &str) -> CResult {
        self.expect_byte(b')', "parameter lists are not supported")?;

        self.push("\n.text\n");
        self.push(&format!(".type {}, @function\n", id));
        self.push(&format!("{}:\n", id));
        self.push("  push %rbp\n");
        self.push("  mov %rsp, %rbp\n");

        self.emit_stmt(id, None)?;

        self.push(&format!(".L.return.{}:\n", id));
        self.push("  mov %rbp, %rsp\n");
        self.push("  pop %rbp\n");
        self.push("  ret\n");
        Ok(())
    }

    // -- Statement producer (§4.6) --------------------------------------------

    fn emit_stmt(&mut self, func: &str, switch: Option<&mut Switch>) -> CResult {
        lex::skip_whitespace(&mut self.input);
        match self.input.next() {
            Some(b'{') => self.emit_block(func, switch),
            Some(b';') => Ok(()),
            Some(b) if b.is_ascii_alphabetic() => {
                self.input.unget();
                let ident = lex::read_ident(&mut self.input)
                    .expect("checked an alphabetic byte");
                self.emit_keyword_or_label(func, switch, ident)
            }
            Some(_) => Err(self.fatal("expected statement")),
            None    => Err(self.fatal("unexpected end of file, expected statement")),
        }
    }

    fn emit_block(&mut self, func: &str, mut switch: Option<&mut Switch>) -> CResult {
        loop {
            lex::skip_whitespace(&mut self.input);
            match self.input.peek() {
                Some(b'}') => { self.input.next(); return Ok(()); }
                None       => return Err(self.fatal("unexpected end of file, expected '}'")),
                _          => self.emit_stmt(func, reborrow(&mut switch))?,
            }
        }
    }

    fn emit_keyword_or_label(
        &mut self,
        func:   &str,
        switch: Option<&mut Switch>,
        ident:  String,
    ) -> CResult {
        match ident.as_str() {
            "goto"   => self.emit_goto(),
            "return" => self.emit_return(func),
            "if"     => self.emit_if(func, switch),
            "while"  => self.emit_while(func, switch),
            "switch" => self.emit_switch(func),
            "case"   => self.emit_case(func, switch),
            _        => self.emit_label(func, switch, &ident),
        }
    }

    fn emit_label(&mut self, func: &str, switch: Option<&mut Switch>, ident: &str) -> CResult {
        lex::skip_whitespace(&mut self.input);
        match self.input.next() {
            Some(b':') => {
                self.push(&format!(".L.label.{}:\n", ident));
                self.emit_stmt(func, switch)
            }
            _ => Err(self.fatal(format!("unexpected identifier '{}'", ident))),
        }
    }

    fn emit_goto(&mut self) -> CResult {
        let label = lex::read_ident(&mut self.input)
            .ok_or_else(|| self.fatal("expected label name after 'goto'"))?;
        self.expect_byte(b';', "expected ';' after goto target")?;
        self.push(&format!("  jmp .L.label.{}\n", label));
        Ok(())
    }

    fn emit_return(&mut self, func: &str) -> CResult {
        lex::skip_whitespace(&mut self.input);
        match self.input.next() {
            Some(b';') => {}
            Some(b'(') => {
                self.emit_expr("%rax")?;
                self.expect_byte(b')', "expected ')' after return expression")?;
                self.expect_byte(b';', "expected ';' after return statement")?;
            }
            _ => return Err(self.fatal("expected ';' or '(' after 'return'")),
        }
        self.push(&format!("  jmp .L.return.{}\n", func));
        Ok(())
    }

    fn emit_if(&mut self, func: &str, mut switch: Option<&mut Switch>) -> CResult {
        let id = self.alloc_id();

        self.expect_byte(b'(', "expected '(' after 'if'")?;
        self.emit_expr("%rax")?;
        self.expect_byte(b')', "expected ')' after if condition")?;

        self.push("  cmp $0, %rax\n");
        self.push(&format!("  je .L.else.{}\n", id));
        self.emit_stmt(func, reborrow(&mut switch))?;
        self.push(&format!("  jmp .L.end.{}\n", id));
        self.push(&format!(".L.else.{}:\n", id));

        if self.match_else()? {
            self.emit_stmt(func, reborrow(&mut switch))?;
        }
        self.push(&format!(".L.end.{}:\n", id));
        Ok(())
    }

    /// Attempts to match the literal byte sequence `else` followed by a
    /// non-alphanumeric byte. On a mismatch, every byte read here is pushed
    /// back so the next statement or declaration sees an unconsumed input.
    fn match_else(&mut self) -> CResult<bool> {
        lex::skip_whitespace(&mut self.input);

        let mut read = [0u8; 5];
        let mut n = 0;
        for slot in read.iter_mut() {
            match self.input.next() {
                Some(b) => { *slot = b; n += 1; }
                None    => break,
            }
        }

        let is_else = n == 5 && &read[0..4] == b"else" && !read[4].is_ascii_alphanumeric();

        if is_else {
            // The fifth byte belongs to whatever follows "else".
            self.input.unget();
            Ok(true)
        } else {
            for _ in 0..n {
                self.input.unget();
            }
            Ok(false)
        }
    }

    fn emit_while(&mut self, func: &str, mut switch: Option<&mut Switch>) -> CResult {
        let id = self.alloc_id();

        self.push(&format!(".L.start.{}:\n", id));
        self.expect_byte(b'(', "expected '(' after 'while'")?;
        self.emit_expr("%rax")?;
        self.expect_byte(b')', "expected ')' after while condition")?;

        self.push("  cmp $0, %rax\n");
        self.push(&format!("  je .L.end.{}\n", id));
        self.emit_stmt(func, reborrow(&mut switch))?;
        self.push(&format!("  jmp .L.start.{}\n", id));
        self.push(&format!(".L.end.{}:\n", id));
        Ok(())
    }

    fn emit_switch(&mut self, func: &str) -> CResult {
        let id = self.alloc_id();

        self.emit_expr("%rax")?;
        self.push(&format!("  jmp .L.cmp.{}\n", id));
        self.push(&format!(".L.stmts.{}:\n", id));

        let mut inner = Switch { id, cases: Vec::new() };
        self.emit_stmt(func, Some(&mut inner))?;

        self.push(&format!("  jmp .L.end.{}\n", id));
        self.push(&format!(".L.cmp.{}:\n", id));
        for value in &inner.cases {
            self.push(&format!("  cmp ${}, %rax\n", value));
            self.push(&format!("  je .L.case.{}.{}\n", id, value));
        }
        self.push(&format!(".L.end.{}:\n", id));
        Ok(())
    }

    fn emit_case(&mut self, func: &str, switch: Option<&mut Switch>) -> CResult {
        let switch = switch
            .ok_or_else(|| self.fatal("unexpected \u{2018}case\u{2019} outside of \u{2018}switch\u{2019} statements"))?;

        lex::skip_whitespace(&mut self.input);
        let value = match self.input.next() {
            Some(b'\'') => self.read_char_literal()?,
            Some(b) if b.is_ascii_digit() => {
                self.input.unget();
                self.expect_number("expected integer or character literal after 'case'")?
            }
            _ => return Err(self.fatal("expected integer or character literal after 'case'")),
        };
        self.expect_byte(b':', "expected ':' after case constant")?;

        switch.cases.push(value);
        self.push(&format!(".L.case.{}.{}:\n", switch.id, value));

        self.emit_stmt(func, Some(switch))
    }

    // -- Expression producer (§4.5) --------------------------------------------

    fn emit_expr(&mut self, reg: &str) -> CResult {
        lex::skip_whitespace(&mut self.input);
        let value = match self.input.next() {
            Some(b'\'') => self.read_char_literal()?,
            Some(b) if b.is_ascii_digit() => {
                self.input.unget();
                self.expect_number("expected integer or character literal")?
            }
            Some(_) => return Err(self.fatal("expected integer or character literal")),
            None    => return Err(self.fatal("unexpected end of file, expected expression")),
        };

        if value == 0 {
            self.push(&format!("  xor {0}, {0}\n", reg));
        } else {
            self.push(&format!("  mov ${}, {}\n", value, reg));
        }
        Ok(())
    }

    // -- Shared helpers --------------------------------------------------------

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn expect_byte(&mut self, byte: u8, msg: &str) -> CResult {
        lex::skip_whitespace(&mut self.input);
        match self.input.next() {
            Some(b) if b == byte => Ok(()),
            _                    => Err(self.fatal(msg)),
        }
    }

    fn expect_number(&mut self, msg: &str) -> CResult<u64> {
        match lex::read_number(&mut self.input) {
            Number::Value(v) => Ok(v),
            Number::Eof      => Err(self.fatal(msg)),
        }
    }

    fn read_char_literal(&mut self) -> CResult<u64> {
        lex::read_char_literal(&mut self.input, WORD_SIZE).map_err(|e| self.fatal(e))
    }

    fn fatal(&self, msg: impl Display) -> Fatal {
        message::report(FileFatal(self.path, msg));
        Fatal
    }
}

/// Reborrows an `Option<&mut T>` for a single recursive call, so the caller's
/// `Option<&mut Switch>` can be threaded through a loop without being moved
/// away on the first iteration.
fn reborrow<'a>(switch: &'a mut Option<&mut Switch>) -> Option<&'a mut Switch> {
    switch.as_mut().map(|s| &mut **s)
}
