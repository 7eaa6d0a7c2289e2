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

//! The single-pass translator: lexical primitives, input cursor, and the
//! fused recursive-descent parser / x86-64 emitter.

pub mod emit;
pub mod input;
pub mod lex;

pub use emit::Emitter;

/// Word size of the target, in bytes. Fixed at 8 for x86-64.
pub const WORD_SIZE: usize = 8;

/// Marker type returned in the error case of [`CResult`].
///
/// A [`Fatal`] carries no data of its own; by the time one exists, the
/// diagnostic that explains it has already been reported to stderr. Its only
/// job is to unwind compilation via `?` to the driver.
#[derive(Clone, Copy, Debug)]
pub struct Fatal;

/// Result type returned by fallible compiler methods. `Err(Fatal)` means a
/// diagnostic was already reported and compilation of the current file must
/// stop immediately.
pub type CResult<T = ()> = Result<T, Fatal>;
