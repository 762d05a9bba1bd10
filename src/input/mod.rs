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

//! Input stack (§4.C): a LIFO of heterogeneous input sources presenting a
//! single byte-at-a-time stream, with file/line tracking that survives
//! pushes and pops.

pub mod source;

use std::io;

use crate::mem::name::{Name, NameTable};
use self::source::{BuiltinRef, ByteStream, FileSource, InputSource, StringSource};

/// Result of a `peek` or `advance` on the input stack.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Peeked {
    Byte(u8),
    Eof,
}

/// LIFO of input sources, plus the wrapup stack it may be promoted from.
pub struct InputStack {
    main:   Vec<InputSource>,
    wrapup: Vec<InputSource>,

    names: NameTable,

    current_file: Name,
    current_line: u32,
    output_line:  u32,
    newline_pending: bool,

    /// Single outstanding `push_string_begin` builder, per §9's
    /// "no reentrant push_string" rule.
    pending_string: Option<Vec<u8>>,

    /// `(name, line)` of the most recently popped file source, so a
    /// line-skipping consumer that crosses a file boundary mid-skip can
    /// still attribute a diagnostic to the file it was skipping in,
    /// rather than the includer it resumed into (the `skip_line`
    /// file-boundary case from the original `src/input.c`).
    last_popped_file: Option<(Name, u32)>,
}

impl InputStack {
    /// Creates an empty input stack. `current_file` starts out as the empty
    /// interned name, matching "no source active".
    pub fn new() -> Self {
        let mut names = NameTable::new();
        let empty = names.intern_str("");
        Self {
            main:   Vec::new(),
            wrapup: Vec::new(),
            names,
            current_file: empty,
            current_line: 0,
            output_line:  0,
            newline_pending: false,
            pending_string: None,
            last_popped_file: None,
        }
    }

    /// Interns `path` in the stack's name arena. Names survive the pop of
    /// any individual source, per §4.C's "End-of-stack protocol".
    pub fn intern(&mut self, path: &str) -> Name {
        self.names.intern_str(path)
    }

    /// Returns the string value of an interned name.
    pub fn name_str(&self, name: Name) -> &str {
        self.names.get(name)
    }

    /// Current `(file, line)`, reflecting the byte most recently delivered
    /// by `advance`.
    pub fn location(&self) -> (Name, u32) {
        (self.current_file, self.current_line)
    }

    // --- pushes ---------------------------------------------------------

    /// Pushes an open file. `owns_close` marks whether popping it should
    /// close the underlying stream.
    pub fn push_file(&mut self, stream: Box<dyn ByteStream>, name: Name, owns_close: bool) {
        self.abort_pending_string();
        let saved = (self.current_file, self.current_line, self.output_line, self.newline_pending);
        self.main.push(InputSource::File(FileSource::new(stream, name, owns_close, saved)));
    }

    /// Pushes a synthetic macro-function marker.
    pub fn push_macro_marker(&mut self, builtin: BuiltinRef) {
        self.abort_pending_string();
        self.main.push(InputSource::Macro(source::MacroMarker { builtin }));
    }

    /// Begins an incrementally-built string source. Only one builder may be
    /// outstanding at a time; starting another aborts and discards the first.
    pub fn push_string_begin(&mut self) {
        self.abort_pending_string();
        self.pending_string = Some(Vec::new());
    }

    /// Appends bytes to the outstanding builder.
    ///
    /// # Panics
    ///
    /// Panics if no builder is outstanding (programmer error, per §9).
    pub fn push_string_append(&mut self, bytes: &[u8]) {
        match &mut self.pending_string {
            Some(buf) => buf.extend_from_slice(bytes),
            None => panic!("push_string_append called with no outstanding builder"),
        }
    }

    /// Commits the outstanding builder, pushing it as a string source unless
    /// it is empty, in which case it is silently discarded.
    pub fn push_string_end(&mut self) {
        if let Some(buf) = self.pending_string.take() {
            if !buf.is_empty() {
                self.main.push(InputSource::Str(StringSource::new(buf)));
            }
        }
    }

    /// Pushes wrapup text, to be scanned only after the main stack drains.
    pub fn push_wrapup(&mut self, bytes: Vec<u8>) {
        if bytes.is_empty() {
            return;
        }
        let origin = (self.current_file, self.current_line);
        self.wrapup.push(InputSource::Str(StringSource::wrapup(bytes, origin)));
    }

    fn abort_pending_string(&mut self) {
        // Starting another push while a builder is outstanding discards it;
        // this is the documented "abort on reentry" behavior, not an error.
        self.pending_string = None;
    }

    // --- reads ------------------------------------------------------------

    /// If the top of the stack is a macro marker, consumes and returns its
    /// builtin reference without touching the byte stream.
    pub fn take_macro(&mut self) -> Option<BuiltinRef> {
        if matches!(self.main.last(), Some(s) if s.is_macro()) {
            match self.main.pop() {
                Some(InputSource::Macro(m)) => Some(m.builtin),
                _ => unreachable!(),
            }
        } else {
            None
        }
    }

    /// Reports the next byte without consuming it.
    pub fn peek(&mut self) -> Peeked {
        self.ensure_byte_source();
        match self.main.last() {
            None => Peeked::Eof,
            Some(InputSource::Str(s)) => s.peek().map_or(Peeked::Eof, Peeked::Byte),
            Some(InputSource::File(_)) => {
                // Files are read one byte ahead internally by `ensure_byte_source`,
                // which converts any readable file byte into a one-byte string
                // source on top, so reaching here means EOF was hit this call.
                Peeked::Eof
            }
            Some(InputSource::Macro(_)) => Peeked::Eof,
        }
    }

    /// Consumes and returns the next byte.
    pub fn advance(&mut self) -> Peeked {
        loop {
            self.ensure_byte_source();

            match self.main.last_mut() {
                None => return Peeked::Eof,
                Some(InputSource::Macro(_)) => return Peeked::Eof,
                Some(InputSource::Str(s)) => {
                    let (byte, origin) = s.advance();
                    match byte {
                        None => {
                            self.main.pop();
                            continue;
                        }
                        Some(b) => {
                            if let Some((file, line)) = origin {
                                self.current_file = file;
                                self.current_line = line;
                            }
                            self.record_advance(b);
                            return Peeked::Byte(b);
                        }
                    }
                }
                Some(InputSource::File(_)) => {
                    // Unreachable in practice: ensure_byte_source never
                    // returns with a File on top (it either produces a Str
                    // or pops the File and keeps looking). Loop rather than
                    // report Eof, in case that invariant is ever broken.
                    continue;
                }
            }
        }
    }

    /// Updates `(current_file, current_line)` for a byte just delivered.
    /// A newline defers its increment to the *next* advance (§4.C).
    fn record_advance(&mut self, byte: u8) {
        if self.newline_pending {
            self.current_line += 1;
            self.newline_pending = false;
        }
        if byte == b'\n' {
            self.newline_pending = true;
        }
    }

    /// Pulls bytes from a top-of-stack `FileSource` one at a time, turning
    /// each into a single-byte string source so that `peek`/`advance` have a
    /// uniform view. Performs the FILE_INIT → FILE name/line swap on the
    /// first successful read and pops (with a swap-back) on EOF or error.
    /// Also drops an exhausted one-byte `Str` left on top by a prior call,
    /// so the `FileSource` beneath it becomes reachable again.
    fn ensure_byte_source(&mut self) {
        loop {
            if matches!(self.main.last(), Some(InputSource::Str(s)) if s.is_exhausted()) {
                self.main.pop();
                continue;
            }

            if !matches!(self.main.last(), Some(InputSource::File(_))) {
                return;
            }

            let byte = match self.main.last_mut() {
                Some(InputSource::File(f)) => f.read_byte(),
                _ => unreachable!(),
            };

            match byte {
                Ok(Some(b)) => {
                    if let Some(InputSource::File(f)) = self.main.last_mut() {
                        if !f.active {
                            f.active = true;
                            self.current_file = f.name;
                            self.current_line = 1;
                        }
                    }
                    self.main.push(InputSource::Str(StringSource::new(vec![b])));
                    return;
                }
                Ok(None) => {
                    self.pop_file();
                }
                Err(_) => {
                    // Recoverable I/O error: pop the source. The caller (the
                    // ambient diagnostics layer) is expected to have logged
                    // a warning before or while driving this read.
                    self.pop_file();
                }
            }
        }
    }

    fn pop_file(&mut self) {
        if let Some(InputSource::File(f)) = self.main.pop() {
            self.last_popped_file = Some((self.current_file, self.current_line));
            let (file, line, output_line, newline_pending) = f.saved;
            self.current_file = file;
            self.current_line = line;
            self.output_line  = output_line;
            self.newline_pending = newline_pending;
            // `owns_close` is honored by `f`'s Drop (the boxed stream is
            // released here); no separate close step is needed in Rust.
            let _ = f.owns_close;
        }
    }

    /// `(name, line)` of the file most recently popped by EOF or read
    /// error, if any. A line-skipping consumer that crosses a file
    /// boundary mid-skip can call this right after observing `Eof` to
    /// attribute a diagnostic to the file being skipped, instead of the
    /// includer `location()` now reports.
    pub fn last_popped_file(&self) -> Option<(Name, u32)> {
        self.last_popped_file
    }

    // --- wrapup -------------------------------------------------------------

    /// Promotes the wrapup stack into the main stack's place, installing a
    /// fresh empty wrapup stack so wrapup text may register more wrapup.
    /// Returns `false` (and releases the stacks) if there was no wrapup.
    pub fn pop_wrapup(&mut self) -> bool {
        self.main.clear();
        self.pending_string = None;

        if self.wrapup.is_empty() {
            return false;
        }

        std::mem::swap(&mut self.main, &mut self.wrapup);
        self.wrapup = Vec::new();
        true
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }
}

impl Default for InputStack {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn stream(bytes: &'static [u8]) -> Box<dyn ByteStream> {
        Box::new(BufReader::new(Cursor::new(bytes)))
    }

    #[test]
    fn string_push_and_drain() {
        let mut stack = InputStack::new();
        stack.push_string_begin();
        stack.push_string_append(b"ab");
        stack.push_string_append(b"c");
        stack.push_string_end();

        assert_eq!(stack.advance(), Peeked::Byte(b'a'));
        assert_eq!(stack.advance(), Peeked::Byte(b'b'));
        assert_eq!(stack.advance(), Peeked::Byte(b'c'));
        assert_eq!(stack.advance(), Peeked::Eof);
        assert_eq!(stack.advance(), Peeked::Eof);
    }

    #[test]
    fn empty_builder_is_discarded() {
        let mut stack = InputStack::new();
        stack.push_string_begin();
        stack.push_string_end();
        assert!(stack.is_empty());
        assert_eq!(stack.advance(), Peeked::Eof);
    }

    #[test]
    fn peek_then_advance_agree() {
        let mut stack = InputStack::new();
        stack.push_string_begin();
        stack.push_string_append(b"x");
        stack.push_string_end();

        assert_eq!(stack.peek(), Peeked::Byte(b'x'));
        assert_eq!(stack.peek(), Peeked::Byte(b'x'));
        assert_eq!(stack.advance(), Peeked::Byte(b'x'));
    }

    #[test]
    fn lifo_order_across_two_pushes() {
        let mut stack = InputStack::new();
        stack.push_string_begin();
        stack.push_string_append(b"first");
        stack.push_string_end();

        // Pushing a second string (e.g. a rescanned macro expansion) puts it
        // on top; its bytes must be fully drained before "first" resumes.
        stack.push_string_begin();
        stack.push_string_append(b"second");
        stack.push_string_end();

        let mut seen = Vec::new();
        loop {
            match stack.advance() {
                Peeked::Byte(b) => seen.push(b),
                Peeked::Eof => break,
            }
        }
        assert_eq!(seen, b"secondfirst");
    }

    #[test]
    fn file_line_tracking() {
        let mut stack = InputStack::new();
        let name = stack.intern("t.m4");
        stack.push_file(stream(b"a\nb\n"), name, true);

        assert_eq!(stack.location().1, 0);
        assert_eq!(stack.advance(), Peeked::Byte(b'a'));
        assert_eq!(stack.location().1, 1);
        assert_eq!(stack.advance(), Peeked::Byte(b'\n'));
        // Newline attributed to the line it ends, not yet incremented.
        assert_eq!(stack.location().1, 1);
        assert_eq!(stack.advance(), Peeked::Byte(b'b'));
        assert_eq!(stack.location().1, 2);
        assert_eq!(stack.advance(), Peeked::Byte(b'\n'));
        assert_eq!(stack.advance(), Peeked::Eof);
    }

    #[test]
    fn wrapup_without_registration_returns_false_forever() {
        let mut stack = InputStack::new();
        assert_eq!(stack.pop_wrapup(), false);
        assert_eq!(stack.advance(), Peeked::Eof);
        assert_eq!(stack.pop_wrapup(), false);
        assert_eq!(stack.advance(), Peeked::Eof);
    }

    #[test]
    fn wrapup_promotion_delivers_wrapup_text() {
        let mut stack = InputStack::new();
        stack.push_wrapup(b"later".to_vec());
        assert_eq!(stack.advance(), Peeked::Eof);
        assert_eq!(stack.pop_wrapup(), true);
        assert_eq!(stack.advance(), Peeked::Byte(b'l'));
    }

    #[test]
    fn last_popped_file_survives_the_pop_for_diagnostics() {
        let mut stack = InputStack::new();
        let name = stack.intern("skipped.m4");
        stack.push_file(stream(b"x"), name, true);
        assert_eq!(stack.advance(), Peeked::Byte(b'x'));
        assert_eq!(stack.last_popped_file(), None);
        assert_eq!(stack.advance(), Peeked::Eof);
        let (popped_name, _) = stack.last_popped_file().expect("file should have popped");
        assert_eq!(popped_name, name);
    }

    #[test]
    fn pending_string_builder_aborts_on_reentry() {
        let mut stack = InputStack::new();
        stack.push_string_begin();
        stack.push_string_append(b"abandoned");
        // A second push before `_end` discards the first builder's bytes.
        stack.push_string_begin();
        stack.push_string_append(b"kept");
        stack.push_string_end();

        let mut seen = Vec::new();
        loop {
            match stack.advance() {
                Peeked::Byte(b) => seen.push(b),
                Peeked::Eof => break,
            }
        }
        assert_eq!(seen, b"kept");
    }
}
