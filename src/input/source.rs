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

//! Input source variants.

use std::io;
use crate::mem::name::Name;

/// An abstract byte stream backing a [`FileSource`]. The core never seeks;
/// callers provide whatever opens a file, a pipe, or any other byte source.
pub trait ByteStream {
    /// Reads one byte, or returns `Ok(None)` at end of stream.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<R: io::Read> ByteStream for io::BufReader<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use io::Read;
        let mut byte = [0u8; 1];
        match self.read(&mut byte) {
            Ok(0)  => Ok(None),
            Ok(_)  => Ok(Some(byte[0])),
            Err(e) => Err(e),
        }
    }
}

// ----------------------------------------------------------------------------

/// Unread text, either the tail of a macro expansion, a wrapup fragment, or a
/// pushed-back fragment of a partially-matched multi-byte delimiter.
pub struct StringSource {
    bytes: Vec<u8>,
    pos:   usize,

    /// Override `(file, line)` that activates exactly when this source first
    /// delivers a byte. Set only for wrapup fragments.
    pub wrapup_origin: Option<(Name, u32)>,

    /// Whether `wrapup_origin` has already been applied.
    activated: bool,
}

impl StringSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, pos: 0, wrapup_origin: None, activated: false }
    }

    pub fn wrapup(bytes: Vec<u8>, origin: (Name, u32)) -> Self {
        Self { bytes, pos: 0, wrapup_origin: Some(origin), activated: false }
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Consumes one byte. Returns the byte and, the first time a byte is
    /// delivered, the wrapup origin to apply (if any).
    pub fn advance(&mut self) -> (Option<u8>, Option<(Name, u32)>) {
        let byte = self.bytes.get(self.pos).copied();
        if byte.is_none() {
            return (None, None);
        }
        self.pos += 1;

        let origin = if !self.activated {
            self.activated = true;
            self.wrapup_origin
        } else {
            None
        };

        (byte, origin)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

// ----------------------------------------------------------------------------

/// An open file (or file-like byte stream) pushed onto the input stack.
pub struct FileSource {
    stream:     Box<dyn ByteStream>,
    pub owns_close: bool,

    /// Name of this source's file, interned in the stack's name arena.
    pub name: Name,

    /// Snapshot of the includer's `(file, line, output_line, newline_pending)`
    /// taken at push time; restored verbatim when this source pops.
    pub saved: (Name, u32, u32, bool),

    /// `false` while at FILE_INIT (never read); `true` once the first byte
    /// has been delivered and the name/line swap has happened.
    pub active: bool,
}

impl FileSource {
    pub fn new(
        stream: Box<dyn ByteStream>,
        name:   Name,
        owns_close: bool,
        saved: (Name, u32, u32, bool),
    ) -> Self {
        Self { stream, owns_close, name, saved, active: false }
    }

    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.stream.read_byte()
    }
}

// ----------------------------------------------------------------------------

/// Opaque reference to a builtin macro function. The expansion driver (§4.E)
/// is an external collaborator; the core only needs to carry this handle
/// across a push/pop without interpreting it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BuiltinRef(pub u32);

/// A synthetic input element standing for a single token; it is consumed
/// (and the source popped) the first time it is observed.
pub struct MacroMarker {
    pub builtin: BuiltinRef,
}

// ----------------------------------------------------------------------------

/// One element of the input stack.
pub enum InputSource {
    Str(StringSource),
    File(FileSource),
    Macro(MacroMarker),
}

impl InputSource {
    #[inline]
    pub fn is_macro(&self) -> bool {
        matches!(self, InputSource::Macro(_))
    }
}
