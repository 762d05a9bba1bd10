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

//! Mutable syntax configuration consulted by the lexer and mutated by
//! builtin handlers (§4.F).

use regex::Regex;

const DEFAULT_LQUOTE: &[u8] = b"`";
const DEFAULT_RQUOTE: &[u8] = b"'";
const DEFAULT_BCOMM:  &[u8] = b"#";
const DEFAULT_ECOMM:  &[u8] = b"\n";

pub struct SyntaxConfig {
    lquote: Vec<u8>,
    rquote: Vec<u8>,
    bcomm:  Vec<u8>,
    ecomm:  Vec<u8>,

    word_regex: Option<Regex>,

    /// Populated from `word_regex` whenever it is set; unused in default
    /// word mode, which tests alpha/underscore directly.
    can_start_word: Box<[bool; 256]>,
}

impl SyntaxConfig {
    pub fn lquote(&self) -> &[u8] { &self.lquote }
    pub fn rquote(&self) -> &[u8] { &self.rquote }
    pub fn bcomm(&self)  -> &[u8] { &self.bcomm }
    pub fn ecomm(&self)  -> &[u8] { &self.ecomm }
    pub fn word_regex(&self) -> Option<&Regex> { self.word_regex.as_ref() }

    pub fn quoting_enabled(&self) -> bool { !self.lquote.is_empty() }
    pub fn comment_enabled(&self) -> bool { !self.bcomm.is_empty() }

    pub fn can_start_word(&self, b: u8) -> bool {
        self.can_start_word[b as usize]
    }

    /// `None` for an argument means it was omitted entirely, which resets
    /// *both* delimiters to their defaults; `Some(b"")` disables just that
    /// delimiter, leaving the other as given (§4.F).
    pub fn set_quotes(&mut self, lq: Option<&[u8]>, rq: Option<&[u8]>) {
        match (lq, rq) {
            (None, None) => {
                self.lquote = DEFAULT_LQUOTE.to_vec();
                self.rquote = DEFAULT_RQUOTE.to_vec();
            }
            _ => {
                if let Some(lq) = lq { self.lquote = lq.to_vec(); }
                if let Some(rq) = rq { self.rquote = rq.to_vec(); }
            }
        }
    }

    pub fn set_comment(&mut self, bc: Option<&[u8]>, ec: Option<&[u8]>) {
        match (bc, ec) {
            (None, None) => {
                self.bcomm = DEFAULT_BCOMM.to_vec();
                self.ecomm = DEFAULT_ECOMM.to_vec();
            }
            _ => {
                if let Some(bc) = bc { self.bcomm = bc.to_vec(); }
                if let Some(ec) = ec { self.ecomm = ec.to_vec(); }
            }
        }
    }

    /// `None` or an empty pattern restores the default alpha/underscore
    /// word mode. A pattern that fails to compile is rejected with the
    /// prior pattern left untouched (§7: "bad regex argument to
    /// changeword — retain prior pattern").
    pub fn set_word_regexp(&mut self, pattern: Option<&str>) -> Result<(), regex::Error> {
        match pattern {
            None | Some("") => {
                self.word_regex = None;
                *self.can_start_word = [false; 256];
                Ok(())
            }
            Some(pat) => {
                let re = Regex::new(pat)?;
                let mut table = [false; 256];
                for (b, slot) in table.iter_mut().enumerate() {
                    // Probe the byte padded with filler word characters, so
                    // patterns requiring more than one byte (e.g. a capture
                    // group with a `+`) still register their start byte —
                    // a single raw byte is not enough to decide "could this
                    // ever start a match" for an arbitrary pattern.
                    let mut probe = vec![b as u8];
                    probe.extend_from_slice(b"aaaaaaaa");
                    let text = String::from_utf8_lossy(&probe);
                    *slot = re.find(&text).map_or(false, |m| m.start() == 0);
                }
                self.word_regex = Some(re);
                self.can_start_word = Box::new(table);
                Ok(())
            }
        }
    }
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            lquote: DEFAULT_LQUOTE.to_vec(),
            rquote: DEFAULT_RQUOTE.to_vec(),
            bcomm:  DEFAULT_BCOMM.to_vec(),
            ecomm:  DEFAULT_ECOMM.to_vec(),
            word_regex: None,
            can_start_word: Box::new([false; 256]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_m4() {
        let cfg = SyntaxConfig::default();
        assert_eq!(cfg.lquote(), b"`");
        assert_eq!(cfg.rquote(), b"'");
        assert_eq!(cfg.bcomm(), b"#");
        assert_eq!(cfg.ecomm(), b"\n");
        assert!(cfg.quoting_enabled());
        assert!(cfg.comment_enabled());
    }

    #[test]
    fn omitted_args_reset_to_default() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_quotes(Some(b"[["), Some(b"]]"));
        cfg.set_quotes(None, None);
        assert_eq!(cfg.lquote(), b"`");
        assert_eq!(cfg.rquote(), b"'");
    }

    #[test]
    fn empty_delimiter_disables_recognition() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_comment(Some(b""), Some(b""));
        assert!(!cfg.comment_enabled());
    }

    #[test]
    fn word_regexp_populates_can_start_word_table() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_word_regexp(Some("[A-Z][A-Z0-9]*")).unwrap();
        assert!(cfg.can_start_word(b'A'));
        assert!(!cfg.can_start_word(b'a'));
    }

    #[test]
    fn bad_regex_is_rejected_without_losing_prior_pattern() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_word_regexp(Some("[A-Z]+")).unwrap();
        assert!(cfg.set_word_regexp(Some("[unclosed")).is_err());
        assert!(cfg.word_regex().is_some());
        assert!(cfg.can_start_word(b'A'));
    }

    #[test]
    fn empty_pattern_restores_default_word_mode() {
        let mut cfg = SyntaxConfig::default();
        cfg.set_word_regexp(Some("[A-Z]+")).unwrap();
        cfg.set_word_regexp(None).unwrap();
        assert!(cfg.word_regex().is_none());
    }
}
