//! FASTA sequence reader
//!
//! A FASTA record here is a header line beginning with `>` followed by
//! exactly one residue line (single-line residues only; multi-line FASTA is
//! out of scope). The reader streams `(label, sequence)` pairs in file order
//! and additionally supports index-based skipping for the shared-file
//! partitioning in [`crate::partition`].

use std::io::BufRead;

use memchr::memchr;

use crate::error::{ReaderError, Result};
use crate::record::SequenceRecord;

/// Maximum line length in bytes; exceeding it is a fatal parse error.
pub const MAX_LINE_LENGTH: usize = 2000;

/// Streams `(label, sequence)` records from a FASTA source
///
/// Generic over `BufRead` the way a reader in this ecosystem is generic over
/// its input so tests can drive it over an in-memory `Cursor` as easily as a
/// file.
pub struct FastaReader<R: BufRead> {
    inner: R,
    /// Next index to be returned by `next()` — the monotone read cursor.
    curr: usize,
    line_buf: Vec<u8>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            curr: 0,
            line_buf: Vec::with_capacity(MAX_LINE_LENGTH),
        }
    }

    /// Resets the read cursor so the same (reopened) source can be read
    /// again from its start. The cursor lives on the reader instance, not
    /// behind a process-global counter, so two passes never interfere.
    pub fn restart(&mut self) {
        self.curr = 0;
    }

    fn read_line_stripped(&mut self) -> Result<Option<Vec<u8>>> {
        self.line_buf.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.line_buf)
            .map_err(|e| ReaderError::Io(self.curr, e))?;
        if n == 0 {
            return Ok(None);
        }
        if self.line_buf.len() > MAX_LINE_LENGTH {
            return Err(ReaderError::LineTooLong(self.curr, MAX_LINE_LENGTH).into());
        }
        while matches!(self.line_buf.last(), Some(b'\n') | Some(b'\r')) {
            self.line_buf.pop();
        }
        Ok(Some(std::mem::take(&mut self.line_buf)))
    }

    /// Parses the label out of a header line: the first whitespace-delimited
    /// token after `>`. Any remainder of the line, including a second token,
    /// is discarded.
    fn parse_label(header: &[u8], record_idx: usize) -> Result<Vec<u8>> {
        let rest = &header[1..];
        let end = memchr(b' ', rest)
            .or_else(|| memchr(b'\t', rest))
            .unwrap_or(rest.len());
        let label = &rest[..end];
        if label.is_empty() {
            return Err(ReaderError::UnparseableHeader(record_idx).into());
        }
        Ok(label.to_vec())
    }

    /// Reads and discards the next record without allocating more than the
    /// label/sequence bytes needed to advance `curr`.
    fn skip_one(&mut self) -> Result<bool> {
        Ok(self.next()?.is_some())
    }

    /// Returns the next `(label, sequence)` record, or `None` at end of
    /// stream. Fatal if a header is not followed by a residue line, or the
    /// header has no label token.
    pub fn next(&mut self) -> Result<Option<SequenceRecord>> {
        let header = match self.read_line_stripped()? {
            Some(line) => line,
            None => return Ok(None),
        };
        if header.first() != Some(&b'>') {
            return Err(ReaderError::UnparseableHeader(self.curr).into());
        }
        let label = Self::parse_label(&header, self.curr)?;

        let sequence = match self.read_line_stripped()? {
            Some(line) => line,
            None => return Err(ReaderError::MissingResidueLine(self.curr).into()),
        };

        self.curr += 1;
        Ok(Some(SequenceRecord::new(label, sequence)))
    }

    /// Returns the record at zero-based index `idx` within the current
    /// stream, skipping records with index `< idx`. Returns `None` at end of
    /// stream, or immediately if `idx < curr` (never rewinds).
    pub fn nth(&mut self, idx: usize) -> Result<Option<SequenceRecord>> {
        if idx < self.curr {
            return Ok(None);
        }
        while self.curr < idx {
            if !self.skip_one()? {
                return Ok(None);
            }
        }
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &str) -> FastaReader<Cursor<Vec<u8>>> {
        FastaReader::new(Cursor::new(data.as_bytes().to_vec()))
    }

    #[test]
    fn reads_records_in_order() {
        let mut r = reader(">l1\nAAA\n>l2\nCCC\n");
        let a = r.next().unwrap().unwrap();
        assert_eq!(a.label, b"l1");
        assert_eq!(a.sequence, b"AAA");
        let b = r.next().unwrap().unwrap();
        assert_eq!(b.label, b"l2");
        assert_eq!(b.sequence, b"CCC");
        assert!(r.next().unwrap().is_none());
    }

    #[test]
    fn label_is_first_token_remainder_discarded() {
        let mut r = reader(">l1 description here\nAAA\n");
        let rec = r.next().unwrap().unwrap();
        assert_eq!(rec.label, b"l1");
    }

    #[test]
    fn missing_residue_line_is_fatal() {
        let mut r = reader(">l1\n");
        assert!(r.next().is_err());
    }

    #[test]
    fn header_without_label_is_fatal() {
        let mut r = reader(">\nAAA\n");
        assert!(r.next().is_err());
    }

    #[test]
    fn non_header_first_line_is_fatal() {
        let mut r = reader("AAA\n>l1\nCCC\n");
        assert!(r.next().is_err());
    }

    #[test]
    fn nth_skips_to_index() {
        let mut r = reader(">l0\nAA\n>l1\nCC\n>l2\nGG\n");
        let rec = r.nth(2).unwrap().unwrap();
        assert_eq!(rec.label, b"l2");
    }

    #[test]
    fn nth_never_rewinds() {
        let mut r = reader(">l0\nAA\n>l1\nCC\n>l2\nGG\n");
        r.nth(1).unwrap();
        assert!(r.nth(0).unwrap().is_none());
    }

    #[test]
    fn nth_past_end_returns_none() {
        let mut r = reader(">l0\nAA\n");
        assert!(r.nth(5).unwrap().is_none());
    }

    #[test]
    fn restart_resets_cursor_for_a_second_pass() {
        let mut r = reader(">l0\nAA\n>l1\nCC\n");
        r.next().unwrap();
        r.next().unwrap();
        assert!(r.next().unwrap().is_none());
        r.restart();
        // Cursor position in the underlying reader is unaffected by restart
        // alone — callers reopen the file; here we just assert curr resets.
        assert_eq!(r.curr, 0);
    }

    #[test]
    fn line_too_long_is_fatal() {
        let long_seq = "A".repeat(MAX_LINE_LENGTH + 10);
        let data = format!(">l0\n{}\n", long_seq);
        let mut r = reader(&data);
        assert!(r.next().is_err());
    }
}
