//! DXF ASCII text reader

use super::stream_reader::{decode_bytes, DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::tags::TagValue;
use encoding_rs::Encoding;
use std::io::BufRead;

/// DXF ASCII text reader.
///
/// Each pair is a group code line followed by a value line. Line endings
/// `\n` and `\r\n` are both accepted, string values keep their other
/// whitespace. Caret escapes such as `^J` are passed through unchanged.
pub struct DxfTextReader<R: BufRead> {
    reader: R,
    line_number: usize,
    /// Line read ahead while checking for trailing blank lines
    pending: Option<(usize, String)>,
    /// Non-UTF8 fallback encoding. `None` means use Latin-1 (byte-to-char).
    encoding: Option<&'static Encoding>,
}

impl<R: BufRead> DxfTextReader<R> {
    /// Create a new DXF text reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pending: None,
            encoding: None,
        }
    }

    /// Read a single line without its line ending
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.reader.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        self.line_number += 1;
        let mut line = decode_bytes(bytes, self.encoding);
        if self.line_number == 1 && line.starts_with('\u{feff}') {
            line.remove(0);
        }
        Ok(Some(line))
    }

    fn next_code_line(&mut self) -> Result<Option<(usize, String)>> {
        if let Some(pending) = self.pending.take() {
            return Ok(Some(pending));
        }
        Ok(self.read_line()?.map(|line| (self.line_number, line)))
    }

    /// Blank group code line: the end of the stream if only blank lines
    /// follow, otherwise an error.
    fn blank_code_line(&mut self, line: usize) -> Result<Option<DxfCodePair>> {
        while let Some(next) = self.read_line()? {
            if !next.trim().is_empty() {
                self.pending = Some((self.line_number, next));
                return Err(DxfError::malformed(line, "empty group code"));
            }
        }
        Ok(None)
    }
}

impl<R: BufRead> DxfStreamReader for DxfTextReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        let (line, code_line) = match self.next_code_line()? {
            Some(next) => next,
            None => return Ok(None),
        };
        let code_text = code_line.trim();
        if code_text.is_empty() {
            return self.blank_code_line(line);
        }

        let code = code_text.parse::<i32>();
        // the value line belongs to the pair even if the code is invalid
        let value_line = self.read_line()?;
        let code = code.map_err(|_| {
            DxfError::malformed(line, format!("invalid group code '{}'", code_text))
        })?;
        let value_line = value_line.ok_or_else(|| {
            DxfError::malformed(line, format!("missing value of group code {}", code))
        })?;

        let value = TagValue::parse(code, &value_line).ok_or_else(|| {
            DxfError::malformed(
                line + 1,
                format!("invalid value '{}' for group code {}", value_line, code),
            )
        })?;
        Ok(Some(DxfCodePair::new(code, value, line)))
    }

    fn position(&self) -> usize {
        self.line_number
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}
