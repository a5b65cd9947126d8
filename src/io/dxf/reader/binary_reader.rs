//! Binary DXF reader

use super::stream_reader::{decode_bytes, DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::io::dxf::writer::{BINARY_DXF_SENTINEL, CODE_ESCAPE};
use crate::tags::{GroupCodeValueType, TagValue};
use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::Encoding;
use std::io::{self, BufRead, Read};

/// Binary DXF reader.
///
/// The group code size is detected after the sentinel: R12 files store the
/// first `0` code in one byte, so the following byte is already the `S` of
/// `SECTION`.
pub struct DxfBinaryReader<R: BufRead> {
    reader: R,
    offset: usize,
    short_codes: bool,
    encoding: Option<&'static Encoding>,
}

impl<R: BufRead> DxfBinaryReader<R> {
    /// Create a reader, consumes and checks the sentinel
    pub fn new(mut reader: R) -> Result<Self> {
        let mut sentinel = [0u8; 22];
        reader.read_exact(&mut sentinel).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => DxfError::malformed(0, "missing binary DXF sentinel"),
            _ => DxfError::Io(e),
        })?;
        if &sentinel[..] != BINARY_DXF_SENTINEL {
            return Err(DxfError::malformed(0, "invalid binary DXF sentinel"));
        }
        let short_codes = {
            let head = reader.fill_buf()?;
            head.len() > 1 && head[0] == 0 && head[1] == b'S'
        };
        Ok(Self {
            reader,
            offset: BINARY_DXF_SENTINEL.len(),
            short_codes,
            encoding: None,
        })
    }

    /// True for R12 files with one-byte group codes
    pub fn has_short_codes(&self) -> bool {
        self.short_codes
    }

    fn read_code(&mut self) -> io::Result<Option<i32>> {
        let first = match self.reader.read_u8() {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        self.offset += 1;
        if self.short_codes {
            if first != CODE_ESCAPE {
                return Ok(Some(first as i32));
            }
            let code = self.reader.read_i16::<LittleEndian>()?;
            self.offset += 2;
            return Ok(Some(code as i32));
        }
        let second = self.reader.read_u8()?;
        self.offset += 1;
        Ok(Some(i16::from_le_bytes([first, second]) as i32))
    }

    fn read_string(&mut self) -> io::Result<String> {
        let mut bytes = Vec::new();
        let n = self.reader.read_until(0, &mut bytes)?;
        self.offset += n;
        if bytes.pop() != Some(0) {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(decode_bytes(bytes, self.encoding))
    }

    fn read_value(&mut self, code: i32) -> io::Result<TagValue> {
        let value = match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::Double | GroupCodeValueType::Point => {
                self.offset += 8;
                TagValue::Float(self.reader.read_f64::<LittleEndian>()?)
            }
            GroupCodeValueType::Int16 | GroupCodeValueType::Byte => {
                self.offset += 2;
                TagValue::Int(self.reader.read_i16::<LittleEndian>()? as i64)
            }
            GroupCodeValueType::Int32 => {
                self.offset += 4;
                TagValue::Int(self.reader.read_i32::<LittleEndian>()? as i64)
            }
            GroupCodeValueType::Int64 => {
                self.offset += 8;
                TagValue::Int(self.reader.read_i64::<LittleEndian>()?)
            }
            GroupCodeValueType::Bool => {
                self.offset += 1;
                TagValue::Int(self.reader.read_u8()? as i64)
            }
            GroupCodeValueType::Binary => {
                let len = self.reader.read_u8()? as usize;
                let mut data = vec![0u8; len];
                self.reader.read_exact(&mut data)?;
                self.offset += 1 + len;
                TagValue::Binary(data)
            }
            _ => TagValue::Str(self.read_string()?),
        };
        Ok(value)
    }
}

impl<R: BufRead> DxfStreamReader for DxfBinaryReader<R> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        let position = self.offset;
        let code = match self.read_code() {
            Ok(Some(code)) => code,
            Ok(None) => return Ok(None),
            Err(e) => return Err(truncated(position, e)),
        };
        let value = self.read_value(code).map_err(|e| truncated(position, e))?;
        Ok(Some(DxfCodePair::new(code, value, position)))
    }

    fn position(&self) -> usize {
        self.offset
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = Some(encoding);
    }
}

fn truncated(position: usize, e: io::Error) -> DxfError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            DxfError::malformed(position, "binary DXF truncated inside a tag")
        }
        _ => DxfError::Io(e),
    }
}
