//! DXF stream reader trait and common types

use crate::error::Result;
use crate::tags::TagValue;
use encoding_rs::Encoding;

/// A raw DXF code/value pair, before coordinates are merged into points
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,
    /// Value converted by the value type of the group code
    pub value: TagValue,
    /// Line of the group code in text files, byte offset in binary files
    pub position: usize,
}

impl DxfCodePair {
    pub fn new(code: i32, value: TagValue, position: usize) -> Self {
        Self { code, value, position }
    }

    /// Get value as string
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    /// Get value as double, integers included
    pub fn as_double(&self) -> Option<f64> {
        self.value.as_float()
    }

    /// True for a `0 <name>` pair
    pub fn is_structure(&self, name: &str) -> bool {
        self.code == 0 && self.as_str() == Some(name)
    }
}

/// Trait for reading DXF code/value pairs from a stream.
///
/// Readers make a single forward pass over their source.
pub trait DxfStreamReader {
    /// Read the next code/value pair, `None` at the end of the input.
    ///
    /// A malformed pair is reported as error; reading can continue with the
    /// pair after it.
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Current position, a line number for text and a byte offset for binary input
    fn position(&self) -> usize;

    /// Encoding of non UTF-8 strings, set from `$DWGCODEPAGE`
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

impl<S: DxfStreamReader + ?Sized> DxfStreamReader for Box<S> {
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>> {
        (**self).read_pair()
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        (**self).set_encoding(encoding)
    }
}

/// Decode a string of a pre-2007 file: UTF-8 if valid, else the configured
/// encoding, else Latin-1.
pub(crate) fn decode_bytes(bytes: Vec<u8>, encoding: Option<&'static Encoding>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => {
            let bytes = err.into_bytes();
            match encoding {
                Some(enc) => enc.decode_without_bom_handling(&bytes).0.into_owned(),
                // Latin-1 maps bytes 0-255 to the same code points
                None => bytes.iter().map(|&b| b as char).collect(),
            }
        }
    }
}
