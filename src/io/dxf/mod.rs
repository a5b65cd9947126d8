//! DXF (Drawing Exchange Format) reading and writing

pub mod code_page;
mod reader;
mod writer;

pub use reader::{
    split_records, DxfBinaryReader, DxfCodePair, DxfDocument, DxfReader, DxfReaderConfiguration,
    DxfStreamReader, DxfTextReader, EntityLoader, TagReader,
};
pub use writer::{
    format_double, tags_to_text, DxfBinaryWriter, DxfStreamWriter, DxfStreamWriterExt,
    DxfTextWriter, DxfWriter, TagCollector, BINARY_DXF_SENTINEL,
};

use crate::error::Result;
use crate::tags::Tags;

/// Compiled tags of an ASCII DXF fragment, up to `0 EOF` or the end of input
pub fn tags_from_text(text: &str) -> Result<Tags> {
    TagReader::new(DxfTextReader::new(text.as_bytes())).collect()
}
