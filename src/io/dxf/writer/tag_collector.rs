//! Stream writer collecting compiled tags in memory

use super::stream_writer::DxfStreamWriter;
use crate::error::Result;
use crate::tags::{Tag, TagValue, Tags};
use crate::types::Handle;

/// Collects written tags instead of serializing them.
///
/// Point tags written through [`DxfStreamWriter::write_tag`] are kept as one
/// compiled tag; coordinates written component-wise stay separate floats.
#[derive(Debug, Clone, Default)]
pub struct TagCollector {
    tags: Tags,
}

impl TagCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn into_tags(self) -> Tags {
        self.tags
    }
}

impl DxfStreamWriter for TagCollector {
    fn write_string(&mut self, code: i32, value: &str) -> Result<()> {
        self.tags.push(Tag::str(code, value));
        Ok(())
    }

    fn write_byte(&mut self, code: i32, value: i16) -> Result<()> {
        self.tags.push(Tag::int(code, value as i64));
        Ok(())
    }

    fn write_i16(&mut self, code: i32, value: i16) -> Result<()> {
        self.tags.push(Tag::int(code, value as i64));
        Ok(())
    }

    fn write_i32(&mut self, code: i32, value: i32) -> Result<()> {
        self.tags.push(Tag::int(code, value as i64));
        Ok(())
    }

    fn write_i64(&mut self, code: i32, value: i64) -> Result<()> {
        self.tags.push(Tag::int(code, value));
        Ok(())
    }

    fn write_double(&mut self, code: i32, value: f64) -> Result<()> {
        self.tags.push(Tag::float(code, value));
        Ok(())
    }

    fn write_bool(&mut self, code: i32, value: bool) -> Result<()> {
        self.tags.push(Tag::int(code, value as i64));
        Ok(())
    }

    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()> {
        self.tags.push(Tag::str(code, handle.to_hex()));
        Ok(())
    }

    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()> {
        self.tags.push(Tag::new(code, TagValue::Binary(data.to_vec())));
        Ok(())
    }

    fn write_tag(&mut self, tag: &Tag) -> Result<()> {
        self.tags.push(tag.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
