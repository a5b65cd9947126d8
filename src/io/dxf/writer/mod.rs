//! DXF writer module

mod binary_writer;
mod stream_writer;
mod tag_collector;
mod text_writer;

pub use binary_writer::{DxfBinaryWriter, BINARY_DXF_SENTINEL};
pub(crate) use binary_writer::CODE_ESCAPE;
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
pub use tag_collector::TagCollector;
pub use text_writer::{format_double, DxfTextWriter};

use crate::entities::{DxfEntity, ExportConfiguration, TagExporter};
use crate::error::Result;
use crate::notification::NotificationCollection;
use crate::tags::Tags;
use crate::types::DxfVersion;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// DXF file writer for entity lists.
///
/// Writes a HEADER section declaring `$ACADVER`, the ENTITIES section and
/// the closing `EOF`.
#[derive(Debug, Clone, Copy)]
pub struct DxfWriter {
    pub version: DxfVersion,
    /// Whether to write binary DXF format
    pub binary: bool,
    /// Omit optional attributes equal to their default
    pub optional: bool,
    /// Fail on entities which can not be exported instead of skipping them
    pub strict: bool,
}

impl Default for DxfWriter {
    fn default() -> Self {
        Self::new(DxfVersion::default())
    }
}

impl DxfWriter {
    /// Create a new DXF writer for ASCII output
    pub fn new(version: DxfVersion) -> Self {
        Self {
            version,
            binary: false,
            optional: true,
            strict: false,
        }
    }

    /// Create a new DXF writer for binary output
    pub fn new_binary(version: DxfVersion) -> Self {
        Self {
            binary: true,
            ..Self::new(version)
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn exporter(&self) -> TagExporter {
        TagExporter::new(
            ExportConfiguration::new(self.version)
                .optional(self.optional)
                .strict(self.strict),
        )
    }

    /// Write to a file
    pub fn write_to_file<'e, P, I>(
        &self,
        path: P,
        entities: I,
        notifications: &mut NotificationCollection,
    ) -> Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = &'e DxfEntity>,
    {
        let file = File::create(path)?;
        self.write_to_writer(BufWriter::new(file), entities, notifications)
    }

    /// Write to any writer
    pub fn write_to_writer<'e, W, I>(
        &self,
        writer: W,
        entities: I,
        notifications: &mut NotificationCollection,
    ) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'e DxfEntity>,
    {
        if self.binary {
            let mut stream_writer = if self.version.is_r12() {
                DxfBinaryWriter::new_r12(writer)?
            } else {
                DxfBinaryWriter::new(writer)?
            };
            self.write_dxf(&mut stream_writer, entities, notifications)?;
            stream_writer.flush()
        } else {
            let mut stream_writer = DxfTextWriter::new(writer);
            self.write_dxf(&mut stream_writer, entities, notifications)?;
            stream_writer.flush()
        }
    }

    /// Write to a byte vector
    pub fn write_to_vec<'e, I>(&self, entities: I, notifications: &mut NotificationCollection) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = &'e DxfEntity>,
    {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer, entities, notifications)?;
        Ok(buffer)
    }

    /// Write DXF content to a stream writer
    pub fn write_dxf<'e, S, I>(
        &self,
        writer: &mut S,
        entities: I,
        notifications: &mut NotificationCollection,
    ) -> Result<()>
    where
        S: DxfStreamWriter + ?Sized,
        I: IntoIterator<Item = &'e DxfEntity>,
    {
        writer.write_section_start("HEADER")?;
        writer.write_string(9, "$ACADVER")?;
        writer.write_string(1, self.version.as_str())?;
        writer.write_section_end()?;

        writer.write_section_start("ENTITIES")?;
        let exporter = self.exporter();
        for entity in entities {
            match exporter.export(entity, notifications) {
                Ok(tags) => {
                    for tag in &tags {
                        writer.write_tag(tag)?;
                    }
                }
                Err(e) if !self.strict && e.is_recoverable() => notifications.recovered(&e),
                Err(e) => return Err(e),
            }
        }
        writer.write_section_end()?;
        writer.write_eof()
    }
}

/// Serialize tags in the ASCII form
pub fn tags_to_text(tags: &Tags) -> Result<String> {
    let mut writer = DxfTextWriter::new(Vec::new());
    for tag in tags {
        writer.write_tag(tag)?;
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
