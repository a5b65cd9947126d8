//! DXF file reader

mod binary_reader;
mod stream_reader;
mod tag_reader;
mod text_reader;

pub use binary_reader::DxfBinaryReader;
pub use stream_reader::{DxfCodePair, DxfStreamReader};
pub use tag_reader::{split_records, TagReader};
pub use text_reader::DxfTextReader;

use crate::database::EntityDb;
use crate::entities::{DxfEntity, EntityFactory};
use crate::error::Result;
use crate::io::dxf::code_page::encoding_from_code_page;
use crate::io::dxf::writer::BINARY_DXF_SENTINEL;
use crate::notification::{NotificationCollection, NotificationType};
use crate::schema::SchemaRegistry;
use crate::tags::Tag;
use crate::types::DxfVersion;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Configuration for the DXF reader.
#[derive(Debug, Clone)]
pub struct DxfReaderConfiguration {
    /// When `true`, malformed tags and invalid entity records abort the read.
    /// Otherwise the record is skipped and a notification is recorded.
    ///
    /// Default: `false`
    pub strict: bool,
    /// Version used when the HEADER declares no `$ACADVER`
    pub default_version: DxfVersion,
    /// Build entities on the rayon thread pool
    pub parallel: bool,
}

impl Default for DxfReaderConfiguration {
    fn default() -> Self {
        Self {
            strict: false,
            default_version: DxfVersion::AC1032,
            parallel: false,
        }
    }
}

/// Result of reading a DXF file
#[derive(Debug, Clone)]
pub struct DxfDocument {
    pub version: DxfVersion,
    pub entities: EntityDb,
    pub notifications: NotificationCollection,
}

/// DXF file reader
pub struct DxfReader<'r> {
    tags: TagReader<Box<dyn DxfStreamReader>>,
    config: DxfReaderConfiguration,
    registry: &'r SchemaRegistry,
}

impl DxfReader<'static> {
    /// Create a new DXF reader from any reader, text or binary
    pub fn from_reader<R: Read + 'static>(reader: R) -> Result<Self> {
        let mut buf_reader = BufReader::new(reader);
        let is_binary = buf_reader.fill_buf()?.starts_with(BINARY_DXF_SENTINEL);

        let stream: Box<dyn DxfStreamReader> = if is_binary {
            Box::new(DxfBinaryReader::new(buf_reader)?)
        } else {
            Box::new(DxfTextReader::new(buf_reader))
        };

        Ok(Self {
            tags: TagReader::new(stream),
            config: DxfReaderConfiguration::default(),
            registry: SchemaRegistry::builtin(),
        })
    }

    /// Create a new DXF reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }
}

impl<'r> DxfReader<'r> {
    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Build entities against another schema registry
    pub fn with_registry<'a>(self, registry: &'a SchemaRegistry) -> DxfReader<'a> {
        DxfReader {
            tags: self.tags,
            config: self.config,
            registry,
        }
    }

    /// Read HEADER and ENTITIES in one pass and build the entities
    pub fn read(mut self) -> Result<DxfDocument> {
        let mut notifications = NotificationCollection::new();
        let mut version = None;
        let mut records = Vec::new();

        while let Some(tag) = self.next_tag(&mut notifications)? {
            if !tag.is(0, "SECTION") {
                continue;
            }
            let name = match self.next_tag(&mut notifications)? {
                Some(t) if t.code() == 2 => t.value().as_str().unwrap_or_default().to_string(),
                Some(t) => {
                    notifications.notify(
                        NotificationType::Warning,
                        format!("section without name, found {}", t),
                    );
                    continue;
                }
                None => break,
            };
            match name.as_str() {
                "HEADER" => version = self.read_header(&mut notifications)?,
                "ENTITIES" => records.extend(self.read_entity_records(&mut notifications)?),
                _ => {
                    notifications.notify(
                        NotificationType::NotImplemented,
                        format!("{} section skipped", name),
                    );
                    self.skip_section(&mut notifications)?;
                }
            }
        }

        let version = version.unwrap_or(self.config.default_version);
        tracing::debug!(version = %version, records = records.len(), "loading entities");
        let factory = EntityFactory::new(self.registry, version).strict(self.config.strict);
        let entities = EntityLoader::new(factory)
            .parallel(self.config.parallel)
            .load(records, &mut notifications)?;

        let mut db = EntityDb::new();
        for entity in entities {
            db.add(entity, &mut notifications)?;
        }

        Ok(DxfDocument {
            version,
            entities: db,
            notifications,
        })
    }

    /// Next tag; malformed tags are skipped with a notification unless strict
    fn next_tag(&mut self, notifications: &mut NotificationCollection) -> Result<Option<Tag>> {
        for item in self.tags.by_ref() {
            match item {
                Ok(tag) => return Ok(Some(tag)),
                Err(e) if self.config.strict => return Err(e),
                Err(e) => notifications.recovered(&e),
            }
        }
        Ok(None)
    }

    /// Scan the HEADER for `$ACADVER` and `$DWGCODEPAGE`.
    ///
    /// Files older than AC1021 decode non UTF-8 strings with the declared
    /// code page from here on.
    fn read_header(&mut self, notifications: &mut NotificationCollection) -> Result<Option<DxfVersion>> {
        let mut version = None;
        let mut code_page = None;
        let mut variable: Option<String> = None;

        while let Some(tag) = self.next_tag(notifications)? {
            match tag.code() {
                0 => break,
                9 => variable = tag.value().as_str().map(str::to_string),
                code => match (variable.as_deref(), code, tag.value().as_str()) {
                    (Some("$ACADVER"), 1, Some(s)) => {
                        version = DxfVersion::from_version_string(s);
                        if version.is_none() {
                            notifications.notify(
                                NotificationType::Warning,
                                format!("unknown DXF version {}", s),
                            );
                        }
                    }
                    (Some("$DWGCODEPAGE"), 3, Some(s)) => code_page = Some(s.to_string()),
                    _ => {}
                },
            }
        }

        let effective = version.unwrap_or(self.config.default_version);
        if effective < DxfVersion::AC1021 {
            if let Some(encoding) = code_page.as_deref().and_then(encoding_from_code_page) {
                tracing::debug!(encoding = encoding.name(), "using code page");
                self.tags.stream_mut().set_encoding(encoding);
            }
        }
        Ok(version)
    }

    /// Collect the records of the ENTITIES section.
    ///
    /// A malformed tag drops the rest of its record in tolerant mode.
    fn read_entity_records(&mut self, notifications: &mut NotificationCollection) -> Result<Vec<Vec<Tag>>> {
        let mut records = Vec::new();
        let mut current: Option<Vec<Tag>> = None;

        while let Some(item) = self.tags.next() {
            match item {
                Ok(tag) if tag.is_structure() => {
                    records.extend(current.take());
                    if tag.is(0, "ENDSEC") {
                        return Ok(records);
                    }
                    current = Some(vec![tag]);
                }
                Ok(tag) => {
                    if let Some(record) = current.as_mut() {
                        record.push(tag);
                    }
                }
                Err(e) if self.config.strict => return Err(e),
                Err(e) => {
                    let dxftype = current
                        .take()
                        .and_then(|r| r.first().and_then(|t| t.value().as_str().map(str::to_string)))
                        .unwrap_or_default();
                    notifications.notify(
                        NotificationType::Error,
                        format!("{}, {} record skipped", e, dxftype),
                    );
                }
            }
        }
        records.extend(current.take());
        Ok(records)
    }

    /// Skip the current section
    fn skip_section(&mut self, notifications: &mut NotificationCollection) -> Result<()> {
        while let Some(tag) = self.next_tag(notifications)? {
            if tag.is(0, "ENDSEC") {
                break;
            }
        }
        Ok(())
    }
}

/// Builds entities from split records, sequentially or on the rayon pool.
///
/// Each record gets its own notification collection; they are merged in
/// record order afterwards.
#[derive(Debug, Clone, Copy)]
pub struct EntityLoader<'a> {
    factory: EntityFactory<'a>,
    parallel: bool,
}

impl<'a> EntityLoader<'a> {
    pub fn new(factory: EntityFactory<'a>) -> Self {
        Self {
            factory,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build one entity per record.
    ///
    /// Invalid records are skipped with a notification, strict factories
    /// fail on the first one.
    pub fn load(&self, records: Vec<Vec<Tag>>, notifications: &mut NotificationCollection) -> Result<Vec<DxfEntity>> {
        let results: Vec<(Result<DxfEntity>, NotificationCollection)> = if self.parallel {
            records.into_par_iter().map(|r| self.load_record(r)).collect()
        } else {
            records.into_iter().map(|r| self.load_record(r)).collect()
        };

        let mut entities = Vec::with_capacity(results.len());
        for (result, record_notifications) in results {
            notifications.append(record_notifications);
            match result {
                Ok(entity) => entities.push(entity),
                Err(e) if !self.factory.is_strict() => notifications.recovered(&e),
                Err(e) => return Err(e),
            }
        }
        Ok(entities)
    }

    fn load_record(&self, record: Vec<Tag>) -> (Result<DxfEntity>, NotificationCollection) {
        let mut notifications = NotificationCollection::new();
        let result = self.factory.load_tags_record(record, &mut notifications);
        (result, notifications)
    }
}
