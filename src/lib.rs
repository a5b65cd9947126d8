//! # lldxf
//!
//! Low-level DXF layer: turns a DXF tag stream into typed entities and back
//! into a tag stream, without losing what it does not understand.
//!
//! ## Features
//!
//! - ASCII and binary tag readers (R12 one-byte group codes included)
//! - Tag grouping into subclasses, app data, embedded objects and XDATA
//! - Versioned attribute schemas for the common graphical entities
//! - Order preserving export for any DXF version from R12 to R2018
//! - Tolerant loading with a notification log, or strict loading
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lldxf::io::dxf::{DxfReader, DxfWriter};
//!
//! let doc = DxfReader::from_file("sample.dxf")?.read()?;
//! for entity in doc.entities.iter() {
//!     println!("{} {:?}", entity.dxftype(), entity.handle());
//! }
//! for note in &doc.notifications {
//!     println!("{}", note);
//! }
//!
//! let mut notes = lldxf::NotificationCollection::new();
//! DxfWriter::new(doc.version).write_to_file("output.dxf", doc.entities.iter(), &mut notes)?;
//! # Ok::<(), lldxf::error::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`tags`] - the tag model and grouping into [`tags::ExtendedTags`]
//! - [`schema`] - attribute definitions per entity type, shared read-only
//! - [`entities`] - the factory, the attribute namespace and the exporter
//! - [`io`] - stream readers and writers for whole files
//!
//! Problems the library can repair are recorded in a
//! [`NotificationCollection`] and mirrored as `tracing` events.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod database;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod schema;
pub mod tags;
pub mod types;
pub mod xdata;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use types::{DxfVersion, Handle, Vector2, Vector3};

pub use tags::{ExtendedTags, Tag, TagValue, Tags};

pub use schema::{AttributeSpec, EntitySchema, SchemaRegistry, ValueKind};

pub use entities::{
    DxfEntity, DxfNamespace, Entity, EntityFactory, ExportConfiguration, TagExporter,
    UnsupportedEntity,
};

pub use database::{EntityDb, EntityResolver};

// Re-export I/O types
pub use io::dxf::{DxfDocument, DxfReader, DxfReaderConfiguration, DxfWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
