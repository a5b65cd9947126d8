//! Typed entities built from grouped tags
//!
//! One [`Entity`] type serves every registered DXF type: the type name and
//! the attribute set come from the entity schema, values live in the
//! [`DxfNamespace`]. Entity types without schema are kept as
//! [`UnsupportedEntity`] with their raw tags.

pub mod attrib;
pub mod embedded;
pub mod export;
pub mod factory;
pub mod mtext;
pub mod namespace;

pub use attrib::AttributeFlags;
pub use embedded::EmbeddedObject;
pub use export::{ExportConfiguration, TagExporter};
pub use factory::EntityFactory;
pub use namespace::DxfNamespace;

use indexmap::IndexMap;
use std::sync::Arc;

use crate::error::Result;
use crate::schema::EntitySchema;
use crate::tags::group_code::{HANDLE, OWNER_HANDLE};
use crate::tags::{ExtendedTags, Tag, TagValue, Tags};
use crate::types::Handle;
use crate::xdata::{ExtendedData, ExtendedDataRecord};

/// App data group holding the handles of reactor objects
pub const ACAD_REACTORS: &str = "ACAD_REACTORS";
/// App data group holding the extension dictionary handle
pub const ACAD_XDICTIONARY: &str = "ACAD_XDICTIONARY";

/// One position in a loaded subclass
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Tag stored in the namespace
    Attr(&'static str),
    /// Tag without matching attribute, re-exported verbatim
    Raw(Tag),
    /// App data group by application name
    AppData(String),
}

/// Source order of one loaded subclass
#[derive(Debug, Clone, PartialEq)]
pub struct SubclassLayout {
    /// Subclass marker, `None` for the base group
    pub marker: Option<String>,
    /// Matching subclass of the entity schema, `None` for unknown markers
    pub schema_index: Option<usize>,
    pub slots: Vec<Slot>,
}

/// Entity of a registered DXF type
#[derive(Debug, Clone)]
pub struct Entity {
    dxf: DxfNamespace,
    /// Source layout of loaded entities, `None` for new entities
    pub(crate) layout: Option<Vec<SubclassLayout>>,
    /// Loaded from a record without subclass markers (R12)
    pub(crate) flat: bool,
    pub appdata: IndexMap<String, Tags>,
    pub xdata: IndexMap<String, Tags>,
    pub embedded: Option<EmbeddedObject>,
}

impl Entity {
    /// New entity without any explicit attribute
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        Self {
            dxf: DxfNamespace::new(schema),
            layout: None,
            flat: false,
            appdata: IndexMap::new(),
            xdata: IndexMap::new(),
            embedded: None,
        }
    }

    pub(crate) fn loaded(dxf: DxfNamespace, layout: Vec<SubclassLayout>, flat: bool) -> Self {
        Self {
            dxf,
            layout: Some(layout),
            flat,
            appdata: IndexMap::new(),
            xdata: IndexMap::new(),
            embedded: None,
        }
    }

    pub fn dxftype(&self) -> &str {
        self.dxf.dxftype()
    }

    /// Attribute namespace
    pub fn dxf(&self) -> &DxfNamespace {
        &self.dxf
    }

    pub fn dxf_mut(&mut self) -> &mut DxfNamespace {
        &mut self.dxf
    }

    pub fn handle(&self) -> Option<Handle> {
        self.dxf.get_handle("handle").ok()
    }

    pub fn set_handle(&mut self, handle: Handle) -> Result<()> {
        self.dxf.set("handle", handle.to_hex())
    }

    pub fn owner(&self) -> Option<Handle> {
        self.dxf.get_handle("owner").ok()
    }

    pub fn layout(&self) -> Option<&[SubclassLayout]> {
        self.layout.as_deref()
    }

    /// Loaded from an R12 record without subclass markers
    pub fn is_flat(&self) -> bool {
        self.flat
    }

    /// Handles of the `ACAD_REACTORS` app data group
    pub fn reactors(&self) -> Vec<Handle> {
        self.appdata
            .get(ACAD_REACTORS)
            .map(|tags| {
                tags.find_all(OWNER_HANDLE)
                    .filter_map(|t| t.value().as_handle())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Extension dictionary handle of the `ACAD_XDICTIONARY` app data group
    pub fn xdict(&self) -> Option<Handle> {
        self.appdata
            .get(ACAD_XDICTIONARY)
            .and_then(|tags| tags.find_first(360))
            .and_then(|t| t.value().as_handle())
    }

    /// Tags without matching attribute, in source order
    pub fn unknown_tags(&self) -> Vec<&Tag> {
        self.layout
            .iter()
            .flatten()
            .flat_map(|s| s.slots.iter())
            .filter_map(|slot| match slot {
                Slot::Raw(tag) => Some(tag),
                _ => None,
            })
            .collect()
    }

    /// Typed view of the XDATA group of `appid`
    pub fn xdata_record(&self, appid: &str) -> Option<ExtendedDataRecord> {
        self.xdata
            .get(appid)
            .map(|tags| ExtendedDataRecord::from_tags(appid, tags))
    }

    /// Typed view of all XDATA groups
    pub fn extended_data(&self) -> ExtendedData {
        ExtendedData::from_groups(&self.xdata)
    }

    /// Replace the XDATA group of the record's application
    pub fn set_xdata(&mut self, record: &ExtendedDataRecord) {
        self.xdata
            .insert(record.application_name.clone(), record.to_tags());
    }
}

/// Entity without registered schema, stored as grouped raw tags
#[derive(Debug, Clone, PartialEq)]
pub struct UnsupportedEntity {
    pub tags: ExtendedTags,
}

impl UnsupportedEntity {
    pub fn new(tags: ExtendedTags) -> Self {
        Self { tags }
    }

    pub fn dxftype(&self) -> &str {
        self.tags.dxftype()
    }

    pub fn handle(&self) -> Option<Handle> {
        self.base_value(HANDLE).and_then(TagValue::as_handle)
    }

    pub fn owner(&self) -> Option<Handle> {
        self.base_value(OWNER_HANDLE).and_then(TagValue::as_handle)
    }

    /// Set or replace the `5` tag of the base group
    pub fn set_handle(&mut self, handle: Handle) {
        let tag = Tag::str(HANDLE, handle.to_hex());
        let base = &mut self.tags.subclasses[0].tags;
        let mut tags: Vec<Tag> = std::mem::take(base).into_vec();
        match tags.iter().position(|t| t.code() == HANDLE) {
            Some(index) => tags[index] = tag,
            None => tags.insert(0, tag),
        }
        *base = tags.into();
    }

    fn base_value(&self, code: i32) -> Option<&TagValue> {
        self.tags.noclass().tags.get_first_value(code)
    }
}

/// Any entity of an entity section
#[derive(Debug, Clone)]
pub enum DxfEntity {
    Typed(Entity),
    Unsupported(UnsupportedEntity),
}

impl DxfEntity {
    pub fn dxftype(&self) -> &str {
        match self {
            DxfEntity::Typed(e) => e.dxftype(),
            DxfEntity::Unsupported(e) => e.dxftype(),
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        match self {
            DxfEntity::Typed(e) => e.handle(),
            DxfEntity::Unsupported(e) => e.handle(),
        }
    }

    pub fn set_handle(&mut self, handle: Handle) -> Result<()> {
        match self {
            DxfEntity::Typed(e) => e.set_handle(handle),
            DxfEntity::Unsupported(e) => {
                e.set_handle(handle);
                Ok(())
            }
        }
    }

    pub fn owner(&self) -> Option<Handle> {
        match self {
            DxfEntity::Typed(e) => e.owner(),
            DxfEntity::Unsupported(e) => e.owner(),
        }
    }

    pub fn as_typed(&self) -> Option<&Entity> {
        match self {
            DxfEntity::Typed(e) => Some(e),
            DxfEntity::Unsupported(_) => None,
        }
    }

    pub fn as_typed_mut(&mut self) -> Option<&mut Entity> {
        match self {
            DxfEntity::Typed(e) => Some(e),
            DxfEntity::Unsupported(_) => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, DxfEntity::Unsupported(_))
    }
}

impl From<Entity> for DxfEntity {
    fn from(entity: Entity) -> Self {
        DxfEntity::Typed(entity)
    }
}

impl From<UnsupportedEntity> for DxfEntity {
    fn from(entity: UnsupportedEntity) -> Self {
        DxfEntity::Unsupported(entity)
    }
}
