//! Embedded objects (`101 Embedded Object`)
//!
//! ATTRIB and ATTDEF of DXF R2018 may carry an MTEXT entity inside their own
//! record. It has no handle and no subclass markers, so it is loaded as a
//! flat mini entity against the hard-coded embedded MTEXT schema.

use super::namespace::DxfNamespace;
use super::{Entity, Slot};
use crate::error::{DxfError, Result};
use crate::schema::SchemaRegistry;
use crate::tags::Tags;

/// Code of the text chunks preceding the final `1` tag
pub(crate) const TEXT_CHUNK: i32 = 3;

#[derive(Debug, Clone)]
pub struct EmbeddedObject {
    marker: String,
    /// `None` if no embedded schema was available while loading
    dxf: Option<DxfNamespace>,
    slots: Vec<Slot>,
}

impl EmbeddedObject {
    pub fn new(marker: impl Into<String>, dxf: DxfNamespace, slots: Vec<Slot>) -> Self {
        Self {
            marker: marker.into(),
            dxf: Some(dxf),
            slots,
        }
    }

    /// Embedded object kept as raw tags only
    pub fn raw(marker: impl Into<String>, tags: Tags) -> Self {
        Self {
            marker: marker.into(),
            dxf: None,
            slots: tags.into_iter().map(Slot::Raw).collect(),
        }
    }

    /// Value of the `101` marker tag
    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn dxf(&self) -> Option<&DxfNamespace> {
        self.dxf.as_ref()
    }

    pub fn dxf_mut(&mut self) -> Option<&mut DxfNamespace> {
        self.dxf.as_mut()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Full MTEXT content: `3` chunks followed by the `1` tag
    pub fn text(&self) -> String {
        let mut content: String = self
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Raw(tag) if tag.code() == TEXT_CHUNK => tag.value().as_str(),
                _ => None,
            })
            .collect();
        if let Some(text) = self.dxf.as_ref().and_then(|dxf| dxf.get_opt("text")) {
            content.push_str(text.as_str().unwrap_or_default());
        }
        content
    }

    /// Stand-alone MTEXT entity built from this object.
    ///
    /// Graphic attributes explicitly set on `host` are copied. The result is
    /// a new entity each call; changes do not affect host or embedded object.
    pub fn virtual_entity(&self, host: &Entity, registry: &SchemaRegistry) -> Result<Entity> {
        let schema = registry
            .get("MTEXT")
            .ok_or_else(|| DxfError::UnknownEntityType("MTEXT".to_string()))?;
        let mut mtext = Entity::new(schema.clone());

        let host_schema = host.dxf().schema();
        if let Some(index) = host_schema.subclass_index("AcDbEntity", 0) {
            for spec in &host_schema.subclasses()[index].attributes {
                if let (true, Ok(value)) = (host.dxf().has_explicit(spec.name), host.dxf().get(spec.name)) {
                    if mtext.dxf().is_known(spec.name) {
                        mtext.dxf_mut().set(spec.name, value.clone())?;
                    }
                }
            }
        }
        if let Some(dxf) = &self.dxf {
            for (name, value) in dxf.explicit_values() {
                if name != "text" && mtext.dxf().is_known(name) {
                    mtext.dxf_mut().set(name, value.clone())?;
                }
            }
        }
        mtext.dxf_mut().set("text", self.text())?;
        Ok(mtext)
    }
}
