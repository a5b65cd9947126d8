//! Entity export: the inverse of the entity factory
//!
//! Loaded entities are written in their source order: each subclass replays
//! its recorded slots (attributes, unknown tags, app data groups), followed
//! by the attributes of that subclass which had no tag in the source. New
//! entities are written in schema order.

use ahash::AHashSet;

use super::namespace::DxfNamespace;
use super::{DxfEntity, Entity, Slot, SubclassLayout};
use crate::error::{DxfError, Result};
use crate::io::dxf::DxfStreamWriter;
use crate::notification::{NotificationCollection, NotificationType};
use crate::schema::AttributeSpec;
use crate::tags::group_code::{
    APP_DATA_MARKER, EMBEDDED_OBJ_MARKER, STRUCTURE_MARKER, SUBCLASS_MARKER, XDATA_MARKER,
};
use crate::tags::{Tag, Tags};
use crate::types::DxfVersion;

/// Options of one export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfiguration {
    /// Target DXF version
    pub version: DxfVersion,
    /// Omit optional attributes which were never set
    pub optional: bool,
    /// Fail on attributes invalid for the target version instead of
    /// skipping them with a notification
    pub strict: bool,
}

impl Default for ExportConfiguration {
    fn default() -> Self {
        Self {
            version: DxfVersion::default(),
            optional: true,
            strict: false,
        }
    }
}

impl ExportConfiguration {
    pub fn new(version: DxfVersion) -> Self {
        Self {
            version,
            ..Self::default()
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
}

/// Converts entities back into tags for one target version
#[derive(Debug, Clone, Copy, Default)]
pub struct TagExporter {
    config: ExportConfiguration,
}

impl TagExporter {
    pub fn new(config: ExportConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfiguration {
        &self.config
    }

    /// Tags of `entity`; unsupported entities are returned verbatim
    pub fn export(&self, entity: &DxfEntity, notifications: &mut NotificationCollection) -> Result<Tags> {
        match entity {
            DxfEntity::Typed(e) => self.export_entity(e, notifications),
            DxfEntity::Unsupported(e) => Ok(e.tags.to_tags()),
        }
    }

    /// Write the tags of `entity` to a stream writer
    pub fn write<W: DxfStreamWriter + ?Sized>(
        &self,
        entity: &DxfEntity,
        writer: &mut W,
        notifications: &mut NotificationCollection,
    ) -> Result<()> {
        for tag in &self.export(entity, notifications)? {
            writer.write_tag(tag)?;
        }
        Ok(())
    }

    pub fn export_entity(&self, entity: &Entity, notifications: &mut NotificationCollection) -> Result<Tags> {
        let version = self.config.version;
        let schema = entity.dxf().schema();
        if version < schema.min_version {
            return Err(DxfError::UnsupportedVersion(format!(
                "{} requires DXF version {} or later, requested {}",
                entity.dxftype(),
                schema.min_version,
                version
            )));
        }

        let mut out = Tags::new();
        out.push(Tag::str(STRUCTURE_MARKER, entity.dxftype()));
        let mut emitter = Emitter::new(self.config, entity, &mut out, notifications);

        match entity.layout() {
            None => emitter.schema_order()?,
            Some(layout) if entity.is_flat() => emitter.flat_source(layout)?,
            Some(layout) => emitter.source_order(layout)?,
        }

        if let Some(embedded) = &entity.embedded {
            let min_version = embedded.dxf().map_or(DxfVersion::R2018, |dxf| dxf.schema().min_version);
            if version >= min_version {
                out.push(Tag::str(EMBEDDED_OBJ_MARKER, embedded.marker()));
                let mut inner = Emitter::embedded(self.config, embedded.dxf(), &mut out, notifications);
                inner.slots(embedded.slots())?;
                if embedded.dxf().is_some() {
                    inner.remaining(0)?;
                }
            } else {
                notifications.notify(
                    NotificationType::NotSupported,
                    format!("embedded object of {} not exported for {}", entity.dxftype(), version),
                );
            }
        }

        for (appid, tags) in &entity.xdata {
            out.push(Tag::str(XDATA_MARKER, appid.clone()));
            out.extend(tags.iter().cloned());
        }
        Ok(out)
    }
}

struct Emitter<'a> {
    config: ExportConfiguration,
    dxf: Option<&'a DxfNamespace>,
    entity: Option<&'a Entity>,
    out: &'a mut Tags,
    notifications: &'a mut NotificationCollection,
    emitted: AHashSet<&'static str>,
    appdata_emitted: AHashSet<&'a str>,
}

impl<'a> Emitter<'a> {
    fn new(
        config: ExportConfiguration,
        entity: &'a Entity,
        out: &'a mut Tags,
        notifications: &'a mut NotificationCollection,
    ) -> Self {
        Self {
            config,
            dxf: Some(entity.dxf()),
            entity: Some(entity),
            out,
            notifications,
            emitted: AHashSet::new(),
            appdata_emitted: AHashSet::new(),
        }
    }

    fn embedded(
        config: ExportConfiguration,
        dxf: Option<&'a DxfNamespace>,
        out: &'a mut Tags,
        notifications: &'a mut NotificationCollection,
    ) -> Self {
        Self {
            config,
            dxf,
            entity: None,
            out,
            notifications,
            emitted: AHashSet::new(),
            appdata_emitted: AHashSet::new(),
        }
    }

    fn is_r12(&self) -> bool {
        self.config.version.is_r12()
    }

    /// New entity: all subclasses in schema order
    fn schema_order(&mut self) -> Result<()> {
        let Some(dxf) = self.dxf else { return Ok(()) };
        for (index, subclass) in dxf.schema().subclasses().iter().enumerate() {
            self.marker(subclass.name)?;
            self.remaining(index)?;
        }
        Ok(())
    }

    /// Entity loaded with subclass markers
    fn source_order(&mut self, layout: &'a [SubclassLayout]) -> Result<()> {
        let Some(dxf) = self.dxf else { return Ok(()) };
        let count = dxf.schema().subclasses().len();
        let present: Vec<bool> = (0..count)
            .map(|k| layout.iter().any(|s| s.schema_index == Some(k)))
            .collect();
        let mut done = vec![false; count];

        for bucket in layout {
            match bucket.schema_index {
                Some(k) => {
                    // subclasses missing in the source go before their successor
                    for j in 0..k {
                        if !done[j] && !present[j] {
                            self.fresh_subclass(j)?;
                            done[j] = true;
                        }
                    }
                    self.marker(bucket.marker.as_deref())?;
                    self.slots(&bucket.slots)?;
                    self.remaining(k)?;
                    done[k] = true;
                }
                None => {
                    self.marker(bucket.marker.as_deref())?;
                    self.slots(&bucket.slots)?;
                }
            }
        }
        for j in 0..count {
            if !done[j] {
                self.fresh_subclass(j)?;
            }
        }
        Ok(())
    }

    /// Entity loaded from an R12 record: one bucket for all subclasses
    fn flat_source(&mut self, layout: &'a [SubclassLayout]) -> Result<()> {
        let Some(dxf) = self.dxf else { return Ok(()) };
        let count = dxf.schema().subclasses().len();
        if self.is_r12() {
            for bucket in layout {
                self.slots(&bucket.slots)?;
            }
            for k in 0..count {
                self.remaining(k)?;
            }
            return Ok(());
        }

        // distribute attributes to their subclasses, unknown tags go last
        for (k, subclass) in dxf.schema().subclasses().iter().enumerate() {
            self.marker(subclass.name)?;
            for bucket in layout {
                for slot in &bucket.slots {
                    match slot {
                        Slot::Attr(name) if dxf.schema().locate(name).map(|r| r.subclass) == Some(k) => {
                            self.slot(slot)?
                        }
                        Slot::AppData(_) if k == 0 => self.slot(slot)?,
                        _ => {}
                    }
                }
            }
            self.remaining(k)?;
            if k + 1 == count {
                for slot in layout.iter().flat_map(|b| b.slots.iter()) {
                    if matches!(slot, Slot::Raw(_)) {
                        self.slot(slot)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn fresh_subclass(&mut self, index: usize) -> Result<()> {
        let name = self.dxf.map(|dxf| dxf.schema().subclasses()[index].name);
        if let Some(name) = name {
            self.marker(name)?;
        }
        self.remaining(index)
    }

    fn marker(&mut self, marker: Option<&str>) -> Result<()> {
        if let (Some(marker), false) = (marker, self.is_r12()) {
            self.out.push(Tag::str(SUBCLASS_MARKER, marker));
        }
        Ok(())
    }

    fn slots(&mut self, slots: &'a [Slot]) -> Result<()> {
        for slot in slots {
            self.slot(slot)?;
        }
        Ok(())
    }

    fn slot(&mut self, slot: &'a Slot) -> Result<()> {
        match slot {
            Slot::Attr(name) => {
                let name: &'static str = *name;
                let explicit = self.dxf.map_or(false, |dxf| dxf.has_explicit(name));
                if explicit || self.spec(name).map_or(false, |spec| self.should_export(spec)) {
                    self.attribute(name)?;
                }
            }
            Slot::Raw(tag) => self.out.push(tag.clone()),
            Slot::AppData(name) => self.appdata(name),
        }
        Ok(())
    }

    /// Attributes of schema subclass `index` not written yet
    fn remaining(&mut self, index: usize) -> Result<()> {
        let Some(dxf) = self.dxf else { return Ok(()) };
        for spec in &dxf.schema().subclasses()[index].attributes {
            if index == 0 && spec.name == "owner" {
                self.pending_appdata();
            }
            if !self.emitted.contains(spec.name) && self.should_export(spec) {
                self.attribute(spec.name)?;
            }
        }
        if index == 0 {
            self.pending_appdata();
        }
        Ok(())
    }

    fn spec(&self, name: &str) -> Option<&'a AttributeSpec> {
        self.dxf.and_then(|dxf| dxf.schema().attribute(name))
    }

    /// Export rule for attributes which are not explicitly set
    fn should_export(&self, spec: &AttributeSpec) -> bool {
        let Some(dxf) = self.dxf else { return false };
        if !spec.is_supported(self.config.version) {
            return false;
        }
        dxf.has_explicit(spec.name)
            || (dxf.get(spec.name).is_ok() && !(spec.optional && self.config.optional))
    }

    fn attribute(&mut self, name: &'static str) -> Result<()> {
        let (Some(dxf), Some(spec)) = (self.dxf, self.spec(name)) else {
            return Ok(());
        };
        if !self.emitted.insert(spec.name) {
            return Ok(());
        }
        let version = self.config.version;
        if !spec.is_supported(version) {
            return Ok(());
        }
        let Ok(value) = dxf.get(spec.name) else {
            return Ok(());
        };
        if !spec.is_valid(value, version) {
            let err = DxfError::InvalidAttributeForVersion {
                attribute: format!("{}.{}", dxf.dxftype(), spec.name),
                version,
            };
            if self.config.strict {
                return Err(err);
            }
            self.notifications.recovered(&err);
            return Ok(());
        }
        self.out.push(Tag::new(spec.code, value.clone()));
        Ok(())
    }

    fn appdata(&mut self, name: &'a str) {
        if self.is_r12() || !self.appdata_emitted.insert(name) {
            return;
        }
        if let Some(tags) = self.entity.and_then(|e| e.appdata.get(name)) {
            self.out.push(Tag::str(APP_DATA_MARKER, format!("{{{}", name)));
            self.out.extend(tags.iter().cloned());
            self.out.push(Tag::str(APP_DATA_MARKER, "}"));
        }
    }

    /// App data groups without recorded position
    fn pending_appdata(&mut self) {
        let Some(entity) = self.entity else { return };
        for name in entity.appdata.keys() {
            self.appdata(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityFactory;
    use crate::schema::SchemaRegistry;

    fn factory(version: DxfVersion) -> EntityFactory<'static> {
        EntityFactory::new(SchemaRegistry::builtin(), version)
    }

    fn export(entity: &Entity, config: ExportConfiguration) -> Tags {
        let mut notes = NotificationCollection::new();
        TagExporter::new(config).export_entity(entity, &mut notes).unwrap()
    }

    #[test]
    fn test_new_entity_schema_order() {
        let mut line = factory(DxfVersion::R2000).new_entity("LINE").unwrap();
        line.dxf_mut().set("handle", "FF").unwrap();
        line.dxf_mut().set("end", (1.0, 1.0, 0.0)).unwrap();
        let tags = export(&line, ExportConfiguration::new(DxfVersion::R2000));
        let expected: Tags = vec![
            Tag::str(0, "LINE"),
            Tag::str(5, "FF"),
            Tag::str(100, "AcDbEntity"),
            Tag::str(8, "0"),
            Tag::str(100, "AcDbLine"),
            Tag::point(10, (0.0, 0.0, 0.0)),
            Tag::point(11, (1.0, 1.0, 0.0)),
        ]
        .into();
        assert_eq!(tags, expected);
    }

    #[test]
    fn test_r12_has_no_markers() {
        let mut circle = factory(DxfVersion::R12).new_entity("CIRCLE").unwrap();
        circle.dxf_mut().set("radius", 3.0).unwrap();
        let tags = export(&circle, ExportConfiguration::new(DxfVersion::R12));
        assert!(!tags.has_tag(100));
        assert_eq!(tags.get_first_value(40).and_then(|v| v.as_float()), Some(3.0));
    }

    #[test]
    fn test_invalid_for_version_skipped() {
        let mut line = factory(DxfVersion::R2018).new_entity("LINE").unwrap();
        line.dxf_mut().set("color", 257).unwrap();
        let mut notes = NotificationCollection::new();
        let exporter = TagExporter::new(ExportConfiguration::new(DxfVersion::R2000));
        let tags = exporter.export_entity(&line, &mut notes).unwrap();
        assert!(!tags.has_tag(62));
        assert!(notes.has_type(NotificationType::Warning));

        let strict = TagExporter::new(ExportConfiguration::new(DxfVersion::R2000).strict(true));
        assert!(matches!(
            strict.export_entity(&line, &mut notes),
            Err(DxfError::InvalidAttributeForVersion { .. })
        ));

        let tags = TagExporter::new(ExportConfiguration::new(DxfVersion::R2004))
            .export_entity(&line, &mut notes)
            .unwrap();
        assert_eq!(tags.get_first_value(62).and_then(|v| v.as_int()), Some(257));
    }

    #[test]
    fn test_unsupported_version() {
        let mtext = factory(DxfVersion::R2000).new_entity("MTEXT").unwrap();
        let mut notes = NotificationCollection::new();
        let err = TagExporter::new(ExportConfiguration::new(DxfVersion::R12))
            .export_entity(&mtext, &mut notes)
            .unwrap_err();
        assert!(matches!(err, DxfError::UnsupportedVersion(_)));
    }

    #[test]
    fn test_appdata_after_handle() {
        let mut line = factory(DxfVersion::R2000).new_entity("LINE").unwrap();
        line.dxf_mut().set("handle", "A").unwrap();
        line.dxf_mut().set("owner", "1F").unwrap();
        line.appdata
            .insert("ACAD_REACTORS".to_string(), vec![Tag::str(330, "1F")].into());
        let tags = export(&line, ExportConfiguration::new(DxfVersion::R2000));
        let codes: Vec<i32> = tags.iter().take(6).map(|t| t.code()).collect();
        assert_eq!(codes, vec![0, 5, 102, 330, 102, 330]);
    }
}
