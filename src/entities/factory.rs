//! Entity construction from grouped tags

use ahash::AHashMap;
use std::sync::Arc;

use super::embedded::EmbeddedObject;
use super::namespace::DxfNamespace;
use super::{DxfEntity, Entity, Slot, SubclassLayout, UnsupportedEntity};
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::schema::{AttrRef, EntitySchema, Fixer, SchemaRegistry, EMBEDDED_MTEXT};
use crate::tags::extended::appdata_placeholder;
use crate::tags::{ExtendedTags, Tag, Tags};
use crate::types::DxfVersion;

/// Builds entities for one document version against a shared registry
#[derive(Debug, Clone, Copy)]
pub struct EntityFactory<'a> {
    registry: &'a SchemaRegistry,
    version: DxfVersion,
    strict: bool,
}

impl<'a> EntityFactory<'a> {
    pub fn new(registry: &'a SchemaRegistry, version: DxfVersion) -> Self {
        Self {
            registry,
            version,
            strict: false,
        }
    }

    /// Fail on repairable problems instead of recording notifications
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn version(&self) -> DxfVersion {
        self.version
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// New entity of `dxftype` without explicit attributes
    pub fn new_entity(&self, dxftype: &str) -> Result<Entity> {
        let schema = self.schema(dxftype)?;
        Ok(Entity::new(schema.clone()))
    }

    /// Build a typed entity, fails for unregistered types
    pub fn create(&self, xtags: ExtendedTags, notifications: &mut NotificationCollection) -> Result<Entity> {
        let schema = self.schema(xtags.dxftype())?.clone();
        let flat = !xtags.has_subclass_markers();
        let mut dxf = DxfNamespace::new(schema.clone());
        let mut layout = Vec::with_capacity(xtags.subclasses.len());
        let mut occurrences: AHashMap<&str, usize> = AHashMap::new();

        for subclass in &xtags.subclasses {
            let schema_index = match subclass.name() {
                None => Some(0),
                Some(marker) => {
                    let nth = occurrences.entry(marker).or_insert(0);
                    let index = schema.subclass_index(marker, *nth);
                    *nth += 1;
                    index
                }
            };
            let target = if flat { Target::Flat } else { Target::Subclass(schema_index) };
            let slots = self.load_tags(&mut dxf, target, &subclass.tags, notifications)?;
            layout.push(SubclassLayout {
                marker: subclass.marker.clone(),
                schema_index,
                slots,
            });
        }

        let ExtendedTags {
            appdata,
            embedded_marker,
            embedded,
            xdata,
            ..
        } = xtags;

        let mut entity = Entity::loaded(dxf, layout, flat);
        entity.appdata = appdata;
        entity.xdata = xdata;
        if let Some(tags) = embedded {
            entity.embedded = Some(self.load_embedded(embedded_marker, tags, notifications)?);
        }
        Ok(entity)
    }

    /// Build a typed entity, or keep the raw tags of unregistered types.
    ///
    /// Unknown types are recorded as notification in strict mode too.
    pub fn load(&self, xtags: ExtendedTags, notifications: &mut NotificationCollection) -> Result<DxfEntity> {
        if !self.registry.contains(xtags.dxftype()) {
            notifications.recovered(&DxfError::UnknownEntityType(xtags.dxftype().to_string()));
            return Ok(UnsupportedEntity::new(xtags).into());
        }
        Ok(self.create(xtags, notifications)?.into())
    }

    /// Group the tags of one record and build the entity
    pub fn load_tags_record<I>(&self, tags: I, notifications: &mut NotificationCollection) -> Result<DxfEntity>
    where
        I: IntoIterator<Item = Tag>,
    {
        let xtags = ExtendedTags::from_tags(tags, self.strict, notifications)?;
        self.load(xtags, notifications)
    }

    fn schema(&self, dxftype: &str) -> Result<&'a Arc<EntitySchema>> {
        self.registry
            .get(dxftype)
            .ok_or_else(|| DxfError::UnknownEntityType(dxftype.to_string()))
    }

    fn load_embedded(
        &self,
        marker: Option<String>,
        tags: Tags,
        notifications: &mut NotificationCollection,
    ) -> Result<EmbeddedObject> {
        let marker = marker.unwrap_or_else(|| crate::tags::extended::EMBEDDED_OBJECT_MARKER_VALUE.to_string());
        match self.registry.embedded(EMBEDDED_MTEXT) {
            Some(schema) => {
                let mut dxf = DxfNamespace::new(schema.clone());
                let slots = self.load_tags(&mut dxf, Target::Subclass(Some(0)), &tags, notifications)?;
                Ok(EmbeddedObject::new(marker, dxf, slots))
            }
            None => {
                notifications.notify(
                    NotificationType::NotSupported,
                    "no schema for embedded objects registered, tags kept as raw data",
                );
                Ok(EmbeddedObject::raw(marker, tags))
            }
        }
    }

    /// Assign tags of one bucket to attributes and record their order
    fn load_tags(
        &self,
        dxf: &mut DxfNamespace,
        target: Target,
        tags: &Tags,
        notifications: &mut NotificationCollection,
    ) -> Result<Vec<Slot>> {
        let schema = dxf.schema().clone();
        let mut slots = Vec::with_capacity(tags.len());
        // code -> number of tags seen, selects between attributes sharing a code
        let mut seen: AHashMap<i32, usize> = AHashMap::new();

        for tag in tags {
            if let Some(name) = appdata_placeholder(tag) {
                slots.push(Slot::AppData(name.to_string()));
                continue;
            }
            let candidates: Vec<AttrRef> = match target {
                Target::Flat => schema.flat_attributes_for_code(tag.code()).to_vec(),
                Target::Subclass(Some(subclass)) => schema.subclasses()[subclass]
                    .attributes_for_code(tag.code())
                    .iter()
                    .map(|&index| AttrRef { subclass, index })
                    .collect(),
                Target::Subclass(None) => Vec::new(),
            };
            let candidates: Vec<AttrRef> = candidates
                .into_iter()
                .filter(|r| schema.spec(*r).is_supported(self.version))
                .collect();
            if candidates.is_empty() {
                slots.push(Slot::Raw(tag.clone()));
                continue;
            }

            let count = seen.entry(tag.code()).or_insert(0);
            let r = candidates[(*count).min(candidates.len() - 1)];
            *count += 1;
            let spec = schema.spec(r);

            let value = match spec.kind.coerce(tag.value().clone()) {
                Some(value) => value,
                None => {
                    let err = DxfError::InvalidAttributeValue {
                        attribute: format!("{}.{}", schema.dxftype(), spec.name),
                        expected: spec.kind.name(),
                    };
                    if self.strict {
                        return Err(err);
                    }
                    notifications.notify(NotificationType::Error, format!("{}, tag {} kept", err, tag));
                    slots.push(Slot::Raw(tag.clone()));
                    continue;
                }
            };

            let value = if spec.is_valid(&value, self.version) {
                value
            } else {
                match (spec.fixer, &spec.default) {
                    (Some(Fixer::ReturnDefault), Some(default)) => {
                        notifications.notify(
                            NotificationType::Warning,
                            format!(
                                "invalid value {} of {}.{} replaced by default {}",
                                value,
                                schema.dxftype(),
                                spec.name,
                                default
                            ),
                        );
                        default.clone()
                    }
                    _ if self.strict => {
                        return Err(DxfError::SchemaViolation(format!(
                            "invalid value {} of {}.{}",
                            value,
                            schema.dxftype(),
                            spec.name
                        )))
                    }
                    _ => {
                        notifications.notify(
                            NotificationType::Warning,
                            format!("invalid value {} of {}.{} kept", value, schema.dxftype(), spec.name),
                        );
                        value
                    }
                }
            };

            if dxf.has_explicit(spec.name) {
                // Scalar attribute repeated: last one wins, keep its position
                slots.retain(|s| !matches!(s, Slot::Attr(n) if *n == spec.name));
                tracing::debug!(
                    dxftype = schema.dxftype(),
                    code = tag.code(),
                    "duplicate tag for attribute {}, last one wins",
                    spec.name
                );
            }
            dxf.set_loaded(r, value);
            slots.push(Slot::Attr(spec.name));
        }
        Ok(slots)
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    /// R12 record, codes of all subclasses apply
    Flat,
    /// Codes of one schema subclass, `None` for unknown subclasses
    Subclass(Option<usize>),
}
