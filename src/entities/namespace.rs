//! Per-entity attribute store

use indexmap::IndexMap;
use std::sync::Arc;

use crate::error::{DxfError, Result};
use crate::schema::{AttrRef, AttributeSpec, EntitySchema};
use crate::tags::TagValue;
use crate::types::{DxfVersion, Handle, Vector3};

/// Typed attribute values of one entity, resolved against its schema.
///
/// Only explicitly set values are stored. Reading an unset attribute
/// returns the schema default without storing it.
#[derive(Debug, Clone)]
pub struct DxfNamespace {
    schema: Arc<EntitySchema>,
    values: IndexMap<&'static str, TagValue>,
}

impl DxfNamespace {
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    pub fn dxftype(&self) -> &str {
        self.schema.dxftype()
    }

    fn spec(&self, name: &str) -> Result<&AttributeSpec> {
        self.schema
            .attribute(name)
            .ok_or_else(|| DxfError::UnknownAttribute(format!("{}.{}", self.dxftype(), name)))
    }

    /// True if `name` is defined by the schema
    pub fn is_known(&self, name: &str) -> bool {
        self.schema.locate(name).is_some()
    }

    /// Explicit value, else the value of the `default_from` attribute, else
    /// the schema default.
    pub fn get(&self, name: &str) -> Result<&TagValue> {
        let spec = self.spec(name)?;
        if let Some(value) = self.values.get(spec.name) {
            return Ok(value);
        }
        if let Some(source) = spec.default_from {
            if let Ok(value) = self.get(source) {
                return Ok(value);
            }
        }
        spec.default
            .as_ref()
            .ok_or_else(|| DxfError::AttributeNotSet(format!("{}.{}", self.dxftype(), name)))
    }

    /// Like [`DxfNamespace::get`], but `None` for unset attributes without
    /// default and for unknown names
    pub fn get_opt(&self, name: &str) -> Option<&TagValue> {
        self.get(name).ok()
    }

    /// Set an attribute, the value must match the attribute kind.
    ///
    /// Integers are accepted for float attributes and 2D points for 3D point
    /// attributes (z = 0.0). Scalars are never accepted for points.
    pub fn set(&mut self, name: &str, value: impl Into<TagValue>) -> Result<()> {
        let spec = self.spec(name)?;
        let key = spec.name;
        let value = spec
            .kind
            .coerce(value.into())
            .ok_or_else(|| DxfError::InvalidAttributeValue {
                attribute: format!("{}.{}", self.dxftype(), name),
                expected: spec.kind.name(),
            })?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Store an already coerced value, used by the loader
    pub(crate) fn set_loaded(&mut self, r: AttrRef, value: TagValue) {
        let name = self.schema.spec(r).name;
        self.values.insert(name, value);
    }

    pub fn has_explicit(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Reset to the default; no error if the attribute was never set
    pub fn discard(&mut self, name: &str) -> Result<()> {
        let key = self.spec(name)?.name;
        self.values.shift_remove(key);
        Ok(())
    }

    /// True if the attribute exists in DXF `version`
    pub fn is_supported(&self, name: &str, version: DxfVersion) -> Result<bool> {
        Ok(self.spec(name)?.is_supported(version))
    }

    /// Explicitly set values in the order they were set or loaded
    pub fn explicit_values(&self) -> impl Iterator<Item = (&'static str, &TagValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.get(name)?
            .as_str()
            .ok_or_else(|| self.kind_error(name, "string"))
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        self.get(name)?
            .as_int()
            .ok_or_else(|| self.kind_error(name, "integer"))
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        self.get(name)?
            .as_float()
            .ok_or_else(|| self.kind_error(name, "float"))
    }

    /// Point attribute as 3D vector, 2D points read with z = 0.0
    pub fn get_point(&self, name: &str) -> Result<Vector3> {
        self.get(name)?
            .as_point()
            .ok_or_else(|| self.kind_error(name, "point"))
    }

    pub fn get_handle(&self, name: &str) -> Result<Handle> {
        self.get(name)?
            .as_handle()
            .ok_or_else(|| self.kind_error(name, "handle"))
    }

    fn kind_error(&self, name: &str, expected: &'static str) -> DxfError {
        DxfError::InvalidAttributeValue {
            attribute: format!("{}.{}", self.dxftype(), name),
            expected,
        }
    }
}
