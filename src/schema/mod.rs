//! Entity schemas: attribute definitions per DXF type and version
//!
//! A schema is static data. The built-in registry is created once on first
//! use and shared read-only afterwards; entity factories receive it by
//! reference, namespaces keep an `Arc` of their entity schema.

mod definitions;

pub use definitions::validators;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::tags::TagValue;
use crate::types::{DxfVersion, Handle, Vector3};

/// Name of the hard-coded schema used for embedded MTEXT objects
pub const EMBEDDED_MTEXT: &str = "EMBEDDED_MTEXT";

/// Value kind of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    /// Hexadecimal handle string
    Handle,
    Int16,
    Int32,
    Int64,
    Byte,
    /// 0 or 1
    Bool,
    Float,
    /// Written as x/y tags
    Point2D,
    /// Written as x/y/z tags, 2D input gets z = 0.0
    Point3D,
    /// Keeps the dimension it was read or set with
    AnyPoint,
    Binary,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Handle => "handle",
            ValueKind::Int16 => "16-bit integer",
            ValueKind::Int32 => "32-bit integer",
            ValueKind::Int64 => "64-bit integer",
            ValueKind::Byte => "8-bit integer",
            ValueKind::Bool => "boolean (0 or 1)",
            ValueKind::Float => "float",
            ValueKind::Point2D => "2D point",
            ValueKind::Point3D => "3D point",
            ValueKind::AnyPoint => "point",
            ValueKind::Binary => "binary data",
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, ValueKind::Point2D | ValueKind::Point3D | ValueKind::AnyPoint)
    }

    /// Convert `value` into the stored form of this kind.
    ///
    /// Returns `None` if the value is not compatible, e.g. a string for a
    /// float attribute or a scalar for a point attribute.
    pub fn coerce(&self, value: TagValue) -> Option<TagValue> {
        match (self, value) {
            (ValueKind::String, v @ TagValue::Str(_)) => Some(v),
            (ValueKind::Handle, TagValue::Str(s)) => Handle::from_hex(&s).map(|_| TagValue::Str(s)),
            (ValueKind::Int16, TagValue::Int(i)) if i16::try_from(i).is_ok() => Some(TagValue::Int(i)),
            (ValueKind::Int32, TagValue::Int(i)) if i32::try_from(i).is_ok() => Some(TagValue::Int(i)),
            (ValueKind::Int64, v @ TagValue::Int(_)) => Some(v),
            (ValueKind::Byte, TagValue::Int(i)) if (-128..=255).contains(&i) => Some(TagValue::Int(i)),
            (ValueKind::Bool, TagValue::Int(i)) if i == 0 || i == 1 => Some(TagValue::Int(i)),
            (ValueKind::Float, v @ TagValue::Float(_)) => Some(v),
            (ValueKind::Float, TagValue::Int(i)) => Some(TagValue::Float(i as f64)),
            (ValueKind::Point3D, v @ TagValue::Point3(_)) => Some(v),
            (ValueKind::Point3D, TagValue::Point2(p)) => Some(TagValue::Point3(p.to_3d())),
            (ValueKind::Point2D, v @ TagValue::Point2(_)) => Some(v),
            (ValueKind::Point2D, TagValue::Point3(p)) => Some(TagValue::Point2(p.xy())),
            (ValueKind::AnyPoint, v @ (TagValue::Point2(_) | TagValue::Point3(_))) => Some(v),
            (ValueKind::Binary, v @ TagValue::Binary(_)) => Some(v),
            _ => None,
        }
    }
}

/// Value check, may depend on the DXF version the value is written for
pub type Validator = fn(&TagValue, DxfVersion) -> bool;

/// Repair strategy for invalid values found while loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixer {
    /// Replace the invalid value by the attribute default
    ReturnDefault,
}

/// Definition of one DXF attribute
#[derive(Clone)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub code: i32,
    pub kind: ValueKind,
    pub default: Option<TagValue>,
    /// Read the value of this attribute when unset (e.g. SOLID `vtx3`)
    pub default_from: Option<&'static str>,
    pub min_version: DxfVersion,
    pub max_version: Option<DxfVersion>,
    pub optional: bool,
    pub validator: Option<Validator>,
    pub fixer: Option<Fixer>,
}

impl AttributeSpec {
    pub fn new(name: &'static str, code: i32, kind: ValueKind) -> Self {
        Self {
            name,
            code,
            kind,
            default: None,
            default_from: None,
            min_version: DxfVersion::AC1009,
            max_version: None,
            optional: false,
            validator: None,
            fixer: None,
        }
    }

    pub fn default(mut self, value: impl Into<TagValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_from(mut self, name: &'static str) -> Self {
        self.default_from = Some(name);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn since(mut self, version: DxfVersion) -> Self {
        self.min_version = version;
        self
    }

    pub fn until(mut self, version: DxfVersion) -> Self {
        self.max_version = Some(version);
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn fixer(mut self, fixer: Fixer) -> Self {
        self.fixer = Some(fixer);
        self
    }

    /// True if `version` lies inside the version bracket
    pub fn is_supported(&self, version: DxfVersion) -> bool {
        version >= self.min_version && self.max_version.map_or(true, |max| version <= max)
    }

    /// Validator result, `true` without a validator
    pub fn is_valid(&self, value: &TagValue, version: DxfVersion) -> bool {
        self.validator.map_or(true, |check| check(value, version))
    }
}

impl std::fmt::Debug for AttributeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeSpec")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("min_version", &self.min_version)
            .field("max_version", &self.max_version)
            .field("optional", &self.optional)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Attribute definitions of one subclass
#[derive(Debug, Clone)]
pub struct SubclassDef {
    /// Subclass marker, `None` for the base group without marker
    pub name: Option<&'static str>,
    pub attributes: Vec<AttributeSpec>,
    codes: AHashMap<i32, Vec<usize>>,
}

impl SubclassDef {
    pub fn new(name: Option<&'static str>, attributes: Vec<AttributeSpec>) -> Self {
        let mut codes: AHashMap<i32, Vec<usize>> = AHashMap::new();
        for (index, attr) in attributes.iter().enumerate() {
            codes.entry(attr.code).or_default().push(index);
        }
        Self {
            name,
            attributes,
            codes,
        }
    }

    /// Attribute indices declared with `code`, in declaration order
    pub fn attributes_for_code(&self, code: i32) -> &[usize] {
        self.codes.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Location of an attribute inside a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrRef {
    pub subclass: usize,
    pub index: usize,
}

/// Schema of one DXF entity type
#[derive(Debug)]
pub struct EntitySchema {
    dxftype: String,
    /// Oldest version this entity type can be written for
    pub min_version: DxfVersion,
    subclasses: Vec<SubclassDef>,
    names: AHashMap<&'static str, AttrRef>,
    flat_codes: AHashMap<i32, Vec<AttrRef>>,
}

impl EntitySchema {
    /// Build a schema from subclasses in export order.
    ///
    /// Attribute names must be unique inside one schema; a repeated name
    /// resolves to its first definition.
    pub fn new(dxftype: impl Into<String>, subclasses: Vec<SubclassDef>) -> Self {
        let mut names = AHashMap::new();
        let mut flat_codes: AHashMap<i32, Vec<AttrRef>> = AHashMap::new();
        for (s, subclass) in subclasses.iter().enumerate() {
            for (index, attr) in subclass.attributes.iter().enumerate() {
                let r = AttrRef { subclass: s, index };
                names.entry(attr.name).or_insert(r);
                flat_codes.entry(attr.code).or_default().push(r);
            }
        }
        Self {
            dxftype: dxftype.into(),
            min_version: DxfVersion::AC1009,
            subclasses,
            names,
            flat_codes,
        }
    }

    pub fn since(mut self, version: DxfVersion) -> Self {
        self.min_version = version;
        self
    }

    pub fn dxftype(&self) -> &str {
        &self.dxftype
    }

    pub fn subclasses(&self) -> &[SubclassDef] {
        &self.subclasses
    }

    pub fn locate(&self, name: &str) -> Option<AttrRef> {
        self.names.get(name).copied()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.locate(name).map(|r| self.spec(r))
    }

    pub fn spec(&self, r: AttrRef) -> &AttributeSpec {
        &self.subclasses[r.subclass].attributes[r.index]
    }

    /// Attributes over all subclasses declared with `code`, used for R12
    /// records which carry no subclass markers
    pub fn flat_attributes_for_code(&self, code: i32) -> &[AttrRef] {
        self.flat_codes.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Index of the `nth` subclass definition with marker `marker`
    pub fn subclass_index(&self, marker: &str, nth: usize) -> Option<usize> {
        self.subclasses
            .iter()
            .enumerate()
            .filter(|(_, s)| s.name == Some(marker))
            .nth(nth)
            .map(|(i, _)| i)
    }

    /// All attribute names in schema order
    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.subclasses
            .iter()
            .flat_map(|s| s.attributes.iter().map(|a| a.name))
    }
}

/// Read-only table of entity schemas keyed by DXF type name
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: AHashMap<String, Arc<EntitySchema>>,
    embedded: AHashMap<&'static str, Arc<EntitySchema>>,
}

static BUILTIN: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::with_builtin_types);

impl SchemaRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding all built-in entity types
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        for schema in definitions::entity_schemas() {
            registry.register(schema);
        }
        registry.register_embedded(EMBEDDED_MTEXT, definitions::embedded_mtext_schema());
        registry
    }

    /// Process-wide built-in registry, created on first use
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    /// Add or replace the schema for its DXF type
    pub fn register(&mut self, schema: EntitySchema) {
        self.schemas
            .insert(schema.dxftype().to_string(), Arc::new(schema));
    }

    /// Add or replace a schema for embedded objects
    pub fn register_embedded(&mut self, name: &'static str, schema: EntitySchema) {
        self.embedded.insert(name, Arc::new(schema));
    }

    pub fn get(&self, dxftype: &str) -> Option<&Arc<EntitySchema>> {
        self.schemas.get(dxftype)
    }

    pub fn contains(&self, dxftype: &str) -> bool {
        self.schemas.contains_key(dxftype)
    }

    pub fn embedded(&self, name: &str) -> Option<&Arc<EntitySchema>> {
        self.embedded.get(name)
    }

    /// Registered DXF type names, sorted
    pub fn dxftypes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Default of 3D point attributes
pub(crate) const NULLVEC: Vector3 = Vector3::ZERO;
