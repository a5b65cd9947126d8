//! Extended Data (XDATA) support
//!
//! Extended data is application-specific data attached to entities. It is
//! stored in DXF files using group codes 1000-1071 after a `1001` tag with
//! the registered application name. Entities keep XDATA as raw tags; the
//! types here are a typed view converted on demand.

use indexmap::IndexMap;

use crate::tags::{Tag, TagValue, Tags};
use crate::types::{Handle, Vector3};

/// Extended data value types
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// String value (group code 1000)
    String(String),
    /// Control string (group code 1002) - "{" or "}"
    ControlString(String),
    /// Layer name (group code 1003)
    LayerName(String),
    /// Binary data (group code 1004)
    BinaryData(Vec<u8>),
    /// Database handle (group code 1005)
    Handle(Handle),
    /// 3D point (group codes 1010, 1020, 1030)
    Point3D(Vector3),
    /// 3D position (group codes 1011, 1021, 1031)
    Position3D(Vector3),
    /// 3D displacement (group codes 1012, 1022, 1032)
    Displacement3D(Vector3),
    /// 3D direction (group codes 1013, 1023, 1033)
    Direction3D(Vector3),
    /// Real value (group code 1040)
    Real(f64),
    /// Distance (group code 1041)
    Distance(f64),
    /// Scale factor (group code 1042)
    ScaleFactor(f64),
    /// 16-bit integer (group code 1070)
    Integer16(i16),
    /// 32-bit integer (group code 1071)
    Integer32(i32),
    /// Tag which does not fit the types above, kept unchanged
    Other(Tag),
}

impl XDataValue {
    /// Typed value of an XDATA tag
    pub fn from_tag(tag: &Tag) -> Self {
        let value = tag.value();
        let typed = match tag.code() {
            1000 => value.as_str().map(|s| XDataValue::String(s.to_string())),
            1002 => value.as_str().map(|s| XDataValue::ControlString(s.to_string())),
            1003 => value.as_str().map(|s| XDataValue::LayerName(s.to_string())),
            1004 => value.as_bytes().map(|b| XDataValue::BinaryData(b.to_vec())),
            1005 => value.as_handle().map(XDataValue::Handle),
            1010 => value.as_point().map(XDataValue::Point3D),
            1011 => value.as_point().map(XDataValue::Position3D),
            1012 => value.as_point().map(XDataValue::Displacement3D),
            1013 => value.as_point().map(XDataValue::Direction3D),
            1040 => value.as_float().map(XDataValue::Real),
            1041 => value.as_float().map(XDataValue::Distance),
            1042 => value.as_float().map(XDataValue::ScaleFactor),
            1070 => value
                .as_int()
                .and_then(|v| i16::try_from(v).ok())
                .map(XDataValue::Integer16),
            1071 => value
                .as_int()
                .and_then(|v| i32::try_from(v).ok())
                .map(XDataValue::Integer32),
            _ => None,
        };
        typed.unwrap_or_else(|| XDataValue::Other(tag.clone()))
    }

    /// The XDATA tag of this value
    pub fn to_tag(&self) -> Tag {
        match self {
            XDataValue::String(s) => Tag::str(1000, s.clone()),
            XDataValue::ControlString(s) => Tag::str(1002, s.clone()),
            XDataValue::LayerName(s) => Tag::str(1003, s.clone()),
            XDataValue::BinaryData(b) => Tag::new(1004, TagValue::Binary(b.clone())),
            XDataValue::Handle(h) => Tag::str(1005, h.to_hex()),
            XDataValue::Point3D(p) => Tag::point(1010, *p),
            XDataValue::Position3D(p) => Tag::point(1011, *p),
            XDataValue::Displacement3D(p) => Tag::point(1012, *p),
            XDataValue::Direction3D(p) => Tag::point(1013, *p),
            XDataValue::Real(v) => Tag::float(1040, *v),
            XDataValue::Distance(v) => Tag::float(1041, *v),
            XDataValue::ScaleFactor(v) => Tag::float(1042, *v),
            XDataValue::Integer16(v) => Tag::int(1070, *v as i64),
            XDataValue::Integer32(v) => Tag::int(1071, *v as i64),
            XDataValue::Other(tag) => tag.clone(),
        }
    }
}

/// Extended data record for a single application
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedDataRecord {
    /// Application name (from group code 1001)
    pub application_name: String,
    /// Extended data values
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    /// Create a new extended data record
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            values: Vec::new(),
        }
    }

    /// Typed view of the tags following the `1001` tag
    pub fn from_tags(application_name: impl Into<String>, tags: &Tags) -> Self {
        Self {
            application_name: application_name.into(),
            values: tags.iter().map(XDataValue::from_tag).collect(),
        }
    }

    /// Tags of the values, without the leading `1001` tag
    pub fn to_tags(&self) -> Tags {
        self.values.iter().map(XDataValue::to_tag).collect()
    }

    /// Add a value to the extended data
    pub fn add_value(&mut self, value: XDataValue) {
        self.values.push(value);
    }

    /// Get the number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extended data collection for an entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
    records: Vec<ExtendedDataRecord>,
}

impl ExtendedData {
    /// Create a new extended data collection
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Typed view of raw XDATA groups keyed by application name
    pub fn from_groups(groups: &IndexMap<String, Tags>) -> Self {
        Self {
            records: groups
                .iter()
                .map(|(name, tags)| ExtendedDataRecord::from_tags(name.clone(), tags))
                .collect(),
        }
    }

    /// Raw XDATA groups, the inverse of [`ExtendedData::from_groups`]
    pub fn to_groups(&self) -> IndexMap<String, Tags> {
        self.records
            .iter()
            .map(|r| (r.application_name.clone(), r.to_tags()))
            .collect()
    }

    /// Add a record to the collection
    pub fn add_record(&mut self, record: ExtendedDataRecord) {
        self.records.push(record);
    }

    /// Get all records
    pub fn records(&self) -> &[ExtendedDataRecord] {
        &self.records
    }

    /// Get a record by application name
    pub fn get_record(&self, application_name: &str) -> Option<&ExtendedDataRecord> {
        self.records
            .iter()
            .find(|r| r.application_name == application_name)
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
