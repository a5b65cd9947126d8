//! Tag model: the (group code, value) pair and ordered tag sequences
//!
//! Tags produced by the readers are *compiled*: the two or three tags of a
//! coordinate are merged into a single point tag carrying the x-code.

pub mod extended;
pub mod group_code;

pub use extended::{ExtendedTags, Subclass};
pub use group_code::GroupCodeValueType;

use crate::types::{Handle, Vector2, Vector3};
use std::fmt;

/// Value of a tag, typed by the group code range
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Str(String),
    Int(i64),
    Float(f64),
    /// Coordinate written with x/y tags only
    Point2(Vector2),
    /// Coordinate written with x/y/z tags
    Point3(Vector3),
    Binary(Vec<u8>),
}

impl TagValue {
    /// Convert the text form of a value according to its group code.
    ///
    /// Returns `None` if the text is not valid for the code's value type.
    pub fn parse(code: i32, text: &str) -> Option<TagValue> {
        match GroupCodeValueType::from_code(code) {
            GroupCodeValueType::Double | GroupCodeValueType::Point => {
                text.trim().parse::<f64>().ok().map(TagValue::Float)
            }
            vt if vt.is_integer() => parse_int(text).map(TagValue::Int),
            GroupCodeValueType::Binary => decode_hex(text.trim()).map(TagValue::Binary),
            _ => Some(TagValue::Str(text.to_string())),
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            TagValue::Str(_) => "string",
            TagValue::Int(_) => "integer",
            TagValue::Float(_) => "float",
            TagValue::Point2(_) => "2D point",
            TagValue::Point3(_) => "3D point",
            TagValue::Binary(_) => "binary",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TagValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats and integers both read as `f64`
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TagValue::Float(v) => Some(*v),
            TagValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// 2D points read with z = 0.0
    pub fn as_point(&self) -> Option<Vector3> {
        match self {
            TagValue::Point3(p) => Some(*p),
            TagValue::Point2(p) => Some(p.to_3d()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<Handle> {
        self.as_str().and_then(Handle::from_hex)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Str(s) => f.write_str(s),
            TagValue::Int(v) => write!(f, "{}", v),
            TagValue::Float(v) => write!(f, "{}", v),
            TagValue::Point2(p) => write!(f, "{}", p),
            TagValue::Point3(p) => write!(f, "{}", p),
            TagValue::Binary(b) => f.write_str(&encode_hex(b)),
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Str(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Str(s)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Int(v)
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        TagValue::Int(v as i64)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        TagValue::Float(v)
    }
}

impl From<Vector3> for TagValue {
    fn from(v: Vector3) -> Self {
        TagValue::Point3(v)
    }
}

impl From<Vector2> for TagValue {
    fn from(v: Vector2) -> Self {
        TagValue::Point2(v)
    }
}

impl From<(f64, f64, f64)> for TagValue {
    fn from(v: (f64, f64, f64)) -> Self {
        TagValue::Point3(v.into())
    }
}

/// A single DXF tag. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    code: i32,
    value: TagValue,
}

impl Tag {
    pub fn new(code: i32, value: impl Into<TagValue>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    /// String tag
    pub fn str(code: i32, value: impl Into<String>) -> Self {
        Self::new(code, TagValue::Str(value.into()))
    }

    /// Integer tag
    pub fn int(code: i32, value: i64) -> Self {
        Self::new(code, TagValue::Int(value))
    }

    /// Float tag
    pub fn float(code: i32, value: f64) -> Self {
        Self::new(code, TagValue::Float(value))
    }

    /// 3D point tag, `code` is the x-code
    pub fn point(code: i32, value: impl Into<Vector3>) -> Self {
        Self::new(code, TagValue::Point3(value.into()))
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn value(&self) -> &TagValue {
        &self.value
    }

    pub fn into_value(self) -> TagValue {
        self.value
    }

    /// True if this tag has `code` and a string value equal to `value`
    pub fn is(&self, code: i32, value: &str) -> bool {
        self.code == code && self.value.as_str() == Some(value)
    }

    /// True for `0 <name>` structure tags
    pub fn is_structure(&self) -> bool {
        self.code == group_code::STRUCTURE_MARKER
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.code, self.value)
    }
}

/// Ordered, append-only sequence of tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags {
    tags: Vec<Tag>,
}

impl Tags {
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tags: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        self.tags.extend(iter);
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    pub fn first(&self) -> Option<&Tag> {
        self.tags.first()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.tags
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.tags
    }

    /// First tag with `code`
    pub fn find_first(&self, code: i32) -> Option<&Tag> {
        self.tags.iter().find(|t| t.code == code)
    }

    /// All tags with `code`, in order
    pub fn find_all(&self, code: i32) -> impl Iterator<Item = &Tag> + '_ {
        self.tags.iter().filter(move |t| t.code == code)
    }

    /// Index of the first tag with `code` at or after `start`
    pub fn tag_index(&self, code: i32, start: usize) -> Option<usize> {
        self.tags
            .iter()
            .skip(start)
            .position(|t| t.code == code)
            .map(|i| i + start)
    }

    pub fn has_tag(&self, code: i32) -> bool {
        self.find_first(code).is_some()
    }

    /// Value of the first tag with `code`
    pub fn get_first_value(&self, code: i32) -> Option<&TagValue> {
        self.find_first(code).map(|t| &t.value)
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(tags: Vec<Tag>) -> Self {
        Self { tags }
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl std::ops::Index<usize> for Tags {
    type Output = Tag;

    fn index(&self, index: usize) -> &Tag {
        &self.tags[index]
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let t = text.trim();
    if let Ok(v) = t.parse::<i64>() {
        return Some(v);
    }
    // Some producers write integers as "1.0"
    match t.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Some(f as i64),
        _ => None,
    }
}

/// Decode a hex string of a binary chunk tag
pub fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| text.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
        .collect()
}

/// Encode bytes as upper-case hex, the text form of binary chunk tags
pub fn encode_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}
