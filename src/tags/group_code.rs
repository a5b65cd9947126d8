//! Group code classification
//!
//! The group code of a tag decides the type of its value. Coordinates are the
//! special case: an x-code (10-18, 110-112, 210, 1010-1013) is followed by its
//! y-code (x + 10) and optionally its z-code (x + 20).

/// Entity type / structure tag (`0 LINE`, `0 SECTION`, `0 EOF`)
pub const STRUCTURE_MARKER: i32 = 0;
/// Own handle
pub const HANDLE: i32 = 5;
/// Subclass marker (`100 AcDbEntity`)
pub const SUBCLASS_MARKER: i32 = 100;
/// Embedded object marker (`101 Embedded Object`)
pub const EMBEDDED_OBJ_MARKER: i32 = 101;
/// Application defined data group (`102 {ACAD_REACTORS` … `102 }`)
pub const APP_DATA_MARKER: i32 = 102;
/// Owner handle
pub const OWNER_HANDLE: i32 = 330;
/// Comment, ignored by all AutoCAD versions
pub const COMMENT: i32 = 999;
/// XDATA application name, starts an XDATA group
pub const XDATA_MARKER: i32 = 1001;
/// Largest group code defined by the DXF reference
pub const MAX_GROUP_CODE: i32 = 1071;

/// Value type of a group code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCodeValueType {
    /// Code outside the documented ranges
    None,
    String,
    /// Hexadecimal handle string
    Handle,
    Double,
    /// First code of a 2D/3D coordinate
    Point,
    Int16,
    Int32,
    Int64,
    /// 8-bit integer (280-289)
    Byte,
    /// Boolean flag (290-299)
    Bool,
    /// Binary chunk (310-319, 1004)
    Binary,
}

impl GroupCodeValueType {
    /// Classify a group code
    pub fn from_code(code: i32) -> Self {
        use GroupCodeValueType::*;
        if is_point_code(code) {
            return Point;
        }
        match code {
            5 | 105 => Handle,
            0..=9 => String,
            10..=59 => Double,
            60..=79 => Int16,
            90..=99 => Int32,
            100..=102 => String,
            110..=149 => Double,
            160..=169 => Int64,
            170..=179 => Int16,
            210..=239 => Double,
            270..=279 => Int16,
            280..=289 => Byte,
            290..=299 => Bool,
            300..=309 => String,
            310..=319 => Binary,
            320..=369 => Handle,
            370..=389 => Int16,
            390..=399 => Handle,
            400..=409 => Int16,
            410..=419 => String,
            420..=429 => Int32,
            430..=439 => String,
            440..=459 => Int32,
            460..=469 => Double,
            470..=479 => String,
            480..=481 => Handle,
            999 => String,
            1004 => Binary,
            1005 => Handle,
            1000..=1009 => String,
            1010..=1059 => Double,
            1060..=1070 => Int16,
            1071 => Int32,
            _ => None,
        }
    }

    /// True for value types stored as integers
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            GroupCodeValueType::Int16
                | GroupCodeValueType::Int32
                | GroupCodeValueType::Int64
                | GroupCodeValueType::Byte
                | GroupCodeValueType::Bool
        )
    }
}

/// True if `code` is the x-code of a coordinate
pub fn is_point_code(code: i32) -> bool {
    matches!(code, 10..=18 | 110..=112 | 210 | 1010..=1013)
}

/// True for codes that are only valid inside XDATA
pub fn is_xdata_code(code: i32) -> bool {
    (1000..=MAX_GROUP_CODE).contains(&code)
}

/// True for codes inside the documented range
pub fn is_valid_code(code: i32) -> bool {
    (0..=MAX_GROUP_CODE).contains(&code) || (-5..=-1).contains(&code)
}
