//! DXF file format versions

use std::fmt;

/// DXF version, identified by the `$ACADVER` header string.
///
/// Variants are ordered by release, so `<`/`>` compare versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DxfVersion {
    /// R12
    AC1009,
    /// R13
    AC1012,
    /// R14
    AC1014,
    /// R2000
    AC1015,
    /// R2004
    AC1018,
    /// R2007
    AC1021,
    /// R2010
    AC1024,
    /// R2013
    AC1027,
    /// R2018
    AC1032,
}

impl DxfVersion {
    /// All known versions, oldest first
    pub const ALL: [DxfVersion; 9] = [
        DxfVersion::AC1009,
        DxfVersion::AC1012,
        DxfVersion::AC1014,
        DxfVersion::AC1015,
        DxfVersion::AC1018,
        DxfVersion::AC1021,
        DxfVersion::AC1024,
        DxfVersion::AC1027,
        DxfVersion::AC1032,
    ];

    /// Alias for AC1009
    pub const R12: DxfVersion = DxfVersion::AC1009;
    /// Alias for AC1015
    pub const R2000: DxfVersion = DxfVersion::AC1015;
    /// Alias for AC1018
    pub const R2004: DxfVersion = DxfVersion::AC1018;
    /// Alias for AC1021
    pub const R2007: DxfVersion = DxfVersion::AC1021;
    /// Alias for AC1024
    pub const R2010: DxfVersion = DxfVersion::AC1024;
    /// Alias for AC1032
    pub const R2018: DxfVersion = DxfVersion::AC1032;

    /// Parse an `$ACADVER` value such as `"AC1015"`.
    ///
    /// AC1006 and older are read as R12, the oldest layout handled here.
    pub fn from_version_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AC1006" | "AC1009" => Some(DxfVersion::AC1009),
            "AC1012" => Some(DxfVersion::AC1012),
            "AC1014" => Some(DxfVersion::AC1014),
            "AC1015" => Some(DxfVersion::AC1015),
            "AC1018" => Some(DxfVersion::AC1018),
            "AC1021" => Some(DxfVersion::AC1021),
            "AC1024" => Some(DxfVersion::AC1024),
            "AC1027" => Some(DxfVersion::AC1027),
            "AC1032" => Some(DxfVersion::AC1032),
            _ => None,
        }
    }

    /// The `$ACADVER` string
    pub fn as_str(&self) -> &'static str {
        match self {
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1012 => "AC1012",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }

    /// R12 and older have no subclass markers
    pub fn is_r12(&self) -> bool {
        *self <= DxfVersion::AC1009
    }

    /// AC1021 and later are always UTF-8 encoded
    pub fn is_unicode(&self) -> bool {
        *self >= DxfVersion::AC1021
    }
}

impl Default for DxfVersion {
    fn default() -> Self {
        DxfVersion::AC1032
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        assert_eq!(DxfVersion::from_version_string("AC1015"), Some(DxfVersion::R2000));
        assert_eq!(DxfVersion::from_version_string(" ac1032 "), Some(DxfVersion::AC1032));
        assert_eq!(DxfVersion::from_version_string("AC1006"), Some(DxfVersion::R12));
        assert_eq!(DxfVersion::from_version_string("AC9999"), None);
    }

    #[test]
    fn test_version_ordering() {
        assert!(DxfVersion::R12 < DxfVersion::R2000);
        assert!(DxfVersion::R2007 > DxfVersion::R2004);
        assert!(DxfVersion::R12.is_r12());
        assert!(!DxfVersion::AC1012.is_r12());
    }

    #[test]
    fn test_version_roundtrip() {
        for v in DxfVersion::ALL {
            assert_eq!(DxfVersion::from_version_string(v.as_str()), Some(v));
        }
    }
}
