//! Coordinate values carried by point tags and point attributes

use std::fmt;

/// Absolute tolerance used by [`Vector3::is_close`]
pub const ABS_TOL: f64 = 1e-12;

/// 2D coordinate (x, y), stored by DXF as two tags
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Create a new 2D vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Zero vector
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    /// Lift into 3D with z = 0.0
    pub const fn to_3d(self) -> Vector3 {
        Vector3::new(self.x, self.y, 0.0)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2::new(x, y)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 3D coordinate (x, y, z), stored by DXF as three tags
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Create a new 3D vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    /// Unit Z vector, the default extrusion direction
    pub const UNIT_Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    /// Drop the z-axis
    pub const fn xy(self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    /// True if all components are (almost) zero
    pub fn is_null(&self) -> bool {
        self.x.abs() <= ABS_TOL && self.y.abs() <= ABS_TOL && self.z.abs() <= ABS_TOL
    }

    /// Component-wise comparison with an absolute tolerance
    pub fn is_close(&self, other: &Vector3, abs_tol: f64) -> bool {
        (self.x - other.x).abs() <= abs_tol
            && (self.y - other.y).abs() <= abs_tol
            && (self.z - other.z).abs() <= abs_tol
    }
}

impl From<(f64, f64, f64)> for Vector3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Vector3::new(x, y, z)
    }
}

impl From<Vector2> for Vector3 {
    fn from(v: Vector2) -> Self {
        v.to_3d()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
