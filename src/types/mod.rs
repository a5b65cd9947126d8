//! Basic value types shared by tags, schemas and entities

pub mod handle;
pub mod vector;
pub mod version;

pub use handle::Handle;
pub use vector::{Vector2, Vector3};
pub use version::DxfVersion;
