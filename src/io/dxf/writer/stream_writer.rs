//! DXF stream writer trait and common types

use crate::error::{DxfError, Result};
use crate::tags::{GroupCodeValueType, Tag, TagValue};
use crate::types::{Handle, Vector2, Vector3};

/// Trait for writing DXF code/value pairs
pub trait DxfStreamWriter {
    /// Write a code/value pair with a string value
    fn write_string(&mut self, code: i32, value: &str) -> Result<()>;

    /// Write a code/value pair for the byte codes 280-289.
    ///
    /// Both encodings store these as 16-bit integers and the readers accept
    /// the full `i16` range, so negative values must survive as well.
    fn write_byte(&mut self, code: i32, value: i16) -> Result<()>;

    /// Write a code/value pair with an integer value
    fn write_i16(&mut self, code: i32, value: i16) -> Result<()>;

    /// Write a code/value pair with an i32 value
    fn write_i32(&mut self, code: i32, value: i32) -> Result<()>;

    /// Write a code/value pair with an i64 value
    fn write_i64(&mut self, code: i32, value: i64) -> Result<()>;

    /// Write a code/value pair with a double value
    fn write_double(&mut self, code: i32, value: f64) -> Result<()>;

    /// Write a code/value pair with a boolean value
    fn write_bool(&mut self, code: i32, value: bool) -> Result<()>;

    /// Write a code/value pair with a handle value
    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()>;

    /// Write binary data
    fn write_binary(&mut self, code: i32, data: &[u8]) -> Result<()>;

    /// Flush the writer
    fn flush(&mut self) -> Result<()>;

    /// Write a compiled tag. Points expand to their x/y[/z] pairs, other
    /// values are written with the type their group code declares.
    fn write_tag(&mut self, tag: &Tag) -> Result<()> {
        let code = tag.code();
        match tag.value() {
            TagValue::Point2(p) => {
                self.write_double(code, p.x)?;
                self.write_double(code + 10, p.y)
            }
            TagValue::Point3(p) => {
                self.write_double(code, p.x)?;
                self.write_double(code + 10, p.y)?;
                self.write_double(code + 20, p.z)
            }
            TagValue::Str(s) => self.write_string(code, s),
            TagValue::Binary(data) => self.write_binary(code, data),
            TagValue::Float(v) => match GroupCodeValueType::from_code(code) {
                vt if vt.is_integer() => Err(mismatch(tag)),
                _ => self.write_double(code, *v),
            },
            TagValue::Int(v) => match GroupCodeValueType::from_code(code) {
                GroupCodeValueType::Int16 => self.write_i16(code, narrow(tag, *v)?),
                GroupCodeValueType::Int32 => self.write_i32(code, narrow(tag, *v)?),
                GroupCodeValueType::Byte => self.write_byte(code, narrow(tag, *v)?),
                GroupCodeValueType::Bool => self.write_bool(code, *v != 0),
                GroupCodeValueType::Double | GroupCodeValueType::Point => {
                    self.write_double(code, *v as f64)
                }
                GroupCodeValueType::Int64 => self.write_i64(code, *v),
                _ => self.write_string(code, &v.to_string()),
            },
        }
    }
}

fn narrow<T: TryFrom<i64>>(tag: &Tag, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| mismatch(tag))
}

fn mismatch(tag: &Tag) -> DxfError {
    DxfError::Custom(format!(
        "value {} out of range for group code {}",
        tag.value(),
        tag.code()
    ))
}

/// Extension trait for convenient writing operations
pub trait DxfStreamWriterExt: DxfStreamWriter {
    /// Write a 2D point (codes 10/20 or similar)
    fn write_point2d(&mut self, x_code: i32, point: Vector2) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)?;
        Ok(())
    }

    /// Write a 3D point (codes 10/20/30 or similar)
    fn write_point3d(&mut self, x_code: i32, point: Vector3) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)?;
        self.write_double(x_code + 20, point.z)?;
        Ok(())
    }

    /// Write section start
    fn write_section_start(&mut self, section_name: &str) -> Result<()> {
        self.write_string(0, "SECTION")?;
        self.write_string(2, section_name)?;
        Ok(())
    }

    /// Write section end
    fn write_section_end(&mut self) -> Result<()> {
        self.write_string(0, "ENDSEC")
    }

    /// Write end of file
    fn write_eof(&mut self) -> Result<()> {
        self.write_string(0, "EOF")
    }
}

// Auto-implement the extension trait for all stream writers
impl<T: DxfStreamWriter + ?Sized> DxfStreamWriterExt for T {}
