//! ATTDEF and ATTRIB helpers

use bitflags::bitflags;

use super::mtext::plain_mtext;
use super::Entity;
use crate::error::{DxfError, Result};
use crate::schema::SchemaRegistry;

bitflags! {
    /// Attribute flags (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttributeFlags: i16 {
        /// Attribute is invisible (does not appear)
        const INVISIBLE = 1;
        /// Constant value, not prompted on insertion
        const CONST = 2;
        /// Verification required on input
        const VERIFY = 4;
        /// Preset, inserted without prompting
        const PRESET = 8;
    }
}

impl Entity {
    /// Flags of ATTDEF and ATTRIB entities
    pub fn attribute_flags(&self) -> Result<AttributeFlags> {
        let bits = self.dxf().get_int("flags")?;
        let bits = i16::try_from(bits).map_err(|_| DxfError::InvalidAttributeValue {
            attribute: format!("{}.flags", self.dxftype()),
            expected: "16-bit integer",
        })?;
        Ok(AttributeFlags::from_bits_retain(bits))
    }

    pub fn set_attribute_flags(&mut self, flags: AttributeFlags) -> Result<()> {
        self.dxf_mut().set("flags", flags.bits() as i64)
    }

    /// True if an embedded MTEXT object was loaded (DXF R2018)
    pub fn has_embedded_mtext(&self) -> bool {
        self.embedded.is_some()
    }

    /// Content of the embedded MTEXT without formatting codes
    pub fn plain_mtext(&self) -> Option<String> {
        self.embedded.as_ref().map(|e| plain_mtext(&e.text()))
    }

    /// Stand-alone MTEXT entity of the embedded object
    pub fn virtual_mtext_entity(&self, registry: &SchemaRegistry) -> Result<Entity> {
        let embedded = self.embedded.as_ref().ok_or_else(|| {
            DxfError::Custom(format!("{} has no embedded MTEXT object", self.dxftype()))
        })?;
        embedded.virtual_entity(self, registry)
    }
}
