//! Built-in entity schemas
//!
//! Attribute order inside each subclass is the export order for entities
//! created from scratch. Loaded entities keep their source order.

use super::{AttributeSpec as A, EntitySchema, Fixer, SubclassDef, ValueKind as K, NULLVEC};
use crate::types::{DxfVersion, Vector3};

use validators::*;

/// Value checks shared by the built-in schemas
pub mod validators {
    use crate::tags::TagValue;
    use crate::types::DxfVersion;

    /// ACI color: 0 = by block, 256 = by layer, 257 = by object (R2004+)
    pub fn is_valid_aci_color(value: &TagValue, version: DxfVersion) -> bool {
        match value.as_int() {
            Some(257) => version >= DxfVersion::R2004,
            Some(c) => (0..=256).contains(&c),
            None => false,
        }
    }

    /// Standard line weights in 1/100 mm, plus -1 by layer, -2 by block, -3 default
    pub fn is_valid_lineweight(value: &TagValue, _version: DxfVersion) -> bool {
        const VALID: [i64; 27] = [
            -3, -2, -1, 0, 5, 9, 13, 15, 18, 20, 25, 30, 35, 40, 50, 53, 60, 70, 80, 90, 100, 106,
            120, 140, 158, 200, 211,
        ];
        value.as_int().map_or(false, |lw| VALID.contains(&lw))
    }

    pub fn is_not_null_vector(value: &TagValue, _version: DxfVersion) -> bool {
        value.as_point().map_or(false, |p| !p.is_null())
    }

    pub fn is_greater_zero(value: &TagValue, _version: DxfVersion) -> bool {
        value.as_float().map_or(false, |v| v > 0.0)
    }

    pub fn is_zero_or_one(value: &TagValue, _version: DxfVersion) -> bool {
        matches!(value.as_int(), Some(0) | Some(1))
    }

    /// TEXT horizontal alignment 0..=5
    pub fn is_valid_halign(value: &TagValue, _version: DxfVersion) -> bool {
        value.as_int().map_or(false, |v| (0..=5).contains(&v))
    }

    /// TEXT vertical alignment 0..=3
    pub fn is_valid_valign(value: &TagValue, _version: DxfVersion) -> bool {
        value.as_int().map_or(false, |v| (0..=3).contains(&v))
    }

    /// MTEXT attachment point 1..=9
    pub fn is_valid_attachment_point(value: &TagValue, _version: DxfVersion) -> bool {
        value.as_int().map_or(false, |v| (1..=9).contains(&v))
    }

    /// MTEXT flow direction: 1 left to right, 3 top to bottom, 5 by style
    pub fn is_valid_flow_direction(value: &TagValue, _version: DxfVersion) -> bool {
        matches!(value.as_int(), Some(1) | Some(3) | Some(5))
    }

    /// Shadow mode 0..=3
    pub fn is_valid_shadow_mode(value: &TagValue, _version: DxfVersion) -> bool {
        value.as_int().map_or(false, |v| (0..=3).contains(&v))
    }
}

/// Handle and owner, the group without subclass marker
fn base_class() -> SubclassDef {
    SubclassDef::new(
        None,
        vec![
            A::new("handle", 5, K::Handle),
            A::new("owner", 330, K::Handle).since(DxfVersion::AC1012),
        ],
    )
}

/// Graphic attributes shared by all entities
fn acdb_entity() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbEntity"),
        vec![
            A::new("paperspace", 67, K::Int16)
                .default(0)
                .optional()
                .validator(is_zero_or_one)
                .fixer(Fixer::ReturnDefault),
            A::new("layer", 8, K::String).default("0"),
            A::new("linetype", 6, K::String).default("BYLAYER").optional(),
            A::new("material_handle", 347, K::Handle).since(DxfVersion::R2007).optional(),
            A::new("color", 62, K::Int16)
                .default(256)
                .optional()
                .validator(is_valid_aci_color)
                .fixer(Fixer::ReturnDefault),
            A::new("lineweight", 370, K::Int16)
                .default(-1)
                .since(DxfVersion::R2000)
                .optional()
                .validator(is_valid_lineweight)
                .fixer(Fixer::ReturnDefault),
            A::new("ltscale", 48, K::Float)
                .default(1.0)
                .since(DxfVersion::R2000)
                .optional()
                .validator(is_greater_zero)
                .fixer(Fixer::ReturnDefault),
            A::new("invisible", 60, K::Int16)
                .default(0)
                .since(DxfVersion::R2000)
                .optional(),
            A::new("true_color", 420, K::Int32).since(DxfVersion::R2004).optional(),
            A::new("color_name", 430, K::String).since(DxfVersion::R2004).optional(),
            A::new("transparency", 440, K::Int32).since(DxfVersion::R2004).optional(),
            A::new("plotstyle_enum", 380, K::Int16)
                .default(1)
                .since(DxfVersion::R2007)
                .optional(),
            A::new("plotstyle_handle", 390, K::Handle).since(DxfVersion::R2007).optional(),
            A::new("shadow_mode", 284, K::Byte)
                .since(DxfVersion::R2007)
                .optional()
                .validator(is_valid_shadow_mode),
            A::new("visualstyle_handle", 348, K::Handle).since(DxfVersion::R2010).optional(),
        ],
    )
}

fn thickness() -> A {
    A::new("thickness", 39, K::Float).default(0.0).optional()
}

fn extrusion() -> A {
    A::new("extrusion", 210, K::Point3D)
        .default(Vector3::UNIT_Z)
        .optional()
        .validator(is_not_null_vector)
        .fixer(Fixer::ReturnDefault)
}

fn graphic(dxftype: &str, specific: Vec<SubclassDef>) -> EntitySchema {
    let mut subclasses = vec![base_class(), acdb_entity()];
    subclasses.extend(specific);
    EntitySchema::new(dxftype, subclasses)
}

fn acdb_line() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbLine"),
        vec![
            A::new("start", 10, K::Point3D).default(NULLVEC),
            A::new("end", 11, K::Point3D).default(NULLVEC),
            thickness(),
            extrusion(),
        ],
    )
}

fn acdb_point() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbPoint"),
        vec![
            A::new("location", 10, K::Point3D).default(NULLVEC),
            thickness(),
            extrusion(),
            A::new("angle", 50, K::Float).default(0.0).optional(),
        ],
    )
}

fn acdb_circle() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbCircle"),
        vec![
            A::new("center", 10, K::Point3D).default(NULLVEC),
            A::new("radius", 40, K::Float).default(1.0),
            thickness(),
            extrusion(),
        ],
    )
}

fn acdb_arc() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbArc"),
        vec![
            A::new("start_angle", 50, K::Float).default(0.0),
            A::new("end_angle", 51, K::Float).default(360.0),
        ],
    )
}

/// SOLID and TRACE corners (OCS), a missing 4th corner repeats the 3rd
fn acdb_trace() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbTrace"),
        vec![
            A::new("vtx0", 10, K::Point3D).default(NULLVEC),
            A::new("vtx1", 11, K::Point3D).default(NULLVEC),
            A::new("vtx2", 12, K::Point3D).default(NULLVEC),
            A::new("vtx3", 13, K::Point3D).default_from("vtx2"),
            thickness(),
            extrusion(),
        ],
    )
}

/// 3DFACE corners (WCS), bit n of `invisible_edge` hides edge n
fn acdb_face() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbFace"),
        vec![
            A::new("vtx0", 10, K::Point3D).default(NULLVEC),
            A::new("vtx1", 11, K::Point3D).default(NULLVEC),
            A::new("vtx2", 12, K::Point3D).default(NULLVEC),
            A::new("vtx3", 13, K::Point3D).default_from("vtx2"),
            A::new("invisible_edge", 70, K::Int16).default(0).optional(),
        ],
    )
}

/// Text geometry shared by TEXT, ATTDEF and ATTRIB
fn acdb_text() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbText"),
        vec![
            A::new("insert", 10, K::Point3D).default(NULLVEC),
            A::new("height", 40, K::Float)
                .default(2.5)
                .validator(is_greater_zero)
                .fixer(Fixer::ReturnDefault),
            A::new("text", 1, K::String).default(""),
            thickness(),
            A::new("rotation", 50, K::Float).default(0.0).optional(),
            A::new("oblique", 51, K::Float).default(0.0).optional(),
            A::new("style", 7, K::String).default("Standard").optional(),
            A::new("width", 41, K::Float)
                .default(1.0)
                .optional()
                .validator(is_greater_zero)
                .fixer(Fixer::ReturnDefault),
            A::new("text_generation_flag", 71, K::Int16).default(0).optional(),
            A::new("halign", 72, K::Int16)
                .default(0)
                .optional()
                .validator(is_valid_halign)
                .fixer(Fixer::ReturnDefault),
            A::new("align_point", 11, K::Point3D).optional(),
            extrusion(),
        ],
    )
}

/// The second AcDbText group of TEXT holds the vertical alignment only
fn acdb_text2() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbText"),
        vec![A::new("valign", 73, K::Int16)
            .default(0)
            .optional()
            .validator(is_valid_valign)
            .fixer(Fixer::ReturnDefault)],
    )
}

/// Attribute data of ATTDEF (`prompt` present) or ATTRIB
fn attribute_data(marker: &'static str, with_prompt: bool) -> SubclassDef {
    let mut attrs = vec![A::new("version", 280, K::Byte).default(0).since(DxfVersion::R2010)];
    if with_prompt {
        attrs.push(A::new("prompt", 3, K::String).default(""));
    }
    attrs.extend([
        A::new("tag", 2, K::String).default(""),
        A::new("flags", 70, K::Int16).default(0),
        A::new("field_length", 73, K::Int16)
            .default(0)
            .since(DxfVersion::R2000)
            .optional(),
        A::new("valign", 74, K::Int16)
            .default(0)
            .optional()
            .validator(is_valid_valign)
            .fixer(Fixer::ReturnDefault),
        A::new("lock_position", 280, K::Byte)
            .default(0)
            .since(DxfVersion::R2010)
            .optional(),
    ]);
    SubclassDef::new(Some(marker), attrs)
}

fn acdb_block_reference() -> SubclassDef {
    SubclassDef::new(
        Some("AcDbBlockReference"),
        vec![
            A::new("attribs_follow", 66, K::Int16).default(0).optional(),
            A::new("name", 2, K::String).default(""),
            A::new("insert", 10, K::Point3D).default(NULLVEC),
            A::new("xscale", 41, K::Float).default(1.0).optional(),
            A::new("yscale", 42, K::Float).default(1.0).optional(),
            A::new("zscale", 43, K::Float).default(1.0).optional(),
            A::new("rotation", 50, K::Float).default(0.0).optional(),
            A::new("column_count", 70, K::Int16).default(1).optional(),
            A::new("row_count", 71, K::Int16).default(1).optional(),
            A::new("column_spacing", 44, K::Float).default(0.0).optional(),
            A::new("row_spacing", 45, K::Float).default(0.0).optional(),
            extrusion(),
        ],
    )
}

/// MTEXT attributes. The embedded variant carries no version brackets,
/// its presence is gated as a whole.
fn mtext_attributes(embedded: bool) -> Vec<A> {
    let r2007 = if embedded { DxfVersion::R12 } else { DxfVersion::R2007 };
    vec![
        A::new("insert", 10, K::Point3D).default(NULLVEC),
        A::new("char_height", 40, K::Float)
            .default(2.5)
            .validator(is_greater_zero)
            .fixer(Fixer::ReturnDefault),
        A::new("width", 41, K::Float).default(0.0).optional(),
        A::new("defined_height", 46, K::Float).default(0.0).since(r2007).optional(),
        A::new("attachment_point", 71, K::Int16)
            .default(1)
            .validator(is_valid_attachment_point)
            .fixer(Fixer::ReturnDefault),
        A::new("flow_direction", 72, K::Int16)
            .default(1)
            .optional()
            .validator(is_valid_flow_direction)
            .fixer(Fixer::ReturnDefault),
        A::new("text", 1, K::String).default(""),
        A::new("style", 7, K::String).default("Standard").optional(),
        extrusion(),
        A::new("text_direction", 11, K::Point3D).optional(),
        A::new("rect_width", 42, K::Float).optional(),
        A::new("rect_height", 43, K::Float).optional(),
        A::new("rotation", 50, K::Float).default(0.0).optional(),
        A::new("line_spacing_style", 73, K::Int16).default(1).optional(),
        A::new("line_spacing_factor", 44, K::Float).default(1.0).optional(),
        A::new("bg_fill", 90, K::Int32).default(0).since(r2007).optional(),
        A::new("bg_fill_color", 63, K::Int16).since(r2007).optional(),
        A::new("box_fill_scale", 45, K::Float).since(r2007).optional(),
        A::new("bg_fill_true_color", 421, K::Int32).since(r2007).optional(),
        A::new("bg_fill_color_name", 431, K::String).since(r2007).optional(),
        A::new("bg_fill_transparency", 441, K::Int32).since(r2007).optional(),
    ]
}

/// Schema of the object embedded in ATTDEF/ATTRIB (R2018+)
pub(super) fn embedded_mtext_schema() -> EntitySchema {
    EntitySchema::new(
        super::EMBEDDED_MTEXT,
        vec![SubclassDef::new(None, mtext_attributes(true))],
    )
    .since(DxfVersion::R2018)
}

/// All built-in entity schemas
pub(super) fn entity_schemas() -> Vec<EntitySchema> {
    vec![
        graphic("LINE", vec![acdb_line()]),
        graphic("POINT", vec![acdb_point()]),
        graphic("CIRCLE", vec![acdb_circle()]),
        graphic("ARC", vec![acdb_circle(), acdb_arc()]),
        graphic("SOLID", vec![acdb_trace()]),
        graphic("TRACE", vec![acdb_trace()]),
        graphic("3DFACE", vec![acdb_face()]),
        graphic("TEXT", vec![acdb_text(), acdb_text2()]),
        graphic("ATTDEF", vec![acdb_text(), attribute_data("AcDbAttributeDefinition", true)]),
        graphic("ATTRIB", vec![acdb_text(), attribute_data("AcDbAttribute", false)]),
        graphic("INSERT", vec![acdb_block_reference()]),
        graphic(
            "MTEXT",
            vec![SubclassDef::new(Some("AcDbMText"), mtext_attributes(false))],
        )
        .since(DxfVersion::AC1012),
    ]
}
