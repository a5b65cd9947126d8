//! ATTDEF loading and export across DXF versions, including the embedded
//! MTEXT object of DXF R2018.

mod common;

use common::*;
use lldxf::notification::NotificationType;
use lldxf::{DxfVersion, NotificationCollection, Tag, Vector3};

// ===========================================================================
// Exact round trips
// ===========================================================================

#[test]
fn test_r12_record_exports_unchanged() {
    let attdef = load_typed(ATTDEF_R12, DxfVersion::R12);
    assert!(attdef.is_flat());
    assert_eq!(export(&attdef, DxfVersion::R12, true), tags(ATTDEF_R12));
}

#[test]
fn test_r2000_record_exports_unchanged() {
    let attdef = load_typed(ATTDEF_R2000, DxfVersion::R2000);
    assert!(!attdef.is_flat());
    assert_eq!(export(&attdef, DxfVersion::R2000, true), tags(ATTDEF_R2000));
}

#[test]
fn test_r2018_record_exports_unchanged() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    assert_eq!(
        export(&attdef, DxfVersion::R2018, true),
        tags(ATTDEF_EMBEDDED_MTEXT)
    );
    assert_eq!(
        export_via_text(&attdef, DxfVersion::R2018, true),
        tags(ATTDEF_EMBEDDED_MTEXT)
    );
}

#[test]
fn test_r2000_record_exported_as_r12() {
    let attdef = load_typed(ATTDEF_R2000, DxfVersion::R2000);
    assert_eq!(export(&attdef, DxfVersion::R12, true), tags(ATTDEF_R12));
}

#[test]
fn test_r12_record_exported_as_r2000_gets_markers() {
    let attdef = load_typed(ATTDEF_R12, DxfVersion::R12);
    let tags = export(&attdef, DxfVersion::R2000, true);
    let markers: Vec<&str> = tags
        .find_all(100)
        .filter_map(|t| t.value().as_str())
        .collect();
    assert_eq!(markers, ["AcDbEntity", "AcDbText", "AcDbAttributeDefinition"]);
    assert_eq!(tags.get_first_value(3).and_then(|v| v.as_str()), Some("PROMPTTEXT"));
}

// ===========================================================================
// Attribute access
// ===========================================================================

#[test]
fn test_r12_attributes() {
    let attdef = load_typed(ATTDEF_R12, DxfVersion::R12);
    let dxf = attdef.dxf();
    assert_eq!(dxf.get_str("layer").unwrap(), "0");
    assert_eq!(dxf.get_int("color").unwrap(), 256);
    assert_eq!(dxf.get_point("insert").unwrap(), Vector3::ZERO);
    assert_eq!(dxf.get_str("prompt").unwrap(), "PROMPTTEXT");
    assert_eq!(dxf.get_str("tag").unwrap(), "TAG");
    assert!(attdef.attribute_flags().unwrap().is_empty());
    assert!(!attdef.has_embedded_mtext());
}

#[test]
fn test_duplicate_codes_assigned_by_position() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    assert!(attdef.dxf().has_explicit("version"));
    assert!(attdef.dxf().has_explicit("lock_position"));
    assert_eq!(attdef.dxf().get_int("valign").unwrap(), 2);
    let unknown: Vec<i32> = attdef.unknown_tags().iter().map(|t| t.code()).collect();
    assert_eq!(unknown, [71, 72, 11]);
}

#[test]
fn test_xdata_preserved() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    let record = attdef.xdata_record("AcadAnnotative").unwrap();
    assert_eq!(record.len(), 5);
}

#[test]
fn test_byte_codes_survive_text() {
    let text = ATTDEF_EMBEDDED_MTEXT.replacen("280\n0\n", "280\n-1\n", 1);
    let mut attdef = load_typed(&text, DxfVersion::R2018);
    assert_eq!(attdef.dxf().get_int("version").unwrap(), -1);
    attdef.dxf_mut().set("lock_position", 255).unwrap();

    let written = export_via_text(&attdef, DxfVersion::R2018, true);
    let mut notes = NotificationCollection::new();
    let reloaded = factory(DxfVersion::R2018)
        .load_tags_record(written, &mut notes)
        .unwrap();
    let reloaded = reloaded.as_typed().unwrap();
    assert_eq!(reloaded.dxf().get_int("version").unwrap(), -1);
    assert_eq!(reloaded.dxf().get_int("lock_position").unwrap(), 255);
}

// ===========================================================================
// Embedded MTEXT
// ===========================================================================

#[test]
fn test_plain_mtext() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    assert!(attdef.has_embedded_mtext());
    assert_eq!(
        attdef.plain_mtext().as_deref(),
        Some("TEST VENUE\nTEST FLOOR PLAN")
    );
}

#[test]
fn test_virtual_mtext_entity() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    let mtext = attdef.virtual_mtext_entity(registry()).unwrap();
    let dxf = mtext.dxf();
    assert_eq!(mtext.dxftype(), "MTEXT");
    assert_eq!(dxf.get_int("color").unwrap(), 7);
    assert_eq!(dxf.get_str("layer").unwrap(), "AttribLayer");
    assert_eq!(dxf.get_point("insert").unwrap(), Vector3::new(45.3, 45.0, 0.0));
    assert_eq!(dxf.get_float("char_height").unwrap(), 3.0);
    assert_eq!(dxf.get_float("width").unwrap(), 0.0);
    assert_eq!(dxf.get_float("defined_height").unwrap(), 0.0);
    assert_eq!(dxf.get_int("attachment_point").unwrap(), 5);
    assert_eq!(dxf.get_int("flow_direction").unwrap(), 5);
    assert_eq!(dxf.get_str("style").unwrap(), "Arial_3 NARROW");
    assert_eq!(dxf.get_int("line_spacing_style").unwrap(), 1);
    assert_eq!(dxf.get_float("line_spacing_factor").unwrap(), 1.0);
    assert_eq!(mtext.plain_text().unwrap(), "TEST VENUE\nTEST FLOOR PLAN");
}

#[test]
fn test_virtual_mtext_is_independent() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    let mut mtext = attdef.virtual_mtext_entity(registry()).unwrap();
    mtext.dxf_mut().set("layer", "OTHER").unwrap();
    assert_eq!(attdef.dxf().get_str("layer").unwrap(), "AttribLayer");
    assert_eq!(
        export(&attdef, DxfVersion::R2018, true),
        tags(ATTDEF_EMBEDDED_MTEXT)
    );
}

#[test]
fn test_embedded_object_dropped_for_older_versions() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    let mut notes = NotificationCollection::new();
    let tags = exporter(DxfVersion::R2010, true)
        .export_entity(&attdef, &mut notes)
        .unwrap();
    assert!(!tags.has_tag(101));
    assert!(tags.has_tag(1001));
    assert!(notes.has_type(NotificationType::NotSupported));
}

#[test]
fn test_r12_export_drops_markers() {
    let attdef = load_typed(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018);
    let tags = export(&attdef, DxfVersion::R12, true);
    assert_eq!(tags[0], Tag::str(0, "ATTDEF"));
    assert!(!tags.has_tag(100));
    assert!(!tags.has_tag(330));
    assert!(!tags.has_tag(101));
}
