//! Load/export round trips for all registered entity types

mod common;

use common::*;
use lldxf::io::dxf::{tags_from_text, tags_to_text};
use lldxf::{
    DxfEntity, DxfError, DxfVersion, Entity, NotificationCollection, Tag, TagValue, Tags,
    ValueKind, Vector2, Vector3,
};
use proptest::prelude::*;

/// Valid sample value of `kind`
fn sample(kind: ValueKind) -> TagValue {
    match kind {
        ValueKind::String => "X".into(),
        ValueKind::Handle => "1A".into(),
        ValueKind::Int16 | ValueKind::Int32 | ValueKind::Int64 | ValueKind::Byte | ValueKind::Bool => {
            TagValue::Int(1)
        }
        ValueKind::Float => TagValue::Float(1.5),
        ValueKind::Point2D => Vector2::new(1.0, 2.0).into(),
        ValueKind::Point3D | ValueKind::AnyPoint => (1.0, 2.0, 3.0).into(),
        ValueKind::Binary => TagValue::Binary(vec![0x01, 0xFF]),
    }
}

/// New entity with every attribute of `version` explicitly set
fn fully_populated(dxftype: &str, version: DxfVersion) -> Entity {
    let mut entity = factory(version).new_entity(dxftype).unwrap();
    let schema = entity.dxf().schema().clone();
    for subclass in schema.subclasses() {
        for spec in &subclass.attributes {
            let value = sample(spec.kind);
            if spec.is_supported(version) && spec.is_valid(&value, version) {
                entity.dxf_mut().set(spec.name, value).unwrap();
            }
        }
    }
    entity
}

fn reload(tags: &Tags, version: DxfVersion) -> Entity {
    let mut notes = NotificationCollection::new();
    match factory(version).load_tags_record(tags.clone(), &mut notes).unwrap() {
        DxfEntity::Typed(entity) => entity,
        DxfEntity::Unsupported(_) => panic!("registered type loaded as unsupported"),
    }
}

// ===========================================================================
// All registered types
// ===========================================================================

#[test]
fn test_all_types_round_trip() {
    let version = DxfVersion::R2018;
    for dxftype in registry().dxftypes() {
        let entity = fully_populated(dxftype, version);
        let first = export(&entity, version, false);
        let loaded = reload(&first, version);
        assert_eq!(export(&loaded, version, false), first, "{}", dxftype);
        assert!(loaded.unknown_tags().is_empty(), "{}", dxftype);
    }
}

#[test]
fn test_all_types_round_trip_through_text() {
    let version = DxfVersion::R2018;
    for dxftype in registry().dxftypes() {
        let entity = fully_populated(dxftype, version);
        let first = export(&entity, version, false);
        let text = tags_to_text(&first).unwrap();
        assert_eq!(tags_from_text(&text).unwrap(), first, "{}", dxftype);
        let loaded = reload(&tags_from_text(&text).unwrap(), version);
        assert_eq!(export(&loaded, version, false), first, "{}", dxftype);
    }
}

#[test]
fn test_all_types_round_trip_r12() {
    let version = DxfVersion::R12;
    for dxftype in registry().dxftypes() {
        if dxftype == "MTEXT" {
            continue;
        }
        let entity = fully_populated(dxftype, version);
        let first = export(&entity, version, true);
        assert!(!first.has_tag(100), "{}", dxftype);
        let loaded = reload(&first, version);
        assert!(loaded.is_flat());
        assert_eq!(export(&loaded, version, true), first, "{}", dxftype);
    }
}

#[test]
fn test_mtext_not_exportable_as_r12() {
    let mtext = factory(DxfVersion::R2000).new_entity("MTEXT").unwrap();
    let mut notes = NotificationCollection::new();
    assert!(matches!(
        exporter(DxfVersion::R12, true).export_entity(&mtext, &mut notes),
        Err(DxfError::UnsupportedVersion(_))
    ));
}

// ===========================================================================
// Export rules
// ===========================================================================

#[test]
fn test_optional_defaults_suppressed() {
    let line = factory(DxfVersion::R2000).new_entity("LINE").unwrap();
    let compact = export(&line, DxfVersion::R2000, true);
    assert!(!compact.has_tag(39));
    let full = export(&line, DxfVersion::R2000, false);
    assert_eq!(full.get_first_value(39), Some(&TagValue::Float(0.0)));
}

#[test]
fn test_explicit_value_always_exported() {
    let mut line = factory(DxfVersion::R2000).new_entity("LINE").unwrap();
    line.dxf_mut().set("thickness", 0.0).unwrap();
    assert!(export(&line, DxfVersion::R2000, true).has_tag(39));
    line.dxf_mut().discard("thickness").unwrap();
    assert!(!export(&line, DxfVersion::R2000, true).has_tag(39));
}

#[test]
fn test_version_gated_attribute() {
    let mut circle = factory(DxfVersion::R2018).new_entity("CIRCLE").unwrap();
    circle.dxf_mut().set("shadow_mode", 2).unwrap();
    assert!(!export(&circle, DxfVersion::R2000, true).has_tag(284));
    assert!(export(&circle, DxfVersion::R2018, true).has_tag(284));
}

#[test]
fn test_version_gated_tag_loaded_as_unknown() {
    let text = "0\nCIRCLE\n100\nAcDbEntity\n8\n0\n284\n1\n100\nAcDbCircle\n10\n0.0\n20\n0.0\n30\n0.0\n40\n1.0\n";
    let circle = load_typed(text, DxfVersion::R2000);
    assert!(!circle.dxf().has_explicit("shadow_mode"));
    assert_eq!(circle.unknown_tags(), vec![&Tag::int(284, 1)]);
    assert_eq!(export(&circle, DxfVersion::R2000, true), tags(text));
}

#[test]
fn test_unknown_tag_keeps_position() {
    let text = "0\nLINE\n5\nAB\n100\nAcDbEntity\n8\n0\n100\nAcDbLine\n10\n0.0\n20\n0.0\n30\n0.0\n90\n7\n11\n1.0\n21\n1.0\n31\n0.0\n";
    let line = load_typed(text, DxfVersion::R2000);
    assert_eq!(line.unknown_tags(), vec![&Tag::int(90, 7)]);
    let exported = export(&line, DxfVersion::R2000, true);
    assert_eq!(exported, tags(text));
    assert_eq!(exported.tag_index(90, 0), Some(6));
}

#[test]
fn test_unknown_subclass_kept() {
    let text = "0\nLINE\n5\nAB\n100\nAcDbEntity\n8\n0\n100\nAcDbLine\n10\n0.0\n20\n0.0\n30\n0.0\n11\n1.0\n21\n1.0\n31\n0.0\n100\nAcDbCustom\n1\nkeep me\n";
    let line = load_typed(text, DxfVersion::R2000);
    assert_eq!(export(&line, DxfVersion::R2000, true), tags(text));
}

#[test]
fn test_appdata_round_trip() {
    let text = "0\nCIRCLE\n5\n20\n102\n{ACAD_REACTORS\n330\n1F\n102\n}\n330\n1F\n100\nAcDbEntity\n8\n0\n100\nAcDbCircle\n10\n0.0\n20\n0.0\n30\n0.0\n40\n1.0\n";
    let circle = load_typed(text, DxfVersion::R2000);
    assert_eq!(circle.reactors(), vec![lldxf::Handle::new(0x1F)]);
    assert_eq!(export(&circle, DxfVersion::R2000, true), tags(text));
    assert!(!export(&circle, DxfVersion::R12, true).has_tag(102));
}

#[test]
fn test_repeated_scalar_last_one_wins() {
    let text = "0\nCIRCLE\n100\nAcDbEntity\n8\nA\n8\nB\n100\nAcDbCircle\n10\n0.0\n20\n0.0\n30\n0.0\n40\n1.0\n";
    let circle = load_typed(text, DxfVersion::R2000);
    assert_eq!(circle.dxf().get_str("layer").unwrap(), "B");
    let exported = export(&circle, DxfVersion::R2000, true);
    assert_eq!(exported.find_all(8).count(), 1);
}

// ===========================================================================
// Embedded object markers
// ===========================================================================

fn with_second_embedded_object() -> String {
    ATTDEF_EMBEDDED_MTEXT.replacen(
        "1001\n",
        "101\nEmbedded Object\n1\nsecond\n1001\n",
        1,
    )
}

#[test]
fn test_second_embedded_object_strict() {
    let mut notes = NotificationCollection::new();
    let result = factory(DxfVersion::R2018)
        .strict(true)
        .load_tags_record(tags(&with_second_embedded_object()), &mut notes);
    assert!(matches!(result, Err(DxfError::SchemaViolation(_))));
}

#[test]
fn test_second_embedded_object_tolerant() {
    let mut notes = NotificationCollection::new();
    let entity = factory(DxfVersion::R2018)
        .load_tags_record(tags(&with_second_embedded_object()), &mut notes)
        .unwrap();
    assert!(!notes.is_empty());
    let attdef = entity.as_typed().unwrap();
    assert!(attdef.has_embedded_mtext());
    let unknown = attdef.unknown_tags();
    assert!(!unknown.iter().any(|t| t.code() == 101));
    assert!(unknown.contains(&&Tag::str(1, "second")));
    assert_eq!(
        attdef.plain_mtext().as_deref(),
        Some("TEST VENUE\nTEST FLOOR PLAN")
    );
}

#[test]
fn test_second_embedded_object_recovery_exports_valid_stream() {
    let mut notes = NotificationCollection::new();
    let recovered = factory(DxfVersion::R2018)
        .load_tags_record(tags(&with_second_embedded_object()), &mut notes)
        .unwrap();
    let first = export(recovered.as_typed().unwrap(), DxfVersion::R2018, true);
    assert_eq!(first.find_all(101).count(), 1);

    let reloaded = factory(DxfVersion::R2018)
        .strict(true)
        .load_tags_record(first.clone(), &mut notes)
        .unwrap();
    let reloaded = reloaded.as_typed().unwrap();
    assert_eq!(
        reloaded.plain_mtext().as_deref(),
        Some("TEST VENUE\nTEST FLOOR PLAN")
    );
    assert_eq!(export(reloaded, DxfVersion::R2018, true), first);
}

// ===========================================================================
// Coordinates
// ===========================================================================

#[test]
fn test_points_are_atomic() {
    let mut line = factory(DxfVersion::R2000).new_entity("LINE").unwrap();
    assert!(matches!(
        line.dxf_mut().set("start", 1.0),
        Err(DxfError::InvalidAttributeValue { .. })
    ));
    line.dxf_mut().set("start", Vector2::new(1.0, 2.0)).unwrap();
    assert_eq!(
        line.dxf().get_point("start").unwrap(),
        Vector3::new(1.0, 2.0, 0.0)
    );
}

#[test]
fn test_scalar_for_point_is_rejected_on_load() {
    let text = "0\nPOINT\n100\nAcDbEntity\n8\n0\n100\nAcDbPoint\n10\n1.0\n20\n2.0\n30\n3.0\n";
    let mut tags = tags(text);
    tags.push(Tag::float(10, 5.0));
    let mut notes = NotificationCollection::new();
    let entity = factory(DxfVersion::R2000)
        .load_tags_record(tags.clone(), &mut notes)
        .unwrap();
    let point = entity.as_typed().unwrap();
    assert_eq!(
        point.dxf().get_point("location").unwrap(),
        Vector3::new(1.0, 2.0, 3.0)
    );
    assert!(!notes.is_empty());
    assert!(factory(DxfVersion::R2000)
        .strict(true)
        .load_tags_record(tags, &mut notes)
        .is_err());
}

proptest! {
    #[test]
    fn prop_point_survives_text(x in -1e6f64..1e6, y in -1e6f64..1e6, z in -1e6f64..1e6) {
        let mut circle = factory(DxfVersion::R2000).new_entity("CIRCLE").unwrap();
        circle.dxf_mut().set("center", (x, y, z)).unwrap();
        let loaded = reload(&export_via_text(&circle, DxfVersion::R2000, true), DxfVersion::R2000);
        prop_assert_eq!(loaded.dxf().get_point("center").unwrap(), Vector3::new(x, y, z));
    }

    #[test]
    fn prop_export_is_idempotent(
        layer in "[A-Za-z0-9_]{1,12}",
        color in 0i64..=256,
        radius in 0.001f64..1e4,
        thickness in prop::option::of(-10.0f64..10.0),
    ) {
        let mut circle = factory(DxfVersion::R2000).new_entity("CIRCLE").unwrap();
        circle.dxf_mut().set("layer", layer.as_str()).unwrap();
        circle.dxf_mut().set("color", color).unwrap();
        circle.dxf_mut().set("radius", radius).unwrap();
        if let Some(thickness) = thickness {
            circle.dxf_mut().set("thickness", thickness).unwrap();
        }
        let first = export_via_text(&circle, DxfVersion::R2000, true);
        let second = export_via_text(&reload(&first, DxfVersion::R2000), DxfVersion::R2000, true);
        prop_assert_eq!(first, second);
    }
}
