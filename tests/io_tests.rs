//! Reading and writing whole DXF files, text and binary

mod common;

use common::*;
use lldxf::io::dxf::BINARY_DXF_SENTINEL;
use lldxf::notification::NotificationType;
use lldxf::{
    DxfEntity, DxfError, DxfReader, DxfReaderConfiguration, DxfVersion, DxfWriter, Handle,
    NotificationCollection, Vector3,
};
use std::io::Cursor;

fn line(handle: &str) -> DxfEntity {
    let mut line = factory(DxfVersion::R2000).new_entity("LINE").unwrap();
    line.dxf_mut().set("handle", handle).unwrap();
    line.dxf_mut().set("layer", "WALLS").unwrap();
    line.dxf_mut().set("end", (10.0, 5.0, 0.0)).unwrap();
    line.into()
}

fn write(writer: DxfWriter, entities: &[DxfEntity]) -> Vec<u8> {
    let mut notes = NotificationCollection::new();
    writer.write_to_vec(entities, &mut notes).unwrap()
}

fn read(data: Vec<u8>) -> lldxf::DxfDocument {
    DxfReader::from_reader(Cursor::new(data)).unwrap().read().unwrap()
}

fn read_with(data: Vec<u8>, config: DxfReaderConfiguration) -> lldxf::Result<lldxf::DxfDocument> {
    DxfReader::from_reader(Cursor::new(data))?
        .with_configuration(config)
        .read()
}

fn export_entity(entity: &DxfEntity, version: DxfVersion) -> lldxf::Tags {
    let mut notes = NotificationCollection::new();
    exporter(version, true).export(entity, &mut notes).unwrap()
}

// ===========================================================================
// Text files
// ===========================================================================

#[test]
fn test_reader_from_nonexistent_file() {
    assert!(DxfReader::from_file("nonexistent.dxf").is_err());
}

#[test]
fn test_text_file_round_trip() {
    let entities = vec![line("2A"), load(ATTDEF_R2000, DxfVersion::R2000)];
    let doc = read(write(DxfWriter::new(DxfVersion::R2000), &entities));

    assert_eq!(doc.version, DxfVersion::R2000);
    assert_eq!(doc.entities.len(), 2);
    let loaded = doc.entities.get(Handle::new(0x2A)).unwrap();
    assert_eq!(
        export_entity(loaded, DxfVersion::R2000),
        export_entity(&entities[0], DxfVersion::R2000)
    );
    let attdef = doc.entities.query("ATTDEF").next().unwrap();
    assert!(!attdef.handle().unwrap().is_null());
    assert_eq!(
        attdef.as_typed().unwrap().dxf().get_str("prompt").unwrap(),
        "PROMPTTEXT"
    );
}

#[test]
fn test_text_file_starts_with_header() {
    let data = write(DxfWriter::new(DxfVersion::R2010), &[line("2A")]);
    let text = String::from_utf8(data).unwrap();
    assert!(text.starts_with("  0\nSECTION\n  2\nHEADER\n  9\n$ACADVER\n  1\nAC1024\n"));
    assert!(text.ends_with("  0\nEOF\n"));
}

#[test]
fn test_file_on_disk() {
    let path = std::env::temp_dir().join(format!("lldxf_io_test_{}.dxf", std::process::id()));
    let entities = vec![line("2A")];
    let mut notes = NotificationCollection::new();
    DxfWriter::new(DxfVersion::R2018)
        .write_to_file(&path, &entities, &mut notes)
        .unwrap();
    let doc = DxfReader::from_file(&path).unwrap().read().unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(doc.version, DxfVersion::R2018);
    assert_eq!(doc.entities.len(), 1);
}

#[test]
fn test_unsupported_entity_written_verbatim() {
    let helix = "0\nHELIX\n5\n3F\n100\nAcDbEntity\n8\n0\n100\nAcDbSpline\n70\n0\n";
    let entities = vec![load(helix, DxfVersion::R2000)];
    assert!(entities[0].is_unsupported());
    let doc = read(write(DxfWriter::new(DxfVersion::R2000), &entities));
    let loaded = doc.entities.get(Handle::new(0x3F)).unwrap();
    assert!(loaded.is_unsupported());
    assert_eq!(export_entity(loaded, DxfVersion::R2000), tags(helix));
    assert!(doc.notifications.has_type(NotificationType::NotSupported));
}

#[test]
fn test_entity_too_new_for_target_version() {
    let mtext: DxfEntity = factory(DxfVersion::R2000).new_entity("MTEXT").unwrap().into();
    let entities = vec![mtext, line("2A")];
    let mut notes = NotificationCollection::new();
    let data = DxfWriter::new(DxfVersion::R12)
        .write_to_vec(&entities, &mut notes)
        .unwrap();
    assert!(notes.has_type(NotificationType::NotSupported));
    assert_eq!(read(data).entities.len(), 1);

    let strict = DxfWriter::new(DxfVersion::R12).strict(true);
    assert!(matches!(
        strict.write_to_vec(&entities, &mut notes),
        Err(DxfError::UnsupportedVersion(_))
    ));
}

// ===========================================================================
// Binary files
// ===========================================================================

#[test]
fn test_binary_file_round_trip() {
    let entities = vec![line("2A"), load(ATTDEF_EMBEDDED_MTEXT, DxfVersion::R2018)];
    let data = write(DxfWriter::new_binary(DxfVersion::R2018), &entities);
    assert!(data.starts_with(BINARY_DXF_SENTINEL));

    let doc = read(data);
    assert_eq!(doc.version, DxfVersion::R2018);
    let attdef = doc.entities.get(Handle::new(0x28A)).unwrap();
    assert_eq!(
        export_entity(attdef, DxfVersion::R2018),
        tags(ATTDEF_EMBEDDED_MTEXT)
    );
}

#[test]
fn test_binary_r12_file() {
    let entities = vec![load(ATTDEF_R12, DxfVersion::R12), line("2A")];
    let doc = read(write(DxfWriter::new_binary(DxfVersion::R12), &entities));
    assert_eq!(doc.version, DxfVersion::R12);
    let line = doc.entities.get(Handle::new(0x2A)).unwrap().as_typed().unwrap();
    assert!(line.is_flat());
    assert_eq!(line.dxf().get_str("layer").unwrap(), "WALLS");
    assert_eq!(line.dxf().get_point("end").unwrap(), Vector3::new(10.0, 5.0, 0.0));
}

// ===========================================================================
// Reader configuration
// ===========================================================================

#[test]
fn test_parallel_loading_matches_sequential() {
    let mut entities = Vec::new();
    for i in 0..64 {
        let mut circle = factory(DxfVersion::R2000).new_entity("CIRCLE").unwrap();
        circle.dxf_mut().set("radius", 1.0 + i as f64).unwrap();
        entities.push(DxfEntity::from(circle));
    }
    entities.push(load("0\nHELIX\n8\n0\n", DxfVersion::R2000));
    let data = write(DxfWriter::new(DxfVersion::R2000), &entities);

    let sequential = read_with(data.clone(), DxfReaderConfiguration::default()).unwrap();
    let parallel = read_with(
        data,
        DxfReaderConfiguration {
            parallel: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(sequential.entities.len(), 65);
    assert_eq!(parallel.entities.len(), 65);
    for (a, b) in sequential.entities.iter().zip(parallel.entities.iter()) {
        assert_eq!(a.handle(), b.handle());
        assert_eq!(
            export_entity(a, DxfVersion::R2000),
            export_entity(b, DxfVersion::R2000)
        );
    }
    let notes_a: Vec<String> = sequential.notifications.iter().map(|n| n.to_string()).collect();
    let notes_b: Vec<String> = parallel.notifications.iter().map(|n| n.to_string()).collect();
    assert_eq!(notes_a, notes_b);
}

const MALFORMED: &str = "\
0
SECTION
2
ENTITIES
0
LINE
8
0
10
not a number
20
0.0
0
CIRCLE
8
0
40
2.0
0
ENDSEC
0
EOF
";

#[test]
fn test_tolerant_reader_skips_malformed_record() {
    let doc = read_with(MALFORMED.as_bytes().to_vec(), DxfReaderConfiguration::default()).unwrap();
    assert_eq!(doc.entities.len(), 1);
    assert_eq!(doc.entities.query("CIRCLE").count(), 1);
    assert!(doc.notifications.has_type(NotificationType::Error));
}

#[test]
fn test_strict_reader_fails_on_malformed_tag() {
    let config = DxfReaderConfiguration {
        strict: true,
        ..Default::default()
    };
    assert!(matches!(
        read_with(MALFORMED.as_bytes().to_vec(), config),
        Err(DxfError::MalformedTag { .. })
    ));
}

#[test]
fn test_default_version_without_header() {
    let text = "0\nSECTION\n2\nENTITIES\n0\nPOINT\n8\n0\n10\n1.0\n20\n2.0\n30\n0.0\n0\nENDSEC\n0\nEOF\n";
    let config = DxfReaderConfiguration {
        default_version: DxfVersion::R12,
        ..Default::default()
    };
    let doc = read_with(text.as_bytes().to_vec(), config).unwrap();
    assert_eq!(doc.version, DxfVersion::R12);
    let point = doc.entities.iter().next().unwrap().as_typed().unwrap();
    assert!(point.is_flat());
    assert!(point.handle().is_some());
}

#[test]
fn test_code_page_from_header() {
    let mut data = b"0\nSECTION\n2\nHEADER\n9\n$ACADVER\n1\nAC1015\n9\n$DWGCODEPAGE\n3\nANSI_1251\n0\nENDSEC\n\
0\nSECTION\n2\nENTITIES\n0\nPOINT\n5\n2A\n100\nAcDbEntity\n8\n"
        .to_vec();
    data.extend_from_slice(&[0xC4, 0xE5]);
    data.extend_from_slice(b"\n100\nAcDbPoint\n10\n0.0\n20\n0.0\n30\n0.0\n0\nENDSEC\n0\nEOF\n");
    let doc = read(data);
    let point = doc.entities.get(Handle::new(0x2A)).unwrap().as_typed().unwrap();
    assert_eq!(point.dxf().get_str("layer").unwrap(), "Де");
}
