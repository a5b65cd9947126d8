//! Shared fixtures and helpers for the lldxf integration tests.
//!
//! Every test crate imports this module via `mod common;`.

#![allow(dead_code)]

use lldxf::io::dxf::{tags_from_text, tags_to_text};
use lldxf::{
    DxfEntity, DxfVersion, Entity, EntityFactory, ExportConfiguration, NotificationCollection,
    SchemaRegistry, TagExporter, Tags,
};

// ===========================================================================
// Fixtures
// ===========================================================================

/// ATTDEF record of a DXF R12 file, no subclass markers
pub const ATTDEF_R12: &str = "\
0
ATTDEF
5
0
8
0
10
0.0
20
0.0
30
0.0
40
1.0
1
DEFAULTTEXT
50
0.0
51
0.0
7
STANDARD
41
1.0
71
0
72
0
11
0.0
21
0.0
31
0.0
3
PROMPTTEXT
2
TAG
70
0
74
0
";

/// ATTDEF record of a DXF R2000 file
pub const ATTDEF_R2000: &str = "\
0
ATTDEF
5
0
330
0
100
AcDbEntity
8
0
100
AcDbText
10
0.0
20
0.0
30
0.0
40
1.0
1
DEFAULTTEXT
50
0.0
51
0.0
7
STANDARD
41
1.0
71
0
72
0
11
0.0
21
0.0
31
0.0
100
AcDbAttributeDefinition
3
PROMPTTEXT
2
TAG
70
0
73
0
74
0
";

/// ATTDEF with embedded MTEXT object and XDATA, DXF R2018.
///
/// `71`, `72` and `11` in the attribute definition subclass are not defined
/// by the schema and must survive a round trip in place.
pub const ATTDEF_EMBEDDED_MTEXT: &str = "\
0
ATTDEF
5
28A
330
285
100
AcDbEntity
8
AttribLayer
62
7
100
AcDbText
10
45.3
20
43.5
30
0.0
40
3.0
1
TEST VENUE
7
Arial_3 NARROW
72
1
11
45.3
21
45.0
31
0.0
100
AcDbAttributeDefinition
280
0
3
TITLE-OF-DRAWING
2
DRAWING-NAME
70
0
74
2
280
0
71
4
72
0
11
45.3
21
45.0
31
0.0
101
Embedded Object
10
45.3
20
45.0
30
0.0
40
3.0
41
0.0
46
0.0
71
5
72
5
1
TEST VENUE\\PTEST FLOOR PLAN
7
Arial_3 NARROW
73
1
44
1.0
1001
AcadAnnotative
1000
AnnotativeData
1002
{
1070
1
1070
0
1002
}
";

// ===========================================================================
// Helpers
// ===========================================================================

pub fn registry() -> &'static SchemaRegistry {
    SchemaRegistry::builtin()
}

pub fn factory(version: DxfVersion) -> EntityFactory<'static> {
    EntityFactory::new(registry(), version)
}

/// Compiled tags of an ASCII fragment, panics on malformed input
pub fn tags(text: &str) -> Tags {
    tags_from_text(text).expect("valid DXF fragment")
}

/// Load one entity record with a tolerant factory
pub fn load(text: &str, version: DxfVersion) -> DxfEntity {
    let mut notes = NotificationCollection::new();
    factory(version)
        .load_tags_record(tags(text), &mut notes)
        .expect("entity record loads")
}

/// Load one entity record of a registered type
pub fn load_typed(text: &str, version: DxfVersion) -> Entity {
    match load(text, version) {
        DxfEntity::Typed(entity) => entity,
        DxfEntity::Unsupported(e) => panic!("{} is not a registered type", e.dxftype()),
    }
}

pub fn exporter(version: DxfVersion, optional: bool) -> TagExporter {
    TagExporter::new(ExportConfiguration::new(version).optional(optional))
}

/// Export a typed entity, panics on export errors
pub fn export(entity: &Entity, version: DxfVersion, optional: bool) -> Tags {
    let mut notes = NotificationCollection::new();
    exporter(version, optional)
        .export_entity(entity, &mut notes)
        .expect("entity exports")
}

/// Export, write as ASCII DXF and read the text back
pub fn export_via_text(entity: &Entity, version: DxfVersion, optional: bool) -> Tags {
    let text = tags_to_text(&export(entity, version, optional)).expect("tags are writable");
    tags(&text)
}
