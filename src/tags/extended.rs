//! Tag grouping: one entity record split into subclass buckets
//!
//! ```text
//!   0 ATTDEF            structure tag, the DXF type name
//!   5 28A             ┐
//! 102 {ACAD_REACTORS  │ base bucket (no marker), app data groups are moved
//! 330 285             │ into `appdata` and leave a `102 {NAME` placeholder
//! 102 }               │
//! 330 285             ┘
//! 100 AcDbEntity      ┐ one bucket per subclass marker
//!   8 AttribLayer     ┘
//! 101 Embedded Object ┐ embedded object, up to the first XDATA tag
//!  10 45.3            ┘
//! 1001 AcadAnnotative ┐ XDATA groups keyed by application name
//! 1000 AnnotativeData ┘
//! ```

use indexmap::IndexMap;

use super::group_code::{APP_DATA_MARKER, EMBEDDED_OBJ_MARKER, SUBCLASS_MARKER, XDATA_MARKER};
use super::{Tag, TagValue, Tags};
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};

/// Default value of the embedded object marker tag
pub const EMBEDDED_OBJECT_MARKER_VALUE: &str = "Embedded Object";

/// Ordered tags of one subclass
#[derive(Debug, Clone, PartialEq)]
pub struct Subclass {
    /// Value of the `100` marker tag, `None` for the base bucket
    pub marker: Option<String>,
    /// Tags in source order, app data groups replaced by placeholders
    pub tags: Tags,
}

impl Subclass {
    fn new(marker: Option<String>) -> Self {
        Self {
            marker,
            tags: Tags::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Subclasses,
    Embedded,
    XData,
    /// Tags after an illegal second embedded marker
    Overflow,
}

/// Tags of one entity record grouped by subclass
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedTags {
    dxftype: String,
    /// Subclass buckets in source order; index 0 is the base bucket
    pub subclasses: Vec<Subclass>,
    /// App data groups by application name (without the leading `{`)
    pub appdata: IndexMap<String, Tags>,
    /// Value of the `101` marker tag, if an embedded object exists
    pub embedded_marker: Option<String>,
    /// Embedded object tags
    pub embedded: Option<Tags>,
    /// XDATA groups by application name, tags after the `1001` tag
    pub xdata: IndexMap<String, Tags>,
}

impl ExtendedTags {
    /// Empty record for `dxftype`
    pub fn new(dxftype: impl Into<String>) -> Self {
        Self {
            dxftype: dxftype.into(),
            subclasses: vec![Subclass::new(None)],
            appdata: IndexMap::new(),
            embedded_marker: None,
            embedded: None,
            xdata: IndexMap::new(),
        }
    }

    /// Group the tags of one entity record.
    ///
    /// The first tag must be the `0 <TYPE>` structure tag. Structural
    /// problems fail in strict mode; tolerant mode repairs them and records a
    /// notification.
    pub fn from_tags<I>(tags: I, strict: bool, notifications: &mut NotificationCollection) -> Result<Self>
    where
        I: IntoIterator<Item = Tag>,
    {
        let mut iter = tags.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| DxfError::SchemaViolation("empty entity record".to_string()))?;
        let dxftype = match (first.is_structure(), first.value()) {
            (true, TagValue::Str(name)) => name.clone(),
            _ => {
                return Err(DxfError::SchemaViolation(format!(
                    "entity record starts with {} instead of a structure tag",
                    first
                )))
            }
        };

        let mut xtags = ExtendedTags::new(dxftype);
        let mut mode = Mode::Subclasses;
        let mut open_appdata: Option<(String, Tags)> = None;
        let mut xdata_app: Option<String> = None;

        for tag in iter {
            if let Some((name, mut content)) = open_appdata.take() {
                if tag.is(APP_DATA_MARKER, "}") {
                    xtags.insert_appdata(name, content, notifications);
                    continue;
                }
                if !matches!(tag.code(), APP_DATA_MARKER | SUBCLASS_MARKER | EMBEDDED_OBJ_MARKER | XDATA_MARKER) {
                    content.push(tag);
                    open_appdata = Some((name, content));
                    continue;
                }
                let err = DxfError::SchemaViolation(format!(
                    "app data group '{}' in {} is not closed",
                    name, xtags.dxftype
                ));
                if strict {
                    return Err(err);
                }
                notifications.recovered(&err);
                xtags.insert_appdata(name, content, notifications);
            }

            match (mode, tag.code()) {
                (_, XDATA_MARKER) => {
                    let name = tag.value().as_str().unwrap_or_default().to_string();
                    if xtags.xdata.contains_key(&name) {
                        notifications.notify(
                            NotificationType::Warning,
                            format!("duplicate XDATA group '{}' in {} merged", name, xtags.dxftype),
                        );
                    } else {
                        xtags.xdata.insert(name.clone(), Tags::new());
                    }
                    xdata_app = Some(name);
                    mode = Mode::XData;
                }
                (Mode::XData, _) => {
                    if tag.code() == EMBEDDED_OBJ_MARKER {
                        let err = DxfError::SchemaViolation(format!(
                            "embedded object marker inside XDATA of {}",
                            xtags.dxftype
                        ));
                        if strict {
                            return Err(err);
                        }
                        notifications.recovered(&err);
                    }
                    if let Some(group) = xdata_app.as_ref().and_then(|n| xtags.xdata.get_mut(n)) {
                        group.push(tag);
                    }
                }
                (Mode::Embedded, EMBEDDED_OBJ_MARKER) | (Mode::Overflow, EMBEDDED_OBJ_MARKER) => {
                    let err = DxfError::SchemaViolation(format!(
                        "second embedded object in {}",
                        xtags.dxftype
                    ));
                    if strict {
                        return Err(err);
                    }
                    notifications.recovered(&err);
                    // the marker itself is dropped, a live 101 would reopen the
                    // embedded region on the next load
                    mode = Mode::Overflow;
                }
                (Mode::Embedded, _) => {
                    if let Some(embedded) = xtags.embedded.as_mut() {
                        embedded.push(tag);
                    }
                }
                (Mode::Overflow, _) => xtags.last_subclass_mut().tags.push(tag),
                (Mode::Subclasses, SUBCLASS_MARKER) => {
                    let marker = tag.value().as_str().unwrap_or_default().to_string();
                    xtags.subclasses.push(Subclass::new(Some(marker)));
                }
                (Mode::Subclasses, EMBEDDED_OBJ_MARKER) => {
                    let marker = tag
                        .value()
                        .as_str()
                        .unwrap_or(EMBEDDED_OBJECT_MARKER_VALUE)
                        .to_string();
                    xtags.embedded_marker = Some(marker);
                    xtags.embedded = Some(Tags::new());
                    mode = Mode::Embedded;
                }
                (Mode::Subclasses, APP_DATA_MARKER) => {
                    match tag.value().as_str().and_then(|v| v.strip_prefix('{')) {
                        Some(name) => open_appdata = Some((name.to_string(), Tags::new())),
                        None => {
                            let err = DxfError::SchemaViolation(format!(
                                "unexpected app data tag {} in {}",
                                tag, xtags.dxftype
                            ));
                            if strict {
                                return Err(err);
                            }
                            notifications.recovered(&err);
                            xtags.last_subclass_mut().tags.push(tag);
                        }
                    }
                }
                (Mode::Subclasses, _) => xtags.last_subclass_mut().tags.push(tag),
            }
        }

        if let Some((name, content)) = open_appdata {
            let err = DxfError::SchemaViolation(format!(
                "app data group '{}' in {} is not closed",
                name, xtags.dxftype
            ));
            if strict {
                return Err(err);
            }
            notifications.recovered(&err);
            xtags.insert_appdata(name, content, notifications);
        }
        Ok(xtags)
    }

    fn insert_appdata(&mut self, name: String, content: Tags, notifications: &mut NotificationCollection) {
        if self.appdata.contains_key(&name) {
            notifications.notify(
                NotificationType::Warning,
                format!("duplicate app data group '{}' in {}, last one wins", name, self.dxftype),
            );
        }
        self.last_subclass_mut()
            .tags
            .push(Tag::str(APP_DATA_MARKER, format!("{{{}", name)));
        self.appdata.insert(name, content);
    }

    fn last_subclass_mut(&mut self) -> &mut Subclass {
        if self.subclasses.is_empty() {
            self.subclasses.push(Subclass::new(None));
        }
        let last = self.subclasses.len() - 1;
        &mut self.subclasses[last]
    }

    /// The DXF type name
    pub fn dxftype(&self) -> &str {
        &self.dxftype
    }

    /// The base bucket (tags before the first subclass marker)
    pub fn noclass(&self) -> &Subclass {
        &self.subclasses[0]
    }

    /// False for R12 style records without any `100` marker
    pub fn has_subclass_markers(&self) -> bool {
        self.subclasses.iter().any(|s| s.marker.is_some())
    }

    /// First subclass with marker `name`
    pub fn subclass(&self, name: &str) -> Option<&Subclass> {
        self.subclasses.iter().find(|s| s.name() == Some(name))
    }

    /// Reassemble the flat tag stream, the inverse of [`ExtendedTags::from_tags`]
    pub fn to_tags(&self) -> Tags {
        let mut out = Tags::new();
        out.push(Tag::str(0, self.dxftype.clone()));
        for subclass in &self.subclasses {
            if let Some(marker) = &subclass.marker {
                out.push(Tag::str(SUBCLASS_MARKER, marker.clone()));
            }
            for tag in subclass.tags.iter() {
                self.push_tag_or_appdata(tag, &mut out);
            }
        }
        if let Some(embedded) = &self.embedded {
            let marker = self
                .embedded_marker
                .clone()
                .unwrap_or_else(|| EMBEDDED_OBJECT_MARKER_VALUE.to_string());
            out.push(Tag::str(EMBEDDED_OBJ_MARKER, marker));
            out.extend(embedded.iter().cloned());
        }
        for (name, group) in &self.xdata {
            out.push(Tag::str(XDATA_MARKER, name.clone()));
            out.extend(group.iter().cloned());
        }
        out
    }

    fn push_tag_or_appdata(&self, tag: &Tag, out: &mut Tags) {
        let group = appdata_placeholder(tag).and_then(|name| self.appdata.get(name).map(|g| (name, g)));
        match group {
            Some((name, content)) => {
                out.push(Tag::str(APP_DATA_MARKER, format!("{{{}", name)));
                out.extend(content.iter().cloned());
                out.push(Tag::str(APP_DATA_MARKER, "}"));
            }
            None => out.push(tag.clone()),
        }
    }
}

/// Application name if `tag` is an app data placeholder (`102 {NAME`)
pub(crate) fn appdata_placeholder(tag: &Tag) -> Option<&str> {
    if tag.code() != APP_DATA_MARKER {
        return None;
    }
    tag.value().as_str().and_then(|v| v.strip_prefix('{'))
}
