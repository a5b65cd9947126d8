//! Compiled tag sequence over a stream reader

use super::stream_reader::{DxfCodePair, DxfStreamReader};
use crate::error::{DxfError, Result};
use crate::tags::group_code::{is_point_code, COMMENT, STRUCTURE_MARKER};
use crate::tags::{Tag, TagValue};
use crate::types::{Vector2, Vector3};

/// Lazy sequence of compiled tags.
///
/// Coordinates are merged into point tags, comments are skipped and the
/// sequence ends at `0 EOF` or at the end of the input. After an error the
/// iterator continues with the next pair.
pub struct TagReader<S: DxfStreamReader> {
    stream: S,
    pending: Option<DxfCodePair>,
    done: bool,
}

impl<S: DxfStreamReader> TagReader<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            pending: None,
            done: false,
        }
    }

    /// Underlying stream reader, e.g. to set the encoding
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn position(&self) -> usize {
        self.pending
            .as_ref()
            .map_or_else(|| self.stream.position(), |p| p.position)
    }

    fn next_pair(&mut self) -> Result<Option<DxfCodePair>> {
        match self.pending.take() {
            Some(pair) => Ok(Some(pair)),
            None => self.stream.read_pair(),
        }
    }

    /// Pair with `code`, anything else is kept for the next read
    fn coordinate(&mut self, code: i32) -> Result<Option<f64>> {
        match self.next_pair()? {
            Some(pair) if pair.code == code => match pair.as_double() {
                Some(v) => Ok(Some(v)),
                None => Err(DxfError::malformed(pair.position, "invalid coordinate value")),
            },
            other => {
                self.pending = other;
                Ok(None)
            }
        }
    }

    fn point(&mut self, x: DxfCodePair) -> Result<Tag> {
        let code = x.code;
        let x_value = x
            .as_double()
            .ok_or_else(|| DxfError::malformed(x.position, "invalid coordinate value"))?;
        let y = self.coordinate(code + 10)?.ok_or_else(|| {
            DxfError::malformed(
                x.position,
                format!("missing y coordinate {} after group code {}", code + 10, code),
            )
        })?;
        let value = match self.coordinate(code + 20)? {
            Some(z) => TagValue::Point3(Vector3::new(x_value, y, z)),
            None => TagValue::Point2(Vector2::new(x_value, y)),
        };
        Ok(Tag::new(code, value))
    }

    fn read_tag(&mut self) -> Result<Option<Tag>> {
        loop {
            let pair = match self.next_pair()? {
                Some(pair) => pair,
                None => return Ok(None),
            };
            if pair.code == COMMENT {
                continue;
            }
            if pair.is_structure("EOF") {
                return Ok(None);
            }
            if is_point_code(pair.code) {
                return self.point(pair).map(Some);
            }
            return Ok(Some(Tag::new(pair.code, pair.value)));
        }
    }
}

impl<S: DxfStreamReader> Iterator for TagReader<S> {
    type Item = Result<Tag>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_tag() {
            Ok(Some(tag)) => Some(Ok(tag)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Split compiled tags into entity records, each starting at a `0` tag
pub fn split_records<I>(tags: I) -> Vec<Vec<Tag>>
where
    I: IntoIterator<Item = Tag>,
{
    let mut records: Vec<Vec<Tag>> = Vec::new();
    for tag in tags {
        match records.last_mut() {
            Some(record) if tag.code() != STRUCTURE_MARKER => record.push(tag),
            _ => records.push(vec![tag]),
        }
    }
    records
}
