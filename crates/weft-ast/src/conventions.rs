use serde::{Deserialize, Serialize};

/// Field names the linker recomputes, they are dropped from input documents.
pub const CONTAINER_FIELD: &str = "$container";
pub const CONTAINER_PROPERTY_FIELD: &str = "$containerProperty";
pub const CONTAINER_INDEX_FIELD: &str = "$containerIndex";

pub fn is_container_field(name: &str) -> bool {
    matches!(
        name,
        CONTAINER_FIELD | CONTAINER_PROPERTY_FIELD | CONTAINER_INDEX_FIELD
    )
}

/// How nodes and references are spelled in a serialized document.
///
/// With the defaults a node is `{"$type": "Item", ..}` and a reference is
/// `{"$ref": "#/items@0"}`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conventions {
    pub type_field: String,
    pub ref_field: String,
    pub path_prefix: char,
    pub segment_separator: char,
    pub index_marker: char,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            type_field: "$type".to_owned(),
            ref_field: "$ref".to_owned(),
            path_prefix: '#',
            segment_separator: '/',
            index_marker: '@',
        }
    }
}

/// One step of a reference path.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Segment<'a> {
    pub property: &'a str,
    pub index: Option<usize>,
}

impl Conventions {
    /// Splits a reference path into segments. `None` if the path does not start with the prefix
    /// or an index is not a number. Empty segments are skipped, so `#/a` and `#a` are the same.
    pub fn segments<'a>(&self, path: &'a str) -> Option<Vec<Segment<'a>>> {
        let rest = path.strip_prefix(self.path_prefix)?;

        rest.split(self.segment_separator)
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.rsplit_once(self.index_marker) {
                Some((property, index)) => Some(Segment {
                    property,
                    index: Some(index.parse().ok()?),
                }),
                None => Some(Segment {
                    property: segment,
                    index: None,
                }),
            })
            .collect()
    }
}
