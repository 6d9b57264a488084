//! Arena representation of a serialized tree.
//!
//! Every JSON value is classified exactly once: records carrying a string reference field become
//! [`Reference`]s, records carrying a string type field become [`Node`]s and everything else is
//! kept as a plain [`Value`]. Nodes and references are stored by handle, the back edge to a
//! node's container is a handle too, so dropping the [`LinkedAst`] tears everything down.

use cranelift_entity::{entity_impl, PrimaryMap};
use serde_json::Map;

use crate::conventions::{
    is_container_field, Conventions, CONTAINER_INDEX_FIELD, CONTAINER_PROPERTY_FIELD,
};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);
entity_impl! { NodeId, "node" }

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceId(u32);
entity_impl! { ReferenceId, "ref" }

pub type Properties = Vec<(String, Value)>;

pub fn lookup<'a>(properties: &'a Properties, name: &str) -> Option<&'a Value> {
    properties
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    /// An object that is neither a node nor a reference.
    Record(Properties),
    Node(NodeId),
    Reference(ReferenceId),
}

impl Value {
    pub fn as_node(&self) -> Option<NodeId> {
        match *self {
            Value::Node(id) => Some(id),
            _ => None,
        }
    }
    pub fn as_reference(&self) -> Option<ReferenceId> {
        match *self {
            Value::Reference(id) => Some(id),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// A node or reference held directly by a property, or directly by an array in a property.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Entry {
    Node(NodeId),
    Reference(ReferenceId),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Slot<'a> {
    pub property: &'a str,
    pub index: Option<usize>,
    pub entry: Entry,
}

/// Where a node is held, filled in by linking.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Container {
    pub node: NodeId,
    pub property: String,
    /// Set when the property holds an array.
    pub index: Option<usize>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    /// Absent only for a root object without a type field.
    pub kind: Option<String>,
    pub properties: Properties,
    /// `None` for the root and for nodes the linker does not walk into.
    pub container: Option<Container>,
}

impl Node {
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }
    pub fn property(&self, name: &str) -> Option<&Value> {
        lookup(&self.properties, name)
    }
    /// Nodes and references this node holds, in property order. Values nested deeper than one
    /// array, or inside plain records, are not included.
    pub fn children(&self) -> impl Iterator<Item = Slot<'_>> + '_ {
        self.properties.iter().flat_map(|(name, value)| {
            let (items, indexed) = match value {
                Value::Array(items) => (items.as_slice(), true),
                other => (std::slice::from_ref(other), false),
            };
            items.iter().enumerate().filter_map(move |(index, item)| {
                let entry = match *item {
                    Value::Node(id) => Entry::Node(id),
                    Value::Reference(id) => Entry::Reference(id),
                    _ => return None,
                };
                Some(Slot {
                    property: name,
                    index: indexed.then_some(index),
                    entry,
                })
            })
        })
    }
    pub fn container_node(&self) -> Option<NodeId> {
        self.container.as_ref().map(|c| c.node)
    }
    pub fn container_property(&self) -> Option<&str> {
        self.container.as_ref().map(|c| c.property.as_str())
    }
    pub fn container_index(&self) -> Option<usize> {
        self.container.as_ref().and_then(|c| c.index)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Reference {
    pub path: String,
    /// Remaining fields of the reference object, for example the referenced text.
    pub properties: Properties,
    /// Filled in by linking, `None` if the path does not lead to a node.
    pub target: Option<NodeId>,
}

impl Reference {
    pub fn property(&self, name: &str) -> Option<&Value> {
        lookup(&self.properties, name)
    }
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct LinkedAst {
    pub(crate) conventions: Conventions,
    pub(crate) nodes: PrimaryMap<NodeId, Node>,
    pub(crate) references: PrimaryMap<ReferenceId, Reference>,
    pub(crate) root: NodeId,
}

impl LinkedAst {
    pub fn root(&self) -> NodeId {
        self.root
    }
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
    pub fn reference(&self, id: ReferenceId) -> &Reference {
        &self.references[id]
    }
    pub fn nodes(&self) -> cranelift_entity::Iter<'_, NodeId, Node> {
        self.nodes.iter()
    }
    pub fn references(&self) -> cranelift_entity::Iter<'_, ReferenceId, Reference> {
        self.references.iter()
    }
    /// Node held by `property` of `id`, at `index` if the property is an array.
    pub fn child(&self, id: NodeId, property: &str, index: Option<usize>) -> Option<NodeId> {
        let value = self.nodes[id].property(property)?;
        match index {
            Some(index) => value.as_array()?.get(index)?.as_node(),
            None => value.as_node(),
        }
    }
    /// Target of the reference held by `property` of `id`.
    pub fn target(&self, id: NodeId, property: &str) -> Option<NodeId> {
        let reference = self.nodes[id].property(property)?.as_reference()?;
        self.references[reference].target
    }

    /// Renders the graph back into JSON. Container metadata is written as property name and
    /// index, the container itself is implied by nesting.
    pub fn to_json(&self) -> serde_json::Value {
        self.node_to_json(self.root)
    }

    fn node_to_json(&self, id: NodeId) -> serde_json::Value {
        let node = &self.nodes[id];
        let mut map = Map::new();
        if let Some(kind) = &node.kind {
            map.insert(self.conventions.type_field.clone(), kind.clone().into());
        }
        if let Some(container) = &node.container {
            map.insert(
                CONTAINER_PROPERTY_FIELD.to_owned(),
                container.property.clone().into(),
            );
            if let Some(index) = container.index {
                map.insert(CONTAINER_INDEX_FIELD.to_owned(), index.into());
            }
        }
        self.properties_to_json(&node.properties, &mut map);
        serde_json::Value::Object(map)
    }

    fn properties_to_json(&self, properties: &Properties, map: &mut Map<String, serde_json::Value>) {
        for (name, value) in properties {
            map.insert(name.clone(), self.value_to_json(value));
        }
    }

    fn value_to_json(&self, value: &Value) -> serde_json::Value {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => items.iter().map(|v| self.value_to_json(v)).collect(),
            Value::Record(properties) => {
                let mut map = Map::new();
                self.properties_to_json(properties, &mut map);
                serde_json::Value::Object(map)
            }
            Value::Node(id) => self.node_to_json(*id),
            Value::Reference(id) => {
                let reference = &self.references[*id];
                let mut map = Map::new();
                map.insert(
                    self.conventions.ref_field.clone(),
                    reference.path.clone().into(),
                );
                self.properties_to_json(&reference.properties, &mut map);
                serde_json::Value::Object(map)
            }
        }
    }
}

/// Moves a JSON document into arenas, classifying each value once.
pub(crate) struct Builder<'a> {
    conventions: &'a Conventions,
    nodes: PrimaryMap<NodeId, Node>,
    references: PrimaryMap<ReferenceId, Reference>,
}

impl<'a> Builder<'a> {
    pub fn new(conventions: &'a Conventions) -> Builder<'a> {
        Self {
            conventions,
            nodes: PrimaryMap::new(),
            references: PrimaryMap::new(),
        }
    }

    /// The root object always becomes a node, even without a type field.
    pub fn build_root(mut self, map: Map<String, serde_json::Value>) -> LinkedAst {
        let root = self.node(map);
        LinkedAst {
            conventions: self.conventions.clone(),
            nodes: self.nodes,
            references: self.references,
            root,
        }
    }

    fn value(&mut self, json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.value(item)).collect())
            }
            serde_json::Value::Object(map) => self.record(map),
        }
    }

    fn record(&mut self, map: Map<String, serde_json::Value>) -> Value {
        let is_string = |field: &str| matches!(map.get(field), Some(serde_json::Value::String(_)));

        if is_string(&self.conventions.ref_field) {
            Value::Reference(self.reference(map))
        } else if is_string(&self.conventions.type_field) {
            Value::Node(self.node(map))
        } else {
            Value::Record(self.properties(map, None))
        }
    }

    fn node(&mut self, map: Map<String, serde_json::Value>) -> NodeId {
        let conventions = self.conventions;
        let type_field = conventions.type_field.as_str();
        let kind = map.get(type_field).and_then(|v| v.as_str()).map(str::to_owned);
        // reserve the handle first so that handles follow document order
        let id = self.nodes.push(Node {
            kind,
            properties: Vec::new(),
            container: None,
        });
        let properties = self.properties(map, Some(type_field));
        self.nodes[id].properties = properties;
        id
    }

    fn reference(&mut self, map: Map<String, serde_json::Value>) -> ReferenceId {
        let conventions = self.conventions;
        let ref_field = conventions.ref_field.as_str();
        let path = map
            .get(ref_field)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_owned();
        let properties = self.properties(map, Some(ref_field));
        self.references.push(Reference {
            path,
            properties,
            target: None,
        })
    }

    fn properties(
        &mut self,
        map: Map<String, serde_json::Value>,
        skip: Option<&str>,
    ) -> Properties {
        map.into_iter()
            .filter(|(name, _)| !is_container_field(name) && Some(name.as_str()) != skip)
            .map(|(name, value)| {
                let value = self.value(value);
                (name, value)
            })
            .collect()
    }
}
