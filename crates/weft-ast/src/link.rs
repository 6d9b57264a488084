use crate::{
    ast::{lookup, Builder, Container, Entry, LinkedAst, NodeId, ReferenceId, Value},
    conventions::Conventions,
    error::LinkError,
};

enum Step {
    Descend {
        node: NodeId,
        container: Option<Container>,
    },
    Resolve(ReferenceId),
}

impl LinkedAst {
    /// Parses `text` and links the resulting tree.
    pub fn parse(text: &str, conventions: &Conventions) -> Result<LinkedAst, LinkError> {
        let json = serde_json::from_str::<serde_json::Value>(text)?;
        Self::from_value(json, conventions)
    }

    pub fn from_value(
        json: serde_json::Value,
        conventions: &Conventions,
    ) -> Result<LinkedAst, LinkError> {
        let serde_json::Value::Object(map) = json else {
            return Err(LinkError::RootNotRecord);
        };

        let mut ast = Builder::new(conventions).build_root(map);
        ast.link();
        Ok(ast)
    }

    /// Pre-order walk from the root that records every node's container and resolves every
    /// reference it meets. Nodes only reachable through plain records are left alone.
    fn link(&mut self) {
        let mut stack = vec![Step::Descend {
            node: self.root,
            container: None,
        }];

        while let Some(step) = stack.pop() {
            match step {
                Step::Resolve(id) => {
                    let reference = &self.references[id];
                    let target = self.resolve_path(&reference.path);
                    if target.is_none() {
                        log::debug!("Unresolved reference {:?}", reference.path);
                    }
                    self.references[id].target = target;
                }
                Step::Descend { node, container } => {
                    log::trace!("Linking {node} ({})", self.nodes[node].kind());
                    self.nodes[node].container = container;

                    let steps = self.nodes[node]
                        .children()
                        .map(|slot| match slot.entry {
                            Entry::Reference(id) => Step::Resolve(id),
                            Entry::Node(child) => Step::Descend {
                                node: child,
                                container: Some(Container {
                                    node,
                                    property: slot.property.to_owned(),
                                    index: slot.index,
                                }),
                            },
                        })
                        .collect::<Vec<_>>();

                    // reversed so that the first child is processed first
                    stack.extend(steps.into_iter().rev());
                }
            }
        }
    }

    /// Follows a reference path from the root, `None` if any step leads nowhere or the path
    /// ends on something that is not a node.
    pub fn resolve_path(&self, path: &str) -> Option<NodeId> {
        let segments = self.conventions.segments(path)?;

        let root = Value::Node(self.root);
        let mut current = &root;
        for segment in segments {
            let properties = match current {
                Value::Node(id) => &self.nodes[*id].properties,
                Value::Record(properties) => properties,
                _ => return None,
            };
            let value = lookup(properties, segment.property)?;
            current = match segment.index {
                Some(index) => value.as_array()?.get(index)?,
                None => value,
            };
        }

        current.as_node()
    }
}

/// Links a document using the default conventions.
pub fn link(text: &str) -> Result<LinkedAst, LinkError> {
    LinkedAst::parse(text, &Conventions::default())
}
