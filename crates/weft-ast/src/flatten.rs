use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;

use crate::ast::{Entry, LinkedAst};

/// Lazy pre-order traversal over every node and reference reachable from the root.
///
/// Container back edges are handles outside the properties, so the walk can never climb back up.
/// Cloning the iterator restarts from the clone's position.
#[derive(Clone)]
pub struct Flatten<'a> {
    ast: &'a LinkedAst,
    stack: Vec<Entry>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        if let Entry::Node(id) = entry {
            let start = self.stack.len();
            self.stack
                .extend(self.ast.node(id).children().map(|slot| slot.entry));
            self.stack[start..].reverse();
        }
        Some(entry)
    }
}

impl LinkedAst {
    pub fn flatten(&self) -> Flatten<'_> {
        Flatten {
            ast: self,
            stack: vec![Entry::Node(self.root())],
        }
    }

    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics::default();
        for entry in self.flatten() {
            match entry {
                Entry::Node(id) => {
                    stats.nodes += 1;
                    *stats.kinds.entry(self.node(id).kind().to_owned()).or_default() += 1;
                }
                Entry::Reference(id) => {
                    stats.references += 1;
                    match self.reference(id).is_resolved() {
                        true => stats.resolved += 1,
                        false => stats.unresolved += 1,
                    }
                }
            }
        }
        stats
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct Statistics {
    pub nodes: usize,
    pub references: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Node count per kind.
    pub kinds: BTreeMap<String, usize>,
}

impl Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "nodes\t{}", self.nodes)?;
        writeln!(
            f,
            "references\t{} ({} resolved, {} unresolved)",
            self.references, self.resolved, self.unresolved
        )?;
        for (kind, count) in &self.kinds {
            writeln!(f, "  {kind}\t{count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{ast::Entry, link::link};

    const DOCUMENT: &str = r##"{"$type":"Model","items":[
        {"$type":"Item","name":"a","parts":[{"$type":"Part"}]},
        {"$type":"Item","name":"b","uses":{"$ref":"#/items@0"}},
        {"$type":"Item","name":"c","uses":{"$ref":"#/items@9"}}
    ],"meta":{"note":{"$type":"Hidden"}}}"##;

    #[test]
    fn preorder_visits_everything_once() {
        let ast = link(DOCUMENT).unwrap();

        let kinds = ast
            .flatten()
            .map(|entry| match entry {
                Entry::Node(id) => ast.node(id).kind().to_owned(),
                Entry::Reference(id) => format!("ref {}", ast.reference(id).path),
            })
            .collect::<Vec<_>>();

        assert_eq!(
            kinds,
            [
                "Model",
                "Item",
                "Part",
                "Item",
                "ref #/items@0",
                "Item",
                "ref #/items@9"
            ]
        );
    }

    #[test]
    fn restartable() {
        let ast = link(DOCUMENT).unwrap();

        let mut flatten = ast.flatten();
        flatten.next();
        let rest = flatten.clone().count();
        assert_eq!(flatten.count(), rest);
        assert_eq!(ast.flatten().count(), rest + 1);
    }

    #[test]
    fn back_edges_are_not_followed() {
        let ast = link(DOCUMENT).unwrap();
        // every node except the root has a container, none is visited twice
        let mut seen = std::collections::HashSet::new();
        for entry in ast.flatten() {
            assert!(seen.insert(entry));
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn statistics_count_entries() {
        let ast = link(DOCUMENT).unwrap();
        let stats = ast.statistics();

        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.references, 2);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.unresolved, 1);
        assert_eq!(stats.kinds["Item"], 3);
        // only reachable through a plain record
        assert!(!stats.kinds.contains_key("Hidden"));
    }
}
