use proptest::prelude::*;
use serde_json::{json, Map, Value};
use weft_ast::{link, Entry, LinkedAst};

fn reference() -> impl Strategy<Value = Value> {
    let path = prop_oneof![
        Just("#".to_owned()),
        (0..4usize).prop_map(|i| format!("#/items@{i}")),
        (0..4usize, 0..4usize).prop_map(|(i, j)| format!("#/items@{i}/items@{j}")),
        Just("#/child".to_owned()),
        Just("#/child/child".to_owned()),
        Just("#missing@x".to_owned()),
        Just("no-prefix".to_owned()),
    ];
    path.prop_map(|path| json!({ "$ref": path }))
}

fn tree() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![Just("Leaf"), Just("Name"), Just("Literal")]
        .prop_map(|kind| json!({ "$type": kind, "value": 1 }));

    leaf.prop_recursive(5, 64, 4, |inner| {
        (
            prop::collection::vec(inner.clone(), 0..4),
            prop::option::of(inner),
            prop::collection::vec(reference(), 0..3),
        )
            .prop_map(|(items, child, refs)| {
                let mut map = Map::new();
                map.insert("$type".to_owned(), "Group".into());
                map.insert("items".to_owned(), Value::Array(items));
                if let Some(child) = child {
                    map.insert("child".to_owned(), child);
                }
                for (i, reference) in refs.into_iter().enumerate() {
                    map.insert(format!("ref{i}"), reference);
                }
                Value::Object(map)
            })
    })
}

fn linked(value: &Value) -> LinkedAst {
    link(&value.to_string()).unwrap()
}

proptest! {
    #[test]
    fn linking_is_idempotent(value in tree()) {
        let text = value.to_string();
        prop_assert_eq!(link(&text).unwrap(), link(&text).unwrap());
    }

    #[test]
    fn flatten_visits_everything_once(value in tree()) {
        let ast = linked(&value);
        let entries = ast.flatten().collect::<Vec<_>>();

        let nodes = entries.iter().filter(|e| matches!(e, Entry::Node(_))).count();
        let references = entries.len() - nodes;
        prop_assert_eq!(nodes, ast.nodes().count());
        prop_assert_eq!(references, ast.references().count());

        let unique = entries.iter().collect::<std::collections::HashSet<_>>();
        prop_assert_eq!(unique.len(), entries.len());
    }

    #[test]
    fn containment_forms_a_tree(value in tree()) {
        let ast = linked(&value);
        let graph = ast.to_node_edge_graph();

        prop_assert_eq!(graph.nodes.len(), ast.nodes().count());
        prop_assert_eq!(graph.edges.len(), graph.nodes.len() - 1);
        for edge in &graph.edges {
            prop_assert!(edge.from < edge.to);
        }
    }

    #[test]
    fn containers_point_back(value in tree()) {
        let ast = linked(&value);

        for (id, node) in ast.nodes() {
            let Some(container) = &node.container else {
                prop_assert_eq!(id, ast.root());
                continue;
            };
            let found = ast.child(container.node, &container.property, container.index);
            prop_assert_eq!(found, Some(id));
        }
    }

    #[test]
    fn resolved_targets_match_paths(value in tree()) {
        let ast = linked(&value);

        for (_, reference) in ast.references() {
            prop_assert_eq!(reference.target, ast.resolve_path(&reference.path));
        }
    }
}
