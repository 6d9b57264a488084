use std::fmt::Write;

use cranelift_entity::SecondaryMap;
use serde::Serialize;

use crate::ast::{Entry, LinkedAst, NodeId};

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct GraphNode {
    /// Dense identifier in visitation order, starting at 0 for the root.
    pub id: usize,
    pub kind: String,
    #[serde(skip)]
    pub node: NodeId,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

/// Containment structure of a linked tree, references are not edges.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct NodeEdgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

impl NodeEdgeGraph {
    pub fn new(ast: &LinkedAst) -> NodeEdgeGraph {
        let mut graph = NodeEdgeGraph::default();
        let mut ids = SecondaryMap::<NodeId, Option<usize>>::new();

        for entry in ast.flatten() {
            let Entry::Node(node) = entry else {
                continue;
            };

            let id = graph.nodes.len();
            ids[node] = Some(id);
            graph.nodes.push(GraphNode {
                id,
                kind: ast.node(node).kind().to_owned(),
                node,
            });

            // the container is always visited first
            if let Some(from) = ast.node(node).container_node().and_then(|c| ids[c]) {
                graph.edges.push(Edge { from, to: id });
            }
        }

        graph
    }

    /// Renders the graph in the dot language.
    pub fn to_dot(&self) -> String {
        let mut buf = String::new();
        _ = self.display_dot(&mut buf);
        buf
    }

    pub fn display_dot(&self, buf: &mut dyn Write) -> std::fmt::Result {
        writeln!(buf, "strict digraph {{")?;
        for node in &self.nodes {
            write!(buf, "    {} [label=", node.id)?;
            display_dot_string(buf, &node.kind)?;
            writeln!(buf, "]")?;
        }
        for edge in &self.edges {
            writeln!(buf, "    {} -> {}", edge.from, edge.to)?;
        }
        writeln!(buf, "}}")
    }
}

fn display_dot_string(buf: &mut dyn Write, value: &str) -> std::fmt::Result {
    buf.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' | '\\' => write!(buf, "\\{c}")?,
            '\n' => buf.write_str("\\n")?,
            c => buf.write_char(c)?,
        }
    }
    buf.write_char('"')
}

impl LinkedAst {
    pub fn to_node_edge_graph(&self) -> NodeEdgeGraph {
        NodeEdgeGraph::new(self)
    }
}
