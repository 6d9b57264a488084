//! Reconstruction of serialized syntax trees into a linked graph.
//!
//! A document is a JSON tree where records with a type field are nodes and records with a
//! reference field point at another node by path. [`link`] parses such a document into a
//! [`LinkedAst`], records every node's container and resolves every reference it can. The
//! projections in [`flatten`] and [`graph`] give read-only views over the result.

pub mod ast;
pub mod conventions;
pub mod document;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod link;

pub use ast::{Entry, LinkedAst, Node, NodeId, Reference, ReferenceId, Value};
pub use conventions::Conventions;
pub use document::{DocumentChange, LinkedDocument};
pub use error::LinkError;
pub use graph::NodeEdgeGraph;
pub use link::link;
