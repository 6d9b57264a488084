use lsp_types::{Diagnostic, DiagnosticSeverity, Url};
use serde::Deserialize;

use crate::{ast::LinkedAst, conventions::Conventions, error::LinkError};

/// Notification sent by the analysis backend whenever it has a new parse of a document.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChange {
    pub uri: Url,
    /// The serialized tree, as text.
    pub content: String,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentChange {
    pub fn from_json(text: &str) -> Result<DocumentChange, LinkError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Links the content from scratch, nothing is carried over from earlier versions.
    pub fn link(self, conventions: &Conventions) -> Result<LinkedDocument, LinkError> {
        let ast = LinkedAst::parse(&self.content, conventions)?;
        log::debug!(
            "Linked {} ({} nodes, {} references)",
            self.uri,
            ast.nodes().len(),
            ast.references().len()
        );
        Ok(LinkedDocument {
            uri: self.uri,
            ast,
            diagnostics: self.diagnostics,
        })
    }
}

#[derive(Clone, Debug)]
pub struct LinkedDocument {
    pub uri: Url,
    pub ast: LinkedAst,
    pub diagnostics: Vec<Diagnostic>,
}

impl LinkedDocument {
    /// Diagnostics with error severity. A diagnostic without a severity counts as an error, that
    /// is how clients are told to present it.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.map_or(true, |s| s == DiagnosticSeverity::ERROR))
    }
}
