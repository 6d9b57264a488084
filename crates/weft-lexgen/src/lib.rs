//! Derives an editor tokenizer description from a grammar model.
//!
//! Parser rules only contribute keyword literals, terminal rules with a plain regular expression
//! become tokenizer rules. The output is purely declarative and meant for syntax highlighting.

pub mod collate;
pub mod error;
pub mod grammar;
pub mod keywords;
pub mod lexer;
pub mod model;
pub mod pattern;
pub mod resolve;
pub mod tokenizer;

use error::Diagnostics;
use grammar::Grammar;
use model::GrammarModel;
use tokenizer::TokenizerDescription;

/// Builds the tokenizer description of `model`. Problems with the model are reported into `err`,
/// the affected rules simply contribute less.
pub fn synthesize(model: &GrammarModel, err: &Diagnostics) -> TokenizerDescription {
    Grammar::new(model, err).create_tokenizer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesize_from_json() {
        let text = r#"{
            "name": "Calc",
            "rules": [
                { "kind": "parser", "name": "Model", "entry": true, "definition":
                    { "kind": "group", "elements": [
                        { "kind": "keyword", "value": "def" },
                        { "kind": "assignment", "feature": "name", "operator": "=",
                          "terminal": { "kind": "ruleCall", "rule": "ID" } },
                        { "kind": "keyword", "value": ":" },
                        { "kind": "ruleCall", "rule": "Missing" }
                    ] } },
                { "kind": "terminal", "name": "WS", "hidden": true,
                  "definition": { "kind": "regex", "pattern": "\\s+" } },
                { "kind": "terminal", "name": "ID", "type": "string",
                  "definition": { "kind": "regex", "pattern": "[_a-zA-Z][\\w_]*" } },
                { "kind": "terminal", "name": "SL_COMMENT", "hidden": true,
                  "definition": { "kind": "regex", "pattern": "\\/\\/[^\\n\\r]*" } }
            ]
        }"#;
        let model: GrammarModel = serde_json::from_str(text).unwrap();

        let err = Diagnostics::new();
        let description = synthesize(&model, &err);

        assert_eq!(err.get().len(), 1);
        assert_eq!(description.keywords, ["def"]);
        assert_eq!(description.operators, [":"]);

        let json = serde_json::to_value(&description).unwrap();
        assert_eq!(
            json["tokenizer"]["initial"][0]["action"]["cases"]["@default"]["token"],
            "string"
        );
        assert_eq!(json["tokenizer"]["whitespace"][0]["action"]["token"], "white");
        assert_eq!(json["tokenizer"]["whitespace"][1]["action"]["token"], "comment");
    }
}
