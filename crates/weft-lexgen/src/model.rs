//! The grammar model as delivered by the grammar-analysis service.
//!
//! These types mirror the JSON payload one to one; rule calls are still plain names here and get
//! resolved when the model is turned into a [`Grammar`](crate::grammar::Grammar).

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct GrammarModel {
    #[serde(default)]
    pub name: String,
    pub rules: Vec<RuleModel>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleModel {
    Parser(ParserRuleModel),
    Terminal(TerminalRuleModel),
}

impl RuleModel {
    pub fn name(&self) -> &str {
        match self {
            RuleModel::Parser(rule) => &rule.name,
            RuleModel::Terminal(rule) => &rule.name,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ParserRuleModel {
    pub name: String,
    #[serde(default)]
    pub entry: bool,
    pub definition: ElementModel,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TerminalRuleModel {
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub fragment: bool,
    pub definition: TerminalDefinition,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "?")]
    Optional,
    #[serde(rename = "*")]
    Many,
    #[serde(rename = "+")]
    AtLeastOne,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ElementModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl ElementModel {
    pub fn new(kind: ElementKind) -> ElementModel {
        ElementModel {
            cardinality: None,
            kind,
        }
    }
    pub fn keyword(value: &str) -> ElementModel {
        Self::new(ElementKind::Keyword {
            value: value.to_owned(),
        })
    }
    pub fn rule_call(rule: &str) -> ElementModel {
        Self::new(ElementKind::RuleCall {
            rule: rule.to_owned(),
        })
    }
    pub fn group(elements: Vec<ElementModel>) -> ElementModel {
        Self::new(ElementKind::Group { elements })
    }
    pub fn alternatives(elements: Vec<ElementModel>) -> ElementModel {
        Self::new(ElementKind::Alternatives { elements })
    }
    pub fn assignment(feature: &str, operator: &str, terminal: ElementModel) -> ElementModel {
        Self::new(ElementKind::Assignment {
            feature: feature.to_owned(),
            operator: operator.to_owned(),
            terminal: Box::new(terminal),
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementKind {
    Keyword {
        value: String,
    },
    RuleCall {
        rule: String,
    },
    Assignment {
        feature: String,
        operator: String,
        terminal: Box<ElementModel>,
    },
    Group {
        elements: Vec<ElementModel>,
    },
    Alternatives {
        elements: Vec<ElementModel>,
    },
    UnorderedGroup {
        elements: Vec<ElementModel>,
    },
    CrossReference {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        terminal: Option<Box<ElementModel>>,
    },
    Action {
        #[serde(rename = "type")]
        type_name: String,
    },
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TerminalDefinition {
    Regex { pattern: String },
    Literal { value: String },
    RuleCall { rule: String },
    Group { elements: Vec<TerminalDefinition> },
    Alternatives { elements: Vec<TerminalDefinition> },
}

impl TerminalDefinition {
    pub fn regex(pattern: &str) -> TerminalDefinition {
        TerminalDefinition::Regex {
            pattern: pattern.to_owned(),
        }
    }
}
