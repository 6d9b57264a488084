use std::{collections::HashMap, rc::Rc};

use cranelift_entity::{entity_impl, PrimaryMap};

use crate::{
    error::Diagnostics,
    model::{GrammarModel, RuleModel, TerminalDefinition},
    resolve::{self, ResolveCx},
};

pub type RcString = Rc<str>;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RuleHandle(u32);

entity_impl! { RuleHandle }

#[derive(Clone, Default, Debug)]
pub struct Attributes {
    pub entry: bool,
    pub hidden: bool,
    pub fragment: bool,
}

/// Parser rule body with rule calls resolved to handles.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Element {
    Keyword(RcString),
    /// `None` when the called rule does not exist
    RuleCall(Option<RuleHandle>),
    Assignment {
        feature: RcString,
        terminal: Box<Element>,
    },
    Group(Vec<Element>),
    Alternatives(Vec<Element>),
    UnorderedGroup(Vec<Element>),
    CrossReference(Option<Box<Element>>),
    Action,
}

impl Element {
    /// Pre-order visit of this element and everything nested in it.
    pub fn visit(&self, fun: &mut dyn FnMut(&Element)) {
        fun(self);
        match self {
            Element::Assignment { terminal, .. } => terminal.visit(fun),
            Element::CrossReference(Some(terminal)) => terminal.visit(fun),
            Element::Group(elements)
            | Element::Alternatives(elements)
            | Element::UnorderedGroup(elements) => {
                for element in elements {
                    element.visit(fun);
                }
            }
            Element::Keyword(_)
            | Element::RuleCall(_)
            | Element::CrossReference(None)
            | Element::Action => {}
        }
    }
}

#[derive(Clone, Debug)]
pub enum RuleBody {
    Parser(Element),
    Terminal(TerminalDefinition),
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub name: RcString,
    pub type_name: Option<RcString>,
    pub attributes: Attributes,
    pub body: RuleBody,
}

/// Grammar rules in declaration order.
pub struct Grammar {
    pub rules: PrimaryMap<RuleHandle, Rule>,
    name_to_rule: HashMap<RcString, RuleHandle>,
}

impl Grammar {
    pub fn new(model: &GrammarModel, err: &Diagnostics) -> Grammar {
        let cx = ResolveCx::new(model, err);

        let mut rules = PrimaryMap::with_capacity(model.rules.len());
        for item in &model.rules {
            let rule = match item {
                RuleModel::Parser(parser) => Rule {
                    name: parser.name.as_str().into(),
                    type_name: None,
                    attributes: Attributes {
                        entry: parser.entry,
                        ..Default::default()
                    },
                    body: RuleBody::Parser(resolve::resolve_element(
                        &parser.definition,
                        &parser.name,
                        &cx,
                    )),
                },
                RuleModel::Terminal(terminal) => Rule {
                    name: terminal.name.as_str().into(),
                    type_name: terminal.type_name.as_deref().map(Into::into),
                    attributes: Attributes {
                        hidden: terminal.hidden,
                        fragment: terminal.fragment,
                        ..Default::default()
                    },
                    body: RuleBody::Terminal(terminal.definition.clone()),
                },
            };
            rules.push(rule);
        }

        Grammar {
            rules,
            name_to_rule: cx.name_to_rule,
        }
    }

    pub fn get_rule(&self, handle: RuleHandle) -> Option<&Rule> {
        self.rules.get(handle)
    }

    pub fn lookup(&self, name: &str) -> Option<RuleHandle> {
        self.name_to_rule.get(name).copied()
    }

    pub fn parser_rules(&self) -> impl Iterator<Item = (RuleHandle, &Rule, &Element)> + '_ {
        self.rules
            .iter()
            .filter_map(|(handle, rule)| match &rule.body {
                RuleBody::Parser(element) => Some((handle, rule, element)),
                RuleBody::Terminal(_) => None,
            })
    }

    pub fn terminal_rules(
        &self,
    ) -> impl Iterator<Item = (RuleHandle, &Rule, &TerminalDefinition)> + '_ {
        self.rules
            .iter()
            .filter_map(|(handle, rule)| match &rule.body {
                RuleBody::Terminal(definition) => Some((handle, rule, definition)),
                RuleBody::Parser(_) => None,
            })
    }

    /// Parser rules marked as entry, or all parser rules if none are.
    pub fn entry_rules(&self) -> Vec<RuleHandle> {
        let entries = self
            .parser_rules()
            .filter(|(_, rule, _)| rule.attributes.entry)
            .map(|(handle, _, _)| handle)
            .collect::<Vec<_>>();

        if entries.is_empty() {
            self.parser_rules().map(|(handle, _, _)| handle).collect()
        } else {
            entries
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementModel, ParserRuleModel, TerminalRuleModel};

    fn parser(name: &str, entry: bool, definition: ElementModel) -> RuleModel {
        RuleModel::Parser(ParserRuleModel {
            name: name.to_owned(),
            entry,
            definition,
        })
    }

    fn terminal(name: &str, pattern: &str) -> RuleModel {
        RuleModel::Terminal(TerminalRuleModel {
            name: name.to_owned(),
            type_name: None,
            hidden: false,
            fragment: false,
            definition: TerminalDefinition::regex(pattern),
        })
    }

    #[test]
    fn rules_keep_declaration_order() {
        let model = GrammarModel {
            name: "Test".into(),
            rules: vec![
                terminal("Z", "z"),
                parser("Model", false, ElementModel::rule_call("Z")),
                terminal("A", "a"),
            ],
        };
        let err = Diagnostics::new();
        let grammar = Grammar::new(&model, &err);

        let names = grammar
            .rules
            .iter()
            .map(|(_, rule)| rule.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Z", "Model", "A"]);
        assert!(err.is_empty());

        let model_rule = grammar.lookup("Model").unwrap();
        let RuleBody::Parser(body) = &grammar.rules[model_rule].body else {
            panic!("Expected parser body");
        };
        assert_eq!(*body, Element::RuleCall(grammar.lookup("Z")));
    }

    #[test]
    fn entry_rules_default_to_all_parser_rules() {
        let model = GrammarModel {
            name: "Test".into(),
            rules: vec![
                parser("A", false, ElementModel::keyword("a")),
                terminal("T", "t"),
                parser("B", false, ElementModel::keyword("b")),
            ],
        };
        let grammar = Grammar::new(&model, &Diagnostics::new());
        assert_eq!(grammar.entry_rules().len(), 2);

        let mut model = model;
        let RuleModel::Parser(b) = &mut model.rules[2] else {
            unreachable!()
        };
        b.entry = true;
        let grammar = Grammar::new(&model, &Diagnostics::new());
        assert_eq!(grammar.entry_rules(), [grammar.lookup("B").unwrap()]);
    }
}
