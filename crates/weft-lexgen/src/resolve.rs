//! Resolve rule calls by name. There are no scopes, every rule is visible from everywhere and the
//! first declaration of a name wins.

use std::collections::{hash_map::Entry, HashMap};

use cranelift_entity::EntityRef;

use crate::{
    error::Diagnostics,
    grammar::{Element, RcString, RuleHandle},
    model::{ElementKind, ElementModel, GrammarModel},
};

pub struct ResolveCx<'a> {
    pub err: &'a Diagnostics,
    pub name_to_rule: HashMap<RcString, RuleHandle>,
}

impl<'a> ResolveCx<'a> {
    pub fn new(model: &GrammarModel, err: &'a Diagnostics) -> ResolveCx<'a> {
        let mut this = ResolveCx {
            err,
            name_to_rule: HashMap::new(),
        };
        this.populate(model);
        this
    }

    fn populate(&mut self, model: &GrammarModel) {
        // handles are handed out in declaration order, so the index is the handle
        for (index, rule) in model.rules.iter().enumerate() {
            let entry = self.name_to_rule.entry(rule.name().into());
            match entry {
                Entry::Occupied(_) => self.err.error_static(rule.name(), "Duplicate rule name"),
                Entry::Vacant(v) => {
                    v.insert(RuleHandle::new(index));
                }
            }
        }
    }
}

pub fn resolve_element(element: &ElementModel, rule: &str, cx: &ResolveCx) -> Element {
    let resolve_all = |elements: &[ElementModel]| -> Vec<Element> {
        elements
            .iter()
            .map(|element| resolve_element(element, rule, cx))
            .collect()
    };

    match &element.kind {
        ElementKind::Keyword { value } => Element::Keyword(value.as_str().into()),
        ElementKind::RuleCall { rule: name } => {
            let handle = cx.name_to_rule.get(name.as_str()).copied();
            if handle.is_none() {
                cx.err.error(rule, format_args!("Unknown rule `{name}`"));
            }
            Element::RuleCall(handle)
        }
        ElementKind::Assignment {
            feature, terminal, ..
        } => Element::Assignment {
            feature: feature.as_str().into(),
            terminal: Box::new(resolve_element(terminal, rule, cx)),
        },
        ElementKind::Group { elements } => Element::Group(resolve_all(elements)),
        ElementKind::Alternatives { elements } => Element::Alternatives(resolve_all(elements)),
        ElementKind::UnorderedGroup { elements } => {
            Element::UnorderedGroup(resolve_all(elements))
        }
        ElementKind::CrossReference { terminal, .. } => Element::CrossReference(
            terminal
                .as_ref()
                .map(|terminal| Box::new(resolve_element(terminal, rule, cx))),
        ),
        ElementKind::Action { .. } => Element::Action,
    }
}
