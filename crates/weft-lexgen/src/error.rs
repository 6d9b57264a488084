use std::{borrow::Cow, cell::RefCell, fmt::Display};

pub type Error = Cow<'static, str>;

/// A problem attached to the grammar rule it was found in.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    pub rule: String,
    pub message: Error,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

/// Collects non-fatal grammar problems, synthesis carries on regardless.
#[derive(Default)]
pub struct Diagnostics {
    errors: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn error_static(&self, rule: &str, err: &'static str) {
        self.push(rule, err.into());
    }
    pub fn error(&self, rule: &str, err: impl ToString) {
        self.push(rule, err.to_string().into());
    }
    fn push(&self, rule: &str, message: Error) {
        self.errors.borrow_mut().push(Diagnostic {
            rule: rule.to_owned(),
            message,
        });
    }
    pub fn get(&self) -> std::cell::Ref<'_, Vec<Diagnostic>> {
        self.errors.borrow()
    }
    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}
