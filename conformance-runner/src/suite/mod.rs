//! Built-in Promises/A+ cases, grouped by the section of the standard they
//! cover.

mod combinators;
mod resolution;
mod state;
mod then;

use crate::harness::Harness;

pub type CaseFn = fn(&Harness) -> Result<(), String>;

pub struct Case {
    pub section: &'static str,
    pub name: &'static str,
    pub run: CaseFn,
}

impl Case {
    pub const fn new(section: &'static str, name: &'static str, run: CaseFn) -> Self {
        Self { section, name, run }
    }

    pub fn id(&self) -> String {
        format!("{} {}", self.section, self.name)
    }
}

pub fn cases() -> Vec<Case> {
    let mut cases = Vec::new();
    cases.extend(state::cases());
    cases.extend(then::cases());
    cases.extend(resolution::cases());
    cases.extend(combinators::cases());
    cases
}
