//! Diagnostic codes and the catalog of codes a load can report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a code reports a load that stopped (`E`) or one that went on (`W`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// The dump could not be loaded.
    Error,
    /// The dump loaded, but something in it was skipped or reordered.
    Warning,
}

impl Category {
    /// Returns the letter a code of this category is printed with.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A category letter plus a three-digit number, printed as `W101`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    const fn warning(number: u16) -> Self {
        Self::new(Category::Warning, number)
    }

    /// Short kebab-case name for the codes in this catalog.
    pub fn name(self) -> Option<&'static str> {
        CATALOG
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, name)| *name)
    }
}

/// A value change referenced an identifier that was never declared.
pub const UNRESOLVED_ID: DiagnosticCode = DiagnosticCode::warning(101);
/// A time marker went backwards and was accepted under the lenient policy.
pub const TIME_WENT_BACKWARDS: DiagnosticCode = DiagnosticCode::warning(102);
/// An identifier code was declared twice with the same name and scope.
pub const ALIASED_DECLARATION: DiagnosticCode = DiagnosticCode::warning(103);

const CATALOG: [(DiagnosticCode, &str); 3] = [
    (UNRESOLVED_ID, "unresolved-id"),
    (TIME_WENT_BACKWARDS, "time-went-backwards"),
    (ALIASED_DECLARATION, "aliased-declaration"),
];

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_warnings_print_as_w1xx() {
        assert_eq!(UNRESOLVED_ID.to_string(), "W101");
        assert_eq!(TIME_WENT_BACKWARDS.to_string(), "W102");
        assert_eq!(ALIASED_DECLARATION.to_string(), "W103");
    }

    #[test]
    fn catalog_codes_are_warnings_with_names() {
        for (code, name) in CATALOG {
            assert_eq!(code.category, Category::Warning);
            assert_eq!(code.name(), Some(name));
        }
        assert_eq!(UNRESOLVED_ID.name(), Some("unresolved-id"));
    }

    #[test]
    fn codes_outside_the_catalog_have_no_name() {
        let fatal = DiagnosticCode::new(Category::Error, 1);
        assert_eq!(fatal.to_string(), "E001");
        assert_eq!(fatal.name(), None);
        assert_eq!(DiagnosticCode::new(Category::Error, 101).name(), None);
    }

    #[test]
    fn json_form_names_the_category() {
        let json = serde_json::to_string(&TIME_WENT_BACKWARDS).unwrap();
        assert_eq!(json, r#"{"category":"Warning","number":102}"#);
    }
}
