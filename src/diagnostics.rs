//! Diagnostics for the header scanner and binding generator.
//!
//! The legacy tooling recovered from every malformed construct by propagating
//! empty values, which surfaced as broken generated C++ long after the fact.
//! Here every recognized-but-malformed construct produces a `Diagnostic` with
//! a stable code and source location; unannotated lines are still skipped
//! silently, which is the DSL's contract.

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const DIAG_MALFORMED_ANNOTATION: &str = "URG001";
pub const DIAG_BAD_CLASS_SHAPE: &str = "URG002";
pub const DIAG_BAD_ENUM_SHAPE: &str = "URG003";
pub const DIAG_BAD_STRUCT_SHAPE: &str = "URG004";
pub const DIAG_BAD_ATTRIBUTE_SHAPE: &str = "URG005";
pub const DIAG_BAD_METHOD_SHAPE: &str = "URG006";
pub const DIAG_BAD_CLOSURE_SHAPE: &str = "URG007";
pub const DIAG_OVERLOAD_ARITY_CLASH: &str = "URG008";
pub const DIAG_UNKNOWN_TYPE: &str = "URG009";
pub const DIAG_ORPHAN_DECLARATION: &str = "URG010";
pub const DIAG_MISSING_BINDING_NAME: &str = "URG011";

/// Short statement of the rule each code enforces, carried on the diagnostic
/// so build logs are self-explanatory.
fn guarantee(code: &str) -> &'static str {
    match code {
        DIAG_MALFORMED_ANNOTATION => "Annotation comments must match /*--urge(...)--*/.",
        DIAG_BAD_CLASS_SHAPE => {
            "Class openers must be URGE_OBJECT(Name) or the legacy ': public' form."
        }
        DIAG_BAD_ENUM_SHAPE => "Enum bodies must open with 'enum [class] Name [: range] {'.",
        DIAG_BAD_STRUCT_SHAPE => "Struct openers must name the struct before the brace.",
        DIAG_BAD_ATTRIBUTE_SHAPE => "Attribute macros take exactly (Name, type).",
        DIAG_BAD_METHOD_SHAPE => "Method declarations need a return type, a name and a parameter list.",
        DIAG_BAD_CLOSURE_SHAPE => "Callback aliases must be 'using Name = base::RepeatingCallback<...>;'.",
        DIAG_OVERLOAD_ARITY_CLASH => {
            "Overload variants of one method must have distinct parameter counts."
        }
        DIAG_UNKNOWN_TYPE => "Referenced type names must resolve to a known entity, enum or struct.",
        DIAG_ORPHAN_DECLARATION => "Member declarations require an enclosing annotated class.",
        DIAG_MISSING_BINDING_NAME => "Annotated declarations should carry a name: entry.",
        _ => "Unknown diagnostic.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC TYPE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub guarantee: String,
    pub file: String,
    pub line: u32,
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>, file: &str, line: u32) -> Self {
        Self::with_severity(code, Severity::Error, message, file, line)
    }

    pub fn warning(code: &str, message: impl Into<String>, file: &str, line: u32) -> Self {
        Self::with_severity(code, Severity::Warning, message, file, line)
    }

    fn with_severity(
        code: &str,
        severity: Severity,
        message: impl Into<String>,
        file: &str,
        line: u32,
    ) -> Self {
        Diagnostic {
            code: code.to_string(),
            severity,
            message: message.into(),
            guarantee: guarantee(code).to_string(),
            file: file.to_string(),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}:{}: {} [{}]: {}",
            self.file, self.line, tag, self.code, self.message
        )
    }
}

/// Accumulator threaded through the scanner and the generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}
