//! Diagnostics produced by name analysis.
//!
//! Every error is a value handed to a [`DiagnosticSink`]; the analysis never
//! aborts on a reported error, so one run yields every error in the program
//! in traversal (source) order. Presentation and exit codes belong to the
//! caller.

use std::fmt;

use crate::ast::Pos;

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// The fixed set of name-analysis errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A declaration collided with a name in the same scope.
    MultiplyDeclaredIdentifier,
    /// A name used but not declared in any enclosing scope.
    UndeclaredIdentifier,
    /// A name used where a tuple type is required resolved to something
    /// that is not a tuple type definition.
    InvalidTupleTypeName,
    /// A variable or formal declared with type void.
    VoidVariable,
    /// A colon access whose base (or mid-chain field) is not tuple-typed.
    NonTupleColonAccess,
    /// A colon access naming a field the tuple type does not have.
    InvalidTupleFieldName,
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::MultiplyDeclaredIdentifier => "Multiply-declared identifier",
            ErrorKind::UndeclaredIdentifier => "Undeclared identifier",
            ErrorKind::InvalidTupleTypeName => "Invalid name of tuple type",
            ErrorKind::VoidVariable => "Non-function declared void",
            ErrorKind::NonTupleColonAccess => "Colon-access of non-tuple type",
            ErrorKind::InvalidTupleFieldName => "Invalid tuple field name",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A positioned diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: ErrorKind,
    pub pos: Pos,
}

impl Diagnostic {
    pub fn error(kind: ErrorKind, pos: Pos) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            pos,
        }
    }

    pub fn warning(kind: ErrorKind, pos: Pos) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            pos,
        }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.kind)
    }
}

/// Where the traversal sends diagnostics.
///
/// Collecting into a `Vec` is the normal case; tests assert on the exact
/// sequence without capturing any output stream.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let d = Diagnostic::error(ErrorKind::UndeclaredIdentifier, Pos::new(4, 9));
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.kind, ErrorKind::UndeclaredIdentifier);
        assert_eq!(d.pos, Pos::new(4, 9));
    }

    #[test]
    fn test_warning_creation() {
        let d = Diagnostic::warning(ErrorKind::InvalidTupleFieldName, Pos::new(7, 3));
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.kind, ErrorKind::InvalidTupleFieldName);
    }

    #[test]
    fn test_display_format() {
        let d = Diagnostic::error(ErrorKind::MultiplyDeclaredIdentifier, Pos::new(2, 1));
        assert_eq!(d.to_string(), "2:1: Multiply-declared identifier");
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            ErrorKind::VoidVariable.message(),
            "Non-function declared void"
        );
        assert_eq!(
            ErrorKind::InvalidTupleTypeName.message(),
            "Invalid name of tuple type"
        );
        assert_eq!(
            ErrorKind::NonTupleColonAccess.message(),
            "Colon-access of non-tuple type"
        );
        assert_eq!(
            ErrorKind::InvalidTupleFieldName.message(),
            "Invalid tuple field name"
        );
    }

    #[test]
    fn test_vec_sink_preserves_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::error(
            ErrorKind::UndeclaredIdentifier,
            Pos::new(1, 1),
        ));
        sink.report(Diagnostic::error(
            ErrorKind::InvalidTupleFieldName,
            Pos::new(2, 3),
        ));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].kind, ErrorKind::UndeclaredIdentifier);
        assert_eq!(sink[1].kind, ErrorKind::InvalidTupleFieldName);
    }
}
