pub mod ast;
pub mod diagnostics;
pub mod scope;
pub mod semantic;
pub mod symbols;

pub use ast::{Pos, Program};
pub use diagnostics::{Diagnostic, DiagnosticSink, ErrorKind, Severity};
pub use scope::{DuplicateNameError, EmptyStackError, Scope, ScopeStack};
pub use semantic::{analyze, NameAnalysisPass, PassRegistry, SemanticPass};
pub use symbols::{Symbol, SymbolKind, TypeDesc};
