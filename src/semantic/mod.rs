//! Semantic analysis framework for base programs.
//!
//! Provides the pass infrastructure and the `analyze` entry point. Name
//! analysis is the one pass this phase owns; later phases (type checking of
//! expressions, code generation) slot in behind it.

pub mod name_analysis;
mod tuple_access;

pub use name_analysis::NameAnalysisPass;

use crate::ast::Program;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::scope::{EmptyStackError, ScopeStack};

/// A semantic analysis pass.
///
/// A pass walks the whole program once, reporting user-facing problems to
/// the sink and never aborting on them. The `Err` case is reserved for
/// internal scope-discipline faults, which indicate a bug in the pass
/// itself rather than in the analyzed program.
pub trait SemanticPass {
    /// Name of this pass for debugging/logging
    fn name(&self) -> &'static str;

    /// Run the pass over the program with a freshly initialized scope stack
    fn run(
        &self,
        program: &mut Program,
        scopes: &mut ScopeStack,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), EmptyStackError>;
}

/// Registry of semantic passes, run in registration order.
pub struct PassRegistry {
    passes: Vec<Box<dyn SemanticPass>>,
}

impl Default for PassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PassRegistry {
    /// Create a new registry with the standard passes
    pub fn new() -> Self {
        let mut registry = Self { passes: Vec::new() };
        registry.register(Box::new(NameAnalysisPass));
        registry
    }

    /// Register a pass
    pub fn register(&mut self, pass: Box<dyn SemanticPass>) {
        self.passes.push(pass);
    }

    /// Run all passes and collect diagnostics in traversal order.
    ///
    /// Each pass gets its own scope stack, initialized with a single global
    /// scope.
    pub fn run_all(&self, program: &mut Program) -> Result<Vec<Diagnostic>, EmptyStackError> {
        let mut diagnostics = Vec::new();

        for pass in &self.passes {
            tracing::debug!(pass = pass.name(), "running semantic pass");
            let mut scopes = ScopeStack::new();
            pass.run(program, &mut scopes, &mut diagnostics)?;
        }

        Ok(diagnostics)
    }
}

/// Analyze a whole program and return its diagnostics in source order.
///
/// Identifier nodes in the tree are annotated with the symbols they
/// resolved to as a side effect.
pub fn analyze(program: &mut Program) -> Result<Vec<Diagnostic>, EmptyStackError> {
    PassRegistry::new().run_all(program)
}
