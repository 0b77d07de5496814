//! Colon-access chain resolution.
//!
//! A chain like `a:b:c` parses left-nested, so resolving the outermost
//! access first resolves its base recursively. Each link checks that the
//! value to its left is tuple-typed and that the field name exists in that
//! tuple type's field scope. Once a link fails, the rest of the chain is
//! abandoned without further diagnostics.

use std::rc::Rc;

use crate::ast::TupleAccessExpr;
use crate::diagnostics::{Diagnostic, DiagnosticSink, ErrorKind};
use crate::scope::ScopeStack;
use crate::semantic::name_analysis::analyze_expr;
use crate::symbols::Symbol;

/// Resolve one colon access, base first.
///
/// On success the field identifier is bound to the field's symbol, which is
/// what lets an enclosing access treat this one as its base.
pub(super) fn resolve_access(
    access: &mut TupleAccessExpr,
    scopes: &ScopeStack,
    sink: &mut dyn DiagnosticSink,
) {
    analyze_expr(&mut access.base, scopes, sink);

    // An unresolved base already produced its own diagnostic; piling a
    // colon-access error on top would only restate it.
    let Some(base_sym) = access.base.resolved_symbol() else {
        return;
    };

    let def = match base_sym.as_ref() {
        Symbol::TupleInstance { def, .. } => Rc::clone(def),
        _ => {
            sink.report(Diagnostic::error(
                ErrorKind::NonTupleColonAccess,
                access.field.pos,
            ));
            return;
        }
    };

    let fields = def
        .tuple_fields()
        .expect("instance symbol links a tuple definition")
        .borrow();

    match fields.lookup(&access.field.name) {
        Some(symbol) => access.field.sym = Some(Rc::clone(symbol)),
        None => sink.report(Diagnostic::error(
            ErrorKind::InvalidTupleFieldName,
            access.field.pos,
        )),
    }
}
