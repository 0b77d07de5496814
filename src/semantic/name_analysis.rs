//! Name analysis pass.
//!
//! Binds every identifier occurrence to the symbol of the declaration it
//! refers to and reports:
//! - Multiply-declared identifier
//! - Undeclared identifier
//! - Invalid name of tuple type
//! - Non-function declared void
//! - Colon-access of non-tuple type (see [`tuple_access`])
//! - Invalid tuple field name (see [`tuple_access`])
//!
//! Every error is recovered locally: the offending name is left unbound and
//! the traversal continues, so one run reports the whole program.
//!
//! [`tuple_access`]: super::tuple_access

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{
    AssignExpr, Block, CallExpr, Decl, Expr, FnDecl, Ident, Program, Stmt, TupleDecl, TypeSpec,
    VarDecl,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink, ErrorKind};
use crate::scope::{EmptyStackError, Scope, ScopeStack};
use crate::semantic::{tuple_access, SemanticPass};
use crate::symbols::{Primitive, Symbol, TypeDesc};

/// Pass that resolves names and enforces the scoping rules
pub struct NameAnalysisPass;

impl SemanticPass for NameAnalysisPass {
    fn name(&self) -> &'static str {
        "name_analysis"
    }

    fn run(
        &self,
        program: &mut Program,
        scopes: &mut ScopeStack,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), EmptyStackError> {
        analyze_decls(&mut program.decls, scopes, sink)
    }
}

fn analyze_decls(
    decls: &mut [Decl],
    scopes: &mut ScopeStack,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), EmptyStackError> {
    for decl in decls {
        analyze_decl(decl, scopes, sink)?;
    }
    Ok(())
}

/// Declaration lists are processed uniformly, one member at a time, whatever
/// mix of kinds they contain; duplicate detection is `declare`'s.
fn analyze_decl(
    decl: &mut Decl,
    scopes: &mut ScopeStack,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), EmptyStackError> {
    match decl {
        Decl::Var(var) => {
            analyze_var_decl(var, scopes, sink);
            Ok(())
        }
        Decl::Fn(func) => analyze_fn_decl(func, scopes, sink),
        Decl::Tuple(tuple) => {
            analyze_tuple_decl(tuple, scopes, sink);
            Ok(())
        }
    }
}

fn analyze_var_decl(decl: &mut VarDecl, scopes: &mut ScopeStack, sink: &mut dyn DiagnosticSink) {
    if let Some(symbol) = symbol_for_typed_decl(&mut decl.ty, &decl.name, scopes, sink) {
        declare_in_current(scopes, &mut decl.name, symbol, sink);
    }
}

fn analyze_fn_decl(
    decl: &mut FnDecl,
    scopes: &mut ScopeStack,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), EmptyStackError> {
    let params: Vec<TypeDesc> = decl.formals.iter().map(|f| TypeDesc::from(&f.ty)).collect();
    let symbol = Rc::new(Symbol::Function {
        params,
        ret: TypeDesc::from(&decl.ret),
    });

    // The function's name goes into the enclosing scope, before its own
    // scope opens: visible to siblings and to itself, but shadowable by a
    // same-named formal.
    declare_in_current(scopes, &mut decl.name, symbol, sink);

    // Formals and body share one scope.
    scopes.push_scope();
    for formal in &mut decl.formals {
        if let Some(symbol) = symbol_for_typed_decl(&mut formal.ty, &formal.name, scopes, sink) {
            declare_in_current(scopes, &mut formal.name, symbol, sink);
        }
    }
    analyze_block(&mut decl.body, scopes, sink)?;
    scopes.pop_scope()
}

fn analyze_tuple_decl(
    decl: &mut TupleDecl,
    scopes: &mut ScopeStack,
    sink: &mut dyn DiagnosticSink,
) {
    let def = Rc::new(Symbol::TupleDef {
        name: decl.name.name.clone(),
        fields: RefCell::new(Scope::new()),
    });

    // Declared before the fields are analyzed, so a field of type
    // `tuple T` inside `tuple T { ... }` resolves.
    declare_in_current(scopes, &mut decl.name, Rc::clone(&def), sink);

    let fields = def
        .tuple_fields()
        .expect("definition symbol owns a field scope");

    // Field types are resolved against the lexical scope chain; the names
    // go into the definition's own detached scope, which is never part of
    // that chain.
    for field in &mut decl.fields {
        if let Some(symbol) = symbol_for_typed_decl(&mut field.ty, &field.name, scopes, sink) {
            declare_in_scope(&mut fields.borrow_mut(), &mut field.name, symbol, sink);
        }
    }
}

/// Build the symbol for a variable-like declaration (variable, formal, or
/// tuple field), or report why there is none.
///
/// A dropped declaration is not suppressed downstream: every later use of
/// the name is independently reported as undeclared.
fn symbol_for_typed_decl(
    ty: &mut TypeSpec,
    name: &Ident,
    scopes: &ScopeStack,
    sink: &mut dyn DiagnosticSink,
) -> Option<Rc<Symbol>> {
    match ty {
        TypeSpec::Void => {
            sink.report(Diagnostic::error(ErrorKind::VoidVariable, name.pos));
            None
        }
        TypeSpec::Integer => Some(Rc::new(Symbol::Variable {
            ty: Primitive::Integer,
        })),
        TypeSpec::Logical => Some(Rc::new(Symbol::Variable {
            ty: Primitive::Logical,
        })),
        TypeSpec::Tuple(type_ref) => match scopes.lookup_chain(&type_ref.name) {
            None => {
                sink.report(Diagnostic::error(
                    ErrorKind::UndeclaredIdentifier,
                    type_ref.pos,
                ));
                None
            }
            Some(found) if found.tuple_fields().is_none() => {
                sink.report(Diagnostic::error(
                    ErrorKind::InvalidTupleTypeName,
                    type_ref.pos,
                ));
                None
            }
            Some(found) => {
                let def = Rc::clone(found);
                type_ref.sym = Some(Rc::clone(&def));
                Some(Rc::new(Symbol::TupleInstance {
                    tuple_name: type_ref.name.clone(),
                    def,
                }))
            }
        },
    }
}

fn declare_in_current(
    scopes: &mut ScopeStack,
    name: &mut Ident,
    symbol: Rc<Symbol>,
    sink: &mut dyn DiagnosticSink,
) {
    match scopes.declare(&name.name, Rc::clone(&symbol)) {
        Ok(()) => name.sym = Some(symbol),
        Err(_) => sink.report(Diagnostic::error(
            ErrorKind::MultiplyDeclaredIdentifier,
            name.pos,
        )),
    }
}

fn declare_in_scope(
    scope: &mut Scope,
    name: &mut Ident,
    symbol: Rc<Symbol>,
    sink: &mut dyn DiagnosticSink,
) {
    match scope.declare(&name.name, Rc::clone(&symbol)) {
        Ok(()) => name.sym = Some(symbol),
        Err(_) => sink.report(Diagnostic::error(
            ErrorKind::MultiplyDeclaredIdentifier,
            name.pos,
        )),
    }
}

/// Analyze a body in the current scope: local declarations first, then
/// statements. Callers push/pop the scope the body lives in.
fn analyze_block(
    block: &mut Block,
    scopes: &mut ScopeStack,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), EmptyStackError> {
    analyze_decls(&mut block.decls, scopes, sink)?;
    for stmt in &mut block.stmts {
        analyze_stmt(stmt, scopes, sink)?;
    }
    Ok(())
}

/// Analyze a body in its own scope (if-branch, else-branch, while-body).
fn analyze_scoped_block(
    block: &mut Block,
    scopes: &mut ScopeStack,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), EmptyStackError> {
    scopes.push_scope();
    analyze_block(block, scopes, sink)?;
    scopes.pop_scope()
}

fn analyze_stmt(
    stmt: &mut Stmt,
    scopes: &mut ScopeStack,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), EmptyStackError> {
    match stmt {
        Stmt::Assign(assign) => {
            analyze_assign(assign, scopes, sink);
            Ok(())
        }
        Stmt::PostInc(exp) | Stmt::PostDec(exp) | Stmt::Read(exp) | Stmt::Write(exp) => {
            analyze_expr(exp, scopes, sink);
            Ok(())
        }
        Stmt::Call(call) => {
            analyze_call(call, scopes, sink);
            Ok(())
        }
        Stmt::Return(value) => {
            if let Some(exp) = value {
                analyze_expr(exp, scopes, sink);
            }
            Ok(())
        }
        Stmt::If(stmt) => {
            // The condition sees the current scope, not the branch scope.
            analyze_expr(&mut stmt.cond, scopes, sink);
            analyze_scoped_block(&mut stmt.body, scopes, sink)
        }
        Stmt::IfElse(stmt) => {
            analyze_expr(&mut stmt.cond, scopes, sink);
            // Independent scopes: the branches never see each other.
            analyze_scoped_block(&mut stmt.then_body, scopes, sink)?;
            analyze_scoped_block(&mut stmt.else_body, scopes, sink)
        }
        Stmt::While(stmt) => {
            analyze_expr(&mut stmt.cond, scopes, sink);
            analyze_scoped_block(&mut stmt.body, scopes, sink)
        }
    }
}

pub(super) fn analyze_expr(expr: &mut Expr, scopes: &ScopeStack, sink: &mut dyn DiagnosticSink) {
    match expr {
        Expr::BoolLit(_) | Expr::IntLit(_) | Expr::StrLit(_) => {}
        Expr::Id(id) => resolve_ident(id, scopes, sink),
        Expr::TupleAccess(access) => tuple_access::resolve_access(access, scopes, sink),
        Expr::Assign(assign) => analyze_assign(assign, scopes, sink),
        Expr::Call(call) => analyze_call(call, scopes, sink),
        Expr::Unary(unary) => analyze_expr(&mut unary.operand, scopes, sink),
        Expr::Binary(binary) => {
            analyze_expr(&mut binary.lhs, scopes, sink);
            analyze_expr(&mut binary.rhs, scopes, sink);
        }
    }
}

fn analyze_assign(assign: &mut AssignExpr, scopes: &ScopeStack, sink: &mut dyn DiagnosticSink) {
    analyze_expr(&mut assign.lhs, scopes, sink);
    analyze_expr(&mut assign.rhs, scopes, sink);
}

fn analyze_call(call: &mut CallExpr, scopes: &ScopeStack, sink: &mut dyn DiagnosticSink) {
    // Any declared name is accepted as a callee at this phase; whether it is
    // callable is a type-checking question.
    resolve_ident(&mut call.callee, scopes, sink);
    for arg in &mut call.args {
        analyze_expr(arg, scopes, sink);
    }
}

fn resolve_ident(id: &mut Ident, scopes: &ScopeStack, sink: &mut dyn DiagnosticSink) {
    match scopes.lookup_chain(&id.name) {
        Some(symbol) => id.sym = Some(Rc::clone(symbol)),
        None => sink.report(Diagnostic::error(ErrorKind::UndeclaredIdentifier, id.pos)),
    }
}
