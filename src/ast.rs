//! Syntax tree for base programs.
//!
//! The tree is produced by the (external) parser and consumed read-only by
//! the analyzer, except for the resolved-symbol annotation on identifier
//! nodes, which name analysis fills in.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Source position of a token, 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Root of the tree - a complete base program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub decls: Vec<Decl>,
}

/// Declaration kinds.
///
/// One sum type for every list of declarations (top level, function bodies,
/// branch bodies), so mixed lists are processed uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Tuple(TupleDecl),
}

impl Decl {
    pub fn name(&self) -> &Ident {
        match self {
            Decl::Var(d) => &d.name,
            Decl::Fn(d) => &d.name,
            Decl::Tuple(d) => &d.name,
        }
    }
}

/// Variable declaration: `integer x.`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub ty: TypeSpec,
    pub name: Ident,
}

/// Function declaration: `integer f{integer a, logical b} [ ... ]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FnDecl {
    pub ret: TypeSpec,
    pub name: Ident,
    pub formals: Vec<FormalDecl>,
    pub body: Block,
}

/// Formal parameter declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormalDecl {
    pub ty: TypeSpec,
    pub name: Ident,
}

/// Tuple type declaration: `tuple Point { integer x. integer y. }.`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TupleDecl {
    pub name: Ident,
    pub fields: Vec<VarDecl>,
}

/// Type written in a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeSpec {
    Integer,
    Logical,
    Void,
    /// `tuple X` - a reference to a previously declared tuple type.
    Tuple(Ident),
}

/// Function or branch body: local declarations, then statements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
}

/// Statement kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    Assign(AssignExpr),
    PostInc(Expr),
    PostDec(Expr),
    If(IfStmt),
    IfElse(IfElseStmt),
    While(WhileStmt),
    Read(Expr),
    Write(Expr),
    Call(CallExpr),
    Return(Option<Expr>),
}

/// `if cond [ ... ]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub body: Block,
}

/// `if cond [ ... ] else [ ... ]` - the two bodies get independent scopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfElseStmt {
    pub cond: Expr,
    pub then_body: Block,
    pub else_body: Block,
}

/// `while cond [ ... ]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

/// Expression kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    BoolLit(BoolLit),
    IntLit(IntLit),
    StrLit(StrLit),
    Id(Ident),
    TupleAccess(Box<TupleAccessExpr>),
    Assign(Box<AssignExpr>),
    Call(CallExpr),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::BoolLit(l) => l.pos,
            Expr::IntLit(l) => l.pos,
            Expr::StrLit(l) => l.pos,
            Expr::Id(id) => id.pos,
            Expr::TupleAccess(a) => a.base.pos(),
            Expr::Assign(a) => a.lhs.pos(),
            Expr::Call(c) => c.callee.pos,
            Expr::Unary(u) => u.operand.pos(),
            Expr::Binary(b) => b.lhs.pos(),
        }
    }

    /// The symbol this expression resolved to, for the expression kinds that
    /// can head a colon-access chain. `None` if resolution failed or the
    /// expression kind never names a declaration.
    pub fn resolved_symbol(&self) -> Option<&Rc<Symbol>> {
        match self {
            Expr::Id(id) => id.sym.as_ref(),
            Expr::TupleAccess(a) => a.field.sym.as_ref(),
            _ => None,
        }
    }
}

/// `True` / `False`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolLit {
    pub value: bool,
    pub pos: Pos,
}

/// Integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntLit {
    pub value: i64,
    pub pos: Pos,
}

/// String literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrLit {
    pub value: String,
    pub pos: Pos,
}

/// Identifier occurrence.
///
/// `sym` is unset until name analysis binds the occurrence to the symbol of
/// the declaration it refers to; it stays `None` when resolution fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
    #[serde(skip)]
    pub sym: Option<Rc<Symbol>>,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Self {
            name: name.into(),
            pos,
            sym: None,
        }
    }
}

/// Colon-qualified field access: `base:field`.
///
/// Chains are left-nested: `a:b:c` is `TupleAccess(TupleAccess(a, b), c)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TupleAccessExpr {
    pub base: Expr,
    pub field: Ident,
}

/// Assignment, usable as statement or expression: `lhs = rhs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignExpr {
    pub lhs: Expr,
    pub rhs: Expr,
}

/// Call: `f(args)`. The callee is always a plain identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: Ident,
    pub args: Vec<Expr>,
}

/// Unary expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "~",
        }
    }
}

/// Binary expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expr,
    pub rhs: Expr,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Equality
    Eq,
    NotEq,
    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "~=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        assert_eq!(Pos::new(3, 14).to_string(), "3:14");
    }

    #[test]
    fn test_expr_pos_of_nested_access() {
        let access = Expr::TupleAccess(Box::new(TupleAccessExpr {
            base: Expr::Id(Ident::new("p", Pos::new(2, 5))),
            field: Ident::new("x", Pos::new(2, 7)),
        }));
        assert_eq!(access.pos(), Pos::new(2, 5));
    }

    #[test]
    fn test_resolved_symbol_unset_by_default() {
        let id = Expr::Id(Ident::new("x", Pos::new(1, 1)));
        assert!(id.resolved_symbol().is_none());

        let lit = Expr::IntLit(IntLit {
            value: 7,
            pos: Pos::new(1, 1),
        });
        assert!(lit.resolved_symbol().is_none());
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(BinaryOp::NotEq.as_str(), "~=");
        assert_eq!(BinaryOp::And.as_str(), "&");
        assert_eq!(UnaryOp::Not.as_str(), "~");
    }
}
