//! Symbol model for name analysis.
//!
//! One symbol is created at each successful declaration, owned by the scope
//! that declares it, and shared (`Rc`) with every identifier node that
//! resolves to it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::TypeSpec;
use crate::scope::Scope;

/// Primitive type of a plain variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Integer,
    Logical,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Integer => f.write_str("integer"),
            Primitive::Logical => f.write_str("logical"),
        }
    }
}

/// Positionless type descriptor, as recorded in function signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Integer,
    Logical,
    Void,
    Tuple(String),
}

impl From<&TypeSpec> for TypeDesc {
    fn from(spec: &TypeSpec) -> Self {
        match spec {
            TypeSpec::Integer => TypeDesc::Integer,
            TypeSpec::Logical => TypeDesc::Logical,
            TypeSpec::Void => TypeDesc::Void,
            TypeSpec::Tuple(id) => TypeDesc::Tuple(id.name.clone()),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Integer => f.write_str("integer"),
            TypeDesc::Logical => f.write_str("logical"),
            TypeDesc::Void => f.write_str("void"),
            TypeDesc::Tuple(name) => write!(f, "tuple {name}"),
        }
    }
}

/// The kind of symbol a name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    TupleDef,
    TupleInstance,
}

/// A declared entity.
#[derive(Debug)]
pub enum Symbol {
    /// Plain integer/logical variable (or formal, or tuple field).
    Variable { ty: Primitive },

    /// Function signature. Uniqueness is by name only; the signature exists
    /// for display and for later phases, never for duplicate checking.
    Function { params: Vec<TypeDesc>, ret: TypeDesc },

    /// Tuple type definition. Owns the type's private field scope, which is
    /// never linked into the lexical scope chain: fields are reachable only
    /// through a colon-access chain rooted at an instance.
    ///
    /// The field scope is filled *after* the definition symbol is declared
    /// (and therefore already shared), so a field of type `tuple T` inside
    /// `tuple T { ... }` can resolve its own definition.
    TupleDef {
        name: String,
        fields: RefCell<Scope>,
    },

    /// Variable/formal/field whose declared type is a tuple type. Links the
    /// definition symbol directly, so mid-chain field resolution is immune
    /// to later shadowing of the type name.
    TupleInstance {
        tuple_name: String,
        def: Rc<Symbol>,
    },
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Variable { .. } => SymbolKind::Variable,
            Symbol::Function { .. } => SymbolKind::Function,
            Symbol::TupleDef { .. } => SymbolKind::TupleDef,
            Symbol::TupleInstance { .. } => SymbolKind::TupleInstance,
        }
    }

    /// Narrow to a tuple type definition's field scope.
    pub fn tuple_fields(&self) -> Option<&RefCell<Scope>> {
        match self {
            Symbol::TupleDef { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    /// Diagnostic/debug form: a variable shows its primitive type, a
    /// function its signature, tuple definitions and instances the tuple
    /// type's name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Variable { ty } => write!(f, "{ty}"),
            Symbol::Function { params, ret } => {
                if params.is_empty() {
                    write!(f, "void -> {ret}")
                } else {
                    let params: Vec<String> = params.iter().map(TypeDesc::to_string).collect();
                    write!(f, "{} -> {ret}", params.join(", "))
                }
            }
            Symbol::TupleDef { name, .. } => f.write_str(name),
            Symbol::TupleInstance { tuple_name, .. } => f.write_str(tuple_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_display() {
        let sym = Symbol::Variable {
            ty: Primitive::Logical,
        };
        assert_eq!(sym.to_string(), "logical");
        assert_eq!(sym.kind(), SymbolKind::Variable);
    }

    #[test]
    fn test_function_display() {
        let sym = Symbol::Function {
            params: vec![TypeDesc::Integer, TypeDesc::Logical],
            ret: TypeDesc::Void,
        };
        assert_eq!(sym.to_string(), "integer, logical -> void");
    }

    #[test]
    fn test_nullary_function_displays_void_params() {
        let sym = Symbol::Function {
            params: vec![],
            ret: TypeDesc::Integer,
        };
        assert_eq!(sym.to_string(), "void -> integer");
    }

    #[test]
    fn test_tuple_param_display() {
        let sym = Symbol::Function {
            params: vec![TypeDesc::Tuple("Point".to_string())],
            ret: TypeDesc::Void,
        };
        assert_eq!(sym.to_string(), "tuple Point -> void");
    }

    #[test]
    fn test_tuple_symbols_display_type_name() {
        let def = Rc::new(Symbol::TupleDef {
            name: "Point".to_string(),
            fields: RefCell::new(Scope::new()),
        });
        assert_eq!(def.to_string(), "Point");
        assert_eq!(def.kind(), SymbolKind::TupleDef);
        assert!(def.tuple_fields().is_some());

        let inst = Symbol::TupleInstance {
            tuple_name: "Point".to_string(),
            def,
        };
        assert_eq!(inst.to_string(), "Point");
        assert_eq!(inst.kind(), SymbolKind::TupleInstance);
        assert!(inst.tuple_fields().is_none());
    }
}
