//! Syntax tree produced by the parser. Every node owns its children.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    Div,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mult => "*",
            BinaryOp::Div => "/",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    /// A variable or function name (e.g. `foo`).
    Name(String),
    /// A prefix expression (e.g. `-1`).
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// A binary expression (e.g. `1+1`).
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// A call expression (e.g. `foo(1, bar)`).
    FuncCall { callee: Box<Expr>, args: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    ConstDecl { ident: String, initializer: Expr },
    /// `var x;` is parsed with an [`Expr::Null`] initializer.
    VarDecl { ident: String, initializer: Expr },
    VarSet { ident: String, value: Expr },
    Return(Expr),
    /// An expression evaluated for its side effects only.
    ExprStmt(Expr),
}

/// A parameter with a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalParam {
    pub ident: String,
    pub default: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    GlobalConst {
        ident: String,
        initializer: Expr,
    },
    GlobalVar {
        ident: String,
        initializer: Option<Expr>,
    },
    FuncDecl(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub ident: String,
    /// Always precede `optional_params` in the parameter list.
    pub required_params: Vec<String>,
    pub optional_params: Vec<OptionalParam>,
    pub body: Vec<Stmt>,
}

impl FuncDecl {
    /// Number of arguments the function accepts, as `(min, max)`.
    pub fn arity(&self) -> (usize, usize) {
        let min = self.required_params.len();
        (min, min + self.optional_params.len())
    }
}

/// The root of the tree: top level declarations in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub decls: Vec<Decl>,
}
