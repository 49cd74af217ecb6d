//! Statement definitions for the AST

use super::*;

/// A braced statement list
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub stmts: Vec<Node<Stmt>>,
}

/// Local variable declaration: `int x = expr;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: Node<TypeRef>,
    pub name: Node<Ident>,
    pub init: Option<Node<Expr>>,
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Local variable declaration
    VarDecl(VarDecl),

    /// Expression statement
    Expr(Node<Expr>),

    /// If statement; the else branch is either a block or another if
    If {
        cond: Node<Expr>,
        then_block: Node<BlockStmt>,
        else_branch: Option<Box<Node<Stmt>>>,
    },

    /// While loop
    While {
        cond: Node<Expr>,
        body: Node<BlockStmt>,
    },

    /// For loop; all three header slots are optional
    For {
        init: Option<Box<Node<Stmt>>>,
        cond: Option<Node<Expr>>,
        update: Option<Node<Expr>>,
        body: Node<BlockStmt>,
    },

    /// Return, with optional value
    Return(Option<Node<Expr>>),

    /// Break out of the innermost loop
    Break,

    /// Continue the innermost loop
    Continue,

    /// Nested block
    Block(BlockStmt),
}
