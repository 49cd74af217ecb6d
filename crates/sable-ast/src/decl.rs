//! Declaration definitions for the AST

use super::*;

/// Member/class visibility. Omitted modifiers parse as `Private`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessModifier {
    Public,
    Private,
}

/// Field declaration inside a class.
///
/// Only `const` fields may carry an initializer; the parser enforces
/// this with an error diagnostic so lowering never sees one elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub access: AccessModifier,
    pub is_const: bool,
    pub ty: Node<TypeRef>,
    pub name: Node<Ident>,
    pub init: Option<Node<Expr>>,
}

/// Method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Node<TypeRef>,
    pub name: Node<Ident>,
}

/// Method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub access: AccessModifier,
    pub is_static: bool,
    pub return_type: Node<TypeRef>,
    pub name: Node<Ident>,
    pub params: Vec<Param>,
    pub body: Node<BlockStmt>,
}

/// Class member
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
}

/// Class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub access: AccessModifier,
    pub name: Node<Ident>,
    pub members: Vec<ClassMember>,
}

impl ClassDecl {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            ClassMember::Method(m) => Some(m),
            _ => None,
        })
    }
}
