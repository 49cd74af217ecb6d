//! AST → instruction lowering (Pass 3).
//!
//! Translates every class member, statement, and expression into
//! instruction text, allocating symbols for fields, parameters, locals,
//! and temporaries, and label entries for control flow. Every operand
//! occurrence and label reference is recorded so integrity verification
//! can check the result without re-walking the tree.

use std::collections::{HashMap, HashSet};

use sable_ast::*;
use sable_emit::AssemblyBuilder;
use sable_sema::{
    DeclFlags, MethodRegistry, MethodSignature, ResolvedType, ResolverContext, SymbolDirectory,
    SymbolId,
};

use crate::error::{FailureKind, LowerFailure};
use crate::labels::{LabelId, LabelTable};

/// One operand occurrence in the instruction stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRef {
    pub unique_name: String,
    pub span: Span,
}

/// The lowering pass's output: the code block text, verbatim, plus the
/// reference records integrity verification runs against.
#[derive(Debug, Clone)]
pub struct LoweredUnit {
    pub code: String,
    pub symbol_refs: Vec<SymbolRef>,
    pub labels: LabelTable,
}

/// Lowers a unit to instruction text.
///
/// On an internal failure the traversal stops, but whatever was
/// accumulated so far is still returned so the orchestrator can emit a
/// best-effort module.
pub fn lower_unit(
    unit: &Unit,
    resolver: &ResolverContext,
    methods: &MethodRegistry,
    directory: &mut SymbolDirectory,
) -> (LoweredUnit, Option<LowerFailure>) {
    let mut lowerer = Lowerer::new(resolver, methods, directory);

    lowerer.code.line(".code_start");
    lowerer.code.blank();
    lowerer.code.push_indent();

    let failure = lowerer.lower_classes(unit).err();

    lowerer.code.pop_indent();
    lowerer.code.line(".code_end");

    (
        LoweredUnit {
            code: lowerer.code.build(),
            symbol_refs: lowerer.symbol_refs,
            labels: lowerer.labels,
        },
        failure,
    )
}

/// Main lowering context.
struct Lowerer<'a> {
    resolver: &'a ResolverContext,
    methods: &'a MethodRegistry,
    directory: &'a mut SymbolDirectory,
    labels: LabelTable,
    code: AssemblyBuilder,
    symbol_refs: Vec<SymbolRef>,
    /// Loop context stack: (continue target, break target)
    loop_stack: Vec<(LabelId, LabelId)>,
    /// Span of the node currently being lowered; attached to failures.
    current_span: Span,
    /// Current class context (set while lowering class members)
    class_name: String,
    class_storage: String,
    fields: HashMap<String, SymbolId>,
    const_inits: HashMap<SymbolId, Literal>,
    /// Lazily created `this` symbol for the current class
    this_symbol: Option<SymbolId>,
    /// Set while lowering a static method body
    in_static_method: bool,
    /// Return storage type of the current method; None for void
    current_return: Option<String>,
    /// Constants already materialized in the current method body
    materialized_consts: HashSet<SymbolId>,
    /// Whether the last lowered statement was a return
    body_returned: bool,
}

impl<'a> Lowerer<'a> {
    fn new(
        resolver: &'a ResolverContext,
        methods: &'a MethodRegistry,
        directory: &'a mut SymbolDirectory,
    ) -> Self {
        Self {
            resolver,
            methods,
            directory,
            labels: LabelTable::new(),
            code: AssemblyBuilder::new(),
            symbol_refs: Vec::new(),
            loop_stack: Vec::new(),
            current_span: Span::new(0, 0),
            class_name: String::new(),
            class_storage: String::new(),
            fields: HashMap::new(),
            const_inits: HashMap::new(),
            this_symbol: None,
            in_static_method: false,
            current_return: None,
            materialized_consts: HashSet::new(),
            body_returned: false,
        }
    }

    // =========================================================================
    // Classes and members
    // =========================================================================

    fn lower_classes(&mut self, unit: &Unit) -> Result<(), LowerFailure> {
        for (_, class) in unit.classes() {
            self.lower_class(class)?;
        }
        Ok(())
    }

    fn lower_class(&mut self, class: &ClassDecl) -> Result<(), LowerFailure> {
        self.current_span = class.name.span;

        let storage = self
            .resolver
            .class_storage(&class.name.value.name)
            .ok_or_else(|| {
                LowerFailure::new(
                    FailureKind::TypeResolution,
                    format!("class `{}` was not registered", class.name.value.name),
                    class.name.span,
                )
            })?;

        self.class_name = class.name.value.name.clone();
        self.class_storage = storage;
        self.fields.clear();
        self.const_inits.clear();
        self.this_symbol = None;

        self.directory.push_scope();

        for field in class.fields() {
            self.lower_field(field)?;
        }
        for method in class.methods() {
            self.lower_method(method)?;
        }

        self.directory.pop_scope();
        Ok(())
    }

    fn lower_field(&mut self, field: &FieldDecl) -> Result<(), LowerFailure> {
        self.current_span = field.name.span;

        let type_name = self.resolve_storage(&field.ty)?;
        let mut flags = match field.access {
            AccessModifier::Public => DeclFlags::PUBLIC,
            AccessModifier::Private => DeclFlags::PRIVATE,
        };
        if field.is_const {
            flags |= DeclFlags::CONSTANT;
        }

        let id = self
            .directory
            .define(&field.name.value.name, type_name, flags);
        self.fields.insert(field.name.value.name.clone(), id);

        // The parser guarantees any surviving initializer is a literal
        // on a const field.
        if let Some(init) = &field.init {
            if let Expr::Literal(lit) = &init.value {
                self.const_inits.insert(id, lit.clone());
            }
        }
        Ok(())
    }

    fn lower_method(&mut self, method: &MethodDecl) -> Result<(), LowerFailure> {
        self.current_span = method.name.span;

        let sig: MethodSignature = self
            .methods
            .lookup(&self.class_name, &method.name.value.name)
            .cloned()
            .ok_or_else(|| {
                LowerFailure::new(
                    FailureKind::UnknownMethod,
                    format!(
                        "`{}.{}` has no harvested signature",
                        self.class_name, method.name.value.name
                    ),
                    method.name.span,
                )
            })?;

        self.in_static_method = method.is_static;
        self.current_return = sig.return_type.clone();
        self.materialized_consts.clear();

        if sig.is_public {
            self.code.line(format!(".export {}", sig.label));
        }
        let label = self.labels.named(&sig.label);
        self.labels.mark_defined(label);
        self.code.line(format!("{}:", sig.label));
        self.code.push_indent();

        self.directory.push_scope();

        // Arguments are pushed left to right, so parameters pop in
        // reverse order.
        let mut param_ids = Vec::new();
        for (param, type_name) in method.params.iter().zip(&sig.param_types) {
            self.current_span = param.name.span;
            let id = self
                .directory
                .define(&param.name.value.name, type_name.clone(), DeclFlags::INTERNAL);
            param_ids.push(id);
        }
        for id in param_ids.into_iter().rev() {
            let name = self.use_symbol(id);
            self.emit(format!("pop {}", name));
        }

        self.body_returned = false;
        self.lower_block(&method.body.value)?;
        if !self.body_returned {
            if self.current_return.is_some() {
                return Err(LowerFailure::new(
                    FailureKind::InvalidReturn,
                    format!("`{}` must end with a return", sig.label),
                    method.name.span,
                ));
            }
            self.emit("ret".to_string());
        }

        self.directory.pop_scope();
        self.code.pop_indent();
        self.code.blank();
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn lower_block(&mut self, block: &BlockStmt) -> Result<(), LowerFailure> {
        for stmt in &block.stmts {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn scoped_block(&mut self, block: &BlockStmt) -> Result<(), LowerFailure> {
        self.directory.push_scope();
        let result = self.lower_block(block);
        self.directory.pop_scope();
        result
    }

    fn lower_stmt(&mut self, stmt: &Node<Stmt>) -> Result<(), LowerFailure> {
        self.current_span = stmt.span;
        self.body_returned = false;

        match &stmt.value {
            Stmt::VarDecl(decl) => {
                let type_name = self.resolve_storage(&decl.ty)?;
                let init = match &decl.init {
                    Some(expr) => Some(self.lower_expr(expr)?),
                    None => None,
                };
                let id = self
                    .directory
                    .define(&decl.name.value.name, type_name, DeclFlags::INTERNAL);
                if let Some(src) = init {
                    self.current_span = stmt.span;
                    let dst = self.use_symbol(id);
                    self.emit(format!("copy {}, {}", dst, src));
                }
            }

            Stmt::Expr(expr) => {
                self.lower_expr_discard(expr)?;
            }

            Stmt::If {
                cond,
                then_block,
                else_branch,
            } => {
                let cond_sym = self.lower_expr(cond)?;
                match else_branch {
                    None => {
                        let end = self.labels.fresh("if_end");
                        self.emit_branch_false(&cond_sym, end);
                        self.scoped_block(&then_block.value)?;
                        self.define_label(end);
                    }
                    Some(else_stmt) => {
                        let else_label = self.labels.fresh("if_else");
                        let end = self.labels.fresh("if_end");
                        self.emit_branch_false(&cond_sym, else_label);
                        self.scoped_block(&then_block.value)?;
                        self.emit_jump(end);
                        self.define_label(else_label);
                        self.lower_stmt(else_stmt)?;
                        self.define_label(end);
                    }
                }
            }

            Stmt::While { cond, body } => {
                let head = self.labels.fresh("while_head");
                let exit = self.labels.fresh("while_exit");
                self.define_label(head);
                let cond_sym = self.lower_expr(cond)?;
                self.emit_branch_false(&cond_sym, exit);
                self.loop_stack.push((head, exit));
                let result = self.scoped_block(&body.value);
                self.loop_stack.pop();
                result?;
                self.emit_jump(head);
                self.define_label(exit);
            }

            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                self.directory.push_scope();
                if let Some(init) = init {
                    self.lower_stmt(init)?;
                }
                let head = self.labels.fresh("for_head");
                let step = self.labels.fresh("for_step");
                let exit = self.labels.fresh("for_exit");
                self.define_label(head);
                if let Some(cond) = cond {
                    let cond_sym = self.lower_expr(cond)?;
                    self.emit_branch_false(&cond_sym, exit);
                }
                self.loop_stack.push((step, exit));
                let result = self.scoped_block(&body.value);
                self.loop_stack.pop();
                result?;
                self.define_label(step);
                if let Some(update) = update {
                    self.lower_expr_discard(update)?;
                }
                self.emit_jump(head);
                self.define_label(exit);
                self.directory.pop_scope();
            }

            Stmt::Return(value) => {
                match (value, self.current_return.clone()) {
                    (Some(expr), Some(_)) => {
                        let operand = self.lower_expr(expr)?;
                        self.emit(format!("push {}", operand));
                    }
                    (None, None) => {}
                    (Some(expr), None) => {
                        return Err(LowerFailure::new(
                            FailureKind::InvalidReturn,
                            "cannot return a value from a void method",
                            expr.span,
                        ));
                    }
                    (None, Some(_)) => {
                        return Err(LowerFailure::new(
                            FailureKind::InvalidReturn,
                            "return without a value in a non-void method",
                            stmt.span,
                        ));
                    }
                }
                self.emit("ret".to_string());
                self.body_returned = true;
            }

            Stmt::Break => {
                let (_, exit) = *self.loop_stack.last().ok_or_else(|| {
                    LowerFailure::new(
                        FailureKind::StrayControlFlow,
                        "`break` outside of a loop",
                        stmt.span,
                    )
                })?;
                self.emit_jump(exit);
            }

            Stmt::Continue => {
                let (target, _) = *self.loop_stack.last().ok_or_else(|| {
                    LowerFailure::new(
                        FailureKind::StrayControlFlow,
                        "`continue` outside of a loop",
                        stmt.span,
                    )
                })?;
                self.emit_jump(target);
            }

            Stmt::Block(block) => {
                self.scoped_block(block)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Lowers an expression and returns the unique name of the symbol
    /// holding its value.
    fn lower_expr(&mut self, expr: &Node<Expr>) -> Result<String, LowerFailure> {
        self.current_span = expr.span;

        match &expr.value {
            Expr::Literal(lit) => {
                let type_name = literal_type(lit);
                let id = self.temp(type_name);
                let dst = self.use_symbol(id);
                self.emit(format!("const {}, {}", dst, render_literal(lit)));
                Ok(dst)
            }

            Expr::Ident(ident) => {
                let id = self.directory.lookup(&ident.name).ok_or_else(|| {
                    LowerFailure::new(
                        FailureKind::UnknownSymbol,
                        format!("`{}` is not defined", ident.name),
                        expr.span,
                    )
                })?;
                self.materialize_const(id);
                Ok(self.use_symbol(id))
            }

            Expr::This => {
                let id = self.this_symbol()?;
                Ok(self.use_symbol(id))
            }

            Expr::Member { object, property } => {
                let id = self.field_symbol(object, property)?;
                self.materialize_const(id);
                Ok(self.use_symbol(id))
            }

            Expr::Call { callee, args } => {
                match self.lower_call(callee, args, expr.span)? {
                    Some(result) => Ok(result),
                    None => Err(LowerFailure::new(
                        FailureKind::BadCall,
                        "a void method call cannot be used as a value",
                        expr.span,
                    )),
                }
            }

            Expr::Unary { op, operand } => {
                let operand_sym = self.lower_expr(operand)?;
                let type_name = match op {
                    UnaryOp::Neg => self.symbol_type(&operand_sym),
                    UnaryOp::Not => "SystemBoolean".to_string(),
                };
                let id = self.temp(&type_name);
                self.current_span = expr.span;
                let dst = self.use_symbol(id);
                let mnemonic = match op {
                    UnaryOp::Neg => "neg",
                    UnaryOp::Not => "not",
                };
                self.emit(format!("{} {}, {}", mnemonic, dst, operand_sym));
                Ok(dst)
            }

            Expr::Binary { left, op, right } => {
                let left_sym = self.lower_expr(left)?;
                let right_sym = self.lower_expr(right)?;
                let type_name = if op.is_comparison() {
                    "SystemBoolean".to_string()
                } else {
                    self.symbol_type(&left_sym)
                };
                let id = self.temp(&type_name);
                self.current_span = expr.span;
                let dst = self.use_symbol(id);
                self.emit(format!(
                    "{} {}, {}, {}",
                    binary_mnemonic(*op),
                    dst,
                    left_sym,
                    right_sym
                ));
                Ok(dst)
            }

            Expr::Assign { target, value } => {
                let src = self.lower_expr(value)?;
                let dst_id = match &target.value {
                    Expr::Ident(ident) => {
                        self.directory.lookup(&ident.name).ok_or_else(|| {
                            LowerFailure::new(
                                FailureKind::UnknownSymbol,
                                format!("`{}` is not defined", ident.name),
                                target.span,
                            )
                        })?
                    }
                    Expr::Member { object, property } => self.field_symbol(object, property)?,
                    _ => {
                        return Err(LowerFailure::new(
                            FailureKind::BadAssignment,
                            "expression is not assignable",
                            target.span,
                        ));
                    }
                };
                if self
                    .directory
                    .symbol(dst_id)
                    .flags
                    .contains(DeclFlags::CONSTANT)
                {
                    return Err(LowerFailure::new(
                        FailureKind::BadAssignment,
                        "cannot assign to a constant",
                        target.span,
                    ));
                }
                self.current_span = target.span;
                let dst = self.use_symbol(dst_id);
                self.emit(format!("copy {}, {}", dst, src));
                Ok(dst)
            }
        }
    }

    /// Lowers an expression in statement position, discarding any value.
    fn lower_expr_discard(&mut self, expr: &Node<Expr>) -> Result<(), LowerFailure> {
        self.current_span = expr.span;
        match &expr.value {
            // Void calls are legal here, and non-void results are simply
            // left in their temporaries.
            Expr::Call { callee, args } => {
                self.lower_call(callee, args, expr.span)?;
                Ok(())
            }
            _ => {
                self.lower_expr(expr)?;
                Ok(())
            }
        }
    }

    /// Lowers a call and returns the symbol holding the result, or
    /// `None` for a void method.
    fn lower_call(
        &mut self,
        callee: &Node<Expr>,
        args: &[Node<Expr>],
        span: Span,
    ) -> Result<Option<String>, LowerFailure> {
        let method_name = match &callee.value {
            Expr::Ident(ident) => ident.name.clone(),
            Expr::Member { object, property } => {
                if !matches!(object.value, Expr::This) {
                    return Err(LowerFailure::new(
                        FailureKind::Unsupported,
                        "calls through object references are not supported",
                        object.span,
                    ));
                }
                if self.in_static_method {
                    return Err(LowerFailure::new(
                        FailureKind::Unsupported,
                        "`this` is not available in a static method",
                        object.span,
                    ));
                }
                property.value.name.clone()
            }
            _ => {
                return Err(LowerFailure::new(
                    FailureKind::BadCall,
                    "expression is not callable",
                    callee.span,
                ));
            }
        };

        let sig = self
            .methods
            .lookup(&self.class_name, &method_name)
            .cloned()
            .ok_or_else(|| {
                LowerFailure::new(
                    FailureKind::UnknownMethod,
                    format!(
                        "`{}` is not defined in class `{}`",
                        method_name, self.class_name
                    ),
                    span,
                )
            })?;

        if self.in_static_method && !sig.is_static {
            return Err(LowerFailure::new(
                FailureKind::BadCall,
                format!("cannot call instance method `{}` from a static method", method_name),
                span,
            ));
        }

        if args.len() != sig.param_types.len() {
            return Err(LowerFailure::new(
                FailureKind::BadCall,
                format!(
                    "`{}` expects {} argument(s), found {}",
                    method_name,
                    sig.param_types.len(),
                    args.len()
                ),
                span,
            ));
        }

        let mut operands = Vec::new();
        for arg in args {
            operands.push(self.lower_expr(arg)?);
        }
        self.current_span = span;
        for operand in &operands {
            self.emit(format!("push {}", operand));
        }

        let label = self.labels.named(&sig.label);
        self.labels.mark_referenced(label);
        self.emit(format!("call {}", sig.label));

        match &sig.return_type {
            Some(type_name) => {
                let id = self.temp(type_name);
                let dst = self.use_symbol(id);
                self.emit(format!("pop {}", dst));
                Ok(Some(dst))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Symbol and label helpers
    // =========================================================================

    fn emit(&mut self, text: String) {
        self.code.line(text);
    }

    /// Records an operand occurrence and returns the unique name.
    fn use_symbol(&mut self, id: SymbolId) -> String {
        let name = self.directory.symbol(id).unique_name.clone();
        self.symbol_refs.push(SymbolRef {
            unique_name: name.clone(),
            span: self.current_span,
        });
        name
    }

    fn temp(&mut self, type_name: &str) -> SymbolId {
        self.directory
            .create_symbol("temp", type_name, DeclFlags::INTERNAL)
    }

    fn this_symbol(&mut self) -> Result<SymbolId, LowerFailure> {
        if self.in_static_method {
            return Err(LowerFailure::new(
                FailureKind::Unsupported,
                "`this` is not available in a static method",
                self.current_span,
            ));
        }
        if let Some(id) = self.this_symbol {
            return Ok(id);
        }
        let id = self.directory.create_symbol(
            "this",
            self.class_storage.clone(),
            DeclFlags::THIS | DeclFlags::INTERNAL,
        );
        self.this_symbol = Some(id);
        Ok(id)
    }

    fn field_symbol(
        &mut self,
        object: &Node<Expr>,
        property: &Node<Ident>,
    ) -> Result<SymbolId, LowerFailure> {
        if !matches!(object.value, Expr::This) {
            return Err(LowerFailure::new(
                FailureKind::Unsupported,
                "member access through object references is not supported",
                object.span,
            ));
        }
        if self.in_static_method {
            return Err(LowerFailure::new(
                FailureKind::Unsupported,
                "`this` is not available in a static method",
                object.span,
            ));
        }
        self.fields
            .get(&property.value.name)
            .copied()
            .ok_or_else(|| {
                LowerFailure::new(
                    FailureKind::UnknownSymbol,
                    format!(
                        "class `{}` has no field `{}`",
                        self.class_name, property.value.name
                    ),
                    property.span,
                )
            })
    }

    /// Emits the materializing `const` instruction for a constant's
    /// first use in the current method body.
    fn materialize_const(&mut self, id: SymbolId) {
        if let Some(lit) = self.const_inits.get(&id).cloned() {
            if self.materialized_consts.insert(id) {
                let dst = self.use_symbol(id);
                self.emit(format!("const {}, {}", dst, render_literal(&lit)));
            }
        }
    }

    fn symbol_type(&self, unique_name: &str) -> String {
        self.directory
            .find_unique(unique_name)
            .map(|id| self.directory.symbol(id).type_name.clone())
            .unwrap_or_else(|| "SystemObject".to_string())
    }

    fn resolve_storage(&self, ty: &Node<TypeRef>) -> Result<String, LowerFailure> {
        match self.resolver.resolve_type(&ty.value) {
            Some(ResolvedType::Storage(name)) => Ok(name),
            Some(ResolvedType::Void) => Err(LowerFailure::new(
                FailureKind::TypeResolution,
                "`void` is not a valid storage type",
                ty.span,
            )),
            None => Err(LowerFailure::new(
                FailureKind::TypeResolution,
                format!("unknown type `{}`", ty.value),
                ty.span,
            )),
        }
    }

    fn define_label(&mut self, id: LabelId) {
        self.labels.mark_defined(id);
        let name = self.labels.name(id).to_string();
        self.emit(format!("{}:", name));
    }

    fn emit_jump(&mut self, id: LabelId) {
        self.labels.mark_referenced(id);
        let name = self.labels.name(id).to_string();
        self.emit(format!("jump {}", name));
    }

    fn emit_branch_false(&mut self, cond: &str, id: LabelId) {
        self.labels.mark_referenced(id);
        let name = self.labels.name(id).to_string();
        self.emit(format!("jump_if_false {}, {}", cond, name));
    }
}

// =============================================================================
// Rendering helpers
// =============================================================================

fn binary_mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::Rem => "rem",
        BinaryOp::Eq => "cmp_eq",
        BinaryOp::Ne => "cmp_ne",
        BinaryOp::Lt => "cmp_lt",
        BinaryOp::Le => "cmp_le",
        BinaryOp::Gt => "cmp_gt",
        BinaryOp::Ge => "cmp_ge",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}

fn literal_type(lit: &Literal) -> &'static str {
    match lit {
        Literal::Int(_) => "SystemInt32",
        Literal::Float(_) => "SystemSingle",
        Literal::Bool(_) => "SystemBoolean",
        Literal::Str(_) => "SystemString",
        Literal::Null => "SystemObject",
    }
}

fn render_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(v) => v.to_string(),
        Literal::Float(v) => format!("{:?}", v),
        Literal::Bool(v) => v.to_string(),
        Literal::Str(v) => format!("{:?}", v),
        Literal::Null => "null".to_string(),
    }
}
