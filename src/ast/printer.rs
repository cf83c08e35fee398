use super::nodes::*;
use super::CompilationUnit;

/// Renders syntax trees back to Java source text
///
/// Output is normalized (two-space indentation, one member per line, no comments) and is
/// itself parseable, so printing a tree and parsing the result yields an equivalent tree.
/// Error markers left by recovery are rendered as `(ERROR)` the way javac's pretty printer does.
pub struct AstPrinter {
    indent_level: usize,
    output: String,
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl AstPrinter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            output: String::new(),
        }
    }

    pub fn print_compilation_unit(&mut self, unit: &CompilationUnit) -> String {
        self.output.clear();

        if let Some(ref package) = unit.package_decl {
            for ann in &package.annotations {
                self.write_annotation(ann);
                self.output.push('\n');
            }
            self.writeln(&package.to_string());
            self.output.push('\n');
        }

        for import in &unit.imports {
            self.writeln(&import.to_string());
        }
        if !unit.imports.is_empty() {
            self.output.push('\n');
        }

        if let Some(ref module) = unit.module_decl {
            self.write_module_decl(module);
            self.output.push('\n');
        }

        for decl in &unit.type_decls {
            match decl {
                TopLevel::Type(t) => self.write_type_decl(t),
                TopLevel::Empty(_) => self.output.push(';'),
                TopLevel::Erroneous(_) => self.output.push_str("(ERROR)"),
            }
            self.output.push('\n');
        }

        std::mem::take(&mut self.output)
    }

    pub fn print_type_decl(&mut self, decl: &TypeDecl) -> String {
        self.output.clear();
        self.write_type_decl(decl);
        std::mem::take(&mut self.output)
    }

    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        self.output.clear();
        self.write_stmt(stmt);
        std::mem::take(&mut self.output)
    }

    pub fn print_expr(&mut self, expr: &Expr) -> String {
        self.output.clear();
        self.write_expr(expr);
        std::mem::take(&mut self.output)
    }

    pub fn print_type_ref(&mut self, type_ref: &TypeRef) -> String {
        self.output.clear();
        self.write_type_ref(type_ref);
        std::mem::take(&mut self.output)
    }

    fn indent(&mut self) {
        self.indent_level += 2;
    }

    fn dedent(&mut self) {
        if self.indent_level >= 2 {
            self.indent_level -= 2;
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push(' ');
        }
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn write_separated<T>(&mut self, items: &[T], sep: &str, mut write: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.output.push_str(sep);
            }
            write(self, item);
        }
    }

    fn write_module_decl(&mut self, module: &ModuleDecl) {
        for ann in &module.annotations {
            self.write_annotation(ann);
            self.output.push('\n');
        }
        if module.is_open {
            self.output.push_str("open ");
        }
        self.output.push_str("module ");
        self.output.push_str(&module.name);
        self.output.push_str(" {\n");
        self.indent();
        for directive in &module.directives {
            let line = match directive {
                ModuleDirective::Requires { is_transitive, is_static, module, .. } => {
                    let mut line = String::from("requires ");
                    if *is_transitive {
                        line.push_str("transitive ");
                    }
                    if *is_static {
                        line.push_str("static ");
                    }
                    line.push_str(module);
                    line
                }
                ModuleDirective::Exports { package, to, .. } if to.is_empty() => format!("exports {}", package),
                ModuleDirective::Exports { package, to, .. } => format!("exports {} to {}", package, to.join(", ")),
                ModuleDirective::Opens { package, to, .. } if to.is_empty() => format!("opens {}", package),
                ModuleDirective::Opens { package, to, .. } => format!("opens {} to {}", package, to.join(", ")),
                ModuleDirective::Uses { service, .. } => format!("uses {}", service),
                ModuleDirective::Provides { service, with, .. } => {
                    format!("provides {} with {}", service, with.join(", "))
                }
            };
            self.writeln(&format!("{};", line));
        }
        self.dedent();
        self.output.push('}');
    }

    fn write_modifiers(&mut self, modifiers: &[Modifier]) {
        for modifier in modifiers {
            self.output.push_str(modifier.as_str());
            self.output.push(' ');
        }
    }

    /// Annotations of a declaration, one per line
    fn write_decl_annotations(&mut self, annotations: &[Annotation]) {
        for ann in annotations {
            self.write_annotation(ann);
            self.output.push('\n');
            self.write_indent();
        }
    }

    fn write_inline_annotations(&mut self, annotations: &[Annotation]) {
        for ann in annotations {
            self.write_annotation(ann);
            self.output.push(' ');
        }
    }

    fn write_annotation(&mut self, ann: &Annotation) {
        self.output.push('@');
        self.output.push_str(&ann.name);
        if ann.arguments.is_empty() {
            return;
        }
        self.output.push('(');
        self.write_separated(&ann.arguments, ", ", |p, arg| match arg {
            AnnotationArg::Value(v) => p.write_expr(v),
            AnnotationArg::Named(name, v) => {
                p.output.push_str(name);
                p.output.push_str(" = ");
                p.write_expr(v);
            }
        });
        self.output.push(')');
    }

    fn write_type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.output.push('<');
        self.write_separated(params, ", ", |p, param| {
            p.write_inline_annotations(&param.annotations);
            p.output.push_str(&param.name);
            if !param.bounds.is_empty() {
                p.output.push_str(" extends ");
                p.write_separated(&param.bounds, " & ", |p, b| p.write_type_ref(b));
            }
        });
        self.output.push('>');
    }

    fn write_type_list(&mut self, keyword: &str, types: &[TypeRef]) {
        if types.is_empty() {
            return;
        }
        self.output.push(' ');
        self.output.push_str(keyword);
        self.output.push(' ');
        self.write_separated(types, ", ", |p, t| p.write_type_ref(t));
    }

    fn write_type_ref(&mut self, type_ref: &TypeRef) {
        if let Some(ref outer) = type_ref.outer {
            self.write_type_ref(outer);
            self.output.push('.');
        }
        self.write_inline_annotations(&type_ref.annotations);
        self.output.push_str(&type_ref.name);
        if type_ref.diamond {
            self.output.push_str("<>");
        }
        self.write_type_args(&type_ref.type_args);
        for _ in 0..type_ref.array_dims {
            self.output.push_str("[]");
        }
    }

    fn write_type_args(&mut self, args: &[TypeArg]) {
        if args.is_empty() {
            return;
        }
        self.output.push('<');
        self.write_separated(args, ", ", |p, arg| match arg {
            TypeArg::Type(t) => p.write_type_ref(t),
            TypeArg::Wildcard(w) => {
                p.write_inline_annotations(&w.annotations);
                p.output.push('?');
                match w.bound {
                    Some((BoundKind::Extends, ref t)) => {
                        p.output.push_str(" extends ");
                        p.write_type_ref(t);
                    }
                    Some((BoundKind::Super, ref t)) => {
                        p.output.push_str(" super ");
                        p.write_type_ref(t);
                    }
                    None => {}
                }
            }
        });
        self.output.push('>');
    }

    fn write_type_decl(&mut self, decl: &TypeDecl) {
        match decl {
            TypeDecl::Class(class) => {
                self.write_decl_annotations(&class.annotations);
                self.write_modifiers(&class.modifiers);
                self.output.push_str("class ");
                self.output.push_str(&class.name);
                self.write_type_params(&class.type_params);
                if let Some(ref extends) = class.extends {
                    self.output.push_str(" extends ");
                    self.write_type_ref(extends);
                }
                self.write_type_list("implements", &class.implements);
                self.write_type_list("permits", &class.permits);
                self.output.push(' ');
                self.write_class_body(&class.body);
            }
            TypeDecl::Interface(interface) => {
                self.write_decl_annotations(&interface.annotations);
                self.write_modifiers(&interface.modifiers);
                self.output.push_str("interface ");
                self.output.push_str(&interface.name);
                self.write_type_params(&interface.type_params);
                self.write_type_list("extends", &interface.extends);
                self.write_type_list("permits", &interface.permits);
                self.output.push(' ');
                self.write_class_body(&interface.body);
            }
            TypeDecl::Enum(enum_decl) => {
                self.write_decl_annotations(&enum_decl.annotations);
                self.write_modifiers(&enum_decl.modifiers);
                self.output.push_str("enum ");
                self.output.push_str(&enum_decl.name);
                self.write_type_list("implements", &enum_decl.implements);
                self.output.push_str(" {\n");
                self.indent();
                for (i, constant) in enum_decl.constants.iter().enumerate() {
                    self.write_indent();
                    self.write_inline_annotations(&constant.annotations);
                    self.output.push_str(&constant.name);
                    if let Some(ref args) = constant.arguments {
                        self.write_arguments(args);
                    }
                    if let Some(ref body) = constant.body {
                        self.output.push(' ');
                        self.write_class_body(body);
                    }
                    if i + 1 < enum_decl.constants.len() {
                        self.output.push_str(",\n");
                    }
                }
                if !enum_decl.constants.is_empty() || !enum_decl.body.is_empty() {
                    self.output.push_str(";\n");
                }
                self.write_members(&enum_decl.body);
                self.dedent();
                self.write_indent();
                self.output.push('}');
            }
            TypeDecl::Record(record) => {
                self.write_decl_annotations(&record.annotations);
                self.write_modifiers(&record.modifiers);
                self.output.push_str("record ");
                self.output.push_str(&record.name);
                self.write_type_params(&record.type_params);
                self.write_parameters(&record.components);
                self.write_type_list("implements", &record.implements);
                self.output.push(' ');
                self.write_class_body(&record.body);
            }
            TypeDecl::Annotation(annotation) => {
                self.write_decl_annotations(&annotation.annotations);
                self.write_modifiers(&annotation.modifiers);
                self.output.push_str("@interface ");
                self.output.push_str(&annotation.name);
                self.output.push(' ');
                self.write_class_body(&annotation.body);
            }
        }
    }

    fn write_class_body(&mut self, members: &[ClassMember]) {
        if members.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent();
        self.write_members(members);
        self.dedent();
        self.write_indent();
        self.output.push('}');
    }

    fn write_members(&mut self, members: &[ClassMember]) {
        for member in members {
            self.write_indent();
            self.write_member(member);
            self.output.push('\n');
        }
    }

    fn write_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Field(field) => {
                self.write_decl_annotations(&field.annotations);
                self.write_modifiers(&field.modifiers);
                self.write_type_ref(&field.type_ref);
                self.output.push(' ');
                self.write_declarators(&field.variables);
                self.output.push(';');
            }
            ClassMember::Method(method) => {
                self.write_decl_annotations(&method.annotations);
                self.write_modifiers(&method.modifiers);
                if !method.type_params.is_empty() {
                    self.write_type_params(&method.type_params);
                    self.output.push(' ');
                }
                match method.return_type {
                    Some(ref t) => self.write_type_ref(t),
                    None => self.output.push_str("void"),
                }
                self.output.push(' ');
                self.output.push_str(&method.name);
                self.write_parameters(&method.parameters);
                self.write_type_list("throws", &method.throws);
                if let Some(ref default_value) = method.default_value {
                    self.output.push_str(" default ");
                    self.write_expr(default_value);
                }
                match method.body {
                    Some(ref body) => {
                        self.output.push(' ');
                        self.write_block(body);
                    }
                    None => self.output.push(';'),
                }
            }
            ClassMember::Constructor(ctor) => {
                self.write_decl_annotations(&ctor.annotations);
                self.write_modifiers(&ctor.modifiers);
                if !ctor.type_params.is_empty() {
                    self.write_type_params(&ctor.type_params);
                    self.output.push(' ');
                }
                self.output.push_str(&ctor.name);
                if !ctor.compact {
                    self.write_parameters(&ctor.parameters);
                }
                self.write_type_list("throws", &ctor.throws);
                self.output.push(' ');
                self.write_block(&ctor.body);
            }
            ClassMember::Initializer(init) => {
                if init.is_static {
                    self.output.push_str("static ");
                }
                self.write_block(&init.body);
            }
            ClassMember::TypeDecl(t) => self.write_type_decl(t),
            ClassMember::Erroneous(_) => self.output.push_str("(ERROR)"),
        }
    }

    fn write_parameters(&mut self, params: &[Parameter]) {
        self.output.push('(');
        self.write_separated(params, ", ", |p, param| p.write_parameter(param));
        self.output.push(')');
    }

    fn write_parameter(&mut self, param: &Parameter) {
        self.write_inline_annotations(&param.annotations);
        self.write_modifiers(&param.modifiers);
        self.write_type_ref(&param.type_ref);
        if param.varargs {
            self.output.push_str("...");
        }
        self.output.push(' ');
        self.output.push_str(&param.name);
    }

    fn write_declarators(&mut self, variables: &[VariableDeclarator]) {
        self.write_separated(variables, ", ", |p, var| {
            p.output.push_str(&var.name);
            for _ in 0..var.array_dims {
                p.output.push_str("[]");
            }
            if let Some(ref init) = var.initializer {
                p.output.push_str(" = ");
                p.write_expr(init);
            }
        });
    }

    fn write_var_decl(&mut self, decl: &VarDeclStmt) {
        self.write_inline_annotations(&decl.annotations);
        self.write_modifiers(&decl.modifiers);
        self.write_type_ref(&decl.type_ref);
        self.output.push(' ');
        self.write_declarators(&decl.variables);
    }

    fn write_block(&mut self, block: &Block) {
        if block.statements.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent();
        for stmt in &block.statements {
            self.write_indent();
            self.write_stmt(stmt);
            self.output.push('\n');
        }
        self.dedent();
        self.write_indent();
        self.output.push('}');
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expression(s) => {
                self.write_expr(&s.expr);
                self.output.push(';');
            }
            Stmt::Declaration(decl) => {
                self.write_var_decl(decl);
                self.output.push(';');
            }
            Stmt::TypeDecl(t) => self.write_type_decl(t),
            Stmt::If(s) => {
                self.output.push_str("if (");
                self.write_expr(&s.condition);
                self.output.push_str(") ");
                self.write_stmt(&s.then_branch);
                if let Some(ref else_branch) = s.else_branch {
                    self.output.push_str(" else ");
                    self.write_stmt(else_branch);
                }
            }
            Stmt::While(s) => {
                self.output.push_str("while (");
                self.write_expr(&s.condition);
                self.output.push_str(") ");
                self.write_stmt(&s.body);
            }
            Stmt::DoWhile(s) => {
                self.output.push_str("do ");
                self.write_stmt(&s.body);
                self.output.push_str(" while (");
                self.write_expr(&s.condition);
                self.output.push_str(");");
            }
            Stmt::For(s) => {
                self.output.push_str("for (");
                self.write_separated(&s.init, ", ", |p, init| match init {
                    Stmt::Declaration(decl) => p.write_var_decl(decl),
                    Stmt::Expression(e) => p.write_expr(&e.expr),
                    other => p.write_stmt(other),
                });
                self.output.push_str("; ");
                if let Some(ref condition) = s.condition {
                    self.write_expr(condition);
                }
                self.output.push_str("; ");
                self.write_separated(&s.update, ", ", |p, u| p.write_expr(&u.expr));
                self.output.push_str(") ");
                self.write_stmt(&s.body);
            }
            Stmt::ForEach(s) => {
                self.output.push_str("for (");
                self.write_parameter(&s.variable);
                self.output.push_str(" : ");
                self.write_expr(&s.iterable);
                self.output.push_str(") ");
                self.write_stmt(&s.body);
            }
            Stmt::Switch(s) => self.write_switch(&s.selector, &s.cases),
            Stmt::Return(s) => match s.value {
                Some(ref value) => {
                    self.output.push_str("return ");
                    self.write_expr(value);
                    self.output.push(';');
                }
                None => self.output.push_str("return;"),
            },
            Stmt::Break(s) => self.write_jump("break", s.label.as_deref()),
            Stmt::Continue(s) => self.write_jump("continue", s.label.as_deref()),
            Stmt::Try(s) => {
                self.output.push_str("try ");
                if !s.resources.is_empty() {
                    self.output.push('(');
                    self.write_separated(&s.resources, "; ", |p, res| match res {
                        TryResource::Var { modifiers, type_ref, name, initializer, .. } => {
                            p.write_modifiers(modifiers);
                            p.write_type_ref(type_ref);
                            p.output.push(' ');
                            p.output.push_str(name);
                            p.output.push_str(" = ");
                            p.write_expr(initializer);
                        }
                        TryResource::Expr { expr, .. } => p.write_expr(expr),
                    });
                    self.output.push_str(") ");
                }
                self.write_block(&s.try_block);
                for catch in &s.catch_clauses {
                    self.output.push_str(" catch (");
                    self.write_modifiers(&catch.parameter.modifiers);
                    self.write_type_ref(&catch.parameter.type_ref);
                    for alt in &catch.alt_types {
                        self.output.push_str(" | ");
                        self.write_type_ref(alt);
                    }
                    self.output.push(' ');
                    self.output.push_str(&catch.parameter.name);
                    self.output.push_str(") ");
                    self.write_block(&catch.block);
                }
                if let Some(ref finally) = s.finally_block {
                    self.output.push_str(" finally ");
                    self.write_block(finally);
                }
            }
            Stmt::Throw(s) => {
                self.output.push_str("throw ");
                self.write_expr(&s.expr);
                self.output.push(';');
            }
            Stmt::Assert(s) => {
                self.output.push_str("assert ");
                self.write_expr(&s.condition);
                if let Some(ref message) = s.message {
                    self.output.push_str(" : ");
                    self.write_expr(message);
                }
                self.output.push(';');
            }
            Stmt::Synchronized(s) => {
                self.output.push_str("synchronized (");
                self.write_expr(&s.lock);
                self.output.push_str(") ");
                self.write_block(&s.body);
            }
            Stmt::Labeled(s) => {
                self.output.push_str(&s.label);
                self.output.push_str(": ");
                self.write_stmt(&s.statement);
            }
            Stmt::Yield(s) => {
                self.output.push_str("yield ");
                self.write_expr(&s.value);
                self.output.push(';');
            }
            Stmt::Block(b) => self.write_block(b),
            Stmt::Empty(_) => self.output.push(';'),
            Stmt::Erroneous(_) => self.output.push_str("(ERROR);"),
        }
    }

    fn write_jump(&mut self, keyword: &str, label: Option<&str>) {
        self.output.push_str(keyword);
        if let Some(label) = label {
            self.output.push(' ');
            self.output.push_str(label);
        }
        self.output.push(';');
    }

    fn write_switch(&mut self, selector: &Expr, cases: &[SwitchCase]) {
        self.output.push_str("switch (");
        self.write_expr(selector);
        self.output.push_str(") {\n");
        self.indent();
        for case in cases {
            self.write_indent();
            if case.is_default() {
                self.output.push_str("default");
            } else {
                self.output.push_str("case ");
                self.write_separated(&case.labels, ", ", |p, label| p.write_expr(label));
            }
            if case.arrow {
                self.output.push_str(" -> ");
                for stmt in &case.statements {
                    self.write_stmt(stmt);
                }
                self.output.push('\n');
                continue;
            }
            self.output.push_str(":\n");
            self.indent();
            for stmt in &case.statements {
                self.write_indent();
                self.write_stmt(stmt);
                self.output.push('\n');
            }
            self.dedent();
        }
        self.dedent();
        self.write_indent();
        self.output.push('}');
    }

    fn write_arguments(&mut self, args: &[Expr]) {
        self.output.push('(');
        self.write_separated(args, ", ", |p, arg| p.write_expr(arg));
        self.output.push(')');
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => self.write_literal(&lit.value),
            Expr::Identifier(id) => self.output.push_str(&id.name),
            Expr::Binary(b) => {
                self.write_expr(&b.left);
                self.output.push(' ');
                self.output.push_str(b.operator.as_str());
                self.output.push(' ');
                self.write_expr(&b.right);
            }
            Expr::Unary(u) => {
                if u.operator.is_postfix() {
                    self.write_expr(&u.operand);
                    self.output.push_str(u.operator.as_str());
                } else {
                    self.output.push_str(u.operator.as_str());
                    self.write_expr(&u.operand);
                }
            }
            Expr::Assignment(a) => {
                self.write_expr(&a.target);
                self.output.push(' ');
                self.output.push_str(a.operator.as_str());
                self.output.push(' ');
                self.write_expr(&a.value);
            }
            Expr::MethodCall(call) => {
                if let Some(ref target) = call.target {
                    self.write_expr(target);
                    self.output.push('.');
                }
                self.write_type_args(&call.type_args);
                self.output.push_str(&call.name);
                self.write_arguments(&call.arguments);
            }
            Expr::FieldAccess(access) => {
                self.write_expr(&access.target);
                self.output.push('.');
                self.output.push_str(&access.name);
            }
            Expr::ArrayAccess(access) => {
                self.write_expr(&access.array);
                self.output.push('[');
                self.write_expr(&access.index);
                self.output.push(']');
            }
            Expr::Cast(cast) => {
                self.output.push('(');
                self.write_type_ref(&cast.target_type);
                for bound in &cast.extra_bounds {
                    self.output.push_str(" & ");
                    self.write_type_ref(bound);
                }
                self.output.push_str(") ");
                self.write_expr(&cast.expr);
            }
            Expr::InstanceOf(inst) => {
                self.write_expr(&inst.expr);
                self.output.push_str(" instanceof ");
                self.write_type_ref(&inst.target_type);
                if let Some(ref binding) = inst.binding {
                    self.output.push(' ');
                    self.output.push_str(binding);
                }
            }
            Expr::Conditional(c) => {
                self.write_expr(&c.condition);
                self.output.push_str(" ? ");
                self.write_expr(&c.then_expr);
                self.output.push_str(" : ");
                self.write_expr(&c.else_expr);
            }
            Expr::New(new) => {
                if let Some(ref outer) = new.outer {
                    self.write_expr(outer);
                    self.output.push('.');
                }
                self.output.push_str("new ");
                self.write_type_ref(&new.target_type);
                self.write_arguments(&new.arguments);
                if let Some(ref body) = new.anonymous_body {
                    self.output.push(' ');
                    self.write_class_body(body);
                }
            }
            Expr::NewArray(new) => {
                self.output.push_str("new ");
                self.write_type_ref(&new.element_type);
                for dim in &new.dimensions {
                    self.output.push('[');
                    self.write_expr(dim);
                    self.output.push(']');
                }
                for _ in 0..new.extra_dims {
                    self.output.push_str("[]");
                }
                if let Some(ref init) = new.initializer {
                    self.output.push(' ');
                    self.write_array_init(init);
                }
            }
            Expr::Parenthesized(p) => {
                self.output.push('(');
                self.write_expr(&p.expr);
                self.output.push(')');
            }
            Expr::ArrayInitializer(init) => self.write_array_init(init),
            Expr::Lambda(lambda) => {
                let bare = lambda.params.len() == 1
                    && lambda.params[0].type_ref.is_none()
                    && lambda.params[0].modifiers.is_empty();
                if bare {
                    self.output.push_str(&lambda.params[0].name);
                } else {
                    self.output.push('(');
                    self.write_separated(&lambda.params, ", ", |p, param| {
                        p.write_modifiers(&param.modifiers);
                        if let Some(ref t) = param.type_ref {
                            p.write_type_ref(t);
                            p.output.push(' ');
                        }
                        p.output.push_str(&param.name);
                    });
                    self.output.push(')');
                }
                self.output.push_str(" -> ");
                match lambda.body {
                    LambdaBody::Expr(ref e) => self.write_expr(e),
                    LambdaBody::Block(ref b) => self.write_block(b),
                }
            }
            Expr::MethodRef(r) => {
                self.write_expr(&r.target);
                self.output.push_str("::");
                self.write_type_args(&r.type_args);
                self.output.push_str(&r.name);
            }
            Expr::Switch(s) => self.write_switch(&s.selector, &s.cases),
            Expr::Annotation(ann) => self.write_annotation(ann),
            Expr::Type(t) => self.write_type_ref(t),
            Expr::Erroneous(_) => self.output.push_str("(ERROR)"),
        }
    }

    fn write_array_init(&mut self, init: &ArrayInitExpr) {
        self.output.push('{');
        self.write_separated(&init.elements, ", ", |p, e| p.write_expr(e));
        self.output.push('}');
    }

    fn write_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Int(v) => self.output.push_str(&v.to_string()),
            Literal::Long(v) => self.output.push_str(&format!("{}L", v)),
            Literal::Float(v) => self.output.push_str(&format!("{:?}f", v)),
            Literal::Double(v) => self.output.push_str(&format!("{:?}", v)),
            Literal::Boolean(v) => self.output.push_str(if *v { "true" } else { "false" }),
            Literal::Char(c) => {
                self.output.push('\'');
                push_escaped(&mut self.output, *c, '\'');
                self.output.push('\'');
            }
            Literal::String(s) | Literal::TextBlock(s) => {
                self.output.push('"');
                for c in s.chars() {
                    push_escaped(&mut self.output, c, '"');
                }
                self.output.push('"');
            }
            Literal::Null => self.output.push_str("null"),
        }
    }
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    fn ident(name: &str) -> Expr {
        Expr::Identifier(IdentifierExpr { name: name.to_string(), span: Span::default() })
    }

    #[test]
    fn prints_generic_array_type() {
        let mut list = TypeRef::simple("java.util.List", Span::default());
        list.type_args.push(TypeArg::Wildcard(WildcardType {
            annotations: vec![],
            bound: Some((BoundKind::Extends, TypeRef::simple("Number", Span::default()))),
            span: Span::default(),
        }));
        list.array_dims = 2;
        assert_eq!(list.to_string(), "java.util.List<? extends Number>[][]");
    }

    #[test]
    fn prints_call_with_escaped_string() {
        let call = Expr::MethodCall(MethodCallExpr {
            target: Some(Box::new(ident("out"))),
            type_args: vec![],
            name: "println".to_string(),
            arguments: vec![Expr::Literal(LiteralExpr {
                value: Literal::String("say \"hi\"\n".to_string()),
                span: Span::default(),
            })],
            span: Span::default(),
        });
        assert_eq!(call.to_string(), r#"out.println("say \"hi\"\n")"#);
    }

    #[test]
    fn prints_error_marker() {
        let stmt = Stmt::Erroneous(ErroneousNode { span: Span::default() });
        assert_eq!(AstPrinter::new().print_stmt(&stmt), "(ERROR);");
    }
}
