use super::{AstNode, AstPrinter, Span};
use std::fmt;

macro_rules! impl_ast_node {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl AstNode for $ty {
                fn span(&self) -> Span {
                    self.span
                }

                fn kind(&self) -> &'static str {
                    $kind
                }
            }
        )*
    };
}

/// Placeholder left where the parser recovered from a syntax error
#[derive(Debug, Clone, PartialEq)]
pub struct ErroneousNode {
    pub span: Span,
}

// Package, import and module clauses
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDecl {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub span: Span,
}

impl fmt::Display for PackageDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "package {};", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub name: String,
    pub is_static: bool,
    pub is_wildcard: bool,
    pub span: Span,
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "import static ")?;
        } else {
            write!(f, "import ")?;
        }

        if self.is_wildcard {
            write!(f, "{}.*;", self.name)
        } else {
            write!(f, "{};", self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub annotations: Vec<Annotation>,
    pub is_open: bool,
    pub name: String,
    pub directives: Vec<ModuleDirective>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleDirective {
    Requires {
        is_transitive: bool,
        is_static: bool,
        module: String,
        span: Span,
    },
    Exports {
        package: String,
        to: Vec<String>,
        span: Span,
    },
    Opens {
        package: String,
        to: Vec<String>,
        span: Span,
    },
    Uses {
        service: String,
        span: Span,
    },
    Provides {
        service: String,
        with: Vec<String>,
        span: Span,
    },
}

impl ModuleDirective {
    pub fn span(&self) -> Span {
        match self {
            ModuleDirective::Requires { span, .. }
            | ModuleDirective::Exports { span, .. }
            | ModuleDirective::Opens { span, .. }
            | ModuleDirective::Uses { span, .. }
            | ModuleDirective::Provides { span, .. } => *span,
        }
    }
}

/// One top-level form of a compilation unit
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Type(TypeDecl),
    /// A stray `;` between declarations
    Empty(Span),
    Erroneous(ErroneousNode),
}

impl AstNode for TopLevel {
    fn span(&self) -> Span {
        match self {
            TopLevel::Type(t) => t.span(),
            TopLevel::Empty(span) => *span,
            TopLevel::Erroneous(e) => e.span,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            TopLevel::Type(t) => t.kind(),
            TopLevel::Empty(_) => "empty statement",
            TopLevel::Erroneous(_) => "erroneous tree",
        }
    }
}

// Type Declarations
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Record(RecordDecl),
    Annotation(AnnotationDecl),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Class(c) => &c.name,
            TypeDecl::Interface(i) => &i.name,
            TypeDecl::Enum(e) => &e.name,
            TypeDecl::Record(r) => &r.name,
            TypeDecl::Annotation(a) => &a.name,
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            TypeDecl::Class(c) => &c.modifiers,
            TypeDecl::Interface(i) => &i.modifiers,
            TypeDecl::Enum(e) => &e.modifiers,
            TypeDecl::Record(r) => &r.modifiers,
            TypeDecl::Annotation(a) => &a.modifiers,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            TypeDecl::Class(c) => &c.annotations,
            TypeDecl::Interface(i) => &i.annotations,
            TypeDecl::Enum(e) => &e.annotations,
            TypeDecl::Record(r) => &r.annotations,
            TypeDecl::Annotation(a) => &a.annotations,
        }
    }

    pub fn members(&self) -> &[ClassMember] {
        match self {
            TypeDecl::Class(c) => &c.body,
            TypeDecl::Interface(i) => &i.body,
            TypeDecl::Enum(e) => &e.body,
            TypeDecl::Record(r) => &r.body,
            TypeDecl::Annotation(a) => &a.body,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            TypeDecl::Class(c) => c.doc.as_deref(),
            TypeDecl::Interface(i) => i.doc.as_deref(),
            TypeDecl::Enum(e) => e.doc.as_deref(),
            TypeDecl::Record(r) => r.doc.as_deref(),
            TypeDecl::Annotation(a) => a.doc.as_deref(),
        }
    }
}

impl AstNode for TypeDecl {
    fn span(&self) -> Span {
        match self {
            TypeDecl::Class(c) => c.span,
            TypeDecl::Interface(i) => i.span,
            TypeDecl::Enum(e) => e.span,
            TypeDecl::Record(r) => r.span,
            TypeDecl::Annotation(a) => a.span,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            TypeDecl::Class(c) => c.kind(),
            TypeDecl::Interface(i) => i.kind(),
            TypeDecl::Enum(e) => e.kind(),
            TypeDecl::Record(r) => r.kind(),
            TypeDecl::Annotation(a) => a.kind(),
        }
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&AstPrinter::new().print_type_decl(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub permits: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeRef>,
    pub permits: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub name: String,
    pub implements: Vec<TypeRef>,
    pub constants: Vec<EnumConstant>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub annotations: Vec<Annotation>,
    pub name: String,
    /// `None` when the constant has no argument list at all
    pub arguments: Option<Vec<Expr>>,
    pub body: Option<Vec<ClassMember>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub components: Vec<Parameter>,
    pub implements: Vec<TypeRef>,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub name: String,
    pub body: Vec<ClassMember>,
    pub span: Span,
}

// Modifiers and Annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
    Sealed,
    NonSealed,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Native => "native",
            Modifier::Synchronized => "synchronized",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
            Modifier::Default => "default",
            Modifier::Sealed => "sealed",
            Modifier::NonSealed => "non-sealed",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<AnnotationArg>,
    pub span: Span,
}

impl Annotation {
    /// True for `@Deprecated` and `@java.lang.Deprecated`
    pub fn is_deprecated(&self) -> bool {
        self.name == "Deprecated" || self.name == "java.lang.Deprecated"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArg {
    Value(Expr),
    Named(String, Expr),
}

// Type References
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// Dotted name of the type, or a primitive keyword such as `int`
    pub name: String,
    /// Enclosing parameterized type for shapes like `Outer<A>.Inner`
    pub outer: Option<Box<TypeRef>>,
    pub type_args: Vec<TypeArg>,
    /// `<>` in an instance creation; `type_args` is empty then
    pub diamond: bool,
    pub annotations: Vec<Annotation>,
    pub array_dims: usize,
    pub span: Span,
}

impl TypeRef {
    pub fn simple(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            outer: None,
            type_args: Vec::new(),
            diamond: false,
            annotations: Vec::new(),
            array_dims: 0,
            span,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.array_dims == 0
            && matches!(
                self.name.as_str(),
                "boolean" | "byte" | "short" | "int" | "long" | "char" | "float" | "double" | "void"
            )
    }

    pub fn is_array(&self) -> bool {
        self.array_dims > 0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&AstPrinter::new().print_type_ref(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeArg {
    Type(TypeRef),
    Wildcard(WildcardType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WildcardType {
    pub annotations: Vec<Annotation>,
    pub bound: Option<(BoundKind, TypeRef)>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub annotations: Vec<Annotation>,
    pub name: String,
    pub bounds: Vec<TypeRef>,
    pub span: Span,
}

// Class and Interface Members
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Initializer(InitializerBlock),
    TypeDecl(TypeDecl),
    Erroneous(ErroneousNode),
}

impl AstNode for ClassMember {
    fn span(&self) -> Span {
        match self {
            ClassMember::Field(f) => f.span,
            ClassMember::Method(m) => m.span,
            ClassMember::Constructor(c) => c.span,
            ClassMember::Initializer(i) => i.span,
            ClassMember::TypeDecl(t) => t.span(),
            ClassMember::Erroneous(e) => e.span,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ClassMember::Field(f) => f.kind(),
            ClassMember::Method(m) => m.kind(),
            ClassMember::Constructor(c) => c.kind(),
            ClassMember::Initializer(i) => i.kind(),
            ClassMember::TypeDecl(t) => t.kind(),
            ClassMember::Erroneous(_) => "erroneous tree",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub type_ref: TypeRef,
    pub variables: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    /// `None` for `void`
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub body: Option<Block>,
    /// Annotation type element default, `int value() default 0;`
    pub default_value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub type_params: Vec<TypeParam>,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub body: Block,
    /// Record compact canonical constructor (no parameter list)
    pub compact: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub type_ref: TypeRef,
    pub name: String,
    pub varargs: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializerBlock {
    pub is_static: bool,
    pub body: Block,
    pub span: Span,
}

// Statements
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExprStmt),
    Declaration(VarDeclStmt),
    TypeDecl(TypeDecl),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Switch(SwitchStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Try(TryStmt),
    Throw(ThrowStmt),
    Assert(AssertStmt),
    Synchronized(SynchronizedStmt),
    Labeled(LabeledStmt),
    Yield(YieldStmt),
    Block(Block),
    Empty(Span),
    Erroneous(ErroneousNode),
}

impl AstNode for Stmt {
    fn span(&self) -> Span {
        match self {
            Stmt::Expression(s) => s.span,
            Stmt::Declaration(s) => s.span,
            Stmt::TypeDecl(t) => t.span(),
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForEach(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Assert(s) => s.span,
            Stmt::Synchronized(s) => s.span,
            Stmt::Labeled(s) => s.span,
            Stmt::Yield(s) => s.span,
            Stmt::Block(b) => b.span,
            Stmt::Empty(span) => *span,
            Stmt::Erroneous(e) => e.span,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Stmt::Expression(_) => "expression statement",
            Stmt::Declaration(_) => "variable declaration",
            Stmt::TypeDecl(t) => t.kind(),
            Stmt::If(_) => "if statement",
            Stmt::While(_) => "while loop",
            Stmt::DoWhile(_) => "do-while loop",
            Stmt::For(_) => "for loop",
            Stmt::ForEach(_) => "enhanced for loop",
            Stmt::Switch(_) => "switch statement",
            Stmt::Return(_) => "return statement",
            Stmt::Break(_) => "break statement",
            Stmt::Continue(_) => "continue statement",
            Stmt::Try(_) => "try statement",
            Stmt::Throw(_) => "throw statement",
            Stmt::Assert(_) => "assert statement",
            Stmt::Synchronized(_) => "synchronized statement",
            Stmt::Labeled(_) => "labeled statement",
            Stmt::Yield(_) => "yield statement",
            Stmt::Block(_) => "block",
            Stmt::Empty(_) => "empty statement",
            Stmt::Erroneous(_) => "erroneous tree",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    /// Declared type; `var` is kept as a type named `var`
    pub type_ref: TypeRef,
    pub variables: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: String,
    pub array_dims: usize,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Vec<Stmt>,
    pub condition: Option<Expr>,
    pub update: Vec<ExprStmt>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    pub variable: Parameter,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub selector: Expr,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub labels: Vec<Expr>, // empty labels indicates default
    /// `case X ->` rather than `case X:`
    pub arrow: bool,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

impl SwitchCase {
    pub fn is_default(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    pub label: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub resources: Vec<TryResource>,
    pub try_block: Block,
    pub catch_clauses: Vec<CatchClause>,
    pub finally_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub parameter: Parameter,
    // Additional alternatives for multi-catch: catch (A | B e)
    pub alt_types: Vec<TypeRef>,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TryResource {
    Var {
        modifiers: Vec<Modifier>,
        type_ref: TypeRef,
        name: String,
        initializer: Expr,
        span: Span,
    },
    Expr {
        expr: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertStmt {
    pub condition: Expr,
    pub message: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizedStmt {
    pub lock: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStmt {
    pub label: String,
    pub statement: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldStmt {
    pub value: Expr,
    pub span: Span,
}

// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    /// Simple names, including `this` and `super`
    Identifier(IdentifierExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Assignment(AssignmentExpr),
    MethodCall(MethodCallExpr),
    /// `a.b`; class literals are `T.class` member selects as in javac
    FieldAccess(FieldAccessExpr),
    ArrayAccess(ArrayAccessExpr),
    Cast(CastExpr),
    InstanceOf(InstanceOfExpr),
    Conditional(ConditionalExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    Parenthesized(ParenExpr),
    ArrayInitializer(ArrayInitExpr),
    Lambda(LambdaExpr),
    MethodRef(MethodRefExpr),
    Switch(SwitchExpr),
    /// Nested annotation used as an annotation element value
    Annotation(Box<Annotation>),
    /// A type in expression position: type uses, primitive class-literal targets
    Type(TypeRef),
    Erroneous(ErroneousNode),
}

impl Expr {
    pub fn is_erroneous(&self) -> bool {
        matches!(self, Expr::Erroneous(_))
    }
}

impl AstNode for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Assignment(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::FieldAccess(e) => e.span,
            Expr::ArrayAccess(e) => e.span,
            Expr::Cast(e) => e.span,
            Expr::InstanceOf(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::New(e) => e.span,
            Expr::NewArray(e) => e.span,
            Expr::Parenthesized(e) => e.span,
            Expr::ArrayInitializer(e) => e.span,
            Expr::Lambda(e) => e.span,
            Expr::MethodRef(e) => e.span,
            Expr::Switch(e) => e.span,
            Expr::Annotation(a) => a.span,
            Expr::Type(t) => t.span,
            Expr::Erroneous(e) => e.span,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Identifier(_) => "identifier",
            Expr::Binary(_) => "binary expression",
            Expr::Unary(_) => "unary expression",
            Expr::Assignment(_) => "assignment",
            Expr::MethodCall(_) => "method invocation",
            Expr::FieldAccess(_) => "member select",
            Expr::ArrayAccess(_) => "array access",
            Expr::Cast(_) => "type cast",
            Expr::InstanceOf(_) => "instanceof",
            Expr::Conditional(_) => "conditional expression",
            Expr::New(_) => "new class",
            Expr::NewArray(_) => "new array",
            Expr::Parenthesized(_) => "parenthesized",
            Expr::ArrayInitializer(_) => "array initializer",
            Expr::Lambda(_) => "lambda expression",
            Expr::MethodRef(_) => "member reference",
            Expr::Switch(_) => "switch expression",
            Expr::Annotation(_) => "annotation",
            Expr::Type(_) => "type",
            Expr::Erroneous(_) => "erroneous tree",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&AstPrinter::new().print_expr(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Boolean(bool),
    Char(char),
    String(String),
    TextBlock(String),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add, Sub, Mul, Div, Mod,
    Lt, Le, Gt, Ge, Eq, Ne,
    And, Or, BitAnd, BitOr, Xor,
    LShift, RShift, URShift,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::Xor => "^",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::URShift => ">>>",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus, Minus, Not, BitNot, PreInc, PreDec, PostInc, PostDec,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }
}

#[derive(Debug, Clone, PartialEq, Copy, Eq)]
pub enum AssignmentOp {
    Assign, AddAssign, SubAssign, MulAssign, DivAssign, ModAssign,
    AndAssign, OrAssign, XorAssign, LShiftAssign, RShiftAssign, URShiftAssign,
}

impl AssignmentOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentOp::Assign => "=",
            AssignmentOp::AddAssign => "+=",
            AssignmentOp::SubAssign => "-=",
            AssignmentOp::MulAssign => "*=",
            AssignmentOp::DivAssign => "/=",
            AssignmentOp::ModAssign => "%=",
            AssignmentOp::AndAssign => "&=",
            AssignmentOp::OrAssign => "|=",
            AssignmentOp::XorAssign => "^=",
            AssignmentOp::LShiftAssign => "<<=",
            AssignmentOp::RShiftAssign => ">>=",
            AssignmentOp::URShiftAssign => ">>>=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub target: Box<Expr>,
    pub operator: AssignmentOp,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpr {
    pub target: Option<Box<Expr>>,
    pub type_args: Vec<TypeArg>,
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessExpr {
    pub target: Box<Expr>,
    pub name: String,
    pub span: Span,
}

impl FieldAccessExpr {
    pub fn is_class_literal(&self) -> bool {
        self.name == "class"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpr {
    pub target_type: TypeRef,
    /// Intersection cast bounds: `(A & B) x`
    pub extra_bounds: Vec<TypeRef>,
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceOfExpr {
    pub expr: Box<Expr>,
    pub target_type: TypeRef,
    /// Pattern variable, `x instanceof String s`
    pub binding: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    /// Qualifying instance for `outer.new Inner()`
    pub outer: Option<Box<Expr>>,
    pub target_type: TypeRef,
    pub arguments: Vec<Expr>,
    pub anonymous_body: Option<Vec<ClassMember>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArrayExpr {
    pub element_type: TypeRef,
    pub dimensions: Vec<Expr>,
    /// Trailing `[]` after the sized dimensions
    pub extra_dims: usize,
    pub initializer: Option<ArrayInitExpr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInitExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub params: Vec<LambdaParam>,
    pub body: LambdaBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParam {
    pub modifiers: Vec<Modifier>,
    /// `None` for implicitly typed parameters
    pub type_ref: Option<TypeRef>,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodRefExpr {
    pub target: Box<Expr>,
    pub type_args: Vec<TypeArg>,
    /// Method name, or `new` for constructor references
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchExpr {
    pub selector: Box<Expr>,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

impl_ast_node! {
    ClassDecl => "class",
    InterfaceDecl => "interface",
    EnumDecl => "enum",
    RecordDecl => "record",
    AnnotationDecl => "annotation type",
    PackageDecl => "package",
    ImportDecl => "import",
    ModuleDecl => "module",
    FieldDecl => "variable",
    MethodDecl => "method",
    ConstructorDecl => "constructor",
    InitializerBlock => "initializer",
    Parameter => "parameter",
    Annotation => "annotation",
    TypeRef => "type",
    TypeParam => "type parameter",
    EnumConstant => "enum constant",
    Block => "block",
}
