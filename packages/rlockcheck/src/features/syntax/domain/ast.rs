//! Owned Go syntax tree
//!
//! A deliberately small model of Go: enough structure for lock analysis
//! (calls, selectors, closures, defer/return, bindings), with everything else
//! collapsed into `Compound` statements and `Other` expressions that still
//! expose their children in source order.

use serde::{Deserialize, Serialize};

use crate::shared::models::Span;

/// Index of a file within a [`Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// Program-wide unique node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub file: FileId,
    pub local: u32,
}

impl NodeId {
    pub fn new(file: FileId, local: u32) -> Self {
        Self { file, local }
    }
}

/// All files handed to the analysis
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub files: Vec<SourceFile>,
}

impl Program {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    /// Path of the file a node belongs to ("<unknown>" for foreign ids)
    pub fn path_of(&self, id: NodeId) -> &str {
        self.file(id.file).map(|f| f.path.as_str()).unwrap_or("<unknown>")
    }

    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.files.iter().flat_map(|file| {
            file.decls.iter().filter_map(|decl| match decl {
                Decl::Func(func) => Some(func),
                _ => None,
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: String,
    /// Package clause name
    pub package: String,
    /// Directory the file lives in; files of one package share it
    pub dir: String,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name (`import m "sync"`)
    pub name: Option<String>,
    pub path: String,
}

impl ImportSpec {
    /// Name the import is referred to by inside the file
    pub fn local_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.path.rsplit('/').next().unwrap_or(&self.path),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Decl {
    Func(FuncDecl),
    Var(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// Function or method declaration
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub id: NodeId,
    pub name: Ident,
    pub receiver: Option<Receiver>,
    pub params: Vec<Param>,
    pub result: Option<TypeExpr>,
    pub body: Option<Block>,
    pub span: Span,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }

    /// Parameter names in declaration order (unnamed parameters yield `None`)
    pub fn param_idents(&self) -> Vec<Option<&Ident>> {
        flatten_params(&self.params)
    }
}

pub(crate) fn flatten_params(params: &[Param]) -> Vec<Option<&Ident>> {
    let mut out = Vec::new();
    for param in params {
        if param.names.is_empty() {
            out.push(None);
        } else {
            out.extend(param.names.iter().map(Some));
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct Receiver {
    pub name: Option<Ident>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub variadic: bool,
}

/// Syntactic type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `T` or a predeclared type
    Name(String),
    /// `pkg.T`
    Qualified { package: String, name: String },
    Pointer(Box<TypeExpr>),
    Func { result: Option<Box<TypeExpr>> },
    /// Anything else (slices, maps, channels, anonymous structs, ...)
    Other,
}

impl TypeExpr {
    pub fn strip_pointer(&self) -> &TypeExpr {
        match self {
            TypeExpr::Pointer(inner) => inner.strip_pointer(),
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: Ident,
    pub kind: TypeSpecKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeSpecKind {
    Struct(Vec<FieldDecl>),
    Interface(Vec<Ident>),
    Other(TypeExpr),
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Empty for an embedded field
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Defer(DeferStmt),
    Go(GoStmt),
    Return(ReturnStmt),
    Assign(AssignStmt),
    Var(ValueSpec),
    Block(Block),
    /// if/for/switch/select/labeled statements: children in source order,
    /// opening a scope of their own
    Compound(CompoundStmt),
}

#[derive(Debug, Clone)]
pub struct DeferStmt {
    pub call: CallExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct GoStmt {
    pub call: CallExpr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
    pub span: Span,
}

/// `lhs = rhs`, `lhs := rhs`, or a `range` clause with bindings
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub id: NodeId,
    pub lhs: Vec<Expr>,
    pub rhs: Vec<Expr>,
    /// `:=` (declares new variables)
    pub define: bool,
    pub span: Span,
}

/// `var a, b T = x, y` (package level or local)
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub id: NodeId,
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CompoundStmt {
    pub kind: String,
    pub children: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    Selector(Box<SelectorExpr>),
    Call(Box<CallExpr>),
    FuncLit(Box<FuncLit>),
    Paren(Box<ParenExpr>),
    Unary(Box<UnaryExpr>),
    Composite(Box<CompositeLit>),
    Other(OtherExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(ident) => ident.span,
            Expr::Selector(sel) => sel.span,
            Expr::Call(call) => call.span,
            Expr::FuncLit(lit) => lit.span,
            Expr::Paren(paren) => paren.span,
            Expr::Unary(unary) => unary.span,
            Expr::Composite(lit) => lit.span,
            Expr::Other(other) => other.span,
        }
    }

    /// Strip any number of enclosing parentheses
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.inner.unparen(),
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectorExpr {
    pub id: NodeId,
    pub base: Expr,
    pub sel: Ident,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub id: NodeId,
    pub fun: Expr,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FuncLit {
    pub id: NodeId,
    pub params: Vec<Param>,
    pub result: Option<TypeExpr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub inner: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: String,
    pub operand: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CompositeLit {
    pub ty: TypeExpr,
    pub elems: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct OtherExpr {
    pub kind: String,
    pub children: Vec<Expr>,
    pub span: Span,
}
