//! Symbol and type tables produced by the front end
//!
//! Mirrors what a Go type checker records: which declared entity every
//! identifier and selector refers to, the type of every declared entity, and
//! the receiver type of every method. Symbols are compared by id, never by
//! name, so shadowed and same-named entities stay distinct.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ast::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(pub u32);

/// Where a variable lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarScope {
    Package,
    Local,
    Param,
    Receiver,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Var(VarScope),
    Field,
    Func,
    /// Concrete method; `receiver` is the declared receiver type
    Method { receiver: TypeRef },
    /// Method declared by an interface type (dynamic dispatch)
    InterfaceMethod { interface: TypeRef },
    Builtin,
    TypeName,
    /// Imported package name
    Package(PackageId),
}

/// A declared entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Package the entity is declared in
    pub package: PackageId,
    pub ty: TypeRef,
    /// Declaring `AssignStmt`/`ValueSpec` for variables
    pub decl: Option<NodeId>,
}

impl Symbol {
    pub fn is_package_var(&self) -> bool {
        matches!(self.kind, SymbolKind::Var(VarScope::Package))
    }

    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(|c| c.is_uppercase())
    }
}

/// Named type identity: package plus name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedRef {
    pub package: PackageId,
    pub name: String,
}

/// Resolved (structural) type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Named(NamedRef),
    Pointer(Box<TypeRef>),
    /// Function value; `result` is set for single-result signatures
    Func { result: Option<Box<TypeRef>> },
    Basic(String),
    Unknown,
}

impl TypeRef {
    pub fn named(package: PackageId, name: impl Into<String>) -> Self {
        TypeRef::Named(NamedRef {
            package,
            name: name.into(),
        })
    }

    pub fn pointer_to(inner: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(inner))
    }

    /// The type with every pointer layer removed
    pub fn deref(&self) -> &TypeRef {
        match self {
            TypeRef::Pointer(inner) => inner.deref(),
            other => other,
        }
    }

    pub fn as_named(&self) -> Option<&NamedRef> {
        match self.deref() {
            TypeRef::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeRef::Unknown)
    }

    /// Identical once the pointer/value distinction is ignored
    pub fn same_base(&self, other: &TypeRef) -> bool {
        !self.deref().is_unknown() && self.deref() == other.deref()
    }
}

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub symbol: SymbolId,
    pub ty: TypeRef,
    pub embedded: bool,
}

#[derive(Debug, Clone)]
pub enum Underlying {
    Struct(Vec<FieldInfo>),
    Interface(FxHashMap<String, SymbolId>),
    Other(TypeRef),
}

/// A declared named type and its method set
#[derive(Debug, Clone)]
pub struct NamedType {
    pub underlying: Underlying,
    pub methods: FxHashMap<String, SymbolId>,
}

impl NamedType {
    pub fn new(underlying: Underlying) -> Self {
        Self {
            underlying,
            methods: FxHashMap::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackageInfo {
    pub name: String,
    /// Directory for source packages, import path for stubs/externals
    pub path: String,
    /// Package-level scope
    pub scope: FxHashMap<String, SymbolId>,
    /// Imported package we have no source for; members never resolve
    pub external: bool,
}

/// Everything the front end learned about the program
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    pub(crate) packages: Vec<PackageInfo>,
    pub(crate) symbols: Vec<Symbol>,
    /// Identifier (definition or use) → symbol
    pub(crate) uses: FxHashMap<NodeId, SymbolId>,
    /// Selector expression → selected field/method/package member
    pub(crate) selections: FxHashMap<NodeId, SymbolId>,
    /// Method declaration → receiver type
    pub(crate) receivers: FxHashMap<NodeId, TypeRef>,
    pub(crate) named: FxHashMap<NamedRef, NamedType>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────────── queries ─────────────────────────────

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn symbol_of_node(&self, id: NodeId) -> Option<SymbolId> {
        self.uses.get(&id).copied()
    }

    pub fn selection_of_node(&self, id: NodeId) -> Option<SymbolId> {
        self.selections.get(&id).copied()
    }

    pub fn receiver_of(&self, decl: NodeId) -> Option<&TypeRef> {
        self.receivers.get(&decl)
    }

    pub fn package(&self, id: PackageId) -> Option<&PackageInfo> {
        self.packages.get(id.0 as usize)
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &PackageInfo)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, p)| (PackageId(i as u32), p))
    }

    /// Package by name (first match; names are not unique across directories)
    pub fn package_named(&self, name: &str) -> Option<PackageId> {
        self.packages()
            .find(|(_, p)| p.name == name && !p.external)
            .map(|(id, _)| id)
    }

    /// Package-level member lookup
    pub fn lookup(&self, package: PackageId, name: &str) -> Option<SymbolId> {
        self.package(package)?.scope.get(name).copied()
    }

    pub fn named_type(&self, named: &NamedRef) -> Option<&NamedType> {
        self.named.get(named)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_interface(&self, ty: &TypeRef) -> bool {
        ty.as_named()
            .and_then(|named| self.named.get(named))
            .is_some_and(|t| matches!(t.underlying, Underlying::Interface(_)))
    }

    pub fn type_string(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named(named) => {
                let pkg = self
                    .package(named.package)
                    .map(|p| p.name.as_str())
                    .unwrap_or("?");
                if pkg.is_empty() {
                    named.name.clone()
                } else {
                    format!("{}.{}", pkg, named.name)
                }
            }
            TypeRef::Pointer(inner) => format!("*{}", self.type_string(inner)),
            TypeRef::Func { .. } => "func".to_string(),
            TypeRef::Basic(name) => name.clone(),
            TypeRef::Unknown => "?".to_string(),
        }
    }

    // ───────────────────────────── building ─────────────────────────────

    pub(crate) fn add_package(&mut self, info: PackageInfo) -> PackageId {
        self.packages.push(info);
        PackageId(self.packages.len() as u32 - 1)
    }

    pub(crate) fn package_mut(&mut self, id: PackageId) -> Option<&mut PackageInfo> {
        self.packages.get_mut(id.0 as usize)
    }

    pub(crate) fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId(self.symbols.len() as u32 - 1)
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    /// Declare a package-level member
    pub(crate) fn declare(&mut self, package: PackageId, symbol: Symbol) -> SymbolId {
        let name = symbol.name.clone();
        let id = self.add_symbol(symbol);
        if let Some(pkg) = self.package_mut(package) {
            pkg.scope.insert(name, id);
        }
        id
    }

    pub(crate) fn record_use(&mut self, node: NodeId, symbol: SymbolId) {
        self.uses.insert(node, symbol);
    }

    pub(crate) fn record_selection(&mut self, node: NodeId, symbol: SymbolId) {
        self.selections.insert(node, symbol);
    }

    pub(crate) fn record_receiver(&mut self, decl: NodeId, ty: TypeRef) {
        self.receivers.insert(decl, ty);
    }

    pub(crate) fn named_mut(&mut self, named: &NamedRef) -> Option<&mut NamedType> {
        self.named.get_mut(named)
    }

    pub(crate) fn insert_named(&mut self, named: NamedRef, ty: NamedType) {
        self.named.insert(named, ty);
    }
}
