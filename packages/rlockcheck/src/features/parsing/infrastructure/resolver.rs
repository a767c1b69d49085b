//! Name and type resolution
//!
//! Builds [`TypeInfo`] for a lowered program in fixed passes:
//!
//! 1. packages (grouped by directory + package clause) and imports
//! 2. package-level names: types, functions, variables
//! 3. struct fields, interface methods, named underlying types
//! 4. methods and function signatures
//! 5. package variable initializers
//! 6. function bodies, with lexical scopes and shadowing
//!
//! Type inference is deliberately shallow: identifiers, selectors, single
//! result calls, `&x`, composite literals, `new(T)`, conversions and type
//! assertions. Anything else is `TypeRef::Unknown`, which makes dependent
//! selections unresolved.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::builtins::{install_sync, install_universe};
use crate::features::syntax::domain::{
    Block, CallExpr, Decl, Expr, FieldDecl, FieldInfo, FileId, Ident, NamedRef, NamedType,
    NodeId, PackageId, PackageInfo, Param, Program, SelectorExpr, SourceFile, Stmt, Symbol,
    SymbolId, SymbolKind, TypeExpr, TypeInfo, TypeRef, TypeSpecKind, Underlying, ValueSpec,
    VarScope,
};
use crate::shared::ScopeStack;

/// Resolve every file of `program`
pub fn resolve_program(program: &Program) -> TypeInfo {
    let mut resolver = Resolver::new(program);
    resolver.run();
    resolver.info
}

struct Resolver<'p> {
    program: &'p Program,
    info: TypeInfo,
    universe: PackageId,
    sync: PackageId,
    externals: FxHashMap<String, PackageId>,
    file_packages: FxHashMap<FileId, PackageId>,
    file_imports: FxHashMap<FileId, FxHashMap<String, SymbolId>>,
    scopes: ScopeStack<SymbolId>,
    file: FileId,
    package: PackageId,
}

impl<'p> Resolver<'p> {
    fn new(program: &'p Program) -> Self {
        let mut info = TypeInfo::new();
        let universe = install_universe(&mut info);
        let sync = install_sync(&mut info);
        Self {
            program,
            info,
            universe,
            sync,
            externals: FxHashMap::default(),
            file_packages: FxHashMap::default(),
            file_imports: FxHashMap::default(),
            scopes: ScopeStack::new(),
            file: FileId(0),
            package: universe,
        }
    }

    fn run(&mut self) {
        let program = self.program;
        self.declare_packages();
        self.declare_imports();

        for file in &program.files {
            self.enter_file(file);
            self.declare_members(file);
        }
        for file in &program.files {
            self.enter_file(file);
            self.complete_types(file);
        }
        for file in &program.files {
            self.enter_file(file);
            self.declare_signatures(file);
        }
        for file in &program.files {
            self.enter_file(file);
            self.resolve_package_vars(file);
        }
        for file in &program.files {
            self.enter_file(file);
            self.resolve_bodies(file);
        }
        debug!(
            files = program.files.len(),
            symbols = self.info.symbol_count(),
            "resolved program"
        );
    }

    fn enter_file(&mut self, file: &SourceFile) {
        self.file = file.id;
        self.package = self
            .file_packages
            .get(&file.id)
            .copied()
            .unwrap_or(self.universe);
        self.scopes.clear();
    }

    // ═══════════════════════════════════════════════════════════════════
    // Packages and imports
    // ═══════════════════════════════════════════════════════════════════

    fn declare_packages(&mut self) {
        let mut by_key: FxHashMap<(String, String), PackageId> = FxHashMap::default();
        for file in &self.program.files {
            let key = (file.dir.clone(), file.package.clone());
            let id = match by_key.get(&key) {
                Some(id) => *id,
                None => {
                    let id = self.info.add_package(PackageInfo {
                        name: file.package.clone(),
                        path: file.dir.clone(),
                        scope: FxHashMap::default(),
                        external: false,
                    });
                    by_key.insert(key, id);
                    id
                }
            };
            self.file_packages.insert(file.id, id);
        }
    }

    fn declare_imports(&mut self) {
        let program = self.program;
        for file in &program.files {
            let own = self.file_packages.get(&file.id).copied();
            let mut imports = FxHashMap::default();
            for spec in &file.imports {
                let local = spec.local_name();
                if local == "_" || local == "." {
                    continue;
                }
                let target = self.import_target(&spec.path, own);
                let symbol = self.info.add_symbol(Symbol {
                    name: local.to_string(),
                    kind: SymbolKind::Package(target),
                    package: own.unwrap_or(self.universe),
                    ty: TypeRef::Unknown,
                    decl: None,
                });
                imports.insert(local.to_string(), symbol);
            }
            self.file_imports.insert(file.id, imports);
        }
    }

    /// Source package named like the last path segment, the `sync` stub, or
    /// an opaque external package
    fn import_target(&mut self, path: &str, own: Option<PackageId>) -> PackageId {
        if path == "sync" {
            return self.sync;
        }
        let last = path.rsplit('/').next().unwrap_or(path);
        let source = self
            .info
            .packages()
            .find(|(id, p)| {
                !p.external && p.name == last && Some(*id) != own && *id != self.universe
            })
            .map(|(id, _)| id);
        if let Some(id) = source {
            if id != self.sync {
                return id;
            }
        }
        if let Some(id) = self.externals.get(path) {
            return *id;
        }
        trace!(path, "import resolved to external package");
        let id = self.info.add_package(PackageInfo {
            name: last.to_string(),
            path: path.to_string(),
            scope: FxHashMap::default(),
            external: true,
        });
        self.externals.insert(path.to_string(), id);
        id
    }

    // ═══════════════════════════════════════════════════════════════════
    // Package-level declarations
    // ═══════════════════════════════════════════════════════════════════

    fn declare_members(&mut self, file: &SourceFile) {
        let package = self.package;
        for decl in &file.decls {
            match decl {
                Decl::Type(spec) => {
                    if spec.name.name.is_empty() {
                        continue;
                    }
                    let ty = TypeRef::named(package, spec.name.name.clone());
                    let id = self.info.declare(
                        package,
                        Symbol {
                            name: spec.name.name.clone(),
                            kind: SymbolKind::TypeName,
                            package,
                            ty,
                            decl: None,
                        },
                    );
                    self.info.record_use(spec.name.id, id);
                    self.info.insert_named(
                        NamedRef {
                            package,
                            name: spec.name.name.clone(),
                        },
                        NamedType::new(Underlying::Other(TypeRef::Unknown)),
                    );
                }
                Decl::Func(func) if !func.is_method() => {
                    let id = self.info.declare(
                        package,
                        Symbol {
                            name: func.name.name.clone(),
                            kind: SymbolKind::Func,
                            package,
                            ty: TypeRef::Func { result: None },
                            decl: None,
                        },
                    );
                    self.info.record_use(func.name.id, id);
                }
                Decl::Func(_) => {}
                Decl::Var(spec) => {
                    for name in spec.names.iter().filter(|n| !n.is_blank()) {
                        let id = self.info.declare(
                            package,
                            Symbol {
                                name: name.name.clone(),
                                kind: SymbolKind::Var(VarScope::Package),
                                package,
                                ty: TypeRef::Unknown,
                                decl: Some(spec.id),
                            },
                        );
                        self.info.record_use(name.id, id);
                    }
                }
            }
        }
    }

    fn complete_types(&mut self, file: &SourceFile) {
        let package = self.package;
        for decl in &file.decls {
            let Decl::Type(spec) = decl else { continue };
            let named = NamedRef {
                package,
                name: spec.name.name.clone(),
            };
            let underlying = match &spec.kind {
                TypeSpecKind::Struct(fields) => Underlying::Struct(self.struct_fields(fields)),
                TypeSpecKind::Interface(methods) => {
                    let interface = TypeRef::Named(named.clone());
                    let mut set = FxHashMap::default();
                    for method in methods {
                        let id = self.info.add_symbol(Symbol {
                            name: method.name.clone(),
                            kind: SymbolKind::InterfaceMethod {
                                interface: interface.clone(),
                            },
                            package,
                            ty: TypeRef::Func { result: None },
                            decl: None,
                        });
                        self.info.record_use(method.id, id);
                        set.insert(method.name.clone(), id);
                    }
                    Underlying::Interface(set)
                }
                TypeSpecKind::Other(expr) => Underlying::Other(self.resolve_type(expr)),
            };
            if let Some(entry) = self.info.named_mut(&named) {
                entry.underlying = underlying;
            }
        }
    }

    fn struct_fields(&mut self, fields: &[FieldDecl]) -> Vec<FieldInfo> {
        let package = self.package;
        let mut out = Vec::new();
        for field in fields {
            let ty = self.resolve_type(&field.ty);
            if field.is_embedded() {
                let name = match field.ty.strip_pointer() {
                    TypeExpr::Name(name) => name.clone(),
                    TypeExpr::Qualified { name, .. } => name.clone(),
                    _ => continue,
                };
                let symbol = self.info.add_symbol(Symbol {
                    name: name.clone(),
                    kind: SymbolKind::Field,
                    package,
                    ty: ty.clone(),
                    decl: None,
                });
                out.push(FieldInfo {
                    name,
                    symbol,
                    ty,
                    embedded: true,
                });
                continue;
            }
            for ident in &field.names {
                let symbol = self.info.add_symbol(Symbol {
                    name: ident.name.clone(),
                    kind: SymbolKind::Field,
                    package,
                    ty: ty.clone(),
                    decl: None,
                });
                self.info.record_use(ident.id, symbol);
                out.push(FieldInfo {
                    name: ident.name.clone(),
                    symbol,
                    ty: ty.clone(),
                    embedded: false,
                });
            }
        }
        out
    }

    fn declare_signatures(&mut self, file: &SourceFile) {
        let package = self.package;
        for decl in &file.decls {
            let Decl::Func(func) = decl else { continue };
            let result = func.result.as_ref().map(|r| Box::new(self.resolve_type(r)));
            let ty = TypeRef::Func { result };

            let Some(receiver) = &func.receiver else {
                if let Some(id) = self.info.symbol_of_node(func.name.id) {
                    if let Some(symbol) = self.info.symbol_mut(id) {
                        symbol.ty = ty;
                    }
                }
                continue;
            };

            let receiver_ty = self.resolve_type(&receiver.ty);
            self.info.record_receiver(func.id, receiver_ty.clone());
            let id = self.info.add_symbol(Symbol {
                name: func.name.name.clone(),
                kind: SymbolKind::Method {
                    receiver: receiver_ty.clone(),
                },
                package,
                ty,
                decl: None,
            });
            self.info.record_use(func.name.id, id);
            if let Some(named) = receiver_ty.as_named().cloned() {
                if let Some(entry) = self.info.named_mut(&named) {
                    entry.methods.insert(func.name.name.clone(), id);
                }
            }
        }
    }

    fn resolve_package_vars(&mut self, file: &SourceFile) {
        for decl in &file.decls {
            if let Decl::Var(spec) = decl {
                let types = self.value_spec_types(spec);
                for (name, ty) in spec.names.iter().zip(types) {
                    if let Some(id) = self.info.symbol_of_node(name.id) {
                        if let Some(symbol) = self.info.symbol_mut(id) {
                            symbol.ty = ty;
                        }
                    }
                }
            }
        }
    }

    /// Resolve a spec's values and return one type per declared name
    fn value_spec_types(&mut self, spec: &ValueSpec) -> Vec<TypeRef> {
        let declared = spec.ty.as_ref().map(|t| self.resolve_type(t));
        let values: Vec<TypeRef> = spec.values.iter().map(|v| self.resolve_expr(v)).collect();
        (0..spec.names.len())
            .map(|i| match &declared {
                Some(ty) => ty.clone(),
                None if values.len() == spec.names.len() => values[i].clone(),
                None => TypeRef::Unknown,
            })
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Function bodies
    // ═══════════════════════════════════════════════════════════════════

    fn resolve_bodies(&mut self, file: &SourceFile) {
        for decl in &file.decls {
            let Decl::Func(func) = decl else { continue };
            let Some(body) = &func.body else { continue };

            self.scopes.push();
            if let Some(receiver) = &func.receiver {
                if let Some(name) = &receiver.name {
                    let ty = self
                        .info
                        .receiver_of(func.id)
                        .cloned()
                        .unwrap_or(TypeRef::Unknown);
                    self.declare_local(name, VarScope::Receiver, ty, None);
                }
            }
            self.declare_params(&func.params);
            for stmt in &body.stmts {
                self.resolve_stmt(stmt);
            }
            self.scopes.pop();
        }
    }

    fn declare_local(
        &mut self,
        ident: &Ident,
        scope: VarScope,
        ty: TypeRef,
        decl: Option<NodeId>,
    ) -> Option<SymbolId> {
        if ident.is_blank() {
            return None;
        }
        let id = self.info.add_symbol(Symbol {
            name: ident.name.clone(),
            kind: SymbolKind::Var(scope),
            package: self.package,
            ty,
            decl,
        });
        self.scopes.declare(ident.name.clone(), id);
        self.info.record_use(ident.id, id);
        Some(id)
    }

    fn declare_params(&mut self, params: &[Param]) {
        for param in params {
            let ty = if param.variadic {
                TypeRef::Unknown
            } else {
                self.resolve_type(&param.ty)
            };
            for name in &param.names {
                self.declare_local(name, VarScope::Param, ty.clone(), None);
            }
        }
    }

    fn resolve_block(&mut self, block: &Block) {
        self.scopes.push();
        for stmt in &block.stmts {
            self.resolve_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                self.resolve_expr(expr);
            }
            Stmt::Defer(defer) => {
                self.resolve_call(&defer.call);
            }
            Stmt::Go(go) => {
                self.resolve_call(&go.call);
            }
            Stmt::Return(ret) => {
                for expr in &ret.results {
                    self.resolve_expr(expr);
                }
            }
            Stmt::Assign(assign) => {
                let types: Vec<TypeRef> = assign.rhs.iter().map(|e| self.resolve_expr(e)).collect();
                let balanced = assign.lhs.len() == assign.rhs.len();
                for (i, lhs) in assign.lhs.iter().enumerate() {
                    match lhs.unparen() {
                        Expr::Ident(ident) if assign.define && !ident.is_blank() => {
                            if let Some(existing) = self.scopes.lookup_local(&ident.name) {
                                self.info.record_use(ident.id, existing);
                                continue;
                            }
                            let ty = if balanced {
                                types[i].clone()
                            } else {
                                TypeRef::Unknown
                            };
                            self.declare_local(ident, VarScope::Local, ty, Some(assign.id));
                        }
                        other => {
                            self.resolve_expr(other);
                        }
                    }
                }
            }
            Stmt::Var(spec) => {
                let types = self.value_spec_types(spec);
                for (name, ty) in spec.names.iter().zip(types) {
                    self.declare_local(name, VarScope::Local, ty, Some(spec.id));
                }
            }
            Stmt::Block(block) => self.resolve_block(block),
            Stmt::Compound(compound) => {
                self.scopes.push();
                for child in &compound.children {
                    self.resolve_stmt(child);
                }
                self.scopes.pop();
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    /// Local scopes, then package scope, then file imports, then universe
    fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .lookup(name)
            .or_else(|| self.info.lookup(self.package, name))
            .or_else(|| {
                self.file_imports
                    .get(&self.file)
                    .and_then(|imports| imports.get(name).copied())
            })
            .or_else(|| self.info.lookup(self.universe, name))
    }

    fn symbol_type(&self, id: SymbolId) -> TypeRef {
        self.info
            .symbol(id)
            .map(|s| s.ty.clone())
            .unwrap_or(TypeRef::Unknown)
    }

    fn resolve_expr(&mut self, expr: &Expr) -> TypeRef {
        match expr {
            Expr::Ident(ident) => match self.lookup(&ident.name) {
                Some(id) => {
                    self.info.record_use(ident.id, id);
                    self.symbol_type(id)
                }
                None => TypeRef::Unknown,
            },
            Expr::Selector(sel) => self.resolve_selector(sel),
            Expr::Call(call) => self.resolve_call(call),
            Expr::FuncLit(lit) => {
                self.scopes.push();
                self.declare_params(&lit.params);
                for stmt in &lit.body.stmts {
                    self.resolve_stmt(stmt);
                }
                self.scopes.pop();
                TypeRef::Func {
                    result: lit.result.as_ref().map(|r| Box::new(self.resolve_type(r))),
                }
            }
            Expr::Paren(paren) => self.resolve_expr(&paren.inner),
            Expr::Unary(unary) => {
                let ty = self.resolve_expr(&unary.operand);
                match unary.op.as_str() {
                    "&" if !ty.is_unknown() => TypeRef::pointer_to(ty),
                    "*" => match ty {
                        TypeRef::Pointer(inner) => *inner,
                        _ => TypeRef::Unknown,
                    },
                    "&" | "<-" => TypeRef::Unknown,
                    _ => ty,
                }
            }
            Expr::Composite(lit) => {
                for elem in &lit.elems {
                    self.resolve_expr(elem);
                }
                self.resolve_type(&lit.ty)
            }
            Expr::Other(other) => {
                for child in &other.children {
                    self.resolve_expr(child);
                }
                match (other.kind.as_str(), other.children.last()) {
                    ("type_assertion_expression", Some(ty)) => {
                        self.type_operand(ty).unwrap_or(TypeRef::Unknown)
                    }
                    _ => TypeRef::Unknown,
                }
            }
        }
    }

    fn resolve_selector(&mut self, sel: &SelectorExpr) -> TypeRef {
        if let Expr::Ident(base) = sel.base.unparen() {
            if let Some(id) = self.lookup(&base.name) {
                if let Some(SymbolKind::Package(package)) = self.info.symbol(id).map(|s| &s.kind) {
                    let package = *package;
                    self.info.record_use(base.id, id);
                    return match self.info.lookup(package, &sel.sel.name) {
                        Some(member) => {
                            self.record_selection(sel, member);
                            self.symbol_type(member)
                        }
                        None => TypeRef::Unknown,
                    };
                }
            }
        }

        let base_ty = self.resolve_expr(&sel.base);
        match self.lookup_member(&base_ty, &sel.sel.name) {
            Some(member) => {
                self.record_selection(sel, member);
                self.symbol_type(member)
            }
            None => {
                trace!(member = %sel.sel.name, "unresolved selector");
                TypeRef::Unknown
            }
        }
    }

    fn record_selection(&mut self, sel: &SelectorExpr, member: SymbolId) {
        self.info.record_selection(sel.id, member);
        self.info.record_use(sel.sel.id, member);
    }

    /// Field or method of a named type, searching embedded fields breadth-first
    fn lookup_member(&self, ty: &TypeRef, name: &str) -> Option<SymbolId> {
        let mut queue: VecDeque<NamedRef> = ty.as_named().cloned().into_iter().collect();
        let mut seen: FxHashSet<NamedRef> = FxHashSet::default();

        while let Some(named) = queue.pop_front() {
            if !seen.insert(named.clone()) {
                continue;
            }
            let Some(entry) = self.info.named_type(&named) else {
                continue;
            };
            if let Some(method) = entry.methods.get(name) {
                return Some(*method);
            }
            match &entry.underlying {
                Underlying::Struct(fields) => {
                    if let Some(field) = fields.iter().find(|f| f.name == name) {
                        return Some(field.symbol);
                    }
                    queue.extend(
                        fields
                            .iter()
                            .filter(|f| f.embedded)
                            .filter_map(|f| f.ty.as_named().cloned()),
                    );
                }
                Underlying::Interface(methods) => {
                    if let Some(method) = methods.get(name) {
                        return Some(*method);
                    }
                }
                Underlying::Other(_) => {}
            }
        }
        None
    }

    fn resolve_call(&mut self, call: &CallExpr) -> TypeRef {
        let fun_ty = self.resolve_expr(&call.fun);
        for arg in &call.args {
            self.resolve_expr(arg);
        }

        // Conversion `T(x)`
        if let Some(ty) = self.type_operand(&call.fun) {
            return ty;
        }

        if let Expr::Ident(ident) = call.fun.unparen() {
            let builtin = self
                .info
                .symbol_of_node(ident.id)
                .and_then(|id| self.info.symbol(id))
                .is_some_and(|s| s.kind == SymbolKind::Builtin && s.name == "new");
            if builtin {
                return call
                    .args
                    .first()
                    .and_then(|arg| self.type_operand(arg))
                    .map(TypeRef::pointer_to)
                    .unwrap_or(TypeRef::Unknown);
            }
        }

        match fun_ty {
            TypeRef::Func {
                result: Some(result),
            } => *result,
            _ => TypeRef::Unknown,
        }
    }

    /// The type denoted by an expression used in type position
    fn type_operand(&self, expr: &Expr) -> Option<TypeRef> {
        let type_of = |id: SymbolId| {
            self.info
                .symbol(id)
                .filter(|s| s.kind == SymbolKind::TypeName)
                .map(|s| s.ty.clone())
        };
        match expr.unparen() {
            Expr::Ident(ident) => self.lookup(&ident.name).and_then(type_of),
            Expr::Selector(sel) => self.info.selection_of_node(sel.id).and_then(type_of),
            Expr::Unary(unary) if unary.op == "*" => {
                self.type_operand(&unary.operand).map(TypeRef::pointer_to)
            }
            Expr::Other(other) if other.kind == "pointer_type" => other
                .children
                .first()
                .and_then(|inner| self.type_operand(inner))
                .map(TypeRef::pointer_to),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type expressions
    // ═══════════════════════════════════════════════════════════════════

    fn resolve_type(&self, expr: &TypeExpr) -> TypeRef {
        match expr {
            TypeExpr::Name(name) => self
                .info
                .lookup(self.package, name)
                .or_else(|| self.info.lookup(self.universe, name))
                .and_then(|id| self.info.symbol(id))
                .filter(|s| s.kind == SymbolKind::TypeName)
                .map(|s| s.ty.clone())
                .unwrap_or(TypeRef::Unknown),
            TypeExpr::Qualified { package, name } => self
                .file_imports
                .get(&self.file)
                .and_then(|imports| imports.get(package))
                .and_then(|id| match self.info.symbol(*id).map(|s| &s.kind) {
                    Some(SymbolKind::Package(target)) => self.info.lookup(*target, name),
                    _ => None,
                })
                .and_then(|id| self.info.symbol(id))
                .filter(|s| s.kind == SymbolKind::TypeName)
                .map(|s| s.ty.clone())
                .unwrap_or(TypeRef::Unknown),
            TypeExpr::Pointer(inner) => match self.resolve_type(inner) {
                TypeRef::Unknown => TypeRef::Unknown,
                ty => TypeRef::pointer_to(ty),
            },
            TypeExpr::Func { result } => TypeRef::Func {
                result: result.as_ref().map(|r| Box::new(self.resolve_type(r))),
            },
            TypeExpr::Other => TypeRef::Unknown,
        }
    }
}
