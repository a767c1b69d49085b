//! Symbol-resolution port consumed by lock analysis

use crate::features::syntax::domain::{
    FuncDecl, Ident, PackageId, SelectorExpr, Symbol, SymbolId, TypeInfo, TypeRef,
};

/// Port trait for type/symbol oracles
///
/// Answers "which declared entity does this name denote" for identifiers and
/// selectors. Analysis code never compares names directly.
pub trait TypeOracle {
    /// Symbol an identifier defines or uses
    fn object_of(&self, ident: &Ident) -> Option<SymbolId>;

    /// Field, method, or package member a selector selects
    fn selection(&self, sel: &SelectorExpr) -> Option<SymbolId>;

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    /// Receiver type of a method declaration (`None` for free functions)
    fn receiver_type(&self, decl: &FuncDecl) -> Option<&TypeRef>;

    fn is_interface(&self, ty: &TypeRef) -> bool;

    fn type_string(&self, ty: &TypeRef) -> String;

    fn package_name(&self, id: PackageId) -> &str;
}

impl TypeOracle for TypeInfo {
    fn object_of(&self, ident: &Ident) -> Option<SymbolId> {
        self.symbol_of_node(ident.id)
    }

    fn selection(&self, sel: &SelectorExpr) -> Option<SymbolId> {
        self.selection_of_node(sel.id)
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        TypeInfo::symbol(self, id)
    }

    fn receiver_type(&self, decl: &FuncDecl) -> Option<&TypeRef> {
        self.receiver_of(decl.id)
    }

    fn is_interface(&self, ty: &TypeRef) -> bool {
        TypeInfo::is_interface(self, ty)
    }

    fn type_string(&self, ty: &TypeRef) -> String {
        TypeInfo::type_string(self, ty)
    }

    fn package_name(&self, id: PackageId) -> &str {
        self.package(id).map(|p| p.name.as_str()).unwrap_or("")
    }
}
