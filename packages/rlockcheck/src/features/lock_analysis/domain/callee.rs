//! Callee identity: the resolved, type-disambiguated target of a call

use serde::Serialize;

use crate::features::syntax::domain::{PackageId, SymbolId, TypeRef};

/// What kind of target a call resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CalleeKind {
    /// Package-level function
    Function,
    /// Concrete method
    Method,
    /// Function-typed variable or field; only closures bound to it can be followed
    Value(SymbolId),
    /// Closure literal invoked in place, identified by its start offset
    Literal { file: u32, offset: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalleeIdentity {
    /// Declaring package; `None` for closure literals
    pub package: Option<PackageId>,
    pub name: String,
    /// Declared receiver type for methods
    pub receiver: Option<TypeRef>,
    pub kind: CalleeKind,
    /// Human-readable name used in call stacks
    pub display: String,
}

impl CalleeIdentity {
    pub fn function(package: PackageId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            package: Some(package),
            display: name.clone(),
            name,
            receiver: None,
            kind: CalleeKind::Function,
        }
    }

    pub fn method(
        package: PackageId,
        name: impl Into<String>,
        receiver: TypeRef,
        receiver_name: &str,
    ) -> Self {
        let name = name.into();
        Self {
            package: Some(package),
            display: format!("{}.{}", receiver_name, name),
            name,
            receiver: Some(receiver),
            kind: CalleeKind::Method,
        }
    }

    /// Function-typed variable or field
    pub fn value(package: PackageId, name: impl Into<String>, symbol: SymbolId) -> Self {
        let name = name.into();
        Self {
            package: Some(package),
            display: name.clone(),
            name,
            receiver: None,
            kind: CalleeKind::Value(symbol),
        }
    }

    /// Closure literal called where it is written
    pub fn literal(file: u32, offset: u32, line: u32) -> Self {
        Self {
            package: None,
            name: "func".to_string(),
            receiver: None,
            kind: CalleeKind::Literal { file, offset },
            display: format!("func literal (line {})", line),
        }
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }

    /// Whether a declaration can exist for this identity
    pub fn is_declared(&self) -> bool {
        matches!(self.kind, CalleeKind::Function | CalleeKind::Method)
    }

    /// Same name and structurally identical receiver (pointer-insensitive)
    pub fn same_target(&self, other: &CalleeIdentity) -> bool {
        self.key() == other.key()
    }

    /// Stable string key used for declaration lookup and the search history
    pub fn key(&self) -> String {
        let package = self.package.map(|p| p.0).unwrap_or(u32::MAX);
        match &self.kind {
            CalleeKind::Function => format!("{}::{}", package, self.name),
            CalleeKind::Method => format!(
                "{}::{}::{}",
                package,
                self.receiver.as_ref().map(type_key).unwrap_or_default(),
                self.name
            ),
            CalleeKind::Value(symbol) => format!("value#{}::{}", symbol.0, self.name),
            CalleeKind::Literal { file, offset } => format!("literal#{}:{}", file, offset),
        }
    }
}

/// Pointer-insensitive structural key of a type
fn type_key(ty: &TypeRef) -> String {
    match ty.deref() {
        TypeRef::Named(named) => format!("{}.{}", named.package.0, named.name),
        TypeRef::Basic(name) => name.clone(),
        TypeRef::Func { .. } => "func".to_string(),
        TypeRef::Pointer(_) | TypeRef::Unknown => "?".to_string(),
    }
}
