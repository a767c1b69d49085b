//! Predeclared identifiers and the `sync` package stub

use rustc_hash::FxHashMap;

use crate::features::syntax::domain::{
    NamedRef, NamedType, PackageId, PackageInfo, Symbol, SymbolKind, TypeInfo, TypeRef,
    Underlying,
};

const BUILTIN_FUNCS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

const BASIC_TYPES: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr",
];

const CONSTANTS: &[&str] = &["true", "false", "iota", "nil"];

/// Methods of the stubbed `sync` types: (type, [(method, result type)])
const SYNC_TYPES: &[(&str, &[(&str, Option<&str>)])] = &[
    (
        "Mutex",
        &[("Lock", None), ("Unlock", None), ("TryLock", Some("bool"))],
    ),
    (
        "RWMutex",
        &[
            ("Lock", None),
            ("Unlock", None),
            ("RLock", None),
            ("RUnlock", None),
            ("TryLock", Some("bool")),
            ("TryRLock", Some("bool")),
            ("RLocker", Some("Locker")),
        ],
    ),
    ("WaitGroup", &[("Add", None), ("Done", None), ("Wait", None)]),
    ("Once", &[("Do", None)]),
];

/// Universe scope: builtin functions, predeclared types and constants
pub(crate) fn install_universe(info: &mut TypeInfo) -> PackageId {
    let universe = info.add_package(PackageInfo {
        name: String::new(),
        path: String::new(),
        scope: FxHashMap::default(),
        external: false,
    });

    for name in BUILTIN_FUNCS {
        info.declare(
            universe,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::Builtin,
                package: universe,
                ty: TypeRef::Func { result: None },
                decl: None,
            },
        );
    }
    for name in BASIC_TYPES {
        info.declare(
            universe,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::TypeName,
                package: universe,
                ty: TypeRef::Basic(name.to_string()),
                decl: None,
            },
        );
    }
    for name in CONSTANTS {
        let ty = match *name {
            "nil" => TypeRef::Unknown,
            "iota" => TypeRef::Basic("int".to_string()),
            _ => TypeRef::Basic("bool".to_string()),
        };
        info.declare(
            universe,
            Symbol {
                name: name.to_string(),
                kind: SymbolKind::Builtin,
                package: universe,
                ty,
                decl: None,
            },
        );
    }
    universe
}

/// The parts of package `sync` lock analysis cares about
pub(crate) fn install_sync(info: &mut TypeInfo) -> PackageId {
    let sync = info.add_package(PackageInfo {
        name: "sync".to_string(),
        path: "sync".to_string(),
        scope: FxHashMap::default(),
        external: false,
    });

    let locker = TypeRef::named(sync, "Locker");
    let mut locker_methods = FxHashMap::default();
    for method in ["Lock", "Unlock"] {
        let id = info.add_symbol(Symbol {
            name: method.to_string(),
            kind: SymbolKind::InterfaceMethod {
                interface: locker.clone(),
            },
            package: sync,
            ty: TypeRef::Func { result: None },
            decl: None,
        });
        locker_methods.insert(method.to_string(), id);
    }
    declare_type(info, sync, "Locker");
    info.insert_named(
        named_ref(sync, "Locker"),
        NamedType::new(Underlying::Interface(locker_methods)),
    );

    for (type_name, methods) in SYNC_TYPES {
        let ty = declare_type(info, sync, type_name);
        let receiver = TypeRef::pointer_to(ty);
        let mut named = NamedType::new(Underlying::Struct(Vec::new()));
        for &(method, result) in methods.iter() {
            let result = result.map(|r| {
                Box::new(if r == "Locker" {
                    locker.clone()
                } else {
                    TypeRef::Basic(r.to_string())
                })
            });
            let id = info.add_symbol(Symbol {
                name: method.to_string(),
                kind: SymbolKind::Method {
                    receiver: receiver.clone(),
                },
                package: sync,
                ty: TypeRef::Func { result },
                decl: None,
            });
            named.methods.insert(method.to_string(), id);
        }
        info.insert_named(named_ref(sync, type_name), named);
    }
    sync
}

fn declare_type(info: &mut TypeInfo, package: PackageId, name: &str) -> TypeRef {
    let ty = TypeRef::named(package, name);
    info.declare(
        package,
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::TypeName,
            package,
            ty: ty.clone(),
            decl: None,
        },
    );
    ty
}

fn named_ref(package: PackageId, name: &str) -> NamedRef {
    NamedRef {
        package,
        name: name.to_string(),
    }
}
