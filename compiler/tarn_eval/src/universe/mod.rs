//! The universe scope: the root of every scope tree.
//!
//! Populated once, on first access, then frozen. After that it is only read,
//! so every thread can resolve predeclared names without locking contention.

use std::sync::OnceLock;

use crate::errors::EvalResult;
use crate::scope::Scope;
use crate::types::{FloatWidth, IntWidth, Type};
use crate::value::Value;

static UNIVERSE: OnceLock<Scope> = OnceLock::new();

/// Predeclared types, in declaration order.
fn predeclared_types() -> [(&'static str, Type); 16] {
    [
        ("bool", Type::bool()),
        ("uint8", Type::uint(IntWidth::W8, "uint8")),
        ("uint16", Type::uint(IntWidth::W16, "uint16")),
        ("uint32", Type::uint(IntWidth::W32, "uint32")),
        ("uint64", Type::uint(IntWidth::W64, "uint64")),
        ("uint", Type::uint(IntWidth::W64, "uint")),
        ("uintptr", Type::uint(IntWidth::W64, "uintptr")),
        ("int8", Type::int(IntWidth::W8, "int8")),
        ("int16", Type::int(IntWidth::W16, "int16")),
        ("int32", Type::int(IntWidth::W32, "int32")),
        ("int64", Type::int(IntWidth::W64, "int64")),
        ("int", Type::int(IntWidth::W64, "int")),
        ("float32", Type::float(FloatWidth::W32, "float32")),
        ("float64", Type::float(FloatWidth::W64, "float64")),
        ("float", Type::float(FloatWidth::W64, "float")),
        ("string", Type::string()),
    ]
}

fn populate(scope: &Scope) -> EvalResult {
    for (name, ty) in predeclared_types() {
        scope.define_builtin_type(name, ty)?;
    }
    let bool_ty = Type::bool();
    scope.define_const("true", bool_ty.clone(), Value::bool(true))?;
    scope.define_const("false", bool_ty, Value::bool(false))?;
    Ok(())
}

/// Build a fresh, frozen universe scope.
///
/// `universe()` is the process-wide instance; this is exposed for embedders
/// that want an isolated root.
#[tracing::instrument(level = "debug")]
pub fn build_universe() -> EvalResult<Scope> {
    let scope = Scope::new_root();
    populate(&scope)?;
    scope.freeze();
    tracing::debug!(
        scope = %scope.id(),
        names = scope.local_defs().len(),
        "universe initialized"
    );
    Ok(scope)
}

/// The process-wide universe scope.
pub fn universe() -> &'static Scope {
    UNIVERSE.get_or_init(|| match build_universe() {
        Ok(scope) => scope,
        // Predeclared names are distinct, so population cannot fail; an
        // empty frozen root keeps the process usable if it ever does.
        Err(err) => {
            tracing::error!(%err, "universe initialization failed");
            let scope = Scope::new_root();
            scope.freeze();
            scope
        }
    })
}

#[cfg(test)]
mod tests;
