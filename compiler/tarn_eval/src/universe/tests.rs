use super::*;
use crate::errors::EvalError;
use crate::scope::Def;

const PREDECLARED: [&str; 18] = [
    "bool", "uint8", "uint16", "uint32", "uint64", "uint", "uintptr", "int8", "int16", "int32",
    "int64", "int", "float32", "float64", "float", "string", "true", "false",
];

#[test]
fn test_predeclared_names() {
    let u = universe();
    for name in PREDECLARED {
        let (_, found) = u
            .lookup(name)
            .unwrap_or_else(|| panic!("{name} is not predeclared"));
        assert!(found.ptr_eq(u));
    }
    assert_eq!(u.local_defs().len(), PREDECLARED.len());
    assert_eq!(u.num_vars(), 0);
}

#[test]
fn test_predeclared_types_are_canonical() {
    let u = universe();
    let Some((Def::Type(int), _)) = u.lookup("int") else {
        panic!("int is not a type");
    };
    assert!(!int.is_named());
    assert_eq!(int.to_string(), "int");
    assert_eq!(int.rep(), int);

    let Some((Def::Type(int64), _)) = u.lookup("int64") else {
        panic!("int64 is not a type");
    };
    assert_ne!(int, int64);

    let Some((Def::Const(t), _)) = u.lookup("true") else {
        panic!("true is not a constant");
    };
    assert_eq!(t.value, Value::bool(true));
    assert!(t.ty.is_boolean());
}

#[test]
fn test_universe_is_frozen() {
    let u = universe();
    assert!(u.is_frozen());
    assert_eq!(
        u.define_var("x", Type::bool()).unwrap_err(),
        EvalError::FrozenScope { name: "x".into() }
    );
    assert!(universe().ptr_eq(u));
}

#[test]
fn test_program_scope_starts_at_slot_zero() {
    let program = universe().fork_func();
    let x = program.define_var("x", Type::int(IntWidth::W64, "int")).unwrap();
    assert_eq!(x.index, 0);
    assert!(program.lookup("string").is_some());

    // Blocks forked straight off the universe also get their own slots.
    let block = universe().fork();
    assert_eq!(block.define_var("y", Type::bool()).unwrap().index, 0);
}

#[test]
fn test_build_universe_is_isolated() {
    let fresh = build_universe().unwrap();
    assert!(fresh.is_frozen());
    assert!(!fresh.ptr_eq(universe()));
    assert_eq!(fresh.local_defs().len(), universe().local_defs().len());
}
