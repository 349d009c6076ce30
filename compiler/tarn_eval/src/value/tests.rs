use super::*;
use crate::frame::Frame;
use crate::scope::Scope;
use crate::types::Type;
use pretty_assertions::assert_eq;

#[test]
fn test_assign_copies_contents() {
    let a = Value::int(IntWidth::W64, 5);
    let b = Value::int(IntWidth::W64, 0);
    b.assign(&a).unwrap();
    assert_eq!(b.as_int().unwrap().get(), 5);

    a.as_int().unwrap().set(6);
    assert_eq!(b.as_int().unwrap().get(), 5);
    assert!(!a.same_cell(&b));
}

#[test]
fn test_clone_aliases_cell() {
    let a = Value::string("hi");
    let b = a.clone();
    b.as_string().unwrap().set("bye");
    assert_eq!(a.as_string().unwrap().get(), "bye");
    assert!(a.same_cell(&b));
}

#[test]
fn test_assign_kind_mismatch() {
    let err = Value::int(IntWidth::W64, 0).assign(&Value::string("x")).unwrap_err();
    assert_eq!(
        err,
        EvalError::TypeMismatch {
            expected: "integer".into(),
            got: "string".into()
        }
    );
    assert!(Value::uint(IntWidth::W8, 0).assign(&Value::int(IntWidth::W8, 0)).is_err());
}

#[test]
fn test_assign_to_self() {
    let a = Value::int(IntWidth::W64, 9);
    a.assign(&a.clone()).unwrap();
    assert_eq!(a.as_int().unwrap().get(), 9);

    let arr = Value::array(vec![Value::bool(true), Value::bool(false)]);
    arr.assign(&arr).unwrap();
    assert_eq!(arr.to_string(), "{true, false}");
}

#[test]
fn test_accessor_mismatch() {
    let v = Value::bool(true);
    assert!(v.as_bool().is_ok());
    let err = v.as_int().unwrap_err();
    assert_eq!(err.to_string(), "type mismatch: expected integer, got bool");
    assert!(v.as_ptr().is_err());
}

#[test]
fn test_uint_wraps_to_width() {
    let v = Value::uint(IntWidth::W8, 0);
    let u = v.as_uint().unwrap();
    u.set(256);
    assert_eq!(u.get(), 0);
    u.set(300);
    assert_eq!(u.get(), 44);
    assert_eq!(Value::uint(IntWidth::W16, 70_000).as_uint().unwrap().get(), 4464);
    assert_eq!(Value::uint(IntWidth::W64, u64::MAX).as_uint().unwrap().get(), u64::MAX);
}

#[test]
fn test_int_wraps_to_width() {
    let v = Value::int(IntWidth::W8, 0);
    let i = v.as_int().unwrap();
    i.set(128);
    assert_eq!(i.get(), -128);
    i.set(-129);
    assert_eq!(i.get(), 127);
    assert_eq!(i.bits(), 8);
    let wrapped = Value::int(IntWidth::W32, i64::from(i32::MAX) + 1);
    assert_eq!(wrapped.as_int().unwrap().get(), i64::from(i32::MIN));
}

#[test]
fn test_float32_rounds() {
    let v = Value::float(FloatWidth::W32, 0.1);
    assert_eq!(v.as_float().unwrap().get(), f64::from(0.1f32));
    assert_ne!(v.as_float().unwrap().get(), 0.1);

    let v = Value::float(FloatWidth::W64, 0.1);
    assert_eq!(v.as_float().unwrap().get(), 0.1);
}

#[test]
fn test_array_elem_is_reference() {
    let arr = Value::array(vec![
        Value::int(IntWidth::W64, 1),
        Value::int(IntWidth::W64, 2),
        Value::int(IntWidth::W64, 3),
    ]);
    let a = arr.as_array().unwrap();
    let second = a.elem(1).unwrap();
    second.as_int().unwrap().set(20);
    assert_eq!(arr.to_string(), "{1, 20, 3}");
    assert!(second.same_cell(&a.elem(1).unwrap()));
}

#[test]
fn test_array_elem_out_of_range() {
    let arr = Value::array(vec![
        Value::int(IntWidth::W64, 0),
        Value::int(IntWidth::W64, 0),
        Value::int(IntWidth::W64, 0),
    ]);
    let a = arr.as_array().unwrap();
    assert_eq!(a.elem(3).unwrap_err(), EvalError::IndexOutOfRange { index: 3, len: 3 });
    assert_eq!(a.elem(-1).unwrap_err(), EvalError::IndexOutOfRange { index: -1, len: 3 });
    assert_eq!(a.len(), 3);
    assert!(!a.is_empty());
}

#[test]
fn test_array_assign_copies_elements() {
    let src = Value::array(vec![Value::int(IntWidth::W64, 1), Value::int(IntWidth::W64, 2)]);
    let dst = Value::array(vec![Value::int(IntWidth::W64, 0), Value::int(IntWidth::W64, 0)]);
    dst.assign(&src).unwrap();
    assert_eq!(dst, src);

    src.as_array().unwrap().elem(0).unwrap().as_int().unwrap().set(9);
    assert_eq!(dst.to_string(), "{1, 2}");

    let short = Value::array(vec![Value::int(IntWidth::W64, 0)]);
    assert_eq!(
        short.assign(&src).unwrap_err(),
        EvalError::TypeMismatch {
            expected: "[1] array".into(),
            got: "[2] array".into()
        }
    );
}

#[test]
fn test_ptr_deref() {
    let target = Value::int(IntWidth::W64, 3);
    let p = Value::ptr(Some(target.clone()));
    let pv = p.as_ptr().unwrap();
    pv.deref().unwrap().as_int().unwrap().set(4);
    assert_eq!(target.as_int().unwrap().get(), 4);
    assert_eq!(p.to_string(), "&4");

    let nil = Value::ptr(None);
    assert_eq!(
        nil.as_ptr().unwrap().deref().unwrap_err(),
        EvalError::NilDereference { what: "pointer" }
    );
    assert_eq!(nil.to_string(), "<nil>");
}

#[test]
fn test_ptr_assign_copies_target_reference() {
    let x = Value::int(IntWidth::W64, 1);
    let y = Value::int(IntWidth::W64, 2);
    let p = Value::ptr(Some(x.clone()));
    let q = Value::ptr(Some(y));
    q.assign(&p).unwrap();
    assert_eq!(p, q);
    assert!(q.as_ptr().unwrap().deref().unwrap().same_cell(&x));

    // Equal contents in different cells are different pointees.
    let r = Value::ptr(Some(Value::int(IntWidth::W64, 1)));
    assert_ne!(p, r);
}

struct SetSlot {
    scope: Scope,
    value: i64,
}

impl Func for SetSlot {
    fn new_frame(&self) -> Frame {
        self.scope.new_frame(None)
    }

    fn call(&self, frame: &Frame) -> EvalResult {
        frame.get(&self.scope, 0)?.as_int()?.set(self.value);
        Ok(())
    }
}

#[test]
fn test_func_invoke() {
    let scope = Scope::new_root();
    scope.define_var("r", Type::int(IntWidth::W64, "int")).unwrap();
    let func: Arc<dyn Func> = Arc::new(SetSlot {
        scope: scope.clone(),
        value: 42,
    });

    let f = Value::func(Some(Arc::clone(&func)));
    let frame = f.as_func().unwrap().invoke().unwrap();
    assert_eq!(frame.get(&scope, 0).unwrap().to_string(), "42");
    assert_eq!(f.to_string(), "func");

    assert_eq!(f, Value::func(Some(func)));
}

#[test]
fn test_nil_func() {
    let f = Value::func(None);
    let fv = f.as_func().unwrap();
    assert_eq!(
        fv.invoke().unwrap_err(),
        EvalError::NilDereference { what: "function" }
    );
    assert_eq!(f.to_string(), "<nil>");
    assert_eq!(format!("{fv:?}"), "FuncValue(\"nil\")");
}

#[test]
fn test_display() {
    assert_eq!(Value::bool(true).to_string(), "true");
    assert_eq!(Value::int(IntWidth::W64, -3).to_string(), "-3");
    assert_eq!(Value::float(FloatWidth::W64, 1.5).to_string(), "1.5");
    assert_eq!(Value::string("a\"b").to_string(), "\"a\\\"b\"");
    assert_eq!(
        Value::ideal_float(BigRational::new(BigInt::from(3), BigInt::from(4))).to_string(),
        "3/4"
    );
    let nested = Value::array(vec![
        Value::array(vec![Value::int(IntWidth::W64, 1)]),
        Value::array(vec![Value::int(IntWidth::W64, 2)]),
    ]);
    assert_eq!(nested.to_string(), "{{1}, {2}}");
}

#[test]
fn test_kind_names() {
    assert_eq!(Value::uint(IntWidth::W8, 0).kind(), ValueKind::Uint);
    assert_eq!(ValueKind::Uint.to_string(), "unsigned integer");
    assert_eq!(ValueKind::IdealFloat.name(), "ideal float");
    assert_eq!(Value::ptr(None).kind().name(), "pointer");
}

#[test]
fn test_cyclic_ptr_renders() {
    let p = Value::ptr(None);
    p.as_ptr().unwrap().set(Some(p.clone()));
    assert_eq!(p.to_string(), "&&&&&&&&&...");
    assert_eq!(format!("{:?}", p.as_ptr().unwrap()), "PtrValue(Ptr)");
    assert!(format!("{p:?}").starts_with("Ptr("));
}

#[test]
fn test_ptr_cycle_through_array_renders() {
    let p = Value::ptr(None);
    let arr = Value::array(vec![Value::int(IntWidth::W64, 1), p.clone()]);
    p.as_ptr().unwrap().set(Some(arr.clone()));
    let rendered = arr.to_string();
    assert!(rendered.starts_with("{1, &{1, &{1, "));
    assert!(rendered.contains("&..."));
}

#[test]
fn test_ptr_chain_within_limit_renders_fully() {
    let mut value = Value::int(IntWidth::W64, 7);
    for _ in 0..3 {
        value = Value::ptr(Some(value));
    }
    assert_eq!(value.to_string(), "&&&7");
}

#[test]
fn test_every_int_width_wraps() {
    for (width, bits) in [
        (IntWidth::W8, 8),
        (IntWidth::W16, 16),
        (IntWidth::W32, 32),
        (IntWidth::W64, 64),
    ] {
        assert_eq!(width.bits(), bits);
        let max = Value::uint(width, u64::MAX);
        assert_eq!(max.as_uint().unwrap().get(), u64::MAX >> (64 - bits));
        assert_eq!(max.as_uint().unwrap().bits(), bits);

        let min = Value::int(width, i64::MIN >> (64 - bits));
        assert_eq!(min.as_int().unwrap().get(), i64::MIN >> (64 - bits));
        min.as_int().unwrap().set(-1);
        assert_eq!(min.as_int().unwrap().get(), -1);
    }
    assert_eq!(Value::int(IntWidth::W16, 0x1_8000).as_int().unwrap().get(), -32768);
    assert_eq!(Value::float(FloatWidth::W32, 0.5).as_float().unwrap().bits(), 32);
}
