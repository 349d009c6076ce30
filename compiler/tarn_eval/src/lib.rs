//! Tarn Eval - runtime support layer for the Tarn tree-walking evaluator.
//!
//! This crate provides the pieces the evaluator walks the syntax tree with;
//! it does not parse or evaluate anything itself.
//!
//! # Architecture
//!
//! - `Type`: closed set of type kinds, with `rep()`/`literal()` name
//!   stripping, structural predicates, zero values and numeric `Bounds`
//! - `Value`: closed set of value kinds, each a handle to a storage cell
//! - `ideal`: exact constant folding over `BigInt`/`BigRational`
//! - `Scope`: lexical symbol tables that allocate frame slots
//! - `Frame`: activation records linked through `outer`
//! - `universe()`: the frozen, process-wide root scope
//!
//! # Resolution and execution
//!
//! The resolver forks scopes and defines names; each variable gets a slot in
//! its activation. At run time each activation gets a `Frame` from
//! `Scope::new_frame`, and a variable resolved to (defining scope, index) is
//! read with `Frame::get`.

pub mod errors;
mod frame;
pub mod ideal;
mod scope;
mod types;
mod universe;
mod value;

pub use errors::{EvalError, EvalResult};
pub use frame::Frame;
pub use ideal::IdealOp;
pub use scope::{Constant, Def, Scope, ScopeId, Variable};
pub use types::{Bounds, FloatSpec, FloatWidth, FuncSig, IntSpec, IntWidth, Type, TypeKind};
pub use universe::{build_universe, universe};
pub use value::{
    ArrayValue, BoolValue, FloatValue, Func, FuncValue, IdealFloatValue, IdealIntValue, IntValue,
    PtrValue, StringValue, UintValue, Value, ValueKind,
};
