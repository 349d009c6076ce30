//! Error types for the evaluator runtime layer.
//!
//! Definition-time failures (duplicate names, frozen scopes, constant
//! overflow) surface to the resolver; run-time failures (kind mismatches,
//! bad indices) surface to the evaluator. `ScopeNotFound` is the one fatal
//! kind: it means the resolver and the frame chain disagree.

use crate::scope::ScopeId;

/// Result of a runtime-layer operation.
pub type EvalResult<T = ()> = Result<T, EvalError>;

/// Runtime-layer error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    // Definitions
    #[error("{name} redeclared in this block")]
    DuplicateDefinition { name: String },
    #[error("cannot define {name}: scope is frozen")]
    FrozenScope { name: String },
    #[error("undefined: {name}")]
    Undefined { name: String },
    #[error("cannot assign to {name} ({def})")]
    NotAssignable { name: String, def: &'static str },

    // Values
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    #[error("index {index} out of range [0, {len})")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("nil {what} dereference")]
    NilDereference { what: &'static str },

    // Ideal constants
    #[error("constant {value} overflows {ty}")]
    Overflow { value: String, ty: String },
    #[error("constant {value} truncated to {ty}")]
    Truncated { value: String, ty: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid shift count {count}")]
    InvalidShift { count: String },
    #[error("operator {op} not defined on {operand}")]
    InvalidIdealOp { op: &'static str, operand: &'static str },
    #[error("malformed literal: {text}")]
    InvalidLiteral { text: String },

    // Internal
    #[error("internal error: no frame for scope {scope} in frame chain")]
    ScopeNotFound { scope: ScopeId },
}

impl EvalError {
    /// Whether this error means the runtime's own state is corrupt.
    ///
    /// Fatal errors must abort evaluation; they are never a property of the
    /// user program.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, EvalError::ScopeNotFound { .. })
    }

    pub(crate) fn type_mismatch(expected: impl ToString, got: impl ToString) -> Self {
        EvalError::TypeMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}
