//! Composite value kinds: arrays, pointers and functions.

use std::fmt;
use std::sync::Arc;

use super::storage::Storage;
use super::Value;
use crate::errors::{EvalError, EvalResult};
use crate::frame::Frame;

/// Fixed-length array. Each element is its own cell, so `elem` hands out a
/// reference to the element rather than a copy.
#[derive(Clone, Debug)]
pub struct ArrayValue {
    pub(super) elems: Arc<[Value]>,
}

impl ArrayValue {
    #[inline]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Reference to the element at `index`.
    pub fn elem(&self, index: i64) -> EvalResult<Value> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.elems.get(i))
            .cloned()
            .ok_or(EvalError::IndexOutOfRange {
                index,
                len: self.elems.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elems.iter()
    }

    pub(super) fn assign(&self, other: &ArrayValue) -> EvalResult {
        if self.len() != other.len() {
            return Err(EvalError::type_mismatch(
                format_args!("[{}] array", self.len()),
                format_args!("[{}] array", other.len()),
            ));
        }
        for (dst, src) in self.elems.iter().zip(other.elems.iter()) {
            dst.assign(src)?;
        }
        Ok(())
    }
}

/// Pointer to another value's cell. The pointer does not own its pointee.
#[derive(Clone)]
pub struct PtrValue(pub(super) Storage<Option<Value>>);

impl PtrValue {
    /// The pointee, or `None` for a nil pointer.
    #[inline]
    pub fn get(&self) -> Option<Value> {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, target: Option<Value>) {
        self.0.replace(target);
    }

    /// The pointee, failing on nil.
    pub fn deref(&self) -> EvalResult<Value> {
        self.get().ok_or(EvalError::NilDereference { what: "pointer" })
    }
}

// Only the pointee's kind: a pointer chain can lead back to itself.
impl fmt::Debug for PtrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(target) => f.debug_tuple("PtrValue").field(&target.kind()).finish(),
            None => f.debug_tuple("PtrValue").field(&"nil").finish(),
        }
    }
}

/// Callable capability behind a function value.
///
/// Implemented by the embedding evaluator. A closure typically holds the
/// frame it was created in and builds its activation with
/// `body_scope.new_frame(Some(&captured))`, which keeps the captured frame
/// alive for as long as the closure is.
pub trait Func: Send + Sync {
    /// Build the callee's activation record.
    fn new_frame(&self) -> Frame;

    /// Run the body against a frame produced by `new_frame`.
    fn call(&self, frame: &Frame) -> EvalResult;
}

#[derive(Clone)]
pub struct FuncValue(pub(super) Storage<Option<Arc<dyn Func>>>);

impl FuncValue {
    #[inline]
    pub fn get(&self) -> Option<Arc<dyn Func>> {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, func: Option<Arc<dyn Func>>) {
        self.0.replace(func);
    }

    /// The callable, failing on a nil function value.
    pub fn target(&self) -> EvalResult<Arc<dyn Func>> {
        self.get().ok_or(EvalError::NilDereference { what: "function" })
    }

    /// Build a fresh frame and run the function against it.
    ///
    /// Evaluators that need to bind arguments first call `target()`,
    /// `new_frame()` and `call()` separately.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn invoke(&self) -> EvalResult<Frame> {
        let func = self.target()?;
        let frame = func.new_frame();
        func.call(&frame)?;
        Ok(frame)
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.get().is_some() { "func" } else { "nil" };
        f.debug_tuple("FuncValue").field(&state).finish()
    }
}
