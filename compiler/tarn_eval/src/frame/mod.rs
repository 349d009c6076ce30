//! Run-time activation records.
//!
//! A `Frame` holds the values of one activation's slots and links to the
//! frame of the enclosing activation. Frames are shared handles: a closure
//! that captures a frame keeps it (and its whole `outer` chain) alive after
//! the block that created it has finished.

use std::fmt;
use std::sync::Arc;

use crate::errors::{EvalError, EvalResult};
use crate::scope::{Activation, Scope};
use crate::value::Value;

struct FrameData {
    activation: Arc<Activation>,
    outer: Option<Frame>,
    vars: Box<[Value]>,
}

/// Shared handle to an activation record.
#[derive(Clone)]
pub struct Frame(Arc<FrameData>);

impl Frame {
    pub(crate) fn new(activation: Arc<Activation>, outer: Option<Frame>, vars: Vec<Value>) -> Self {
        Frame(Arc::new(FrameData {
            activation,
            outer,
            vars: vars.into_boxed_slice(),
        }))
    }

    /// The frame of the enclosing activation.
    #[inline]
    pub fn outer(&self) -> Option<&Frame> {
        self.0.outer.as_ref()
    }

    /// Number of slots in this frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.vars.is_empty()
    }

    /// Whether this frame was built for `scope`'s activation.
    #[inline]
    pub fn belongs_to(&self, scope: &Scope) -> bool {
        Arc::ptr_eq(&self.0.activation, scope.activation())
    }

    /// The value in slot `index` of the frame holding `scope`'s variables.
    ///
    /// Walks the `outer` chain until it reaches a frame of `scope`'s
    /// activation. Running off the end of the chain means the resolver and
    /// the frame chain disagree; the resulting `ScopeNotFound` is fatal.
    pub fn get(&self, scope: &Scope, index: usize) -> EvalResult<Value> {
        let mut frame = self;
        loop {
            if frame.belongs_to(scope) {
                return frame.0.vars.get(index).cloned().ok_or_else(|| {
                    EvalError::IndexOutOfRange {
                        index: i64::try_from(index).unwrap_or(i64::MAX),
                        len: frame.len(),
                    }
                });
            }
            match frame.outer() {
                Some(outer) => frame = outer,
                None => {
                    tracing::error!(
                        scope = %scope.id(),
                        index,
                        "frame chain has no frame for scope"
                    );
                    return Err(EvalError::ScopeNotFound { scope: scope.id() });
                }
            }
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut frame = Some(self);
        let mut depth = 0;
        while let Some(current) = frame {
            write!(f, "frame {depth}: {{")?;
            let slots = current.0.activation.slots();
            for (i, value) in current.0.vars.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match slots.get(i) {
                    Some(slot) => write!(f, "{} = {value}", slot.label)?,
                    None => write!(f, "?{i} = {value}")?,
                }
            }
            writeln!(f, "}}")?;
            frame = current.outer();
            depth += 1;
        }
        Ok(())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("vars", &self.0.vars)
            .field("outer", &self.0.outer)
            .finish()
    }
}
