//! Compile-time scopes.
//!
//! A `Scope` is one node of the lexical symbol-table tree. Blocks nested
//! inside a function share that function's *activation*: their variables
//! get slots in one flat list, so a single `Frame` holds every local of the
//! activation and the frame chain only needs to be walked across function
//! (closure) boundaries.
//!
//! - `fork()` opens a nested block in the same activation.
//! - `fork_func()` opens a function body with a fresh activation.
//!
//! Scopes are shared handles. Definitions go through `&self` behind a
//! single-writer lock so a finished scope tree can be read from several
//! activations at once.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::{EvalError, EvalResult};
use crate::frame::Frame;
use crate::types::Type;
use crate::value::Value;

/// Identity of a scope, used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ScopeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        ScopeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A storage declaration: a slot in its activation's frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// Index of this variable in the frame's slot array.
    pub index: usize,
    /// Static type of this variable.
    pub ty: Type,
}

/// An immutable named binding.
#[derive(Clone, Debug)]
pub struct Constant {
    pub ty: Type,
    pub value: Value,
}

/// What a name means at compile time.
#[derive(Clone, Debug)]
pub enum Def {
    Var(Variable),
    Const(Constant),
    Type(Type),
}

impl Def {
    pub fn describe(&self) -> &'static str {
        match self {
            Def::Var(_) => "variable",
            Def::Const(_) => "constant",
            Def::Type(_) => "type",
        }
    }

    #[inline]
    pub fn as_var(&self) -> Option<&Variable> {
        match self {
            Def::Var(var) => Some(var),
            _ => None,
        }
    }
}

impl fmt::Display for Def {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Def::Var(var) => write!(f, "var {} (slot {})", var.ty, var.index),
            Def::Const(c) => write!(f, "const {} = {}", c.ty, c.value),
            Def::Type(ty) => write!(f, "type {}", ty.rep()),
        }
    }
}

/// How a slot was declared, for frame dumps.
#[derive(Clone, Debug)]
pub(crate) enum SlotLabel {
    Named(Arc<str>),
    Temp(u32),
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotLabel::Named(name) => f.write_str(name),
            SlotLabel::Temp(id) => write!(f, "${id}"),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub ty: Type,
    pub label: SlotLabel,
}

/// Slot layout shared by every block of one activation.
#[derive(Debug, Default)]
pub(crate) struct Activation {
    slots: RwLock<Vec<Slot>>,
}

impl Activation {
    fn alloc(&self, ty: Type, label: SlotLabel) -> usize {
        let mut slots = self.slots.write();
        let index = slots.len();
        slots.push(Slot { ty, label });
        index
    }

    pub(crate) fn slots(&self) -> Vec<Slot> {
        self.slots.read().clone()
    }

    fn len(&self) -> usize {
        self.slots.read().len()
    }
}

#[derive(Default)]
struct Tables {
    defs: FxHashMap<Arc<str>, Def>,
    temps: FxHashMap<u32, Variable>,
    next_temp: u32,
}

struct ScopeData {
    id: ScopeId,
    parent: Option<Scope>,
    activation: Arc<Activation>,
    tables: RwLock<Tables>,
    frozen: AtomicBool,
}

/// Shared handle to a lexical scope.
#[derive(Clone)]
pub struct Scope(Arc<ScopeData>);

impl Scope {
    /// A parentless scope with a fresh activation.
    pub fn new_root() -> Self {
        Scope::with_parent(None, Arc::default())
    }

    fn with_parent(parent: Option<Scope>, activation: Arc<Activation>) -> Self {
        Scope(Arc::new(ScopeData {
            id: ScopeId::fresh(),
            parent,
            activation,
            tables: RwLock::new(Tables::default()),
            frozen: AtomicBool::new(false),
        }))
    }

    /// A nested block in this scope's activation.
    ///
    /// A frozen scope cannot grow its activation, so blocks forked from one
    /// start a fresh activation instead.
    pub fn fork(&self) -> Scope {
        let activation = if self.is_frozen() {
            Arc::default()
        } else {
            Arc::clone(&self.0.activation)
        };
        Scope::with_parent(Some(self.clone()), activation)
    }

    /// A function body: a child scope with a fresh activation.
    pub fn fork_func(&self) -> Scope {
        Scope::with_parent(Some(self.clone()), Arc::default())
    }

    #[inline]
    pub fn id(&self) -> ScopeId {
        self.0.id
    }

    #[inline]
    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// Whether both handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether both scopes allocate slots in the same activation.
    #[inline]
    pub fn same_activation(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.0.activation, &other.0.activation)
    }

    #[inline]
    pub(crate) fn activation(&self) -> &Arc<Activation> {
        &self.0.activation
    }

    /// Reject every further definition in this scope.
    pub fn freeze(&self) {
        self.0.frozen.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.0.frozen.load(Ordering::Acquire)
    }

    fn check_open(&self, name: &str) -> EvalResult {
        if self.is_frozen() {
            Err(EvalError::FrozenScope {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Insert `def` under `name`, which must not be defined directly here.
    ///
    /// `make` runs under the table lock, so slot allocation and insertion
    /// happen together.
    fn insert_with<T>(&self, name: &str, make: impl FnOnce() -> (Def, T)) -> EvalResult<T> {
        self.check_open(name)?;
        let mut tables = self.0.tables.write();
        if tables.defs.contains_key(name) {
            return Err(EvalError::DuplicateDefinition {
                name: name.to_string(),
            });
        }
        let (def, out) = make();
        tables.defs.insert(Arc::from(name), def);
        Ok(out)
    }

    /// Declare a variable, allocating the next slot of this activation.
    pub fn define_var(&self, name: &str, ty: Type) -> EvalResult<Variable> {
        let var = self.insert_with(name, || {
            let index = self
                .0
                .activation
                .alloc(ty.clone(), SlotLabel::Named(Arc::from(name)));
            let var = Variable { index, ty };
            (Def::Var(var.clone()), var)
        })?;
        tracing::trace!(scope = %self.id(), name, index = var.index, ty = %var.ty, "define var");
        Ok(var)
    }

    /// Declare an anonymous temporary. It occupies a slot but is reachable
    /// only through `temp(id)`, never by name.
    pub fn define_temp(&self, ty: Type) -> EvalResult<(u32, Variable)> {
        self.check_open("temporary")?;
        let mut tables = self.0.tables.write();
        let id = tables.next_temp;
        tables.next_temp += 1;
        let index = self.0.activation.alloc(ty.clone(), SlotLabel::Temp(id));
        let var = Variable { index, ty };
        tables.temps.insert(id, var.clone());
        tracing::trace!(scope = %self.id(), id, index, "define temp");
        Ok((id, var))
    }

    pub fn define_const(&self, name: &str, ty: Type, value: Value) -> EvalResult<Constant> {
        let constant = self.insert_with(name, || {
            let constant = Constant { ty, value };
            (Def::Const(constant.clone()), constant)
        })?;
        tracing::trace!(scope = %self.id(), name, value = %constant.value, "define const");
        Ok(constant)
    }

    /// Declare a named type whose underlying type is `ty.rep()`.
    pub fn define_type(&self, name: &str, ty: &Type) -> EvalResult<Type> {
        let named = self.insert_with(name, || {
            let named = Type::named(name, ty);
            (Def::Type(named.clone()), named)
        })?;
        tracing::trace!(scope = %self.id(), name, underlying = %ty.rep(), "define type");
        Ok(named)
    }

    /// Bind `name` to an existing type without wrapping it in a new name.
    ///
    /// Used for predeclared types, which are their own canonical form.
    pub(crate) fn define_builtin_type(&self, name: &str, ty: Type) -> EvalResult {
        self.insert_with(name, || (Def::Type(ty), ()))
    }

    /// Resolve `name`, innermost scope first.
    ///
    /// Returns the definition and the scope that holds it, or `None` when
    /// the name is defined nowhere in the chain.
    pub fn lookup(&self, name: &str) -> Option<(Def, Scope)> {
        let mut scope = self;
        loop {
            if let Some(def) = scope.0.tables.read().defs.get(name) {
                return Some((def.clone(), scope.clone()));
            }
            scope = scope.0.parent.as_ref()?;
        }
    }

    /// Resolve `name` as an assignment target.
    pub fn lookup_assignable(&self, name: &str) -> EvalResult<(Variable, Scope)> {
        match self.lookup(name) {
            Some((Def::Var(var), scope)) => Ok((var, scope)),
            Some((def, _)) => Err(EvalError::NotAssignable {
                name: name.to_string(),
                def: def.describe(),
            }),
            None => Err(EvalError::Undefined {
                name: name.to_string(),
            }),
        }
    }

    /// The temporary registered under `id` directly in this scope.
    pub fn temp(&self, id: u32) -> Option<Variable> {
        self.0.tables.read().temps.get(&id).cloned()
    }

    /// Number of activation boundaries between this scope and `defining`.
    ///
    /// This is the number of `outer` links a frame walk follows to reach
    /// the frame holding `defining`'s variables. `None` if `defining` is not
    /// this scope or one of its ancestors.
    pub fn frame_depth(&self, defining: &Scope) -> Option<usize> {
        let mut depth = 0;
        let mut scope = self;
        loop {
            if scope.ptr_eq(defining) {
                return Some(depth);
            }
            let parent = scope.0.parent.as_ref()?;
            if !parent.same_activation(scope) {
                depth += 1;
            }
            scope = parent;
        }
    }

    /// Slot count of this scope's activation.
    pub fn num_vars(&self) -> usize {
        self.0.activation.len()
    }

    /// Declared type of every slot of this scope's activation, in slot order.
    pub fn var_types(&self) -> Vec<Type> {
        self.0.activation.slots().into_iter().map(|slot| slot.ty).collect()
    }

    /// Names defined directly in this scope, sorted by name.
    pub fn local_defs(&self) -> Vec<(Arc<str>, Def)> {
        let mut defs: Vec<_> = self
            .0
            .tables
            .read()
            .defs
            .iter()
            .map(|(name, def)| (Arc::clone(name), def.clone()))
            .collect();
        defs.sort_by(|a, b| a.0.cmp(&b.0));
        defs
    }

    /// Build an activation record for this scope's activation.
    ///
    /// Every slot starts as the zero value of its declared type.
    pub fn new_frame(&self, outer: Option<&Frame>) -> Frame {
        let vars: Vec<Value> = self
            .0
            .activation
            .slots()
            .iter()
            .map(|slot| slot.ty.zero())
            .collect();
        tracing::trace!(scope = %self.id(), slots = vars.len(), "new frame");
        Frame::new(Arc::clone(&self.0.activation), outer.cloned(), vars)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.0.id)
            .field("parent", &self.0.parent.as_ref().map(Scope::id))
            .field("num_vars", &self.num_vars())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}
