//! The Type Information Node.
//!
//! A [`TypeInfo`] is the resolved view of a `(TypeDescriptor, BindingMap)`
//! pair. Every query on it (raw type, component type, map value type,
//! properties, supertypes) is computed on first use and memoized on the
//! node. Nested descriptors met along the way are promoted to new nodes with
//! [`TypeInfo::create_info`], which threads the binding map downwards so a
//! variable deep inside a declaration resolves to the argument supplied at
//! the root.
//!
//! ## Memoization
//!
//! Each cache is a `OnceLock` filled with a compute-then-publish race: the
//! value is computed without holding anything, then offered to the cell.
//! The first publisher wins and every caller reads the winner. Because every
//! computation is a pure function of the node, racing threads compute equal
//! values. Failed computations are never cached.
//!
//! A cached result that is the node itself (a self-referential property such
//! as `Node parent`) is stored as a marker instead of a strong handle, so a
//! node never keeps itself alive.

use crate::bindings::BindingMap;
use crate::classification::ClassificationOracle;
use crate::error::{ResolveError, Result};
use crate::hierarchy::TypeHierarchy;
use crate::property_lookup::PropertyLookup;
use crate::query_trace;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::registry::{ConstructorDef, MethodDef};
use crate::types::{ClassId, RawType, TypeDescriptor, TypeVarId};
use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHasher};
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};
use tyres_common::limits::TYPE_ARGS_INLINE;

/// Type arguments of a node, in declaration order.
pub type TypeArguments = SmallVec<[TypeInfo; TYPE_ARGS_INLINE]>;

/// Which representation a node uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeInfoKind {
    /// A plain class reference; carries no bindings.
    Class,
    /// A generic instantiation, including specialized (synthetic) ones.
    Parametrized,
    /// A type variable resolved through the binding map.
    Variable,
    /// A generic array expression such as `T[]`.
    GenericArray,
}

/// The collaborators every node consults.
pub(crate) struct Environment {
    pub(crate) hierarchy: Arc<dyn TypeHierarchy>,
    pub(crate) oracle: Arc<dyn ClassificationOracle>,
    pub(crate) properties: Arc<dyn PropertyLookup>,
}

/// A memoized query result.
#[derive(Clone)]
pub(crate) enum Memo {
    Absent,
    SelfRef,
    Node(TypeInfo),
}

impl Memo {
    pub(crate) fn capture(owner: &TypeInfo, found: Option<TypeInfo>) -> Self {
        match found {
            None => Self::Absent,
            Some(node) if node.ptr_eq(owner) => Self::SelfRef,
            Some(node) => Self::Node(node),
        }
    }

    pub(crate) fn restore(&self, owner: &TypeInfo) -> Option<TypeInfo> {
        match self {
            Self::Absent => None,
            Self::SelfRef => Some(owner.clone()),
            Self::Node(node) => Some(node.clone()),
        }
    }
}

pub(crate) struct TypeInfoData {
    pub(crate) kind: TypeInfoKind,
    pub(crate) descriptor: TypeDescriptor,
    pub(crate) bindings: BindingMap,
    pub(crate) hash: u64,
    pub(crate) env: Arc<Environment>,
    raw_type: OnceLock<RawType>,
    variable_target: OnceLock<Memo>,
    component: OnceLock<Memo>,
    map_value: OnceLock<Memo>,
    type_arguments: OnceLock<SmallVec<[Memo; TYPE_ARGS_INLINE]>>,
    pub(crate) properties: DashMap<String, Memo, FxBuildHasher>,
}

/// Resolved, memoizing view of a type expression.
///
/// Cheap to clone (a reference-count bump) and safe to share between
/// threads.
#[derive(Clone)]
pub struct TypeInfo(pub(crate) Arc<TypeInfoData>);

impl TypeInfo {
    pub(crate) fn new(
        kind: TypeInfoKind,
        descriptor: TypeDescriptor,
        bindings: BindingMap,
        env: Arc<Environment>,
    ) -> Self {
        let mut hasher = FxHasher::default();
        descriptor.hash(&mut hasher);
        bindings.hash(&mut hasher);
        let hash = hasher.finish();

        TypeInfo(Arc::new(TypeInfoData {
            kind,
            descriptor,
            bindings,
            hash,
            env,
            raw_type: OnceLock::new(),
            variable_target: OnceLock::new(),
            component: OnceLock::new(),
            map_value: OnceLock::new(),
            type_arguments: OnceLock::new(),
            properties: DashMap::with_hasher(FxBuildHasher),
        }))
    }

    /// Build the node for `descriptor` in the context of `bindings`.
    ///
    /// Nominal descriptors start a fresh context with no bindings.
    /// Parametrized ones extend `bindings` with their own arguments.
    /// Variables and generic arrays keep `bindings` as they are. Wildcards
    /// stand for their representative bound.
    pub(crate) fn promote(
        descriptor: &TypeDescriptor,
        bindings: &BindingMap,
        env: &Arc<Environment>,
    ) -> Result<TypeInfo> {
        let (kind, bindings) = match descriptor {
            TypeDescriptor::Nominal(_) => (TypeInfoKind::Class, BindingMap::new()),
            TypeDescriptor::Parametrized { raw, args } => (
                TypeInfoKind::Parametrized,
                parametrized_bindings(bindings, env.hierarchy.type_params(*raw), args.iter().cloned()),
            ),
            TypeDescriptor::SyntheticParametrized { base, args } => (
                TypeInfoKind::Parametrized,
                parametrized_bindings(
                    bindings,
                    env.hierarchy.type_params(*base),
                    args.iter().map(|arg| TypeDescriptor::Nominal(arg.raw_type().clone())),
                ),
            ),
            TypeDescriptor::Variable(_) => (TypeInfoKind::Variable, bindings.clone()),
            TypeDescriptor::Array(_) => (TypeInfoKind::GenericArray, bindings.clone()),
            TypeDescriptor::Wildcard { .. } => {
                return match descriptor.representative_bound() {
                    Some(bound) => Self::promote(bound, bindings, env),
                    None => Err(unsupported(descriptor)),
                };
            }
        };
        trace!(?kind, bindings = bindings.len(), "promote");
        Ok(TypeInfo::new(kind, descriptor.clone(), bindings, Arc::clone(env)))
    }

    /// Promote a descriptor met while traversing this node.
    ///
    /// A descriptor equal to this node's own returns this node, which is
    /// what makes self-referential generics terminate.
    pub fn create_info(&self, descriptor: &TypeDescriptor) -> Result<TypeInfo> {
        if *descriptor == self.0.descriptor {
            return Ok(self.clone());
        }
        if let TypeDescriptor::Wildcard { .. } = descriptor {
            return match descriptor.representative_bound() {
                Some(bound) => self.create_info(bound),
                None => Err(unsupported(descriptor)),
            };
        }
        Self::promote(descriptor, &self.0.bindings, &self.0.env)
    }

    #[inline]
    pub(crate) fn ptr_eq(&self, other: &TypeInfo) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(crate) fn hierarchy(&self) -> &dyn TypeHierarchy {
        &*self.0.env.hierarchy
    }

    #[inline]
    pub(crate) fn hash_value(&self) -> u64 {
        self.0.hash
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn kind(&self) -> TypeInfoKind {
        self.0.kind
    }

    /// The descriptor this node was built from.
    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.0.descriptor
    }

    #[inline]
    pub fn bindings(&self) -> &BindingMap {
        &self.0.bindings
    }

    /// The erased raw type, with variables substituted from the bindings and
    /// unbound ones replaced by their declared bound.
    pub fn raw_type(&self) -> &RawType {
        self.0
            .raw_type
            .get_or_init(|| self.hierarchy().erase(&self.0.descriptor, &self.0.bindings))
    }

    /// The class node of the raw type.
    pub fn raw_type_information(&self) -> TypeInfo {
        let raw = TypeDescriptor::Nominal(self.raw_type().clone());
        if self.0.descriptor == raw {
            return self.clone();
        }
        TypeInfo::new(TypeInfoKind::Class, raw, BindingMap::new(), Arc::clone(&self.0.env))
    }

    /// The descriptor with every bound variable substituted and wildcards
    /// reduced to their representative bound. Unbound variables stay.
    pub fn resolved_descriptor(&self) -> TypeDescriptor {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::BindingChain);
        substitute(&self.0.descriptor, &self.0.bindings, &mut guard)
    }

    // -------------------------------------------------------------------------
    // Memoization
    // -------------------------------------------------------------------------

    fn memoized(
        &self,
        cell: &OnceLock<Memo>,
        op: &'static str,
        compute: impl FnOnce() -> Result<Option<TypeInfo>>,
    ) -> Result<Option<TypeInfo>> {
        let query_id = query_trace::begin();
        if let Some(id) = query_id {
            query_trace::unary_start(id, op, self.0.hash);
        }
        if let Some(memo) = cell.get() {
            let found = memo.restore(self);
            if let Some(id) = query_id {
                query_trace::unary_end(id, op, found.is_some(), true);
            }
            return Ok(found);
        }

        trace!(op, node = self.0.hash, "cache miss");
        let computed = compute().inspect_err(|err| debug!(op, %err, "query failed"))?;
        let found = cell.get_or_init(|| Memo::capture(self, computed)).restore(self);
        if let Some(id) = query_id {
            query_trace::unary_end(id, op, found.is_some(), false);
        }
        Ok(found)
    }

    /// For a variable node, the node of the non-variable descriptor the
    /// variable stands for: its binding, or when unbound its first declared
    /// bound. Queries on variable nodes are answered by this node.
    pub(crate) fn variable_target(&self) -> Result<Option<TypeInfo>> {
        let TypeDescriptor::Variable(var) = &self.0.descriptor else {
            return Ok(None);
        };
        self.memoized(&self.0.variable_target, "variable_target", || {
            match self.variable_target_descriptor(*var) {
                Some(target) => self.create_info(&target).map(Some),
                None => Ok(None),
            }
        })
    }

    fn variable_target_descriptor(&self, var: TypeVarId) -> Option<TypeDescriptor> {
        let bindings = &self.0.bindings;
        let mut guard = RecursionGuard::with_profile(RecursionProfile::RawTypeResolution);
        let mut entered = Vec::new();
        let mut current = bindings.flatten(&TypeDescriptor::Variable(var));

        let target = loop {
            match current {
                TypeDescriptor::Variable(unbound) => {
                    if bindings.contains(unbound) || !guard.enter(unbound).is_entered() {
                        break None;
                    }
                    entered.push(unbound);
                    match self.hierarchy().type_param_bounds(unbound).into_iter().next() {
                        Some(bound) => current = bindings.flatten(&bound),
                        None => break None,
                    }
                }
                TypeDescriptor::Wildcard { .. } => match current.representative_bound() {
                    Some(bound) => current = bindings.flatten(bound),
                    None => break None,
                },
                other => break Some(other),
            }
        };

        for var in entered.into_iter().rev() {
            guard.leave(var);
        }
        target
    }

    // -------------------------------------------------------------------------
    // Type arguments
    // -------------------------------------------------------------------------

    /// The node's own type arguments. Empty unless this is a parametrized
    /// node or a variable standing for one.
    pub fn type_arguments(&self) -> Result<TypeArguments> {
        if let Some(target) = self.variable_target()? {
            return target.type_arguments();
        }
        if let Some(memos) = self.0.type_arguments.get() {
            return Ok(memos.iter().filter_map(|memo| memo.restore(self)).collect());
        }

        let arguments: TypeArguments = match &self.0.descriptor {
            TypeDescriptor::Parametrized { args, .. } => args
                .iter()
                .map(|arg| self.create_info(arg))
                .collect::<Result<_>>()?,
            TypeDescriptor::SyntheticParametrized { args, .. } => args.iter().cloned().collect(),
            _ => TypeArguments::new(),
        };
        let memos = self.0.type_arguments.get_or_init(|| {
            arguments
                .into_iter()
                .map(|arg| Memo::capture(self, Some(arg)))
                .collect()
        });
        Ok(memos.iter().filter_map(|memo| memo.restore(self)).collect())
    }

    /// The `index`-th argument this type supplies to the generic class
    /// `base`.
    ///
    /// Read from the parametrized supertype view of `base` when there is one,
    /// otherwise from the raw argument resolution of the hierarchy.
    pub(crate) fn type_argument(&self, base: ClassId, index: usize) -> Result<Option<TypeInfo>> {
        if let Some(view) = self.super_type_information(&RawType::Class(base))? {
            if view.kind() == TypeInfoKind::Parametrized {
                return Ok(view.type_arguments()?.into_iter().nth(index));
            }
        }
        match self.hierarchy().resolve_type_arguments(self.raw_type(), base) {
            Some(args) => args
                .into_iter()
                .nth(index)
                .map(|raw| self.create_info(&TypeDescriptor::Nominal(raw)))
                .transpose(),
            None => Ok(None),
        }
    }

    // -------------------------------------------------------------------------
    // Containers
    // -------------------------------------------------------------------------

    /// Whether the classification oracle considers the raw type a map.
    pub fn is_map(&self) -> bool {
        self.0.env.oracle.is_map_like(self.raw_type())
    }

    /// Arrays, `Iterable` itself, anything streamable, and whatever the
    /// classification oracle marks as a collection.
    pub fn is_collection_like(&self) -> bool {
        let raw = self.raw_type();
        let well_known = self.hierarchy().well_known();
        raw.is_array()
            || raw.class_id() == Some(well_known.iterable)
            || self
                .hierarchy()
                .is_assignable(&RawType::Class(well_known.streamable), raw)
            || self.0.env.oracle.is_collection_like(raw)
    }

    pub fn is_nullable_wrapper(&self) -> bool {
        self.0.env.oracle.is_nullable_wrapper(self.raw_type())
    }

    /// The element or payload type.
    ///
    /// Checked in order: array element, map key, iterable element, wrapped
    /// value, then the first type argument.
    pub fn component_type(&self) -> Result<Option<TypeInfo>> {
        self.memoized(&self.0.component, "component_type", || self.compute_component_type())
    }

    fn compute_component_type(&self) -> Result<Option<TypeInfo>> {
        if let Some(target) = self.variable_target()? {
            return target.component_type();
        }

        let raw = self.raw_type();
        if let RawType::Array(component) = raw {
            let element = match &self.0.descriptor {
                TypeDescriptor::Array(element) => (**element).clone(),
                _ => TypeDescriptor::Nominal((**component).clone()),
            };
            return self.create_info(&element).map(Some);
        }
        if self.is_map() {
            return self.type_argument(self.0.env.oracle.map_base_type(raw), 0);
        }
        let iterable = self.hierarchy().well_known().iterable;
        if self.hierarchy().is_assignable(&RawType::Class(iterable), raw) {
            return self.type_argument(iterable, 0);
        }
        if self.is_nullable_wrapper() {
            if let Some(class) = raw.class_id() {
                return self.type_argument(class, 0);
            }
        }
        Ok(self.type_arguments()?.into_iter().next())
    }

    /// The value type of a map, or the second type argument of anything
    /// else.
    pub fn map_value_type(&self) -> Result<Option<TypeInfo>> {
        self.memoized(&self.0.map_value, "map_value_type", || {
            if let Some(target) = self.variable_target()? {
                return target.map_value_type();
            }
            if self.is_map() {
                return self.type_argument(self.0.env.oracle.map_base_type(self.raw_type()), 1);
            }
            Ok(self.type_arguments()?.into_iter().nth(1))
        })
    }

    /// The type that holds the payload, one container layer down: the value
    /// type of a map, the component type of a collection or wrapper, and
    /// the node itself otherwise.
    pub fn actual_type(&self) -> Result<Option<TypeInfo>> {
        if self.is_map() {
            return self.map_value_type();
        }
        if self.is_collection_like() || self.is_nullable_wrapper() {
            return self.component_type();
        }
        Ok(Some(self.clone()))
    }

    // -------------------------------------------------------------------------
    // Member signatures
    // -------------------------------------------------------------------------

    /// The node members of `owner` are promoted in: this node, or its
    /// supertype view of `owner` when the member is inherited.
    pub(crate) fn member_context(&self, owner: ClassId) -> Result<TypeInfo> {
        if self.raw_type().class_id() == Some(owner) {
            return Ok(self.clone());
        }
        Ok(self
            .super_type_information(&RawType::Class(owner))?
            .unwrap_or_else(|| self.clone()))
    }

    /// Return type of `method` in this node's context; `None` for `void`.
    pub fn return_type(&self, method: &MethodDef) -> Result<Option<TypeInfo>> {
        let Some(return_type) = &method.return_type else {
            return Ok(None);
        };
        self.member_context(method.owner)?.create_info(return_type).map(Some)
    }

    pub fn parameter_types(&self, method: &MethodDef) -> Result<Vec<TypeInfo>> {
        let context = self.member_context(method.owner)?;
        method.params.iter().map(|param| context.create_info(param)).collect()
    }

    pub fn constructor_parameter_types(&self, constructor: &ConstructorDef) -> Result<Vec<TypeInfo>> {
        let context = self.member_context(constructor.owner)?;
        constructor
            .params
            .iter()
            .map(|param| context.create_info(param))
            .collect()
    }
}

/// Bindings of a parametrized node: the parent's, plus each declared
/// parameter bound to its argument.
///
/// Every argument is substituted against `parent` before any parameter is
/// rebound, so `Pair<V, K>` inside `Pair<K, V>` swaps instead of collapsing.
fn parametrized_bindings(
    parent: &BindingMap,
    params: Vec<TypeVarId>,
    args: impl IntoIterator<Item = TypeDescriptor>,
) -> BindingMap {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::BindingChain);
    let resolved: Vec<(TypeVarId, TypeDescriptor)> = params
        .into_iter()
        .zip(args)
        .map(|(param, arg)| (param, substitute(&arg, parent, &mut guard)))
        // `Foo<T>` inside `Foo` would otherwise bind T to itself.
        .filter(|(param, arg)| *arg != TypeDescriptor::Variable(*param))
        .collect();
    parent.extended(resolved)
}

fn substitute(
    descriptor: &TypeDescriptor,
    bindings: &BindingMap,
    guard: &mut RecursionGuard<TypeVarId>,
) -> TypeDescriptor {
    match descriptor {
        TypeDescriptor::Nominal(_) => descriptor.clone(),
        TypeDescriptor::Parametrized { raw, args } => TypeDescriptor::Parametrized {
            raw: *raw,
            args: args
                .iter()
                .map(|arg| substitute(arg, bindings, guard))
                .collect(),
        },
        TypeDescriptor::SyntheticParametrized { base, args } => TypeDescriptor::Parametrized {
            raw: *base,
            args: args.iter().map(TypeInfo::resolved_descriptor).collect(),
        },
        TypeDescriptor::Variable(var) => {
            let Some(bound) = bindings.lookup(*var) else {
                return descriptor.clone();
            };
            if bound.is_variable() || !guard.enter(*var).is_entered() {
                return bound;
            }
            let resolved = substitute(&bound, bindings, guard);
            guard.leave(*var);
            resolved
        }
        TypeDescriptor::Array(element) => match substitute(element, bindings, guard) {
            TypeDescriptor::Nominal(raw) => TypeDescriptor::Nominal(RawType::array_of(raw)),
            other => TypeDescriptor::array(other),
        },
        TypeDescriptor::Wildcard { .. } => match descriptor.representative_bound() {
            Some(bound) => substitute(bound, bindings, guard),
            None => descriptor.clone(),
        },
    }
}

fn unsupported(descriptor: &TypeDescriptor) -> ResolveError {
    let err = ResolveError::UnsupportedType {
        descriptor: format!("{descriptor:?}"),
    };
    debug!(%err, "create_info");
    err
}

// =============================================================================
// Identity
// =============================================================================

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (a, b) = (&*self.0, &*other.0);
        if a.kind != b.kind || a.hash != b.hash || a.descriptor != b.descriptor {
            return false;
        }
        (a.bindings.is_empty() && b.bindings.is_empty()) || a.bindings == b.bindings
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("kind", &self.0.kind)
            .field("descriptor", &self.0.descriptor)
            .field("bindings", &self.0.bindings.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/type_info_tests.rs"]
mod tests;
