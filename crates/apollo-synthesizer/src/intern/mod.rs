//! Structural interning of operation AST nodes.
//!
//! An [`InternCache`] maps each node to a canonical [`Node`] instance
//! shared by every structurally equal node interned through the same cache.
//! Lookups are keyed by ([`NodeKind`], [`Signature`]) and a signature match is only
//! accepted after a full structural comparison, so two nodes that merely collide
//! are never merged.
//!
//! Structural equality ignores the order of arguments and of input object fields,
//! while selections and list items keep their order.
//!
//! ```rust
//! use apollo_synthesizer::ast::{Field, Selection, SelectionSet};
//! use apollo_synthesizer::intern::InternCache;
//! use apollo_synthesizer::{name, Node};
//!
//! fn id_selection() -> Node<SelectionSet> {
//!     let id = Node::new(Field {
//!         alias: None,
//!         name: name!("id"),
//!         arguments: Vec::new(),
//!         directives: Default::default(),
//!         selection_set: None,
//!     });
//!     Node::new(SelectionSet::new(vec![Selection::Field(id)]))
//! }
//!
//! let mut cache = InternCache::new();
//! let a = cache.intern(id_selection());
//! let b = cache.intern(id_selection());
//! assert!(a.ptr_eq(&b));
//! ```

use crate::ast::Argument;
use crate::ast::Directive;
use crate::ast::Field;
use crate::ast::InlineFragment;
use crate::ast::NodeKind;
use crate::ast::OperationDefinition;
use crate::ast::SelectionSet;
use crate::ast::Type;
use crate::ast::Value;
use crate::ast::VariableDefinition;
use crate::collections::IndexMap;
use crate::Node;

mod impls;
mod signature;

pub use self::signature::FeatureSummary;
pub use self::signature::Signature;
pub use self::signature::StructuralHasher;

/// How many levels below a node its signature covers in full, by default
pub const DEFAULT_SIGNATURE_DEPTH: usize = 8;

/// An AST node type that an [`InternCache`] can canonicalize
pub trait Internable: Sized {
    /// The cache partition nodes of this type are stored in
    const KIND: NodeKind;

    /// Write the semantic content of this node, excluding its kind tag
    fn write_content(&self, hasher: &mut StructuralHasher);

    /// Cheap summary used in place of the content beyond the signature depth bound
    fn feature_summary(&self) -> FeatureSummary;

    /// Full-depth structural equality: the equivalence that signatures approximate
    fn same_structure(&self, other: &Self) -> bool;

    fn into_interned(node: Node<Self>) -> InternedNode;

    fn from_interned(node: &InternedNode) -> Option<&Node<Self>>;
}

/// A canonical node stored in an [`InternCache`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InternedNode {
    OperationDefinition(Node<OperationDefinition>),
    VariableDefinition(Node<VariableDefinition>),
    Type(Node<Type>),
    SelectionSet(Node<SelectionSet>),
    Field(Node<Field>),
    InlineFragment(Node<InlineFragment>),
    Argument(Node<Argument>),
    Directive(Node<Directive>),
    Value(Node<Value>),
}

impl InternedNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            InternedNode::OperationDefinition(_) => NodeKind::OperationDefinition,
            InternedNode::VariableDefinition(_) => NodeKind::VariableDefinition,
            InternedNode::Type(_) => NodeKind::Type,
            InternedNode::SelectionSet(_) => NodeKind::SelectionSet,
            InternedNode::Field(_) => NodeKind::Field,
            InternedNode::InlineFragment(_) => NodeKind::InlineFragment,
            InternedNode::Argument(_) => NodeKind::Argument,
            InternedNode::Directive(_) => NodeKind::Directive,
            InternedNode::Value(_) => NodeKind::Value,
        }
    }
}

/// Counters since the cache was created or last [reset][InternCache::reset]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Interned nodes that were replaced by an existing canonical node
    pub hits: u64,
    /// Interned nodes that became canonical
    pub misses: u64,
    /// Misses whose signature was already taken by a different structure
    pub collisions: u64,
}

type Partition = IndexMap<Signature, Vec<InternedNode>>;

/// Canonicalizing store mapping node signatures to shared node instances.
///
/// The cache never writes anything onto the nodes it stores:
/// nodes handed out before a [`reset`][Self::reset] remain valid and unchanged.
#[derive(Clone, Debug)]
pub struct InternCache {
    partitions: [Partition; NodeKind::ALL.len()],
    signature_depth: usize,
    stats: CacheStats,
}

impl Default for InternCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InternCache {
    pub fn new() -> Self {
        Self::with_signature_depth(DEFAULT_SIGNATURE_DEPTH)
    }

    /// Create a cache whose signatures cover `depth` levels below each node in full.
    ///
    /// Deeper levels only contribute a [`FeatureSummary`]: cheaper to compute,
    /// at the cost of more signature collisions to resolve by structural comparison.
    pub fn with_signature_depth(depth: usize) -> Self {
        Self {
            partitions: std::array::from_fn(|_| Partition::default()),
            signature_depth: depth,
            stats: CacheStats::default(),
        }
    }

    pub fn signature_depth(&self) -> usize {
        self.signature_depth
    }

    /// Compute the signature `node` is stored under in this cache
    pub fn signature<T: Internable>(&self, node: &T) -> Signature {
        StructuralHasher::new(self.signature_depth).signature(node)
    }

    /// Returns the canonical instance structurally equal to `node`.
    ///
    /// On a hit `node` is dropped and the stored instance is returned.
    /// On a miss `node` is stored and becomes canonical.
    pub fn intern<T: Internable>(&mut self, node: Node<T>) -> Node<T> {
        let signature = self.signature(&*node);
        let bucket = self.partitions[T::KIND.index()]
            .entry(signature)
            .or_default();
        for candidate in bucket.iter().filter_map(T::from_interned) {
            if candidate.ptr_eq(&node) || candidate.same_structure(&node) {
                self.stats.hits += 1;
                return candidate.clone();
            }
        }
        if !bucket.is_empty() {
            self.stats.collisions += 1;
            tracing::trace!(
                kind = %T::KIND,
                %signature,
                bucket = bucket.len(),
                "signature collision between distinct structures"
            );
        }
        self.stats.misses += 1;
        bucket.push(T::into_interned(node.clone()));
        node
    }

    /// Returns the canonical instance structurally equal to `node`, if any, without storing it
    pub fn get<T: Internable>(&self, node: &T) -> Option<&Node<T>> {
        self.partitions[T::KIND.index()]
            .get(&self.signature(node))?
            .iter()
            .filter_map(T::from_interned)
            .find(|candidate| candidate.same_structure(node))
    }

    /// Number of canonical nodes across every partition
    pub fn len(&self) -> usize {
        NodeKind::ALL.into_iter().map(|kind| self.len_of(kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(|partition| partition.is_empty())
    }

    /// Number of canonical nodes of one kind
    pub fn len_of(&self, kind: NodeKind) -> usize {
        self.partitions[kind.index()].values().map(Vec::len).sum()
    }

    /// Iterate canonical nodes of one kind, in insertion order of their signatures
    pub fn iter_kind(&self, kind: NodeKind) -> impl Iterator<Item = &InternedNode> {
        self.partitions[kind.index()].values().flatten()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every canonical node and clear the statistics.
    ///
    /// Call this between unrelated schemas to bound memory use.
    pub fn reset(&mut self) {
        tracing::debug!(
            nodes = self.len(),
            hits = self.stats.hits,
            misses = self.stats.misses,
            "resetting intern cache"
        );
        for partition in &mut self.partitions {
            partition.clear()
        }
        self.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Selection;
    use crate::name;
    use crate::Name;

    fn leaf(name: Name) -> Node<Field> {
        Node::new(Field {
            alias: None,
            name,
            arguments: Vec::new(),
            directives: Default::default(),
            selection_set: None,
        })
    }

    fn set(fields: Vec<Node<Field>>) -> Node<SelectionSet> {
        Node::new(SelectionSet::new(
            fields.into_iter().map(Selection::Field).collect(),
        ))
    }

    fn nested(depth: usize, innermost: Name) -> Node<SelectionSet> {
        let mut selection_set = set(vec![leaf(innermost)]);
        for _ in 0..depth {
            selection_set = set(vec![Node::new(Field {
                alias: None,
                name: name!("next"),
                arguments: Vec::new(),
                directives: Default::default(),
                selection_set: Some(selection_set),
            })]);
        }
        selection_set
    }

    #[test]
    fn kinds_are_partitioned() {
        let mut cache = InternCache::new();
        cache.intern(Node::new(Type::Named(name!("id"))));
        cache.intern(leaf(name!("id")));
        cache.intern(Node::new(Value::Enum(name!("id"))));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.len_of(NodeKind::Type), 1);
        assert_eq!(cache.len_of(NodeKind::Field), 1);
        assert_eq!(cache.len_of(NodeKind::Value), 1);
        assert_eq!(cache.len_of(NodeKind::SelectionSet), 0);
    }

    #[test]
    fn truncated_signatures_collide_but_are_not_merged() {
        let mut cache = InternCache::with_signature_depth(1);
        let a = nested(4, name!("id"));
        let b = nested(4, name!("name"));
        assert_eq!(cache.signature(&*a), cache.signature(&*b));

        let a_interned = cache.intern(a.clone());
        let b_interned = cache.intern(b.clone());
        assert!(a_interned.ptr_eq(&a));
        assert!(b_interned.ptr_eq(&b));
        assert_eq!(cache.len_of(NodeKind::SelectionSet), 2);
        assert_eq!(cache.stats().collisions, 1);

        let again = cache.intern(nested(4, name!("name")));
        assert!(again.ptr_eq(&b));
    }

    #[test]
    fn full_depth_signatures_tell_deep_differences_apart() {
        let cache = InternCache::new();
        let a = nested(4, name!("id"));
        let b = nested(4, name!("name"));
        assert_ne!(cache.signature(&*a), cache.signature(&*b));
    }

    #[test]
    fn get_does_not_store() {
        let mut cache = InternCache::new();
        let id = leaf(name!("id"));
        assert!(cache.get(&*id).is_none());
        assert!(cache.is_empty());
        let canonical = cache.intern(id);
        let found = cache.get(&*leaf(name!("id"))).unwrap();
        assert!(found.ptr_eq(&canonical));
    }

    #[test]
    fn reset_clears_partitions_and_stats() {
        let mut cache = InternCache::new();
        let first = cache.intern(leaf(name!("id")));
        cache.intern(leaf(name!("id")));
        assert_eq!(cache.stats().hits, 1);

        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());

        let second = cache.intern(leaf(name!("id")));
        assert!(!second.ptr_eq(&first));
        assert_eq!(*second, *first);
    }
}
