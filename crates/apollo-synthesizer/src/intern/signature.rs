use super::Internable;
use crate::ast::NodeKind;
use crate::Name;
use std::hash::BuildHasher;
use std::hash::Hash;
use std::hash::Hasher;

/// Content-derived key of an AST node.
///
/// Equal structures always have equal signatures.
/// The converse does not hold: distinct structures may collide,
/// either by plain hash collision or because they only differ
/// beyond the depth bound of the [`StructuralHasher`] that computed them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(u64);

impl Signature {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Reduced description of a node, standing in for its whole subtree
/// once the hasher is past its depth bound.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FeatureSummary {
    pub kind: NodeKind,
    /// Name, alias, type condition, or operation type, whichever identifies the node best
    pub label: Option<Name>,
    pub arguments: usize,
    pub selections: usize,
    pub directives: usize,
    pub variables: usize,
}

impl FeatureSummary {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            label: None,
            arguments: 0,
            selections: 0,
            directives: 0,
            variables: 0,
        }
    }
}

// Fixed seeds: signatures must not depend on per-process randomness.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Computes a [`Signature`] by writing a node's kind tag
/// then its kind-specific content in a fixed order.
///
/// Sub-nodes are written recursively up to `depth_bound` levels below the root.
/// Deeper sub-nodes only contribute their [`FeatureSummary`].
pub struct StructuralHasher {
    state: ahash::AHasher,
    depth: usize,
    depth_bound: usize,
}

impl StructuralHasher {
    pub fn new(depth_bound: usize) -> Self {
        Self {
            state: ahash::RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3])
                .build_hasher(),
            depth: 0,
            depth_bound,
        }
    }

    /// Consume the hasher, returning the signature of `node`
    pub fn signature<T: Internable>(mut self, node: &T) -> Signature {
        self.write_node(node);
        Signature(self.state.finish())
    }

    /// Write a sub-node: its full content within the depth bound, its summary beyond
    pub fn write_node<T: Internable>(&mut self, node: &T) {
        if self.depth > self.depth_bound {
            self.write_tag(b'S');
            node.feature_summary().hash(&mut self.state);
            return;
        }
        self.write_tag(b'N');
        T::KIND.hash(&mut self.state);
        self.depth += 1;
        node.write_content(self);
        self.depth -= 1;
    }

    /// Write a sequence whose order is significant
    pub fn write_seq<'a, T: Internable + 'a>(&mut self, items: impl ExactSizeIterator<Item = &'a T>) {
        self.write_len(items.len());
        for item in items {
            self.write_node(item)
        }
    }

    /// Write a sequence keyed by name, in name order.
    pub fn write_sorted<'a, T: Internable + 'a>(
        &mut self,
        items: impl IntoIterator<Item = (&'a Name, &'a T)>,
    ) {
        let mut items: Vec<_> = items.into_iter().collect();
        items.sort_by(|(a, _), (b, _)| a.cmp(b));
        self.write_len(items.len());
        for (name, item) in items {
            self.write_name(name);
            self.write_node(item)
        }
    }

    pub fn write_opt<T: Internable>(&mut self, item: Option<&T>) {
        match item {
            Some(item) => {
                self.write_tag(1);
                self.write_node(item)
            }
            None => self.write_tag(0),
        }
    }

    pub fn write_name(&mut self, name: &Name) {
        self.write_str(name)
    }

    pub fn write_opt_name(&mut self, name: Option<&Name>) {
        match name {
            Some(name) => {
                self.write_tag(1);
                self.write_name(name)
            }
            None => self.write_tag(0),
        }
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_len(value.len());
        self.state.write(value.as_bytes())
    }

    pub fn write_len(&mut self, len: usize) {
        self.state.write_usize(len)
    }

    pub fn write_tag(&mut self, tag: u8) {
        self.state.write_u8(tag)
    }
}
