use std::fmt;

/// A thread-safe reference-counted smart pointer for GraphQL nodes.
///
/// Nodes produced by the synthesizer are shared between documents:
/// the [`InternCache`][crate::intern::InternCache] hands out clones of one canonical `Node`
/// for every structurally equal subtree, and [`ptr_eq`][Self::ptr_eq] tells them apart
/// from equal but separately allocated nodes.
///
/// Unlike [`std::sync::Arc<T>`], weak references are not supported.
pub struct Node<T>(triomphe::Arc<T>);

impl<T> Node<T> {
    #[inline]
    pub fn new(node: T) -> Self {
        Self(triomphe::Arc::new(node))
    }

    /// Returns whether two `Node`s point to the same memory allocation
    pub fn ptr_eq(&self, other: &Self) -> bool {
        triomphe::Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns a mutable reference to `T`, cloning it if necessary
    ///
    /// This is functionally equivalent to [`Arc::make_mut`][mm] from the standard library.
    ///
    /// A node obtained from an intern cache is shared by construction,
    /// so mutating it this way never alters the canonical instance.
    ///
    /// [mm]: https://doc.rust-lang.org/stable/std/sync/struct.Arc.html#method.make_mut
    pub fn make_mut(&mut self) -> &mut T
    where
        T: Clone,
    {
        triomphe::Arc::make_mut(&mut self.0)
    }
}

impl<T> std::ops::Deref for Node<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Node<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::fmt(self, f)
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::fmt(self, f)
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) // fast path
        || **self == **other
    }
}

impl<T> From<T> for Node<T> {
    fn from(node: T) -> Self {
        Self::new(node)
    }
}
