use crate::Name;

/// Tracks the object types enclosing the selection being built
/// and decides when descending into a type again would recurse too deep.
#[derive(Debug, Clone)]
pub(crate) struct CircularReferenceGuard {
    ancestors: Vec<Name>,
    threshold: usize,
}

impl CircularReferenceGuard {
    pub(crate) fn new(threshold: usize) -> Self {
        Self {
            ancestors: Vec::new(),
            threshold,
        }
    }

    /// Run `f` with `ty` pushed onto the ancestors of `holder`'s guard.
    ///
    /// The ancestor is popped again once `f` returns, however it returns.
    pub(crate) fn with_ancestor<C, R>(holder: &mut C, ty: Name, f: impl FnOnce(&mut C) -> R) -> R
    where
        C: AsMut<Self>,
    {
        holder.as_mut().ancestors.push(ty);
        let result = f(holder);
        holder.as_mut().ancestors.pop();
        result
    }

    /// Whether selecting a field of type `candidate` under the current ancestors
    /// would exceed the allowed number of occurrences of that type.
    ///
    /// Leaf types cannot recurse and are never circular.
    pub(crate) fn is_circular(&mut self, candidate: &Name, is_leaf: bool) -> bool {
        if is_leaf {
            return false;
        }
        Self::with_ancestor(self, candidate.clone(), |guard| {
            guard.occurrences(candidate) > guard.threshold
        })
    }

    fn occurrences(&self, ty: &Name) -> usize {
        self.ancestors
            .iter()
            .filter(|ancestor| *ancestor == ty)
            .count()
    }

    pub(crate) fn ancestors(&self) -> &[Name] {
        &self.ancestors
    }
}

impl AsMut<CircularReferenceGuard> for CircularReferenceGuard {
    fn as_mut(&mut self) -> &mut CircularReferenceGuard {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name;

    #[test]
    fn one_extra_descent_by_default() {
        let mut guard = CircularReferenceGuard::new(1);
        assert!(!guard.is_circular(&name!("User"), false));
        CircularReferenceGuard::with_ancestor(&mut guard, name!("User"), |guard| {
            assert!(guard.is_circular(&name!("User"), false));
            assert!(!guard.is_circular(&name!("Post"), false));
        });
        assert!(guard.ancestors().is_empty());
    }

    #[test]
    fn threshold_allows_deeper_recursion() {
        let mut guard = CircularReferenceGuard::new(2);
        CircularReferenceGuard::with_ancestor(&mut guard, name!("User"), |guard| {
            assert!(!guard.is_circular(&name!("User"), false));
            CircularReferenceGuard::with_ancestor(guard, name!("User"), |guard| {
                assert!(guard.is_circular(&name!("User"), false));
                assert_eq!(guard.ancestors().len(), 2);
            })
        });
    }

    #[test]
    fn leaves_are_never_circular() {
        let mut guard = CircularReferenceGuard::new(0);
        assert!(!guard.is_circular(&name!("String"), true));
        assert!(guard.is_circular(&name!("User"), false));
    }
}
