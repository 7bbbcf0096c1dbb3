use super::guard::CircularReferenceGuard;
use super::SynthesisOptions;
use crate::ast::Field;
use crate::ast::Selection;
use crate::ast::SelectionSet;
use crate::ast::VariableDefinition;
use crate::collections::HashMap;
use crate::collections::IndexMap;
use crate::intern::InternCache;
use crate::name;
use crate::schema::Implementers;
use crate::schema::Schema;
use crate::Name;
use crate::Node;

/// A variable definition together with the argument it was bound for
pub(crate) struct BoundVariable {
    /// Dot-joined field path and argument name, `posts.comments.limit`
    pub(crate) origin: String,
    pub(crate) definition: Node<VariableDefinition>,
}

/// State of a single synthesis call.
///
/// Created fresh for every operation, so nothing but the intern cache
/// carries over from one call to the next.
pub(crate) struct SynthesisContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) options: &'a SynthesisOptions,
    pub(crate) implementers: &'a IndexMap<Name, Implementers>,
    pub(crate) cache: &'a mut InternCache,
    /// Operation variables by name, in binding order
    pub(crate) variables: IndexMap<Name, BoundVariable>,
    /// Type string last seen for each dot-joined field path
    pub(crate) field_types: HashMap<String, String>,
    pub(crate) guard: CircularReferenceGuard,
    /// Names of the fields from the root field down to the one being resolved
    pub(crate) path: Vec<Name>,
}

impl<'a> SynthesisContext<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        options: &'a SynthesisOptions,
        implementers: &'a IndexMap<Name, Implementers>,
        cache: &'a mut InternCache,
    ) -> Self {
        Self {
            schema,
            options,
            implementers,
            cache,
            variables: IndexMap::default(),
            field_types: HashMap::default(),
            guard: CircularReferenceGuard::new(options.circular_reference_depth),
            path: Vec::new(),
        }
    }

    /// Run `f` with `field` appended to the current path
    pub(crate) fn with_field<R>(&mut self, field: Name, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(field);
        let result = f(self);
        self.path.pop();
        result
    }

    /// Whether `type_name` is a leaf: a scalar, an enum, or a type the schema does not define
    pub(crate) fn is_leaf(&self, type_name: &str) -> bool {
        self.schema
            .types
            .get(type_name)
            .map_or(true, |ty| ty.is_leaf())
    }

    /// Intern a selection set, or return `None` if there is nothing to select
    pub(crate) fn selection_set(&mut self, selections: Vec<Selection>) -> Option<Node<SelectionSet>> {
        if selections.is_empty() {
            return None;
        }
        Some(self.cache.intern(Node::new(SelectionSet::new(selections))))
    }

    /// The `{ id }` selection that model types collapse to
    pub(crate) fn id_selection(&mut self) -> Node<SelectionSet> {
        let id = self.cache.intern(Node::new(Field {
            alias: None,
            name: name!("id"),
            arguments: Vec::new(),
            directives: Default::default(),
            selection_set: None,
        }));
        self.cache
            .intern(Node::new(SelectionSet::new(vec![Selection::Field(id)])))
    }
}

impl AsMut<CircularReferenceGuard> for SynthesisContext<'_> {
    fn as_mut(&mut self) -> &mut CircularReferenceGuard {
        &mut self.guard
    }
}
