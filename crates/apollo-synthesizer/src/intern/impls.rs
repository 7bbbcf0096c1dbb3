use super::FeatureSummary;
use super::InternedNode;
use super::Internable;
use super::StructuralHasher;
use crate::ast::*;
use crate::Name;
use crate::Node;

macro_rules! interned_variant {
    ($variant: ident) => {
        fn into_interned(node: Node<Self>) -> InternedNode {
            InternedNode::$variant(node)
        }

        fn from_interned(node: &InternedNode) -> Option<&Node<Self>> {
            if let InternedNode::$variant(node) = node {
                Some(node)
            } else {
                None
            }
        }
    };
}

fn same_node<T: Internable>(a: &Node<T>, b: &Node<T>) -> bool {
    a.ptr_eq(b) || a.same_structure(b)
}

fn same_seq<T: Internable>(a: &[Node<T>], b: &[Node<T>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same_node(a, b))
}

fn same_opt<T: Internable>(a: Option<&Node<T>>, b: Option<&Node<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_node(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Order-insensitive comparison of name-keyed entries.
/// Names are unique within arguments and input objects.
fn same_by_name<'a, T: Internable + 'a>(
    a: impl ExactSizeIterator<Item = (&'a Name, &'a Node<T>)>,
    b: impl Iterator<Item = (&'a Name, &'a Node<T>)> + Clone,
) -> bool {
    let mut b_len = 0;
    for _ in b.clone() {
        b_len += 1
    }
    a.len() == b_len
        && a.into_iter().all(|(name, a)| {
            b.clone()
                .find(|(other, _)| *other == name)
                .is_some_and(|(_, b)| same_node(a, b))
        })
}

fn same_arguments(a: &[Node<Argument>], b: &[Node<Argument>]) -> bool {
    same_by_name(
        a.iter().map(|arg| (&arg.name, &arg.value)),
        b.iter().map(|arg| (&arg.name, &arg.value)),
    )
}

fn write_arguments(hasher: &mut StructuralHasher, arguments: &[Node<Argument>]) {
    hasher.write_sorted(arguments.iter().map(|arg| (&arg.name, &*arg.value)))
}

impl Internable for OperationDefinition {
    const KIND: NodeKind = NodeKind::OperationDefinition;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        let Self {
            operation_type,
            name,
            variables,
            directives,
            selection_set,
        } = self;
        hasher.write_str(operation_type.name());
        hasher.write_opt_name(name.as_ref());
        hasher.write_seq(variables.iter().map(|var| &**var));
        hasher.write_seq(directives.iter().map(|dir| &**dir));
        hasher.write_node(&**selection_set);
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            label: self
                .name
                .clone()
                .or_else(|| Some(Name::new_static_unchecked(self.operation_type.name()))),
            selections: self.selection_set.len(),
            directives: self.directives.len(),
            variables: self.variables.len(),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self.operation_type == other.operation_type
            && self.name == other.name
            && same_seq(&self.variables, &other.variables)
            && same_seq(&self.directives, &other.directives)
            && same_node(&self.selection_set, &other.selection_set)
    }

    interned_variant!(OperationDefinition);
}

impl Internable for VariableDefinition {
    const KIND: NodeKind = NodeKind::VariableDefinition;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        let Self {
            name,
            ty,
            default_value,
            directives,
        } = self;
        hasher.write_name(name);
        hasher.write_node(&**ty);
        hasher.write_opt(default_value.as_deref());
        hasher.write_seq(directives.iter().map(|dir| &**dir));
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            label: Some(self.name.clone()),
            directives: self.directives.len(),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self.name == other.name
            && same_node(&self.ty, &other.ty)
            && same_opt(self.default_value.as_ref(), other.default_value.as_ref())
            && same_seq(&self.directives, &other.directives)
    }

    interned_variant!(VariableDefinition);
}

impl Internable for Type {
    const KIND: NodeKind = NodeKind::Type;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        // Wrappers are at most a few levels deep: always hashed in full
        match self {
            Type::Named(name) => {
                hasher.write_tag(0);
                hasher.write_name(name)
            }
            Type::NonNullNamed(name) => {
                hasher.write_tag(1);
                hasher.write_name(name)
            }
            Type::List(inner) => {
                hasher.write_tag(2);
                inner.write_content(hasher)
            }
            Type::NonNullList(inner) => {
                hasher.write_tag(3);
                inner.write_content(hasher)
            }
        }
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            label: Some(self.inner_named_type().clone()),
            arguments: usize::from(self.is_non_null()),
            selections: usize::from(self.is_list()),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self == other
    }

    interned_variant!(Type);
}

impl Internable for SelectionSet {
    const KIND: NodeKind = NodeKind::SelectionSet;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        hasher.write_len(self.selections.len());
        for selection in &self.selections {
            match selection {
                Selection::Field(field) => {
                    hasher.write_tag(0);
                    hasher.write_node(&**field)
                }
                Selection::InlineFragment(fragment) => {
                    hasher.write_tag(1);
                    hasher.write_node(&**fragment)
                }
            }
        }
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            selections: self.selections.len(),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self.selections.len() == other.selections.len()
            && self
                .selections
                .iter()
                .zip(&other.selections)
                .all(|pair| match pair {
                    (Selection::Field(a), Selection::Field(b)) => same_node(a, b),
                    (Selection::InlineFragment(a), Selection::InlineFragment(b)) => {
                        same_node(a, b)
                    }
                    _ => false,
                })
    }

    interned_variant!(SelectionSet);
}

impl Internable for Field {
    const KIND: NodeKind = NodeKind::Field;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        let Self {
            alias,
            name,
            arguments,
            directives,
            selection_set,
        } = self;
        hasher.write_name(name);
        hasher.write_opt_name(alias.as_ref());
        write_arguments(hasher, arguments);
        hasher.write_seq(directives.iter().map(|dir| &**dir));
        hasher.write_opt(selection_set.as_deref());
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            label: Some(self.response_key().clone()),
            arguments: self.arguments.len(),
            selections: self.selection_set.as_ref().map_or(0, |set| set.len()),
            directives: self.directives.len(),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self.name == other.name
            && self.alias == other.alias
            && same_arguments(&self.arguments, &other.arguments)
            && same_seq(&self.directives, &other.directives)
            && same_opt(self.selection_set.as_ref(), other.selection_set.as_ref())
    }

    interned_variant!(Field);
}

impl Internable for InlineFragment {
    const KIND: NodeKind = NodeKind::InlineFragment;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        let Self {
            type_condition,
            directives,
            selection_set,
        } = self;
        hasher.write_opt_name(type_condition.as_ref());
        hasher.write_seq(directives.iter().map(|dir| &**dir));
        hasher.write_node(&**selection_set);
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            label: self.type_condition.clone(),
            selections: self.selection_set.len(),
            directives: self.directives.len(),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self.type_condition == other.type_condition
            && same_seq(&self.directives, &other.directives)
            && same_node(&self.selection_set, &other.selection_set)
    }

    interned_variant!(InlineFragment);
}

impl Internable for Argument {
    const KIND: NodeKind = NodeKind::Argument;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        hasher.write_name(&self.name);
        hasher.write_node(&*self.value);
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            label: Some(self.name.clone()),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self.name == other.name && same_node(&self.value, &other.value)
    }

    interned_variant!(Argument);
}

impl Internable for Directive {
    const KIND: NodeKind = NodeKind::Directive;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        hasher.write_name(&self.name);
        write_arguments(hasher, &self.arguments);
    }

    fn feature_summary(&self) -> FeatureSummary {
        FeatureSummary {
            label: Some(self.name.clone()),
            arguments: self.arguments.len(),
            ..FeatureSummary::new(Self::KIND)
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        self.name == other.name && same_arguments(&self.arguments, &other.arguments)
    }

    interned_variant!(Directive);
}

impl Internable for Value {
    const KIND: NodeKind = NodeKind::Value;

    fn write_content(&self, hasher: &mut StructuralHasher) {
        match self {
            Value::Null => hasher.write_tag(0),
            Value::Enum(name) => {
                hasher.write_tag(1);
                hasher.write_name(name)
            }
            Value::Variable(name) => {
                hasher.write_tag(2);
                hasher.write_name(name)
            }
            Value::String(value) => {
                hasher.write_tag(3);
                hasher.write_str(value)
            }
            Value::Float(value) => {
                hasher.write_tag(4);
                hasher.write_str(value.as_str())
            }
            Value::Int(value) => {
                hasher.write_tag(5);
                hasher.write_str(value.as_str())
            }
            Value::Boolean(value) => {
                hasher.write_tag(6);
                hasher.write_tag(u8::from(*value))
            }
            Value::List(items) => {
                hasher.write_tag(7);
                hasher.write_seq(items.iter().map(|item| &**item))
            }
            Value::Object(fields) => {
                hasher.write_tag(8);
                hasher.write_sorted(fields.iter().map(|(name, value)| (name, &**value)))
            }
        }
    }

    fn feature_summary(&self) -> FeatureSummary {
        let summary = FeatureSummary::new(Self::KIND);
        match self {
            Value::Enum(name) | Value::Variable(name) => FeatureSummary {
                label: Some(name.clone()),
                ..summary
            },
            Value::List(items) => FeatureSummary {
                selections: items.len(),
                ..summary
            },
            Value::Object(fields) => FeatureSummary {
                arguments: fields.len(),
                ..summary
            },
            Value::Null
            | Value::String(_)
            | Value::Float(_)
            | Value::Int(_)
            | Value::Boolean(_) => summary,
        }
    }

    fn same_structure(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => same_seq(a, b),
            (Value::Object(a), Value::Object(b)) => same_by_name(
                a.iter().map(|(name, value)| (name, value)),
                b.iter().map(|(name, value)| (name, value)),
            ),
            (a, b) => a == b,
        }
    }

    interned_variant!(Value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::InternCache;
    use crate::name;

    fn field_with_arguments(arguments: Vec<(Name, Value)>) -> Node<Field> {
        Node::new(Field {
            alias: None,
            name: name!("user"),
            arguments: arguments.into_iter().map(Node::from).collect(),
            directives: Default::default(),
            selection_set: None,
        })
    }

    #[test]
    fn argument_order_is_not_significant() {
        let mut cache = InternCache::new();
        let a = field_with_arguments(vec![
            (name!("id"), Value::Variable(name!("id"))),
            (name!("first"), Value::from(10)),
        ]);
        let b = field_with_arguments(vec![
            (name!("first"), Value::from(10)),
            (name!("id"), Value::Variable(name!("id"))),
        ]);
        assert_eq!(cache.signature(&*a), cache.signature(&*b));
        let a = cache.intern(a);
        let b = cache.intern(b);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn object_field_order_is_not_significant_but_list_order_is() {
        let object = |fields: &[(&'static str, i32)]| {
            Value::Object(
                fields
                    .iter()
                    .map(|&(name, value)| (Name::new_static(name).unwrap(), Node::new(value.into())))
                    .collect(),
            )
        };
        let list = |items: &[i32]| {
            Value::List(items.iter().map(|&i| Node::new(Value::from(i))).collect())
        };
        assert!(object(&[("a", 1), ("b", 2)]).same_structure(&object(&[("b", 2), ("a", 1)])));
        assert!(!object(&[("a", 1), ("b", 2)]).same_structure(&object(&[("a", 2), ("b", 1)])));
        assert!(!list(&[1, 2]).same_structure(&list(&[2, 1])));

        let cache = InternCache::new();
        assert_eq!(
            cache.signature(&object(&[("a", 1), ("b", 2)])),
            cache.signature(&object(&[("b", 2), ("a", 1)]))
        );
        assert_ne!(cache.signature(&list(&[1, 2])), cache.signature(&list(&[2, 1])));
    }

    #[test]
    fn selection_order_is_significant() {
        let leaf = |name: Name| {
            Selection::Field(Node::new(Field {
                alias: None,
                name,
                arguments: Vec::new(),
                directives: Default::default(),
                selection_set: None,
            }))
        };
        let a = SelectionSet::new(vec![leaf(name!("id")), leaf(name!("name"))]);
        let b = SelectionSet::new(vec![leaf(name!("name")), leaf(name!("id"))]);
        assert!(!a.same_structure(&b));
        let cache = InternCache::new();
        assert_ne!(cache.signature(&a), cache.signature(&b));
    }

    #[test]
    fn alias_participates() {
        let field = |alias: Option<Name>| Field {
            alias,
            name: name!("friends"),
            arguments: Vec::new(),
            directives: Default::default(),
            selection_set: None,
        };
        assert!(!field(None).same_structure(&field(Some(name!("friendsListUser")))));
    }
}
