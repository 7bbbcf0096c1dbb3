use apollo_synthesizer::ast::Argument;
use apollo_synthesizer::ast::Field;
use apollo_synthesizer::ast::NodeKind;
use apollo_synthesizer::ast::Selection;
use apollo_synthesizer::ast::SelectionSet;
use apollo_synthesizer::ast::Type;
use apollo_synthesizer::ast::Value;
use apollo_synthesizer::intern::CacheStats;
use apollo_synthesizer::intern::InternCache;
use apollo_synthesizer::intern::InternedNode;
use apollo_synthesizer::name;
use apollo_synthesizer::Name;
use apollo_synthesizer::Node;
use pretty_assertions::assert_eq;

fn object(fields: &[(&'static str, i32)]) -> Node<Value> {
    Node::new(Value::Object(
        fields
            .iter()
            .map(|&(name, value)| (Name::new_static(name).unwrap(), Node::new(value.into())))
            .collect(),
    ))
}

fn field(name: Name, arguments: Vec<Node<Argument>>) -> Node<Field> {
    Node::new(Field {
        alias: None,
        name,
        arguments,
        directives: Default::default(),
        selection_set: None,
    })
}

#[test]
fn equal_structures_share_one_instance() {
    let mut cache = InternCache::new();
    let a = cache.intern(object(&[("first", 1), ("second", 2)]));
    let b = cache.intern(object(&[("second", 2), ("first", 1)]));
    assert!(a.ptr_eq(&b));
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            collisions: 0
        }
    );

    let c = cache.intern(object(&[("first", 1), ("second", 3)]));
    assert!(!a.ptr_eq(&c));
    assert_eq!(cache.len_of(NodeKind::Value), 2);
}

#[test]
fn list_items_keep_their_order() {
    let mut cache = InternCache::new();
    let list = |items: [i32; 2]| {
        Node::new(Value::List(
            items.into_iter().map(|i| Node::new(i.into())).collect(),
        ))
    };
    let a = cache.intern(list([1, 2]));
    let b = cache.intern(list([2, 1]));
    assert!(!a.ptr_eq(&b));
    assert_ne!(cache.signature(&*a), cache.signature(&*b));
}

#[test]
fn argument_order_does_not_matter_for_fields() {
    let mut cache = InternCache::new();
    let first = field(
        name!("posts"),
        vec![(name!("first"), 10).into(), (name!("after"), "abc").into()],
    );
    let second = field(
        name!("posts"),
        vec![(name!("after"), "abc").into(), (name!("first"), 10).into()],
    );
    let first = cache.intern(first);
    let second = cache.intern(second);
    assert!(first.ptr_eq(&second));
}

#[test]
fn signatures_are_stable_across_caches() {
    let node = Node::new(Type::Named(name!("User")).non_null().list());
    let one = InternCache::new().signature(&*node);
    let other = InternCache::new().signature(&*node);
    assert_eq!(one, other);
    assert_eq!(one.as_u64(), other.as_u64());
    assert_eq!(one.to_string().len(), 16);
}

#[test]
fn interned_nodes_are_listed_by_kind() {
    let mut cache = InternCache::new();
    let id = cache.intern(field(name!("id"), Vec::new()));
    let name = cache.intern(field(name!("name"), Vec::new()));
    cache.intern(Node::new(SelectionSet::new(vec![
        Selection::Field(id.clone()),
        Selection::Field(name.clone()),
    ])));

    let fields: Vec<_> = cache
        .iter_kind(NodeKind::Field)
        .map(|node| match node {
            InternedNode::Field(field) => field.name.clone(),
            other => panic!("unexpected {:?} in field partition", other.kind()),
        })
        .collect();
    assert_eq!(fields, [name!("id"), name!("name")]);
    assert_eq!(cache.len(), 3);

    let lookup = cache
        .get(&SelectionSet::new(vec![
            Selection::Field(field(name!("id"), Vec::new())),
            Selection::Field(field(name!("name"), Vec::new())),
        ]))
        .unwrap();
    assert_eq!(lookup.len(), 2);
    assert!(cache
        .get(&SelectionSet::new(vec![
            Selection::Field(name),
            Selection::Field(id),
        ]))
        .is_none());
}

#[test]
fn shallow_signatures_still_keep_deep_differences_apart() {
    fn deep(innermost: i32) -> Node<Value> {
        let mut value = Node::new(Value::from(innermost));
        for _ in 0..6 {
            value = Node::new(Value::List(vec![value]));
        }
        value
    }
    let mut cache = InternCache::with_signature_depth(2);
    assert_eq!(cache.signature_depth(), 2);
    assert_eq!(cache.signature(&*deep(1)), cache.signature(&*deep(2)));

    let one = cache.intern(deep(1));
    let two = cache.intern(deep(2));
    assert!(!one.ptr_eq(&two));
    assert_eq!(*one, *deep(1));
    assert_eq!(*two, *deep(2));
    assert_eq!(cache.stats().collisions, 1);
    assert!(cache.intern(deep(2)).ptr_eq(&two));
}

#[test]
fn mutating_a_shared_node_leaves_the_canonical_instance_alone() {
    let mut cache = InternCache::new();
    let canonical = cache.intern(field(name!("id"), Vec::new()));
    let mut copy = canonical.clone();
    copy.make_mut().alias = Some(name!("identifier"));
    assert!(!copy.ptr_eq(&canonical));
    assert_eq!(canonical.alias, None);
    assert_ne!(copy, canonical);
    assert!(cache
        .intern(field(name!("id"), Vec::new()))
        .ptr_eq(&canonical));
}
