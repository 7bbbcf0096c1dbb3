//! *Abstract Syntax Tree* for the operation documents produced by the synthesizer.
//!
//! The tree covers the executable subset of the GraphQL [syntactic grammar]
//! that synthesis can emit (operations, variables, fields, inline fragments, values)
//! plus the field and input value definitions shared with [`Schema`][crate::Schema].
//! Fragment definitions and spreads are never produced, so they are not represented.
//!
//! [syntactic grammar]: https://spec.graphql.org/October2021/#sec-Language
//!
//! ## Structural sharing
//!
//! Nodes are wrapped in [`Node`], a reference-counted smart pointer.
//! A document returned by the synthesizer shares structurally equal subtrees
//! with every other document interned through the same
//! [`InternCache`][crate::intern::InternCache].
//! To modify a node, the [`make_mut`][Node::make_mut] method provides copy-on-write semantics,
//! leaving the canonical instance untouched.
//!
//! ## Serialization
//!
//! Node types implement [`Display`][std::fmt::Display]
//! and [`ToString`] by serializing to GraphQL syntax with a default configuration.
//! [`serialize`][OperationDefinition::serialize] methods return a builder
//! that has chaining methods for setting serialization configuration,
//! and also implements `Display` and `ToString`.

use crate::Name;
use crate::Node;

pub(crate) mod impls;
pub(crate) mod serialize;

pub use self::impls::InvalidOperationTypeError;
pub use self::serialize::Serialize;

/// Refers to the name of a GraphQL type defined elsewhere
pub type NamedType = Name;

/// An operation document: the root of everything the synthesizer returns
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<Node<VariableDefinition>>,
    pub directives: DirectiveList,
    pub selection_set: Node<SelectionSet>,
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<OperationDefinition>();
    assert_sync::<OperationDefinition>();
};

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Node<Type>,
    pub default_value: Option<Node<Value>>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    Named(NamedType),
    NonNullNamed(NamedType),
    List(Box<Type>),
    NonNullList(Box<Type>),
}

/// An ordered list of selections.
///
/// Sets built by the synthesizer are never empty:
/// a field or fragment whose selection would be empty is omitted instead.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Selection {
    Field(Node<Field>),
    InlineFragment(Node<InlineFragment>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
    pub directives: DirectiveList,
    /// `None` for leaf fields
    pub selection_set: Option<Node<SelectionSet>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<NamedType>,
    pub directives: DirectiveList,
    pub selection_set: Node<SelectionSet>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Argument {
    pub name: Name,
    pub value: Node<Value>,
}

#[derive(Clone, Eq, PartialEq, Default)]
pub struct DirectiveList(pub Vec<Node<Directive>>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Node<Argument>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Null,
    Enum(Name),
    Variable(Name),
    String(
        /// The value after escape sequences are resolved
        String,
    ),
    Float(FloatValue),
    Int(IntValue),
    Boolean(bool),
    List(Vec<Node<Value>>),
    Object(Vec<(Name, Node<Value>)>),
}

/// An integer literal, kept as its source text
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct IntValue(String);

/// A float literal, kept as its source text
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct FloatValue(String);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub arguments: Vec<Node<InputValueDefinition>>,
    pub ty: Type,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub ty: Node<Type>,
    pub default_value: Option<Node<Value>>,
    pub directives: DirectiveList,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumValueDefinition {
    pub description: Option<String>,
    pub value: Name,
    pub directives: DirectiveList,
}

/// Kind tag of the nodes that can be interned.
///
/// Each kind has its own partition in an [`InternCache`][crate::intern::InternCache],
/// so nodes of different kinds never compare as equal even if their signatures collide.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKind {
    OperationDefinition,
    VariableDefinition,
    Type,
    SelectionSet,
    Field,
    InlineFragment,
    Argument,
    Directive,
    Value,
}
