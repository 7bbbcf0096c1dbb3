//! The type graph operations are synthesized against.
//!
//! A [`Schema`] is built from SDL with [`Schema::parse`] or incrementally with
//! [`Schema::builder`]. Declaration order is preserved everywhere, so walking
//! the graph is deterministic.
//!
//! Validation is limited to what building the graph needs:
//! a field referencing an undeclared type is accepted here and treated as a leaf
//! by the synthesizer.

use crate::ast;
use crate::collections::IndexMap;
use crate::collections::IndexSet;
use crate::Name;
use crate::Node;

mod builder;

pub use self::builder::SchemaBuilder;
pub use crate::ast::EnumValueDefinition;
pub use crate::ast::FieldDefinition;
pub use crate::ast::InputValueDefinition;
pub use crate::ast::NamedType;
pub use crate::ast::Type;
pub use crate::ast::Value;

/// High-level representation of a GraphQL schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// The `schema` definition and its extensions, defining root operations
    pub schema_definition: SchemaDefinition,

    /// Built-in scalars and explicit types, in declaration order
    pub types: IndexMap<NamedType, ExtendedType>,
}

/// The `schema` definition and its extensions, defining root operations
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaDefinition {
    pub description: Option<String>,

    /// Name of the object type for the `query` root operation
    pub query: Option<NamedType>,

    /// Name of the object type for the `mutation` root operation
    pub mutation: Option<NamedType>,

    /// Name of the object type for the `subscription` root operation
    pub subscription: Option<NamedType>,
}

/// The definition of a named type, with all information from type extensions folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedType {
    Scalar(Node<ScalarType>),
    Object(Node<ObjectType>),
    Interface(Node<InterfaceType>),
    Union(Node<UnionType>),
    Enum(Node<EnumType>),
    InputObject(Node<InputObjectType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: ast::DirectiveList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<Name>,
    pub directives: ast::DirectiveList,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<Name>,
    pub directives: ast::DirectiveList,
    pub fields: IndexMap<Name, Node<FieldDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: ast::DirectiveList,

    /// Names of member object types, in declaration order
    pub members: IndexSet<NamedType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: ast::DirectiveList,
    pub values: IndexMap<Name, Node<EnumValueDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: ast::DirectiveList,
    pub fields: IndexMap<Name, Node<InputValueDefinition>>,
}

/// A collection of type names that implement an interface.
///
/// Concrete object types and derived interfaces are kept separately,
/// both in schema declaration order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Implementers {
    /// Names of the concrete types that implement an interface.
    pub objects: IndexSet<Name>,
    /// Names of the interfaces that implement an interface.
    pub interfaces: IndexSet<Name>,
}

/// Could not find the requested field definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLookupError<'schema> {
    NoSuchType,
    NoSuchField(&'schema NamedType, &'schema ExtendedType),
}

/// Names of the scalars every schema has without declaring them
pub const BUILT_IN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

impl Schema {
    /// Returns a schema containing only the built-in scalars.
    ///
    /// It can then be filled programatically.
    #[allow(clippy::new_without_default)] // not a great implicit default in generic contexts
    pub fn new() -> Self {
        let mut types = IndexMap::default();
        for name in BUILT_IN_SCALARS {
            let name = Name::new_static_unchecked(name);
            types.insert(
                name.clone(),
                ExtendedType::Scalar(Node::new(ScalarType {
                    description: None,
                    name,
                    directives: ast::DirectiveList::new(),
                })),
            );
        }
        Self {
            schema_definition: SchemaDefinition::default(),
            types,
        }
    }

    /// Parse a single SDL source text into a schema.
    ///
    /// Use [`builder()`][Self::builder] to build a schema from multiple documents.
    ///
    /// ```rust
    /// use apollo_synthesizer::Schema;
    ///
    /// let schema = Schema::parse("type Query { hello: String }").unwrap();
    /// assert!(schema.get_object("Query").is_some());
    /// ```
    pub fn parse(source_text: &str) -> Result<Self, SchemaError> {
        let mut builder = Self::builder();
        builder.add_document(source_text);
        builder.build()
    }

    /// Returns a new builder for creating a Schema from SDL documents,
    /// initialized with the built-in scalars
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Returns the type with the given name, if it is a object type
    pub fn get_object(&self, name: &str) -> Option<&Node<ObjectType>> {
        if let Some(ExtendedType::Object(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is a interface type
    pub fn get_interface(&self, name: &str) -> Option<&Node<InterfaceType>> {
        if let Some(ExtendedType::Interface(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is a union type
    pub fn get_union(&self, name: &str) -> Option<&Node<UnionType>> {
        if let Some(ExtendedType::Union(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is a enum type
    pub fn get_enum(&self, name: &str) -> Option<&Node<EnumType>> {
        if let Some(ExtendedType::Enum(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the name of the object type for the root operation with the given operation kind
    pub fn root_operation(&self, operation_type: ast::OperationType) -> Option<&NamedType> {
        match operation_type {
            ast::OperationType::Query => &self.schema_definition.query,
            ast::OperationType::Mutation => &self.schema_definition.mutation,
            ast::OperationType::Subscription => &self.schema_definition.subscription,
        }
        .as_ref()
    }

    /// Returns the names of every root operation type, in `query`, `mutation`, `subscription` order
    pub fn root_type_names(&self) -> impl Iterator<Item = &NamedType> {
        ast::OperationType::ALL
            .into_iter()
            .filter_map(move |operation_type| self.root_operation(operation_type))
    }

    /// Returns whether the named type is the root type of any operation
    pub fn is_root_type(&self, type_name: &str) -> bool {
        self.root_type_names().any(|name| name == type_name)
    }

    /// Returns the definition of a type’s field
    pub fn type_field(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Result<&Node<FieldDefinition>, FieldLookupError<'_>> {
        use ExtendedType::*;
        let (ty_def_name, ty_def) = self
            .types
            .get_key_value(type_name)
            .ok_or(FieldLookupError::NoSuchType)?;
        let explicit_field = match ty_def {
            Object(ty) => ty.fields.get(field_name),
            Interface(ty) => ty.fields.get(field_name),
            Scalar(_) | Union(_) | Enum(_) | InputObject(_) => None,
        };
        explicit_field.ok_or(FieldLookupError::NoSuchField(ty_def_name, ty_def))
    }

    /// Returns a map of interface names to names of types that implement that interface
    ///
    /// `Schema` only stores the inverse relationship
    /// (in [`ObjectType::implements_interfaces`] and [`InterfaceType::implements_interfaces`]),
    /// so iterating the implementers of an interface requires a linear scan
    /// of all types in the schema.
    /// If that is repeated for multiple interfaces,
    /// gathering them all at once amortizes that cost.
    pub fn implementers_map(&self) -> IndexMap<Name, Implementers> {
        let mut map = IndexMap::<Name, Implementers>::default();
        for (ty_name, ty) in &self.types {
            match ty {
                ExtendedType::Object(def) => {
                    for interface in &def.implements_interfaces {
                        map.entry(interface.clone())
                            .or_default()
                            .objects
                            .insert(ty_name.clone());
                    }
                }
                ExtendedType::Interface(def) => {
                    for interface in &def.implements_interfaces {
                        map.entry(interface.clone())
                            .or_default()
                            .interfaces
                            .insert(ty_name.clone());
                    }
                }
                ExtendedType::Scalar(_)
                | ExtendedType::Union(_)
                | ExtendedType::Enum(_)
                | ExtendedType::InputObject(_) => (),
            };
        }
        map
    }

    /// Returns whether `maybe_subtype` is a subtype of `abstract_type`, which means either:
    ///
    /// * `maybe_subtype` implements the interface `abstract_type`
    /// * `maybe_subtype` is a member of the union type `abstract_type`
    pub fn is_subtype(&self, abstract_type: &str, maybe_subtype: &str) -> bool {
        self.types.get(abstract_type).is_some_and(|ty| match ty {
            ExtendedType::Interface(_) => {
                self.types
                    .get(maybe_subtype)
                    .is_some_and(|maybe_subtype| match maybe_subtype {
                        ExtendedType::Object(subtype) => {
                            subtype.implements_interfaces.contains(abstract_type)
                        }
                        ExtendedType::Interface(subtype) => {
                            subtype.implements_interfaces.contains(abstract_type)
                        }
                        ExtendedType::Scalar(_)
                        | ExtendedType::Union(_)
                        | ExtendedType::Enum(_)
                        | ExtendedType::InputObject(_) => false,
                    })
            }
            ExtendedType::Union(union_type) => union_type.members.contains(maybe_subtype),
            ExtendedType::Scalar(_)
            | ExtendedType::Object(_)
            | ExtendedType::Enum(_)
            | ExtendedType::InputObject(_) => false,
        })
    }
}

impl ExtendedType {
    pub fn name(&self) -> &Name {
        match self {
            Self::Scalar(def) => &def.name,
            Self::Object(def) => &def.name,
            Self::Interface(def) => &def.name,
            Self::Union(def) => &def.name,
            Self::Enum(def) => &def.name,
            Self::InputObject(def) => &def.name,
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "a scalar type",
            Self::Object(_) => "an object type",
            Self::Interface(_) => "an interface type",
            Self::Union(_) => "a union type",
            Self::Enum(_) => "an enum type",
            Self::InputObject(_) => "an input object type",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, Self::Interface(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    pub fn is_input_object(&self) -> bool {
        matches!(self, Self::InputObject(_))
    }

    /// Returns wether this type is a leaf type: scalar or enum.
    ///
    /// Field selections must have sub-selections if and only if
    /// their inner named type is *not* a leaf field.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }

    /// Returns whether this is one of the built-in scalars
    pub fn is_built_in(&self) -> bool {
        self.is_scalar() && BUILT_IN_SCALARS.contains(&self.name().as_str())
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Scalar(ty) => ty.description.as_deref(),
            Self::Object(ty) => ty.description.as_deref(),
            Self::Interface(ty) => ty.description.as_deref(),
            Self::Union(ty) => ty.description.as_deref(),
            Self::Enum(ty) => ty.description.as_deref(),
            Self::InputObject(ty) => ty.description.as_deref(),
        }
    }
}

impl From<ScalarType> for ExtendedType {
    fn from(ty: ScalarType) -> Self {
        Self::Scalar(ty.into())
    }
}

impl From<ObjectType> for ExtendedType {
    fn from(ty: ObjectType) -> Self {
        Self::Object(ty.into())
    }
}

impl From<InterfaceType> for ExtendedType {
    fn from(ty: InterfaceType) -> Self {
        Self::Interface(ty.into())
    }
}

impl From<UnionType> for ExtendedType {
    fn from(ty: UnionType) -> Self {
        Self::Union(ty.into())
    }
}

impl From<EnumType> for ExtendedType {
    fn from(ty: EnumType) -> Self {
        Self::Enum(ty.into())
    }
}

impl From<InputObjectType> for ExtendedType {
    fn from(ty: InputObjectType) -> Self {
        Self::InputObject(ty.into())
    }
}

/// A definition skipped or rejected while building a [`Schema`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("syntax error at byte {index}: {message}")]
    SyntaxError { message: String, index: usize },

    #[error("a schema document must not contain {describe}")]
    ExecutableDefinition { describe: &'static str },

    #[error("must not have multiple `schema` definitions")]
    SchemaDefinitionCollision,

    #[error("the type `{name}` is defined multiple times in the schema")]
    TypeDefinitionCollision { name: Name },

    #[error("built-in scalar definitions must be omitted, found `{name}`")]
    BuiltInScalarTypeRedefinition { name: Name },

    #[error("schema extension without a schema definition")]
    OrphanSchemaExtension,

    #[error("type extension for undefined type `{name}`")]
    OrphanTypeExtension { name: Name },

    #[error("adding {describe_ext}, but `{name}` is {describe_def}")]
    TypeExtensionKindMismatch {
        name: Name,
        describe_ext: &'static str,
        describe_def: &'static str,
    },

    #[error("duplicate definitions for the `{operation_type}` root operation type")]
    DuplicateRootOperation { operation_type: &'static str },

    #[error("duplicate definitions for the `{name}` {describe} of `{type_name}`")]
    ComponentNameCollision {
        type_name: Name,
        name: Name,
        describe: &'static str,
    },
}

/// A schema that could not be built without errors.
///
/// The partially built schema is kept: definitions that caused errors are skipped,
/// everything else is present.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{} error(s) while building the schema: {}", .errors.len(), DisplayErrors(.errors))]
pub struct SchemaError {
    pub partial: Box<Schema>,
    pub errors: Vec<BuildError>,
}

struct DisplayErrors<'a>(&'a [BuildError]);

impl std::fmt::Display for DisplayErrors<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            std::fmt::Display::fmt(error, f)?;
        }
        Ok(())
    }
}
