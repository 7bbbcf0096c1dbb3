use apollo_synthesizer::ast::OperationType;
use apollo_synthesizer::ast::Type;
use apollo_synthesizer::name;
use apollo_synthesizer::schema::BuildError;
use apollo_synthesizer::schema::ExtendedType;
use apollo_synthesizer::schema::ObjectType;
use apollo_synthesizer::schema::ScalarType;
use apollo_synthesizer::Schema;
use pretty_assertions::assert_eq;

#[test]
fn builds_the_type_graph_in_declaration_order() {
    let schema = Schema::parse(
        r#"
        "The root"
        type Query {
            search(term: String!, first: Int = 10): [Result!]!
        }

        union Result = User | Post

        interface Node {
            id: ID!
        }

        type User implements Node {
            id: ID!
        }

        type Post implements Node {
            id: ID!
        }

        enum Order { NEWEST OLDEST }

        input Filter {
            order: Order = NEWEST
        }

        scalar Date
        directive @cached on FIELD_DEFINITION
        "#,
    )
    .unwrap();

    let names: Vec<_> = schema
        .types
        .keys()
        .filter(|name| !schema.types[*name].is_built_in())
        .map(|name| name.as_str())
        .collect();
    assert_eq!(
        names,
        ["Query", "Result", "Node", "User", "Post", "Order", "Filter", "Date"]
    );
    assert_eq!(
        schema.root_operation(OperationType::Query),
        Some(&name!("Query"))
    );
    assert_eq!(schema.root_operation(OperationType::Mutation), None);
    assert!(schema.is_root_type("Query"));
    assert!(!schema.is_root_type("User"));
    assert_eq!(schema.types["Query"].description(), Some("The root"));

    let search = schema.type_field("Query", "search").unwrap();
    assert_eq!(search.ty.to_string(), "[Result!]!");
    assert_eq!(search.ty.inner_named_type(), "Result");
    let term = search.argument_by_name("term").unwrap();
    assert!(term.is_required());
    let first = search.argument_by_name("first").unwrap();
    assert!(!first.is_required());
    assert_eq!(first.default_value.as_ref().unwrap().to_i32(), Some(10));

    let members: Vec<_> = schema.get_union("Result").unwrap().members.iter().collect();
    assert_eq!(members, [&name!("User"), &name!("Post")]);

    let implementers = schema.implementers_map();
    let objects: Vec<_> = implementers["Node"].objects.iter().collect();
    assert_eq!(objects, [&name!("User"), &name!("Post")]);
    assert!(schema.is_subtype("Node", "Post"));
    assert!(schema.is_subtype("Result", "User"));
    assert!(!schema.is_subtype("Result", "Query"));

    assert!(schema.types["Order"].is_leaf());
    assert!(schema.types["Date"].is_leaf());
    assert!(!schema.types["Filter"].is_leaf());
}

#[test]
fn type_kinds_and_default_values() {
    let schema = Schema::parse(
        r#"
        type Query {
            feed(filter: Filter = { order: NEWEST, tags: ["a"], draft: false, after: null }): [Item]
        }

        interface Item @key(fields: "id") {
            id: ID!
        }

        type Post implements Item {
            id: ID!
        }

        union Result = Post

        enum Order { NEWEST OLDEST }

        input Filter {
            order: Order
            tags: [String!]
            draft: Boolean
            after: String
        }
        "#,
    )
    .unwrap();

    assert!(schema.types["Query"].is_object());
    assert!(schema.types["Item"].is_interface());
    assert!(schema.types["Result"].is_union());
    assert!(schema.types["Order"].is_enum());
    assert!(schema.types["Filter"].is_input_object());
    assert!(!schema.types["Filter"].is_scalar());

    let item = schema.get_interface("Item").unwrap();
    let key = &item.directives[0];
    assert_eq!(key.name, "key");
    assert_eq!(key.argument_by_name("fields").unwrap().as_str(), Some("id"));
    assert!(schema.get_interface("Post").is_none());

    let filter = schema.type_field("Query", "feed").unwrap().argument_by_name("filter").unwrap();
    let default = filter.default_value.as_ref().unwrap().as_object().unwrap();
    let fields: Vec<_> = default.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(fields, ["order", "tags", "draft", "after"]);
    assert_eq!(default[0].1.as_enum(), Some(&name!("NEWEST")));
    let tags = default[1].1.as_list().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].as_str(), Some("a"));
    assert_eq!(default[2].1.to_bool(), Some(false));
    assert!(default[3].1.is_null());
    assert_eq!(default[3].1.as_enum(), None);
}

#[test]
fn extensions_are_folded_into_their_type() {
    let schema = Schema::parse(
        r#"
        extend type User {
            email: String
        }

        type Query {
            me: User
        }

        type User {
            id: ID!
        }

        extend union Result = User
        union Result = Query

        extend enum Order { OLDEST }
        enum Order { NEWEST }
        "#,
    )
    .unwrap();

    let fields: Vec<_> = schema
        .get_object("User")
        .unwrap()
        .fields
        .keys()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(fields, ["id", "email"]);
    let members: Vec<_> = schema.get_union("Result").unwrap().members.iter().collect();
    assert_eq!(members, [&name!("Query"), &name!("User")]);
    let values: Vec<_> = schema.get_enum("Order").unwrap().values.keys().collect();
    assert_eq!(values, [&name!("NEWEST"), &name!("OLDEST")]);
}

#[test]
fn explicit_schema_definition() {
    let schema = Schema::parse(
        r#"
        schema {
            query: Root
        }

        extend schema {
            mutation: Change
        }

        type Root { a: Int }
        type Change { b: Int }
        type Query { c: Int }
        "#,
    )
    .unwrap();
    assert_eq!(
        schema.root_operation(OperationType::Query),
        Some(&name!("Root"))
    );
    assert_eq!(
        schema.root_operation(OperationType::Mutation),
        Some(&name!("Change"))
    );
    let roots: Vec<_> = schema.root_type_names().collect();
    assert_eq!(roots, [&name!("Root"), &name!("Change")]);
    assert!(!schema.is_root_type("Query"));
}

#[test]
fn build_errors_keep_the_partial_schema() {
    let error = Schema::parse(
        r#"
        type Query { a: Int }
        type Query { b: Int }
        scalar String
        extend type Missing { c: Int }
        extend schema { mutation: Query }
        type Dup { x: Int x: String }
        extend scalar Query @tag
        query Operation { a }
        "#,
    )
    .unwrap_err();

    assert_eq!(
        error.errors,
        [
            BuildError::TypeDefinitionCollision {
                name: name!("Query")
            },
            BuildError::BuiltInScalarTypeRedefinition {
                name: name!("String")
            },
            BuildError::ComponentNameCollision {
                type_name: name!("Dup"),
                name: name!("x"),
                describe: "field",
            },
            BuildError::TypeExtensionKindMismatch {
                name: name!("Query"),
                describe_ext: "a scalar type extension",
                describe_def: "an object type",
            },
            BuildError::ExecutableDefinition {
                describe: "an operation definition"
            },
            BuildError::OrphanSchemaExtension,
            BuildError::OrphanTypeExtension {
                name: name!("Missing")
            },
        ]
    );
    assert!(error
        .to_string()
        .starts_with("7 error(s) while building the schema: the type `Query` is defined multiple times"));

    // The first definition of `Query` was kept
    let query = error.partial.get_object("Query").unwrap();
    assert!(query.fields.contains_key("a"));
    assert!(!query.fields.contains_key("b"));
    assert_eq!(
        error.partial.root_operation(OperationType::Query),
        Some(&name!("Query"))
    );
}

#[test]
fn schema_definition_conflicts() {
    let error = Schema::parse(
        r#"
        schema { query: Query }
        schema { query: Other }
        extend schema { query: Other }
        type Query { a: Int }
        type Other { b: Int }
        "#,
    )
    .unwrap_err();
    assert_eq!(
        error.errors,
        [
            BuildError::SchemaDefinitionCollision,
            BuildError::DuplicateRootOperation {
                operation_type: "query"
            },
        ]
    );
    assert_eq!(
        error.partial.root_operation(OperationType::Query),
        Some(&name!("Query"))
    );
}

#[test]
fn syntax_errors_are_reported() {
    let error = Schema::parse("type Query { a: }").unwrap_err();
    assert!(matches!(
        error.errors[0],
        BuildError::SyntaxError { .. }
    ));
}

#[test]
fn programmatic_types() {
    let mut builder = Schema::builder();
    builder.add_type(ScalarType {
        description: None,
        name: name!("Date"),
        directives: Default::default(),
    });
    builder.add_document("extend type Query { today: Date }");
    builder.add_type(ObjectType {
        description: None,
        name: name!("Query"),
        implements_interfaces: Default::default(),
        directives: Default::default(),
        fields: Default::default(),
    });
    let schema = builder.build().unwrap();

    let today = schema.type_field("Query", "today").unwrap();
    assert_eq!(today.ty, Type::Named(name!("Date")));
    assert!(matches!(schema.types["Date"], ExtendedType::Scalar(_)));
    assert_eq!(
        schema.root_operation(OperationType::Query),
        Some(&name!("Query"))
    );
}
