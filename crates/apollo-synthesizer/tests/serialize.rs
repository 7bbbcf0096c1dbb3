use apollo_synthesizer::ast::Argument;
use apollo_synthesizer::ast::Field;
use apollo_synthesizer::ast::InlineFragment;
use apollo_synthesizer::ast::OperationType;
use apollo_synthesizer::ast::Selection;
use apollo_synthesizer::ast::SelectionSet;
use apollo_synthesizer::ast::Type;
use apollo_synthesizer::ast::Value;
use apollo_synthesizer::name;
use apollo_synthesizer::synthesize;
use apollo_synthesizer::Name;
use apollo_synthesizer::Node;
use apollo_synthesizer::Schema;
use apollo_synthesizer::SynthesisOptions;
use expect_test::expect;
use pretty_assertions::assert_eq;

fn leaf(name: &'static str) -> Selection {
    Selection::Field(Node::new(Field {
        alias: None,
        name: Name::new_static(name).unwrap(),
        arguments: Vec::new(),
        directives: Default::default(),
        selection_set: None,
    }))
}

#[test]
fn values() {
    let list = Value::List(vec![
        Node::new(1.into()),
        Node::new(2.into()),
        Node::new(3.into()),
    ]);
    assert_eq!(list.serialize().no_indent().to_string(), "[1, 2, 3]");
    assert_eq!(list.to_string(), "[\n  1,\n  2,\n  3,\n]");

    let object = Value::Object(vec![
        (name!("a"), Node::new(1.into())),
        (name!("b"), Node::new("x".into())),
        (name!("c"), Node::new(Value::Enum(name!("ASC")))),
        (name!("d"), Node::new(Value::Null)),
    ]);
    assert_eq!(
        object.serialize().no_indent().to_string(),
        r#"{a: 1, b: "x", c: ASC, d: null}"#
    );
    assert_eq!(Value::Variable(name!("id")).to_string(), "$id");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::List(Vec::new()).to_string(), "[]");
}

#[test]
fn strings_are_escaped() {
    let value = Value::from("say \"hi\"\\\n\tthere\u{1}");
    assert_eq!(
        value.to_string(),
        "\"say \\\"hi\\\"\\\\\\n\tthere\\u0001\""
    );
    let value = Value::from("a\r\nb\u{8}c\u{c}\u{1f}é");
    assert_eq!(value.to_string(), "\"a\\r\\nb\\bc\\f\\u001Fé\"");
}

#[test]
fn types() {
    let user = Type::Named(name!("User"));
    assert_eq!(user.to_string(), "User");
    assert_eq!(user.clone().non_null().to_string(), "User!");
    assert_eq!(user.clone().non_null().list().to_string(), "[User!]");
    assert_eq!(
        user.clone().list().non_null().list().non_null().to_string(),
        "[[User]!]!"
    );
    assert_eq!(user.non_null().nullable().to_string(), "User");
}

#[test]
fn selections() {
    let fragment = Node::new(InlineFragment {
        type_condition: Some(name!("Post")),
        directives: Default::default(),
        selection_set: Node::new(SelectionSet::new(vec![leaf("title")])),
    });
    let field = Node::new(Field {
        alias: Some(name!("latest")),
        name: name!("posts"),
        arguments: vec![Node::new(Argument {
            name: name!("first"),
            value: Node::new(Value::Variable(name!("first"))),
        })],
        directives: Default::default(),
        selection_set: Some(Node::new(SelectionSet::new(vec![
            leaf("id"),
            Selection::InlineFragment(fragment),
        ]))),
    });
    assert_eq!(
        field.serialize().no_indent().to_string(),
        "latest: posts(first: $first) { id ... on Post { title } }"
    );
    expect![[r#"
        latest: posts(first: $first) {
          id
          ... on Post {
            title
          }
        }"#]]
    .assert_eq(&field.to_string());
    assert_eq!(
        field.serialize().indent_prefix("\t").initial_indent_level(1).to_string(),
        "\tlatest: posts(first: $first) {\n\t\tid\n\t\t... on Post {\n\t\t\ttitle\n\t\t}\n\t}"
    );
    assert_eq!(SelectionSet::new(Vec::new()).to_string(), "{}");
}

#[test]
fn schema_defaults_are_printed_in_variable_definitions() {
    let schema = Schema::parse(
        r#"
        type Query {
            posts(
                filter: PostFilter = { title: "a \"b\"", tags: ["x", "y"] }
                order: Order = NEWEST
                limit: Float = 2.5
            ): [Post]
        }

        type Post {
            id: ID!
        }

        input PostFilter {
            title: String
            tags: [String!]
        }

        enum Order {
            NEWEST
            OLDEST
        }
        "#,
    )
    .unwrap();
    let operation = synthesize(
        &schema,
        "posts",
        OperationType::Query,
        &SynthesisOptions::new(),
    )
    .unwrap();

    let expected = expect![[r#"
        query posts_query($filter: PostFilter = {title: "a \"b\"", tags: ["x", "y"]}, $order: Order = NEWEST, $limit: Float = 2.5) {
          posts(filter: $filter, order: $order, limit: $limit) {
            id
          }
        }"#]];
    expected.assert_eq(&operation.to_string());
    assert_eq!(
        operation.variables[0].to_string(),
        r#"$filter: PostFilter = {title: "a \"b\"", tags: ["x", "y"]}"#
    );
}
