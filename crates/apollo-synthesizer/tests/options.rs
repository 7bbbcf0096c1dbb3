use apollo_synthesizer::ast::OperationType;
use apollo_synthesizer::FieldSelection;
use apollo_synthesizer::SynthesisOptions;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn defaults() {
    let options = SynthesisOptions::default();
    assert!(options.models.is_empty());
    assert!(options.ignore.is_empty());
    assert_eq!(options.depth_limit, None);
    assert_eq!(options.circular_reference_depth, 1);
    assert_eq!(options.argument_names, None);
    assert_eq!(options.selected_fields, FieldSelection::All(true));

    let from_empty: SynthesisOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(from_empty, options);
    assert_eq!(
        serde_json::to_value(&options).unwrap(),
        json!({
            "models": [],
            "ignore": [],
            "depthLimit": null,
            "circularReferenceDepth": 1,
            "argumentNames": null,
            "selectedFields": true,
        })
    );
}

#[test]
fn from_configuration() {
    let config = json!({
        "models": ["User", "Post"],
        "ignore": ["Post.author"],
        "depthLimit": 4,
        "circularReferenceDepth": 2,
        "argumentNames": ["id", "user_posts_first"],
        "selectedFields": {
            "id": true,
            "name": false,
            "posts": { "title": true },
        },
    });
    let options: SynthesisOptions = serde_json::from_value(config.clone()).unwrap();
    let expected = SynthesisOptions::new()
        .models(["User", "Post"])
        .ignore(["Post.author"])
        .depth_limit(4)
        .circular_reference_depth(2)
        .argument_names(["id", "user_posts_first"])
        .selected_fields(FieldSelection::fields([
            ("id", FieldSelection::All(true)),
            ("name", FieldSelection::All(false)),
            (
                "posts",
                FieldSelection::fields([("title", FieldSelection::All(true))]),
            ),
        ]));
    assert_eq!(options, expected);
    assert_eq!(serde_json::to_value(&options).unwrap(), config);
}

#[test]
fn mistyped_values_are_rejected() {
    assert!(serde_json::from_str::<SynthesisOptions>(r#"{ "depthLimit": "deep" }"#).is_err());
    assert!(serde_json::from_str::<FieldSelection>(r#"{ "id": 1 }"#).is_err());
}

#[test]
fn operation_types() {
    let operation_type: OperationType = serde_json::from_str(r#""mutation""#).unwrap();
    assert_eq!(operation_type, OperationType::Mutation);
    assert_eq!(
        serde_json::to_string(&OperationType::Subscription).unwrap(),
        r#""subscription""#
    );
    assert!(serde_json::from_str::<OperationType>(r#""Query""#).is_err());
    assert_eq!("query".parse::<OperationType>().unwrap(), OperationType::Query);
    assert_eq!(OperationType::Query.to_string(), "query");
}
