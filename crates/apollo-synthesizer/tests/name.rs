use apollo_synthesizer::name;
use apollo_synthesizer::Name;

#[test]
fn smoke_test() {
    let heap = Name::new("abc").unwrap();
    let static_ = Name::new_static("abc").unwrap();
    let heap_2 = heap.clone();
    let static_2 = static_.clone();
    assert_eq!(heap_2.as_str(), static_2.as_str());
    assert_eq!(heap_2, static_2);
    assert_eq!(static_2.as_static_str(), Some("abc"));
    assert_eq!(heap_2.as_static_str(), None);
    assert_eq!(name!(abc), heap);
}

#[test]
fn invalid_names() {
    for invalid in ["", "1abc", "a-b", "è"] {
        let error = Name::new(invalid).unwrap_err();
        assert_eq!(error.name, invalid);
        assert_eq!(
            error.to_string(),
            format!("`{invalid}` is not a valid GraphQL name")
        );
    }
    assert!(Name::new("_leading_underscore2").is_ok());
}

#[test]
fn serde() {
    let name: Name = serde_json::from_str(r#""userId""#).unwrap();
    assert_eq!(name, "userId");
    assert_eq!(serde_json::to_string(&name).unwrap(), r#""userId""#);

    let error = serde_json::from_str::<Name>(r#""1nvalid""#).unwrap_err();
    assert_eq!(
        error.to_string(),
        r#"invalid value: string "1nvalid", expected a string in GraphQL Name syntax at line 1 column 9"#
    );
}
