use serde_json::json;
use sovran_deepset::{
    get, set, set_all, set_with, ElementKind, IndexMap, Key, Keychain, SetError, SetOptions,
    TraversalOptions, TypedArray, Value, ValueKind,
};

fn set_order(value: &Value) -> Vec<Value> {
    value.as_set().unwrap().iter().cloned().collect()
}

#[test]
fn test_set_value_at_array_index() {
    let mut arr = Value::from(vec!["before"]);
    set(&mut arr, 0usize, "after").unwrap();
    assert_eq!(arr.as_array().unwrap()[0], Value::from("after"));
}

#[test]
fn test_set_value_for_map_key() {
    let mut map = Value::map();
    set(&mut map, "key", "value").unwrap();
    assert_eq!(
        map.as_map().unwrap().get(&Key::from("key")),
        Some(&Value::from("value"))
    );
}

#[test]
fn test_set_value_for_record_key() {
    let mut obj = Value::record();
    set(&mut obj, "key", "value").unwrap();
    assert_eq!(obj.as_record().unwrap()["key"], Value::from("value"));
}

#[test]
fn test_set_value_at_set_index() {
    let mut s = Value::set_of([1, 2, 3]);
    set(&mut s, 1usize, 5).unwrap();
    assert_eq!(
        set_order(&s),
        vec![Value::from(1), Value::from(5), Value::from(3)]
    );
}

#[test]
fn test_set_value_at_typed_array_index() {
    let mut arr = Value::from(TypedArray::new(ElementKind::Int32, 1));
    assert_eq!(arr.as_buffer().unwrap().get(0), Some(0.0));
    set(&mut arr, 0usize, 123).unwrap();
    assert_eq!(arr.as_buffer().unwrap().get(0), Some(123.0));
}

#[test]
fn test_returns_the_new_value() {
    let mut obj = Value::record();
    assert_eq!(set(&mut obj, "key", "value").unwrap(), Value::from("value"));
}

#[test]
fn test_type_error_on_non_object() {
    let mut obj = Value::from("string");
    let err = set(&mut obj, "key", "value").unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(
        err,
        SetError::NotAnObject {
            kind: ValueKind::String,
            key: Key::from("key"),
        }
    );
    assert_eq!(obj, Value::from("string"));
}

#[test]
fn test_type_error_on_nested_non_object() {
    let mut obj = Value::from(json!({"sub": "string"}));
    let err = set(&mut obj, ["sub", "key"], "value").unwrap_err();
    assert!(err.is_type_error());
    assert!(matches!(err, SetError::NotTraversable { kind: ValueKind::String, .. }));
    assert_eq!(obj, Value::from(json!({"sub": "string"})));
}

#[test]
fn test_null_is_not_descended_into() {
    let mut obj = Value::from(json!({"sub": null}));
    let err = set(&mut obj, ["sub", "key"], "value").unwrap_err();
    assert!(matches!(err, SetError::NotTraversable { kind: ValueKind::Null, .. }));
}

#[test]
fn test_set_nested_value_by_record_keychain() {
    let mut obj = Value::from(json!({"sub": {}}));
    set(&mut obj, ["sub", "key"], "value").unwrap();
    assert_eq!(get(&obj, ["sub", "key"]).as_deref(), Some(&Value::from("value")));
}

#[test]
fn test_creates_nested_records_if_necessary() {
    let mut obj = Value::record();
    set(&mut obj, ["sub", "key"], "value").unwrap();
    let sub = get(&obj, "sub").unwrap();
    assert_eq!(sub.kind(), ValueKind::Record);
    assert_eq!(obj, Value::from(json!({"sub": {"key": "value"}})));
}

#[test]
fn test_leaves_existing_value_when_overwrite_is_off() {
    let options = SetOptions::default().with_overwrite(false);
    let mut obj = Value::record();
    set_with(&mut obj, ["sub", "key"], "old", &options).unwrap();
    let returned = set_with(&mut obj, ["sub", "key"], "new", &options).unwrap();

    assert_eq!(returned, Value::from("old"));
    assert_eq!(get(&obj, ["sub", "key"]).as_deref(), Some(&Value::from("old")));
}

#[test]
fn test_overwrite_off_still_fills_empty_slots() {
    let options = SetOptions::default().with_overwrite(false);
    let mut arr = Value::from(vec![Value::from(1), Value::Undefined]);
    assert_eq!(set_with(&mut arr, 1usize, 2, &options).unwrap(), Value::from(2));
    assert_eq!(set_with(&mut arr, 0usize, 9, &options).unwrap(), Value::from(1));
    assert_eq!(arr, Value::from(vec![1, 2]));
}

#[test]
fn test_overwrite_on_replaces() {
    let mut obj = Value::from(json!({"a": {"b": "old"}}));
    assert_eq!(set(&mut obj, ["a", "b"], "new").unwrap(), Value::from("new"));
    assert_eq!(obj, Value::from(json!({"a": {"b": "new"}})));
}

#[test]
fn test_repeated_set_is_idempotent() {
    let mut once = Value::from(json!({"list": [1]}));
    let mut twice = once.clone();
    let chain = Keychain::from("list").with(3usize);

    set(&mut once, chain.clone(), "x").unwrap();
    set(&mut twice, chain.clone(), "x").unwrap();
    set(&mut twice, chain, "x").unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_every_container_reads_back_what_was_set() {
    let mut containers = vec![
        (Value::from(vec![0]), Value::from("v")),
        (Value::map(), Value::from("v")),
        (Value::set_of(["a", "b"]), Value::from("v")),
        (
            Value::from(TypedArray::new(ElementKind::Float64, 2)),
            Value::from(1.5),
        ),
        (Value::record(), Value::from("v")),
    ];
    for (container, value) in containers.iter_mut() {
        let returned = set(container, 1usize, value.clone()).unwrap();
        assert_eq!(&returned, &*value);
        assert_eq!(get(container, 1usize).as_deref(), Some(&*value), "{:?}", container);
    }
}

#[test]
fn test_typed_array_write_is_coerced() {
    let mut bytes = Value::from(TypedArray::new(ElementKind::Uint8Clamped, 2));
    let returned = set(&mut bytes, 0usize, 300).unwrap();
    assert_eq!(returned, Value::from(255));
    let returned = set(&mut bytes, "1", "7.6").unwrap();
    assert_eq!(returned, Value::from(8));
    assert_eq!(bytes.as_buffer().unwrap().to_vec(), vec![255.0, 8.0]);
}

#[test]
fn test_typed_array_ignores_writes_past_the_end() {
    let mut arr = Value::from(TypedArray::new(ElementKind::Int16, 1));
    let returned = set(&mut arr, 4usize, 1).unwrap();
    assert!(returned.is_undefined());
    assert_eq!(arr.as_buffer().unwrap().len(), 1);
    assert!(get(&arr, 4usize).is_none());
}

#[test]
fn test_array_index_beyond_max_length_is_rejected() {
    let mut arr = Value::from(vec![1]);
    for index in [u32::MAX as usize, 1usize << 40, usize::MAX] {
        let err = set(&mut arr, index, "x").unwrap_err();
        assert!(matches!(err, SetError::InvalidKey { kind: ValueKind::Array, .. }));
    }
    let err = set(&mut arr, "4294967295", "x").unwrap_err();
    assert!(matches!(err, SetError::InvalidKey { kind: ValueKind::Array, .. }));
    assert_eq!(arr, Value::from(vec![1]));
}

#[test]
fn test_huge_index_is_rejected_before_creating_records() {
    let mut obj = Value::from(json!({"list": []}));
    let chain = vec![Key::from("list"), Key::Index(usize::MAX), Key::from("name")];
    let err = set(&mut obj, chain, "x").unwrap_err();
    assert!(matches!(err, SetError::InvalidKey { kind: ValueKind::Array, .. }));
    assert_eq!(obj, Value::from(json!({"list": []})));
}

#[test]
fn test_set_index_past_the_end_is_rejected() {
    let mut s = Value::set_of(["a"]);
    set(&mut s, 1usize, "b").unwrap();
    let err = set(&mut s, 5usize, "c").unwrap_err();
    assert!(matches!(err, SetError::InvalidKey { kind: ValueKind::Set, .. }));
    assert_eq!(set_order(&s), vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn test_set_by_index_only_touches_that_position() {
    let mut s = Value::set_of(["first", "second", "third"]);
    set(&mut s, 1usize, "replacement").unwrap();
    assert_eq!(
        set_order(&s),
        vec![
            Value::from("first"),
            Value::from("replacement"),
            Value::from("third")
        ]
    );
}

#[test]
fn test_keychains_mix_indexes_and_names() {
    let mut root = Value::from(json!({"servers": [{"host": "a"}, {"host": "b"}]}));
    set(&mut root, Keychain::from("servers").with(1usize).with("port"), 80).unwrap();
    set(&mut root, ["servers", "0", "port"], 81).unwrap();
    assert_eq!(
        root,
        Value::from(json!({"servers": [
            {"host": "a", "port": 81},
            {"host": "b", "port": 80}
        ]}))
    );
}

#[test]
fn test_maps_are_traversed_and_vivified() {
    let mut root = Value::map();
    set(&mut root, ["users", "ada", "role"], "admin").unwrap();

    let users = root.as_map().unwrap().get(&Key::from("users")).unwrap();
    assert_eq!(users.kind(), ValueKind::Record);
    assert_eq!(
        get(&root, ["users", "ada", "role"]).as_deref(),
        Some(&Value::from("admin"))
    );
}

#[test]
fn test_index_names_can_be_disabled() {
    let strict = SetOptions::default()
        .with_traversal(TraversalOptions::default().with_indexed_names(false));
    let mut arr = Value::from(vec![1, 2]);

    let err = set_with(&mut arr, "0", 5, &strict).unwrap_err();
    assert_eq!(
        err,
        SetError::InvalidKey {
            kind: ValueKind::Array,
            key: Key::from("0"),
        }
    );
    set_with(&mut arr, 0usize, 5, &strict).unwrap();
    assert_eq!(arr, Value::from(vec![5, 2]));
}

#[test]
fn test_non_index_name_on_array_is_rejected() {
    let mut arr = Value::from(vec![1]);
    let err = set(&mut arr, "length", 0).unwrap_err();
    assert!(matches!(err, SetError::InvalidKey { kind: ValueKind::Array, .. }));
}

#[test]
fn test_empty_keychain_is_rejected() {
    let mut obj = Value::record();
    let err = set(&mut obj, Keychain::new(), "value").unwrap_err();
    assert_eq!(err, SetError::EmptyKeychain);
    assert!(err.is_type_error());
}

#[test]
fn test_value_is_not_shared_with_the_container() {
    let payload = Value::from(json!({"inner": 1}));
    let mut obj = Value::record();
    set(&mut obj, "copy", payload.clone()).unwrap();
    set(&mut obj, ["copy", "inner"], 2).unwrap();
    assert_eq!(payload, Value::from(json!({"inner": 1})));
}

#[test]
fn test_set_all_applies_each_keychain() {
    let mut obj = Value::record();
    let written = set_all(
        &mut obj,
        vec![Keychain::from(["a", "x"]), Keychain::from("b")],
        0,
        &SetOptions::default(),
    )
    .unwrap();

    assert_eq!(written, vec![Value::from(0), Value::from(0)]);
    assert_eq!(obj, Value::from(json!({"a": {"x": 0}, "b": 0})));
}

#[test]
fn test_set_all_respects_overwrite() {
    let mut obj = Value::from(json!({"a": "kept"}));
    let written = set_all(
        &mut obj,
        ["a", "b"],
        "new",
        &SetOptions::default().with_overwrite(false),
    )
    .unwrap();
    assert_eq!(written, vec![Value::from("kept"), Value::from("new")]);
}

#[test]
fn test_partial_mutation_is_not_rolled_back() {
    let mut obj = Value::from(json!({"blocked": 1}));
    let err = set_all(
        &mut obj,
        vec![
            Keychain::from(["created", "leaf"]),
            Keychain::from(["blocked", "leaf"]),
            Keychain::from(["never", "leaf"]),
        ],
        true,
        &SetOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, SetError::NotTraversable { .. }));
    assert_eq!(
        obj,
        Value::from(json!({"blocked": 1, "created": {"leaf": true}}))
    );
}

#[test]
fn test_record_insertion_order_is_kept() {
    let mut obj = Value::record();
    for name in ["zeta", "alpha", "mid"] {
        set(&mut obj, name, true).unwrap();
    }
    set(&mut obj, "alpha", false).unwrap();

    let names: Vec<&String> = obj.as_record().unwrap().keys().collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_records_built_by_hand_work_too() {
    let mut fields = IndexMap::new();
    fields.insert("count".to_string(), Value::from(1));
    let mut obj = Value::from(fields);
    set(&mut obj, "count", 2).unwrap();
    assert_eq!(obj.as_record().unwrap()["count"], Value::from(2));
}

#[test]
fn test_error_messages() {
    let mut text = Value::from("string");
    assert_eq!(
        set(&mut text, "key", 1).unwrap_err().to_string(),
        "Cannot set 'key' on non-object string"
    );

    let mut arr = Value::from(vec![1]);
    assert_eq!(
        set(&mut arr, "name", 1).unwrap_err().to_string(),
        "Key 'name' is not a valid index for array"
    );
}
