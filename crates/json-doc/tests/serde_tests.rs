use json_doc::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Stats {
    health: i32,
    mana: i32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Hero {
    name: String,
    level: u32,
    stats: Stats,
    inventory: Vec<String>,
}

fn hero() -> Hero {
    Hero {
        name: "Hero".into(),
        level: 25,
        stats: Stats {
            health: 100,
            mana: 50,
        },
        inventory: vec!["sword".into(), "shield".into()],
    }
}

// ============================================================================
// Serialize / Deserialize
// ============================================================================

#[test]
fn serde_json_output_matches_native_serializer() {
    let v = Value::parse(r#"{"b":1,"a":[true,null,"x",2.5]}"#);
    assert_eq!(serde_json::to_string(&v).unwrap(), v.to_json(false));
}

#[test]
fn whole_numbers_reach_serde_as_integers() {
    let v = Value::array().with_item(25).with_item(0.5).with_item(-3);
    assert_eq!(serde_json::to_string(&v).unwrap(), "[25,0.5,-3]");
}

#[test]
fn deserialize_value_keeps_key_order() {
    let v: Value = serde_json::from_str(r#"{"z":1,"a":{"y":2,"b":3}}"#).unwrap();
    assert_eq!(v.keys().collect::<Vec<_>>(), ["z", "a"]);
    assert_eq!(v["a"].keys().collect::<Vec<_>>(), ["y", "b"]);
}

// ============================================================================
// serde_json::Value conversion
// ============================================================================

#[test]
fn converts_from_serde_json_value() {
    let json = serde_json::json!({"n": 1, "s": "t", "list": [false, null]});
    let v = Value::from(json);
    assert_eq!(v.to_json(false), r#"{"n":1,"s":"t","list":[false,null]}"#);
}

#[test]
fn converts_into_serde_json_value() {
    let v = Value::object().with("n", 2).with("f", 1.5);
    let json = serde_json::Value::from(v);
    assert_eq!(json, serde_json::json!({"n": 2, "f": 1.5}));
    assert!(json["n"].is_i64());
}

#[test]
fn non_finite_numbers_convert_to_null() {
    let json = serde_json::Value::from(Value::number(f64::NAN));
    assert!(json.is_null());
}

// ============================================================================
// Typed interop
// ============================================================================

#[test]
fn from_serialize_builds_a_tree_in_field_order() {
    let v = Value::from_serialize(&hero()).unwrap();
    assert_eq!(
        v.to_json(false),
        r#"{"name":"Hero","level":25,"stats":{"health":100,"mana":50},"inventory":["sword","shield"]}"#
    );
}

#[test]
fn deserialize_into_typed_struct() {
    let v = Value::parse(
        r#"{"name":"Hero","level":25,"stats":{"health":100,"mana":50},"inventory":["sword","shield"]}"#,
    );
    let hero: Hero = v.deserialize_into().unwrap();
    assert_eq!(hero, self::hero());
}

#[test]
fn deserialize_into_is_strict() {
    let v = Value::parse(r#"{"name":"Hero","level":"25"}"#);
    let err = v.deserialize_into::<Hero>().unwrap_err();
    assert!(matches!(err, json_doc::JsonDocError::Json(_)));
}
