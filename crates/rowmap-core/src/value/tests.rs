use crate::value::Value;
use time::OffsetDateTime;
use ulid::Ulid;

#[test]
fn integer_views_cross_signedness_when_in_range() {
    assert_eq!(Value::Uint(7).as_i64(), Some(7));
    assert_eq!(Value::Int(7).as_u64(), Some(7));
    assert_eq!(Value::Int(-1).as_u64(), None);
    assert_eq!(Value::Uint(u64::MAX).as_i64(), None);
    assert_eq!(Value::Text("7".into()).as_i64(), None);
}

#[test]
fn optional_conversion_yields_explicit_null() {
    let unset: Option<String> = None;

    assert_eq!(Value::from(unset), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    assert!(Value::from(None::<i64>).is_null());
}

#[test]
fn display_renders_sql_like_literals() {
    assert_eq!(Value::Null.to_string(), "NULL");
    assert_eq!(Value::Text("bob".into()).to_string(), "'bob'");
    assert_eq!(Value::Blob(vec![1, 2, 3]).to_string(), "<3 bytes>");
    assert_eq!(
        Value::Timestamp(OffsetDateTime::UNIX_EPOCH).to_string(),
        "1970-01-01T00:00:00Z"
    );
}

#[test]
fn tags_are_stable() {
    let cases = [
        (Value::Blob(Vec::new()), "blob"),
        (Value::Bool(true), "bool"),
        (Value::Float(1.5), "float"),
        (Value::Int(-3), "int"),
        (Value::Null, "null"),
        (Value::Text(String::new()), "text"),
        (Value::Timestamp(OffsetDateTime::UNIX_EPOCH), "timestamp"),
        (Value::Uint(3), "uint"),
        (Value::Ulid(Ulid::from_parts(0, 1)), "ulid"),
    ];

    for (value, tag) in cases {
        assert_eq!(value.tag(), tag);
    }
}
