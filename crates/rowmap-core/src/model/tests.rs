use crate::{
    error::Error,
    registry::Registry,
    test_support::{Post, User},
    types::Id,
};
use std::sync::Arc;

crate::test_record! {
    struct Leaf {
        col foo: String => "foo",
        col id: Id => "id",
    }
}

crate::test_record! {
    struct Middle {
        embed leaf: Leaf,
        col bar: i64 => "bar",
        col baz: bool => "baz,readonly",
    }
}

crate::test_record! {
    struct Outer {
        embed middle: Middle,
        col qux: String => "qux",
    }
}

crate::test_record! {
    struct Review {
        col id: Id,
        col author_id: i64 => "author_id,fk=users.id",
        col editor_id: i64 => "editor_id,fk=users.id",
        col post_id: i64 => "post_id, fk=posts.id",
    }
}

#[test]
fn primary_key_path_follows_every_embedding_level() {
    let desc = Registry::new().describe::<Outer>().unwrap();

    let (pk, path) = desc.primary_key().unwrap();
    assert_eq!(pk.name, "id");
    assert_eq!(path, [0, 0, 1]);
    assert_eq!(path.depth(), 3);
    assert_eq!(path.to_string(), "[0, 0, 1]");
}

#[test]
fn columns_and_writable_walk_depth_first() {
    let desc = Registry::new().describe::<Outer>().unwrap();

    assert_eq!(desc.columns().list(), "foo, id, bar, baz, qux");
    assert_eq!(desc.writable_columns().list(), "foo, bar, qux");

    let writable: Vec<_> = desc.fields.writable().iter().map(|f| f.name).collect();
    assert_eq!(writable, ["foo", "bar", "qux"]);
}

#[test]
fn find_by_column_reports_nested_path() {
    let desc = Registry::new().describe::<Outer>().unwrap();

    let (field, path) = desc.field_by_column("bar").unwrap();
    assert_eq!(field.name, "bar");
    assert_eq!(path, [0, 1]);
}

#[test]
fn find_continues_past_an_embedded_subtree_without_a_match() {
    let desc = Registry::new().describe::<Outer>().unwrap();

    let (_, path) = desc.field_by_column("qux").unwrap();
    assert_eq!(path, [1]);
}

#[test]
fn missing_column_is_field_not_found() {
    let desc = Registry::new().describe::<Outer>().unwrap();

    assert!(desc.fields.find_by_column("nope").is_none());
    assert!(matches!(
        desc.field_by_column("nope"),
        Err(Error::FieldNotFound(_))
    ));
}

#[test]
fn excluded_fields_are_absent_everywhere() {
    let desc = Registry::new().describe::<User>().unwrap();

    assert_eq!(desc.columns().len(), 5);
    assert!(desc.fields.iter().all(|f| f.name != "session"));
    assert!(desc.fields.find(|f| f.name == "session").is_none());
}

#[test]
fn readonly_column_is_selected_but_never_written() {
    let desc = Registry::new().describe::<User>().unwrap();

    assert!(desc.columns().iter().any(|c| c == "foo"));
    assert!(desc.writable_columns().iter().all(|c| c != "foo"));
    assert_eq!(desc.writable_columns().list(), "name, email");
}

#[test]
fn embedded_descriptors_link_to_their_parent() {
    let desc = Registry::new().describe::<Outer>().unwrap();
    assert!(desc.is_root());
    assert!(desc.parent().is_none());

    let middle = Arc::clone(desc.embedded()[0]);
    assert!(!middle.is_root());
    assert!(Arc::ptr_eq(&middle.parent().unwrap(), &desc));

    let leaf = middle.embedded()[0];
    assert_eq!(leaf.table, "leaf");
    assert!(Arc::ptr_eq(&leaf.parent().unwrap(), &middle));
}

#[test]
fn foreign_key_lookup_takes_the_first_match() {
    let desc = Registry::new().describe::<Review>().unwrap();

    assert_eq!(desc.fields.foreign_keys().len(), 3);
    assert_eq!(desc.foreign_key_to("users").unwrap().name, "author_id");

    let post = desc.foreign_key_to("posts").unwrap();
    let fk = post.foreign_key().unwrap();
    assert_eq!((fk.table.as_str(), fk.column.as_str()), ("posts", "id"));
}

#[test]
fn foreign_key_lookup_errors_are_distinct() {
    let registry = Registry::new();
    let post = registry.describe::<Post>().unwrap();
    let user = registry.describe::<User>().unwrap();

    assert_eq!(post.foreign_key_to("users").unwrap().name, "author_id");
    assert!(matches!(
        post.foreign_key_to("tags"),
        Err(Error::NoForeignKeyMatch { ref target, .. }) if target == "tags"
    ));
    assert!(matches!(
        user.foreign_key_to("posts"),
        Err(Error::NoForeignKeys(ref table)) if table == "users"
    ));
}
