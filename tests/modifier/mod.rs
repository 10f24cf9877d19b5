use crate::helpers::models::*;
use modeldiff::ModelError;
use modeldiff::catalog::{Column, ObjectName, modifier};
use modeldiff::codegen::MigrationBuilder;
use modeldiff::model::ClrType;

#[test]
fn test_replays_hand_written_operations() {
    let mut builder = MigrationBuilder::new();
    builder.rename_column("dbo.Blog", "Url", "Address");
    builder.add_column(
        "dbo.Blog",
        Column::new("Rating", ClrType::Int32).with_default_value(0),
    );
    builder.rename_table("dbo.Post", "Posts");

    let database = modifier::apply_all(build(&blogging()), builder.operations()).unwrap();

    let blog = database.table(&ObjectName::from("dbo.Blog")).unwrap();
    assert!(blog.column("Address").is_some());
    assert!(blog.column("Url").is_none());
    assert!(blog.column("Rating").is_some());

    let posts = database.table(&ObjectName::from("dbo.Posts")).unwrap();
    assert_eq!(posts.foreign_keys.len(), 1);
    assert!(database.table(&ObjectName::from("dbo.Post")).is_none());
}

#[test]
fn test_dropping_an_absent_table_fails() {
    let mut builder = MigrationBuilder::new();
    builder.drop_table("dbo.Missing");

    let err = modifier::apply_all(build(&blogging()), builder.operations()).unwrap_err();
    assert!(matches!(err, ModelError::ObjectNotFound { kind: "table", .. }));
}

#[test]
fn test_creating_a_present_table_fails() {
    let mut builder = MigrationBuilder::new();
    builder.create_table("dbo.Blog", |table| {
        table.column(Column::new("Id", ClrType::Int32));
    });

    let err = modifier::apply_all(build(&blogging()), builder.operations()).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateObject { kind: "table", .. }));
}

#[test]
fn test_dropping_a_referenced_table_fails() {
    let mut builder = MigrationBuilder::new();
    builder.drop_table("dbo.Blog");

    let err = modifier::apply_all(build(&blogging()), builder.operations()).unwrap_err();
    assert!(matches!(err, ModelError::ObjectInUse { kind: "table", .. }));
}

#[test]
fn test_stops_at_first_failure() {
    let mut builder = MigrationBuilder::new();
    builder.drop_index("dbo.Post", "IX_Post_BlogId");
    builder.drop_index("dbo.Post", "IX_Post_BlogId");

    let err = modifier::apply_all(build(&blogging()), builder.operations()).unwrap_err();
    assert_eq!(err.to_string(), "index 'dbo.Post.IX_Post_BlogId' does not exist");
}
