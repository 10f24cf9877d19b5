use crate::helpers::models::*;
use chrono::{TimeZone, Utc};
use modeldiff::catalog::builder::DatabaseBuilder;
use modeldiff::migration::{MigrationScaffolder, ModelSnapshot};
use tempfile::TempDir;

fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
}

#[test]
fn test_scaffolds_against_the_previous_snapshot() {
    let mut blogs_only = blogging();
    blogs_only.entity_types.retain(|e| e.name != "Post");
    let previous = ModelSnapshot::from_model(&blogs_only).unwrap();

    let migration = MigrationScaffolder::new()
        .scaffold_projection(
            "AddPosts",
            Some(&previous),
            DatabaseBuilder::project(&blogging()).unwrap(),
            timestamp(),
        )
        .unwrap();

    assert_eq!(migration.id, "20240305140709_AddPosts");
    assert_eq!(migration.code, include_str!("../fixtures/add_posts.rs"));
    assert!(
        migration
            .snapshot
            .projection
            .database
            .is_equivalent(&build(&blogging()))
    );
}

#[test]
fn test_successive_migrations_chain_through_the_snapshot() {
    let dir = TempDir::new().unwrap();
    let scaffolder = MigrationScaffolder::new();
    let snapshot_path = dir.path().join("model_snapshot.yaml");

    let first = scaffolder.scaffold(
        "Initial",
        ModelSnapshot::load(&snapshot_path).unwrap().as_ref(),
        &blogging(),
    )
    .unwrap();
    first.write_with_snapshot(dir.path(), &snapshot_path).unwrap();

    let renamed = blogging_with(|model| {
        model.entity("Blog", |e| {
            e.to_table("Blogs", None);
        });
    });
    let second = scaffolder
        .scaffold(
            "RenameBlogs",
            ModelSnapshot::load(&snapshot_path).unwrap().as_ref(),
            &renamed,
        )
        .unwrap();

    assert!(second.up.iter().any(|op| op.kind() == "RenameTable"));
    assert!(!second.up.iter().any(|op| op.kind() == "CreateTable"));
    assert!(second.down.iter().any(|op| op.kind() == "RenameTable"));
}
