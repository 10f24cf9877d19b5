use modeldiff::catalog::builder::DatabaseBuilder;
use modeldiff::catalog::{Database, modifier};
use modeldiff::model::{ClrType, Model};
use modeldiff::{MigrationOperation, ModelDiffer};

/// Blogs and posts, with a relationship and an index on it.
pub fn blogging() -> Model {
    let mut model = Model::new().with_default_schema("dbo");
    model.entity("Blog", |e| {
        e.property("Id", ClrType::Int32);
        e.property("Url", ClrType::String).has_max_length(200);
        e.key(&["Id"]);
    });
    model.entity("Post", |e| {
        e.property("Id", ClrType::Int32);
        e.property("BlogId", ClrType::Int32);
        e.property("Title", ClrType::String);
        e.key(&["Id"]);
        e.foreign_key("Blog", &["BlogId"]);
        e.index(&["BlogId"]);
    });
    model
}

/// `blogging` with further changes applied by `change`.
pub fn blogging_with(change: impl FnOnce(&mut Model)) -> Model {
    let mut model = blogging();
    change(&mut model);
    model
}

pub fn empty() -> Model {
    Model::new().with_default_schema("dbo")
}

pub fn build(model: &Model) -> Database {
    DatabaseBuilder::build(model).expect("model should build")
}

pub fn diff(source: &Model, target: &Model) -> Vec<MigrationOperation> {
    ModelDiffer::new()
        .diff(source, target)
        .expect("models should project")
}

pub fn kinds(operations: &[MigrationOperation]) -> Vec<&'static str> {
    operations.iter().map(|op| op.kind()).collect()
}

pub fn position_of(operations: &[MigrationOperation], kind: &str) -> Option<usize> {
    operations.iter().position(|op| op.kind() == kind)
}

/// Replays the diff of `source` to `target` onto the database built from
/// `source` and checks that it lands on the database built from `target`.
pub fn assert_round_trip(source: &Model, target: &Model) {
    let operations = diff(source, target);
    let applied = modifier::apply_all(build(source), &operations).unwrap_or_else(|e| {
        panic!(
            "applying {:?} failed: {}",
            kinds(&operations),
            e
        )
    });
    let expected = build(target);
    assert!(
        applied.is_equivalent(&expected),
        "operations {:?} did not reach the target\napplied: {:#?}\nexpected: {:#?}",
        kinds(&operations),
        applied,
        expected
    );
}
