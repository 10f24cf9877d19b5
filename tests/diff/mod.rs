use crate::helpers::models::*;
use modeldiff::catalog::{Database, modifier};
use modeldiff::model::{ClrType, Model};
use modeldiff::{MigrationOperation, ModelDiffer};
use rstest::rstest;

fn add_rating(model: &mut Model) {
    model.entity("Blog", |e| {
        e.property("Rating", ClrType::Int32).has_default_value(0);
    });
}

fn drop_title(model: &mut Model) {
    model.entity("Post", |e| {
        e.properties.retain(|p| p.name != "Title");
    });
}

fn rename_url_column(model: &mut Model) {
    model.entity("Blog", |e| {
        e.property("Url", ClrType::String)
            .has_max_length(200)
            .has_column_name("Address");
    });
}

fn rename_key_column(model: &mut Model) {
    model.entity("Blog", |e| {
        e.property("Id", ClrType::Int32).has_column_name("BlogKey");
    });
}

fn widen_url(model: &mut Model) {
    model.entity("Blog", |e| {
        e.property("Url", ClrType::String)
            .has_max_length(400)
            .is_nullable(false);
    });
}

fn rename_blog_table(model: &mut Model) {
    model.entity("Blog", |e| {
        e.to_table("Blogs", None);
    });
}

fn move_blog_table(model: &mut Model) {
    model.entity("Blog", |e| {
        e.to_table("Blog", Some("archive"));
    });
}

fn rename_post_entity(model: &mut Model) {
    let post = model
        .entity_types
        .iter_mut()
        .find(|e| e.name == "Post")
        .expect("Post is declared");
    post.name = "Article".to_string();
}

fn drop_relationship(model: &mut Model) {
    model.entity("Post", |e| {
        e.foreign_keys.clear();
        e.indexes.clear();
    });
}

fn add_alternate_key(model: &mut Model) {
    model.entity("Blog", |e| {
        e.alternate_key(&["Url"]);
    });
}

fn add_unique_index(model: &mut Model) {
    model.entity("Post", |e| {
        e.index(&["Title"]).is_unique(true);
    });
}

fn add_sequence(model: &mut Model) {
    model.sequence("OrderNumbers", None).starts_at(1000);
}

fn change_sequence(model: &mut Model) {
    model
        .sequence("OrderNumbers", None)
        .starts_at(5000)
        .increments_by(10);
}

fn move_sequence(model: &mut Model) {
    model.sequence("OrderNumbers", Some("sales")).starts_at(1000);
}

fn retype_sequence(model: &mut Model) {
    model
        .sequence("OrderNumbers", None)
        .has_type("int")
        .starts_at(1000);
}

fn swapped_tables(swap: bool) -> Model {
    let (a, b) = if swap { ("T1", "T0") } else { ("T0", "T1") };
    let mut model = empty();
    model.entity("A", |e| {
        e.property("Id", ClrType::Int32);
        e.property("Name", ClrType::String);
        e.key(&["Id"]).has_name("PK_A");
        e.to_table(a, Some("dbo"));
    });
    model.entity("B", |e| {
        e.property("Id", ClrType::Int32);
        e.property("Code", ClrType::String);
        e.key(&["Id"]).has_name("PK_B");
        e.to_table(b, Some("dbo"));
    });
    model
}

fn swapped_columns(swap: bool) -> Model {
    let (first, second) = if swap { ("C1", "C0") } else { ("C0", "C1") };
    let mut model = empty();
    model.entity("A", |e| {
        e.property("Id", ClrType::Int32);
        e.property("P0", ClrType::String).has_column_name(first);
        e.property("P1", ClrType::String).has_column_name(second);
        e.key(&["Id"]);
        e.to_table("T0", None);
    });
    model
}

fn swapped_indexes(swap: bool) -> Model {
    let (first, second) = if swap { ("IX_B", "IX_A") } else { ("IX_A", "IX_B") };
    let mut model = empty();
    model.entity("A", |e| {
        e.property("Id", ClrType::Int32);
        e.property("A", ClrType::Int32);
        e.property("B", ClrType::Int32);
        e.key(&["Id"]);
        e.index(&["A"]).has_name(first);
        e.index(&["B"]).has_name(second);
        e.to_table("T0", None);
    });
    model
}

/// `dbo.A` moves to `x.B` while `x.A` stays where it is.
fn shadowed_move(moved: bool) -> Model {
    let mut model = empty();
    model.entity("E1", |e| {
        e.property("Id", ClrType::Int32);
        e.property("Name", ClrType::String);
        e.key(&["Id"]).has_name("PK_E1");
        if moved {
            e.to_table("B", Some("x"));
        } else {
            e.to_table("A", Some("dbo"));
        }
    });
    model.entity("E2", |e| {
        e.property("Id", ClrType::Int32);
        e.property("Code", ClrType::String);
        e.key(&["Id"]).has_name("PK_E2");
        e.to_table("A", Some("x"));
    });
    model
}

fn add_derived_blog(model: &mut Model) {
    model.entity("RssBlog", |e| {
        e.derives_from("Blog");
        e.property("FeedUrl", ClrType::String);
    });
}

#[rstest]
#[case::create_everything(empty(), blogging())]
#[case::drop_everything(blogging(), empty())]
#[case::add_column(blogging(), blogging_with(add_rating))]
#[case::drop_column(blogging(), blogging_with(drop_title))]
#[case::rename_column(blogging(), blogging_with(rename_url_column))]
#[case::rename_key_column(blogging(), blogging_with(rename_key_column))]
#[case::alter_column(blogging(), blogging_with(widen_url))]
#[case::rename_table(blogging(), blogging_with(rename_blog_table))]
#[case::move_table(blogging(), blogging_with(move_blog_table))]
#[case::fuzzy_rename(blogging(), blogging_with(rename_post_entity))]
#[case::add_relationship(blogging_with(drop_relationship), blogging())]
#[case::drop_relationship(blogging(), blogging_with(drop_relationship))]
#[case::add_alternate_key(blogging(), blogging_with(add_alternate_key))]
#[case::add_unique_index(blogging(), blogging_with(add_unique_index))]
#[case::add_sequence(blogging(), blogging_with(add_sequence))]
#[case::change_sequence(blogging_with(add_sequence), blogging_with(change_sequence))]
#[case::move_sequence(blogging_with(add_sequence), blogging_with(move_sequence))]
#[case::retype_sequence(blogging_with(add_sequence), blogging_with(retype_sequence))]
#[case::swap_tables(swapped_tables(false), swapped_tables(true))]
#[case::swap_columns(swapped_columns(false), swapped_columns(true))]
#[case::swap_indexes(swapped_indexes(false), swapped_indexes(true))]
#[case::move_onto_shadowed_name(shadowed_move(false), shadowed_move(true))]
#[case::add_derived_entity(blogging(), blogging_with(add_derived_blog))]
fn test_diff_replays_onto_target(#[case] source: Model, #[case] target: Model) {
    assert_round_trip(&source, &target);
    assert_round_trip(&target, &source);
}

#[test]
fn test_create_and_drop_schema_are_symmetric() {
    let model = blogging();
    let differ = ModelDiffer::new();

    let created = modifier::apply_all(Database::new(), &differ.create_schema(&model).unwrap()).unwrap();
    assert!(created.is_equivalent(&build(&model)));

    let dropped = modifier::apply_all(build(&model), &differ.drop_schema(&model).unwrap()).unwrap();
    assert!(dropped.is_empty());
}

#[test]
fn test_same_model_has_no_operations() {
    let model = blogging_with(add_sequence);
    assert!(diff(&model, &model).is_empty());
}

#[test]
fn test_swapped_table_names_go_through_a_temporary_name() {
    let operations = diff(&swapped_tables(false), &swapped_tables(true));

    let renames: Vec<(String, String)> = operations
        .iter()
        .map(|op| match op {
            MigrationOperation::RenameTable(rename) => {
                (rename.name.to_string(), rename.new_name.clone())
            }
            other => panic!("unexpected operation {}", other),
        })
        .collect();
    assert_eq!(
        renames,
        vec![
            ("dbo.T0".to_string(), "__mig_tmp__0".to_string()),
            ("dbo.T1".to_string(), "T0".to_string()),
            ("dbo.__mig_tmp__0".to_string(), "T1".to_string()),
        ]
    );
}

fn entity_with(name: &str, properties: &[&str]) -> Model {
    let mut model = empty();
    model.entity(name, |e| {
        for property in properties {
            e.property(property, ClrType::Int32);
        }
        e.key(&["Id"]).has_name("PK");
    });
    model
}

#[test]
fn test_similar_entities_are_renamed() {
    let source = entity_with("A", &["Id", "P1", "P2", "P3", "P4"]);
    let target = entity_with("B", &["Id", "P1", "P2", "P3", "P4", "P5"]);

    let operations = diff(&source, &target);
    assert_eq!(kinds(&operations), vec!["RenameTable", "AddColumn"]);
    match &operations[1] {
        MigrationOperation::AddColumn(op) => {
            assert_eq!(op.table.to_string(), "dbo.B");
            assert_eq!(op.column.name, "P5");
        }
        other => panic!("unexpected operation {}", other),
    }
}

#[test]
fn test_dissimilar_entities_are_replaced() {
    let source = entity_with("A", &["Id", "P1"]);
    let target = entity_with("B", &["Id", "P1", "P2"]);

    let operations = diff(&source, &target);
    assert_eq!(kinds(&operations), vec!["DropTable", "CreateTable"]);
}

#[test]
fn test_fuzzy_threshold_is_configurable() {
    let source = entity_with("A", &["Id", "P1"]);
    let target = entity_with("B", &["Id", "P1", "P2"]);
    let differ = ModelDiffer::with_options(modeldiff::diff::DiffOptions {
        fuzzy_threshold: 0.5,
        ..Default::default()
    });

    let operations = differ.diff(&source, &target).unwrap();
    assert_eq!(kinds(&operations), vec!["RenameTable", "AddColumn"]);
}

#[test]
fn test_create_orders_tables_before_foreign_keys_before_indexes() {
    let operations = diff(&empty(), &blogging());

    let last_table = operations
        .iter()
        .rposition(|op| op.kind() == "CreateTable")
        .unwrap();
    let first_fk = position_of(&operations, "AddForeignKey").unwrap();
    let last_fk = operations
        .iter()
        .rposition(|op| op.kind() == "AddForeignKey")
        .unwrap();
    let first_index = position_of(&operations, "CreateIndex").unwrap();

    assert!(last_table < first_fk);
    assert!(last_fk < first_index);
}

#[test]
fn test_column_mapped_to_new_name_is_renamed() {
    let model = |column: &str| {
        let mut model = empty();
        model.entity("A", |e| {
            e.property("Id", ClrType::Int32);
            e.property("P0", ClrType::String).has_column_name(column);
            e.key(&["Id"]);
            e.to_table("T0", Some("dbo"));
        });
        model
    };

    let operations = diff(&model("C0"), &model("RenamedColumn"));
    assert_eq!(operations.len(), 1);
    match &operations[0] {
        MigrationOperation::RenameColumn(op) => {
            assert_eq!(op.table.to_string(), "dbo.T0");
            assert_eq!(op.name, "C0");
            assert_eq!(op.new_name, "RenamedColumn");
        }
        other => panic!("unexpected operation {}", other),
    }
}

#[test]
fn test_foreign_keys_are_dropped_before_tables() {
    let mut source = empty();
    source.entity("A", |e| {
        e.property("Id", ClrType::Int32);
        e.key(&["Id"]);
        e.to_table("T0", None);
    });
    source.entity("B", |e| {
        e.property("Id", ClrType::Int32);
        e.property("AId", ClrType::Int32);
        e.key(&["Id"]);
        e.foreign_key("A", &["AId"]);
        e.index(&["AId"]).is_unique(true);
        e.to_table("T1", None);
    });

    let operations = diff(&source, &empty());
    assert_eq!(
        operations.iter().map(|op| op.to_string()).collect::<Vec<_>>(),
        vec![
            "DropForeignKey FK_T1_T0_AId on dbo.T1",
            "DropTable dbo.T0",
            "DropTable dbo.T1",
        ]
    );
}

#[test]
fn test_rename_with_type_change_renames_then_alters() {
    let target = blogging_with(|model| {
        model.entity("Blog", |e| {
            e.property("Url", ClrType::String)
                .has_max_length(500)
                .has_column_name("Address");
        });
    });

    let operations = diff(&blogging(), &target);
    assert_eq!(kinds(&operations), vec!["RenameColumn", "AlterColumn"]);
    match &operations[1] {
        MigrationOperation::AlterColumn(op) => {
            assert_eq!(op.column.name, "Address");
            assert_eq!(op.old_column.max_length, Some(200));
            assert_eq!(op.column.max_length, Some(500));
        }
        other => panic!("unexpected operation {}", other),
    }
}

#[test]
fn test_schema_move_and_rename() {
    let target = blogging_with(|model| {
        model.entity("Blog", |e| {
            e.to_table("Blogs", Some("archive"));
        });
    });

    let operations = diff(&blogging(), &target);
    let moves: Vec<String> = operations
        .iter()
        .filter(|op| matches!(op.kind(), "MoveTable" | "RenameTable"))
        .map(|op| op.to_string())
        .collect();
    assert_eq!(
        moves,
        vec!["MoveTable dbo.Blog -> archive", "RenameTable archive.Blog -> Blogs"]
    );
}

#[test]
fn test_swapped_column_names_go_through_a_temporary_name() {
    let operations = diff(&swapped_columns(false), &swapped_columns(true));
    assert_eq!(
        operations.iter().map(|op| op.to_string()).collect::<Vec<_>>(),
        vec![
            "RenameColumn dbo.T0.C0 -> __mig_tmp__0",
            "RenameColumn dbo.T0.C1 -> C0",
            "RenameColumn dbo.T0.__mig_tmp__0 -> C1",
        ]
    );
}

#[test]
fn test_move_renames_first_when_old_name_is_taken_in_new_schema() {
    let operations = diff(&shadowed_move(false), &shadowed_move(true));
    assert_eq!(
        operations.iter().map(|op| op.to_string()).collect::<Vec<_>>(),
        vec!["RenameTable dbo.A -> B", "MoveTable dbo.B -> x"]
    );
}

#[test]
fn test_derived_entity_adds_its_columns_and_a_discriminator() {
    let operations = diff(&blogging(), &blogging_with(add_derived_blog));
    assert_eq!(
        operations.iter().map(|op| op.to_string()).collect::<Vec<_>>(),
        vec!["AddColumn dbo.Blog.FeedUrl", "AddColumn dbo.Blog.Discriminator"]
    );
}
