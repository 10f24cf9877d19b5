use crate::fixtures::add_posts;
use crate::helpers::models::*;
use modeldiff::codegen::{MigrationBuilder, MigrationCodeGenerator};
use modeldiff::model::Model;

fn blogs_only() -> Model {
    let mut model = blogging();
    model.entity_types.retain(|e| e.name != "Post");
    model
}

#[test]
fn test_generated_module_matches_fixture() {
    let up = diff(&blogs_only(), &blogging());
    let down = diff(&blogging(), &blogs_only());

    let code = MigrationCodeGenerator::new().generate_migration(add_posts::ID, &up, &down);
    assert_eq!(code, include_str!("../fixtures/add_posts.rs"));
}

#[test]
fn test_generated_code_rebuilds_the_operations() {
    let mut builder = MigrationBuilder::new();
    add_posts::up(&mut builder).unwrap();
    assert_eq!(builder.into_operations(), diff(&blogs_only(), &blogging()));

    let mut builder = MigrationBuilder::new();
    add_posts::down(&mut builder).unwrap();
    assert_eq!(builder.into_operations(), diff(&blogging(), &blogs_only()));
}

#[test]
fn test_generation_is_deterministic() {
    let target = blogging_with(|model| {
        model.entity("Blog", |e| {
            e.annotation("Comment", "Blogs")
                .annotation("Audit:Enabled", true);
        });
        model.sequence("OrderNumbers", None).increments_by(5);
    });
    let operations = diff(&empty(), &target);

    let generator = MigrationCodeGenerator::new();
    assert_eq!(
        generator.generate_operations(&operations),
        generator.generate_operations(&operations.clone())
    );
    assert!(
        generator
            .generate_operations(&operations)
            .contains(".annotation(\"Audit:Enabled\", true).annotation(\"Comment\", \"Blogs\")")
    );
}
