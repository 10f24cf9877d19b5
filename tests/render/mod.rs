use crate::helpers::models::*;
use insta::assert_snapshot;
use modeldiff::model::{ClrType, Model};
use modeldiff::render::Dialect;
use modeldiff::render::sql::MigrationSqlGenerator;

fn script(dialect: Dialect, source: &Model, target: &Model) -> String {
    MigrationSqlGenerator::new(dialect)
        .generate_script(&diff(source, target), &build(source))
        .unwrap()
}

fn rename_url_and_add_sequence(model: &mut Model) {
    model.entity("Blog", |e| {
        e.property("Url", ClrType::String)
            .has_max_length(200)
            .has_column_name("Address");
    });
    model.sequence("OrderNumbers", None).starts_at(1000);
}

#[test]
fn test_postgres_script() {
    let sql = script(
        Dialect::Postgres,
        &blogging(),
        &blogging_with(rename_url_and_add_sequence),
    );
    assert_snapshot!(sql, @r#"
    CREATE SEQUENCE "dbo"."OrderNumbers" AS bigint START WITH 1000 INCREMENT BY 1;

    ALTER TABLE "dbo"."Blog" RENAME COLUMN "Url" TO "Address";
    "#);
}

#[test]
fn test_sqlserver_script() {
    let sql = script(
        Dialect::SqlServer,
        &blogging(),
        &blogging_with(rename_url_and_add_sequence),
    );
    assert_snapshot!(sql, @r"
    CREATE SEQUENCE [dbo].[OrderNumbers] AS bigint START WITH 1000 INCREMENT BY 1;

    EXEC sp_rename N'[dbo].[Blog].[Url]', N'Address', N'COLUMN';
    ");
}

#[test]
fn test_create_script_orders_statements() {
    let sql = script(Dialect::Postgres, &empty(), &blogging());

    let blog = sql.find(r#"CREATE TABLE "dbo"."Blog" ("#).unwrap();
    let post = sql.find(r#"CREATE TABLE "dbo"."Post" ("#).unwrap();
    let foreign_key = sql
        .find(r#"ALTER TABLE "dbo"."Post" ADD CONSTRAINT "FK_Post_Blog_BlogId" FOREIGN KEY ("BlogId") REFERENCES "dbo"."Blog" ("Id");"#)
        .unwrap();
    let index = sql
        .find(r#"CREATE INDEX "IX_Post_BlogId" ON "dbo"."Post" ("BlogId");"#)
        .unwrap();

    assert!(blog < foreign_key);
    assert!(post < foreign_key);
    assert!(foreign_key < index);
}

#[test]
fn test_drops_are_flagged_destructive() {
    let target = blogging_with(|model| {
        model.entity("Post", |e| {
            e.properties.retain(|p| p.name != "Title");
        });
    });

    for dialect in [Dialect::Postgres, Dialect::SqlServer] {
        let rendered = MigrationSqlGenerator::new(dialect)
            .generate(&diff(&blogging(), &target), &build(&blogging()))
            .unwrap();
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].is_destructive());
        assert!(rendered[0].sql.contains("DROP COLUMN"));
    }
}

#[test]
fn test_unmappable_type_is_reported() {
    let target = blogging_with(|model| {
        model.entity("Blog", |e| {
            e.property("Shape", ClrType::Custom("Geometry".to_string()));
        });
    });

    let err = MigrationSqlGenerator::new(Dialect::Postgres)
        .generate(&diff(&blogging(), &target), &build(&blogging()))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported type 'Geometry' for column 'Shape' of table 'dbo.Blog'"
    );
}
