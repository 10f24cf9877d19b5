//! Migration 20240305140709_AddPosts
//!
//! Generated by modeldiff.

use modeldiff::prelude::*;

pub const ID: &str = "20240305140709_AddPosts";

pub fn up(migration_builder: &mut MigrationBuilder) -> Result<()> {
    migration_builder.create_table("dbo.Post", |table| {
        table.column(Column::new("Id", ClrType::Int32));
        table.column(Column::new("BlogId", ClrType::Int32));
        table.column(Column::new("Title", ClrType::String));
        table.primary_key(PrimaryKey::new("PK_Post", vec!["Id".into()]));
    });

    migration_builder.add_foreign_key("dbo.Post", ForeignKey::new("FK_Post_Blog_BlogId", vec!["BlogId".into()], "dbo.Blog".into(), vec!["Id".into()])?);

    migration_builder.create_index("dbo.Post", Index::new("IX_Post_BlogId", vec!["BlogId".into()], false));

    Ok(())
}

pub fn down(migration_builder: &mut MigrationBuilder) -> Result<()> {
    migration_builder.drop_foreign_key("dbo.Post", "FK_Post_Blog_BlogId");

    migration_builder.drop_table("dbo.Post");

    Ok(())
}
