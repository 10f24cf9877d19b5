//! Source-code generation for migrations
//!
//! Operations become Rust statements against a [`MigrationBuilder`] named
//! `migration_builder`. Running the statements rebuilds operations equal to
//! the ones they were generated from. Output is a pure function of the
//! input: annotations are emitted in name order and facets in a fixed order.

pub mod builder;

pub use builder::MigrationBuilder;

use crate::catalog::sequence::DEFAULT_SEQUENCE_TYPE;
use crate::catalog::{
    Annotations, Column, ColumnDefault, ForeignKey, Index, ObjectName, PrimaryKey, Sequence,
    UniqueConstraint,
};
use crate::diff::operations::{CreateTableOperation, MigrationOperation};
use crate::model::{ClrType, DefaultValue, ValueGenerated};
use serde_json::Value;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationCodeGenerator;

impl MigrationCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// One statement per operation, separated by blank lines.
    pub fn generate_operations(&self, operations: &[MigrationOperation]) -> String {
        operations
            .iter()
            .map(generate_operation)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// A complete migration module with `up` and `down` functions.
    pub fn generate_migration(
        &self,
        id: &str,
        up: &[MigrationOperation],
        down: &[MigrationOperation],
    ) -> String {
        format!(
            "//! Migration {id}\n\
             //!\n\
             //! Generated by modeldiff.\n\
             \n\
             use modeldiff::prelude::*;\n\
             \n\
             pub const ID: &str = {id_literal};\n\
             \n\
             pub fn up(migration_builder: &mut MigrationBuilder) -> Result<()> {{\n\
             {up}\
             }}\n\
             \n\
             pub fn down(migration_builder: &mut MigrationBuilder) -> Result<()> {{\n\
             {down}\
             }}\n",
            id = id,
            id_literal = string(id),
            up = self.function_body(up),
            down = self.function_body(down),
        )
    }

    fn function_body(&self, operations: &[MigrationOperation]) -> String {
        let mut body = String::new();
        if !operations.is_empty() {
            body.push_str(&indent(&self.generate_operations(operations)));
            body.push_str("\n\n");
        }
        body.push_str(INDENT);
        body.push_str("Ok(())\n");
        body
    }
}

fn indent(code: &str) -> String {
    code.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn generate_operation(operation: &MigrationOperation) -> String {
    let call = match operation {
        MigrationOperation::CreateTable(op) => create_table(op),
        MigrationOperation::DropTable(op) => format!("drop_table({})", name(&op.name)),
        MigrationOperation::RenameTable(op) => format!(
            "rename_table({}, {})",
            name(&op.name),
            string(&op.new_name)
        ),
        MigrationOperation::MoveTable(op) => format!(
            "move_table({}, {})",
            name(&op.name),
            match &op.new_schema {
                Some(schema) => format!("Some({})", string(schema)),
                None => "None".to_string(),
            }
        ),
        MigrationOperation::AddColumn(op) => {
            format!("add_column({}, {})", name(&op.table), column(&op.column))
        }
        MigrationOperation::DropColumn(op) => {
            format!("drop_column({}, {})", name(&op.table), string(&op.name))
        }
        MigrationOperation::AlterColumn(op) => format!(
            "alter_column({}, {}, {})",
            name(&op.table),
            column(&op.old_column),
            column(&op.column)
        ),
        MigrationOperation::RenameColumn(op) => format!(
            "rename_column({}, {}, {})",
            name(&op.table),
            string(&op.name),
            string(&op.new_name)
        ),
        MigrationOperation::AddPrimaryKey(op) => format!(
            "add_primary_key({}, {})",
            name(&op.table),
            primary_key(&op.primary_key)
        ),
        MigrationOperation::DropPrimaryKey(op) => {
            format!("drop_primary_key({}, {})", name(&op.table), string(&op.name))
        }
        MigrationOperation::AddUniqueConstraint(op) => format!(
            "add_unique_constraint({}, {})",
            name(&op.table),
            unique_constraint(&op.unique_constraint)
        ),
        MigrationOperation::DropUniqueConstraint(op) => format!(
            "drop_unique_constraint({}, {})",
            name(&op.table),
            string(&op.name)
        ),
        MigrationOperation::AddForeignKey(op) => format!(
            "add_foreign_key({}, {})",
            name(&op.table),
            foreign_key(&op.foreign_key)
        ),
        MigrationOperation::DropForeignKey(op) => {
            format!("drop_foreign_key({}, {})", name(&op.table), string(&op.name))
        }
        MigrationOperation::CreateIndex(op) => {
            format!("create_index({}, {})", name(&op.table), index(&op.index))
        }
        MigrationOperation::DropIndex(op) => {
            format!("drop_index({}, {})", name(&op.table), string(&op.name))
        }
        MigrationOperation::RenameIndex(op) => format!(
            "rename_index({}, {}, {})",
            name(&op.table),
            string(&op.name),
            string(&op.new_name)
        ),
        MigrationOperation::CreateSequence(op) => {
            format!("create_sequence({})", sequence(&op.sequence))
        }
        MigrationOperation::AlterSequence(op) => format!(
            "alter_sequence({}, {}, {})",
            name(&op.name),
            op.old_increment_by,
            op.increment_by
        ),
        MigrationOperation::DropSequence(op) => format!("drop_sequence({})", name(&op.name)),
        MigrationOperation::RenameSequence(op) => format!(
            "rename_sequence({}, {})",
            name(&op.name),
            name(&op.new_name)
        ),
        MigrationOperation::RestartSequence(op) => format!(
            "restart_sequence({}, {})",
            name(&op.name),
            op.start_value
        ),
        MigrationOperation::Sql(op) => {
            format!("sql({}, {})", string(&op.sql), op.suppress_transaction)
        }
        MigrationOperation::CopyData(op) => format!(
            "copy_data({}, {}, {}, {})",
            name(&op.source_table),
            str_slice(&op.source_columns),
            name(&op.target_table),
            str_slice(&op.target_columns)
        ),
    };

    let mut statement = format!("migration_builder.{}", call);
    statement.push_str(&operation_annotations(operation));
    statement.push(';');
    statement
}

/// Annotations the operation keeps itself. Operations that add an object
/// carry the object's annotations in its constructor expression instead.
fn operation_annotations(operation: &MigrationOperation) -> String {
    let (annotations, old_annotations) = match operation {
        MigrationOperation::AddColumn(_)
        | MigrationOperation::AlterColumn(_)
        | MigrationOperation::AddPrimaryKey(_)
        | MigrationOperation::AddUniqueConstraint(_)
        | MigrationOperation::AddForeignKey(_)
        | MigrationOperation::CreateIndex(_)
        | MigrationOperation::CreateSequence(_) => return String::new(),
        MigrationOperation::AlterSequence(op) => (&op.annotations, Some(&op.old_annotations)),
        MigrationOperation::CreateTable(op) => (&op.annotations, None),
        MigrationOperation::DropTable(op) => (&op.annotations, None),
        MigrationOperation::RenameTable(op) => (&op.annotations, None),
        MigrationOperation::MoveTable(op) => (&op.annotations, None),
        MigrationOperation::DropColumn(op) => (&op.annotations, None),
        MigrationOperation::RenameColumn(op) => (&op.annotations, None),
        MigrationOperation::DropPrimaryKey(op) => (&op.annotations, None),
        MigrationOperation::DropUniqueConstraint(op) => (&op.annotations, None),
        MigrationOperation::DropForeignKey(op) => (&op.annotations, None),
        MigrationOperation::DropIndex(op) => (&op.annotations, None),
        MigrationOperation::RenameIndex(op) => (&op.annotations, None),
        MigrationOperation::DropSequence(op) => (&op.annotations, None),
        MigrationOperation::RenameSequence(op) => (&op.annotations, None),
        MigrationOperation::RestartSequence(op) => (&op.annotations, None),
        MigrationOperation::Sql(op) => (&op.annotations, None),
        MigrationOperation::CopyData(op) => (&op.annotations, None),
    };
    let mut chain = annotation_calls(annotations, "annotation");
    if let Some(old) = old_annotations {
        chain.push_str(&annotation_calls(old, "old_annotation"));
    }
    chain
}

fn create_table(op: &CreateTableOperation) -> String {
    let mut lines = Vec::new();
    for c in &op.columns {
        lines.push(format!("table.column({});", column(c)));
    }
    if let Some(pk) = &op.primary_key {
        lines.push(format!("table.primary_key({});", primary_key(pk)));
    }
    for unique in &op.unique_constraints {
        lines.push(format!("table.unique_constraint({});", unique_constraint(unique)));
    }
    if lines.is_empty() {
        return format!("create_table({}, |_| {{}})", name(&op.name));
    }
    format!(
        "create_table({}, |table| {{\n{}\n}})",
        name(&op.name),
        indent(&lines.join("\n"))
    )
}

fn column(column: &Column) -> String {
    let mut expr = format!(
        "Column::new({}, {})",
        string(&column.name),
        clr_type(&column.clr_type)
    );
    if column.nullable == column.clr_type.is_value_type() {
        expr.push_str(&format!(".with_nullable({})", column.nullable));
    }
    if let Some(max_length) = column.max_length {
        expr.push_str(&format!(".with_max_length({})", max_length));
    }
    if let Some(precision) = column.precision {
        expr.push_str(&format!(".with_precision({})", precision));
    }
    if let Some(scale) = column.scale {
        expr.push_str(&format!(".with_scale({})", scale));
    }
    if let Some(fixed_length) = column.fixed_length {
        expr.push_str(&format!(".with_fixed_length({})", fixed_length));
    }
    if let Some(unicode) = column.unicode {
        expr.push_str(&format!(".with_unicode({})", unicode));
    }
    match &column.default {
        Some(ColumnDefault::Value(value)) => {
            expr.push_str(&format!(".with_default_value({})", default_value(value)));
        }
        Some(ColumnDefault::Sql(sql)) => {
            expr.push_str(&format!(".with_default_sql({})", string(sql)));
        }
        None => {}
    }
    if let Some(sql) = &column.computed_sql {
        expr.push_str(&format!(".with_computed_sql({})", string(sql)));
    }
    if let Some(store_type) = &column.store_type {
        expr.push_str(&format!(".with_store_type({})", string(store_type)));
    }
    if column.value_generated != ValueGenerated::Never {
        expr.push_str(&format!(
            ".with_value_generated(ValueGenerated::{:?})",
            column.value_generated
        ));
    }
    if column.concurrency_token {
        expr.push_str(".with_concurrency_token(true)");
    }
    expr.push_str(&annotation_calls(&column.annotations, "with_annotation"));
    expr
}

fn primary_key(key: &PrimaryKey) -> String {
    format!(
        "PrimaryKey::new({}, {}){}",
        string(&key.name),
        string_vec(&key.columns),
        annotation_calls(&key.annotations, "with_annotation")
    )
}

fn unique_constraint(key: &UniqueConstraint) -> String {
    format!(
        "UniqueConstraint::new({}, {}){}",
        string(&key.name),
        string_vec(&key.columns),
        annotation_calls(&key.annotations, "with_annotation")
    )
}

fn foreign_key(foreign_key: &ForeignKey) -> String {
    let mut expr = format!(
        "ForeignKey::new({}, {}, {}.into(), {})?",
        string(&foreign_key.name),
        string_vec(&foreign_key.columns),
        name(&foreign_key.principal_table),
        string_vec(&foreign_key.principal_columns)
    );
    if !foreign_key.on_delete.is_no_action() {
        expr.push_str(&format!(
            ".with_on_delete(ReferentialAction::{:?})",
            foreign_key.on_delete
        ));
    }
    if !foreign_key.on_update.is_no_action() {
        expr.push_str(&format!(
            ".with_on_update(ReferentialAction::{:?})",
            foreign_key.on_update
        ));
    }
    expr.push_str(&annotation_calls(&foreign_key.annotations, "with_annotation"));
    expr
}

fn index(index: &Index) -> String {
    format!(
        "Index::new({}, {}, {}){}",
        string(&index.name),
        string_vec(&index.columns),
        index.unique,
        annotation_calls(&index.annotations, "with_annotation")
    )
}

fn sequence(sequence: &Sequence) -> String {
    let mut expr = format!("Sequence::new({}.into())", name(&sequence.name));
    if sequence.type_name != DEFAULT_SEQUENCE_TYPE {
        expr.push_str(&format!(".with_type_name({})", string(&sequence.type_name)));
    }
    if sequence.start_value != 1 {
        expr.push_str(&format!(".with_start_value({})", sequence.start_value));
    }
    if sequence.increment_by != 1 {
        expr.push_str(&format!(".with_increment_by({})", sequence.increment_by));
    }
    expr.push_str(&annotation_calls(&sequence.annotations, "with_annotation"));
    expr
}

fn clr_type(clr_type: &ClrType) -> String {
    match clr_type {
        ClrType::Custom(custom) => format!("ClrType::Custom({}.into())", string(custom)),
        other => format!("ClrType::{:?}", other),
    }
}

fn default_value(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Bool(value) => value.to_string(),
        DefaultValue::Int(value) => format!("{}_i64", value),
        DefaultValue::Float(value) if value.is_nan() => "f64::NAN".to_string(),
        DefaultValue::Float(value) if value.is_infinite() => {
            if value.is_sign_positive() {
                "f64::INFINITY".to_string()
            } else {
                "f64::NEG_INFINITY".to_string()
            }
        }
        DefaultValue::Float(value) => format!("{:?}_f64", value),
        DefaultValue::String(value) => string(value),
    }
}

fn annotation_calls(annotations: &Annotations, method: &str) -> String {
    annotations
        .iter()
        .map(|(key, value)| format!(".{}({}, {})", method, string(key), annotation_value(value)))
        .collect()
}

fn annotation_value(value: &Value) -> String {
    match value {
        Value::String(s) => string(s),
        Value::Bool(b) => b.to_string(),
        other => format!("json!({})", other),
    }
}

fn name(name: &ObjectName) -> String {
    string(&name.to_string())
}

fn string(value: &str) -> String {
    format!("{:?}", value)
}

fn string_vec(values: &[String]) -> String {
    let items = values
        .iter()
        .map(|v| format!("{}.into()", string(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("vec![{}]", items)
}

fn str_slice(values: &[String]) -> String {
    let items = values
        .iter()
        .map(|v| string(v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("&[{}]", items)
}
