//! Shared SQL rendering for CREATE INDEX statements

use super::SqlDialect;
use crate::catalog::{Index, ObjectName};

pub fn render_create_index(dialect: &dyn SqlDialect, table: &ObjectName, index: &Index) -> String {
    format!(
        "CREATE {}{}INDEX {} ON {} ({});",
        if index.unique { "UNIQUE " } else { "" },
        dialect.index_options(index),
        dialect.quote_ident(&index.name),
        dialect.qualified(table),
        dialect.column_list(&index.columns)
    )
}
