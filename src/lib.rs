//! Diffs two logical data models and produces the ordered list of schema
//! migration operations that turns one database into the other, plus SQL
//! and Rust code for those operations.

pub mod catalog;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod migration;
pub mod model;
pub mod render;
pub mod schema_loader;

pub use catalog::Database;
pub use diff::ModelDiffer;
pub use diff::operations::MigrationOperation;
pub use error::{ModelError, Result};
pub use model::Model;

/// Everything generated migration modules refer to.
pub mod prelude {
    pub use crate::catalog::{
        Annotated, Column, ForeignKey, Index, PrimaryKey, ReferentialAction, Sequence,
        UniqueConstraint,
    };
    pub use crate::codegen::MigrationBuilder;
    pub use crate::error::Result;
    pub use crate::model::{ClrType, ValueGenerated};
    pub use serde_json::json;
}
