//! Migration modules as the code generator writes them, compiled into the
//! test crate so that they can be run against a `MigrationBuilder`.

pub mod add_posts;
