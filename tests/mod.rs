// Integration tests for modeldiff

pub mod cli;
pub mod codegen;
pub mod diff;
pub mod fixtures;
pub mod helpers;
pub mod migration;
pub mod modifier;
pub mod render;
