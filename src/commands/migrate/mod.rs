pub mod new;

pub use new::cmd_migrate_new;
