pub mod postgres;
pub mod sql;
pub mod sqlserver;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use sql::{MigrationSqlGenerator, SqlDialect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSql {
    pub safety: Safety,
    pub sql: String,
}

impl RenderedSql {
    pub fn new(sql: String) -> Self {
        Self {
            sql,
            safety: Safety::Safe,
        }
    }

    pub fn destructive(sql: String) -> Self {
        Self {
            sql,
            safety: Safety::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.safety == Safety::Destructive
    }
}

impl fmt::Display for RenderedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Double-quoted identifier, as PostgreSQL and standard SQL write them.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Bracketed identifier, as SQL Server writes them.
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

pub fn escape_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Target database flavour for generated SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Postgres,
    #[value(name = "sqlserver")]
    #[serde(rename = "sqlserver")]
    SqlServer,
}

impl Dialect {
    /// A fresh dialect instance. SQL Server numbers its batch variables per
    /// instance, so every script starts from zero.
    pub fn sql_dialect(&self) -> Box<dyn SqlDialect> {
        match self {
            Dialect::Postgres => Box::new(postgres::PostgresDialect),
            Dialect::SqlServer => Box::new(sqlserver::SqlServerDialect::new()),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => f.write_str("postgres"),
            Dialect::SqlServer => f.write_str("sqlserver"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}
