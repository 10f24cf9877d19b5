//! Primary keys, unique constraints and foreign keys. None of them can be
//! altered in place: anything that does not match exactly is dropped and
//! added again.

use super::operations::{
    AddForeignKeyOperation, AddPrimaryKeyOperation, AddUniqueConstraintOperation,
    DropForeignKeyOperation, DropPrimaryKeyOperation, DropUniqueConstraintOperation,
};
use super::{DiffContext, Phase, Plan, TablePair};
use crate::catalog::{ForeignKey, ObjectName};
use std::collections::HashSet;
use tracing::debug;

/// Keys dropped from tables that survive the migration, as
/// `(source table, source columns)`. Foreign keys pointing at one of them
/// have to be recreated.
pub type RecreatedKeys = HashSet<(ObjectName, Vec<String>)>;

fn key_matches(
    pair: &TablePair<'_>,
    source: (&str, &[String]),
    target: (&str, &[String]),
    same_annotations: bool,
) -> bool {
    source.0 == target.0
        && source.1.len() == target.1.len()
        && pair.columns.map_all(source.1).as_deref() == Some(target.1)
        && same_annotations
}

pub fn diff_keys(context: &DiffContext<'_>, plan: &mut Plan) -> RecreatedKeys {
    let mut recreated = RecreatedKeys::new();

    for pair in &context.pairs {
        let (source, target) = (pair.source, pair.target);

        match (&source.primary_key, &target.primary_key) {
            (Some(old), Some(new))
                if key_matches(
                    pair,
                    (old.name.as_str(), old.columns.as_slice()),
                    (new.name.as_str(), new.columns.as_slice()),
                    old.annotations == new.annotations,
                ) => {}
            (old, new) => {
                if let Some(old) = old {
                    plan.push(
                        Phase::DropPrimaryKeys,
                        DropPrimaryKeyOperation::new(source.name.clone(), &old.name),
                    );
                    recreated.insert((source.name.clone(), old.columns.clone()));
                }
                if let Some(new) = new {
                    plan.push(
                        Phase::AddPrimaryKeys,
                        AddPrimaryKeyOperation::new(target.name.clone(), new.clone()),
                    );
                }
            }
        }

        let mut matched = vec![false; target.unique_constraints.len()];
        for old in &source.unique_constraints {
            let partner = target.unique_constraints.iter().enumerate().position(|(j, new)| {
                !matched[j]
                    && key_matches(
                        pair,
                        (old.name.as_str(), old.columns.as_slice()),
                        (new.name.as_str(), new.columns.as_slice()),
                        old.annotations == new.annotations,
                    )
            });
            match partner {
                Some(j) => matched[j] = true,
                None => {
                    plan.push(
                        Phase::DropUniqueConstraints,
                        DropUniqueConstraintOperation::new(source.name.clone(), &old.name),
                    );
                    recreated.insert((source.name.clone(), old.columns.clone()));
                }
            }
        }
        for (new, _) in target
            .unique_constraints
            .iter()
            .zip(&matched)
            .filter(|(_, done)| !**done)
        {
            plan.push(
                Phase::AddUniqueConstraints,
                AddUniqueConstraintOperation::new(target.name.clone(), new.clone()),
            );
        }
    }

    recreated
}

fn foreign_keys_match(
    context: &DiffContext<'_>,
    pair: &TablePair<'_>,
    recreated: &RecreatedKeys,
    old: &ForeignKey,
    new: &ForeignKey,
) -> bool {
    if old.name != new.name
        || old.columns.len() != new.columns.len()
        || old.on_delete != new.on_delete
        || old.on_update != new.on_update
        || old.annotations != new.annotations
    {
        return false;
    }
    if pair.columns.map_all(&old.columns).as_deref() != Some(new.columns.as_slice()) {
        return false;
    }
    let Some(principal) = context.pair_by_source(&old.principal_table) else {
        return false;
    };
    if principal.target.name != new.principal_table
        || principal.columns.map_all(&old.principal_columns).as_deref()
            != Some(new.principal_columns.as_slice())
    {
        return false;
    }
    if recreated.contains(&(old.principal_table.clone(), old.principal_columns.clone())) {
        debug!(
            "Recreating foreign key {} because its principal key is recreated",
            old.name
        );
        return false;
    }
    true
}

/// Drops run in source table order and adds in target table order. Every
/// foreign key of a dropped table is dropped explicitly so the table drops
/// that follow never meet a dangling reference.
pub fn diff_foreign_keys(context: &DiffContext<'_>, recreated: &RecreatedKeys, plan: &mut Plan) {
    let mut kept: HashSet<(ObjectName, String)> = HashSet::new();

    for table in &context.source.tables {
        let Some(pair) = context.pair_by_source(&table.name) else {
            for fk in &table.foreign_keys {
                plan.push(
                    Phase::DropForeignKeys,
                    DropForeignKeyOperation::new(table.name.clone(), &fk.name),
                );
            }
            continue;
        };

        let target = pair.target;
        for old in &table.foreign_keys {
            let partner = target.foreign_keys.iter().find(|new| {
                !kept.contains(&(target.name.clone(), new.name.clone()))
                    && foreign_keys_match(context, pair, recreated, old, new)
            });
            match partner {
                Some(new) => {
                    kept.insert((target.name.clone(), new.name.clone()));
                }
                None => plan.push(
                    Phase::DropForeignKeys,
                    DropForeignKeyOperation::new(table.name.clone(), &old.name),
                ),
            }
        }
    }

    for table in &context.target.tables {
        for fk in &table.foreign_keys {
            if kept.contains(&(table.name.clone(), fk.name.clone())) {
                continue;
            }
            plan.push(
                Phase::AddForeignKeys,
                AddForeignKeyOperation::new(table.name.clone(), fk.clone()),
            );
        }
    }
}
