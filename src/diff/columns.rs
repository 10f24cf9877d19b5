use super::operations::{
    AddColumnOperation, AlterColumnOperation, DropColumnOperation, RenameColumnOperation,
};
use super::renames::resolve_renames;
use super::{DiffContext, DiffSession, Phase, Plan};
use tracing::debug;

/// Column changes of paired tables. Everything here runs after the table
/// renames, so operations address the table by its target name.
pub fn diff_columns(context: &DiffContext<'_>, session: &mut DiffSession, plan: &mut Plan) {
    for pair in &context.pairs {
        let table = &pair.target.name;

        for column in &pair.source.columns {
            if pair.columns.target_of(&column.name).is_none() {
                plan.push(
                    Phase::DropColumns,
                    DropColumnOperation::new(table.clone(), &column.name),
                );
            }
        }

        let pending = pair
            .columns
            .pairs()
            .iter()
            .filter(|(old, new)| old != new)
            .cloned()
            .collect();
        for (old, new) in resolve_renames(pending, |_: &String| session.next_temp_name()) {
            plan.push(
                Phase::RenameColumns,
                RenameColumnOperation::new(table.clone(), &old, &new),
            );
        }

        for (old_name, new_name) in pair.columns.pairs() {
            let (Some(old), Some(new)) = (
                pair.source.column(old_name),
                pair.target.column(new_name),
            ) else {
                continue;
            };
            if old.same_definition(new) {
                continue;
            }
            let mut old = old.clone();
            old.name.clone_from(new_name);
            let operation = AlterColumnOperation::new(table.clone(), old, new.clone());
            if operation.is_destructive_change {
                debug!("Altering {}.{} may lose data", table, new_name);
            }
            plan.push(Phase::AlterColumns, operation);
        }

        for column in &pair.target.columns {
            if pair.columns.source_of(&column.name).is_none() {
                plan.push(
                    Phase::AddColumns,
                    AddColumnOperation::new(table.clone(), column.clone()),
                );
            }
        }
    }
}
