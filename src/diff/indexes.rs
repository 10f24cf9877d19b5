use super::operations::{CreateIndexOperation, DropIndexOperation, RenameIndexOperation};
use super::renames::resolve_renames;
use super::{DiffContext, DiffSession, Phase, Plan, TablePair};
use crate::catalog::Index;
use std::collections::HashSet;

/// Same columns (after column pairing, order included), uniqueness and
/// annotations. The name is not part of the structure.
fn same_structure(pair: &TablePair<'_>, old: &Index, new: &Index) -> bool {
    old.unique == new.unique
        && old.annotations == new.annotations
        && pair.columns.map_all(&old.columns).as_deref() == Some(new.columns.as_slice())
}

/// Indexes of paired tables are matched by name and structure first, then
/// by structure alone, which turns into a rename. Unmatched indexes are
/// dropped or created; indexes of new tables are created after their
/// table and foreign keys exist.
pub fn diff_indexes(context: &DiffContext<'_>, session: &mut DiffSession, plan: &mut Plan) {
    // Target indexes already present, as (target table position, index position).
    let mut kept: HashSet<(usize, usize)> = HashSet::new();

    for pair in &context.pairs {
        let target_position = context
            .target
            .tables
            .iter()
            .position(|t| t.name == pair.target.name)
            .unwrap_or(usize::MAX);
        let target_indexes = &pair.target.indexes;
        let mut matched = vec![false; target_indexes.len()];
        let mut unmatched_source = Vec::new();

        for old in &pair.source.indexes {
            let partner = target_indexes.iter().enumerate().position(|(j, new)| {
                !matched[j] && old.name == new.name && same_structure(pair, old, new)
            });
            match partner {
                Some(j) => matched[j] = true,
                None => unmatched_source.push(old),
            }
        }

        let mut pending = Vec::new();
        for old in unmatched_source {
            let partner = target_indexes
                .iter()
                .enumerate()
                .position(|(j, new)| !matched[j] && same_structure(pair, old, new));
            match partner {
                Some(j) => {
                    matched[j] = true;
                    pending.push((old.name.clone(), target_indexes[j].name.clone()));
                }
                None => plan.push(
                    Phase::DropIndexes,
                    DropIndexOperation::new(pair.source.name.clone(), &old.name),
                ),
            }
        }

        for (old, new) in resolve_renames(pending, |_: &String| session.next_temp_name()) {
            plan.push(
                Phase::RenameIndexes,
                RenameIndexOperation::new(pair.target.name.clone(), &old, &new),
            );
        }

        kept.extend(
            matched
                .iter()
                .enumerate()
                .filter(|(_, done)| **done)
                .map(|(j, _)| (target_position, j)),
        );
    }

    for (i, table) in context.target.tables.iter().enumerate() {
        for (j, index) in table.indexes.iter().enumerate() {
            if kept.contains(&(i, j)) {
                continue;
            }
            plan.push(
                Phase::CreateIndexes,
                CreateIndexOperation::new(table.name.clone(), index.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, Database, ObjectName, Projection, Table};
    use crate::diff::operations::MigrationOperation;
    use crate::model::ClrType;

    fn table(indexes: &[(&str, &str, bool)]) -> Table {
        let mut table = Table::new(ObjectName::from("T"));
        for column in ["A", "B"] {
            table.add_column(Column::new(column, ClrType::Int32)).unwrap();
        }
        for (name, column, unique) in indexes {
            table
                .add_index(Index::new(name, vec![column.to_string()], *unique))
                .unwrap();
        }
        table
    }

    fn diff(source: Table, target: Table) -> Vec<MigrationOperation> {
        let source = Projection::from_database(Database {
            tables: vec![source],
            sequences: vec![],
        });
        let target = Projection::from_database(Database {
            tables: vec![target],
            sequences: vec![],
        });
        let context = DiffContext::new(&source, &target, 0.8);
        let mut session = DiffSession::new("tmp");
        let mut plan = Plan::default();
        diff_indexes(&context, &mut session, &mut plan);
        plan.into_operations()
    }

    #[test]
    fn test_name_only_change_is_a_rename() {
        let ops = diff(table(&[("IX_old", "A", false)]), table(&[("IX_new", "A", false)]));
        assert_eq!(
            ops,
            vec![MigrationOperation::from(RenameIndexOperation::new(
                ObjectName::from("T"),
                "IX_old",
                "IX_new"
            ))]
        );
    }

    #[test]
    fn test_uniqueness_change_recreates() {
        let ops = diff(table(&[("IX", "A", false)]), table(&[("IX", "A", true)]));
        let kinds: Vec<_> = ops.iter().map(|op| op.kind()).collect();
        assert_eq!(kinds, vec!["DropIndex", "CreateIndex"]);
    }

    #[test]
    fn test_swapped_names_go_through_a_temporary() {
        let ops = diff(
            table(&[("IX_1", "A", false), ("IX_2", "B", false)]),
            table(&[("IX_2", "A", false), ("IX_1", "B", false)]),
        );
        let renames: Vec<String> = ops.iter().map(|op| op.to_string()).collect();
        assert_eq!(
            renames,
            vec![
                "RenameIndex IX_1 -> tmp0 on T",
                "RenameIndex IX_2 -> IX_1 on T",
                "RenameIndex tmp0 -> IX_2 on T",
            ]
        );
    }
}
