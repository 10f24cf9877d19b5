use super::operations::{
    CreateTableOperation, DropTableOperation, MoveTableOperation, RenameTableOperation,
};
use super::renames::resolve_renames;
use super::{DiffContext, DiffSession, Phase, Plan, ordering};
use crate::catalog::ObjectName;
use std::collections::HashSet;
use tracing::debug;

/// Table drops, renames and moves, and creates. Foreign keys and indexes
/// of new tables are emitted by their own modules.
pub fn diff_tables(context: &DiffContext<'_>, session: &mut DiffSession, plan: &mut Plan) {
    for table in context.dropped_tables() {
        plan.push(
            Phase::DropTables,
            DropTableOperation::new(table.name.clone()),
        );
    }

    // Names held once drops have run; renames update it as they go.
    let mut occupied: HashSet<ObjectName> =
        context.pairs.iter().map(|pair| pair.source.name.clone()).collect();
    let pending = context
        .pairs
        .iter()
        .filter(|pair| pair.is_renamed())
        .map(|pair| (pair.source.name.clone(), pair.target.name.clone()))
        .collect();
    let renames = resolve_renames(pending, |old: &ObjectName| {
        old.with_name(&session.next_temp_name())
    });
    for (old, new) in renames {
        rename_table(plan, session, &mut occupied, old, new);
    }

    let created = context.new_tables();
    for i in ordering::principal_first(&created) {
        plan.push(
            Phase::CreateTables,
            CreateTableOperation::from_table(created[i]),
        );
    }
}

/// A schema change is a move and a name change is a rename. When both
/// change, the move goes first unless the old name is taken in the new
/// schema, then the rename goes first. When the new name is taken in the
/// old schema as well, the table travels under a temporary name.
fn rename_table(
    plan: &mut Plan,
    session: &mut DiffSession,
    occupied: &mut HashSet<ObjectName>,
    old: ObjectName,
    new: ObjectName,
) {
    occupied.remove(&old);
    let moved_first = old.with_schema(new.schema());
    let renamed_first = old.with_name(&new.name);
    let path = if old.schema == new.schema || old.name == new.name {
        vec![new.clone()]
    } else if !occupied.contains(&moved_first) {
        vec![moved_first, new.clone()]
    } else if !occupied.contains(&renamed_first) {
        vec![renamed_first, new.clone()]
    } else {
        let temp = old.with_name(&session.next_temp_name());
        debug!("Moving {} to {} through {}", old, new, temp);
        let temp_moved = temp.with_schema(new.schema());
        vec![temp, temp_moved, new.clone()]
    };

    let mut current = old;
    for next in path {
        if current.schema != next.schema {
            plan.push(
                Phase::RenameTables,
                MoveTableOperation::new(current.clone(), next.schema()),
            );
        } else {
            plan.push(
                Phase::RenameTables,
                RenameTableOperation::new(current.clone(), &next.name),
            );
        }
        current = next;
    }
    occupied.insert(new);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, Database, Projection, Table};
    use crate::diff::operations::MigrationOperation;
    use crate::model::ClrType;

    fn table(name: &str) -> Table {
        let mut table = Table::new(ObjectName::from(name));
        table.add_column(Column::new("Id", ClrType::Int32)).unwrap();
        table
    }

    #[test]
    fn test_move_then_rename() {
        let mut plan = Plan::default();
        let mut session = DiffSession::new("tmp");
        rename_table(
            &mut plan,
            &mut session,
            &mut HashSet::new(),
            ObjectName::from("dbo.A"),
            ObjectName::from("archive.B"),
        );
        assert_eq!(
            plan.into_operations(),
            vec![
                MigrationOperation::from(MoveTableOperation::new(
                    ObjectName::from("dbo.A"),
                    Some("archive")
                )),
                MigrationOperation::from(RenameTableOperation::new(
                    ObjectName::from("archive.A"),
                    "B"
                )),
            ]
        );
    }

    fn steps(occupied: &[&str], old: &str, new: &str) -> Vec<String> {
        let mut plan = Plan::default();
        let mut session = DiffSession::new("tmp");
        let mut occupied = occupied.iter().map(|n| ObjectName::from(*n)).collect();
        rename_table(
            &mut plan,
            &mut session,
            &mut occupied,
            ObjectName::from(old),
            ObjectName::from(new),
        );
        plan.into_operations().iter().map(|op| op.to_string()).collect()
    }

    #[test]
    fn test_rename_before_move_when_old_name_is_taken() {
        assert_eq!(
            steps(&["dbo.A", "x.A"], "dbo.A", "x.B"),
            vec!["RenameTable dbo.A -> B", "MoveTable dbo.B -> x"]
        );
    }

    #[test]
    fn test_move_through_temporary_name_when_both_orders_collide() {
        assert_eq!(
            steps(&["dbo.A", "dbo.B", "x.A"], "dbo.A", "x.B"),
            vec![
                "RenameTable dbo.A -> tmp0",
                "MoveTable dbo.tmp0 -> x",
                "RenameTable x.tmp0 -> B",
            ]
        );
    }

    #[test]
    fn test_dropped_and_created_tables() {
        let source = Projection::from_database(Database {
            tables: vec![table("Old")],
            sequences: vec![],
        });
        let target = Projection::from_database(Database {
            tables: vec![{
                let mut t = table("New");
                t.add_column(Column::new("Other", ClrType::String)).unwrap();
                t
            }],
            sequences: vec![],
        });
        let context = DiffContext::new(&source, &target, 0.8);
        let mut session = DiffSession::new("tmp");
        let mut plan = Plan::default();
        diff_tables(&context, &mut session, &mut plan);
        let kinds: Vec<_> = plan.into_operations().iter().map(|op| op.kind()).collect();
        assert_eq!(kinds, vec!["DropTable", "CreateTable"]);
    }
}
