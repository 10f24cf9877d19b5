use super::operations::{
    AlterSequenceOperation, CreateSequenceOperation, DropSequenceOperation,
    RenameSequenceOperation, RestartSequenceOperation,
};
use super::{Phase, Plan};
use crate::catalog::{Database, Sequence};

/// Sequences pair by exact name, then by simple name across schemas with
/// the same type (a rename). A type change recreates the sequence;
/// increment and annotation changes alter it, and a new start value
/// restarts it.
pub fn diff_sequences(source: &Database, target: &Database, plan: &mut Plan) {
    let mut matched = vec![false; target.sequences.len()];
    let mut pairs: Vec<(&Sequence, &Sequence)> = Vec::new();
    let mut unmatched = Vec::new();

    for old in &source.sequences {
        match target.sequences.iter().position(|new| new.name == old.name) {
            Some(j) => {
                matched[j] = true;
                pairs.push((old, &target.sequences[j]));
            }
            None => unmatched.push(old),
        }
    }

    for old in unmatched {
        let moved = target.sequences.iter().enumerate().position(|(j, new)| {
            !matched[j] && new.name.name == old.name.name && new.type_name == old.type_name
        });
        match moved {
            Some(j) => {
                matched[j] = true;
                let new = &target.sequences[j];
                plan.push(
                    Phase::RenameSequences,
                    RenameSequenceOperation::new(old.name.clone(), new.name.clone()),
                );
                pairs.push((old, new));
            }
            None => plan.push(
                Phase::DropSequences,
                DropSequenceOperation::new(old.name.clone()),
            ),
        }
    }

    for (old, new) in pairs {
        if old.type_name != new.type_name {
            plan.push(
                Phase::DropSequences,
                DropSequenceOperation::new(old.name.clone()),
            );
            plan.push(
                Phase::ChangeSequences,
                CreateSequenceOperation::new(new.clone()),
            );
            continue;
        }
        if old.increment_by != new.increment_by || old.annotations != new.annotations {
            let mut operation =
                AlterSequenceOperation::new(new.name.clone(), old.increment_by, new.increment_by);
            operation.annotations = new.annotations.clone();
            operation.old_annotations = old.annotations.clone();
            plan.push(Phase::ChangeSequences, operation);
        }
        if old.start_value != new.start_value {
            plan.push(
                Phase::ChangeSequences,
                RestartSequenceOperation::new(new.name.clone(), new.start_value),
            );
        }
    }

    for (new, _) in target.sequences.iter().zip(&matched).filter(|(_, done)| !**done) {
        plan.push(
            Phase::ChangeSequences,
            CreateSequenceOperation::new(new.clone()),
        );
    }
}
