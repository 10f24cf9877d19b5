//! Ordering of renames within one namespace so that no rename targets a
//! name that is still taken.

use std::fmt::Display;
use tracing::debug;

/// Orders `(old, new)` renames. A rename runs once nothing else still
/// holds its target name. When only cycles remain, the first pending
/// rename is routed through a temporary name from `temp_for`, and the
/// move from the temporary name to the final one runs last.
pub fn resolve_renames<N>(
    mut pending: Vec<(N, N)>,
    mut temp_for: impl FnMut(&N) -> N,
) -> Vec<(N, N)>
where
    N: Clone + PartialEq + Display,
{
    pending.retain(|(old, new)| old != new);
    let mut ordered = Vec::with_capacity(pending.len());
    let mut deferred = Vec::new();

    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|(_, new)| !pending.iter().any(|(old, _)| old == new));
        match ready {
            Some(i) => ordered.push(pending.remove(i)),
            None => {
                let (old, new) = pending.remove(0);
                let temp = temp_for(&old);
                debug!("Renaming {} through {} to break a rename cycle", old, temp);
                ordered.push((old, temp.clone()));
                deferred.push((temp, new));
            }
        }
    }

    ordered.extend(deferred);
    ordered
}
