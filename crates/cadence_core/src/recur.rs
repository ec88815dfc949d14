use chrono::NaiveDate;

use crate::calendar::{is_same_month, is_same_week};
use crate::task::{Recurrence, Task};

/// Whether a history entry belongs to the same recurrence cycle as
/// `reference`: the same calendar day for one-time and daily tasks, the same
/// Sunday-aligned week for weekly, the same calendar month for monthly.
fn same_cycle(recurrence: Recurrence, completed: NaiveDate, reference: NaiveDate) -> bool {
    match recurrence {
        Recurrence::OneTime | Recurrence::Daily => completed == reference,
        Recurrence::Weekly => is_same_week(completed, reference),
        Recurrence::Monthly => is_same_month(completed, reference),
    }
}

/// Whether a history entry fulfils the task's requirement for `reference`.
/// A one-time task is fulfilled by any completion, whatever its date.
fn satisfies(recurrence: Recurrence, completed: NaiveDate, reference: NaiveDate) -> bool {
    match recurrence {
        Recurrence::OneTime => true,
        _ => same_cycle(recurrence, completed, reference),
    }
}

/// Whether the task requires action on `reference`. `is_satisfied` is the
/// strict negation over the same predicate, so the two partition every task
/// at every date with no overlap and no gap.
pub fn is_due(task: &Task, reference: NaiveDate) -> bool {
    !is_satisfied(task, reference)
}

pub fn is_satisfied(task: &Task, reference: NaiveDate) -> bool {
    task.completion_history
        .iter()
        .any(|&done| satisfies(task.recurrence, done, reference))
}

/// Records `reference` in the history iff the task is due then. Marking an
/// already satisfied task is a no-op, which also keeps the history free of
/// duplicate days. Returns whether an entry was appended.
pub fn mark_complete(task: &mut Task, reference: NaiveDate) -> bool {
    if !is_due(task, reference) {
        return false;
    }
    task.completion_history.push(reference);
    true
}

/// Removes every history entry in the same recurrence cycle as `reference`.
/// A weekly or monthly task's satisfying entry rarely equals `reference`
/// itself, hence the bulk sweep rather than a single-date removal. Returns
/// how many entries were removed.
pub fn undo_complete(task: &mut Task, reference: NaiveDate) -> usize {
    let before = task.completion_history.len();
    task.completion_history
        .retain(|&done| !same_cycle(task.recurrence, done, reference));
    before - task.completion_history.len()
}
