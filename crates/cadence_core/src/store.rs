use std::collections::HashSet;

use chrono::Utc;

use crate::error::TrackerError;
use crate::task::{MoveDirection, Recurrence, Task};

/// Ordered collection of tasks. Order carries meaning only inside a
/// recurrence-type partition; ids are unique at all times.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_seq: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted tasks, rejecting duplicate ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, TrackerError> {
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(TrackerError::invariant(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
        }
        Ok(Self { tasks, next_seq: 0 })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Tasks of one recurrence type in their partition order.
    pub fn partition(&self, recurrence: Recurrence) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.recurrence == recurrence)
            .collect()
    }

    pub fn add(&mut self, text: &str, recurrence: Recurrence) -> Result<Task, TrackerError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TrackerError::validation("task text is required"));
        }
        let id = self.fresh_id();
        if self.tasks.iter().any(|task| task.id == id) {
            return Err(TrackerError::invariant(format!("duplicate task id {id}")));
        }
        let task = Task::new(id, trimmed, recurrence);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Removes the task with `id`. Absent ids are a silent no-op; returns
    /// whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        before != self.tasks.len()
    }

    /// Replaces the task's text in place, keeping id, recurrence type and
    /// completion history.
    pub fn edit(&mut self, id: &str, new_text: &str) -> Result<(), TrackerError> {
        let trimmed = new_text.trim();
        if trimmed.is_empty() {
            return Err(TrackerError::validation("task text is required"));
        }
        let Some(task) = self.get_mut(id) else {
            return Err(TrackerError::validation(format!("no task with id {id}")));
        };
        task.text = trimmed.to_string();
        Ok(())
    }

    /// Moves the task one position within its recurrence-type partition.
    /// Unknown ids and out-of-bounds moves are silent no-ops; returns
    /// whether the order changed. Other partitions keep their positions.
    pub fn move_within_type(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some(task) = self.get(id) else {
            return false;
        };
        let slots = self.partition_slots(task.recurrence);
        let Some(pos) = slots.iter().position(|&slot| self.tasks[slot].id == id) else {
            return false;
        };
        let neighbor = match direction {
            MoveDirection::Up => pos.checked_sub(1),
            MoveDirection::Down => (pos + 1 < slots.len()).then_some(pos + 1),
        };
        let Some(neighbor) = neighbor else {
            return false;
        };
        self.tasks.swap(slots[pos], slots[neighbor]);
        true
    }

    /// Replaces the within-type order of one partition with an explicit id
    /// sequence, as produced by a completed drag-and-drop. The sequence
    /// must be exactly the partition's current id set; otherwise the store
    /// is left unchanged.
    pub fn reorder_partition(
        &mut self,
        recurrence: Recurrence,
        ordered_ids: &[String],
    ) -> Result<(), TrackerError> {
        let slots = self.partition_slots(recurrence);
        if ordered_ids.len() != slots.len() {
            return Err(TrackerError::validation(format!(
                "reorder expects {} ids for the {} partition, got {}",
                slots.len(),
                recurrence.label(),
                ordered_ids.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut reordered = Vec::with_capacity(slots.len());
        for id in ordered_ids {
            if !seen.insert(id.as_str()) {
                return Err(TrackerError::validation(format!(
                    "duplicate id {id} in reorder"
                )));
            }
            match self.get(id) {
                Some(task) if task.recurrence == recurrence => reordered.push(task.clone()),
                _ => {
                    return Err(TrackerError::validation(format!(
                        "id {id} is not in the {} partition",
                        recurrence.label()
                    )));
                }
            }
        }

        for (slot, task) in slots.into_iter().zip(reordered) {
            self.tasks[slot] = task;
        }
        Ok(())
    }

    fn partition_slots(&self, recurrence: Recurrence) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.recurrence == recurrence)
            .map(|(slot, _)| slot)
            .collect()
    }

    fn fresh_id(&mut self) -> String {
        let stamp = Utc::now().timestamp_millis();
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("task-{stamp}-{seq}")
    }
}
