use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::task::{Recurrence, Task};

/// Persisted shape of a task. `completionHistory` may be absent in older
/// snapshots and defaults to empty; fields this version does not know about
/// are captured in `extra` and written back untouched on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub text: String,
    pub recurrence_type: Recurrence,
    #[serde(default)]
    pub completion_history: Vec<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskRecord {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            recurrence_type: task.recurrence,
            completion_history: task.completion_history.clone(),
            extra: task.extra.clone(),
        }
    }

    pub fn into_task(self) -> Task {
        Task {
            id: self.id,
            text: self.text,
            recurrence: self.recurrence_type,
            completion_history: self.completion_history,
            extra: self.extra,
        }
    }
}

/// Load/save contract the surrounding application fulfils. The collaborator
/// owns its failure handling entirely; the core only ever sees a snapshot
/// or nothing.
pub trait StorageGateway {
    /// The persisted tasks, or `None` on a first run.
    fn load(&self) -> Option<Vec<TaskRecord>>;
    fn save(&self, records: &[TaskRecord]);
}

impl<G: StorageGateway> StorageGateway for Rc<G> {
    fn load(&self) -> Option<Vec<TaskRecord>> {
        (**self).load()
    }

    fn save(&self, records: &[TaskRecord]) {
        (**self).save(records)
    }
}

/// In-memory gateway for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    records: RefCell<Option<Vec<TaskRecord>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TaskRecord>) -> Self {
        Self {
            records: RefCell::new(Some(records)),
        }
    }

    /// The last saved snapshot, if any.
    pub fn records(&self) -> Option<Vec<TaskRecord>> {
        self.records.borrow().clone()
    }
}

impl StorageGateway for MemoryGateway {
    fn load(&self) -> Option<Vec<TaskRecord>> {
        self.records.borrow().clone()
    }

    fn save(&self, records: &[TaskRecord]) {
        *self.records.borrow_mut() = Some(records.to_vec());
    }
}
