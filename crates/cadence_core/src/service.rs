use chrono::NaiveDate;
use tracing::{debug, info};

use crate::calendar::{Clock, SystemClock};
use crate::error::TrackerError;
use crate::recur;
use crate::rollup::{self, SeriesPoint};
use crate::storage::{MemoryGateway, StorageGateway, TaskRecord};
use crate::store::TaskStore;
use crate::task::{MoveDirection, Recurrence, Task};

/// A user action forwarded by the presentation layer. Dispatch mutates the
/// store, persists, and hands back a fresh snapshot to render, keeping the
/// core decoupled from any UI event model.
#[derive(Debug, Clone)]
pub enum Intent {
    Add { text: String, recurrence: Recurrence },
    Complete { id: String },
    Undo { id: String },
    Edit { id: String, text: String },
    Delete { id: String },
    Move { id: String, direction: MoveDirection },
    Reorder { recurrence: Recurrence, ordered_ids: Vec<String> },
}

/// Due tasks of one recurrence type, in partition order.
#[derive(Debug, Clone)]
pub struct TypeGroup {
    pub recurrence: Recurrence,
    pub tasks: Vec<Task>,
}

/// Read-only view the presentation layer renders from. Recomputed in full
/// after every intent.
#[derive(Debug, Clone)]
pub struct TrackerSnapshot {
    pub due: Vec<TypeGroup>,
    pub completed: Vec<Task>,
    pub series: Vec<SeriesPoint>,
}

pub struct TrackerService {
    store: TaskStore,
    gateway: Box<dyn StorageGateway>,
    clock: Box<dyn Clock>,
    chart_window: Option<u32>,
}

impl std::fmt::Debug for TrackerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerService")
            .field("store", &self.store)
            .field("chart_window", &self.chart_window)
            .finish_non_exhaustive()
    }
}

pub struct TrackerServiceBuilder {
    gateway: Box<dyn StorageGateway>,
    clock: Box<dyn Clock>,
    chart_window: Option<u32>,
}

impl TrackerServiceBuilder {
    pub fn new() -> Self {
        Self {
            gateway: Box::new(MemoryGateway::new()),
            clock: Box::new(SystemClock),
            chart_window: Some(7),
        }
    }

    pub fn gateway(mut self, gateway: Box<dyn StorageGateway>) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Trailing window of the chart series; `None` switches the snapshot to
    /// the sparse whole-history series.
    pub fn chart_window(mut self, window_days: Option<u32>) -> Self {
        self.chart_window = window_days;
        self
    }

    pub fn build(self) -> Result<TrackerService, TrackerError> {
        let store = match self.gateway.load() {
            Some(records) => {
                let tasks: Vec<Task> = records.into_iter().map(TaskRecord::into_task).collect();
                let store = TaskStore::from_tasks(tasks)?;
                info!(count = store.len(), "loaded persisted tasks");
                store
            }
            None => {
                debug!("no persisted tasks, starting empty");
                TaskStore::new()
            }
        };
        Ok(TrackerService {
            store,
            gateway: self.gateway,
            clock: self.clock,
            chart_window: self.chart_window,
        })
    }
}

impl TrackerService {
    pub fn builder() -> TrackerServiceBuilder {
        TrackerServiceBuilder::new()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Applies one intent. A rejected intent returns the error with the
    /// store and persisted snapshot untouched; accepted mutations are saved
    /// through the gateway before this returns.
    pub fn dispatch(&mut self, intent: Intent) -> Result<TrackerSnapshot, TrackerError> {
        match intent {
            Intent::Add { text, recurrence } => {
                let task = self.store.add(&text, recurrence)?;
                info!(id = %task.id, kind = recurrence.label(), "task added");
                self.persist();
            }
            Intent::Complete { id } => {
                let today = self.clock.today();
                if let Some(task) = self.store.get_mut(&id) {
                    if recur::mark_complete(task, today) {
                        info!(id = %id, %today, "task completed");
                        self.persist();
                    } else {
                        debug!(id = %id, "task already satisfied, nothing to record");
                    }
                }
            }
            Intent::Undo { id } => {
                let today = self.clock.today();
                if let Some(task) = self.store.get_mut(&id) {
                    let removed = recur::undo_complete(task, today);
                    if removed > 0 {
                        info!(id = %id, removed, "completion undone");
                        self.persist();
                    }
                }
            }
            Intent::Edit { id, text } => {
                self.store.edit(&id, &text)?;
                debug!(id = %id, "task text updated");
                self.persist();
            }
            Intent::Delete { id } => {
                if self.store.remove(&id) {
                    info!(id = %id, "task deleted");
                    self.persist();
                }
            }
            Intent::Move { id, direction } => {
                if self.store.move_within_type(&id, direction) {
                    debug!(id = %id, ?direction, "task moved");
                    self.persist();
                }
            }
            Intent::Reorder {
                recurrence,
                ordered_ids,
            } => {
                self.store.reorder_partition(recurrence, &ordered_ids)?;
                debug!(kind = recurrence.label(), "partition reordered");
                self.persist();
            }
        }
        Ok(self.snapshot())
    }

    /// The current view: due tasks partitioned by recurrence type, satisfied
    /// tasks for the completed section, and the chart series.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let today = self.clock.today();
        let due = Recurrence::ALL
            .into_iter()
            .map(|recurrence| TypeGroup {
                recurrence,
                tasks: self
                    .store
                    .partition(recurrence)
                    .into_iter()
                    .filter(|task| recur::is_due(task, today))
                    .cloned()
                    .collect(),
            })
            .collect();
        let completed = self
            .store
            .tasks()
            .iter()
            .filter(|task| recur::is_satisfied(task, today))
            .cloned()
            .collect();
        let series = rollup::build_series(self.store.tasks(), self.chart_window, today);
        TrackerSnapshot {
            due,
            completed,
            series,
        }
    }

    fn persist(&self) {
        let records: Vec<TaskRecord> = self
            .store
            .tasks()
            .iter()
            .map(TaskRecord::from_task)
            .collect();
        self.gateway.save(&records);
    }
}
