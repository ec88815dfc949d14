use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How often a task's completion requirement resets. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    OneTime,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    /// Display order of the per-type list sections.
    pub const ALL: [Recurrence; 4] = [
        Recurrence::OneTime,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Recurrence::OneTime => "one-time",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub recurrence: Recurrence,
    /// Calendar days on which the task was marked done, day granularity.
    pub completion_history: Vec<NaiveDate>,
    /// Record fields this version does not interpret, carried through so a
    /// save never drops them.
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>, recurrence: Recurrence) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            recurrence,
            completion_history: Vec::new(),
            extra: Map::new(),
        }
    }
}
