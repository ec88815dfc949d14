use std::fs;
use std::path::{Path, PathBuf};

use cadence_core::storage::{StorageGateway, TaskRecord};
use tracing::{debug, warn};

/// JSON-file persistence for the tracker. Failures stay inside the gateway:
/// a missing or unreadable file reads as a first run, and a failed write
/// leaves the previous snapshot on disk.
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageGateway for JsonFileGateway {
    fn load(&self) -> Option<Vec<TaskRecord>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "no task snapshot to load");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => Some(records),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "task snapshot unreadable, starting empty");
                None
            }
        }
    }

    fn save(&self, records: &[TaskRecord]) {
        let payload = match serde_json::to_string_pretty(records) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%err, "unable to serialize task snapshot");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), %err, "unable to prepare snapshot directory");
                    return;
                }
            }
        }
        if let Err(err) = fs::write(&self.path, payload) {
            warn!(path = %self.path.display(), %err, "unable to persist tasks");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::task::Recurrence;
    use chrono::NaiveDate;

    fn record(id: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            text: "demo".to_string(),
            recurrence_type: Recurrence::Daily,
            completion_history: vec![NaiveDate::from_ymd_opt(2025, 7, 21).expect("valid date")],
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn missing_file_reads_as_first_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = JsonFileGateway::new(dir.path().join("tasks.json"));
        assert!(gateway.load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = JsonFileGateway::new(dir.path().join("tasks.json"));

        let records = vec![record("task-1"), record("task-2")];
        gateway.save(&records);
        assert_eq!(gateway.load(), Some(records));
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = JsonFileGateway::new(dir.path().join("nested/state/tasks.json"));

        gateway.save(&[record("task-1")]);
        assert_eq!(gateway.load().map(|records| records.len()), Some(1));
    }

    #[test]
    fn corrupt_file_reads_as_first_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").expect("write fixture");

        let gateway = JsonFileGateway::new(path);
        assert!(gateway.load().is_none());
    }

    #[test]
    fn unknown_record_fields_survive_the_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id": "task-1", "text": "stretch", "recurrenceType": "weekly", "color": "teal"}]"#,
        )
        .expect("write fixture");

        let gateway = JsonFileGateway::new(&path);
        let records = gateway.load().expect("load");
        gateway.save(&records);

        let raw = fs::read_to_string(&path).expect("read back");
        assert!(raw.contains("\"color\""));
        assert!(raw.contains("\"completionHistory\""));
    }
}
