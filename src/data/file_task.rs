use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::data::csv_codec;
use crate::error::{Error, Result};
use crate::state::measurement::Measurement;
use crate::state::series::MeasurementSeries;

/// What a finished task hands back to the shell.
#[derive(Debug)]
pub enum TaskOutput {
    Loaded(Vec<Measurement>),
    Saved,
}

/// A save or load running on a worker thread. The result arrives as one
/// unit; there is no partial progress and no cancellation.
pub struct FileTask {
    pub kind: TaskKind,
    pub path: PathBuf,
    result: Arc<Mutex<Option<Result<TaskOutput>>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Load,
    Save,
}

impl FileTask {
    /// Read and decode `path` in the background.
    pub fn load(path: &Path) -> Self {
        let owned = path.to_path_buf();
        Self::spawn(TaskKind::Load, path, move || {
            csv_codec::read_file(&owned).map(TaskOutput::Loaded)
        })
    }

    /// Write a snapshot of `series` to `path` in the background.
    pub fn save(path: &Path, series: &MeasurementSeries) -> Self {
        let owned = path.to_path_buf();
        let snapshot = series.clone();
        Self::spawn(TaskKind::Save, path, move || {
            csv_codec::write_file(&owned, &snapshot).map(|()| TaskOutput::Saved)
        })
    }

    fn spawn<F>(kind: TaskKind, path: &Path, work: F) -> Self
    where
        F: FnOnce() -> Result<TaskOutput> + Send + 'static,
    {
        let result: Arc<Mutex<Option<Result<TaskOutput>>>> = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let outcome = work();
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(outcome);
            }
        });

        Self {
            kind,
            path: path.to_path_buf(),
            result,
        }
    }

    /// Take the result if the worker has finished.
    pub fn poll(&self) -> Option<Result<TaskOutput>> {
        self.result.lock().ok().and_then(|mut slot| slot.take())
    }
}

impl TaskKind {
    fn label(self) -> &'static str {
        match self {
            TaskKind::Load => "load",
            TaskKind::Save => "save",
        }
    }
}

/// Holds at most one running [`FileTask`], so the series never has two writers.
#[derive(Default)]
pub struct TaskSlot {
    current: Option<FileTask>,
}

impl TaskSlot {
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&FileTask> {
        self.current.as_ref()
    }

    /// Start the task built by `make`. Refused, without calling `make`, while
    /// another task has not been collected through [`TaskSlot::poll`].
    pub fn start(&mut self, make: impl FnOnce() -> FileTask) -> Result<()> {
        if let Some(running) = &self.current {
            return Err(Error::Busy {
                kind: running.kind.label(),
            });
        }
        self.current = Some(make());
        Ok(())
    }

    /// Take the finished task's result and free the slot.
    pub fn poll(&mut self) -> Option<(FileTask, Result<TaskOutput>)> {
        let result = self.current.as_ref()?.poll()?;
        self.current.take().map(|task| (task, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait(task: FileTask) -> Result<TaskOutput> {
        loop {
            if let Some(result) = task.poll() {
                return result;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn save_then_load_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.csv");
        let series: MeasurementSeries = [(0.0, 5.0), (1.0, 2.0)]
            .iter()
            .map(|&(t, v)| Measurement::new(t, v).unwrap())
            .collect();

        let save = FileTask::save(&path, &series);
        assert_eq!(save.kind, TaskKind::Save);
        assert!(matches!(wait(save), Ok(TaskOutput::Saved)));

        let load = FileTask::load(&path);
        assert_eq!(load.path, path);
        match wait(load) {
            Ok(TaskOutput::Loaded(items)) => assert_eq!(items, series.snapshot()),
            other => panic!("unexpected task result: {other:?}"),
        }
    }

    #[test]
    fn slot_refuses_a_second_task_until_the_first_is_collected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slot.csv");
        let series: MeasurementSeries = std::iter::once(Measurement::new(1.0, 2.0).unwrap()).collect();

        let mut slot = TaskSlot::default();
        assert!(!slot.is_busy());
        slot.start(|| FileTask::save(&path, &series)).unwrap();

        let mut built = false;
        let refused = slot.start(|| {
            built = true;
            FileTask::load(&path)
        });
        assert!(matches!(refused, Err(Error::Busy { kind: "save" })));
        assert!(!built);
        assert_eq!(slot.current().map(|t| t.kind), Some(TaskKind::Save));

        // The save is still delivered after the refused load.
        let (task, result) = loop {
            if let Some(done) = slot.poll() {
                break done;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };
        assert_eq!(task.kind, TaskKind::Save);
        assert!(matches!(result, Ok(TaskOutput::Saved)));
        assert!(!slot.is_busy());

        slot.start(|| FileTask::load(&path)).unwrap();
        assert!(slot.is_busy());
    }

    #[test]
    fn load_failure_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let task = FileTask::load(&dir.path().join("missing.csv"));
        assert!(matches!(wait(task), Err(Error::Io { .. })));
    }
}
