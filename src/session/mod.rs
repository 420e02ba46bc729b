pub mod manager;

use std::sync::Arc;

pub use manager::{
    AnalysisBackend,
    CancelToken,
    ProgressSink,
    TaskManager,
    TaskResult,
};

use crate::{
    core::{
        ProgressEvent,
        WordsiftError,
    },
    table::TableState,
};

/// Per-session analysis state: the busy flag guarding re-entrant runs, the
/// model-loaded precondition, and the last progress event of the current
/// run. There is exactly one active session at a time, so this is plain
/// owned state rather than a global.
pub struct SessionState {
    busy: bool,
    model_loaded: bool,
    run: u64,
    progress: Option<ProgressEvent>,
    cancel: Option<CancelToken>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { busy: false, model_loaded: false, run: 0, progress: None, cancel: None }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn model_loaded(&self) -> bool {
        self.model_loaded
    }

    pub fn set_model_loaded(&mut self, loaded: bool) {
        self.model_loaded = loaded;
    }

    /// Last progress event of the run in flight, if any.
    pub fn progress(&self) -> Option<&ProgressEvent> {
        self.progress.as_ref()
    }

    /// Kick off an analysis run. Rejects locally, without touching the
    /// backend, when the model is not loaded, the file list is empty, or a
    /// run is already outstanding.
    pub fn request_analysis(
        &mut self,
        manager: &TaskManager,
        backend: Arc<dyn AnalysisBackend>,
        file_paths: Vec<String>,
    ) -> Result<(), WordsiftError> {
        if !self.model_loaded {
            return Err(WordsiftError::ModelNotLoaded);
        }
        if file_paths.is_empty() {
            return Err(WordsiftError::NoFilesSelected);
        }
        if self.busy {
            return Err(WordsiftError::AnalysisInProgress);
        }

        // Bumping the run id detaches the previous run's progress
        // subscription: events tagged with an older id are dropped on poll.
        self.run += 1;
        self.progress = None;
        self.busy = true;

        let cancel = CancelToken::new();
        self.cancel = Some(cancel.clone());
        manager.start_analysis(backend, file_paths, self.run, cancel);
        Ok(())
    }

    /// Request cooperative cancellation of the run in flight.
    pub fn cancel_analysis(&self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }

    /// Drain the task manager and fold the results into the session and the
    /// table. Returns user-visible error messages; a failed run leaves the
    /// table's records exactly as they were.
    pub fn poll(&mut self, manager: &mut TaskManager, table: &mut TableState) -> Vec<String> {
        let results = manager.poll_results();
        self.apply_results(results, table)
    }

    pub fn apply_results(
        &mut self,
        results: Vec<TaskResult>,
        table: &mut TableState,
    ) -> Vec<String> {
        let mut errors = Vec::new();

        for result in results {
            match result {
                TaskResult::Progress { run, event } => {
                    // Last-value-wins, current run only.
                    if run == self.run {
                        self.progress = Some(event);
                    }
                }
                TaskResult::Finished { run, result } => {
                    if run != self.run {
                        continue;
                    }
                    self.busy = false;
                    self.progress = None;
                    self.cancel = None;
                    match result {
                        Ok(batch) => {
                            println!("Analysis produced {} records", batch.len());
                            table.set_records(&batch);
                        }
                        Err(message) => {
                            eprintln!("Analysis failed: {}", message);
                            errors.push(message);
                        }
                    }
                }
            }
        }

        errors
    }
}
