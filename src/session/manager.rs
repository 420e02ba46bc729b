use std::{
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        mpsc,
        Arc,
    },
    thread,
    time::Instant,
};

use futures::future::BoxFuture;
use tokio::runtime::Runtime;

use crate::core::{
    ProgressEvent,
    RawRecord,
    WordsiftError,
};

/// The external analysis collaborator. One asynchronous call per run:
/// segment and tag the given files, stream progress through the sink, and
/// return the full batch of raw records.
pub trait AnalysisBackend: Send + Sync + 'static {
    fn analyze(
        &self,
        file_paths: Vec<String>,
        progress: ProgressSink,
        cancel: CancelToken,
    ) -> BoxFuture<'static, Result<Vec<RawRecord>, WordsiftError>>;
}

/// Cooperative cancellation flag handed to the backend.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self { flag: Arc::new(AtomicBool::new(false)) }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel endpoint the backend pushes progress events into. Events carry
/// the run id so the session can discard anything from a detached run.
#[derive(Clone)]
pub struct ProgressSink {
    sender: mpsc::Sender<TaskResult>,
    run: u64,
}

impl ProgressSink {
    pub fn emit(&self, event: ProgressEvent) {
        let _ = self.sender.send(TaskResult::Progress { run: self.run, event });
    }
}

#[derive(Debug)]
pub enum TaskResult {
    Progress { run: u64, event: ProgressEvent },
    Finished { run: u64, result: Result<Vec<RawRecord>, String> },
}

/// Runs analysis calls off the UI thread: a worker thread blocks on the
/// backend future, and everything comes back over a channel the caller
/// polls once per frame.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));
        let (sender, receiver) = mpsc::channel();
        Self { runtime, receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }
        results
    }

    pub fn start_analysis(
        &self,
        backend: Arc<dyn AnalysisBackend>,
        file_paths: Vec<String>,
        run: u64,
        cancel: CancelToken,
    ) {
        let sender = self.sender.clone();
        let runtime = self.runtime.clone();
        let progress = ProgressSink { sender: sender.clone(), run };

        thread::spawn(move || {
            let start = Instant::now();
            let result = runtime
                .block_on(backend.analyze(file_paths, progress, cancel))
                .map_err(|e| e.to_string());

            if result.is_ok() {
                println!("Analysis completed ({:.1}s)", start.elapsed().as_secs_f32());
            }
            let _ = sender.send(TaskResult::Finished { run, result });
        });
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use futures::future::BoxFuture;

    use super::{
        AnalysisBackend,
        CancelToken,
        ProgressSink,
    };
    use crate::core::{
        RawRecord,
        WordsiftError,
    };

    /// Backend that accepts every call and returns an empty batch.
    pub struct NullBackend;

    impl NullBackend {
        pub fn shared() -> Arc<dyn AnalysisBackend> {
            Arc::new(NullBackend)
        }
    }

    impl AnalysisBackend for NullBackend {
        fn analyze(
            &self,
            _file_paths: Vec<String>,
            _progress: ProgressSink,
            _cancel: CancelToken,
        ) -> BoxFuture<'static, Result<Vec<RawRecord>, WordsiftError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }
}
