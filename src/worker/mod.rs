//! The two optional background threads of spec §5: map generation during
//! `Loading` and per-turn resolution, both joined at a phase boundary and
//! both cooperatively cancellable through a shared stop flag rather than
//! killed outright.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

/// A cheaply-cloned cancellation flag shared between the engine thread and
/// a worker. The worker polls it between expensive steps (CA iterations,
/// command resolutions); the engine sets it on a phase transition away
/// from `Playing`/`Loading`.
#[derive(Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> StopFlag {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    pub fn signal(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A unit of off-thread work that may finish, or observe cancellation and
/// exit without publishing a result (spec §7 error kind 5). The caller
/// holds both the `JoinHandle` and the flag it can use to ask the worker
/// to stop early.
pub struct Worker<T> {
    handle: Option<JoinHandle<()>>,
    receiver: Receiver<T>,
    stop: StopFlag,
}

impl<T: Send + 'static> Worker<T> {
    /// Spawns `work` on a new thread with a fresh stop flag. `work` should
    /// check the flag between expensive steps and return `None` to signal
    /// a cancelled run instead of sending a result.
    pub fn spawn<F>(work: F) -> Worker<T>
    where
        F: FnOnce(StopFlag) -> Option<T> + Send + 'static,
    {
        let stop = StopFlag::new();
        let stop_for_worker = stop.clone();
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            if let Some(result) = work(stop_for_worker) {
                let _ = tx.send(result);
            }
        });
        Worker { handle: Some(handle), receiver: rx, stop }
    }

    /// Requests cancellation without blocking; the worker notices on its
    /// next flag check and exits on its own.
    pub fn request_stop(&self) {
        self.stop.signal();
    }

    /// Blocks until the worker thread exits, returning the published
    /// result, or `None` if it was cancelled (or never sent one).
    pub fn join(mut self) -> Option<T> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.receiver.try_recv().ok()
    }
}
