//! Fixed fan-out/fan-in executor: one LIFO task stack and one worker thread per core.
//!
//! [`TaskDispatcher::wait`] is a full barrier. In threaded mode it signals every worker to
//! drain its own stack and blocks until all of them report back. In inline mode the caller
//! drains the stacks itself, in core order. There is no work stealing: a worker with an empty
//! stack idles for the round.

use std::{sync::Arc, thread::JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::{
    diagnostics::profiler::{ProfileCounter, Profiler},
    foundation::error::{RasterError, RasterResult},
};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

enum Signal {
    Run,
    Stop,
}

struct Shared {
    stacks: Vec<Mutex<Vec<Task>>>,
    profiler: Arc<Profiler>,
}

impl Shared {
    fn drain(&self, core: usize) {
        loop {
            let task = self.stacks[core].lock().pop();
            let Some(task) = task else {
                break;
            };
            self.profiler.increase(ProfileCounter::CoreTasks(core), 1);
            task();
        }
    }
}

struct Worker {
    run_tx: Sender<Signal>,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

/// Per-core task stacks plus, in threaded mode, one named worker thread per core.
pub struct TaskDispatcher {
    shared: Arc<Shared>,
    workers: Vec<Worker>,
    threaded: bool,
}

impl TaskDispatcher {
    /// Build a dispatcher for `cores` cores and spawn the workers when `threaded` is set.
    pub fn new(cores: usize, threaded: bool, profiler: Arc<Profiler>) -> RasterResult<Self> {
        if cores == 0 {
            return Err(RasterError::validation("dispatcher needs at least one core"));
        }
        let shared = Arc::new(Shared {
            stacks: (0..cores).map(|_| Mutex::new(Vec::new())).collect(),
            profiler,
        });
        let mut dispatcher = Self {
            shared,
            workers: Vec::new(),
            threaded,
        };
        dispatcher.start()?;
        Ok(dispatcher)
    }

    pub fn cores(&self) -> usize {
        self.shared.stacks.len()
    }

    pub fn is_threaded(&self) -> bool {
        self.threaded
    }

    /// Tasks queued and not yet executed, across all cores.
    pub fn pending(&self) -> usize {
        self.shared.stacks.iter().map(|s| s.lock().len()).sum()
    }

    /// Queue `task` on `core`'s stack. It runs during the next [`TaskDispatcher::wait`].
    pub fn push<F>(&self, core: usize, task: F) -> RasterResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let stack = self.shared.stacks.get(core).ok_or_else(|| {
            RasterError::validation(format!(
                "core index {core} out of range for {} cores",
                self.cores()
            ))
        })?;
        self.shared.profiler.increase(ProfileCounter::TaskCount, 1);
        stack.lock().push(Box::new(task));
        Ok(())
    }

    /// Run every queued task and return once all cores have drained their stacks.
    pub fn wait(&self) -> RasterResult<()> {
        if !self.threaded {
            for core in 0..self.cores() {
                self.shared.drain(core);
            }
            return Ok(());
        }
        if self.workers.len() != self.cores() {
            return Err(RasterError::dispatch(format!(
                "{} of {} workers running; restart the pool with set_threaded",
                self.workers.len(),
                self.cores()
            )));
        }

        for (core, worker) in self.workers.iter().enumerate() {
            worker
                .run_tx
                .send(Signal::Run)
                .map_err(|_| RasterError::dispatch(format!("worker {core} is not running")))?;
        }
        for (core, worker) in self.workers.iter().enumerate() {
            worker.done_rx.recv().map_err(|_| {
                RasterError::dispatch(format!("worker {core} exited before finishing its round"))
            })?;
        }
        Ok(())
    }

    /// Stop the pool and restart it in the requested mode. Queues must be empty.
    ///
    /// A worker that panicked earlier is reported here, but the switch still happens.
    pub fn set_threaded(&mut self, threaded: bool) -> RasterResult<()> {
        if threaded == self.threaded && (!threaded || self.workers.len() == self.cores()) {
            return Ok(());
        }
        if self.pending() != 0 {
            return Err(RasterError::dispatch(
                "cannot switch dispatch mode with tasks still queued",
            ));
        }
        let stopped = self.stop();
        self.threaded = threaded;
        tracing::debug!(threaded, cores = self.cores(), "dispatcher mode switched");
        self.start()?;
        stopped
    }

    fn start(&mut self) -> RasterResult<()> {
        if !self.threaded || !self.workers.is_empty() {
            return Ok(());
        }
        for core in 0..self.cores() {
            let (run_tx, run_rx) = crossbeam_channel::bounded::<Signal>(1);
            let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
            let shared = Arc::clone(&self.shared);
            let handle = std::thread::Builder::new()
                .name(format!("softras-core-{core}"))
                .spawn(move || worker_loop(core, &shared, &run_rx, &done_tx))
                .map_err(|e| RasterError::dispatch(format!("spawn worker {core}: {e}")))?;
            self.workers.push(Worker {
                run_tx,
                done_rx,
                handle: Some(handle),
            });
        }
        Ok(())
    }

    /// Signal every worker to exit and join it. A worker that panicked is reported.
    pub fn stop(&mut self) -> RasterResult<()> {
        for worker in &self.workers {
            // A worker that already exited has dropped its receiver.
            let _ = worker.run_tx.send(Signal::Stop);
        }
        let mut failed = Vec::new();
        for (core, worker) in self.workers.iter_mut().enumerate() {
            if let Some(handle) = worker.handle.take()
                && handle.join().is_err()
            {
                failed.push(core);
            }
        }
        self.workers.clear();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(RasterError::dispatch(format!("worker(s) {failed:?} panicked")))
        }
    }
}

impl Drop for TaskDispatcher {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::error!(%err, "task dispatcher shutdown failed");
        }
    }
}

fn worker_loop(core: usize, shared: &Shared, run_rx: &Receiver<Signal>, done_tx: &Sender<()>) {
    while let Ok(Signal::Run) = run_rx.recv() {
        shared.drain(core);
        if done_tx.send(()).is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/dispatcher.rs"]
mod tests;
