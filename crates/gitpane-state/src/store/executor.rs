use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Instant;

struct Task {
    label: &'static str,
    run: Box<dyn FnOnce() + Send + 'static>,
}

pub fn default_worker_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().clamp(1, 4))
        .unwrap_or(2)
}

/// Fixed pool of backend workers fed from one queue. Dropping the executor closes the queue and
/// lets the workers exit once the remaining tasks are done. A panicking task is logged and the
/// worker keeps serving the queue.
pub(super) struct TaskExecutor {
    tx: mpsc::Sender<Task>,
    _threads: Vec<thread::JoinHandle<()>>,
}

impl TaskExecutor {
    pub(super) fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (tx, rx) = mpsc::channel::<Task>();
        let rx = Arc::new(Mutex::new(rx));

        let mut worker_threads = Vec::with_capacity(threads);
        for ix in 0..threads {
            let rx = Arc::clone(&rx);
            let spawned = thread::Builder::new()
                .name(format!("gitpane-worker-{ix}"))
                .spawn(move || {
                    loop {
                        let task = {
                            let rx = rx.lock().expect("executor lock poisoned");
                            rx.recv()
                        };
                        match task {
                            Ok(task) => run_task(task),
                            Err(_) => break,
                        }
                    }
                });
            match spawned {
                Ok(handle) => worker_threads.push(handle),
                Err(e) => log::error!("failed to spawn worker thread {ix}: {e}"),
            }
        }

        Self {
            tx,
            _threads: worker_threads,
        }
    }

    pub(super) fn spawn(&self, label: &'static str, run: impl FnOnce() + Send + 'static) {
        let task = Task {
            label,
            run: Box::new(run),
        };
        if self.tx.send(task).is_err() {
            log::warn!("worker pool is gone; {label} dropped");
        }
    }
}

fn run_task(task: Task) {
    let Task { label, run } = task;
    let started = Instant::now();
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(()) => log::trace!("{label} finished in {:?}", started.elapsed()),
        Err(payload) => log::error!("{label} panicked: {}", panic_message(payload.as_ref())),
    }
}

pub(super) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
