use crate::model::ChangesState;
use crate::msg::{Msg, StoreEvent};
use gitpane_core::services::GitBackend;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, mpsc};
use std::thread;

mod effects;
mod executor;
mod reducer;

use effects::schedule_effect;
use executor::TaskExecutor;
pub use executor::default_worker_threads;
use reducer::reduce;

/// Upper bound on queued messages reduced under one write lock.
const MAX_BATCH: usize = 64;

/// Owns the changes state. Messages are reduced on a dedicated thread in batches, with one
/// `StateChanged` per batch; backend calls run on a worker pool and come back as messages.
/// Dropping the last handle closes the repository and stops the store thread.
pub struct ChangesStore {
    state: Arc<RwLock<ChangesState>>,
    msg_tx: mpsc::Sender<Msg>,
    _lifetime: Arc<StoreLifetime>,
}

impl Clone for ChangesStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            msg_tx: self.msg_tx.clone(),
            _lifetime: Arc::clone(&self._lifetime),
        }
    }
}

/// Worker tasks hold their own senders, so the message channel never disconnects on its own.
/// This guard flips `running` and wakes the store thread once no handle is left.
struct StoreLifetime {
    running: Arc<AtomicBool>,
    msg_tx: mpsc::Sender<Msg>,
}

impl Drop for StoreLifetime {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.msg_tx.send(Msg::CloseRepo);
    }
}

impl ChangesStore {
    pub fn new(
        backend: Arc<dyn GitBackend>,
        worker_threads: usize,
    ) -> (Self, mpsc::Receiver<StoreEvent>) {
        let state = Arc::new(RwLock::new(ChangesState::default()));
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let (event_tx, event_rx) = mpsc::channel::<StoreEvent>();
        let running = Arc::new(AtomicBool::new(true));

        let thread_state = Arc::clone(&state);
        let thread_msg_tx = msg_tx.clone();
        let thread_running = Arc::clone(&running);

        let spawned = thread::Builder::new()
            .name("gitpane-store".to_string())
            .spawn(move || {
                let executor = TaskExecutor::new(worker_threads);

                while let Ok(first) = msg_rx.recv() {
                    let mut batch = vec![first];
                    while batch.len() < MAX_BATCH {
                        match msg_rx.try_recv() {
                            Ok(msg) => batch.push(msg),
                            Err(_) => break,
                        }
                    }

                    let effects = {
                        let mut state = thread_state.write().expect("state lock poisoned (write)");
                        batch
                            .into_iter()
                            .flat_map(|msg| reduce(&mut state, msg))
                            .collect::<Vec<_>>()
                    };

                    if !thread_running.load(Ordering::SeqCst) {
                        log::debug!("last store handle dropped; stopping store thread");
                        break;
                    }

                    let _ = event_tx.send(StoreEvent::StateChanged);

                    for effect in effects {
                        schedule_effect(&executor, &backend, thread_msg_tx.clone(), effect);
                    }
                }
            });
        if let Err(e) = spawned {
            log::error!("failed to spawn store thread: {e}");
        }

        let lifetime = Arc::new(StoreLifetime {
            running,
            msg_tx: msg_tx.clone(),
        });
        (
            Self {
                state,
                msg_tx,
                _lifetime: lifetime,
            },
            event_rx,
        )
    }

    pub fn dispatch(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    pub fn snapshot(&self) -> ChangesState {
        self.state
            .read()
            .expect("state lock poisoned (read)")
            .clone()
    }
}
