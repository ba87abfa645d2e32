use std::sync::{Arc, Mutex, Weak};

/// Window and document level events the host forwards to mounted views.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum HostEvent {
    WindowFocused,
    DocumentVisible,
    DocumentHidden,
    DocumentClick,
}

type Listener = Arc<Mutex<dyn FnMut(HostEvent) + Send>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Listener registry owned by the host. Cloning shares the registry.
#[derive(Clone, Default)]
pub struct HostEvents {
    registry: Arc<Mutex<Registry>>,
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// The listener stays registered until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl FnMut(HostEvent) + Send + 'static) -> Subscription {
        let mut registry = self.registry.lock().expect("host events lock poisoned");
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Arc::new(Mutex::new(listener));
        registry.listeners.push((id, listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Listeners run outside the registry lock, so they may subscribe or unsubscribe.
    pub fn emit(&self, event: HostEvent) {
        let listeners: Vec<Listener> = {
            let registry = self.registry.lock().expect("host events lock poisoned");
            registry
                .listeners
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect()
        };
        for listener in listeners {
            let mut listener = listener.lock().expect("listener lock poisoned");
            (&mut *listener)(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .expect("host events lock poisoned")
            .listeners
            .len()
    }
}

pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if let Ok(mut registry) = registry.lock() {
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn dropping_subscription_stops_delivery() {
        let events = HostEvents::new();
        let (tx, rx) = mpsc::channel();
        let sub = events.subscribe(move |e| {
            let _ = tx.send(e);
        });

        events.emit(HostEvent::WindowFocused);
        assert_eq!(rx.try_recv(), Ok(HostEvent::WindowFocused));

        drop(sub);
        assert_eq!(events.listener_count(), 0);
        events.emit(HostEvent::DocumentVisible);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn subscription_outliving_registry_is_harmless() {
        let events = HostEvents::new();
        let sub = events.subscribe(|_| {});
        drop(events);
        drop(sub);
    }
}
