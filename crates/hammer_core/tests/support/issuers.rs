use hammer_core::{RequestError, RequestIssuer};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Counts invocations per OS thread without touching the network.
#[derive(Default)]
pub struct CountingIssuer {
    calls: AtomicUsize,
    per_thread: Mutex<HashMap<String, usize>>,
    fail: bool,
}

impl CountingIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails, as if the target refused all connections.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn per_thread(&self) -> HashMap<String, usize> {
        self.per_thread.lock().unwrap().clone()
    }
}

impl RequestIssuer for CountingIssuer {
    fn issue(&self) -> Result<(), RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string();
        *self.per_thread.lock().unwrap().entry(name).or_insert(0) += 1;
        if self.fail {
            Err(RequestError::Spawn(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            )))
        } else {
            Ok(())
        }
    }
}

thread_local! {
    static EXIT_GUARD: RefCell<Option<ExitGuard>> = const { RefCell::new(None) };
}

/// Bumps a shared counter when the owning OS thread tears down.
struct ExitGuard(Arc<AtomicUsize>);

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Plants a thread-local guard on every worker thread it runs on, so a test
/// can tell whether those threads have fully exited.
pub struct ThreadExitIssuer {
    exited: Arc<AtomicUsize>,
}

impl ThreadExitIssuer {
    pub fn new() -> Self {
        Self {
            exited: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn threads_exited(&self) -> usize {
        self.exited.load(Ordering::SeqCst)
    }
}

impl RequestIssuer for ThreadExitIssuer {
    fn issue(&self) -> Result<(), RequestError> {
        EXIT_GUARD.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(ExitGuard(Arc::clone(&self.exited)));
            }
        });
        Ok(())
    }
}
