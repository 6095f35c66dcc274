//! # Change Bus
//!
//! A typed publish/subscribe channel. Listeners run synchronously, in
//! subscription order, on the emitting thread. A listener that returns an
//! error or panics is logged and skipped; the remaining listeners still run
//! and `emit` always returns normally.
//!
//! ## Usage
//!
//! ```
//! use std::cell::RefCell;
//! use archgraph::events::{ChangeBus, ChangePayload, UpdateOptions};
//!
//! let model = RefCell::new(0u32);
//! let mut bus = ChangeBus::<ChangePayload>::new();
//! bus.subscribe(|payload| {
//!     println!("changed: {:?}", payload);
//!     Ok(())
//! });
//!
//! bus.update(&model, |count| *count += 1, ChangePayload::Rebuild, UpdateOptions::immediate());
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::debounce::Debouncer;
use super::payload::Payload;

/// Callback registered on a bus
pub type Listener<P> = Box<dyn FnMut(&P) -> anyhow::Result<()>>;

/// Handle returned by [`ChangeBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Outcome of one emission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Listeners that returned `Ok`
    pub delivered: usize,
    /// Listeners that returned an error or panicked
    pub failed: usize,
}

/// How [`ChangeBus::update`] notifies after mutating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Quiet window; `None` or zero emits immediately
    pub debounce: Option<Duration>,
}

impl UpdateOptions {
    pub fn immediate() -> Self {
        Self { debounce: None }
    }

    pub fn debounced(window: Duration) -> Self {
        Self {
            debounce: Some(window),
        }
    }
}

/// Typed publish/subscribe channel with per-kind debouncing
pub struct ChangeBus<P: Payload> {
    listeners: Vec<(ListenerId, Listener<P>)>,
    next_id: u64,
    pending: Debouncer<P::Kind, P>,
    clock: Box<dyn Clock>,
}

impl<P: Payload> ChangeBus<P> {
    /// Create a bus driven by the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create a bus whose debounce windows are measured on `clock`
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            pending: Debouncer::new(),
            clock: Box::new(clock),
        }
    }

    /// Register a listener; it sees every emission after this call
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&P) -> anyhow::Result<()> + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `payload` to every listener, isolating failures.
    pub fn emit(&mut self, payload: &P) -> EmitReport {
        let mut report = EmitReport::default();

        for (id, listener) in self.listeners.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(payload)));
            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    report.failed += 1;
                    log::error!(
                        "Listener {:?} failed on {:?}: {:#}",
                        id,
                        payload.kind(),
                        err
                    );
                }
                Err(panic) => {
                    report.failed += 1;
                    log::error!(
                        "Listener {:?} panicked on {:?}: {}",
                        id,
                        payload.kind(),
                        panic_message(panic.as_ref())
                    );
                }
            }
        }

        report
    }

    /// Apply `mutator` to the model, then notify.
    ///
    /// The model borrow is released before any listener runs, so listeners
    /// may read the model freely. With a debounce window the emission is
    /// deferred until [`poll`](Self::poll) finds the window elapsed; another
    /// update of the same kind inside the window replaces the payload and
    /// restarts the window.
    pub fn update<M, R>(
        &mut self,
        model: &RefCell<M>,
        mutator: impl FnOnce(&mut M) -> R,
        payload: P,
        options: UpdateOptions,
    ) -> R {
        let result = {
            let mut model = model.borrow_mut();
            mutator(&mut model)
        };

        match options.debounce.filter(|window| !window.is_zero()) {
            Some(window) => self.schedule(payload, window),
            None => {
                self.emit(&payload);
            }
        }

        result
    }

    /// Arm a deferred emission of `payload` after `window` of quiet
    pub fn schedule(&mut self, payload: P, window: Duration) {
        let kind = payload.kind();
        let deadline = self.clock.now() + window;
        if self.pending.arm(kind, payload, deadline) {
            log::trace!("Re-armed pending {:?} emission", kind);
        }
    }

    /// Whether a deferred emission of `kind` is waiting
    pub fn has_pending(&self, kind: P::Kind) -> bool {
        self.pending.is_armed(kind)
    }

    /// Drop a deferred emission without delivering it
    pub fn cancel_pending(&mut self, kind: P::Kind) -> bool {
        self.pending.cancel(kind).is_some()
    }

    /// Drop every deferred emission. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        self.pending.drain().len()
    }

    /// Emit every deferred payload whose window has elapsed.
    ///
    /// Returns the number of emissions made.
    pub fn poll(&mut self) -> usize {
        let due = self.pending.take_due(self.clock.now());
        for payload in &due {
            self.emit(payload);
        }
        due.len()
    }

    /// Emit every deferred payload now, regardless of its window
    pub fn flush(&mut self) -> usize {
        let pending = self.pending.drain();
        for payload in &pending {
            self.emit(payload);
        }
        pending.len()
    }
}

impl<P: Payload> Default for ChangeBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
