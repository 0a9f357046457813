//! Once-only engine activation.
//!
//! The first caller starts the engine's setup future; every caller that
//! arrives while it is in flight awaits the same shared attempt. A successful
//! attempt is cached for the life of the gate. A failed attempt is reported to
//! every waiter of that attempt and the gate returns to idle, so the next
//! explicit call starts a fresh attempt. Nothing is retried automatically.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use crate::engine::Engine;
use crate::errors::ActivationError;

type Setup<E> = Box<dyn Fn() -> BoxFuture<'static, Result<E, ActivationError>> + Send + Sync>;
type Attempt<E> = Shared<BoxFuture<'static, Result<Arc<E>, ActivationError>>>;

enum Slot<E> {
    Idle,
    Pending(Attempt<E>),
    Ready(Arc<E>),
}

pub struct ActivationGate<E: Engine> {
    setup: Setup<E>,
    slot: Mutex<Slot<E>>,
}

impl<E: Engine> ActivationGate<E> {
    /// Create an idle gate. `setup` runs at most once per activation attempt.
    pub fn new<F, Fut>(setup: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<E, ActivationError>> + Send + 'static,
    {
        Self {
            setup: Box::new(move || setup().boxed()),
            slot: Mutex::new(Slot::Idle),
        }
    }

    /// A gate that is ready from the start.
    pub fn ready(engine: E) -> Self {
        Self {
            setup: Box::new(|| {
                async { Err::<E, _>(ActivationError::new(E::ID, "gate was constructed ready")) }
                    .boxed()
            }),
            slot: Mutex::new(Slot::Ready(Arc::new(engine))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<E>> {
        // Slot transitions are single assignments, so a poisoned lock still
        // holds a consistent value.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The engine, if activation already completed. Never starts setup.
    pub fn try_ready(&self) -> Option<Arc<E>> {
        match &*self.lock() {
            Slot::Ready(engine) => Some(Arc::clone(engine)),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.try_ready().is_some()
    }

    /// Wait until the engine is ready, starting setup if nobody has yet.
    ///
    /// Completes on first poll once the gate is ready.
    pub async fn ensure_ready(&self) -> Result<Arc<E>, ActivationError> {
        let attempt = {
            let mut slot = self.lock();
            match &*slot {
                Slot::Ready(engine) => return Ok(Arc::clone(engine)),
                Slot::Pending(attempt) => attempt.clone(),
                Slot::Idle => {
                    debug!(engine = E::ID, "activating engine");
                    let attempt = (self.setup)().map(|res| res.map(Arc::new)).boxed().shared();
                    *slot = Slot::Pending(attempt.clone());
                    attempt
                }
            }
        };

        let outcome = attempt.clone().await;
        self.settle(&attempt, &outcome);
        outcome
    }

    /// Blocking variant of [`ensure_ready`](Self::ensure_ready) for
    /// synchronous callers. Must not be called from inside an async task.
    pub fn ensure_ready_blocking(&self) -> Result<Arc<E>, ActivationError> {
        futures::executor::block_on(self.ensure_ready())
    }

    // Only the attempt currently parked in the slot may move it; a waiter of
    // an older attempt must not clobber a newer one.
    fn settle(&self, attempt: &Attempt<E>, outcome: &Result<Arc<E>, ActivationError>) {
        let mut slot = self.lock();
        let current = matches!(&*slot, Slot::Pending(pending) if pending.ptr_eq(attempt));
        if !current {
            return;
        }
        *slot = match outcome {
            Ok(engine) => {
                debug!(engine = E::ID, "engine ready");
                Slot::Ready(Arc::clone(engine))
            }
            Err(err) => {
                debug!(engine = E::ID, reason = %err.reason, "engine activation failed");
                Slot::Idle
            }
        };
    }
}
