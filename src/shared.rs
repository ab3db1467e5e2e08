//! Serialized shared access to a single [`Conductor`].
//!
//! The engine assumes one owner issuing commands serially. When several
//! threads need to drive the same train (a UI thread and a scheduler, say),
//! [`SharedConductor`] funnels every call through one mutex so only one
//! command or choreography is in flight at a time.
//!
//! Holding the lock for a choreography holds it for the full scripted
//! duration; state snapshots wait behind it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use rs_lionchief::{Conductor, SharedConductor, TrainEngine};
//! use rs_lionchief::hal::{MockDelay, MockLink};
//!
//! let engine = TrainEngine::connect(MockLink::new()).unwrap();
//! let shared = Arc::new(SharedConductor::new(Conductor::new(engine, MockDelay::new())));
//!
//! let worker = {
//!     let shared = Arc::clone(&shared);
//!     thread::spawn(move || shared.with_conductor(|c| c.begin_train_service()))
//! };
//! worker.join().unwrap().unwrap();
//!
//! assert_eq!(shared.state().speed, 3);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::conductor::Conductor;
use crate::state::TrainState;
use crate::traits::{Delay, TrainLink};

/// Thread-safe wrapper around one [`Conductor`].
///
/// Uses `Mutex` rather than `RwLock`: nearly every operation writes.
/// A poisoned lock is recovered; the mirror is optimistic anyway.
pub struct SharedConductor<L: TrainLink, D: Delay> {
    conductor: Mutex<Conductor<L, D>>,
}

impl<L: TrainLink, D: Delay> SharedConductor<L, D> {
    /// Wrap a conductor for shared use.
    pub fn new(conductor: Conductor<L, D>) -> Self {
        Self {
            conductor: Mutex::new(conductor),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Conductor<L, D>> {
        self.conductor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the conductor.
    pub fn with_conductor<R>(&self, f: impl FnOnce(&mut Conductor<L, D>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Snapshot of the mirrored state.
    pub fn state(&self) -> TrainState {
        self.lock().state()
    }

    /// Unwrap the conductor.
    pub fn into_inner(self) -> Conductor<L, D> {
        self.conductor
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockDelay, MockLink};
    use crate::TrainEngine;
    use std::sync::Arc;
    use std::thread;

    fn shared() -> SharedConductor<MockLink, MockDelay> {
        let engine = TrainEngine::connect(MockLink::new()).unwrap();
        SharedConductor::new(Conductor::new(engine, MockDelay::new()))
    }

    #[test]
    fn commands_from_several_threads_are_serialized() {
        let shared = Arc::new(shared());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    shared.with_conductor(|c| c.sound_horn(1)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let conductor = Arc::try_unwrap(shared).ok().unwrap().into_inner();
        let horn = conductor.engine().link().payloads_for(72);
        // Each on is immediately followed by its own off
        assert_eq!(horn.len(), 8);
        for pair in horn.chunks(2) {
            assert_eq!(pair, [vec![72, 1], vec![72, 0]]);
        }
    }

    #[test]
    fn state_reflects_last_command() {
        let shared = shared();
        shared.with_conductor(|c| c.set_main_volume(3)).unwrap();
        assert_eq!(shared.state().volume, 3);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let shared = Arc::new(shared());
        let poisoner = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            poisoner.with_conductor(|_| panic!("boom"));
        })
        .join();
        assert_eq!(shared.state(), TrainState::baseline());
    }
}
