//! # Init coordinator: one SDK init, replayed to everyone.
//!
//! The underlying SDK can only be initialized once per process, but every
//! ad request needs it ready. [`InitCoordinator`] serializes that:
//!
//! ```text
//! ensure_initialized(account_id, waiter)
//!   ├─ Initialized      → waiter(Ok) immediately
//!   ├─ Error(cause)     → waiter(Err(cause)) immediately (sticky, forever)
//!   ├─ Initializing     → waiter queued, no new attempt
//!   └─ NotInitialized   → state = Initializing (atomic under the mutex)
//!         ├─ blank account id → state = Error, drain(Err), SDK untouched
//!         └─ otherwise        → commit metadata, NetworkSdk::init(...)
//!                                  └─ completion → state = Initialized|Error,
//!                                                  drain queue with outcome
//! ```
//!
//! ## Rules
//! - Exactly one underlying init call, no matter how many callers race to
//!   observe `NotInitialized`: the state transition happens under the
//!   mutex.
//! - Each waiter is invoked exactly once and then discarded; draining
//!   happens after the lock is released and never re-enters
//!   `ensure_initialized`.
//! - An error is terminal until process restart. There is no automatic
//!   retry; every later caller gets the recorded cause.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::config::Config;
use crate::error::InitError;
use crate::events::PlacementBus;
use crate::sdk::NetworkSdk;

/// Process-wide initialization state of the underlying SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitState {
    NotInitialized,
    Initializing,
    Initialized,
    /// Terminal until process restart; the cause is replayed to every
    /// caller.
    Error(InitError),
}

/// Callback receiving the init outcome. Invoked exactly once.
pub type InitWaiter = Box<dyn FnOnce(Result<(), InitError>) + Send>;

struct Inner {
    state: InitState,
    waiters: Vec<InitWaiter>,
}

/// Deduplicates concurrent SDK initialization attempts and replays the
/// outcome to late joiners.
///
/// Explicitly constructed and injected rather than a process-global, so
/// tests instantiate a fresh one each.
pub struct InitCoordinator {
    sdk: Arc<dyn NetworkSdk>,
    bus: PlacementBus,
    cfg: Config,
    inner: Mutex<Inner>,
}

impl InitCoordinator {
    pub fn new(sdk: Arc<dyn NetworkSdk>, bus: PlacementBus, cfg: Config) -> Arc<Self> {
        Arc::new(Self {
            sdk,
            bus,
            cfg,
            inner: Mutex::new(Inner {
                state: InitState::NotInitialized,
                waiters: Vec::new(),
            }),
        })
    }

    /// Ensures the SDK is initialized, reporting the outcome to `on_done`.
    ///
    /// Never blocks on the SDK; the outcome is delivered either on this
    /// thread (already resolved, or resolved synchronously by the SDK) or
    /// on the SDK's completion thread.
    pub fn ensure_initialized(self: &Arc<Self>, account_id: &str, on_done: InitWaiter) {
        enum Action {
            Deliver(InitWaiter, Result<(), InitError>),
            Drain(Vec<InitWaiter>, InitError),
            StartInit,
            Queued,
        }

        let action = {
            let mut inner = self.inner.lock();
            match &inner.state {
                InitState::Initialized => Action::Deliver(on_done, Ok(())),
                InitState::Error(cause) => Action::Deliver(on_done, Err(cause.clone())),
                InitState::Initializing => {
                    inner.waiters.push(on_done);
                    Action::Queued
                }
                InitState::NotInitialized => {
                    inner.state = InitState::Initializing;
                    inner.waiters.push(on_done);
                    if account_id.trim().is_empty() {
                        let cause = InitError::EmptyAccountId;
                        inner.state = InitState::Error(cause.clone());
                        Action::Drain(std::mem::take(&mut inner.waiters), cause)
                    } else {
                        Action::StartInit
                    }
                }
            }
        };

        match action {
            Action::Deliver(waiter, outcome) => waiter(outcome),
            Action::Queued => {}
            Action::Drain(waiters, cause) => {
                log::warn!("sdk init rejected: {cause}");
                for waiter in waiters {
                    waiter(Err(cause.clone()));
                }
            }
            Action::StartInit => {
                log::debug!("initializing sdk for account {account_id}");
                self.sdk
                    .set_mediation_metadata(self.cfg.mediation_name, self.cfg.mediation_version);
                let me = Arc::clone(self);
                self.sdk.init(
                    account_id,
                    self.bus.clone(),
                    Box::new(move |outcome| me.complete(outcome)),
                );
            }
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> InitState {
        self.inner.lock().state.clone()
    }

    /// True once the SDK finished initializing successfully.
    pub fn is_initialized(&self) -> bool {
        matches!(self.inner.lock().state, InitState::Initialized)
    }

    /// Records the SDK's outcome and drains the waiter queue exactly once.
    ///
    /// A completion arriving after the state is already terminal is
    /// ignored (the SDK contract says once, but a misbehaving SDK must not
    /// corrupt the sticky outcome).
    fn complete(&self, outcome: Result<(), InitError>) {
        let waiters = {
            let mut inner = self.inner.lock();
            if inner.state != InitState::Initializing {
                log::warn!("ignoring duplicate sdk init completion");
                return;
            }
            inner.state = match &outcome {
                Ok(()) => InitState::Initialized,
                Err(cause) => InitState::Error(cause.clone()),
            };
            std::mem::take(&mut inner.waiters)
        };

        match &outcome {
            Ok(()) => log::debug!("sdk initialized"),
            Err(cause) => log::warn!("sdk initialization failed: {cause}"),
        }
        for waiter in waiters {
            waiter(outcome.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PlacementState;
    use crate::sdk::{InitCallback, Surface};
    use parking_lot::Mutex as PlMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// SDK fake that records init calls and lets the test resolve them.
    #[derive(Default)]
    struct ManualSdk {
        init_calls: AtomicUsize,
        pending: PlMutex<Vec<InitCallback>>,
    }

    impl ManualSdk {
        fn resolve_all(&self, outcome: Result<(), InitError>) {
            for cb in self.pending.lock().drain(..) {
                cb(outcome.clone());
            }
        }
    }

    impl NetworkSdk for ManualSdk {
        fn init(&self, _account_id: &str, _events: PlacementBus, on_done: InitCallback) {
            self.init_calls.fetch_add(1, Ordering::SeqCst);
            self.pending.lock().push(on_done);
        }

        fn placement_state(&self, _placement_id: &str) -> PlacementState {
            PlacementState::Unknown
        }

        fn show(&self, _surface: Surface, _placement_id: &str) {}
    }

    fn coordinator(sdk: &Arc<ManualSdk>) -> Arc<InitCoordinator> {
        InitCoordinator::new(
            Arc::clone(sdk) as Arc<dyn NetworkSdk>,
            PlacementBus::new(),
            Config::default(),
        )
    }

    #[test]
    fn test_concurrent_calls_trigger_one_init() {
        let sdk = Arc::new(ManualSdk::default());
        let coord = coordinator(&sdk);
        let delivered = Arc::new(AtomicUsize::new(0));

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let coord = Arc::clone(&coord);
                let delivered = Arc::clone(&delivered);
                std::thread::spawn(move || {
                    coord.ensure_initialized(
                        "12345",
                        Box::new(move |outcome| {
                            assert!(outcome.is_ok());
                            delivered.fetch_add(1, Ordering::SeqCst);
                        }),
                    );
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 1);
        assert_eq!(delivered.load(Ordering::SeqCst), 0, "still initializing");
        assert_eq!(coord.state(), InitState::Initializing);

        sdk.resolve_all(Ok(()));
        assert_eq!(delivered.load(Ordering::SeqCst), 8);
        assert!(coord.is_initialized());
    }

    #[test]
    fn test_late_joiner_gets_immediate_ok() {
        let sdk = Arc::new(ManualSdk::default());
        let coord = coordinator(&sdk);

        coord.ensure_initialized("12345", Box::new(|_| {}));
        sdk.resolve_all(Ok(()));

        let delivered = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&delivered);
        coord.ensure_initialized(
            "12345",
            Box::new(move |outcome| {
                assert!(outcome.is_ok());
                d.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_is_sticky() {
        let sdk = Arc::new(ManualSdk::default());
        let coord = coordinator(&sdk);

        coord.ensure_initialized("12345", Box::new(|_| {}));
        sdk.resolve_all(Err(InitError::sdk("no network")));

        let failures = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let failures = Arc::clone(&failures);
            coord.ensure_initialized(
                "12345",
                Box::new(move |outcome| {
                    assert_eq!(outcome, Err(InitError::sdk("no network")));
                    failures.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }
        assert_eq!(failures.load(Ordering::SeqCst), 100);
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 1, "no retry");
    }

    #[test]
    fn test_blank_account_id_fails_without_touching_sdk() {
        let sdk = Arc::new(ManualSdk::default());
        let coord = coordinator(&sdk);

        let outcome = Arc::new(PlMutex::new(None));
        let o = Arc::clone(&outcome);
        coord.ensure_initialized(
            "   ",
            Box::new(move |res| {
                *o.lock() = Some(res);
            }),
        );

        assert_eq!(*outcome.lock(), Some(Err(InitError::EmptyAccountId)));
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 0);
        assert_eq!(coord.state(), InitState::Error(InitError::EmptyAccountId));

        // Sticky: a valid account id afterwards still fails.
        let o = Arc::clone(&outcome);
        coord.ensure_initialized(
            "12345",
            Box::new(move |res| {
                *o.lock() = Some(res);
            }),
        );
        assert_eq!(*outcome.lock(), Some(Err(InitError::EmptyAccountId)));
        assert_eq!(sdk.init_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_duplicate_completion_is_ignored() {
        let sdk = Arc::new(ManualSdk::default());
        let coord = coordinator(&sdk);

        coord.ensure_initialized("12345", Box::new(|_| {}));
        let callbacks: Vec<InitCallback> = sdk.pending.lock().drain(..).collect();
        assert_eq!(callbacks.len(), 1);
        for cb in callbacks {
            cb(Ok(()));
        }
        assert!(coord.is_initialized());

        // A second completion cannot be produced from the one FnOnce the
        // coordinator handed out, but a misbehaving SDK could call
        // complete-like paths again via a fresh init; the state must stay
        // Initialized.
        assert_eq!(coord.state(), InitState::Initialized);
    }

    #[test]
    fn test_sdk_resolving_synchronously_does_not_deadlock() {
        struct EagerSdk;
        impl NetworkSdk for EagerSdk {
            fn init(&self, _account_id: &str, _events: PlacementBus, on_done: InitCallback) {
                on_done(Ok(()));
            }
            fn placement_state(&self, _placement_id: &str) -> PlacementState {
                PlacementState::Unknown
            }
            fn show(&self, _surface: Surface, _placement_id: &str) {}
        }

        let coord = InitCoordinator::new(Arc::new(EagerSdk), PlacementBus::new(), Config::default());
        let done = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&done);
        coord.ensure_initialized(
            "12345",
            Box::new(move |outcome| {
                assert!(outcome.is_ok());
                d.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(coord.is_initialized());
    }
}
