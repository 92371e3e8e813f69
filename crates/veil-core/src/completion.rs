#![forbid(unsafe_code)]

//! Single-fire completion channel for modal results.
//!
//! Every `open` returns a [`Completion`]; the orchestrator keeps the
//! paired [`CompletionResolver`] and fires it once the modal's close
//! sequence has fully removed it. The channel delivers exactly one value
//! and then stays resolved.
//!
//! Three equivalent consumer views exist over the same underlying value:
//! polling ([`Completion::try_get`]), blocking await
//! ([`Completion::wait`]), and a subscribe-once callback
//! ([`Completion::on_close`]). A callback registered after resolution
//! fires immediately.
//!
//! # Invariants
//!
//! - `resolve` delivers at most once; a second call is a guarded no-op
//!   that reports `false`.
//! - A registered callback fires on the resolving thread, exactly once.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Double resolve | Orchestrator bug | Second call returns `false`, value unchanged |
//! | Second `on_close` | Caller registers twice before resolution | Replaces the first callback |
//! | `wait` on an abandoned channel | Resolver dropped unresolved | Blocks forever (the orchestrator always resolves) |

use std::sync::{Arc, Condvar, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload delivered when a modal closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModalResponse {
    /// Whether the close was triggered by Escape or a backdrop click, as
    /// opposed to an explicit programmatic close.
    pub closed_on_click_or_escape: bool,
    /// Opaque data forwarded verbatim from the `close` call.
    pub data: Option<Value>,
}

type CloseCallback = Box<dyn FnOnce(ModalResponse) + Send>;

struct State {
    value: Option<ModalResponse>,
    resolved: bool,
    callback: Option<CloseCallback>,
}

struct Shared {
    state: Mutex<State>,
    ready: Condvar,
}

/// Consumer half of the channel, returned to the caller of `open`.
pub struct Completion {
    shared: Arc<Shared>,
}

/// Producer half of the channel, held by the orchestrator.
pub struct CompletionResolver {
    shared: Arc<Shared>,
}

/// Create a linked resolver/completion pair.
pub fn channel() -> (CompletionResolver, Completion) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            value: None,
            resolved: false,
            callback: None,
        }),
        ready: Condvar::new(),
    });
    (
        CompletionResolver {
            shared: Arc::clone(&shared),
        },
        Completion { shared },
    )
}

impl CompletionResolver {
    /// Deliver the response. Returns `false` if the channel was already
    /// resolved, in which case nothing changes.
    pub fn resolve(&self, response: ModalResponse) -> bool {
        let callback = {
            let mut state = match self.shared.state.lock() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            if state.resolved {
                return false;
            }
            state.resolved = true;
            // The value is always stored, so try_get and wait observe it
            // even when a callback also consumes the delivery.
            state.value = Some(response.clone());
            state.callback.take()
        };
        self.shared.ready.notify_all();
        if let Some(callback) = callback {
            callback(response);
        }
        true
    }

    /// Whether the channel has been resolved.
    pub fn is_resolved(&self) -> bool {
        match self.shared.state.lock() {
            Ok(state) => state.resolved,
            Err(poisoned) => poisoned.into_inner().resolved,
        }
    }
}

impl Completion {
    /// Poll for the response without blocking.
    pub fn try_get(&self) -> Option<ModalResponse> {
        let state = match self.shared.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.value.clone()
    }

    /// Block until the response is delivered.
    ///
    /// Intended for callers off the UI thread; calling this on the thread
    /// that pumps the orchestrator would deadlock.
    pub fn wait(&self) -> ModalResponse {
        let mut state = match self.shared.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        loop {
            if let Some(value) = state.value.clone() {
                return value;
            }
            state = match self.shared.ready.wait(state) {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Register a callback fired once when the modal closes.
    ///
    /// Fires immediately if the response was already delivered. The value
    /// stays available to `try_get` and `wait` either way.
    pub fn on_close(&self, callback: impl FnOnce(ModalResponse) + Send + 'static) {
        let immediate = {
            let mut state = match self.shared.state.lock() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            if state.resolved {
                state.value.clone()
            } else {
                state.callback = Some(Box::new(callback));
                return;
            }
        };
        if let Some(response) = immediate {
            callback(response);
        }
    }

    /// Whether the response has been delivered.
    pub fn is_resolved(&self) -> bool {
        match self.shared.state.lock() {
            Ok(state) => state.resolved,
            Err(poisoned) => poisoned.into_inner().resolved,
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl std::fmt::Debug for CompletionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionResolver")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
