#![forbid(unsafe_code)]

//! Modal orchestrator: the process-wide registry of open modals.
//!
//! [`ModalService`] owns the instance stack, the global layer counter, and
//! the pending completion channels. It creates the user's content view and
//! a wrapping host view through the [`ViewFactory`], drives each
//! instance's [`ModalHost`] state machine, and queues the resulting
//! [`SceneEffect`] commands for the embedding to drain and apply to its
//! real element tree.
//!
//! Ownership is deliberately one-sided: the service pops the stack and
//! signals the host; the host never touches shared state. Dismissal
//! triggers (Escape, backdrop clicks) and animation-completion signals all
//! enter through the service.
//!
//! # Invariants
//!
//! - Stack depth == global layer level == count of pending completions.
//! - Every successful `open` is matched by exactly one eventual disposal
//!   of both its views, and exactly one completion delivery.
//! - Close order is strictly LIFO; `close` always targets the top.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `close` with no modal open | Caller misuse | No-op, debug-logged |
//! | Backdrop click on a background modal | Embedding routed a covered overlay | Ignored, debug-logged |
//! | Animation signal for unknown instance | Stale or duplicate event | Ignored, debug-logged |
//! | Host-view instantiation fails | Factory error | Content view disposed, `Err` returned |

use serde_json::Value;
use veil_core::completion::{self, Completion, CompletionResolver, ModalResponse};
use veil_core::options::ModalOptions;
use veil_core::view::{ViewError, ViewFactory, ViewHandle, ViewProps, ViewType};

use crate::host::{HostEffect, HostPart, ModalHost};

/// View type of the wrapping host view the orchestrator instantiates
/// around every content view. Factories must recognize it.
pub const HOST_VIEW: ViewType = ViewType("veil::modal-host");

/// Identifies one open (or closing) modal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// The raw id value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A host effect tagged with the instance it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEffect {
    pub instance: InstanceId,
    pub effect: HostEffect,
}

/// One open modal: the content view, its wrapping host view, the host
/// state machine, and the yet-undelivered completion.
struct ModalInstance {
    id: InstanceId,
    content: ViewHandle,
    host_view: ViewHandle,
    host: ModalHost,
    resolver: Option<CompletionResolver>,
    /// Response captured at pop time, delivered at disposal.
    response: Option<ModalResponse>,
}

/// Process-wide modal registry and stack.
///
/// One instance is constructed at application startup and owned by the
/// embedding's event loop; all mutation goes through `&mut self`.
pub struct ModalService {
    factory: Box<dyn ViewFactory>,
    /// Open modals, bottom to top.
    stack: Vec<ModalInstance>,
    /// Popped modals still running their leave animations.
    closing: Vec<ModalInstance>,
    /// Current stack depth; each instance captures its value at open time
    /// for escape scoping.
    layer_level: u32,
    /// Set by the Escape/backdrop paths, consumed by the next `close`.
    closed_on_click_or_escape: bool,
    effects: Vec<SceneEffect>,
    next_instance: u64,
}

impl ModalService {
    /// Create a service over the embedding's view factory.
    pub fn new(factory: Box<dyn ViewFactory>) -> Self {
        Self {
            factory,
            stack: Vec::new(),
            closing: Vec::new(),
            layer_level: 0,
            closed_on_click_or_escape: false,
            effects: Vec::new(),
            next_instance: 1,
        }
    }

    /// Open a modal around a content view of the given type.
    ///
    /// Instantiates the content view (with `options.data` as its props)
    /// and a wrapping [`HOST_VIEW`], attaches both, pushes the new
    /// instance onto the stack, and queues the opening effects. The
    /// returned [`Completion`] resolves exactly once, after the modal has
    /// finished its close-animation removal.
    pub fn open(
        &mut self,
        view: ViewType,
        options: Option<ModalOptions>,
    ) -> Result<Completion, ViewError> {
        let options = options.unwrap_or_default();

        let content = self.factory.instantiate(view, &options.data)?;
        let host_view = match self.factory.instantiate(HOST_VIEW, &ViewProps::new()) {
            Ok(handle) => handle,
            Err(err) => {
                // Keep open/dispose symmetry even on the error path.
                self.factory.dispose(content);
                return Err(err);
            }
        };
        self.factory.attach(content);
        self.factory.attach(host_view);

        self.layer_level += 1;
        let depth = self.stack.len() as u32 + 1;
        let (host, effects) = ModalHost::open(&options, self.layer_level, depth);

        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        self.queue(id, effects);

        let (resolver, completion) = completion::channel();
        self.stack.push(ModalInstance {
            id,
            content,
            host_view,
            host,
            resolver: Some(resolver),
            response: None,
        });

        tracing::debug!(instance = id.0, view = view.name(), depth, "modal opened");
        Ok(completion)
    }

    /// Close the topmost open modal, forwarding `data` to its completion.
    ///
    /// A no-op when no modal is open. The completion resolves once the
    /// host finishes its close sequence: synchronously for an un-animated
    /// modal, otherwise on the last animation-completion signal.
    pub fn close(&mut self, data: Option<Value>) {
        let Some(mut instance) = self.stack.pop() else {
            tracing::debug!("close ignored: no modal open");
            return;
        };
        self.layer_level -= 1;

        let closed_on_click_or_escape = std::mem::take(&mut self.closed_on_click_or_escape);
        instance.response = Some(ModalResponse {
            closed_on_click_or_escape,
            data,
        });

        let effects = instance.host.begin_close();
        self.queue(instance.id, effects);
        tracing::debug!(instance = instance.id.0, "modal closing");

        if instance.host.is_disposed() {
            self.finalize(instance);
        } else {
            self.closing.push(instance);
        }
    }

    /// Close every open modal, topmost first.
    ///
    /// Each instance runs its full close-and-dispose cycle, so per-modal
    /// leave animations still play.
    pub fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close(None);
        }
    }

    /// Report an Escape keypress.
    ///
    /// Every open modal observes it, the way per-instance key listeners
    /// would; only the one whose captured layer equals the current global
    /// layer (the topmost) reacts, gated by its escape option.
    pub fn escape_pressed(&mut self) {
        let current = self.layer_level;
        let triggered = self.stack.iter().any(|m| m.host.handles_escape(current));
        if triggered {
            self.closed_on_click_or_escape = true;
            self.close(None);
        }
    }

    /// Report a click on an instance's backdrop.
    ///
    /// Dismisses the modal through the same path as Escape, gated by its
    /// click option. Clicks attributed to anything but the topmost open
    /// modal are ignored: a covered overlay should not close the modal
    /// above it.
    pub fn backdrop_clicked(&mut self, instance: InstanceId) {
        let Some(top) = self.stack.last() else {
            tracing::debug!(instance = instance.0, "backdrop click ignored: no modal open");
            return;
        };
        if top.id != instance {
            tracing::debug!(instance = instance.0, "backdrop click ignored: not topmost");
            return;
        }
        if !top.host.handles_backdrop_click() {
            return;
        }
        self.closed_on_click_or_escape = true;
        self.close(None);
    }

    /// Report that one element's leave animation finished.
    ///
    /// Routed to the matching closing instance; once both of its parts
    /// have closed, the instance is disposed and its completion delivered.
    pub fn animation_ended(&mut self, instance: InstanceId, part: HostPart) {
        let Some(index) = self.closing.iter().position(|m| m.id == instance) else {
            tracing::debug!(instance = instance.0, ?part, "animation end ignored: not closing");
            return;
        };
        let effects = self.closing[index].host.animation_ended(part);
        self.queue(instance, effects);
        if self.closing[index].host.is_disposed() {
            let instance = self.closing.remove(index);
            self.finalize(instance);
        }
    }

    /// Drain the queued scene effects for the embedding to apply.
    pub fn drain_effects(&mut self) -> Vec<SceneEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Number of open modals.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether any modal is open.
    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Current global layer level (equals [`Self::depth`]).
    pub fn layer_level(&self) -> u32 {
        self.layer_level
    }

    /// The topmost open instance, if any.
    pub fn top_instance(&self) -> Option<InstanceId> {
        self.stack.last().map(|m| m.id)
    }

    /// Number of popped instances still running leave animations.
    pub fn closing_count(&self) -> usize {
        self.closing.len()
    }

    fn queue(&mut self, instance: InstanceId, effects: Vec<HostEffect>) {
        self.effects
            .extend(effects.into_iter().map(|effect| SceneEffect { instance, effect }));
    }

    /// Tear down a fully closed instance: detach and dispose both views,
    /// then deliver the captured response.
    fn finalize(&mut self, mut instance: ModalInstance) {
        self.factory.detach(instance.content);
        self.factory.detach(instance.host_view);
        self.factory.dispose(instance.content);
        self.factory.dispose(instance.host_view);

        if let (Some(resolver), Some(response)) =
            (instance.resolver.take(), instance.response.take())
        {
            resolver.resolve(response);
        }
        tracing::debug!(instance = instance.id.0, "modal disposed");
    }
}

impl std::fmt::Debug for ModalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalService")
            .field("depth", &self.stack.len())
            .field("closing", &self.closing.len())
            .field("layer_level", &self.layer_level)
            .field("queued_effects", &self.effects.len())
            .finish()
    }
}
